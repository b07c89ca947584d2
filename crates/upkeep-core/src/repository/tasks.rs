use crate::error::CoreError;
use crate::hierarchy::CascadeWalk;
use crate::models::{CascadeOutcome, Task, TaskStatus, TaskType, UpdateTaskData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, client_id, appliance_id, user_id, status, task_type, description, priority, \
    due_date, recurrence_pattern, recurrence_interval, parent_task_id, is_auto_generated, \
    next_occurrence_date, created_at, completed_at";

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn find_all_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as("SELECT * FROM tasks ORDER BY due_date, created_at")
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError> {
        // Ids are stored as 16-byte blobs, so match against their hex form.
        let mut pattern: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        pattern.push('%');

        let tasks = sqlx::query_as("SELECT * FROM tasks WHERE hex(id) LIKE $1")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_tasks_by_parent(&self, parent_id: Uuid) -> Result<Vec<Task>, CoreError> {
        children_of(self.pool(), parent_id).await
    }

    async fn find_recurring_tasks_due(&self, today: NaiveDate) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            r#"SELECT * FROM tasks
            WHERE task_type = $1
            AND next_occurrence_date IS NOT NULL
            AND next_occurrence_date <= $2
            ORDER BY next_occurrence_date"#,
        )
        .bind(TaskType::Recurring)
        .bind(today)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn insert_task(&self, task: Task) -> Result<Task, CoreError> {
        let sql = format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES ({}) RETURNING *", placeholders());
        let inserted = bind_task(sqlx::query_as(&sql), &task)
            .fetch_one(self.pool())
            .await?;
        Ok(inserted)
    }

    async fn insert_instances(&self, instances: Vec<Task>) -> Result<Vec<Task>, CoreError> {
        let mut tx = self.pool().begin().await?;
        let mut created = Vec::with_capacity(instances.len());

        for instance in &instances {
            if let Some(task) = insert_instance(&mut *tx, instance).await? {
                created.push(task);
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
        let mut fields = qb.separated(", ");
        let mut updated = false;

        if let Some(description) = data.description {
            fields.push("description = ").push_bind_unseparated(description);
            updated = true;
        }
        if let Some(priority) = data.priority {
            fields.push("priority = ").push_bind_unseparated(priority);
            updated = true;
        }
        if let Some(status) = data.status {
            fields.push("status = ").push_bind_unseparated(status);
            updated = true;
        }
        if let Some(due_date) = data.due_date {
            fields.push("due_date = ").push_bind_unseparated(due_date);
            updated = true;
        }
        if let Some(next_occurrence_date) = data.next_occurrence_date {
            fields.push("next_occurrence_date = ").push_bind_unseparated(next_occurrence_date);
            updated = true;
        }
        if let Some(completed_at) = data.completed_at {
            fields.push("completed_at = ").push_bind_unseparated(completed_at);
            updated = true;
        }

        if !updated {
            return self
                .find_task_by_id(id)
                .await?
                .ok_or_else(|| CoreError::NotFound(id.to_string()));
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Task>()
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    async fn complete_task(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        follow_up: Vec<Task>,
    ) -> Result<(Task, Vec<Task>), CoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("UPDATE tasks SET status = $1, completed_at = $2 WHERE id = $3 AND status != $1")
            .bind(TaskStatus::Completed)
            .bind(completed_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let completed: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let mut created = Vec::with_capacity(follow_up.len());
        for instance in &follow_up {
            if let Some(task) = insert_instance(&mut *tx, instance).await? {
                created.push(task);
            }
        }

        tx.commit().await?;
        Ok((completed, created))
    }

    async fn delete_cascade(&self, id: Uuid, max_depth: usize) -> Result<CascadeOutcome, CoreError> {
        let mut tx = self.pool().begin().await?;

        // A no-op write first, so the transaction holds the write lock
        // before it reads the tree.
        let target: Option<Task> = sqlx::query_as("UPDATE tasks SET status = status WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(target) = target else {
            tx.rollback().await?;
            return Ok(CascadeOutcome::default());
        };

        let mut walk = CascadeWalk::new(target.id, max_depth);
        while let Some((parent, depth)) = walk.next_parent() {
            let children = children_of(&mut *tx, parent).await?;
            walk.visit_children(depth, &children)?;
        }
        let plan = walk.into_plan();

        let mut doomed = plan.descendants;
        let mut preserved = plan.preserved;
        if target.is_completed() {
            preserved.push(target.id);
        } else {
            doomed.push(target.id);
        }

        let mut deleted = Vec::with_capacity(doomed.len());
        for task_id in doomed {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND status != $2")
                .bind(task_id)
                .bind(TaskStatus::Completed)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                deleted.push(task_id);
            }
        }

        tx.commit().await?;
        Ok(CascadeOutcome { deleted, preserved })
    }
}

async fn children_of<'e, E>(executor: E, parent_id: Uuid) -> Result<Vec<Task>, CoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tasks = sqlx::query_as("SELECT * FROM tasks WHERE parent_task_id = $1 ORDER BY due_date")
        .bind(parent_id)
        .fetch_all(executor)
        .await?;
    Ok(tasks)
}

/// Writes one generated instance. Returns `None` when the series already has
/// an instance on that date or its root is gone.
async fn insert_instance(conn: &mut SqliteConnection, instance: &Task) -> Result<Option<Task>, CoreError> {
    let sql = format!(
        "INSERT INTO tasks ({TASK_COLUMNS}) SELECT {} \
         WHERE EXISTS (SELECT 1 FROM tasks WHERE id = $12) \
         ON CONFLICT (parent_task_id, due_date) \
         WHERE parent_task_id IS NOT NULL AND due_date IS NOT NULL DO NOTHING \
         RETURNING *",
        placeholders()
    );
    let inserted: Option<Task> = bind_task(sqlx::query_as(&sql), instance)
        .fetch_optional(&mut *conn)
        .await?;

    if inserted.is_none() {
        tracing::debug!(
            parent_task_id = ?instance.parent_task_id,
            due_date = ?instance.due_date,
            "instance date taken or series removed, skipping"
        );
    }
    Ok(inserted)
}

fn placeholders() -> String {
    let placeholders: Vec<String> = (1..=16).map(|i| format!("${i}")).collect();
    placeholders.join(", ")
}

fn bind_task<'q>(
    query: sqlx::query::QueryAs<'q, Sqlite, Task, sqlx::sqlite::SqliteArguments<'q>>,
    task: &'q Task,
) -> sqlx::query::QueryAs<'q, Sqlite, Task, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(task.id)
        .bind(&task.client_id)
        .bind(&task.appliance_id)
        .bind(&task.user_id)
        .bind(task.status)
        .bind(task.task_type)
        .bind(&task.description)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(task.recurrence_pattern)
        .bind(task.recurrence_interval)
        .bind(task.parent_task_id)
        .bind(task.is_auto_generated)
        .bind(task.next_occurrence_date)
        .bind(task.created_at)
        .bind(task.completed_at)
}
