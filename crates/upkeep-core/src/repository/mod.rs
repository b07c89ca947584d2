use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CascadeOutcome, Task, UpdateTaskData};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub mod tasks;

/// Storage contract the generation engine works against.
///
/// Implementations must enforce that no two tasks share the same
/// `(parent_task_id, due_date)` pair and must never delete a completed task.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_all_tasks(&self) -> Result<Vec<Task>, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn find_tasks_by_parent(&self, parent_id: Uuid) -> Result<Vec<Task>, CoreError>;
    /// Recurring tasks whose `next_occurrence_date` is on or before `today`.
    async fn find_recurring_tasks_due(&self, today: NaiveDate) -> Result<Vec<Task>, CoreError>;
    async fn insert_task(&self, task: Task) -> Result<Task, CoreError>;
    /// Inserts all instances in one transaction. Instances whose
    /// `(parent_task_id, due_date)` is already taken, or whose series root no
    /// longer exists, are skipped; only the rows actually written are
    /// returned. Any other constraint violation is an error.
    async fn insert_instances(&self, instances: Vec<Task>) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    /// Marks `id` completed (keeping an earlier `completed_at`) and inserts
    /// `follow_up` under the same rules as [`Self::insert_instances`], all in
    /// one transaction. Returns the completed task and the instances written.
    async fn complete_task(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        follow_up: Vec<Task>,
    ) -> Result<(Task, Vec<Task>), CoreError>;
    /// Deletes `id` and its non-completed descendants in one transaction that
    /// also reads the tree. Completed tasks are never deleted. Fails without
    /// deleting anything when the tree is deeper than `max_depth`.
    async fn delete_cascade(&self, id: Uuid, max_depth: usize) -> Result<CascadeOutcome, CoreError>;
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
