use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::engine::RecurrenceEngine;
use crate::error::CoreError;
use crate::models::CompletionResult;
use crate::recurrence::RecurrenceRule;
use crate::repository::TaskRepository;

impl<R: TaskRepository, C: Clock> RecurrenceEngine<R, C> {
    /// Marks a task completed and, when it belongs to a recurring series,
    /// spawns the instance due on its `next_occurrence_date`.
    ///
    /// The new instance is attached to the completed task's series root and
    /// copies its payload. If that date already has an instance (for example
    /// from the horizon sweep), nothing new is created. The status change and
    /// the follow-up insert are committed together: if the insert fails the
    /// task stays as it was.
    pub async fn on_task_completed(&self, task_id: Uuid) -> Result<CompletionResult, CoreError> {
        let task = self
            .repository()
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;
        let now = self.clock().now();

        let next_due = match task.next_occurrence_date {
            Some(next_due) if task.is_recurring() => next_due,
            _ => {
                let (completed, _) = self.repository().complete_task(task_id, now, Vec::new()).await?;
                if !completed.is_recurring() {
                    return Ok(CompletionResult::Single(completed));
                }
                let root_id = completed.series_root_id();
                return Ok(CompletionResult::SeriesInstance {
                    completed,
                    next: None,
                    root_id,
                    next_occurrence: None,
                });
            }
        };

        let root_id = task.series_root_id();
        let rule = RecurrenceRule::for_task(&task)?;
        let planned = self.plan_series(&task, root_id, rule, next_due, next_due).await?;
        let (completed, created) = self
            .repository()
            .complete_task(task_id, now, planned.instances)
            .await?;
        let next = created.into_iter().next();

        info!(
            task_id = %completed.id,
            %root_id,
            next_due = %next_due,
            created = next.is_some(),
            "recurring task completed"
        );

        Ok(CompletionResult::SeriesInstance {
            completed,
            next,
            root_id,
            next_occurrence: Some(next_due),
        })
    }
}
