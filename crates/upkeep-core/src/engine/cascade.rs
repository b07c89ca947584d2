use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::engine::RecurrenceEngine;
use crate::error::CoreError;
use crate::models::CascadeOutcome;
use crate::repository::TaskRepository;

impl<R: TaskRepository, C: Clock> RecurrenceEngine<R, C> {
    /// Deletes a task together with its non-completed descendants.
    ///
    /// Completed tasks anywhere in the tree, including a completed target,
    /// are kept. Nothing is deleted if the hierarchy is deeper than the
    /// configured limit. A missing task is a no-op. Reading the tree and
    /// deleting it happen in one repository transaction, so instances written
    /// concurrently are either removed with the tree or not written at all.
    pub async fn delete_cascade(&self, task_id: Uuid) -> Result<CascadeOutcome, CoreError> {
        let outcome = self
            .repository()
            .delete_cascade(task_id, self.config().max_hierarchy_depth)
            .await?;

        info!(
            %task_id,
            deleted = outcome.deleted.len(),
            preserved = outcome.preserved.len(),
            "cascade delete finished"
        );
        Ok(outcome)
    }
}
