use std::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::engine::RecurrenceEngine;
use crate::error::CoreError;
use crate::models::{GenerationSummary, SeriesLink, Task, UpdateTaskData};
use crate::recurrence::RecurrenceRule;
use crate::repository::TaskRepository;

impl<R: TaskRepository, C: Clock> RecurrenceEngine<R, C> {
    /// Due-date renewal for records that predate horizon generation.
    ///
    /// Every recurring task whose `next_occurrence_date` has arrived spawns
    /// the instance for that date. Roots renewed this way also have their own
    /// `next_occurrence_date` moved forward. Generated instances are skipped;
    /// their successors come from completion.
    pub async fn generate_due(&self) -> Result<GenerationSummary, CoreError> {
        let started = Instant::now();
        let today = self.clock().today();
        let due = self.repository().find_recurring_tasks_due(today).await?;

        let mut summary = GenerationSummary::default();
        for task in &due {
            let is_instance = matches!(task.series_link(), SeriesLink::Instance { .. });
            if (task.is_auto_generated && is_instance) || task.is_completed() || !task.is_recurring() {
                debug!(task_id = %task.id, "skipping renewal");
                continue;
            }
            match task.next_occurrence_date {
                Some(next) if next <= today => {}
                _ => continue,
            }

            summary.series_processed += 1;
            match self.renew(task).await {
                Ok(created) => summary.record_created(created),
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "due-date renewal failed");
                    summary.record_error(task.id, &e);
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            candidates = due.len(),
            generated = summary.generated,
            failed = summary.series_with_errors,
            "due recurring tasks renewed"
        );
        Ok(summary)
    }

    async fn renew(&self, task: &Task) -> Result<Vec<Task>, CoreError> {
        let rule = RecurrenceRule::for_task(task)?;
        let Some(occurrence) = task.next_occurrence_date else {
            return Ok(Vec::new());
        };

        let created = self
            .ensure_instances(task, task.series_root_id(), rule, occurrence, occurrence)
            .await?
            .created;

        if task.series_link() == SeriesLink::Root {
            self.repository()
                .update_task(
                    task.id,
                    UpdateTaskData {
                        next_occurrence_date: Some(rule.next_after(occurrence)),
                        ..Default::default()
                    },
                )
                .await?;
        }

        Ok(created)
    }
}
