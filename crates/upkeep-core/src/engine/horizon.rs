use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::engine::{RecurrenceEngine, SeriesFill};
use crate::error::CoreError;
use crate::models::{GenerationSummary, Task};
use crate::recurrence::RecurrenceRule;
use crate::repository::TaskRepository;

impl<R: TaskRepository, C: Clock> RecurrenceEngine<R, C> {
    /// Creates every missing instance of every recurring root between today
    /// and `today + days_ahead`.
    ///
    /// Running it again without intervening changes creates nothing. A failure
    /// while filling one series is recorded in the summary and the remaining
    /// series are still processed; only failing to list the tasks at all is
    /// returned as an error. A series with more missing dates than
    /// `max_instances_per_series` gets that many and is reported as an error.
    pub async fn generate_upcoming(&self, days_ahead: u32) -> Result<GenerationSummary, CoreError> {
        let started = Instant::now();
        let today = self.clock().today();
        let horizon = self.horizon_from(today, days_ahead);

        let roots: Vec<Task> = self
            .repository()
            .find_all_tasks()
            .await?
            .into_iter()
            .filter(|task| task.is_recurring() && !task.is_auto_generated)
            .collect();

        let mut summary = GenerationSummary::default();
        for root in &roots {
            summary.series_processed += 1;
            match self.fill_series(root, today, horizon).await {
                Ok(fill) => {
                    let truncated = fill.truncated;
                    summary.record_created(fill.created);
                    if truncated {
                        let e = CoreError::InstanceLimitReached {
                            root: root.id.to_string(),
                            limit: self.config().max_instances_per_series,
                        };
                        warn!(root_id = %root.id, error = %e, "series not filled to the horizon");
                        summary.record_error(root.id, &e);
                    }
                }
                Err(e) => {
                    warn!(root_id = %root.id, error = %e, "failed to generate upcoming instances");
                    summary.record_error(root.id, &e);
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            series = summary.series_processed,
            generated = summary.generated,
            failed = summary.series_with_errors,
            %horizon,
            "upcoming instances generated"
        );
        Ok(summary)
    }

    /// Fills one root's series from `max(root.due_date, today)` to `horizon`.
    pub(crate) async fn fill_series(
        &self,
        root: &Task,
        today: NaiveDate,
        horizon: NaiveDate,
    ) -> Result<SeriesFill, CoreError> {
        let rule = RecurrenceRule::for_task(root)?;
        let due_date = root.due_date.ok_or_else(|| {
            CoreError::InvalidRecurrence(format!("recurring task {} has no due date", root.id))
        })?;
        let from = due_date.max(today);

        self.ensure_instances(root, root.id, rule, from, horizon).await
    }
}
