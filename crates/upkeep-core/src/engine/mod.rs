//! The generation engine.
//!
//! Every trigger that creates instances (task creation, completion, the
//! legacy due-date renewal and the horizon sweep) plans against the dates
//! already stored for a series, so repeating a trigger creates nothing new.
//! Completion hands its plan to the repository together with the status
//! change; the other triggers go through `ensure_instances`.

use chrono::{Days, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::models::{GenerationConfig, GenerationSummary, NewTaskData, Task, TaskStatus, TaskType};
use crate::recurrence::{plan_missing_instances, PlannedInstances, RecurrenceRule};
use crate::repository::TaskRepository;

pub mod cascade;
pub mod completion;
pub mod horizon;
pub mod renewal;

/// Instances written for one series by [`RecurrenceEngine::ensure_instances`].
#[derive(Debug, Default)]
pub(crate) struct SeriesFill {
    pub(crate) created: Vec<Task>,
    /// The per-run instance cap left dates in the range unfilled.
    pub(crate) truncated: bool,
}

pub struct RecurrenceEngine<R, C = SystemClock> {
    repository: R,
    clock: C,
    config: GenerationConfig,
}

impl<R: TaskRepository> RecurrenceEngine<R, SystemClock> {
    /// Engine on the system clock with default configuration.
    pub fn with_defaults(repository: R) -> Self {
        Self::new(repository, SystemClock, GenerationConfig::default())
    }
}

impl<R: TaskRepository, C: Clock> RecurrenceEngine<R, C> {
    pub fn new(repository: R, clock: C, config: GenerationConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Stores a new user-authored task. Recurring roots get their first
    /// `next_occurrence_date` and are immediately filled up to the configured
    /// horizon; a failure during that fill is logged, not returned, since the
    /// next sweep repairs it.
    pub async fn create_task(&self, data: NewTaskData) -> Result<(Task, Vec<Task>), CoreError> {
        data.validate()?;

        let is_recurring = data.task_type == TaskType::Recurring;
        let interval = if is_recurring {
            data.recurrence_interval.unwrap_or(1)
        } else {
            1
        };
        let next_occurrence_date = match (is_recurring, data.due_date) {
            (true, Some(due)) => RecurrenceRule::new(data.recurrence_pattern, interval)?.next_after(due),
            _ => None,
        };

        let task = Task {
            id: Uuid::new_v4(),
            client_id: data.client_id,
            appliance_id: data.appliance_id,
            user_id: data.user_id,
            status: TaskStatus::Pending,
            task_type: data.task_type,
            description: data.description,
            priority: data.priority,
            due_date: data.due_date,
            recurrence_pattern: data.recurrence_pattern,
            recurrence_interval: interval,
            parent_task_id: None,
            is_auto_generated: false,
            next_occurrence_date,
            created_at: self.clock.now(),
            completed_at: None,
        };
        let task = self.repository.insert_task(task).await?;
        info!(task_id = %task.id, task_type = %task.task_type, "task created");

        if !task.is_recurring() {
            return Ok((task, Vec::new()));
        }

        let today = self.clock.today();
        let horizon = self.horizon_from(today, self.config.lookahead_days);
        let instances = match self.fill_series(&task, today, horizon).await {
            Ok(fill) => {
                if fill.truncated {
                    warn!(
                        task_id = %task.id,
                        limit = self.config.max_instances_per_series,
                        "initial instance generation hit the per-series limit"
                    );
                }
                fill.created
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "initial instance generation failed");
                Vec::new()
            }
        };
        Ok((task, instances))
    }

    /// Periodic trigger: legacy renewal followed by the horizon sweep.
    /// Errors are logged and folded into the summary, never returned.
    pub async fn sweep(&self) -> GenerationSummary {
        let mut summary = GenerationSummary::default();

        match self.generate_due().await {
            Ok(due) => summary.merge(due),
            Err(e) => {
                warn!(error = %e, "due-date renewal failed");
                summary.errors.push(format!("due-date renewal: {}", e));
            }
        }

        match self.generate_upcoming(self.config.lookahead_days).await {
            Ok(upcoming) => summary.merge(upcoming),
            Err(e) => {
                warn!(error = %e, "horizon generation failed");
                summary.errors.push(format!("horizon generation: {}", e));
            }
        }

        info!(
            generated = summary.generated,
            errors = summary.errors.len(),
            "sweep finished"
        );
        summary
    }

    /// Plans the instances missing from the series rooted at `root_id` for
    /// every occurrence of `rule` in `[from, until]`, copying payload fields
    /// from `template`. Nothing is written.
    pub(crate) async fn plan_series(
        &self,
        template: &Task,
        root_id: Uuid,
        rule: RecurrenceRule,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<PlannedInstances, CoreError> {
        if from > until {
            return Ok(PlannedInstances::default());
        }

        let mut occupied: HashSet<NaiveDate> = self
            .repository
            .find_tasks_by_parent(root_id)
            .await?
            .into_iter()
            .filter_map(|task| task.due_date)
            .collect();

        Ok(plan_missing_instances(
            template,
            root_id,
            rule,
            from,
            until,
            &mut occupied,
            self.config.max_instances_per_series,
            self.clock.now(),
        ))
    }

    /// Makes sure the series rooted at `root_id` has an instance for every
    /// occurrence of `rule` in `[from, until]`, up to the per-run cap.
    /// Returns the instances that were actually written.
    pub(crate) async fn ensure_instances(
        &self,
        template: &Task,
        root_id: Uuid,
        rule: RecurrenceRule,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<SeriesFill, CoreError> {
        let planned = self.plan_series(template, root_id, rule, from, until).await?;
        if planned.instances.is_empty() {
            return Ok(SeriesFill {
                created: Vec::new(),
                truncated: planned.truncated,
            });
        }

        let created = self.repository.insert_instances(planned.instances).await?;
        for instance in &created {
            debug!(
                root_id = %root_id,
                instance_id = %instance.id,
                due_date = ?instance.due_date,
                "instance created"
            );
        }
        Ok(SeriesFill {
            created,
            truncated: planned.truncated,
        })
    }

    fn horizon_from(&self, today: NaiveDate, days_ahead: u32) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(days_ahead)))
            .unwrap_or(NaiveDate::MAX)
    }
}
