use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    #[default]
    OneTime,
    Recurring,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task type: {0}")]
pub struct ParseTaskTypeError(String);

impl FromStr for TaskType {
    type Err = ParseTaskTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-time" | "onetime" => Ok(TaskType::OneTime),
            "recurring" => Ok(TaskType::Recurring),
            _ => Err(ParseTaskTypeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::OneTime => write!(f, "one-time"),
            TaskType::Recurring => write!(f, "recurring"),
        }
    }
}

/// How often a recurring series repeats. The interval on the task multiplies
/// the base period of the pattern.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RecurrencePattern {
    #[default]
    None,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence pattern: {0}")]
pub struct ParseRecurrencePatternError(String);

impl FromStr for RecurrencePattern {
    type Err = ParseRecurrencePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(RecurrencePattern::None),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            "quarterly" => Ok(RecurrencePattern::Quarterly),
            "semi-annual" | "semiannual" | "semi_annual" => Ok(RecurrencePattern::SemiAnnual),
            "yearly" => Ok(RecurrencePattern::Yearly),
            _ => Err(ParseRecurrencePatternError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrencePattern::None => write!(f, "none"),
            RecurrencePattern::Weekly => write!(f, "weekly"),
            RecurrencePattern::Monthly => write!(f, "monthly"),
            RecurrencePattern::Quarterly => write!(f, "quarterly"),
            RecurrencePattern::SemiAnnual => write!(f, "semi-annual"),
            RecurrencePattern::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub client_id: String,
    pub appliance_id: Option<String>,
    pub user_id: Option<String>,
    pub status: TaskStatus,
    pub task_type: TaskType,
    pub description: String,
    pub priority: String,
    /// Calendar day this specific instance is due. Always set on recurring tasks.
    pub due_date: Option<NaiveDate>,
    pub recurrence_pattern: RecurrencePattern,
    pub recurrence_interval: u32,
    /// Series root for generated instances. Roots carry `None`, or their own
    /// id in rows written by older versions.
    pub parent_task_id: Option<Uuid>,
    pub is_auto_generated: bool,
    /// Day on which this task's successor falls due.
    pub next_occurrence_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id: String::new(),
            appliance_id: None,
            user_id: None,
            status: TaskStatus::Pending,
            task_type: TaskType::OneTime,
            description: String::new(),
            priority: String::new(),
            due_date: None,
            recurrence_pattern: RecurrencePattern::None,
            recurrence_interval: 1,
            parent_task_id: None,
            is_auto_generated: false,
            next_occurrence_date: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Position of a task inside its recurring series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesLink {
    /// The task heads its own series.
    Root,
    /// The task was spawned under `root_id`.
    Instance { root_id: Uuid },
}

impl Task {
    pub fn series_link(&self) -> SeriesLink {
        match self.parent_task_id {
            Some(parent) if parent != self.id => SeriesLink::Instance { root_id: parent },
            _ => SeriesLink::Root,
        }
    }

    /// Id of the task new instances of this series are attached to.
    pub fn series_root_id(&self) -> Uuid {
        match self.series_link() {
            SeriesLink::Root => self.id,
            SeriesLink::Instance { root_id } => root_id,
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Recurring with a pattern that actually repeats.
    #[inline]
    pub fn is_recurring(&self) -> bool {
        self.task_type == TaskType::Recurring && self.recurrence_pattern != RecurrencePattern::None
    }

    /// User-authored head of a recurring series.
    #[inline]
    pub fn is_series_root(&self) -> bool {
        self.task_type == TaskType::Recurring && !self.is_auto_generated
    }

    /// Builds a pending, auto-generated instance of this task's series due on
    /// `due_date`. Descriptive fields are copied from `self`.
    pub fn spawn_instance(
        &self,
        root_id: Uuid,
        due_date: NaiveDate,
        next_occurrence_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Task {
        Task {
            id: Uuid::new_v4(),
            client_id: self.client_id.clone(),
            appliance_id: self.appliance_id.clone(),
            user_id: self.user_id.clone(),
            status: TaskStatus::Pending,
            task_type: self.task_type,
            description: self.description.clone(),
            priority: self.priority.clone(),
            due_date: Some(due_date),
            recurrence_pattern: self.recurrence_pattern,
            recurrence_interval: self.recurrence_interval,
            parent_task_id: Some(root_id),
            is_auto_generated: true,
            next_occurrence_date,
            created_at,
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub client_id: String,
    pub appliance_id: Option<String>,
    pub user_id: Option<String>,
    pub description: String,
    pub priority: String,
    pub task_type: TaskType,
    pub due_date: Option<NaiveDate>,
    pub recurrence_pattern: RecurrencePattern,
    /// Defaults to 1 for recurring tasks.
    pub recurrence_interval: Option<u32>,
}

impl NewTaskData {
    /// Checks the invariants every stored task must satisfy.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.client_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("client_id must not be empty".to_string()));
        }
        match self.task_type {
            TaskType::OneTime => {
                if self.recurrence_pattern != RecurrencePattern::None {
                    return Err(CoreError::InvalidInput(format!(
                        "one-time tasks cannot recur (pattern '{}')",
                        self.recurrence_pattern
                    )));
                }
                if self.recurrence_interval.is_some() {
                    return Err(CoreError::InvalidInput(
                        "one-time tasks cannot carry a recurrence interval".to_string(),
                    ));
                }
            }
            TaskType::Recurring => {
                if self.due_date.is_none() {
                    return Err(CoreError::InvalidInput(
                        "recurring tasks require a due date".to_string(),
                    ));
                }
                if self.recurrence_pattern == RecurrencePattern::None {
                    return Err(CoreError::InvalidInput(
                        "recurring tasks require a recurrence pattern".to_string(),
                    ));
                }
                if self.recurrence_interval == Some(0) {
                    return Err(CoreError::InvalidInput(
                        "recurrence interval must be at least 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<NaiveDate>>,
    pub next_occurrence_date: Option<Option<NaiveDate>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug)]
pub enum CompletionResult {
    Single(Task),
    SeriesInstance {
        completed: Task,
        /// `None` when the next date was already occupied or the series ended.
        next: Option<Task>,
        root_id: Uuid,
        next_occurrence: Option<NaiveDate>,
    },
}

/// Outcome of one generation run across many series.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSummary {
    /// Number of series (or legacy records) visited
    pub series_processed: usize,
    /// Total instances created
    pub generated: usize,
    /// The created instances
    pub tasks: Vec<Task>,
    /// Number of series that failed and were skipped
    pub series_with_errors: usize,
    /// One message per failed series
    pub errors: Vec<String>,
    /// Wall time of the run
    pub duration_ms: u64,
}

impl GenerationSummary {
    pub(crate) fn record_created(&mut self, created: Vec<Task>) {
        self.generated += created.len();
        self.tasks.extend(created);
    }

    pub(crate) fn record_error(&mut self, task_id: Uuid, error: &CoreError) {
        self.series_with_errors += 1;
        self.errors.push(format!("{}: {}", task_id, error));
    }

    pub(crate) fn merge(&mut self, other: GenerationSummary) {
        self.series_processed += other.series_processed;
        self.generated += other.generated;
        self.tasks.extend(other.tasks);
        self.series_with_errors += other.series_with_errors;
        self.errors.extend(other.errors);
        self.duration_ms += other.duration_ms;
    }
}

/// Result of a cascade deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub deleted: Vec<Uuid>,
    /// Completed tasks found in the tree and left in place.
    pub preserved: Vec<Uuid>,
}

/// Configuration for instance generation.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Horizon used by periodic sweeps and creation-time fills, in days
    pub lookahead_days: u32,
    /// Deepest parent chain cascade deletion will follow
    pub max_hierarchy_depth: usize,
    /// Upper bound on instances a single series may create per run
    pub max_instances_per_series: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 90,
            max_hierarchy_depth: 100,
            max_instances_per_series: 1000,
        }
    }
}
