use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Task hierarchy exceeds the maximum depth of {limit} levels below '{root}'")]
    HierarchyTooDeep { root: String, limit: usize },

    #[error("Series '{root}' has more missing instances than the per-run limit of {limit}; the rest are created on the next run")]
    InstanceLimitReached { root: String, limit: usize },

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, description)
}
