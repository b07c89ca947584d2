//! # Upkeep Core Library
//!
//! Recurring maintenance-task generation: expands a recurring task into dated
//! instances, keeps a rolling horizon of future instances populated, advances
//! the chain as instances complete, and removes unfinished series members
//! while preserving completed history.
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Task record, series lineage and transfer objects
//! - [`recurrence`]: Pure recurrence date arithmetic and instance planning
//! - [`clock`]: Injectable source of the current date
//! - [`hierarchy`]: Cycle-safe walk over parent links for cascade deletion
//! - [`repository`]: Storage contract and its SQLite implementation
//! - [`engine`]: Horizon generation, due-date renewal, completion chaining
//!   and cascade deletion
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use upkeep_core::{
//!     db, engine::RecurrenceEngine,
//!     models::{NewTaskData, RecurrencePattern, TaskType},
//!     repository::SqliteRepository,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), upkeep_core::error::CoreError> {
//!     let pool = db::establish_connection("upkeep.db").await?;
//!     let engine = RecurrenceEngine::with_defaults(SqliteRepository::new(pool));
//!
//!     let (root, instances) = engine
//!         .create_task(NewTaskData {
//!             client_id: "client-42".to_string(),
//!             description: "Boiler inspection".to_string(),
//!             task_type: TaskType::Recurring,
//!             due_date: NaiveDate::from_ymd_opt(2025, 1, 15),
//!             recurrence_pattern: RecurrencePattern::Quarterly,
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{} scheduled with {} upcoming visits", root.description, instances.len());
//!
//!     let summary = engine.generate_upcoming(90).await?;
//!     println!("generated {}", summary.generated);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod db;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod recurrence;
pub mod repository;
