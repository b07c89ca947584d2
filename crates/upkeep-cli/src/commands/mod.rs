use upkeep_core::engine::RecurrenceEngine;
use upkeep_core::repository::SqliteRepository;

pub mod add;
pub mod delete;
pub mod r#do;
pub mod generate;
pub mod list;
pub mod sweep;

pub type Engine = RecurrenceEngine<SqliteRepository>;
