use anyhow::Result;
use upkeep_core::models::CompletionResult;

use crate::cli::DoCommand;
use crate::commands::Engine;
use crate::util::resolve_task_id;

pub async fn do_task(engine: &Engine, command: DoCommand) -> Result<()> {
    let task_id = resolve_task_id(engine.repository(), &command.id).await?;

    match engine.on_task_completed(task_id).await? {
        CompletionResult::Single(task) => {
            println!("Completed task: '{}'", task.description);
        }
        CompletionResult::SeriesInstance {
            completed,
            next,
            next_occurrence,
            ..
        } => {
            println!("Completed task: '{}'", completed.description);
            match (next, next_occurrence) {
                (Some(next), _) => println!(
                    "Created next visit '{}' for {}",
                    next.description,
                    next.due_date.map(|d| d.to_string()).unwrap_or_default()
                ),
                (None, Some(date)) => println!("Next visit on {} is already scheduled", date),
                (None, None) => println!("No further visits scheduled"),
            }
        }
    }

    Ok(())
}
