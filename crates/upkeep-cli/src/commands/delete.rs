use anyhow::Result;
use dialoguer::Confirm;
use upkeep_core::error::CoreError;
use upkeep_core::repository::TaskRepository;

use crate::cli::DeleteCommand;
use crate::commands::Engine;
use crate::util::resolve_task_id;

pub async fn delete_task(engine: &Engine, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(engine.repository(), &command.id).await?;
    let task = engine
        .repository()
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Task with ID '{}' not found.", task_id)))?;

    if !command.force {
        let prompt = if task.is_series_root() {
            format!(
                "Delete series '{}' and all of its unfinished visits? Completed visits are kept.",
                task.description
            )
        } else {
            format!("Are you sure you want to delete task '{}'?", task.description)
        };
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let outcome = engine.delete_cascade(task_id).await?;
    println!(
        "Deleted {} task(s); kept {} completed task(s).",
        outcome.deleted.len(),
        outcome.preserved.len()
    );
    Ok(())
}
