use anyhow::Result;
use upkeep_core::repository::TaskRepository;

use crate::cli::ListCommand;
use crate::commands::Engine;
use crate::util::resolve_task_id;
use crate::views::table::display_tasks;

pub async fn list_tasks(engine: &Engine, command: ListCommand) -> Result<()> {
    let repo = engine.repository();

    let mut tasks = match command.series {
        Some(ref id) => {
            let root_id = resolve_task_id(repo, id).await?;
            let mut series: Vec<_> = repo.find_task_by_id(root_id).await?.into_iter().collect();
            series.extend(
                repo.find_tasks_by_parent(root_id)
                    .await?
                    .into_iter()
                    .filter(|t| t.id != root_id),
            );
            series
        }
        None => repo.find_all_tasks().await?,
    };

    if let Some(status) = command.status {
        tasks.retain(|t| t.status == status);
    }

    display_tasks(&tasks);
    Ok(())
}
