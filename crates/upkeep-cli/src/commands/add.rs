use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use upkeep_core::models::{NewTaskData, RecurrencePattern, TaskType};

use crate::cli::AddCommand;
use crate::commands::Engine;
use crate::parser::parse_due_date;
use crate::views::table::short_id;

pub async fn add_task(engine: &Engine, command: AddCommand) -> Result<()> {
    let due_date = command.due.as_deref().map(parse_due_date).transpose()?;

    let pattern = command.every.unwrap_or_default();
    let task_type = if pattern == RecurrencePattern::None {
        TaskType::OneTime
    } else {
        TaskType::Recurring
    };

    let new_task_data = NewTaskData {
        client_id: command.client,
        appliance_id: command.appliance,
        user_id: command.user,
        description: command.description,
        priority: command.priority,
        task_type,
        due_date,
        recurrence_pattern: pattern,
        recurrence_interval: command.interval,
    };

    let (task, instances) = engine.create_task(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if task.is_recurring() {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            task.description.bright_white().bold()
        );
        println!("  {} Task ID: {}", "→".style(info_style), short_id(&task).yellow());
        println!(
            "  {} Repeats {} (every {})",
            "→".style(info_style),
            task.recurrence_pattern.cyan(),
            task.recurrence_interval
        );
        match (instances.first(), instances.last()) {
            (Some(first), Some(last)) => println!(
                "  {} Scheduled {} upcoming visits ({} to {})",
                "→".style(info_style),
                instances.len(),
                first.due_date.map(|d| d.to_string()).unwrap_or_default(),
                last.due_date.map(|d| d.to_string()).unwrap_or_default()
            ),
            _ => println!(
                "  {} No visits fall inside the lookahead window yet",
                "→".style(info_style)
            ),
        }
    } else {
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            task.description.bright_white().bold()
        );
        println!("  {} Task ID: {}", "→".style(info_style), short_id(&task).yellow());
        if let Some(due) = task.due_date {
            println!("  {} Due: {}", "→".style(info_style), due.to_string().cyan());
        }
    }

    Ok(())
}
