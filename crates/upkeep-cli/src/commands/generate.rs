use anyhow::Result;
use upkeep_core::models::GenerationSummary;

use crate::cli::{GenerateCommand, GenerateSubcommand};
use crate::commands::Engine;
use crate::views::table::display_summary;

pub async fn generate(engine: &Engine, command: GenerateCommand) -> Result<()> {
    match command.command {
        GenerateSubcommand::Upcoming(cmd) => {
            let days = cmd.days.unwrap_or(engine.config().lookahead_days);
            let summary = engine.generate_upcoming(days).await?;
            report(&format!("Upcoming ({} days)", days), &summary, cmd.json)
        }
        GenerateSubcommand::Due(cmd) => {
            let summary = engine.generate_due().await?;
            report("Due renewal", &summary, cmd.json)
        }
    }
}

pub fn report(title: &str, summary: &GenerationSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        display_summary(title, summary);
    }
    Ok(())
}
