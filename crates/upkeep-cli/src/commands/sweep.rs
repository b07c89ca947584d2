use anyhow::Result;

use crate::cli::SweepCommand;
use crate::commands::generate::report;
use crate::commands::Engine;

pub async fn sweep(engine: &Engine, command: SweepCommand) -> Result<()> {
    let summary = engine.sweep().await;
    report("Sweep", &summary, command.json)
}
