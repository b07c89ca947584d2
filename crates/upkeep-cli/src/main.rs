use clap::Parser;
use owo_colors::{OwoColorize, Style};
use upkeep_core::clock::SystemClock;
use upkeep_core::db;
use upkeep_core::engine::RecurrenceEngine;
use upkeep_core::error::CoreError;
use upkeep_core::models::GenerationConfig;
use upkeep_core::repository::SqliteRepository;

mod cli;
mod commands;
mod config;
mod logging;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.log_level);
    tracing::debug!(database = %config.database_path, "configuration loaded");

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let engine = RecurrenceEngine::new(
        SqliteRepository::new(db_pool),
        SystemClock,
        GenerationConfig::from(&config.generation),
    );

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&engine, command).await,
        cli::Commands::List(command) => commands::list::list_tasks(&engine, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&engine, command).await,
        cli::Commands::Do(command) => commands::r#do::do_task(&engine, command).await,
        cli::Commands::Generate(command) => commands::generate::generate(&engine, command).await,
        cli::Commands::Sweep(command) => commands::sweep::sweep(&engine, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, description) in tasks {
                    eprintln!("  {} ({})", id.yellow(), description);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::HierarchyTooDeep { root, limit } => {
                eprintln!(
                    "{} Task '{}' has descendants more than {} levels deep; nothing was deleted",
                    "Error:".style(error_style),
                    root.yellow(),
                    limit
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), core_error),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
