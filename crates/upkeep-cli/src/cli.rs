use clap::{Parser, Subcommand};
use upkeep_core::models::{RecurrencePattern, TaskStatus};

/// Keeps recurring maintenance work scheduled ahead of time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks
    List(ListCommand),
    /// Delete a task and its unfinished follow-ups
    Delete(DeleteCommand),
    /// Mark a task as completed
    Do(DoCommand),
    /// Run a generation pass
    Generate(GenerateCommand),
    /// Renew due tasks and fill the default horizon
    Sweep(SweepCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// What needs to be done
    pub description: String,
    /// The client the work is for
    #[clap(short, long)]
    pub client: String,
    /// The appliance being serviced
    #[clap(short, long)]
    pub appliance: Option<String>,
    /// The assigned user
    #[clap(short, long)]
    pub user: Option<String>,
    /// The due date (YYYY-MM-DD or e.g. "next monday")
    #[clap(short, long)]
    pub due: Option<String>,
    /// Free-form priority label
    #[clap(short, long, default_value = "medium")]
    pub priority: String,
    /// Repeat pattern (weekly, monthly, quarterly, semi-annual, yearly)
    #[clap(long)]
    pub every: Option<RecurrencePattern>,
    /// Multiplier for the repeat pattern
    #[clap(long, requires = "every")]
    pub interval: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only show a series root and its instances
    #[clap(long)]
    pub series: Option<String>,
    /// Only show tasks with this status
    #[clap(long)]
    pub status: Option<TaskStatus>,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the task to mark as completed
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateCommand {
    #[command(subcommand)]
    pub command: GenerateSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GenerateSubcommand {
    /// Create every missing instance up to a horizon
    Upcoming(UpcomingCommand),
    /// Renew tasks whose next occurrence has arrived
    Due(DueCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct UpcomingCommand {
    /// Days ahead to fill; defaults to the configured lookahead
    #[clap(long)]
    pub days: Option<u32>,
    /// Print the summary as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DueCommand {
    /// Print the summary as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SweepCommand {
    /// Print the summary as JSON
    #[clap(long)]
    pub json: bool,
}
