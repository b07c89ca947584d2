use chrono::{Local, NaiveDate, TimeZone};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use upkeep_core::models::{GenerationSummary, SeriesLink, Task, TaskStatus};

pub fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

fn series_label(task: &Task) -> String {
    if task.is_series_root() {
        return format!("↻ {} x{}", task.recurrence_pattern, task.recurrence_interval);
    }
    match task.series_link() {
        SeriesLink::Instance { root_id } => format!("↳ {}", &root_id.simple().to_string()[..8]),
        SeriesLink::Root => "-".to_string(),
    }
}

fn due_cell(task: &Task, today: NaiveDate) -> Cell {
    let Some(due) = task.due_date else {
        return Cell::new("None");
    };
    let humanized = Local
        .from_local_datetime(&due.and_hms_opt(0, 0, 0).unwrap_or_default())
        .single()
        .map(|dt| dt.humanize())
        .unwrap_or_default();
    let cell = Cell::new(format!("{} ({})", due, humanized));

    if task.is_completed() {
        cell
    } else if due < today {
        cell.fg(Color::Red)
    } else if due == today {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

pub fn display_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let today = Local::now().date_naive();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Description", "Client", "Status", "Due Date", "Series", "Priority"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(task)));

        let mut name_cell = Cell::new(&task.description);
        name_cell = match task.status {
            TaskStatus::Completed => name_cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey),
            TaskStatus::InProgress => name_cell.add_attribute(Attribute::Bold),
            TaskStatus::Pending => name_cell,
        };
        row.add_cell(name_cell);
        row.add_cell(Cell::new(&task.client_id));

        let status_cell = Cell::new(task.status.to_string());
        row.add_cell(match task.status {
            TaskStatus::Completed => status_cell.fg(Color::Green),
            TaskStatus::InProgress => status_cell.fg(Color::Cyan),
            TaskStatus::Pending => status_cell,
        });

        row.add_cell(due_cell(task, today));
        row.add_cell(Cell::new(series_label(task)));
        row.add_cell(Cell::new(&task.priority));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_summary(title: &str, summary: &GenerationSummary) {
    let mut table = Table::new();
    table.set_header(vec![title, ""]);
    table.add_row(vec!["Series processed".to_string(), summary.series_processed.to_string()]);
    table.add_row(vec!["Instances generated".to_string(), summary.generated.to_string()]);
    table.add_row(vec![
        Cell::new("Series with errors"),
        if summary.series_with_errors > 0 {
            Cell::new(summary.series_with_errors).fg(Color::Red)
        } else {
            Cell::new(summary.series_with_errors)
        },
    ]);
    table.add_row(vec!["Duration".to_string(), format!("{} ms", summary.duration_ms)]);
    println!("{table}");

    for error in &summary.errors {
        eprintln!("  {}", error);
    }
}
