//! `studyflow` — offline-first student task organizer.
//!
//! Runs the organizer engine against file-backed local stores, scoped to
//! one user. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/studyflow/config.toml`).
//!
//! ```bash
//! # Add and list tasks
//! cargo run --bin studyflow -- add-task "HW1" --subject math --due 2026-09-01
//! cargo run --bin studyflow -- tasks
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use studyflow::config::{AppConfig, CliArgs, Command};
use studyflow::managers::{ProjectDetails, SubjectDetails, TaskDetails};
use studyflow::remote::MemoryRemote;
use studyflow::{Organizer, Session};
use studyflow_model::{
    RefInput, TaskPriority, format_date_display, format_time_display,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());
    tracing::info!(user = config.user, "studyflow starting");

    // The CLI has no live backend; it runs against the local snapshots
    // and queues remote work for whenever a sync target exists.
    let remote = Arc::new(MemoryRemote::new());
    let session = Session::new(config.user.clone());
    let organizer = match &config.data_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            Organizer::open(session, remote, dir).await?
        }
        None => Organizer::in_memory(session, remote),
    };
    organizer.handle_offline().await;

    run_command(&organizer, &config, cli.command.unwrap_or(Command::Tasks)).await?;

    tracing::info!("studyflow exiting");
    Ok(())
}

/// Initialize file-based logging.
///
/// Logs go to a file, not stdout, so command output stays clean. Returns
/// a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("studyflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

#[allow(clippy::too_many_lines)]
async fn run_command(
    organizer: &Organizer<MemoryRemote>,
    config: &AppConfig,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Tasks => {
            for view in organizer.task_views().await {
                let task = &view.task;
                let due = match (task.due_date, task.due_time) {
                    (Some(date), Some(time)) => format!(
                        "{} {}",
                        format_date_display(date, config.date_format),
                        format_time_display(time, config.time_format)
                    ),
                    (Some(date), None) => format_date_display(date, config.date_format),
                    _ => "-".to_string(),
                };
                let subject = view.subject.map_or("-".to_string(), |s| s.name);
                let project = view.project.map_or("-".to_string(), |p| p.name);
                println!(
                    "{}  [{}] {}  due {due}  subject {subject}  project {project}",
                    task.id, task.status, task.name
                );
            }
        }
        Command::AddTask {
            name,
            description,
            subject,
            project,
            priority,
            start,
            due,
            time,
        } => {
            let details = TaskDetails {
                name,
                description,
                priority: parse_priority(priority.as_deref())?,
                subject: subject.as_deref().map(RefInput::from_id).unwrap_or_default(),
                project: project.as_deref().map(RefInput::from_id).unwrap_or_default(),
                start_date: parse_date_arg(start.as_deref())?,
                due_date: parse_date_arg(due.as_deref())?,
                due_time: parse_time_arg(time.as_deref())?,
                ..TaskDetails::default()
            };
            let task = organizer.create_task(details).await?;
            println!("created task {}", task.id);
        }
        Command::Done { id } => {
            organizer.archive_task(&id).await?;
            println!("completed {id}");
        }
        Command::RemoveTask { id } => {
            organizer.delete_task(&id).await;
            println!("removed {id}");
        }
        Command::Subjects => {
            for subject in organizer.list_subjects().await {
                println!(
                    "{}  [{}] {}  {}",
                    subject.id, subject.status, subject.name, subject.semester
                );
            }
        }
        Command::AddSubject {
            name,
            semester,
            color,
        } => {
            let subject = organizer
                .create_subject(SubjectDetails {
                    name,
                    semester,
                    color,
                    ..SubjectDetails::default()
                })
                .await?;
            println!("created subject {}", subject.id);
        }
        Command::ArchiveSubject { id } => {
            organizer.archive_subject(&id).await?;
            println!("archived {id}");
        }
        Command::RemoveSubject { id } => {
            organizer.delete_subject(&id).await;
            println!("removed {id}");
        }
        Command::Projects => {
            for view in organizer.project_views().await {
                let project = &view.project;
                let due = project
                    .due_date
                    .map_or("-".to_string(), |d| format_date_display(d, config.date_format));
                let subjects: Vec<String> =
                    view.subjects.into_iter().map(|s| s.name).collect();
                println!(
                    "{}  [{}] {}  due {due}  subjects [{}]",
                    project.id,
                    project.status,
                    project.name,
                    subjects.join(", ")
                );
            }
        }
        Command::AddProject {
            name,
            subjects,
            due,
        } => {
            let project = organizer
                .create_project(ProjectDetails {
                    name,
                    subjects: subjects.iter().map(|id| RefInput::from_id(id)).collect(),
                    due_date: parse_date_arg(due.as_deref())?,
                    ..ProjectDetails::default()
                })
                .await?;
            println!("created project {}", project.id);
        }
        Command::RemoveProject { id } => {
            organizer.delete_project(&id).await;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn parse_priority(raw: Option<&str>) -> Result<TaskPriority, String> {
    match raw {
        None => Ok(TaskPriority::default()),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            other => Err(format!("unknown priority '{other}' (high, medium, low)")),
        },
    }
}

fn parse_date_arg(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, String> {
    match raw {
        None => Ok(None),
        Some(s) => studyflow::dates::parse_date(s)
            .map(Some)
            .ok_or_else(|| format!("invalid date '{s}' (expected YYYY-MM-DD)")),
    }
}

fn parse_time_arg(raw: Option<&str>) -> Result<Option<chrono::NaiveTime>, String> {
    match raw {
        None => Ok(None),
        Some(s) => studyflow::dates::parse_time(s)
            .map(Some)
            .ok_or_else(|| format!("invalid time '{s}' (expected HH:MM)")),
    }
}
