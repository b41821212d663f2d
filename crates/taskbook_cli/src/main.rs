//! Taskbook command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and resolve configuration (flags over environment).
//! - Host the console presenter for task intake.

mod presenter;

use clap::{Parser, Subcommand};
use log::{debug, info};
use presenter::{ConsolePresenter, Locale};
use std::path::PathBuf;
use std::process::ExitCode;
use taskbook_core::{
    init_logging_from_config, AddTaskRequest, IntakeResult, JsonTaskStore, LoadPolicy,
    SystemClock, Task, TaskIntake, TaskbookConfig, UuidIdSource,
};

/// Personal task manager backed by a local JSON document.
#[derive(Parser)]
#[command(name = "taskbook", version, about)]
struct Cli {
    /// Task document path (default: tasks_database.json).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Message language.
    #[arg(long, value_enum, global = true, default_value_t = Locale::En)]
    locale: Locale,

    /// Refuse to write over a task document that cannot be decoded.
    #[arg(long, global = true)]
    strict: bool,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add one task.
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        /// Priority label, canonical or in the active locale.
        #[arg(long)]
        priority: String,
        #[arg(long)]
        recurring: bool,
    },
    /// Replay the sample intake scenarios against the task document.
    Demo,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskbook: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("taskbook: logging disabled: {err}");
    }

    match cli.command {
        Command::Add {
            title,
            description,
            due,
            priority,
            recurring,
        } => {
            let request = AddTaskRequest {
                title,
                description,
                due_date: due,
                priority: cli.locale.canonical_priority(&priority),
                is_recurring: recurring,
            };
            match build_intake(&config, cli.locale).add(&request) {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Command::Demo => {
            run_demo(&config, cli.locale);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("taskbook_core version={}", taskbook_core::core_version());
            ExitCode::SUCCESS
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<TaskbookConfig, String> {
    let mut config = TaskbookConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if cli.strict {
        config.load_policy = LoadPolicy::Strict;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn build_intake(
    config: &TaskbookConfig,
    locale: Locale,
) -> TaskIntake<JsonTaskStore, SystemClock, UuidIdSource, ConsolePresenter> {
    TaskIntake::new(
        JsonTaskStore::new(config.database_path.clone()),
        SystemClock,
        UuidIdSource,
    )
    .with_load_policy(config.load_policy)
    .with_presenter(ConsolePresenter::new(locale))
}

/// Sample intakes: (English heading, Vietnamese heading, title, description,
/// due date, canonical priority, recurring).
#[rustfmt::skip]
const DEMO_SCRIPT: [(&str, &str, &str, &str, &str, &str, bool); 6] = [
    ("Add a valid task", "Thêm nhiệm vụ hợp lệ", "Buy books", "SE textbook", "2025-07-20", "High", false),
    ("Add a duplicate task", "Thêm nhiệm vụ trùng lặp", "Buy books", "SE textbook", "2025-07-20", "High", false),
    ("Add another valid task", "Thêm nhiệm vụ hợp lệ khác", "Exercise", "Gym 1h", "2025-07-21", "Medium", true),
    ("Add a task without a title", "Thêm nhiệm vụ không có tiêu đề", "", "No title", "2025-07-22", "Low", false),
    ("Add a task with a bad date", "Thêm nhiệm vụ sai định dạng ngày", "Cook", "Dinner", "22-07-2025", "High", false),
    ("Add a task with a bad priority", "Thêm nhiệm vụ sai mức ưu tiên", "Study", "Midterm", "2025-07-23", "Very high", false),
];

fn demo_steps(locale: Locale) -> Vec<(&'static str, AddTaskRequest)> {
    DEMO_SCRIPT
        .iter()
        .map(|&(heading_en, heading_vi, title, description, due, priority, recurring)| {
            let heading = match locale {
                Locale::En => heading_en,
                Locale::Vi => heading_vi,
            };
            let request = AddTaskRequest::new(title, description, due, priority, recurring);
            (heading, request)
        })
        .collect()
}

fn run_demo(config: &TaskbookConfig, locale: Locale) {
    info!(
        "event=demo_start module=cli status=start policy={}",
        config.load_policy
    );
    let intake = build_intake(config, locale);
    for (heading, request) in demo_steps(locale) {
        println!("\n== {heading}:");
        let outcome = intake.add(&request);
        debug!(
            "event=demo_step module=cli status={}",
            step_status(&outcome)
        );
    }
}

/// `ok` or the intake error code; the presenter has already printed it.
fn step_status(outcome: &IntakeResult<Task>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(err) => err.error_code(),
    }
}
