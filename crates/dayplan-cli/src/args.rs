use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::cli::{
    CleanupArgs, ExecArgs, HistoryArgs, InheritArgs, MetricsArgs, ReviewArgs, SaveArgs, SetArgs,
    SwitchArgs, TaskCommands,
};

/// Daily study planner with remote state synchronization
///
/// Dayplan keeps one plan per day: the tasks you intend to work on, what you
/// actually did, and a short reflection. Every change is persisted to a
/// versioned document store, and finalized days feed a history of metrics.
#[derive(Parser)]
#[command(version, about, name = "dp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/dayplan/dayplan.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Number of days kept in the working document, 0 keeps everything
    #[arg(long, global = true, value_name = "DAYS")]
    pub retention: Option<usize>,

    /// Plan date to operate on (YYYY-MM-DD). Defaults to today
    #[arg(long, global = true)]
    pub date: Option<Date>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Dayplan CLI
///
/// Planning happens in stages. Tasks are drafted with `task`, locked in with
/// `confirm`, executions are logged with `exec`, and the day is closed with
/// `review` and `finalize`.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the session and store status
    #[command(alias = "st")]
    Status,
    /// Show the plan for the active date
    #[command(alias = "s")]
    Show,
    /// Set weather, energy level or reflection
    Set(SetArgs),
    /// Manage planned tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Record the execution of a planned task
    #[command(alias = "e")]
    Exec(ExecArgs),
    /// Confirm the planned tasks after checking them for overlaps
    #[command(alias = "c")]
    Confirm,
    /// Return a confirmed plan to drafting
    Reopen,
    /// Enter or leave the final review of the day
    Review(ReviewArgs),
    /// Finalize the day and archive it to history
    Finalize,
    /// Copy the tasks of another day into the active date
    Inherit(InheritArgs),
    /// Switch from the active date to another date
    Switch(SwitchArgs),
    /// Save the active record
    Save(SaveArgs),
    /// Remove the active date from the working document
    Clear,
    /// Maintenance of the working document
    Cleanup(CleanupArgs),
    /// List finalized days
    #[command(alias = "h")]
    History(HistoryArgs),
    /// Show metrics over recent finalized days
    #[command(alias = "m")]
    Metrics(MetricsArgs),
}
