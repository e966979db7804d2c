//! Command arguments and their handlers.
//!
//! Argument structs carry the clap attributes and convert into the core
//! parameter types, which stay free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → SyncEngine
//! ```
//!
//! Every invocation opens one session on the active date. Edits are followed
//! by a regular save request, so the save gates decide whether anything is
//! written.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Subcommand};
use dayplan_core::{
    display::{Conflicts, HistoryEntries, OperationStatus},
    params::{CleanupRequest, ExecutionDraft, RecordUpdate, TaskDraft},
    SaveOutcome, SessionContext, SyncEngine, SyncError,
};
use jiff::{civil::Date, ToSpan};
use log::debug;

use crate::{args::Commands, renderer::TerminalRenderer};

/// Set day-level fields of the active record
#[derive(Args)]
pub struct SetArgs {
    /// Weather: sunny, cloudy, rainy, overcast or snowy
    #[arg(short, long)]
    pub weather: Option<String>,
    /// Energy level from 1 to 10
    #[arg(short, long)]
    pub energy: Option<u8>,
    /// Free-text reflection on the day
    #[arg(short, long)]
    pub reflection: Option<String>,
}

impl From<SetArgs> for RecordUpdate {
    fn from(val: SetArgs) -> Self {
        RecordUpdate {
            weather: val.weather,
            energy_level: val.energy,
            reflection: val.reflection,
        }
    }
}

/// A planned task
#[derive(Args)]
pub struct TaskArgs {
    /// Name of the task
    pub name: String,
    /// Start time (HH:MM)
    pub start: String,
    /// End time (HH:MM); earlier than the start means the next day
    pub end: String,
    /// Subject: math, physics, econ, cs or other
    #[arg(short, long)]
    pub subject: Option<String>,
    /// Difficulty from 1 to 5
    #[arg(short, long)]
    pub difficulty: Option<u8>,
}

impl From<TaskArgs> for TaskDraft {
    fn from(val: TaskArgs) -> Self {
        TaskDraft {
            name: val.name,
            subject: val.subject,
            difficulty: val.difficulty,
            start_time: val.start,
            end_time: val.end,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the plan
    #[command(alias = "a")]
    Add(TaskArgs),
    /// Replace an existing task
    #[command(alias = "r")]
    Replace {
        /// ID of the task to replace
        id: u32,
        #[command(flatten)]
        task: TaskArgs,
    },
}

/// Record what was actually done for a task
#[derive(Args)]
pub struct ExecArgs {
    /// ID of the planned task
    pub task_id: u32,
    /// Actual start time (HH:MM)
    pub start: String,
    /// Actual end time (HH:MM)
    pub end: String,
    /// Energy level after the task, from 1 to 10
    #[arg(short, long, default_value_t = 7)]
    pub energy: u8,
    /// Number of interruptions
    #[arg(short, long, default_value_t = 0)]
    pub interruptions: u32,
    /// Mark the task as not completed
    #[arg(long)]
    pub incomplete: bool,
}

impl From<ExecArgs> for ExecutionDraft {
    fn from(val: ExecArgs) -> Self {
        ExecutionDraft {
            task_id: val.task_id,
            start_time: val.start,
            end_time: val.end,
            post_energy: val.energy,
            interruptions: val.interruptions,
            completed: !val.incomplete,
        }
    }
}

#[derive(Args)]
pub struct ReviewArgs {
    /// Leave the final review instead of entering it
    #[arg(long)]
    pub cancel: bool,
}

#[derive(Args)]
pub struct InheritArgs {
    /// Date to copy tasks from. Defaults to the day before the active date
    pub from: Option<Date>,
}

#[derive(Args)]
pub struct SwitchArgs {
    /// Date to switch to (YYYY-MM-DD)
    #[arg(value_name = "DATE")]
    pub target: Date,
}

#[derive(Args)]
pub struct SaveArgs {
    /// Bypass the rate and change checks
    #[arg(short, long)]
    pub force: bool,
}

/// Exactly one maintenance action
#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["retention_days", "clear_cache", "all"])))]
pub struct CleanupArgs {
    /// Drop working entries older than this many days
    #[arg(long, value_name = "DAYS")]
    pub retention_days: Option<u32>,
    /// Reload the session from the store
    #[arg(long)]
    pub clear_cache: bool,
    /// Delete the whole working document
    #[arg(long)]
    pub all: bool,
}

impl From<CleanupArgs> for CleanupRequest {
    fn from(val: CleanupArgs) -> Self {
        match val.retention_days {
            Some(days) => CleanupRequest::RetentionDays(days),
            None if val.all => CleanupRequest::ClearAll,
            None => CleanupRequest::ClearCache,
        }
    }
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Only days within this many days of today
    #[arg(short, long)]
    pub days: Option<u32>,
}

#[derive(Args)]
pub struct MetricsArgs {
    /// Window in days
    #[arg(short, long, default_value_t = 7)]
    pub days: u32,
}

/// Runs one command against one session.
pub struct Cli {
    engine: SyncEngine,
    session: SessionContext,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: SyncEngine, date: Date, renderer: TerminalRenderer) -> Self {
        let session = engine.open_session(date);
        debug!("Opened session on {date}");
        Self {
            engine,
            session,
            renderer,
        }
    }

    pub fn handle_command(mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Status => self.status(),
            Commands::Show => self.show(),
            Commands::Set(args) => self.set(&args.into()),
            Commands::Task { command } => self.handle_task_command(command),
            Commands::Exec(args) => self.exec(&args.into()),
            Commands::Confirm => self.confirm(),
            Commands::Reopen => {
                let save = self.engine.reopen_tasks(&mut self.session)?;
                self.report("Plan reopened for editing", &save)
            }
            Commands::Review(args) => self.review(args.cancel),
            Commands::Finalize => self.finalize(),
            Commands::Inherit(args) => self.inherit(args.from),
            Commands::Switch(args) => self.switch(args.target),
            Commands::Save(args) => {
                let save = self.engine.request_save(&mut self.session, args.force);
                self.report("Save requested", &save)
            }
            Commands::Clear => self.clear(),
            Commands::Cleanup(args) => self.cleanup(args.into()),
            Commands::History(args) => self.history(args.days),
            Commands::Metrics(args) => self.metrics(args.days),
        }
    }

    pub fn status(&mut self) -> Result<()> {
        let info = self.engine.get_state_info(&mut self.session);
        self.renderer.render(&info.to_string())
    }

    fn show(&self) -> Result<()> {
        self.renderer.render(&self.session.record().to_string())
    }

    fn set(&mut self, update: &RecordUpdate) -> Result<()> {
        if update.is_empty() {
            bail!("Nothing to set; pass --weather, --energy or --reflection");
        }
        self.engine
            .mutate(&mut self.session, update)
            .context("Failed to update the plan")?;
        let save = self.engine.request_save(&mut self.session, false);
        self.report("Plan updated", &save)
    }

    fn handle_task_command(&mut self, command: TaskCommands) -> Result<()> {
        let (task, action) = match command {
            TaskCommands::Add(args) => {
                let task = self
                    .engine
                    .add_task(&mut self.session, &args.into())
                    .context("Failed to add task")?;
                (task, "added")
            }
            TaskCommands::Replace { id, task } => {
                let task = self
                    .engine
                    .replace_task(&mut self.session, id, &task.into())
                    .context("Failed to replace task")?;
                (task, "replaced")
            }
        };
        let save = self.engine.request_save(&mut self.session, false);
        self.report(&format!("Task {} '{}' {action}", task.task_id, task.name), &save)
    }

    fn exec(&mut self, draft: &ExecutionDraft) -> Result<()> {
        let execution = self
            .engine
            .record_execution(&mut self.session, draft)
            .context("Failed to record execution")?;
        let save = self.engine.request_save(&mut self.session, false);
        self.report(
            &format!(
                "Execution of task {} recorded ({} min)",
                execution.task_id, execution.actual_duration
            ),
            &save,
        )
    }

    fn confirm(&mut self) -> Result<()> {
        match self.engine.confirm_tasks(&mut self.session) {
            Ok(save) => self.report("Plan confirmed", &save),
            Err(SyncError::OverlapConflict { conflicts }) => {
                let count = conflicts.len();
                self.renderer.render(&Conflicts(conflicts).to_string())?;
                bail!("{count} overlapping task pair(s) block confirmation")
            }
            Err(e) => Err(e).context("Failed to confirm plan"),
        }
    }

    fn review(&mut self, cancel: bool) -> Result<()> {
        if cancel {
            let save = self.engine.leave_final_confirmation(&mut self.session)?;
            self.report("Final review cancelled", &save)
        } else {
            let save = self
                .engine
                .enter_final_confirmation(&mut self.session)
                .context("Failed to start final review")?;
            self.report("Final review started", &save)
        }
    }

    fn finalize(&mut self) -> Result<()> {
        let outcome = self
            .engine
            .finalize(&mut self.session)
            .context("Failed to finalize the day")?;
        self.renderer.render(&outcome.to_string())
    }

    fn inherit(&mut self, from: Option<Date>) -> Result<()> {
        let source = match from {
            Some(date) => date,
            None => self
                .session
                .record()
                .plan_date
                .checked_sub(1.day())
                .context("No day before the active date")?,
        };
        let save = self
            .engine
            .inherit_from(&mut self.session, source)
            .with_context(|| format!("Failed to inherit tasks from {source}"))?;
        let count = self.session.record().planned_tasks.len();
        self.report(&format!("Inherited {count} task(s) from {source}"), &save)
    }

    fn switch(&mut self, date: Date) -> Result<()> {
        let outcome = self.engine.switch_date(&mut self.session, date);
        self.renderer.render(&outcome.to_string())?;
        self.show()
    }

    fn clear(&mut self) -> Result<()> {
        let date = self.session.record().plan_date;
        let removed = self
            .engine
            .clear_date(&mut self.session)
            .context("Failed to clear the active date")?;
        let status = if removed {
            OperationStatus::success(format!("Cleared the plan for {date}"))
        } else {
            OperationStatus::success(format!("Nothing stored for {date}"))
        };
        self.renderer.render(&status.to_string())
    }

    fn cleanup(&mut self, request: CleanupRequest) -> Result<()> {
        let report = self.engine.cleanup(&mut self.session, request);
        self.renderer.render(&report.to_string())
    }

    fn history(&mut self, days: Option<u32>) -> Result<()> {
        let entries = self.engine.history(&mut self.session, days);
        self.warn_if_degraded()?;
        self.renderer.render(&HistoryEntries(entries).to_string())
    }

    fn metrics(&mut self, days: u32) -> Result<()> {
        let report = self.engine.history_report(&mut self.session, days);
        self.warn_if_degraded()?;
        self.renderer.render(&report.to_string())
    }

    fn report(&self, action: &str, save: &SaveOutcome) -> Result<()> {
        self.renderer
            .render(&OperationStatus::after_save(action, save).to_string())
    }

    fn warn_if_degraded(&self) -> Result<()> {
        if self.session.connection().is_degraded() {
            let status = OperationStatus::warning(format!(
                "Working offline: {}",
                self.session.connection()
            ));
            self.renderer.render(&status.to_string())?;
        }
        Ok(())
    }
}
