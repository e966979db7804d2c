//! Dayplan CLI Application
//!
//! Command-line interface for the dayplan daily planning tool.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use dayplan_core::{Clock, EngineBuilder, RetentionPolicy, SystemClock};
use log::info;
use renderer::TerminalRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        retention,
        date,
        no_color,
        command,
    } = Args::parse();

    let mut builder = EngineBuilder::new().with_database_path(database_file);
    if let Some(days) = retention {
        builder = builder.with_retention(match days {
            0 => RetentionPolicy::Unlimited,
            n => RetentionPolicy::KeepLatest(n),
        });
    }
    let engine = builder.build().context("Failed to initialize engine")?;

    let date = date.unwrap_or_else(|| SystemClock.today());
    info!("Dayplan started on {date}");

    let renderer = TerminalRenderer::new(!no_color);
    Cli::new(engine, date, renderer).handle_command(command.unwrap_or(Commands::Status))
}
