// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad` — the AMPA daemon supervisor and CLI (spec §4.8).
//!
//! `main` only parses arguments and assembles [`Config`]; every
//! subcommand's behavior lives in [`commands`] so it can be driven from
//! the same entry points the integration tests exercise via
//! `assert_cmd`.

mod commands;
mod config;
mod deps;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use config::Config;
use exit_error::ExitError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ampad", version, about = "Agent-orchestration daemon for a project's work-item backlog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon supervisor.
    Start {
        /// Named daemon instance (state lives under `.worklog/ampa/<name>/`).
        #[arg(long, default_value = "default")]
        name: String,

        /// Run the supervisor loop in this process instead of backgrounding it.
        #[arg(long)]
        foreground: bool,

        /// Override the scheduler store path (defaults to `AMPA_SCHEDULER_STORE`
        /// or `.worklog/ampa/scheduler_store.json`).
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Stop a running daemon instance.
    Stop {
        #[arg(long, default_value = "default")]
        name: String,
    },
    /// Report whether a daemon instance is running.
    Status {
        #[arg(long, default_value = "default")]
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// Force-run a single scheduled command, bypassing its cooldown.
    Run {
        /// The `command_id` to run (must already be registered in the store).
        command_id: String,

        #[arg(long, default_value = "default")]
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// List registered scheduled commands and their state.
    List {
        #[arg(long, default_value = "default")]
        name: String,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ampad: {e}");
            e.code
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32, ExitError> {
    match cli.command {
        Commands::Start { name, foreground, store } => {
            let config = Config::assemble(name, store)?;
            commands::start::run(config, foreground).await
        }
        Commands::Stop { name } => {
            let config = Config::assemble(name, None)?;
            commands::stop::run(config)
        }
        Commands::Status { name, json } => {
            let config = Config::assemble(name, None)?;
            commands::status::run(config, json)
        }
        Commands::Run { command_id, name, json } => {
            let config = Config::assemble(name, None)?;
            commands::run::run(config, &command_id, json).await
        }
        Commands::List { name, json } => {
            let config = Config::assemble(name, None)?;
            commands::list::run(config, json)
        }
    }
}
