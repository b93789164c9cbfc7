//! dashboards-cli: administration client for a notebook dashboard server.
//! Clears the server cache, deletes dashboards and publishes notebooks.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod auth;
mod client;
mod config;
mod conflict;
mod handlers;
mod target;
mod telemetry;


use std::process;

use clap::Parser;
use tracing::debug;

use args::Cli;
use client::{CliError, build_ctx_from_cli};
use conflict::TerminalConfirmer;
use handlers::Completion;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(completion) => println!("{completion}"),
        Err(error) => {
            debug!(error = ?error, "command failed");
            eprintln!("error: {error}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Completion, CliError> {
    let settings = config::load(&cli.global)?;
    telemetry::init(&settings.logging)?;
    debug!(
        ip = ?settings.get("IP"),
        port = ?settings.get("PORT"),
        public_link_pattern = ?settings.get("PUBLIC_LINK_PATTERN"),
        token_configured = settings.get("AUTH_TOKEN").is_some(),
        "configuration loaded"
    );

    let ctx = build_ctx_from_cli(&cli.global, &settings)?;
    handlers::handle(&ctx, cli.command, &TerminalConfirmer).await
}
