//! Entry point for the `recall` binary.

use anyhow::Context;
use clap::Parser;
use log::debug;
use recall_rs::cli::{Cli, Command};
use recall_rs::commands::{self, Invocation};
use std::io;

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let invocation = Invocation::from_cli(&cli).context("failed to start recall")?;
    let command = cli.command.unwrap_or(Command::Show);
    debug!("running command: {command:?}");

    let mut stdout = io::stdout().lock();
    commands::run(command, &invocation, &mut stdout)
}
