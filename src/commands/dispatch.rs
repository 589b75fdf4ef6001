//! Command dispatch logic for tagrank

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use tagrank_core::error::Result;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    match &cli.command {
        Commands::Init { examples } => commands::init::execute(cli, *examples),

        Commands::Tag { command } => commands::tag::execute(cli, command),

        Commands::Rank {
            limit,
            page,
            access_key,
            dry_run,
        } => commands::rank::execute(
            cli,
            *limit,
            page.as_deref(),
            access_key.as_deref(),
            *dry_run,
            start,
        ),
    }
}
