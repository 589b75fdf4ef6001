//! `tagrank init` command - create the config file and tag database
//!
//! Idempotent: an existing config is kept as-is, the database schema is
//! created only if missing, and example seeding skips tags already present.

use crate::cli::{Cli, OutputFormat};
use tagrank_core::config::Config;
use tagrank_core::error::Result;
use tagrank_core::store::TagStore;

/// Execute the init command
pub fn execute(cli: &Cli, examples: bool) -> Result<()> {
    let (config, created) = match Config::load(&cli.config) {
        Ok(config) => (config, false),
        Err(tagrank_core::error::TagrankError::ConfigNotFound { .. }) => {
            let config = Config::default();
            config.save(&cli.config)?;
            (config, true)
        }
        Err(e) => return Err(e),
    };

    let db_path = config.db_path(&cli.config);
    let store = TagStore::open(&db_path)?;

    let seeded = if examples { store.seed_examples()? } else { 0 };

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "config": cli.config.display().to_string(),
                "config_created": created,
                "db": db_path.display().to_string(),
                "examples_seeded": seeded,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if created {
                println!("Wrote default config to {}", cli.config.display());
                println!("Set api_url and access_key before running `tagrank rank`.");
            } else {
                println!("Config already exists at {}", cli.config.display());
            }
            println!("Tag database at {}", db_path.display());
            if examples {
                println!("Seeded {} example record(s)", seeded);
            }
        }
    }

    Ok(())
}
