//! `tagrank tag` commands - edit the stored tag weights
//!
//! Each mutation is persisted immediately; there is no batch mode. Mutations
//! key on the tag text and touch the first matching row when duplicates
//! exist.

use crate::cli::{Cli, OutputFormat, TagCommands};
use tagrank_core::config::Config;
use tagrank_core::error::Result;
use tagrank_core::store::{TagStore, TagWeight};

/// Execute a tag subcommand
pub fn execute(cli: &Cli, command: &TagCommands) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let store = TagStore::open(&config.db_path(&cli.config))?;

    match command {
        TagCommands::Add {
            tag,
            weight,
            siblings,
            comment,
        } => {
            let record = TagWeight {
                tag: tag.clone(),
                weight: *weight,
                siblings: siblings.clone(),
                comment: comment.clone(),
            };
            store.add(&record)?;
            print_record(cli, &record, "added")
        }

        TagCommands::List => list(cli, &store),

        TagCommands::Set {
            tag,
            weight,
            siblings,
            comment,
        } => {
            let merged = store.update(tag, *weight, siblings.clone(), comment.clone())?;
            print_record(cli, &merged, "updated")
        }

        TagCommands::Rm { tag } => {
            store.remove(tag)?;
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({ "status": "removed", "tag": tag });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Human => {
                    if !cli.quiet {
                        println!("removed {}", tag);
                    }
                }
            }
            Ok(())
        }
    }
}

fn list(cli: &Cli, store: &TagStore) -> Result<()> {
    let records = store.list_all()?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Human => {
            for record in &records {
                let weight = record
                    .weight
                    .map(|w| format!("{:+.2}", w))
                    .unwrap_or_else(|| "  -  ".to_string());
                match &record.comment {
                    Some(comment) => println!("{:>7}  {}  # {}", weight, record.tag, comment),
                    None => println!("{:>7}  {}", weight, record.tag),
                }
            }
            if !cli.quiet {
                eprintln!("{} record(s)", records.len());
            }
        }
    }

    Ok(())
}

fn print_record(cli: &Cli, record: &TagWeight, status: &str) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "status": status, "record": record });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                match record.weight {
                    Some(w) => println!("{} {} (weight {:+.2})", status, record.tag, w),
                    None => println!("{} {} (default weight)", status, record.tag),
                }
            }
        }
    }
    Ok(())
}
