//! `tagrank rank` command - run the ranking engine
//!
//! Reads the tag-weight snapshot once, issues one search per tag, and pushes
//! the top of the ranking onto the destination page. Ctrl-C stops the run at
//! the next tag boundary so no tag is ever half-attributed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::cli::{Cli, OutputFormat};
use tagrank_core::config::Config;
use tagrank_core::error::{Result, TagrankError};
use tagrank_core::hydrus::HydrusClient;
use tagrank_core::ranking::{Delivery, RankingEngine, RankingReport};
use tagrank_core::store::TagStore;

/// Execute the rank command
pub fn execute(
    cli: &Cli,
    limit: Option<usize>,
    page: Option<&str>,
    access_key: Option<&str>,
    dry_run: bool,
    start: Instant,
) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let store = TagStore::open(&config.db_path(&cli.config))?;

    // One snapshot for the whole run
    let records = store.list_all()?;
    let filters = config.filters();
    let limit = limit.unwrap_or(config.limit);
    let page_name = page.unwrap_or(&config.page).to_string();
    let access_key = access_key.unwrap_or(&config.access_key).to_string();

    let client = HydrusClient::new(&config.api_url, access_key);

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %e, "failed to install interrupt handler");
    }

    let engine = RankingEngine::new(&client, config.default_score).with_cancel(cancel);

    let show_progress = !cli.quiet && cli.format == OutputFormat::Human;
    let progress = |done: usize, total: usize| {
        if show_progress {
            eprint!("\rscored {}/{} tags", done, total);
            if done == total {
                eprintln!();
            }
        }
    };

    let report = if dry_run {
        let ranked = engine.rank(&records, &filters, limit, progress)?;
        RankingReport {
            ranked,
            delivery: Delivery::Skipped,
        }
    } else {
        engine.archive(&records, &filters, limit, &page_name, progress)?
    };

    tracing::debug!(elapsed = ?start.elapsed(), files = report.ranked.len(), "rank_complete");
    print_report(cli, &report, &page_name)?;

    // Surface the missing page as a data error after the ranking is shown,
    // so the user can create the page and re-run
    if let Delivery::DestinationNotFound { name } = report.delivery {
        return Err(TagrankError::DestinationNotFound { name });
    }

    Ok(())
}

fn print_report(cli: &Cli, report: &RankingReport, page_name: &str) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let delivery = match &report.delivery {
                Delivery::Delivered { count } => {
                    serde_json::json!({ "status": "delivered", "page": page_name, "count": count })
                }
                Delivery::DestinationNotFound { name } => {
                    serde_json::json!({ "status": "destination_not_found", "page": name })
                }
                Delivery::Skipped => serde_json::json!({ "status": "skipped" }),
            };
            let output = serde_json::json!({
                "ranked": report.ranked,
                "delivery": delivery,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for file in &report.ranked {
                println!("{:>12}  {:+.3}", file.file_id, file.score);
            }
            if cli.quiet {
                return Ok(());
            }
            match &report.delivery {
                Delivery::Delivered { count } => {
                    eprintln!("delivered {} file(s) to page '{}'", count, page_name);
                }
                Delivery::DestinationNotFound { .. } => {
                    eprintln!("ranking computed but not delivered");
                }
                Delivery::Skipped => {
                    eprintln!("dry run: {} file(s) ranked", report.ranked.len());
                }
            }
        }
    }
    Ok(())
}
