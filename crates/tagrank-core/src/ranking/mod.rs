//! Ranking engine: per-tag preference scores aggregated into a top-K list
//!
//! One remote query is issued per stored tag, sequentially; every file in a
//! result set accumulates that tag's weight. After all tags are processed the
//! accumulator is sorted by descending score and truncated. Ties are broken
//! by first-seen order, which makes a run deterministic for a fixed store and
//! provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, TagrankError};
use crate::provider::{FileId, SearchProvider};
use crate::store::TagWeight;

/// Weight substituted for records without an explicit score
pub const DEFAULT_SCORE: f64 = 0.1;

/// Constant filters merged into every query of a run.
///
/// Blacklist entries are stored un-negated; [`FilterSet::negated_blacklist`]
/// produces a fresh negated copy per run so the same set can be reused across
/// runs without double prefixing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
}

impl FilterSet {
    pub fn new(blacklist: Vec<String>, whitelist: Vec<String>) -> Self {
        FilterSet {
            blacklist,
            whitelist,
        }
    }

    /// Blacklist predicates in their negated (`-` prefixed) query form
    pub fn negated_blacklist(&self) -> Vec<String> {
        self.blacklist.iter().map(|t| format!("-{}", t)).collect()
    }

    /// Build the full query for one tag: `[tag] + negated blacklist + whitelist`
    pub fn build_query(&self, tag: &str) -> Vec<String> {
        let mut query = Vec::with_capacity(1 + self.blacklist.len() + self.whitelist.len());
        query.push(tag.to_string());
        query.extend(self.negated_blacklist());
        query.extend(self.whitelist.iter().cloned());
        query
    }
}

/// One entry of the final ranking
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedFile {
    pub file_id: FileId,
    pub score: f64,
}

/// What happened to the computed ranking after the scoring pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Files were pushed onto the destination page
    Delivered { count: usize },
    /// The named page does not exist; the ranking is still returned
    DestinationNotFound { name: String },
    /// Delivery was not attempted (dry run)
    Skipped,
}

/// Result of a full ranking run
#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport {
    pub ranked: Vec<RankedFile>,
    pub delivery: Delivery,
}

/// Aggregates per-tag scores across a provider's search results
pub struct RankingEngine<'a, P: SearchProvider + ?Sized> {
    provider: &'a P,
    default_score: f64,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, P: SearchProvider + ?Sized> RankingEngine<'a, P> {
    pub fn new(provider: &'a P, default_score: f64) -> Self {
        RankingEngine {
            provider,
            default_score,
            cancel: None,
        }
    }

    /// Install a cancellation flag, checked between tag iterations only so an
    /// interrupted run never leaves a partially attributed tag.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Score every stored tag and return the top `limit` files.
    ///
    /// `progress` is invoked after each tag's query completes with
    /// `(tags_done, tags_total)`. A failed query aborts the whole run; there
    /// are no partial results.
    pub fn rank(
        &self,
        tags: &[TagWeight],
        filters: &FilterSet,
        limit: usize,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Vec<RankedFile>> {
        // Negate once per run; the configured lists stay untouched
        let negated_blacklist = filters.negated_blacklist();

        // score and first-seen order per file
        let mut accumulator: HashMap<FileId, (f64, usize)> = HashMap::new();

        for (done, record) in tags.iter().enumerate() {
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::SeqCst) {
                    return Err(TagrankError::Interrupted);
                }
            }

            let weight = record.weight.unwrap_or(self.default_score);
            let mut query =
                Vec::with_capacity(1 + negated_blacklist.len() + filters.whitelist.len());
            query.push(record.tag.clone());
            query.extend(negated_blacklist.iter().cloned());
            query.extend(filters.whitelist.iter().cloned());
            let file_ids = self.provider.search_files(&query)?;

            tracing::debug!(
                tag = %record.tag,
                weight,
                matches = file_ids.len(),
                "tag_scored"
            );

            for file_id in file_ids {
                let order = accumulator.len();
                let entry = accumulator.entry(file_id).or_insert((0.0, order));
                entry.0 += weight;
            }

            progress(done + 1, tags.len());
        }

        let mut entries: Vec<(FileId, f64, usize)> = accumulator
            .into_iter()
            .map(|(file_id, (score, order))| (file_id, score, order))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });
        entries.truncate(limit);

        Ok(entries
            .into_iter()
            .map(|(file_id, score, _)| RankedFile { file_id, score })
            .collect())
    }

    /// Rank, then push the result onto the named destination page.
    ///
    /// A missing destination is recoverable: the ranking is computed and
    /// returned together with a [`Delivery::DestinationNotFound`] status so
    /// the caller can create the page and retry.
    pub fn archive(
        &self,
        tags: &[TagWeight],
        filters: &FilterSet,
        limit: usize,
        destination: &str,
        progress: impl FnMut(usize, usize),
    ) -> Result<RankingReport> {
        let ranked = self.rank(tags, filters, limit, progress)?;

        let Some(page) = self.provider.locate_destination(destination)? else {
            tracing::warn!(destination, "destination page not found, skipping delivery");
            return Ok(RankingReport {
                ranked,
                delivery: Delivery::DestinationNotFound {
                    name: destination.to_string(),
                },
            });
        };

        let file_ids: Vec<FileId> = ranked.iter().map(|f| f.file_id).collect();
        self.provider.deliver(&page, &file_ids)?;
        tracing::info!(destination, count = file_ids.len(), "ranking_delivered");

        Ok(RankingReport {
            ranked,
            delivery: Delivery::Delivered {
                count: file_ids.len(),
            },
        })
    }
}
