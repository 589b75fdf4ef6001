//! Search provider contract consumed by the ranking engine
//!
//! The engine only needs three operations from the remote side: search by a
//! list of predicates, resolve a named destination page, and push file ids
//! into it. The Hydrus adapter implements this against the real client API;
//! tests implement it in memory.

use crate::error::Result;

/// Opaque numeric file identifier assigned by the provider
pub type FileId = u64;

/// Opaque handle for a destination page on the remote side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey(String);

impl PageKey {
    pub fn new(key: impl Into<String>) -> Self {
        PageKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Remote file-search service used by the ranking engine
pub trait SearchProvider {
    /// Search for files matching all of the given predicates.
    ///
    /// Only set membership of the result matters; the provider's sort order
    /// carries no meaning for ranking.
    fn search_files(&self, query: &[String]) -> Result<Vec<FileId>>;

    /// Resolve a human-named destination page to its key.
    ///
    /// Returns `None` when no page with that name exists; this is not an
    /// error at the provider level.
    fn locate_destination(&self, name: &str) -> Result<Option<PageKey>>;

    /// Push the given files, in order, onto the destination page.
    fn deliver(&self, destination: &PageKey, file_ids: &[FileId]) -> Result<()>;
}
