//! SQLite-backed tag-weight store
//!
//! Holds the `(tag, weight, siblings, comment)` rows that define user
//! preference. Pure data access; the ranking engine reads a snapshot via
//! [`TagStore::list_all`] and never mutates the store.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TagrankError};

/// One stored preference record.
///
/// `weight` is the score contribution for every file matching `tag`; it may
/// be negative. `None` means the record carries no explicit weight and the
/// engine substitutes its configured default. `siblings` and `comment` are
/// informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagWeight {
    pub tag: String,
    pub weight: Option<f64>,
    pub siblings: Option<String>,
    pub comment: Option<String>,
}

impl TagWeight {
    pub fn new(tag: impl Into<String>, weight: Option<f64>) -> Self {
        TagWeight {
            tag: tag.into(),
            weight,
            siblings: None,
            comment: None,
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tag_scores (
    tag TEXT NOT NULL,
    weight REAL,
    siblings TEXT,
    comment TEXT
);
CREATE INDEX IF NOT EXISTS idx_tag_scores_tag ON tag_scores(tag);
"#;

/// SQLite store of tag weights
#[derive(Debug)]
pub struct TagStore {
    conn: Connection,
}

impl TagStore {
    /// Open or create the store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            TagrankError::Other(format!("failed to open database at {}: {}", path.display(), e))
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| TagrankError::Other(format!("failed to create schema: {}", e)))?;
        Ok(TagStore { conn })
    }

    /// Read the full record set as a snapshot, in insertion order.
    ///
    /// The engine reads this once before issuing any remote queries so a run
    /// never observes a half-mutated store.
    pub fn list_all(&self) -> Result<Vec<TagWeight>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag, weight, siblings, comment FROM tag_scores ORDER BY rowid")?;
        let rows = stmt.query_map([], read_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Insert a new record. Duplicate tags are not rejected; mutation
    /// operations use first-match semantics when they exist.
    pub fn add(&self, record: &TagWeight) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tag_scores (tag, weight, siblings, comment) VALUES (?1, ?2, ?3, ?4)",
            params![record.tag, record.weight, record.siblings, record.comment],
        )?;
        Ok(())
    }

    /// Update the first record with the given tag, overwriting only the
    /// fields that are provided.
    pub fn update(
        &self,
        tag: &str,
        weight: Option<f64>,
        siblings: Option<String>,
        comment: Option<String>,
    ) -> Result<TagWeight> {
        let (rowid, existing) = self.first_match(tag)?;
        let merged = TagWeight {
            tag: existing.tag,
            weight: weight.or(existing.weight),
            siblings: siblings.or(existing.siblings),
            comment: comment.or(existing.comment),
        };
        self.conn.execute(
            "UPDATE tag_scores SET weight = ?2, siblings = ?3, comment = ?4 WHERE rowid = ?1",
            params![rowid, merged.weight, merged.siblings, merged.comment],
        )?;
        Ok(merged)
    }

    /// Delete the first record with the given tag
    pub fn remove(&self, tag: &str) -> Result<()> {
        let (rowid, _) = self.first_match(tag)?;
        self.conn
            .execute("DELETE FROM tag_scores WHERE rowid = ?1", params![rowid])?;
        Ok(())
    }

    /// Insert example records, skipping tags already present.
    ///
    /// Returns the number of rows inserted.
    pub fn seed_examples(&self) -> Result<usize> {
        let existing: Vec<String> = self.list_all()?.into_iter().map(|r| r.tag).collect();
        let mut inserted = 0;
        for (tag, weight, comment) in EXAMPLE_ROWS {
            if existing.iter().any(|t| t == tag) {
                continue;
            }
            self.conn.execute(
                "INSERT INTO tag_scores (tag, weight, siblings, comment) VALUES (?1, ?2, NULL, ?3)",
                params![tag, weight, comment],
            )?;
            inserted += 1;
        }
        Ok(inserted)
    }

    fn first_match(&self, tag: &str) -> Result<(i64, TagWeight)> {
        let mut stmt = self.conn.prepare(
            "SELECT rowid, tag, weight, siblings, comment FROM tag_scores \
             WHERE tag = ?1 ORDER BY rowid LIMIT 1",
        )?;
        let mut rows = stmt.query(params![tag])?;
        match rows.next()? {
            Some(row) => {
                let rowid: i64 = row.get(0)?;
                let record = TagWeight {
                    tag: row.get(1)?,
                    weight: lenient_weight(row, 2),
                    siblings: row.get(3)?,
                    comment: row.get(4)?,
                };
                Ok((rowid, record))
            }
            None => Err(TagrankError::TagNotFound {
                tag: tag.to_string(),
            }),
        }
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<TagWeight> {
    Ok(TagWeight {
        tag: row.get(0)?,
        weight: lenient_weight(row, 1),
        siblings: row.get(2)?,
        comment: row.get(3)?,
    })
}

/// Read a weight column leniently.
///
/// The column is declared REAL but SQLite does not enforce the affinity, so
/// hand-edited databases can carry TEXT there. A non-numeric weight is
/// treated as unset rather than aborting the run.
fn lenient_weight(row: &Row<'_>, idx: usize) -> Option<f64> {
    match row.get_ref(idx) {
        Ok(ValueRef::Real(f)) => Some(f),
        Ok(ValueRef::Integer(i)) => Some(i as f64),
        Ok(ValueRef::Null) => None,
        Ok(other) => {
            tracing::warn!(value = ?other, "non-numeric weight in store, using default");
            None
        }
        Err(_) => None,
    }
}

/// Example data mirroring a typical preference table, used by `init --examples`
const EXAMPLE_ROWS: &[(&str, Option<f64>, Option<&str>)] = &[
    (
        "science fiction",
        Some(0.2),
        Some("give positive score to things you like"),
    ),
    ("computer", Some(0.1), None),
    (
        "blood",
        Some(-1.0),
        Some("go negative for things you dislike, high enough that good tags cannot balance it"),
    ),
    ("monochrome", Some(-0.1), None),
    ("greyscale", Some(-0.1), None),
    (
        "system:has audio",
        Some(0.1),
        Some("system predicates work as quality signals"),
    ),
    ("system:ratio = 16:9", Some(0.1), Some("fits the screen well")),
    ("system:width = 3,840", Some(0.1), Some("prefer 4k files")),
    ("system:height = 2,160", Some(0.1), Some("prefer 4k files")),
    ("system:has transparency", Some(-0.1), None),
];
