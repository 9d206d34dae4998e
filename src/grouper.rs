//! Folds flat search rows into one logical record per object.
//!
//! Rows for the same object are not guaranteed to be adjacent in the sorted
//! stream, so grouping is keyed by object id. Output order is the order in
//! which each id was first seen; multi-valued fields keep first-seen order
//! and hold every distinct entry exactly once.

use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::aggregate::{FlatSearchRow, AGGREGATE_SEPARATOR};
use crate::sentinel;

pub type ObjectHasher = BuildHasherDefault<SeaHasher>;
pub type EntryHasher = BuildHasherDefault<SeaHasher>;

/// One merged search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalSearchRecord {
    pub id: i64,
    pub label: String,
    pub date: String,
    #[serde(rename = "agents")]
    pub producers: Vec<String>,
    #[serde(rename = "classifiers")]
    pub classifications: Vec<String>,
}

impl From<&LogicalSearchRecord> for FlatSearchRow {
    fn from(record: &LogicalSearchRecord) -> Self {
        let separator = AGGREGATE_SEPARATOR.to_string();
        FlatSearchRow {
            object_id: record.id,
            label: Some(record.label.clone()),
            date: Some(record.date.clone()),
            produced_by: Some(record.producers.join(&separator)),
            classified_as: Some(record.classifications.join(&separator)),
        }
    }
}

// An ordered list with a membership index so appends stay linear.
#[derive(Debug, Default)]
struct EntrySet {
    ordered: Vec<String>,
    seen: HashSet<String, EntryHasher>,
}
impl EntrySet {
    fn extend_from(&mut self, aggregate: &str) {
        for entry in split_entries(aggregate) {
            if !self.seen.contains(entry) {
                self.seen.insert(entry.to_string());
                self.ordered.push(entry.to_string());
            }
        }
    }
}

#[derive(Debug)]
struct PendingRecord {
    id: i64,
    label: String,
    date: String,
    producers: EntrySet,
    classifications: EntrySet,
}
impl PendingRecord {
    fn finish(self) -> LogicalSearchRecord {
        LogicalSearchRecord {
            id: self.id,
            label: self.label,
            date: self.date,
            producers: self.producers.ordered,
            classifications: self.classifications.ordered,
        }
    }
}

/// Splits an aggregate column into its individual, non-blank entries.
pub fn split_entries(aggregate: &str) -> impl Iterator<Item = &str> {
    aggregate
        .split(AGGREGATE_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Incremental grouper; feed rows with [`Grouper::push`] and collect with
/// [`Grouper::finish`].
#[derive(Debug, Default)]
pub struct Grouper {
    pending: Vec<PendingRecord>,
    index: HashMap<i64, usize, ObjectHasher>,
}

impl Grouper {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, row: FlatSearchRow) {
        let produced_by = row.produced_by.unwrap_or_else(|| sentinel::UNKNOWN.to_string());
        let classified_as = row
            .classified_as
            .unwrap_or_else(|| sentinel::UNCLASSIFIED.to_string());
        let position = match self.index.get(&row.object_id) {
            Some(position) => *position,
            None => {
                self.pending.push(PendingRecord {
                    id: row.object_id,
                    label: row.label.unwrap_or_else(|| sentinel::UNKNOWN.to_string()),
                    date: row.date.unwrap_or_else(|| sentinel::UNKNOWN.to_string()),
                    producers: EntrySet::default(),
                    classifications: EntrySet::default(),
                });
                self.index.insert(row.object_id, self.pending.len() - 1);
                self.pending.len() - 1
            }
        };
        let record = &mut self.pending[position];
        record.producers.extend_from(&produced_by);
        record.classifications.extend_from(&classified_as);
    }
    /// Number of distinct objects seen so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
    pub fn finish(self) -> Vec<LogicalSearchRecord> {
        self.pending.into_iter().map(PendingRecord::finish).collect()
    }
}

pub fn group<I: IntoIterator<Item = FlatSearchRow>>(rows: I) -> Vec<LogicalSearchRecord> {
    let mut grouper = Grouper::new();
    for row in rows {
        grouper.push(row);
    }
    grouper.finish()
}
