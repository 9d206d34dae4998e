//! Request-scoped entry points for search and detail.
//!
//! A [`Catalog`] only knows where the collection lives. Each call opens its
//! own read-only connection, runs to completion and drops the connection
//! before returning, whichever way it returns.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::aggregate::{fetch_rows, DEFAULT_RESULT_LIMIT};
use crate::detail::{detail, DetailRecord};
use crate::error::Result;
use crate::grouper::{group, LogicalSearchRecord};
use crate::predicate::{compile, SearchCriteria};
use crate::store::{open_read_only, Accessor};

#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
    result_limit: usize,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), result_limit: DEFAULT_RESULT_LIMIT }
    }
    pub fn with_result_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit;
        self
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn connect(&self) -> Result<Connection> {
        open_read_only(&self.path)
    }
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<LogicalSearchRecord>> {
        let connection = self.connect()?;
        search_with(&connection, criteria, self.result_limit)
    }
    pub fn detail(&self, object_id: i64) -> Result<DetailRecord> {
        let connection = self.connect()?;
        detail(&Accessor::new(&connection), object_id)
    }
}

/// Search over a caller-provided connection.
pub fn search_with(
    connection: &Connection,
    criteria: &SearchCriteria,
    limit: usize,
) -> Result<Vec<LogicalSearchRecord>> {
    let filter = compile(criteria);
    let rows = fetch_rows(&Accessor::new(connection), &filter, limit)?;
    let row_count = rows.len();
    let records = group(rows);
    debug!(rows = row_count, records = records.len(), "grouped search rows");
    Ok(records)
}
