// used for the read-only store
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Maps one result row onto a typed record. Implemented next to each record
/// type so positional column access never leaves the store boundary.
pub trait FromStoreRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

// Single-column projections.
impl FromStoreRow for String {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row.get(0)
    }
}
impl FromStoreRow for Option<String> {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row.get(0)
    }
}

/// Opens the collection database for reading. The handle is meant to live for
/// a single request and is closed when dropped.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    debug!(path = %path.display(), "opened read-only connection");
    Ok(connection)
}

// ------------- Accessor -------------
pub struct Accessor<'db> {
    pub db: &'db Connection,
}
impl<'db> Accessor<'db> {
    pub fn new(connection: &'db Connection) -> Accessor<'db> {
        Accessor { db: connection }
    }
    /// Direct probe on the objects table.
    pub fn object_exists(&self, object_id: i64) -> Result<bool> {
        let found = self
            .db
            .prepare_cached(
                "
                select 1
                    from objects
                    where id = ?
            ",
            )?
            .query_row([object_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
    pub fn fetch_all<T: FromStoreRow, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        let mut statement = self.db.prepare_cached(sql)?;
        let rows = statement
            .query_map(params, |row| T::from_row(row))?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(rows)
    }
    pub fn fetch_optional<T: FromStoreRow, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Option<T>> {
        let mut statement = self.db.prepare_cached(sql)?;
        let row = statement
            .query_row(params, |row| T::from_row(row))
            .optional()?;
        Ok(row)
    }
}
