//! Vitrine – faceted search and detail retrieval over a museum collection.
//!
//! The collection lives in a read-only SQLite database describing *objects*,
//! the *agents* that produced them (through *productions*, each carrying the
//! agent's part), their *classifiers*, places, departments and references.
//!
//! ## Search
//! A search takes up to four optional substring filters (date, agent,
//! classifier, label). The pipeline is:
//! * [`predicate`] – compiles the supplied filters into a parameterized clause.
//! * [`aggregate`] – runs that clause against per-object producer and
//!   classifier aggregates, producing flat rows (one per object and producer).
//! * [`grouper`] – folds flat rows into one [`grouper::LogicalSearchRecord`]
//!   per object, keeping first-seen order and dropping duplicate entries.
//!
//! ## Detail
//! [`detail`] assembles a [`detail::DetailRecord`] for one object from five
//! independent projections (summary, label, producers, classifications,
//! references). Unknown ids yield [`VitrineError::NotFound`].
//!
//! ## Rendering
//! [`format`] defines the [`format::Formatter`] contract (headers, rows and a
//! per-column wrap/truncate spec) with a plain text [`format::Grid`].
//! Missing values render as the placeholders in [`sentinel`].
//!
//! ## Serving
//! [`catalog::Catalog`] opens one read-only connection per call. The
//! [`server`] module exposes it over HTTP as JSON, configured through
//! [`config::Settings`].
//!
//! ## Quick Start
//! ```
//! use rusqlite::Connection;
//! use vitrine::{catalog::search_with, predicate::SearchCriteria};
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "create table objects (id integer primary key, accession_no text, label text, date text);
//!      create table agents (id integer primary key, name text);
//!      create table productions (obj_id integer, agt_id integer, part text);
//!      create table classifiers (id integer primary key, name text);
//!      create table objects_classifiers (obj_id integer, cls_id integer);
//!      insert into objects values (1, '1950.1', 'Blue Bowl', '1900');",
//! ).unwrap();
//! let found = search_with(&conn, &SearchCriteria::default().with_label("bowl"), 1000).unwrap();
//! assert_eq!(found[0].producers, vec!["Unknown"]);
//! ```

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod format;
pub mod grouper;
pub mod predicate;
pub mod sentinel;
pub mod server;
pub mod store;

pub use error::{Result, VitrineError};
