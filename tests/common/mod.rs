#![allow(dead_code)]

use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA: &str = r#"
create table objects (id integer primary key, accession_no text, label text, date text);
create table agents (id integer primary key, name text, begin_date text, end_date text, begin_bce integer, end_bce integer);
create table productions (obj_id integer, agt_id integer, part text);
create table classifiers (id integer primary key, name text);
create table objects_classifiers (obj_id integer, cls_id integer);
create table places (id integer primary key, label text);
create table objects_places (obj_id integer, pl_id integer);
create table departments (id integer primary key, name text);
create table objects_departments (obj_id integer, dep_id integer);
create table nationalities (id integer primary key, descriptor text);
create table agents_nationalities (agt_id integer, nat_id integer);
create table "references" (obj_id integer, type text, content text);
"#;

// 1 Blue Bowl: one potter, one classifier, two references
// 2 Bowl of Fruit: one painter, one classifier
// 3 Portrait of a Lady: one agent in two parts, unclassified
// 4 Teapot: two producers, three classifiers
// 5 nothing but an id
pub const SEED: &str = r#"
insert into objects values
    (1, '1950.1', 'Blue Bowl', '1900'),
    (2, '1961.7', 'Bowl of Fruit', '1875'),
    (3, '1977.3', 'Portrait of a Lady', '1780'),
    (4, '1930.12', 'Teapot', '1760'),
    (5, null, null, null);
insert into agents values
    (1, 'Ann Potter', '1870-01-01', '1940-12-31', 0, 0),
    (2, 'Claude Still', '1840-05-01', null, 0, null),
    (3, 'John Singleton Copley', '1738-07-03', '1815-09-09', 0, 0),
    (4, 'Paul Revere', '1734-12-21', '1818-05-10', 0, 0),
    (5, 'Revere Workshop', null, null, null, null);
insert into productions values
    (1, 1, 'potter'),
    (2, 2, 'painter'),
    (3, 3, 'painter'),
    (3, 3, 'frame maker'),
    (4, 4, 'maker'),
    (4, 5, 'workshop');
insert into classifiers values
    (1, 'bowls'), (2, 'ceramics'), (3, 'paintings'),
    (4, 'Silver'), (5, 'metalwork'), (6, 'Containers');
insert into objects_classifiers values
    (1, 1), (2, 3), (4, 4), (4, 5), (4, 6);
insert into places values (1, 'New Haven'), (2, 'Boston');
insert into objects_places values (1, 1), (4, 2);
insert into departments values (1, 'Decorative Arts'), (2, 'Paintings and Sculpture');
insert into objects_departments values (1, 1), (2, 2), (3, 2), (4, 1);
insert into nationalities values (1, 'American'), (2, 'French'), (3, 'Belgian'), (4, 'British');
insert into agents_nationalities values (1, 1), (2, 2), (2, 3), (3, 1), (3, 4), (4, 1);
insert into "references" values
    (1, 'Inscription', 'Signed on base'),
    (1, 'Provenance', 'Gift of the artist'),
    (4, 'Exhibition', 'Colonial Silver, 1920');
"#;

pub fn seed(connection: &Connection) {
    connection.execute_batch(SCHEMA).expect("schema");
    connection.execute_batch(SEED).expect("seed");
}

pub fn seeded() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory db");
    seed(&connection);
    connection
}

/// Seeds a database file and closes the writer so readers see committed data.
pub fn seeded_file(path: &Path) {
    let connection = Connection::open(path).expect("file db");
    seed(&connection);
}

pub fn seeded_temp_file() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".sqlite").tempfile().expect("temp file");
    seeded_file(file.path());
    file
}
