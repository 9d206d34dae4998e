//! Search query composition.
//!
//! Every object is joined against two per-object aggregates, computed once per
//! object rather than per join row:
//! * `produced_by`: distinct `"name (part)"` entries, ordered by agent name and
//!   then part.
//! * `classified_as`: distinct classifier names, ordered case-insensitively.
//!
//! Both are joined with [`AGGREGATE_SEPARATOR`]. The outer query additionally
//! joins productions and agents so the agent filter can match any producer,
//! which yields one flat row per object and producer.

use rusqlite::{params_from_iter, Row};
use tracing::debug;

use crate::error::Result;
use crate::predicate::CompiledFilter;
use crate::sentinel;
use crate::store::{Accessor, FromStoreRow};

/// Separates entries within an aggregate column.
pub const AGGREGATE_SEPARATOR: char = '\n';

/// Flat rows returned when no explicit cap is configured.
pub const DEFAULT_RESULT_LIMIT: usize = 1000;

/// Largest cap SQLite accepts in a `LIMIT` clause.
pub const MAX_RESULT_LIMIT: usize = i64::MAX as usize;

/// One row of the search query. The aggregate columns carry the complete
/// aggregate for the object, repeated on every row of that object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatSearchRow {
    pub object_id: i64,
    pub label: Option<String>,
    pub date: Option<String>,
    pub produced_by: Option<String>,
    pub classified_as: Option<String>,
}

impl FromStoreRow for FlatSearchRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            object_id: row.get(0)?,
            label: row.get(1)?,
            date: row.get(2)?,
            produced_by: row.get(3)?,
            classified_as: row.get(4)?,
        })
    }
}

/// Assembles the full search statement around a compiled filter.
pub fn search_sql(filter: &CompiledFilter, limit: usize) -> String {
    format!(
        "
        with produced_data as (
            select obj_id as id,
                group_concat(
                    case
                        when part is null then name
                        else name || ' (' || part || ')'
                    end,
                    char(10) order by name asc, part asc
                ) as produced_by
            from (
                select distinct productions.obj_id as obj_id,
                    agents.name as name,
                    nullif(trim(productions.part), '') as part
                from productions
                join agents on productions.agt_id = agents.id
                where agents.name is not null
            )
            group by obj_id
        ),
        classified_data as (
            select objects.id,
                coalesce(grouped.classified_as, '{unclassified}') as classified_as
            from objects
            left join (
                select obj_id,
                    group_concat(name, char(10) order by lower(name) asc, name asc) as classified_as
                from (
                    select distinct objects_classifiers.obj_id as obj_id,
                        classifiers.name as name
                    from objects_classifiers
                    join classifiers on objects_classifiers.cls_id = classifiers.id
                    where classifiers.name is not null
                )
                group by obj_id
            ) as grouped on grouped.obj_id = objects.id
        )
        select objects.id,
            objects.label,
            objects.date,
            coalesce(produced_data.produced_by, '{unknown}') as produced_by,
            classified_data.classified_as
        from objects
        left join produced_data on objects.id = produced_data.id
        left join classified_data on objects.id = classified_data.id
        left join productions on objects.id = productions.obj_id
        left join agents on productions.agt_id = agents.id
        {where_sql}
        order by objects.label asc, objects.date asc, objects.id asc
        limit {limit}
        ",
        unclassified = sentinel::UNCLASSIFIED,
        unknown = sentinel::UNKNOWN,
        where_sql = filter.where_sql(),
        limit = limit.min(MAX_RESULT_LIMIT),
    )
}

/// Runs the compiled search and maps every row at the boundary.
pub fn fetch_rows(
    accessor: &Accessor,
    filter: &CompiledFilter,
    limit: usize,
) -> Result<Vec<FlatSearchRow>> {
    let sql = search_sql(filter, limit);
    debug!(params = filter.params.len(), limit, "running search query");
    accessor.fetch_all(&sql, params_from_iter(filter.params.iter()))
}
