//! Single-object detail aggregation.
//!
//! A detail record is assembled from five independent projections of one
//! object: summary, label, producers, classifications and references. Each
//! projection tolerates zero rows; any store error aborts the whole record.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::Row;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::{Result, VitrineError};
use crate::format::{strip_duplicate_header, Formatter};
use crate::grouper::ObjectHasher;
use crate::sentinel;
use crate::store::{Accessor, FromStoreRow};

lazy_static! {
    static ref LEADING_YEAR: Regex = Regex::new(r"^\s*(-?\d{1,4})").unwrap();
}

// ------------- Records -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub accession_no: Option<String>,
    pub date: Option<String>,
    pub places: Option<String>,
    pub departments: Option<String>,
}

impl FromStoreRow for Summary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            accession_no: row.get(0)?,
            date: row.get(1)?,
            places: row.get(2)?,
            departments: row.get(3)?,
        })
    }
}

/// Life span of an agent as years. Either side may be missing; years print
/// with at least four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    Years { begin: Option<i32>, end: Option<i32> },
    Unknown,
}

impl Timespan {
    pub fn from_dates(begin: Option<&str>, end: Option<&str>) -> Self {
        match (begin.and_then(year_of), end.and_then(year_of)) {
            (None, None) => Timespan::Unknown,
            (begin, end) => Timespan::Years { begin, end },
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Timespan::Unknown => write!(f, "{}", sentinel::UNKNOWN),
            Timespan::Years { begin, end } => {
                if let Some(begin) = begin {
                    write!(f, "{begin:04}")?;
                }
                write!(f, "-")?;
                if let Some(end) = end {
                    write!(f, "{end:04}")?;
                }
                Ok(())
            }
        }
    }
}

/// Extracts the year from a stored date, tolerating partial or free-form values.
pub fn year_of(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(stamp.year());
        }
    }
    LEADING_YEAR
        .captures(raw)
        .and_then(|captures| captures[1].parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    /// Every role the agent played, ascending and comma separated.
    pub part: Option<String>,
    pub name: Option<String>,
    pub timespan: Timespan,
    pub nationalities: Option<String>,
    pub begin_bce: Option<bool>,
    pub end_bce: Option<bool>,
}

// One row per agent and part; folded into one Production per agent.
struct ProductionRow {
    agent_id: i64,
    name: Option<String>,
    part: Option<String>,
    begin_date: Option<String>,
    end_date: Option<String>,
    begin_bce: Option<i64>,
    end_bce: Option<i64>,
    nationalities: Option<String>,
}

impl FromStoreRow for ProductionRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            agent_id: row.get(0)?,
            name: row.get(1)?,
            part: row.get(2)?,
            begin_date: row.get(3)?,
            end_date: row.get(4)?,
            begin_bce: row.get(5)?,
            end_bce: row.get(6)?,
            nationalities: row.get(7)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl FromStoreRow for Reference {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get(0)?,
            content: row.get(1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub object_id: i64,
    pub summary: Option<Summary>,
    pub label: Option<String>,
    pub producers: Vec<Production>,
    pub classifications: Vec<String>,
    pub references: Vec<Reference>,
}

/// Detail sections as pre-rendered text blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDetail {
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Produced By")]
    pub produced_by: String,
    #[serde(rename = "Classified As")]
    pub classified_as: String,
    #[serde(rename = "Information")]
    pub information: String,
}

// ------------- Projections -------------
const SUMMARY_SQL: &str = "
    select objects.accession_no,
        objects.date,
        (
            select group_concat(label, ', ' order by label asc)
            from (
                select distinct places.label as label
                from objects_places
                join places on objects_places.pl_id = places.id
                where objects_places.obj_id = ?1 and places.label is not null
            )
        ) as places,
        (
            select group_concat(name, ', ' order by name asc)
            from (
                select distinct departments.name as name
                from objects_departments
                join departments on objects_departments.dep_id = departments.id
                where objects_departments.obj_id = ?1 and departments.name is not null
            )
        ) as departments
    from objects
    where objects.id = ?1
";

const LABEL_SQL: &str = "
    select label
        from objects
        where id = ?1
";

const PRODUCERS_SQL: &str = "
    select agents.id,
        agents.name,
        nullif(trim(productions.part), '') as part,
        agents.begin_date,
        agents.end_date,
        agents.begin_bce,
        agents.end_bce,
        (
            select group_concat(descriptor, ', ' order by descriptor asc)
            from (
                select distinct nationalities.descriptor as descriptor
                from agents_nationalities
                join nationalities on agents_nationalities.nat_id = nationalities.id
                where agents_nationalities.agt_id = agents.id
                    and nationalities.descriptor is not null
            )
        ) as nationalities
    from productions
    join agents on productions.agt_id = agents.id
    where productions.obj_id = ?1
    order by agents.name asc, part asc, agents.id asc
";

const CLASSIFICATIONS_SQL: &str = "
    select name
    from (
        select distinct classifiers.name as name
        from objects_classifiers
        join classifiers on objects_classifiers.cls_id = classifiers.id
        where objects_classifiers.obj_id = ?1 and classifiers.name is not null
    )
    order by lower(name) asc, name asc
";

const REFERENCES_SQL: &str = r#"
    select type, content
        from "references"
        where obj_id = ?1
        order by rowid asc
"#;

fn fold_producers(rows: Vec<ProductionRow>) -> Vec<Production> {
    let mut order: Vec<(i64, Production, Vec<String>)> = Vec::new();
    let mut index: HashMap<i64, usize, ObjectHasher> = HashMap::default();
    for row in rows {
        let position = match index.get(&row.agent_id) {
            Some(position) => *position,
            None => {
                let production = Production {
                    part: None,
                    name: row.name.clone(),
                    timespan: Timespan::from_dates(
                        row.begin_date.as_deref(),
                        row.end_date.as_deref(),
                    ),
                    nationalities: row.nationalities.clone(),
                    begin_bce: row.begin_bce.map(|flag| flag != 0),
                    end_bce: row.end_bce.map(|flag| flag != 0),
                };
                order.push((row.agent_id, production, Vec::new()));
                index.insert(row.agent_id, order.len() - 1);
                order.len() - 1
            }
        };
        let parts = &mut order[position].2;
        if let Some(part) = row.part {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }
    }
    order
        .into_iter()
        .map(|(_, mut production, mut parts)| {
            parts.sort();
            production.part = (!parts.is_empty()).then(|| parts.join(", "));
            production
        })
        .collect()
}

/// Builds the detail record for one object, or `NotFound` when it does not exist.
pub fn detail(accessor: &Accessor, object_id: i64) -> Result<DetailRecord> {
    if !accessor.object_exists(object_id)? {
        return Err(VitrineError::NotFound { id: object_id.to_string() });
    }
    let summary = accessor.fetch_optional::<Summary, _>(SUMMARY_SQL, [object_id])?;
    let label = accessor
        .fetch_optional::<Option<String>, _>(LABEL_SQL, [object_id])?
        .flatten();
    let producers = fold_producers(accessor.fetch_all(PRODUCERS_SQL, [object_id])?);
    let classifications = accessor.fetch_all::<String, _>(CLASSIFICATIONS_SQL, [object_id])?;
    let references = accessor.fetch_all::<Reference, _>(REFERENCES_SQL, [object_id])?;
    debug!(
        object_id,
        producers = producers.len(),
        classifications = classifications.len(),
        references = references.len(),
        "assembled detail record"
    );
    Ok(DetailRecord {
        object_id,
        summary,
        label,
        producers,
        classifications,
        references,
    })
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| sentinel::NOT_AVAILABLE.to_string())
}

impl DetailRecord {
    pub fn render(&self, formatter: &dyn Formatter) -> RenderedDetail {
        let summary = match &self.summary {
            Some(summary) => formatter.render(
                &["Accession Number", "Date", "Places", "Department"],
                &[vec![
                    or_na(&summary.accession_no),
                    or_na(&summary.date),
                    or_na(&summary.places),
                    or_na(&summary.departments),
                ]],
                "tttt",
            ),
            None => sentinel::NO_SUMMARY.to_string(),
        };
        let label = formatter.render(
            &["Label"],
            &[vec![self.label.clone().unwrap_or_else(|| sentinel::NO_LABEL.to_string())]],
            "w",
        );
        let produced_by = if self.producers.is_empty() {
            sentinel::NO_PRODUCTION.to_string()
        } else {
            let rows: Vec<Vec<String>> = self
                .producers
                .iter()
                .map(|p| {
                    vec![
                        or_na(&p.part),
                        or_na(&p.name),
                        p.timespan.to_string(),
                        or_na(&p.nationalities),
                    ]
                })
                .collect();
            formatter.render(&["Part", "Name", "Timespan", "Nationalities"], &rows, "wwww")
        };
        let classified_as = if self.classifications.is_empty() {
            sentinel::NO_CLASSIFICATION.to_string()
        } else {
            let rows: Vec<Vec<String>> =
                self.classifications.iter().map(|c| vec![c.clone()]).collect();
            formatter.render(&["Classified As"], &rows, "w")
        };
        let information = if self.references.is_empty() {
            sentinel::NO_INFORMATION.to_string()
        } else {
            let rows: Vec<Vec<String>> = self
                .references
                .iter()
                .map(|r| vec![or_na(&r.kind), or_na(&r.content)])
                .collect();
            formatter.render(&["Type", "Content"], &rows, "ww")
        };
        RenderedDetail {
            summary: strip_duplicate_header(&summary),
            label: strip_duplicate_header(&label),
            produced_by: strip_duplicate_header(&produced_by),
            classified_as: strip_duplicate_header(&classified_as),
            information: strip_duplicate_header(&information),
        }
    }
}
