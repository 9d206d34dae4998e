mod common;

use vitrine::detail::{detail, DetailRecord, Timespan};
use vitrine::format::Grid;
use vitrine::sentinel;
use vitrine::store::Accessor;
use vitrine::VitrineError;

fn detail_of(object_id: i64) -> DetailRecord {
    let connection = common::seeded();
    detail(&Accessor::new(&connection), object_id).unwrap()
}

#[test]
fn full_record() {
    let record = detail_of(1);
    assert_eq!(record.object_id, 1);

    let summary = record.summary.as_ref().unwrap();
    assert_eq!(summary.accession_no.as_deref(), Some("1950.1"));
    assert_eq!(summary.date.as_deref(), Some("1900"));
    assert_eq!(summary.places.as_deref(), Some("New Haven"));
    assert_eq!(summary.departments.as_deref(), Some("Decorative Arts"));

    assert_eq!(record.label.as_deref(), Some("Blue Bowl"));

    assert_eq!(record.producers.len(), 1);
    let potter = &record.producers[0];
    assert_eq!(potter.name.as_deref(), Some("Ann Potter"));
    assert_eq!(potter.part.as_deref(), Some("potter"));
    assert_eq!(potter.timespan, Timespan::Years { begin: Some(1870), end: Some(1940) });
    assert_eq!(potter.nationalities.as_deref(), Some("American"));
    assert_eq!(potter.begin_bce, Some(false));

    assert_eq!(record.classifications, vec!["bowls"]);

    let kinds: Vec<_> = record.references.iter().map(|r| r.kind.as_deref()).collect();
    assert_eq!(kinds, vec![Some("Inscription"), Some("Provenance")]);
}

#[test]
fn one_production_per_agent() {
    let record = detail_of(3);
    assert_eq!(record.producers.len(), 1);
    let copley = &record.producers[0];
    assert_eq!(copley.part.as_deref(), Some("frame maker, painter"));
    assert_eq!(copley.timespan.to_string(), "1738-1815");
    assert_eq!(copley.nationalities.as_deref(), Some("American, British"));
}

#[test]
fn nationalities_and_open_spans() {
    let record = detail_of(2);
    let still = &record.producers[0];
    assert_eq!(still.nationalities.as_deref(), Some("Belgian, French"));
    assert_eq!(still.timespan.to_string(), "1840-");
    assert_eq!(still.end_bce, None);

    let record = detail_of(4);
    let names: Vec<_> = record.producers.iter().map(|p| p.name.as_deref()).collect();
    assert_eq!(names, vec![Some("Paul Revere"), Some("Revere Workshop")]);
    let workshop = &record.producers[1];
    assert_eq!(workshop.timespan, Timespan::Unknown);
    assert_eq!(workshop.nationalities, None);
    assert_eq!(record.classifications, vec!["Containers", "metalwork", "Silver"]);
}

#[test]
fn empty_sections_render_placeholders() {
    let rendered = detail_of(3).render(&Grid::default());
    assert_eq!(rendered.classified_as, sentinel::NO_CLASSIFICATION);
    assert_eq!(rendered.information, "No additional information available.");
    assert!(rendered.produced_by.contains("frame maker, painter"));

    let rendered = detail_of(5).render(&Grid::default());
    assert_eq!(rendered.produced_by, sentinel::NO_PRODUCTION);
    assert!(rendered.summary.contains("N/A"));
    assert_eq!(rendered.label, format!("{}\n{}", "-".repeat(18), sentinel::NO_LABEL));
}

#[test]
fn single_column_sections_drop_their_header() {
    let rendered = detail_of(1).render(&Grid::default());
    assert_eq!(rendered.label, "---------\nBlue Bowl");
    assert_eq!(rendered.classified_as, "-------------\nbowls");
    // multi-column sections keep theirs
    assert!(rendered.information.starts_with("Type"));
    assert!(rendered.information.contains("Signed on base"));
}

#[test]
fn rendered_sections_use_display_names() {
    let rendered = detail_of(4).render(&Grid::default());
    let json = serde_json::to_value(&rendered).unwrap();
    let object = json.as_object().unwrap();
    for key in ["Summary", "Label", "Produced By", "Classified As", "Information"] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert!(object["Summary"].as_str().unwrap().contains("Boston"));
}

#[test]
fn repeated_nationality_links_collapse() {
    let connection = common::seeded();
    connection
        .execute_batch("insert into agents_nationalities values (1, 1), (3, 4), (3, 4);")
        .unwrap();
    let accessor = Accessor::new(&connection);
    let potter = detail(&accessor, 1).unwrap();
    assert_eq!(potter.producers[0].nationalities.as_deref(), Some("American"));
    let portrait = detail(&accessor, 3).unwrap();
    assert_eq!(portrait.producers[0].nationalities.as_deref(), Some("American, British"));
}

#[test]
fn unknown_object_is_not_found() {
    let connection = common::seeded();
    let error = detail(&Accessor::new(&connection), 999).unwrap_err();
    assert!(matches!(error, VitrineError::NotFound { ref id } if id == "999"));
    assert_eq!(error.to_string(), "No object found with ID 999");
}

#[test]
fn store_failure_aborts_the_record() {
    let connection = common::seeded();
    connection.execute_batch(r#"drop table "references";"#).unwrap();
    let error = detail(&Accessor::new(&connection), 1).unwrap_err();
    assert!(matches!(error, VitrineError::Store(_)));
}
