use chrono::NaiveDate;

use super::*;
use crate::model::{HistoryEntry, IaEntry, TransferEntry};

fn sample_record() -> CaseRecord {
    CaseRecord {
        cnr: "KLKN220000012019".to_string(),
        court_name: Some("Munsiffs Court Kuthuparamba".to_string()),
        case_type: Some("RCP - RENT CONTROL PETITION".to_string()),
        filing_number: Some("1/2019".to_string()),
        filing_date: NaiveDate::from_ymd_opt(2019, 1, 1),
        registration_number: Some("3/2019".to_string()),
        registration_date: NaiveDate::from_ymd_opt(2019, 1, 23),
        case_status: Some("Case disposed".to_string()),
        first_hearing_date: NaiveDate::from_ymd_opt(2019, 2, 13),
        decision_date: NaiveDate::from_ymd_opt(2021, 10, 22),
        disposal_date: NaiveDate::from_ymd_opt(2021, 10, 22),
        disposal_nature: Some("Contested--PARTLY ALLOWED".to_string()),
        court_number_and_judge: Some("1-MUNSIFF".to_string()),
        petitioner_name: Some("1) Valiyavalappil Chakkarayan Sujatha".to_string()),
        petitioner_advocate: Some("K.Rajeevan".to_string()),
        respondent_name: Some("1) Akolath Ramesan".to_string()),
        respondent_advocate: None,
        acts: vec!["Procedure Code".to_string(), "Rent Control Act 1965".to_string()],
        sections: vec!["Sec.5".to_string()],
        history: vec![HistoryEntry {
            judge: "MUNSIFF".to_string(),
            business_date: NaiveDate::from_ymd_opt(2019, 2, 13),
            hearing_date: NaiveDate::from_ymd_opt(2019, 3, 13),
            purpose: "For counter".to_string(),
        }],
        transfers: vec![TransferEntry {
            registration_number: "3/2019".to_string(),
            transfer_date: NaiveDate::from_ymd_opt(2020, 6, 1),
            from_court: "Munsiff Court I".to_string(),
            to_court: "Munsiff Court II".to_string(),
        }],
        ias: vec![IaEntry {
            ia_no: "IA/1/2021".to_string(),
            party: "Valiyavalappil Chakkarayan Sujatha".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2021, 3, 22),
            next_date: NaiveDate::from_ymd_opt(2021, 7, 14),
            purpose: "Call on".to_string(),
            status: "Disposed".to_string(),
            classification: "General".to_string(),
        }],
    }
}

fn count(store: &EntityStore, table: &str) -> i64 {
    store
        .connection
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn resolve_litigant_is_idempotent_across_interleaved_resolutions() {
    let store = EntityStore::open_in_memory().unwrap();
    let now = now_utc_string();

    let first = resolve_litigant(&store.connection, "1) Akolath Ramesan", &now)
        .unwrap()
        .unwrap();
    resolve_litigant(&store.connection, "Someone Else", &now).unwrap();
    resolve_advocate(&store.connection, "K.Rajeevan", &now).unwrap();
    let second = resolve_litigant(&store.connection, "1) Akolath Ramesan", &now)
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(count(&store, "litigants"), 2);
}

#[test]
fn resolve_act_collapses_formatting_but_keeps_bare_name_distinct() {
    let store = EntityStore::open_in_memory().unwrap();
    let now = now_utc_string();

    let with_year = resolve_act(&store.connection, "Procedure Code 1908", &now)
        .unwrap()
        .unwrap();
    let with_comma_year = resolve_act(&store.connection, "Procedure Code, 1908 \\", &now)
        .unwrap()
        .unwrap();
    let bare = resolve_act(&store.connection, "Procedure Code", &now)
        .unwrap()
        .unwrap();

    assert_eq!(with_year, with_comma_year);
    assert_ne!(with_year, bare);
    assert_eq!(count(&store, "acts"), 2);
}

#[test]
fn resolve_case_type_dedupes_on_short_form() {
    let store = EntityStore::open_in_memory().unwrap();
    let now = now_utc_string();

    let first = resolve_case_type(&store.connection, "RCP - RENT CONTROL PETITION", &now)
        .unwrap()
        .unwrap();
    let second = resolve_case_type(&store.connection, "RCP - RENT CONTROL PETITION", &now)
        .unwrap()
        .unwrap();
    assert_eq!(first, second);

    let expanded: Option<String> = store
        .connection
        .query_row(
            "SELECT expanded_form FROM case_types WHERE id = ?1",
            [first],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(expanded.as_deref(), Some("RENT CONTROL PETITION"));
}

#[test]
fn upsert_case_persists_record_with_children_and_typed_dates() {
    let mut store = EntityStore::open_in_memory().unwrap();
    let case_id = store.upsert_case(&sample_record()).unwrap();
    assert!(case_id > 0);

    assert_eq!(count(&store, "cases"), 1);
    assert_eq!(count(&store, "case_litigants"), 2);
    assert_eq!(count(&store, "case_acts"), 2);
    assert_eq!(count(&store, "case_history"), 1);
    assert_eq!(count(&store, "case_transfers"), 1);
    assert_eq!(count(&store, "case_ias"), 1);

    let filing_date: String = store
        .connection
        .query_row("SELECT filing_date FROM cases WHERE id = ?1", [case_id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(filing_date, "2019-01-01");

    let (state_name, district_name): (String, String) = store
        .connection
        .query_row(
            "SELECT s.name, d.name FROM courts c
             JOIN states s ON s.id = c.state_id
             JOIN districts d ON d.id = c.district_id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(state_name, "Kerala");
    assert_eq!(district_name, "Kannur");

    let hall: String = store
        .connection
        .query_row(
            "SELECT h.name FROM cases ca JOIN court_halls h ON h.id = ca.court_hall_id",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(hall, "1");

    // Second act has no aligned section.
    let act_section_ids: Vec<Option<i64>> = store
        .connection
        .prepare("SELECT act_section_id FROM case_acts ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(act_section_ids.len(), 2);
    assert!(act_section_ids[0].is_some());
    assert!(act_section_ids[1].is_none());
}

#[test]
fn duplicate_cnr_fails_and_leaves_no_new_child_rows() {
    let mut store = EntityStore::open_in_memory().unwrap();
    store.upsert_case(&sample_record()).unwrap();

    let history_before = count(&store, "case_history");
    let litigants_before = count(&store, "litigants");
    let junctions_before = count(&store, "case_litigants");

    let error = store.upsert_case(&sample_record()).unwrap_err();
    assert!(matches!(
        error,
        StoreError::DuplicateCase { ref cnr } if cnr == "KLKN220000012019"
    ));

    assert_eq!(count(&store, "cases"), 1);
    assert_eq!(count(&store, "case_history"), history_before);
    assert_eq!(count(&store, "litigants"), litigants_before);
    assert_eq!(count(&store, "case_litigants"), junctions_before);
}

#[test]
fn case_exists_reflects_upserts() {
    let mut store = EntityStore::open_in_memory().unwrap();
    assert!(!store.case_exists("KLKN220000012019").unwrap());
    store.upsert_case(&sample_record()).unwrap();
    assert!(store.case_exists("KLKN220000012019").unwrap());
    assert!(!store.case_exists("KLKN220000022019").unwrap());
}

#[test]
fn unknown_jurisdiction_codes_fall_back_to_the_code_itself() {
    let mut store = EntityStore::open_in_memory().unwrap();
    let mut record = sample_record();
    record.cnr = "ZZXX220000012019".to_string();
    store.upsert_case(&record).unwrap();

    let (state_name, district_name): (String, String) = store
        .connection
        .query_row(
            "SELECT s.name, d.name FROM states s JOIN districts d ON d.state_id = s.id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(state_name, "ZZ");
    assert_eq!(district_name, "XX");
}

#[test]
fn unparseable_court_hall_yields_no_hall_row() {
    let mut store = EntityStore::open_in_memory().unwrap();
    let mut record = sample_record();
    record.court_number_and_judge = Some("Principal Munsiff".to_string());
    let case_id = store.upsert_case(&record).unwrap();

    assert_eq!(count(&store, "court_halls"), 0);
    let hall_id: Option<i64> = store
        .connection
        .query_row(
            "SELECT court_hall_id FROM cases WHERE id = ?1",
            [case_id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(hall_id.is_none());
}

#[test]
fn invalid_cnr_is_rejected_before_any_insert() {
    let mut store = EntityStore::open_in_memory().unwrap();
    let mut record = sample_record();
    record.cnr = "short".to_string();
    assert!(matches!(
        store.upsert_case(&record),
        Err(StoreError::InvalidCnr { .. })
    ));
    assert_eq!(count(&store, "cases"), 0);
    assert_eq!(count(&store, "states"), 0);
}

#[test]
fn checkpoint_is_a_single_overwritten_row() {
    let store = EntityStore::open_in_memory().unwrap();
    assert!(store.checkpoint().unwrap().is_none());

    store.set_checkpoint("KLKN220000012019").unwrap();
    assert_eq!(
        store.checkpoint().unwrap().as_deref(),
        Some("KLKN220000012019")
    );

    store.set_checkpoint("KLKN220000022019").unwrap();
    assert_eq!(
        store.checkpoint().unwrap().as_deref(),
        Some("KLKN220000022019")
    );
    assert_eq!(count(&store, "checkpoint"), 1);
}

#[test]
fn checkpoint_survives_reopening_the_store() {
    let file = tempfile::NamedTempFile::new().unwrap();
    {
        let store = EntityStore::open(file.path()).unwrap();
        store.set_checkpoint("KLKN220000112019").unwrap();
    }
    let reopened = EntityStore::open(file.path()).unwrap();
    assert_eq!(
        reopened.checkpoint().unwrap().as_deref(),
        Some("KLKN220000112019")
    );
}
