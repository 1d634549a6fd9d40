//! Turns the portal's result fragment into a canonical [`CaseRecord`].
//!
//! The portal emits a semi-structured details page: a handful of fixed
//! tables located by class or id, with free-text labels and uneven cell
//! layouts. Individual missing fields never fail extraction; only a page
//! whose expected containers are entirely absent is reported as malformed.

use scraper::{ElementRef, Html, Selector};

use crate::dates::parse_portal_date;
use crate::model::{CaseRecord, HistoryEntry, IaEntry, TransferEntry, CNR_LENGTH};

/// Literal marker the portal embeds when a CNR has no record. This is the
/// only terminal not-found signal; anything else structurally wrong is
/// treated as a malformed page.
pub const CASE_NOT_FOUND_MARKER: &str = "This Case Code does not exists";

const DETAILS_HEADING_MARKER: &str = "Case Details";

const IA_DEFAULT_CLASSIFICATION: &str = "General";

#[derive(Debug)]
pub enum ExtractOutcome {
    NotFound,
    Malformed { reason: String },
    Record(Box<CaseRecord>),
}

pub fn extract_case_details(html: &str) -> ExtractOutcome {
    if html.contains(CASE_NOT_FOUND_MARKER) {
        return ExtractOutcome::NotFound;
    }
    if !html.contains(DETAILS_HEADING_MARKER) {
        return ExtractOutcome::Malformed {
            reason: "case details heading missing".to_string(),
        };
    }

    let document = Html::parse_fragment(html);

    let details_selector = Selector::parse("table.case_details_table").unwrap();
    let Some(details_table) = document.select(&details_selector).next() else {
        return ExtractOutcome::Malformed {
            reason: "case details table missing".to_string(),
        };
    };

    let mut record = CaseRecord::default();

    let heading_selector = Selector::parse("h2#chHeading").unwrap();
    record.court_name = document
        .select(&heading_selector)
        .next()
        .map(collected_text)
        .filter(|text| !text.is_empty());

    scan_details_table(details_table, &mut record);

    if let Some(table) = select_table(&document, "table.case_status_table") {
        scan_status_table(table, &mut record);
    }

    if let Some(table) = select_table(&document, "table.Petitioner_Advocate_table") {
        let (name, advocate) = scan_party_table(table);
        record.petitioner_name = name;
        record.petitioner_advocate = advocate;
    }
    if let Some(table) = select_table(&document, "table.Respondent_Advocate_table") {
        let (name, advocate) = scan_party_table(table);
        record.respondent_name = name;
        record.respondent_advocate = advocate;
    }

    if let Some(table) = select_table(&document, "table#act_table") {
        let (acts, sections) = scan_acts_table(table);
        record.acts = acts;
        record.sections = sections;
    }

    if let Some(table) = select_table(&document, "table.history_table") {
        record.history = scan_history_table(table);
    }
    if let Some(table) = select_table(&document, "table.transfer_table") {
        record.transfers = scan_transfer_table(table);
    }
    if let Some(table) = select_table(&document, "table.IAheading") {
        record.ias = scan_ia_table(table);
    }

    if record.case_status.as_deref() == Some("Case disposed") {
        record.disposal_date = record.decision_date;
    }

    ExtractOutcome::Record(Box::new(record))
}

fn select_table<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).unwrap();
    document.select(&selector).next()
}

/// Descendant text concatenated and whitespace-collapsed, the portal's
/// markup being littered with nbsp padding and nested inline tags.
fn collected_text(element: ElementRef<'_>) -> String {
    let joined: String = element.text().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let cell_selector = Selector::parse("td").unwrap();
    row.select(&cell_selector).collect()
}

fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let row_selector = Selector::parse("tr").unwrap();
    table.select(&row_selector).collect()
}

fn scan_details_table(table: ElementRef<'_>, record: &mut CaseRecord) {
    for row in table_rows(table) {
        let cells = row_cells(row);
        if cells.len() < 2 {
            continue;
        }
        let label = collected_text(cells[0]).to_lowercase();
        let value = collected_text(cells[1]);

        if label.contains("case type") {
            record.case_type = non_empty(value);
        } else if label.contains("filing number") {
            record.filing_number = non_empty(value);
            if cells.len() >= 4 {
                record.filing_date = parse_portal_date(&collected_text(cells[3]));
            }
        } else if label.contains("registration number") {
            record.registration_number = non_empty(value);
            if cells.len() >= 4 {
                record.registration_date = parse_portal_date(&collected_text(cells[3]));
            }
        } else if label.contains("cnr number") {
            // Trailing annotation text follows the identifier in the same cell.
            let truncated: String = value.chars().take(CNR_LENGTH).collect();
            if !truncated.is_empty() {
                record.cnr = truncated;
            }
        }
    }
}

fn scan_status_table(table: ElementRef<'_>, record: &mut CaseRecord) {
    for row in table_rows(table) {
        let cells = row_cells(row);
        if cells.len() < 2 {
            continue;
        }
        let label = collected_text(cells[0]).to_lowercase();
        let value = collected_text(cells[1]);

        if label.contains("first hearing date") {
            record.first_hearing_date = parse_portal_date(&value);
        } else if label.contains("decision date") {
            record.decision_date = parse_portal_date(&value);
        } else if label.contains("case status") {
            record.case_status = non_empty(value);
        } else if label.contains("nature of disposal") {
            record.disposal_nature = non_empty(value);
        } else if label.contains("court number and judge") {
            record.court_number_and_judge = non_empty(value);
        }
    }
}

/// Party tables carry one cell per row with the litigant name and an
/// optional "Advocate-" suffix introducing counsel.
fn scan_party_table(table: ElementRef<'_>) -> (Option<String>, Option<String>) {
    for row in table_rows(table) {
        let cells = row_cells(row);
        let Some(cell) = cells.first() else {
            continue;
        };
        let text = collected_text(*cell);
        if text.is_empty() {
            continue;
        }
        return match text.split_once("Advocate-") {
            Some((name, advocate)) => (
                non_empty(name.trim().to_string()),
                non_empty(advocate.trim().to_string()),
            ),
            None => (Some(text), None),
        };
    }
    (None, None)
}

/// Acts and sections are two parallel ordered lists; a shorter sections
/// list means the trailing acts have no section. Zipping happens at
/// persistence, not here.
fn scan_acts_table(table: ElementRef<'_>) -> (Vec<String>, Vec<String>) {
    let mut acts = Vec::new();
    let mut sections = Vec::new();

    for row in table_rows(table).into_iter().skip(1) {
        let cells = row_cells(row);
        if cells.len() < 2 {
            continue;
        }
        // The portal suffixes act names with a stray backslash.
        let act = collected_text(cells[0])
            .trim_end_matches('\\')
            .trim()
            .to_string();
        let section = collected_text(cells[1]);
        if !act.is_empty() {
            acts.push(act);
        }
        if !section.is_empty() {
            sections.push(section);
        }
    }

    (acts, sections)
}

fn scan_history_table(table: ElementRef<'_>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();

    for row in table_rows(table).into_iter().skip(1) {
        let cells = row_cells(row);
        if cells.len() < 4 {
            continue;
        }
        let judge = collected_text(cells[0]);
        let business_date_raw = collected_text(cells[1]);
        let hearing_date_raw = collected_text(cells[2]);
        let purpose = collected_text(cells[3]);

        if judge.is_empty()
            && business_date_raw.is_empty()
            && hearing_date_raw.is_empty()
            && purpose.is_empty()
        {
            continue;
        }

        entries.push(HistoryEntry {
            judge,
            business_date: parse_portal_date(&business_date_raw),
            hearing_date: parse_portal_date(&hearing_date_raw),
            purpose,
        });
    }

    entries
}

fn scan_transfer_table(table: ElementRef<'_>) -> Vec<TransferEntry> {
    let mut entries = Vec::new();

    for row in table_rows(table).into_iter().skip(1) {
        let cells = row_cells(row);
        if cells.len() < 4 {
            continue;
        }
        entries.push(TransferEntry {
            registration_number: collected_text(cells[0]),
            transfer_date: parse_portal_date(&collected_text(cells[1])),
            from_court: collected_text(cells[2]),
            to_court: collected_text(cells[3]),
        });
    }

    entries
}

fn scan_ia_table(table: ElementRef<'_>) -> Vec<IaEntry> {
    let mut entries = Vec::new();

    for row in table_rows(table).into_iter().skip(1) {
        let cells = row_cells(row);
        if cells.len() < 5 {
            continue;
        }
        let next_date_and_purpose = collected_text(cells[3]);
        let (next_date_raw, purpose) = split_next_date_and_purpose(&next_date_and_purpose);

        entries.push(IaEntry {
            ia_no: collected_text(cells[0]),
            party: collected_text(cells[1]),
            filing_date: parse_portal_date(&collected_text(cells[2])),
            next_date: parse_portal_date(&next_date_raw),
            purpose,
            status: collected_text(cells[4]),
            classification: IA_DEFAULT_CLASSIFICATION.to_string(),
        });
    }

    entries
}

/// The IA table folds "next date" and "(purpose)" into one cell.
fn split_next_date_and_purpose(combined: &str) -> (String, String) {
    match combined.split_once('(') {
        Some((date, purpose)) => (
            date.trim().to_string(),
            purpose.trim_end_matches(')').trim().to_string(),
        ),
        None => (combined.trim().to_string(), String::new()),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn not_found_marker_short_circuits_table_parsing() {
        let html = format!(
            "<div><span>{CASE_NOT_FOUND_MARKER}</span>\
             <table class=\"case_details_table\"><tr><td>Case Type</td><td>OP</td></tr></table></div>"
        );
        assert!(matches!(
            extract_case_details(&html),
            ExtractOutcome::NotFound
        ));
    }

    #[test]
    fn page_without_details_heading_is_malformed() {
        let html = "<div><p>Something else entirely</p></div>";
        assert!(matches!(
            extract_case_details(html),
            ExtractOutcome::Malformed { .. }
        ));
    }

    #[test]
    fn recognized_page_without_details_table_is_malformed() {
        let html = "<div><h3>Case Details</h3><p>no tables</p></div>";
        assert!(matches!(
            extract_case_details(html),
            ExtractOutcome::Malformed { .. }
        ));
    }

    #[test]
    fn details_rows_map_labels_to_adjacent_cells() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\">\
            <tr><td>Case Type</td><td>RCP - RENT CONTROL PETITION</td></tr>\
            <tr><td>Filing Number</td><td>1/2019</td><td>Filing Date</td><td>01-01-2019</td></tr>\
            <tr><td>CNR Number</td><td>KLKN220000012019 (Note the CNR number)</td></tr>\
            </table></div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(
            record.case_type.as_deref(),
            Some("RCP - RENT CONTROL PETITION")
        );
        assert_eq!(record.filing_number.as_deref(), Some("1/2019"));
        assert_eq!(record.filing_date, NaiveDate::from_ymd_opt(2019, 1, 1));
        assert_eq!(record.cnr, "KLKN220000012019");
    }

    #[test]
    fn missing_individual_fields_do_not_fail_extraction() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\">\
            <tr><td>Filing Number</td><td>9/2021</td></tr>\
            </table></div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(record.filing_number.as_deref(), Some("9/2021"));
        assert!(record.filing_date.is_none());
        assert!(record.case_type.is_none());
        assert!(record.history.is_empty());
    }

    #[test]
    fn disposal_date_mirrors_decision_date_for_disposed_cases() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\">\
            <tr><td>CNR Number</td><td>KLKN220000012019</td></tr></table>\
            <table class=\"case_status_table\">\
            <tr><td>Decision Date</td><td>22nd October 2021</td></tr>\
            <tr><td>Case Status</td><td>Case disposed</td></tr>\
            </table></div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(record.decision_date, NaiveDate::from_ymd_opt(2021, 10, 22));
        assert_eq!(record.disposal_date, record.decision_date);
    }

    #[test]
    fn acts_strip_trailing_backslash_and_stay_parallel() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\"><tr><td>CNR Number</td><td>KLKN220000012019</td></tr></table>\
            <table id=\"act_table\" class=\"acts_table\">\
            <tr><th>Under Act(s)</th><th>Under Section(s)</th></tr>\
            <tr><td>Procedure Code  \\</td><td>Sec.5</td></tr>\
            <tr><td>Rent Control Act</td><td></td></tr>\
            </table></div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(record.acts, vec!["Procedure Code", "Rent Control Act"]);
        assert_eq!(record.sections, vec!["Sec.5"]);
    }

    #[test]
    fn party_cell_splits_on_advocate_marker() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\"><tr><td>CNR Number</td><td>KLKN220000012019</td></tr></table>\
            <table class=\"Petitioner_Advocate_table\">\
            <tr><td>1) Sujatha, Mattannur desom<br>Advocate- K.Rajeevan</td></tr></table>\
            <table class=\"Respondent_Advocate_table\">\
            <tr><td>1) Akolath Ramesan, Peravoor desom</td></tr></table>\
            </div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(
            record.petitioner_name.as_deref(),
            Some("1) Sujatha, Mattannur desom")
        );
        assert_eq!(record.petitioner_advocate.as_deref(), Some("K.Rajeevan"));
        assert_eq!(
            record.respondent_name.as_deref(),
            Some("1) Akolath Ramesan, Peravoor desom")
        );
        assert!(record.respondent_advocate.is_none());
    }

    #[test]
    fn all_empty_history_rows_are_dropped() {
        let html = "<div><h3>Case Details</h3>\
            <table class=\"case_details_table\"><tr><td>CNR Number</td><td>KLKN220000012019</td></tr></table>\
            <table class=\"history_table\">\
            <thead><tr><td>Judge</td><td>Business on Date</td><td>Hearing Date</td><td>Purpose</td></tr></thead>\
            <tbody>\
            <tr><td>MUNSIFF</td><td><a href=\"#\">13-02-2019</a></td><td>13-03-2019</td><td>For counter</td></tr>\
            <tr><td></td><td></td><td></td><td></td></tr>\
            </tbody></table></div>";
        let ExtractOutcome::Record(record) = extract_case_details(html) else {
            panic!("expected record");
        };
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.history[0].judge, "MUNSIFF");
        assert_eq!(
            record.history[0].business_date,
            NaiveDate::from_ymd_opt(2019, 2, 13)
        );
        assert_eq!(
            record.history[0].hearing_date,
            NaiveDate::from_ymd_opt(2019, 3, 13)
        );
        assert_eq!(record.history[0].purpose, "For counter");
    }

    #[test]
    fn ia_next_date_cell_splits_on_first_parenthesis() {
        let (date, purpose) = split_next_date_and_purpose("14-07-2021 (Call on)");
        assert_eq!(date, "14-07-2021");
        assert_eq!(purpose, "Call on");

        let (date, purpose) = split_next_date_and_purpose("14-07-2021");
        assert_eq!(date, "14-07-2021");
        assert_eq!(purpose, "");
    }
}
