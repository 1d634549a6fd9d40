use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d", "%d %B %Y", "%d-%b-%Y"];

fn ordinal_suffix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(\d+)(st|nd|rd|th)").expect("ordinal suffix regex"))
}

/// Parse a scraped date in any of the portal's formats. Ordinal suffixes
/// ("22nd October 2021") are stripped first. Absent or unparseable input
/// yields `None`, never an error.
pub fn parse_portal_date(input: &str) -> Option<NaiveDate> {
    let stripped = ordinal_suffix_regex().replace_all(input, "$1");
    let candidate = stripped.trim();
    if candidate.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
}
