//! Cleaning of scraped free-text values before they become natural keys.
//! Reference rows are deduplicated on the cleaned form, so the same litigant
//! or act observed with different formatting noise resolves to one row.

use std::sync::OnceLock;

use regex::Regex;

fn ordinal_prefix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\d+[\s\)]+").expect("ordinal prefix regex"))
}

fn punctuation_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^\w\s]").expect("punctuation regex"))
}

fn court_hall_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^(\d+)\s*-\s*(.+)$").expect("court hall regex"))
}

/// Strip the ordinal/bullet prefix ("1 ", "2) ") and punctuation from a
/// litigant name and collapse whitespace. Yields `None` when nothing
/// survives cleaning.
pub fn clean_litigant_name(raw: &str) -> Option<String> {
    let without_prefix = ordinal_prefix_regex().replace(raw.trim(), "");
    let without_punctuation = punctuation_regex().replace_all(&without_prefix, " ");
    let collapsed = without_punctuation
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Canonicalize an act name: strip the portal's trailing backslash artifact
/// and fold an embedded trailing year into a single ", <year>" suffix, so
/// "Procedure Code 1908" and "Procedure Code, 1908" collapse while
/// "Procedure Code" stays distinct.
pub fn canonicalize_act_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_end_matches('\\').trim();
    if name.is_empty() {
        return None;
    }

    if let Some((head, tail)) = name.split_once(',') {
        let tail = tail.trim();
        if is_all_digits(tail) {
            return Some(format!("{}, {}", head.trim(), tail));
        }
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 1 && is_all_digits(words[words.len() - 1]) {
        return Some(format!(
            "{}, {}",
            words[..words.len() - 1].join(" "),
            words[words.len() - 1]
        ));
    }

    Some(words.join(" "))
}

/// Split "RCP - RENT CONTROL PETITION" into short and optional expanded
/// form on the first " - ".
pub fn split_case_type(raw: &str) -> (String, Option<String>) {
    match raw.split_once(" - ") {
        Some((short_form, expanded_form)) => (
            short_form.trim().to_string(),
            Some(expanded_form.trim().to_string()),
        ),
        None => (raw.trim().to_string(), None),
    }
}

/// Decompose "1-MUNSIFF" into the hall number and judge designation.
/// Anything not matching the leading-digits pattern yields neither.
pub fn split_court_hall(raw: &str) -> Option<(String, String)> {
    court_hall_regex().captures(raw.trim()).map(|captures| {
        (
            captures[1].to_string(),
            captures[2].trim().to_string(),
        )
    })
}

fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|character| character.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn litigant_cleaning_strips_prefix_and_punctuation() {
        assert_eq!(
            clean_litigant_name("1) Valiyavalappil Chakkarayan Sujatha, D/o Bhaskaran").as_deref(),
            Some("Valiyavalappil Chakkarayan Sujatha D o Bhaskaran")
        );
        assert_eq!(
            clean_litigant_name("2 Akolath   Ramesan").as_deref(),
            Some("Akolath Ramesan")
        );
        assert_eq!(clean_litigant_name("  ,,  "), None);
        assert_eq!(clean_litigant_name(""), None);
    }

    #[test]
    fn act_names_fold_trailing_year_into_comma_suffix() {
        assert_eq!(
            canonicalize_act_name("Procedure Code 1908").as_deref(),
            Some("Procedure Code, 1908")
        );
        assert_eq!(
            canonicalize_act_name("Procedure Code , 1908").as_deref(),
            Some("Procedure Code, 1908")
        );
        assert_eq!(
            canonicalize_act_name("Procedure Code  \\").as_deref(),
            Some("Procedure Code")
        );
        assert_eq!(
            canonicalize_act_name("Rent Control Act").as_deref(),
            Some("Rent Control Act")
        );
        assert_eq!(canonicalize_act_name("   "), None);
    }

    #[test]
    fn bare_name_and_name_with_year_stay_distinguishable() {
        let bare = canonicalize_act_name("Procedure Code").unwrap();
        let with_year = canonicalize_act_name("Procedure Code 1908").unwrap();
        assert_ne!(bare, with_year);
    }

    #[test]
    fn case_type_splits_on_first_separator() {
        assert_eq!(
            split_case_type("RCP - RENT CONTROL PETITION"),
            (
                "RCP".to_string(),
                Some("RENT CONTROL PETITION".to_string())
            )
        );
        assert_eq!(split_case_type("EP"), ("EP".to_string(), None));
        assert_eq!(
            split_case_type("OS - ORIGINAL SUIT - CIVIL"),
            (
                "OS".to_string(),
                Some("ORIGINAL SUIT - CIVIL".to_string())
            )
        );
    }

    #[test]
    fn court_hall_decomposes_on_leading_digits() {
        assert_eq!(
            split_court_hall(" 1-MUNSIFF"),
            Some(("1".to_string(), "MUNSIFF".to_string()))
        );
        assert_eq!(
            split_court_hall("4 - 3rd Additional District Judge"),
            Some(("4".to_string(), "3rd Additional District Judge".to_string()))
        );
        assert_eq!(split_court_hall("Principal Judge"), None);
        assert_eq!(split_court_hall(""), None);
    }
}
