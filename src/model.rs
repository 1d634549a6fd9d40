use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CNR_LENGTH: usize = 16;
pub const CNR_SEQUENCE_WIDTH: usize = 6;

/// A validated 16-character case-record number, e.g. `KLKN220000012019`.
///
/// Layout: state code (2) + district code (2) + establishment code (2) +
/// zero-padded sequence (6) + filing year (4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cnr {
    raw: String,
}

impl Cnr {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.len() != CNR_LENGTH {
            bail!("CNR must be {CNR_LENGTH} characters, got {:?}", raw);
        }
        if !raw.chars().all(|character| character.is_ascii_alphanumeric()) {
            bail!("CNR must be alphanumeric, got {:?}", raw);
        }
        if !raw[6..12].chars().all(|character| character.is_ascii_digit()) {
            bail!("CNR sequence segment must be numeric, got {:?}", &raw[6..12]);
        }
        if !raw[12..16].chars().all(|character| character.is_ascii_digit()) {
            bail!("CNR year segment must be numeric, got {:?}", &raw[12..16]);
        }
        Ok(Self {
            raw: raw.to_ascii_uppercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn state_code(&self) -> &str {
        &self.raw[0..2]
    }

    pub fn district_code(&self) -> &str {
        &self.raw[2..4]
    }

    pub fn establishment_code(&self) -> &str {
        &self.raw[4..6]
    }

    /// The six leading characters shared by every case of one establishment.
    pub fn court_prefix(&self) -> &str {
        &self.raw[0..6]
    }

    pub fn sequence(&self) -> u32 {
        self.raw[6..12].parse().unwrap_or(0)
    }

    pub fn year(&self) -> &str {
        &self.raw[12..16]
    }

    /// Rebuild a CNR with the same prefix and year but a different sequence.
    pub fn with_sequence(&self, sequence: u32) -> Self {
        Self {
            raw: format!(
                "{}{:0width$}{}",
                self.court_prefix(),
                sequence,
                self.year(),
                width = CNR_SEQUENCE_WIDTH
            ),
        }
    }
}

impl std::fmt::Display for Cnr {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub judge: String,
    pub business_date: Option<NaiveDate>,
    pub hearing_date: Option<NaiveDate>,
    pub purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferEntry {
    pub registration_number: String,
    pub transfer_date: Option<NaiveDate>,
    pub from_court: String,
    pub to_court: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IaEntry {
    pub ia_no: String,
    pub party: String,
    pub filing_date: Option<NaiveDate>,
    pub next_date: Option<NaiveDate>,
    pub purpose: String,
    pub status: String,
    pub classification: String,
}

/// Canonical extracted case. Produced once per successful lookup and handed
/// to the store exactly once; every field is already coerced to its semantic
/// type at the extraction boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub cnr: String,
    pub court_name: Option<String>,
    pub case_type: Option<String>,
    pub filing_number: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub case_status: Option<String>,
    pub first_hearing_date: Option<NaiveDate>,
    pub decision_date: Option<NaiveDate>,
    pub disposal_date: Option<NaiveDate>,
    pub disposal_nature: Option<String>,
    pub court_number_and_judge: Option<String>,
    pub petitioner_name: Option<String>,
    pub petitioner_advocate: Option<String>,
    pub respondent_name: Option<String>,
    pub respondent_advocate: Option<String>,
    pub acts: Vec<String>,
    pub sections: Vec<String>,
    pub history: Vec<HistoryEntry>,
    pub transfers: Vec<TransferEntry>,
    pub ias: Vec<IaEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnr_parse_accepts_well_formed_identifier() {
        let cnr = Cnr::parse("KLKN220000012019").unwrap();
        assert_eq!(cnr.state_code(), "KL");
        assert_eq!(cnr.district_code(), "KN");
        assert_eq!(cnr.establishment_code(), "22");
        assert_eq!(cnr.court_prefix(), "KLKN22");
        assert_eq!(cnr.sequence(), 1);
        assert_eq!(cnr.year(), "2019");
    }

    #[test]
    fn cnr_parse_uppercases_input() {
        let cnr = Cnr::parse("klkn220000012019").unwrap();
        assert_eq!(cnr.as_str(), "KLKN220000012019");
    }

    #[test]
    fn cnr_parse_rejects_bad_shapes() {
        assert!(Cnr::parse("KLKN22000001201").is_err());
        assert!(Cnr::parse("KLKN22-000012019").is_err());
        assert!(Cnr::parse("KLKN22ABCDEF2019").is_err());
        assert!(Cnr::parse("KLKN220000012XYZ").is_err());
    }

    #[test]
    fn with_sequence_keeps_width_and_year() {
        let cnr = Cnr::parse("KLKN220000112019").unwrap();
        assert_eq!(cnr.with_sequence(12).as_str(), "KLKN220000122019");
        assert_eq!(cnr.with_sequence(123_456).as_str(), "KLKN221234562019");
    }
}
