//! Normalized relational persistence for harvested cases.
//!
//! Every reference entity (state, district, court, hall, case type,
//! litigant, advocate, act, section) is deduplicated on a natural key backed
//! by a real uniqueness constraint: resolution always inserts with
//! `ON CONFLICT DO NOTHING` and re-selects, so repeated or concurrent
//! resolutions of the same key return one id and never a duplicate row.
//! A case and its child rows are persisted all-or-nothing in one
//! transaction.

pub mod normalize;

use std::path::Path;

use rusqlite::{params, Connection, ErrorCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{CaseRecord, Cnr};
use crate::util::now_utc_string;

const DEFAULT_COURT_CATEGORY: &str = "District Court";

const SEED_CATEGORIES: &[&str] = &["High Court", "District Court", "Subordinate Court"];

pub const SUMMARY_TABLES: &[&str] = &[
    "cases",
    "case_litigants",
    "case_acts",
    "case_history",
    "case_transfers",
    "case_ias",
    "litigants",
    "advocates",
    "acts",
    "sections",
    "case_types",
    "states",
    "districts",
    "courts",
    "court_halls",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("case {cnr} already exists")]
    DuplicateCase { cnr: String },

    #[error("record carries an invalid CNR {cnr:?}: {reason}")]
    InvalidCnr { cnr: String, reason: String },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub struct EntityStore {
    connection: Connection,
}

impl EntityStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let connection = Connection::open(path)?;
        Self::initialize(connection)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self, StoreError> {
        connection.pragma_update(None, "journal_mode", "WAL")?;
        connection.pragma_update(None, "synchronous", "NORMAL")?;
        connection.pragma_update(None, "foreign_keys", "ON")?;
        ensure_schema(&connection)?;
        seed_categories(&connection)?;
        Ok(Self { connection })
    }

    pub fn case_exists(&self, cnr: &str) -> Result<bool, StoreError> {
        let exists: i64 = self.connection.query_row(
            "SELECT EXISTS(SELECT 1 FROM cases WHERE cnr = ?1)",
            [cnr],
            |row| row.get(0),
        )?;
        Ok(exists != 0)
    }

    /// Insert a case with all of its child rows. Fails with
    /// [`StoreError::DuplicateCase`] when the CNR is already present;
    /// callers wanting skip semantics check [`Self::case_exists`] first.
    pub fn upsert_case(&mut self, record: &CaseRecord) -> Result<i64, StoreError> {
        let cnr = Cnr::parse(&record.cnr).map_err(|error| StoreError::InvalidCnr {
            cnr: record.cnr.clone(),
            reason: error.to_string(),
        })?;
        let now = now_utc_string();

        let tx = self.connection.transaction()?;

        let state_id = resolve_state(&tx, cnr.state_code(), &now)?;
        let district_id = resolve_district(&tx, cnr.state_code(), cnr.district_code(), state_id, &now)?;

        let court_id = match record.court_name.as_deref() {
            Some(name) => {
                let category_id = resolve_category(&tx, DEFAULT_COURT_CATEGORY, &now)?;
                Some(resolve_court(&tx, name, state_id, district_id, category_id, &now)?)
            }
            None => None,
        };

        let court_hall_id = match (court_id, record.court_number_and_judge.as_deref()) {
            (Some(court_id), Some(raw)) => match normalize::split_court_hall(raw) {
                Some((hall_number, judge)) => {
                    debug!(hall = %hall_number, judge = %judge, "resolved court hall");
                    Some(resolve_court_hall(&tx, &hall_number, court_id, &now)?)
                }
                None => None,
            },
            _ => None,
        };

        let case_type_id = match record.case_type.as_deref() {
            Some(raw) => resolve_case_type(&tx, raw, &now)?,
            None => None,
        };

        let insert_result = tx.execute(
            "INSERT INTO cases(
                cnr, case_type_id, filing_number, filing_date,
                registration_number, registration_date, case_status,
                first_hearing_date, decision_date, disposal_date,
                disposal_nature, court_hall_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                cnr.as_str(),
                case_type_id,
                record.filing_number,
                record.filing_date,
                record.registration_number,
                record.registration_date,
                record.case_status,
                record.first_hearing_date,
                record.decision_date,
                record.disposal_date,
                record.disposal_nature,
                court_hall_id,
                now,
            ],
        );
        if let Err(error) = insert_result {
            if is_unique_violation(&error, "cases.cnr") {
                return Err(StoreError::DuplicateCase {
                    cnr: record.cnr.clone(),
                });
            }
            return Err(error.into());
        }
        let case_id = tx.last_insert_rowid();

        insert_party(
            &tx,
            case_id,
            "Petitioner",
            record.petitioner_name.as_deref(),
            record.petitioner_advocate.as_deref(),
            &now,
        )?;
        insert_party(
            &tx,
            case_id,
            "Respondent",
            record.respondent_name.as_deref(),
            record.respondent_advocate.as_deref(),
            &now,
        )?;

        // Acts and sections are parallel lists zipped by position; acts past
        // the end of the sections list simply have no section.
        for (index, act_raw) in record.acts.iter().enumerate() {
            let Some(act_id) = resolve_act(&tx, act_raw, &now)? else {
                continue;
            };
            let act_section_id = match record.sections.get(index) {
                Some(section_raw) => match resolve_section(&tx, section_raw, &now)? {
                    Some(section_id) => Some(resolve_act_section(&tx, act_id, section_id, &now)?),
                    None => None,
                },
                None => None,
            };
            tx.execute(
                "INSERT INTO case_acts(case_id, act_id, act_section_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![case_id, act_id, act_section_id, now],
            )?;
        }

        {
            let mut statement = tx.prepare(
                "INSERT INTO case_history(case_id, judge, business_date, hearing_date, purpose,
                                          created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            )?;
            for entry in &record.history {
                statement.execute(params![
                    case_id,
                    entry.judge,
                    entry.business_date,
                    entry.hearing_date,
                    entry.purpose,
                    now,
                ])?;
            }
        }

        {
            let mut statement = tx.prepare(
                "INSERT INTO case_transfers(case_id, registration_number, transfer_date,
                                            from_court, to_court, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            )?;
            for entry in &record.transfers {
                statement.execute(params![
                    case_id,
                    entry.registration_number,
                    entry.transfer_date,
                    entry.from_court,
                    entry.to_court,
                    now,
                ])?;
            }
        }

        {
            let mut statement = tx.prepare(
                "INSERT INTO case_ias(case_id, ia_no, classification, status, filing_date,
                                      next_date, purpose, party_id, party, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            )?;
            for entry in &record.ias {
                let party_id = resolve_litigant(&tx, &entry.party, &now)?;
                statement.execute(params![
                    case_id,
                    entry.ia_no,
                    entry.classification,
                    entry.status,
                    entry.filing_date,
                    entry.next_date,
                    entry.purpose,
                    party_id,
                    entry.party,
                    now,
                ])?;
            }
        }

        tx.commit()?;
        debug!(cnr = %cnr, case_id, "case persisted");
        Ok(case_id)
    }

    pub fn checkpoint(&self) -> Result<Option<String>, StoreError> {
        match self
            .connection
            .query_row("SELECT cnr FROM checkpoint WHERE id = 1", [], |row| {
                row.get(0)
            }) {
            Ok(cnr) => Ok(Some(cnr)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Overwrite the single checkpoint row; never appends.
    pub fn set_checkpoint(&self, cnr: &str) -> Result<(), StoreError> {
        self.connection.execute(
            "INSERT INTO checkpoint(id, cnr, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET cnr = excluded.cnr, updated_at = excluded.updated_at",
            params![cnr, now_utc_string()],
        )?;
        Ok(())
    }

    pub fn summary_counts(&self) -> Result<Vec<(&'static str, i64)>, StoreError> {
        let mut counts = Vec::with_capacity(SUMMARY_TABLES.len());
        for table in SUMMARY_TABLES {
            let count: i64 = self.connection.query_row(
                &format!("SELECT COUNT(*) FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            counts.push((*table, count));
        }
        Ok(counts)
    }
}

fn ensure_schema(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL UNIQUE,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS states (
          id INTEGER PRIMARY KEY,
          code TEXT NOT NULL UNIQUE,
          name TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS districts (
          id INTEGER PRIMARY KEY,
          code TEXT NOT NULL,
          name TEXT NOT NULL,
          state_id INTEGER NOT NULL REFERENCES states(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL,
          UNIQUE(code, state_id)
        );

        CREATE TABLE IF NOT EXISTS courts (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL,
          state_id INTEGER NOT NULL REFERENCES states(id),
          district_id INTEGER NOT NULL REFERENCES districts(id),
          category_id INTEGER REFERENCES categories(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL,
          UNIQUE(name, state_id, district_id)
        );

        CREATE TABLE IF NOT EXISTS court_halls (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL,
          court_id INTEGER NOT NULL REFERENCES courts(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL,
          UNIQUE(name, court_id)
        );

        CREATE TABLE IF NOT EXISTS case_types (
          id INTEGER PRIMARY KEY,
          short_form TEXT NOT NULL UNIQUE,
          expanded_form TEXT,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS litigants (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL UNIQUE,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS advocates (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL UNIQUE,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS acts (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL UNIQUE,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sections (
          id INTEGER PRIMARY KEY,
          number TEXT NOT NULL UNIQUE,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS act_sections (
          id INTEGER PRIMARY KEY,
          act_id INTEGER NOT NULL REFERENCES acts(id),
          section_id INTEGER NOT NULL REFERENCES sections(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL,
          UNIQUE(act_id, section_id)
        );

        CREATE TABLE IF NOT EXISTS cases (
          id INTEGER PRIMARY KEY,
          cnr TEXT NOT NULL UNIQUE,
          case_type_id INTEGER REFERENCES case_types(id),
          filing_number TEXT,
          filing_date TEXT,
          registration_number TEXT,
          registration_date TEXT,
          case_status TEXT,
          first_hearing_date TEXT,
          decision_date TEXT,
          disposal_date TEXT,
          disposal_nature TEXT,
          court_hall_id INTEGER REFERENCES court_halls(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS case_litigants (
          id INTEGER PRIMARY KEY,
          case_id INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
          litigant_id INTEGER NOT NULL REFERENCES litigants(id),
          advocate_id INTEGER REFERENCES advocates(id),
          party_type TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS case_acts (
          id INTEGER PRIMARY KEY,
          case_id INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
          act_id INTEGER NOT NULL REFERENCES acts(id),
          act_section_id INTEGER REFERENCES act_sections(id),
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS case_history (
          id INTEGER PRIMARY KEY,
          case_id INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
          judge TEXT,
          business_date TEXT,
          hearing_date TEXT,
          purpose TEXT,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS case_transfers (
          id INTEGER PRIMARY KEY,
          case_id INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
          registration_number TEXT,
          transfer_date TEXT,
          from_court TEXT,
          to_court TEXT,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS case_ias (
          id INTEGER PRIMARY KEY,
          case_id INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
          ia_no TEXT,
          classification TEXT,
          status TEXT,
          filing_date TEXT,
          next_date TEXT,
          purpose TEXT,
          party_id INTEGER REFERENCES litigants(id),
          party TEXT,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS checkpoint (
          id INTEGER PRIMARY KEY CHECK (id = 1),
          cnr TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_case_litigants_case ON case_litigants(case_id);
        CREATE INDEX IF NOT EXISTS idx_case_acts_case ON case_acts(case_id);
        CREATE INDEX IF NOT EXISTS idx_case_history_case ON case_history(case_id);
        CREATE INDEX IF NOT EXISTS idx_case_transfers_case ON case_transfers(case_id);
        CREATE INDEX IF NOT EXISTS idx_case_ias_case ON case_ias(case_id);
        ",
    )
}

fn seed_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let now = now_utc_string();
    let mut statement = connection.prepare(
        "INSERT INTO categories(name, created_at) VALUES (?1, ?2)
         ON CONFLICT(name) DO NOTHING",
    )?;
    for category in SEED_CATEGORIES {
        statement.execute(params![category, now])?;
    }
    Ok(())
}

fn is_unique_violation(error: &rusqlite::Error, constraint: &str) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.code == ErrorCode::ConstraintViolation && message.contains(constraint)
    )
}

fn known_state_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "AP" => "Andhra Pradesh",
        "AS" => "Assam",
        "BR" => "Bihar",
        "CT" => "Chhattisgarh",
        "DL" => "Delhi",
        "GA" => "Goa",
        "GJ" => "Gujarat",
        "HP" => "Himachal Pradesh",
        "HR" => "Haryana",
        "JH" => "Jharkhand",
        "KA" => "Karnataka",
        "KL" => "Kerala",
        "MH" => "Maharashtra",
        "MP" => "Madhya Pradesh",
        "OR" => "Odisha",
        "PB" => "Punjab",
        "RJ" => "Rajasthan",
        "TN" => "Tamil Nadu",
        "TS" => "Telangana",
        "UK" => "Uttarakhand",
        "UP" => "Uttar Pradesh",
        "WB" => "West Bengal",
        _ => return None,
    })
}

fn known_district_name(state_code: &str, district_code: &str) -> Option<&'static str> {
    match (state_code, district_code) {
        ("KL", "KN") => Some("Kannur"),
        _ => None,
    }
}

/// States are keyed by their CNR code; unknown codes keep the code as the
/// display name rather than guessing.
fn resolve_state(
    connection: &Connection,
    code: &str,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    let name = known_state_name(code).unwrap_or(code);
    connection.execute(
        "INSERT INTO states(code, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(code) DO NOTHING",
        params![code, name, now],
    )?;
    connection.query_row("SELECT id FROM states WHERE code = ?1", [code], |row| {
        row.get(0)
    })
}

fn resolve_district(
    connection: &Connection,
    state_code: &str,
    district_code: &str,
    state_id: i64,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    let name = known_district_name(state_code, district_code).unwrap_or(district_code);
    connection.execute(
        "INSERT INTO districts(code, name, state_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(code, state_id) DO NOTHING",
        params![district_code, name, state_id, now],
    )?;
    connection.query_row(
        "SELECT id FROM districts WHERE code = ?1 AND state_id = ?2",
        params![district_code, state_id],
        |row| row.get(0),
    )
}

fn resolve_category(
    connection: &Connection,
    name: &str,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    connection.execute(
        "INSERT INTO categories(name, created_at) VALUES (?1, ?2)
         ON CONFLICT(name) DO NOTHING",
        params![name, now],
    )?;
    connection.query_row("SELECT id FROM categories WHERE name = ?1", [name], |row| {
        row.get(0)
    })
}

fn resolve_court(
    connection: &Connection,
    name: &str,
    state_id: i64,
    district_id: i64,
    category_id: i64,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    connection.execute(
        "INSERT INTO courts(name, state_id, district_id, category_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(name, state_id, district_id) DO NOTHING",
        params![name, state_id, district_id, category_id, now],
    )?;
    connection.query_row(
        "SELECT id FROM courts WHERE name = ?1 AND state_id = ?2 AND district_id = ?3",
        params![name, state_id, district_id],
        |row| row.get(0),
    )
}

fn resolve_court_hall(
    connection: &Connection,
    hall_number: &str,
    court_id: i64,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    connection.execute(
        "INSERT INTO court_halls(name, court_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(name, court_id) DO NOTHING",
        params![hall_number, court_id, now],
    )?;
    connection.query_row(
        "SELECT id FROM court_halls WHERE name = ?1 AND court_id = ?2",
        params![hall_number, court_id],
        |row| row.get(0),
    )
}

fn resolve_case_type(
    connection: &Connection,
    raw: &str,
    now: &str,
) -> Result<Option<i64>, rusqlite::Error> {
    let (short_form, expanded_form) = normalize::split_case_type(raw);
    if short_form.is_empty() {
        return Ok(None);
    }
    connection.execute(
        "INSERT INTO case_types(short_form, expanded_form, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(short_form) DO NOTHING",
        params![short_form, expanded_form, now],
    )?;
    connection
        .query_row(
            "SELECT id FROM case_types WHERE short_form = ?1",
            [short_form],
            |row| row.get(0),
        )
        .map(Some)
}

fn resolve_litigant(
    connection: &Connection,
    raw: &str,
    now: &str,
) -> Result<Option<i64>, rusqlite::Error> {
    let Some(name) = normalize::clean_litigant_name(raw) else {
        return Ok(None);
    };
    connection.execute(
        "INSERT INTO litigants(name, created_at) VALUES (?1, ?2)
         ON CONFLICT(name) DO NOTHING",
        params![name, now],
    )?;
    connection
        .query_row("SELECT id FROM litigants WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .map(Some)
}

fn resolve_advocate(
    connection: &Connection,
    raw: &str,
    now: &str,
) -> Result<Option<i64>, rusqlite::Error> {
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    connection.execute(
        "INSERT INTO advocates(name, created_at) VALUES (?1, ?2)
         ON CONFLICT(name) DO NOTHING",
        params![name, now],
    )?;
    connection
        .query_row("SELECT id FROM advocates WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .map(Some)
}

fn resolve_act(
    connection: &Connection,
    raw: &str,
    now: &str,
) -> Result<Option<i64>, rusqlite::Error> {
    let Some(name) = normalize::canonicalize_act_name(raw) else {
        return Ok(None);
    };
    connection.execute(
        "INSERT INTO acts(name, created_at, updated_at) VALUES (?1, ?2, ?2)
         ON CONFLICT(name) DO NOTHING",
        params![name, now],
    )?;
    connection
        .query_row("SELECT id FROM acts WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .map(Some)
}

fn resolve_section(
    connection: &Connection,
    raw: &str,
    now: &str,
) -> Result<Option<i64>, rusqlite::Error> {
    let number = raw.trim();
    if number.is_empty() {
        return Ok(None);
    }
    connection.execute(
        "INSERT INTO sections(number, created_at, updated_at) VALUES (?1, ?2, ?2)
         ON CONFLICT(number) DO NOTHING",
        params![number, now],
    )?;
    connection
        .query_row("SELECT id FROM sections WHERE number = ?1", [number], |row| {
            row.get(0)
        })
        .map(Some)
}

fn resolve_act_section(
    connection: &Connection,
    act_id: i64,
    section_id: i64,
    now: &str,
) -> Result<i64, rusqlite::Error> {
    connection.execute(
        "INSERT INTO act_sections(act_id, section_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(act_id, section_id) DO NOTHING",
        params![act_id, section_id, now],
    )?;
    connection.query_row(
        "SELECT id FROM act_sections WHERE act_id = ?1 AND section_id = ?2",
        params![act_id, section_id],
        |row| row.get(0),
    )
}

fn insert_party(
    connection: &Connection,
    case_id: i64,
    party_type: &str,
    name: Option<&str>,
    advocate: Option<&str>,
    now: &str,
) -> Result<(), rusqlite::Error> {
    let Some(name) = name else {
        return Ok(());
    };
    let Some(litigant_id) = resolve_litigant(connection, name, now)? else {
        warn!(party_type, "litigant name empty after cleaning, junction row skipped");
        return Ok(());
    };
    let advocate_id = match advocate {
        Some(advocate_name) => resolve_advocate(connection, advocate_name, now)?,
        None => None,
    };
    connection.execute(
        "INSERT INTO case_litigants(case_id, litigant_id, advocate_id, party_type,
                                    created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![case_id, litigant_id, advocate_id, party_type, now],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests;
