use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::acquire::{AcquisitionSession, CaseLookup, LookupOutcome};
use crate::challenge::{tesseract_available, TesseractSolver};
use crate::cli::FetchArgs;
use crate::model::{CaseRecord, Cnr};
use crate::store::EntityStore;

pub fn run(args: FetchArgs) -> Result<()> {
    let cnr = Cnr::parse(&args.cnr).context("invalid --cnr")?;

    if !tesseract_available() {
        warn!("tesseract binary not found on PATH, every challenge solve will fail");
    }

    let solver = Box::new(TesseractSolver::new(args.ocr_lang.clone()));
    let mut session = AcquisitionSession::new(
        &args.base_url,
        Duration::from_secs(args.timeout_secs),
        solver,
    )?;

    match session.lookup(&cnr)? {
        LookupOutcome::Record(record) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record);
            }

            if args.persist {
                let mut store = EntityStore::open(&args.db_path).with_context(|| {
                    format!("failed to open store at {}", args.db_path.display())
                })?;
                if store.case_exists(cnr.as_str())? {
                    info!(cnr = %cnr, "case already stored, leaving it untouched");
                } else {
                    let case_id = store.upsert_case(&record)?;
                    info!(cnr = %cnr, case_id, "case persisted");
                }
            }
        }
        LookupOutcome::NotFound => {
            info!(cnr = %cnr, "case does not exist");
        }
    }

    Ok(())
}

fn print_record(record: &CaseRecord) {
    println!("CNR:                 {}", record.cnr);
    print_optional("Court", record.court_name.as_deref());
    print_optional("Case type", record.case_type.as_deref());
    print_optional("Filing number", record.filing_number.as_deref());
    print_date("Filing date", record.filing_date);
    print_optional("Registration number", record.registration_number.as_deref());
    print_date("Registration date", record.registration_date);
    print_optional("Status", record.case_status.as_deref());
    print_date("First hearing", record.first_hearing_date);
    print_date("Decision date", record.decision_date);
    print_date("Disposal date", record.disposal_date);
    print_optional("Disposal nature", record.disposal_nature.as_deref());
    print_optional("Court hall", record.court_number_and_judge.as_deref());
    print_optional("Petitioner", record.petitioner_name.as_deref());
    print_optional("Petitioner advocate", record.petitioner_advocate.as_deref());
    print_optional("Respondent", record.respondent_name.as_deref());
    print_optional("Respondent advocate", record.respondent_advocate.as_deref());
    if !record.acts.is_empty() {
        println!("Acts:                {}", record.acts.join(", "));
    }
    if !record.sections.is_empty() {
        println!("Sections:            {}", record.sections.join(", "));
    }
    println!("History entries:     {}", record.history.len());
    println!("Transfer entries:    {}", record.transfers.len());
    println!("IA entries:          {}", record.ias.len());
}

fn print_optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{:<20} {}", format!("{label}:"), value);
    }
}

fn print_date(label: &str, value: Option<chrono::NaiveDate>) {
    if let Some(value) = value {
        println!("{:<20} {}", format!("{label}:"), value);
    }
}
