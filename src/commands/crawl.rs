use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::acquire::AcquisitionSession;
use crate::challenge::{tesseract_available, TesseractSolver};
use crate::cli::CrawlArgs;
use crate::crawl::{CrawlConfig, CrawlCoordinator};
use crate::model::Cnr;
use crate::store::EntityStore;
use crate::util::{utc_compact_string, write_json_pretty};

pub fn run(args: CrawlArgs) -> Result<()> {
    let seed_cnr = Cnr::parse(&args.seed_cnr).context("invalid --seed-cnr")?;

    if !tesseract_available() {
        warn!("tesseract binary not found on PATH, every challenge solve will fail");
    }

    let store = EntityStore::open(&args.db_path)
        .with_context(|| format!("failed to open store at {}", args.db_path.display()))?;

    let solver = Box::new(TesseractSolver::new(args.ocr_lang.clone()));
    let session = AcquisitionSession::new(
        &args.base_url,
        Duration::from_secs(args.timeout_secs),
        solver,
    )?;

    let cancel = Arc::new(AtomicBool::new(false));
    let interrupt_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        interrupt_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to register interrupt handler")?;

    info!(
        db_path = %args.db_path.display(),
        seed = %seed_cnr,
        batch_size = args.batch_size,
        "starting crawl, interrupt to stop"
    );

    let config = CrawlConfig {
        seed_cnr,
        batch_size: args.batch_size,
        case_delay: Duration::from_millis(args.case_delay_ms),
        batch_cooldown: Duration::from_millis(args.batch_cooldown_ms),
        max_batches: args.max_batches,
    };

    let mut coordinator = CrawlCoordinator::new(store, session, config, cancel);
    coordinator.run()?;

    let summary = coordinator.into_summary();
    if let Some(dump_dir) = &args.summary_dump_dir {
        let path = dump_dir.join(format!(
            "crawl_summary_{}.json",
            utc_compact_string(Utc::now())
        ));
        write_json_pretty(&path, &summary)?;
        info!(path = %path.display(), "wrote crawl summary");
    }

    Ok(())
}
