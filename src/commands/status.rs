use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::store::EntityStore;

pub fn run(args: StatusArgs) -> Result<()> {
    if !args.db_path.exists() {
        warn!(path = %args.db_path.display(), "database file missing");
        return Ok(());
    }

    let store = EntityStore::open(&args.db_path)
        .with_context(|| format!("failed to open store at {}", args.db_path.display()))?;

    for (table, rows) in store.summary_counts()? {
        info!(table, rows, "table status");
    }

    match store.checkpoint()? {
        Some(cnr) => info!(checkpoint = %cnr, "crawl resumes after this CNR"),
        None => warn!("no checkpoint recorded, a crawl would start from its seed"),
    }

    Ok(())
}
