use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::acquire::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::crawl::{DEFAULT_BATCH_COOLDOWN_MS, DEFAULT_BATCH_SIZE, DEFAULT_CASE_DELAY_MS};

#[derive(Parser, Debug)]
#[command(
    name = "cnr-harvester",
    version,
    about = "Resumable CNR case-record harvester for the eCourts portal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Crawl(CrawlArgs),
    Fetch(FetchArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    #[arg(long, default_value = "cnr_harvester.sqlite")]
    pub db_path: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    /// Starting point when the store holds no checkpoint; crawling begins
    /// at the sequence after this CNR.
    #[arg(long, default_value = "KLKN220000002019")]
    pub seed_cnr: String,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    #[arg(long, default_value_t = DEFAULT_CASE_DELAY_MS)]
    pub case_delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_BATCH_COOLDOWN_MS)]
    pub batch_cooldown_ms: u64,

    /// Stop after this many batches instead of running until interrupted.
    #[arg(long)]
    pub max_batches: Option<u64>,

    /// Write a categorized JSON summary here on exit.
    #[arg(long)]
    pub summary_dump_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[arg(long)]
    pub cnr: String,

    #[arg(long, default_value = "cnr_harvester.sqlite")]
    pub db_path: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, default_value_t = false)]
    pub persist: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "cnr_harvester.sqlite")]
    pub db_path: PathBuf,
}
