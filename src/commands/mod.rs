pub mod crawl;
pub mod fetch;
pub mod status;
