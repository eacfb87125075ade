//! Create a workbook, or repair its column set, without appending
//! anything. The intake binary runs the same check on startup; this
//! exists for preparing a file ahead of time.

use anyhow::{Context, Result};
use companydesk::extract::SHEET_COLUMNS;
use companydesk::sheet::SheetStore;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let path = std::env::args()
        .nth(1)
        .context("usage: prepare_sheet <workbook.xlsx>")?;
    SheetStore::new(&path).ensure_schema(&SHEET_COLUMNS)?;
    info!(path = %path, "workbook columns verified");
    Ok(())
}
