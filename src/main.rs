use anyhow::{bail, Context, Result};
use companydesk::extract::SHEET_COLUMNS;
use companydesk::intake;
use companydesk::sheet::{AppendOutcome, SheetStore};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) workbook selection + column check ────────────────────────
    let path: PathBuf = std::env::args()
        .nth(1)
        .context("usage: companydesk <workbook.xlsx>  (company text on stdin)")?
        .into();
    SheetStore::new(&path).ensure_schema(&SHEET_COLUMNS)?;
    info!(path = %path.display(), "workbook ready");

    // ─── 3) read the pasted block ────────────────────────────────────
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading company text from stdin")?;
    if text.trim().is_empty() {
        bail!("no company text on stdin");
    }

    // ─── 4) extract + append ─────────────────────────────────────────
    match intake::submit(&path, &text)? {
        AppendOutcome::Inserted => info!("company added to workbook"),
        AppendOutcome::Duplicate => info!("company already in workbook; nothing written"),
    }
    Ok(())
}
