// src/intake.rs

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::extract::{self, ParseError, KEY_COLUMN};
use crate::sheet::{AppendOutcome, SheetStore, StoreError};

/// Why a submission was not stored. Terminal for the triggering
/// submission; the caller corrects the input or the file and retries.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handle one pasted block against the workbook at `path`: extract the
/// record, append unless the company is already present, and on an
/// insert run the wrap-text normalization pass. Nothing is written
/// when parsing fails or the company already exists.
pub fn submit(path: &Path, text: &str) -> Result<AppendOutcome, IntakeError> {
    let record = extract::parse_company_text(text)?;
    info!(company = %record.name, "parsed company record");

    let store = SheetStore::new(path);
    let outcome = store.append_if_absent(&record, KEY_COLUMN)?;
    if outcome == AppendOutcome::Inserted {
        store.normalize_format()?;
    }
    Ok(outcome)
}
