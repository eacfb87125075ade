//! Company-data intake: extract labelled fields from pasted text and
//! append one row per company to a persisted xlsx workbook.

pub mod extract;
pub mod intake;
pub mod sheet;
