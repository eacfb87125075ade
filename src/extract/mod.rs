// src/extract/mod.rs

mod record;

pub use record::{CompanyRecord, KEY_COLUMN, SHEET_COLUMNS};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// A mandatory label was not found in the pasted text, or its value
/// was blank once trimmed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("required field `{0}` not found in input")]
    MissingField(&'static str),
}

/// One labelled line we search for in the pasted text.
struct FieldPattern {
    label: &'static str,
    regex: Regex,
}

impl FieldPattern {
    fn new(label: &'static str, spans_lines: bool) -> Self {
        // `(?s)` lets the capture run past line ends, for the one
        // field whose value is free text rather than a single line.
        let pattern = if spans_lines {
            format!(r"(?s){}: (.+)", regex::escape(label))
        } else {
            format!(r"{}: (.+)", regex::escape(label))
        };
        Self {
            label,
            regex: Regex::new(&pattern).expect("field pattern must compile"),
        }
    }

    /// First match wins when a label appears more than once. A value
    /// that trims to nothing counts as absent.
    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .map(|caps| caps.get(1).expect("pattern has one group").as_str().trim())
            .filter(|value| !value.is_empty())
    }
}

struct Patterns {
    name: FieldPattern,
    phone: FieldPattern,
    email: FieldPattern,
    industry: FieldPattern,
    company_type: FieldPattern,
    import_export: FieldPattern,
    country: FieldPattern,
    website: FieldPattern,
    operations: FieldPattern,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(|| Patterns {
    name: FieldPattern::new("Company Name", false),
    phone: FieldPattern::new("Company Phone", false),
    email: FieldPattern::new("Company Email", false),
    industry: FieldPattern::new("Industry", false),
    company_type: FieldPattern::new("Company Type", false),
    import_export: FieldPattern::new("Import/Export Activities", false),
    country: FieldPattern::new("Company Country", false),
    website: FieldPattern::new("Company Website", false),
    // Labelled "Company Operations" in the text, stored under the
    // "Operations" column; captures through to end of input.
    operations: FieldPattern::new("Company Operations", true),
});

/// Extract a [`CompanyRecord`] from one pasted block of text. Labels
/// are matched independently of each other and of ordering; values are
/// whitespace-trimmed. Pure function, no I/O.
pub fn parse_company_text(text: &str) -> Result<CompanyRecord, ParseError> {
    let p = &*PATTERNS;

    let required = |fp: &FieldPattern| {
        fp.capture(text)
            .map(str::to_owned)
            .ok_or(ParseError::MissingField(fp.label))
    };
    let optional = |fp: &FieldPattern| fp.capture(text).map(str::to_owned);

    let record = CompanyRecord {
        name: required(&p.name)?,
        phone: required(&p.phone)?,
        email: optional(&p.email),
        industry: required(&p.industry)?,
        company_type: required(&p.company_type)?,
        import_export: optional(&p.import_export),
        country: required(&p.country)?,
        website: optional(&p.website),
        operations: required(&p.operations)?,
    };
    debug!(company = %record.name, "extracted company record");
    Ok(record)
}
