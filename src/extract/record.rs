// src/extract/record.rs

/// Column order of the company sheet. `ensure_schema` creates these
/// and `append_if_absent` writes record values under them by name.
pub const SHEET_COLUMNS: [&str; 9] = [
    "Company Name",
    "Company Phone",
    "Company Email",
    "Industry",
    "Company Type",
    "Import/Export Activities",
    "Company Country",
    "Company Website",
    "Operations",
];

/// Column a new record is deduplicated against.
pub const KEY_COLUMN: &str = "Company Name";

/// One company, as extracted from a pasted block of text. Mandatory
/// fields are plain strings; the three fields the source text may omit
/// are options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub industry: String,
    pub company_type: String,
    pub import_export: Option<String>,
    pub country: String,
    pub website: Option<String>,
    pub operations: String,
}

impl CompanyRecord {
    /// Value for a sheet column, looked up by header name. Unknown
    /// columns and absent optional fields both come back as `None`.
    pub fn column_value(&self, column: &str) -> Option<&str> {
        match column {
            "Company Name" => Some(&self.name),
            "Company Phone" => Some(&self.phone),
            "Company Email" => self.email.as_deref(),
            "Industry" => Some(&self.industry),
            "Company Type" => Some(&self.company_type),
            "Import/Export Activities" => self.import_export.as_deref(),
            "Company Country" => Some(&self.country),
            "Company Website" => self.website.as_deref(),
            "Operations" => Some(&self.operations),
            _ => None,
        }
    }
}
