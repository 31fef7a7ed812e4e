//! # Bulk User Import
//!
//! File: cli/src/commands/admin/import.rs
//!
//! Parses a comma-delimited user file and renders the server's per-row
//! outcome. Expected layout, header row first:
//!
//! ```text
//! username,password,is_admin
//! carol,secret3,false
//! dave,secret4,TRUE
//! ```
//!
//! Rows missing a username or password are skipped. The admin column is
//! optional and only `true` (any case) makes an admin. No quoting or escaping
//! is supported; extra columns are ignored.
//!
use crate::common::models::{BulkImportResult, ImportRow};
use crate::common::ui::tables;
use tracing::debug;

/// Parses the file contents into import rows, skipping the header.
pub fn parse_user_rows(text: &str) -> Vec<ImportRow> {
    text.split('\n')
        .skip(1)
        .enumerate()
        .filter_map(|(i, line)| {
            let row = parse_line(line.trim_end_matches('\r'));
            if row.is_none() && !line.trim().is_empty() {
                debug!("Skipping import line {}: missing username or password", i + 2);
            }
            row
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ImportRow> {
    let mut fields = line.split(',').map(str::trim);
    let username = fields.next().filter(|f| !f.is_empty())?;
    let password = fields.next().filter(|f| !f.is_empty())?;
    let is_admin = fields
        .next()
        .is_some_and(|f| f.eq_ignore_ascii_case("true"));
    Some(ImportRow {
        username: username.to_string(),
        password: password.to_string(),
        is_admin,
    })
}

/// Overall result of an import, from the size of each partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSummary {
    AllCreated,
    SomeFailed,
    NoneCreated,
}

impl ImportSummary {
    pub fn of(result: &BulkImportResult) -> Self {
        if result.failed.is_empty() {
            ImportSummary::AllCreated
        } else if !result.success.is_empty() {
            ImportSummary::SomeFailed
        } else {
            ImportSummary::NoneCreated
        }
    }

    pub fn notice(&self) -> &'static str {
        match self {
            ImportSummary::AllCreated => "All users created successfully",
            ImportSummary::SomeFailed => "Some users failed to create",
            ImportSummary::NoneCreated => "Failed to create users",
        }
    }
}

/// Summary notice plus the succeeded and failed tables.
pub fn render_import_result(result: &BulkImportResult) -> String {
    let mut out = format!("{}\n\n", ImportSummary::of(result).notice());

    out.push_str(&format!("Successfully created {} users\n", result.success.len()));
    if !result.success.is_empty() {
        let rows: Vec<Vec<String>> = result
            .success
            .iter()
            .map(|r| vec![r.username.clone(), tables::yes_no(r.is_admin)])
            .collect();
        out.push_str(&tables::render_table(&["Username", "Is Admin"], &rows));
    }

    if !result.failed.is_empty() {
        out.push_str(&format!("\nFailed to create {} users\n", result.failed.len()));
        let rows: Vec<Vec<String>> = result
            .failed
            .iter()
            .map(|f| vec![f.user.username.clone(), f.error.clone()])
            .collect();
        out.push_str(&tables::render_table(&["Username", "Error"], &rows));
    }
    out
}
