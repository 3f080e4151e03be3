//! Flat-file rendering of a finished result list.
//!
//! Exports never mutate the results; they only read `domain`, `zone`,
//! `status` and `summary`.

use crate::error::DomainScoutError;
use crate::types::DomainResult;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    /// Guess a format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    results: &'a [DomainResult],
}

/// Render results in `format`. `available_only` filters every format.
pub fn render(
    results: &[DomainResult],
    format: ExportFormat,
    available_only: bool,
) -> Result<String, DomainScoutError> {
    let selected: Vec<DomainResult> = if available_only {
        results.iter().filter(|r| r.is_available()).cloned().collect()
    } else {
        results.to_vec()
    };

    match format {
        ExportFormat::Json => to_json(&selected),
        ExportFormat::Csv => Ok(to_csv(&selected)),
        ExportFormat::Txt => Ok(to_txt(&selected)),
    }
}

/// Pretty JSON object `{ "results": [...] }`, the same envelope the proxy serves.
pub fn to_json(results: &[DomainResult]) -> Result<String, DomainScoutError> {
    Ok(serde_json::to_string_pretty(&JsonExport { results })?)
}

/// CSV with a `domain,zone,status,summary` header row.
pub fn to_csv(results: &[DomainResult]) -> String {
    let mut out = String::from("domain,zone,status,summary\n");
    for result in results {
        let row = [
            csv_field(&result.domain),
            csv_field(&result.zone),
            csv_field(&result.status),
            csv_field(&result.summary.to_string()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// One domain per line.
pub fn to_txt(results: &[DomainResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n", r.domain))
        .collect()
}

/// Write rendered output to `path`.
pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), DomainScoutError> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|e| {
        DomainScoutError::file_error(path.to_string_lossy(), format!("Failed to write export: {}", e))
    })
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
