//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T, S = ()> {
    pub data: T,
    pub meta: Metadata<S>,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata<S = ()> {
    /// RFC 3339 time the output was produced
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Number of records in `data`, when it is a list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Command-specific totals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<S>,
}

impl<T, S> JsonOutput<T, S> {
    pub fn new(data: T, count: Option<usize>, summary: Option<S>) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                count,
                summary,
            },
        }
    }
}

/// Format a list as pretty-printed JSON
pub fn format_json<T: Serialize>(data: &[T]) -> Result<String, serde_json::Error> {
    let output: JsonOutput<&[T]> = JsonOutput::new(data, Some(data.len()), None);
    serde_json::to_string_pretty(&output)
}

/// Format a list with a summary block in `meta`
pub fn format_json_with_summary<T: Serialize, S: Serialize>(
    data: &[T],
    summary: &S,
) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(data, Some(data.len()), Some(summary));
    serde_json::to_string_pretty(&output)
}
