//! Filter-test display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY, format_optional, truncate_string};
use crate::audit::batch::BatchOutcome;

/// Per-batch outcome of a filter test
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BatchOutcomeDisplay {
    /// One-based batch number
    #[tabled(rename = "BATCH")]
    pub batch: usize,

    #[tabled(rename = "SIZE")]
    pub size: usize,

    #[tabled(rename = "FILTER LENGTH")]
    pub filter_length: usize,

    #[tabled(rename = "FOUND")]
    pub found: String,

    #[tabled(rename = "ERROR")]
    pub error: String,
}

impl BatchOutcomeDisplay {
    pub fn new(outcome: &BatchOutcome, filter_length: usize, error: Option<&str>) -> Self {
        Self {
            batch: outcome.index + 1,
            size: outcome.size,
            filter_length,
            found: if outcome.failed {
                EMPTY.to_string()
            } else {
                outcome.returned.to_string()
            },
            error: truncate_string(&format_optional(error), 80),
        }
    }
}

/// An identifier that resolved to a directory object
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FoundObjectDisplay {
    #[tabled(rename = "APP ID")]
    pub app_id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "OBJECT ID")]
    pub object_id: String,
}
