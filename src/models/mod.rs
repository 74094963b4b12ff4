//! Display models for CLI output
//!
//! Converts audit results into flat, column-named rows for tables and CSV.

pub mod display;

pub use display::{
    BatchOutcomeDisplay, CredentialDisplay, FoundObjectDisplay, ObjectSummaryDisplay, SsoDisplay,
};
