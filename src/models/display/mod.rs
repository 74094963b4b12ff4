//! Display model implementations for table and CSV output
//!
//! Display models transform audit results into CLI-friendly formats
//! with appropriate column names and serialization.

mod batch;
mod common;
mod credential;
mod sso;

pub use batch::{BatchOutcomeDisplay, FoundObjectDisplay};
pub use credential::{CredentialDisplay, ObjectSummaryDisplay};
pub use sso::SsoDisplay;
