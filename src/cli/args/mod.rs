//! Shared CLI argument types
//!
//! This module contains reusable argument structs that can be flattened
//! into commands using `#[command(flatten)]`.

mod common;
mod filters;
mod global;

pub use common::{OutputFormat, ScopeArg, TargetArg};
#[cfg(test)]
pub use common::KindArg;
pub use filters::{CredentialFilterArgs, SsoFilterArgs};
pub use global::GlobalOptions;
