//! Credential audit core
//!
//! Directory records flow through SSO resolution and managed-app matching
//! into [`OwningObject`]s, which the aggregator classifies and filters.
//! Batched identifier lookups live in [`batch`].

pub mod aggregate;
pub mod batch;
pub mod managed;
pub mod object;
pub mod sso;
pub mod status;

pub use aggregate::{
    AggregateOptions, AggregateOutput, CredentialRow, ObjectSummary, aggregate_credentials,
};
pub use batch::{BatchReport, BatchSize, partition_into_batches, run_batches};
pub use managed::{ManagedAppDefinition, builtin_definitions};
pub use object::{CredentialKind, OwningObject};
pub use sso::SsoType;
pub use status::CredentialStatus;
