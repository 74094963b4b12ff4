//! Filter argument types for report commands

use clap::Args;

use super::common::{KindArg, ScopeArg, parse_sso_type};
use crate::audit::SsoType;

/// Filter arguments for the credentials report.
///
/// Repeatable flags accept repeated or comma-separated values:
/// `--kind secret --kind certificate` or `--kind secret,certificate`.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialFilterArgs {
    /// Report credentials expiring within this many days (default from config)
    #[arg(long, short = 'd', conflicts_with = "ignore_expiration")]
    pub days: Option<i64>,

    /// Report every credential regardless of expiration date
    #[arg(long)]
    pub ignore_expiration: bool,

    /// Leave already-expired credentials out
    #[arg(long)]
    pub exclude_expired: bool,

    /// Object collections to read
    #[arg(long, value_enum, default_value = "all")]
    pub scope: ScopeArg,

    /// Credential kinds to include
    #[arg(long, value_enum, value_delimiter = ',')]
    pub kind: Vec<KindArg>,

    /// Only service principals with these SSO types
    #[arg(long = "sso-type", value_delimiter = ',', value_parser = parse_sso_type)]
    pub sso_type: Vec<SsoType>,

    /// Skip managed identities
    #[arg(long)]
    pub exclude_managed_identities: bool,

    /// Skip service principals matching a vendor-managed app definition
    #[arg(long)]
    pub exclude_managed_apps: bool,
}

/// Filter arguments for the SSO report
#[derive(Args, Debug, Clone, Default)]
pub struct SsoFilterArgs {
    /// Only these SSO types
    #[arg(long = "sso-type", value_delimiter = ',', value_parser = parse_sso_type)]
    pub sso_type: Vec<SsoType>,

    /// Include managed identities (skipped by default)
    #[arg(long)]
    pub include_managed_identities: bool,
}
