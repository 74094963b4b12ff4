//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod context;
pub mod credentials;
pub mod init;
pub mod progress;
pub mod sso;
pub mod status;

pub use args::{CredentialFilterArgs, OutputFormat, SsoFilterArgs};
pub use context::CommandContext;
pub use filter_test::FilterTestArgs;

/// graphaudit - credential expiration and SSO reporting for Microsoft Graph tenants
#[derive(Parser, Debug)]
#[command(name = "graphaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "GRAPHAUDIT_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "GRAPHAUDIT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Graph access token (overrides the config file)
    #[arg(
        long,
        global = true,
        env = "GRAPHAUDIT_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Override the Graph base URL
    #[arg(long, global = true, env = "GRAPHAUDIT_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Also write report rows to this CSV file
    #[arg(long, short = 'o', global = true, env = "GRAPHAUDIT_OUTPUT", hide_env = true)]
    pub output: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "GRAPHAUDIT_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize graphaudit configuration
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Report credentials that are expired or expiring soon
    Credentials {
        #[command(flatten)]
        filters: CredentialFilterArgs,

        /// Look up and show object owners
        #[arg(long)]
        owners: bool,

        /// One row per object instead of one per credential
        #[arg(long)]
        flatten: bool,
    },

    /// Classify service principals by single sign-on type
    Sso {
        #[command(flatten)]
        filters: SsoFilterArgs,
    },

    /// Look up application IDs in batches to probe `in`-filter limits
    FilterTest(FilterTestArgs),
}
