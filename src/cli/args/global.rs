//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file defaults are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.graphaudit/config.yaml)
    pub config: Option<String>,

    /// Access token override (bypasses config file)
    pub token: Option<String>,

    /// Custom Graph base URL for testing or national clouds
    pub api_host: Option<String>,

    /// CSV file to write report rows to
    pub output: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            token: cli.token.clone(),
            api_host: cli.api_host.clone(),
            output: cli.output.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn token_ref(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Progress bars only make sense for human-readable output
    pub fn show_progress(&self) -> bool {
        self.format != OutputFormat::Json
    }
}
