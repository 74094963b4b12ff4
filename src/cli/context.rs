//! Command execution context
//!
//! Loads configuration, resolves the access token and builds the Graph client
//! shared by the report commands.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::client::GraphClient;
use crate::config::Config;
use crate::error::Result;

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration, defaults when no file exists
    pub config: Config,
    /// Graph client (Arc-wrapped for concurrent batch requests)
    pub client: Arc<GraphClient>,
    /// Single reference time for every classification in the run
    pub reference: DateTime<Utc>,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if the config file is invalid or no access token is available.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_or_default(&config_path)?;

        let token = config.resolve_token(opts.token_ref())?;
        let api_host = opts
            .api_host
            .clone()
            .or_else(|| config.api_host.clone());

        let client = GraphClient::with_host(token, api_host)?;
        debug!("Using Graph endpoint {}", client.base_url());

        Ok(Self {
            config,
            client: Arc::new(client),
            reference: Utc::now(),
        })
    }
}
