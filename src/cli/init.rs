//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::audit::batch::{MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::cli::args::GlobalOptions;
use crate::client::{DirectoryApi, GraphClient};
use crate::config::Config;
use crate::error::Result;

/// Matches nothing; used to check that a token can read the directory
const PROBE_FILTER: &str = "appId eq '00000000-0000-0000-0000-000000000000'";

/// Run the init command
///
/// Writes tenant, token and report defaults to the config file. An existing
/// file keeps its custom managed-app definitions and API host.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let config_path = Config::resolve_path(opts.config_ref())?;

    println!("{}", "Welcome to graphaudit!".bold().green());
    println!("Let's set up your Microsoft Graph configuration.\n");

    let mut config = Config::load_or_default(&config_path)?;
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "Update existing configuration at {}?",
                config_path.display()
            ))
            .default(true)
            .interact()?
    {
        println!("{}", "No changes made.".dimmed());
        return Ok(());
    }

    let tenant_id: String = Input::with_theme(&theme)
        .with_prompt("Tenant ID or primary domain")
        .with_initial_text(config.tenant_id.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    config.tenant_id = Some(tenant_id.trim().to_string()).filter(|t| !t.is_empty());

    let token: String = Password::with_theme(&theme)
        .with_prompt("Graph access token (leave empty to pass --token at run time)")
        .allow_empty_password(true)
        .interact()?;
    if !token.trim().is_empty() {
        config.access_token = Some(token.trim().to_string());
    }

    config.preferences.threshold_days = Input::with_theme(&theme)
        .with_prompt("Default report window in days")
        .default(config.preferences.threshold_days)
        .validate_with(|days: &i64| {
            if *days >= 0 {
                Ok(())
            } else {
                Err("Days must not be negative")
            }
        })
        .interact_text()?;

    config.preferences.batch_size = Input::with_theme(&theme)
        .with_prompt(format!(
            "Default filter batch size ({}-{})",
            MIN_BATCH_SIZE, MAX_BATCH_SIZE
        ))
        .default(config.preferences.batch_size)
        .validate_with(|size: &usize| {
            if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(size) {
                Ok(())
            } else {
                Err("Batch size out of range")
            }
        })
        .interact_text()?;

    if let Some(token) = config.access_token.clone()
        && Confirm::with_theme(&theme)
            .with_prompt("Verify the access token now?")
            .default(true)
            .interact()?
    {
        println!("\n{}", "Checking directory access...".cyan());
        let api_host = opts.api_host.clone().or_else(|| config.api_host.clone());
        let client = GraphClient::with_host(token, api_host)?;
        match client.list_applications(Some(PROBE_FILTER)).await {
            Ok(_) => println!("{}", "✓ Token can read applications".green()),
            Err(e) => println!("{} {}", "⚠ Token check failed:".yellow(), e),
        }
    }

    config.save_to(&config_path)?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "graphaudit status".cyan());
    println!(
        "  {} - Credentials expiring in the next {} days",
        "graphaudit credentials".cyan(),
        config.preferences.threshold_days
    );
    println!("  {} - SSO classification", "graphaudit sso".cyan());

    Ok(())
}
