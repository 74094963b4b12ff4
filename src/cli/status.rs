//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "graphaudit Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());

    if !config_path.exists() {
        println!("{} Configuration not found", "✗".red());
        println!("  → Run {} to create one", "graphaudit init".cyan());
    }

    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("{} Configuration invalid: {}", "✗".red(), e);
            println!();
            return Ok(());
        }
    };
    println!();

    if let Some(tenant) = &config.tenant_id {
        println!("{} Tenant: {}", "✓".green(), tenant);
    } else {
        println!("{} No tenant recorded", "○".dimmed());
    }

    if opts.token.is_some() {
        println!("{} Access token provided (flag or environment)", "✓".green());
    } else if config.access_token.is_some() {
        println!("{} Access token configured", "✓".green());
    } else {
        println!("{} Access token not configured", "✗".red());
        println!("  → Pass --token, set GRAPHAUDIT_TOKEN, or run 'graphaudit init'");
    }

    if let Some(host) = opts.api_host.as_ref().or(config.api_host.as_ref()) {
        println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
    }

    let prefs = &config.preferences;
    println!();
    println!("Report window: {} days", prefs.threshold_days);
    println!("Filter batch size: {}", prefs.batch_size);
    println!("Batch concurrency: {}", prefs.concurrency);

    let definitions = config.managed_app_definitions();
    let inactive = definitions.iter().filter(|d| d.validation.is_none()).count();
    print!(
        "Managed-app definitions: {} ({} custom)",
        definitions.len(),
        config.managed_apps.len()
    );
    if inactive > 0 {
        print!(" {}", format!("⚠ {} without a usable validation", inactive).yellow());
    }
    println!("\n");

    Ok(())
}
