//! SSO classification report

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use log::info;
use serde::Serialize;

use crate::audit::sso::SsoResolution;
use crate::audit::{ManagedAppDefinition, OwningObject};
use crate::cli::args::{GlobalOptions, SsoFilterArgs};
use crate::cli::{CommandContext, OutputFormat};
use crate::client::DirectoryApi;
use crate::error::Result;
use crate::models::SsoDisplay;
use crate::output::json::format_json_with_summary;
use crate::output::{self, SummaryItem, Tone, summary_line};

/// One service principal in JSON output
#[derive(Debug, Clone, Serialize)]
pub struct SsoRecord {
    pub object_id: String,
    pub app_id: String,
    pub display_name: String,
    /// Tenant that registered the application; differs from ours for third-party apps
    pub owner_tenant_id: Option<String>,
    pub sso: Option<SsoResolution>,
    pub managed_app: Option<String>,
}

impl From<&OwningObject> for SsoRecord {
    fn from(object: &OwningObject) -> Self {
        Self {
            object_id: object.id.clone(),
            app_id: object.app_id.clone(),
            display_name: object.display_name.clone(),
            owner_tenant_id: object.owner_tenant_id.clone(),
            sso: object.sso.clone(),
            managed_app: object.managed_app.clone(),
        }
    }
}

/// Service principals passing the filters, sorted by name
pub async fn collect_sso_objects<C>(
    client: &C,
    filters: &SsoFilterArgs,
    definitions: &[ManagedAppDefinition],
) -> Result<Vec<OwningObject>>
where
    C: DirectoryApi + ?Sized,
{
    let sps = client.list_service_principals(None).await?;
    info!("Loaded {} service principals", sps.len());

    let mut objects: Vec<OwningObject> = sps
        .into_iter()
        .map(|sp| OwningObject::from_service_principal(sp, definitions))
        .filter(|o| filters.include_managed_identities || !o.is_managed_identity())
        .filter(|o| {
            filters.sso_type.is_empty()
                || o.sso
                    .as_ref()
                    .is_some_and(|s| filters.sso_type.iter().any(|t| t.matches(&s.sso_type)))
        })
        .collect();

    objects.sort_by_key(|o| o.display_name.to_lowercase());
    Ok(objects)
}

/// Count per SSO type label
pub fn count_by_type(objects: &[OwningObject]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for object in objects {
        if let Some(sso) = &object.sso {
            *counts.entry(sso.sso_type.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Run the SSO report
pub async fn run(opts: &GlobalOptions, filters: &SsoFilterArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let definitions = ctx.config.managed_app_definitions();

    let objects = collect_sso_objects(ctx.client.as_ref(), filters, &definitions).await?;
    let counts = count_by_type(&objects);
    let display: Vec<SsoDisplay> = objects.iter().map(SsoDisplay::from).collect();

    if let Some(path) = &opts.output {
        let written = output::csv::write_csv(Path::new(path), &display)?;
        if opts.format != OutputFormat::Json {
            eprintln!("{} Wrote {} rows to {}", "✓".green(), written, path.cyan());
        }
    }

    match opts.format {
        OutputFormat::Json => {
            let records: Vec<SsoRecord> = objects.iter().map(SsoRecord::from).collect();
            println!("{}", format_json_with_summary(&records, &counts)?);
        }
        OutputFormat::Table => output::print(&display, OutputFormat::Table)?,
        OutputFormat::Pretty => {
            output::print(&display, OutputFormat::Pretty)?;
            let items: Vec<SummaryItem> = counts
                .iter()
                .map(|(label, count)| SummaryItem::new(label.clone(), *count, Tone::Neutral))
                .collect();
            println!("\n{}", summary_line(&items));
        }
    }
    Ok(())
}
