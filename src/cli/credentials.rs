//! Credential expiration report

use std::collections::HashSet;
use std::path::Path;

use colored::Colorize;
use log::info;
use serde::Serialize;
use tabled::Tabled;

use crate::audit::aggregate::collect_rows;
use crate::audit::{
    AggregateOptions, AggregateOutput, CredentialStatus, ManagedAppDefinition, OwningObject,
    aggregate_credentials,
};
use crate::cache::OwnerCache;
use crate::cli::args::{CredentialFilterArgs, GlobalOptions, ScopeArg};
use crate::cli::progress::create_progress_bar;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::{DirectoryApi, ObjectKind};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CredentialDisplay, ObjectSummaryDisplay};
use crate::output::json::format_json_with_summary;
use crate::output::{self, SummaryItem, Tone, summary_line};

/// Report totals, carried in JSON `meta.summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CredentialTotals {
    pub objects: usize,
    pub credentials: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub no_expiration: usize,
}

impl CredentialTotals {
    pub fn from_output(output: &AggregateOutput) -> Self {
        match output {
            AggregateOutput::Rows(rows) => {
                let objects: HashSet<&str> = rows.iter().map(|r| r.object_id.as_str()).collect();
                Self {
                    objects: objects.len(),
                    credentials: rows.len(),
                    expired: rows
                        .iter()
                        .filter(|r| r.status == CredentialStatus::Expired)
                        .count(),
                    expiring_soon: rows.iter().filter(|r| r.status.is_expiring_soon()).count(),
                    no_expiration: rows
                        .iter()
                        .filter(|r| r.status == CredentialStatus::NoExpiration)
                        .count(),
                }
            }
            AggregateOutput::Summaries(summaries) => Self {
                objects: summaries.len(),
                credentials: summaries.iter().map(|s| s.total_credentials).sum(),
                expired: summaries.iter().map(|s| s.expired).sum(),
                expiring_soon: summaries.iter().map(|s| s.expiring_soon).sum(),
                no_expiration: summaries
                    .iter()
                    .filter(|s| s.worst_status == CredentialStatus::NoExpiration)
                    .count(),
            },
        }
    }

    fn summary_items(&self) -> Vec<SummaryItem> {
        vec![
            SummaryItem::new("Objects", self.objects, Tone::Neutral),
            SummaryItem::new("Credentials", self.credentials, Tone::Neutral),
            SummaryItem::new("Expired", self.expired, Tone::Bad),
            SummaryItem::new("Expiring soon", self.expiring_soon, Tone::Warn),
            SummaryItem::new("No expiration", self.no_expiration, Tone::Neutral),
        ]
    }
}

/// List every object the scope covers, annotated for aggregation.
///
/// A failed listing aborts the report.
pub async fn collect_objects<C>(
    client: &C,
    scope: ScopeArg,
    definitions: &[ManagedAppDefinition],
) -> Result<Vec<OwningObject>>
where
    C: DirectoryApi + ?Sized,
{
    let mut objects = Vec::new();

    if scope.includes(ObjectKind::Application) {
        let apps = client.list_applications(None).await?;
        info!("Loaded {} applications", apps.len());
        objects.extend(apps.into_iter().map(OwningObject::from_application));
    }

    if scope.includes(ObjectKind::ServicePrincipal) {
        let sps = client.list_service_principals(None).await?;
        info!("Loaded {} service principals", sps.len());
        objects.extend(
            sps.into_iter()
                .map(|sp| OwningObject::from_service_principal(sp, definitions)),
        );
    }

    Ok(objects)
}

/// Combine command-line filters with configured defaults
pub fn build_options(
    filters: &CredentialFilterArgs,
    flatten: bool,
    config: &Config,
    reference: chrono::DateTime<chrono::Utc>,
) -> AggregateOptions {
    let mut options = AggregateOptions::new(reference);
    options.threshold_days = filters.days.unwrap_or(config.preferences.threshold_days);
    if filters.ignore_expiration {
        options = options.ignore_expiration();
    }
    options.exclude_expired = filters.exclude_expired;
    options.kinds = filters.kind.iter().map(|k| (*k).into()).collect();
    options.sso_types = filters.sso_type.clone();
    options.exclude_managed_identities = filters.exclude_managed_identities;
    options.exclude_managed_apps = filters.exclude_managed_apps;
    options.flatten = flatten;
    options
}

/// Aggregate, resolving owners first for the objects that will be reported
pub async fn build_report<C>(
    client: &C,
    objects: &[OwningObject],
    options: &AggregateOptions,
    resolve_owners: bool,
    show_progress: bool,
) -> AggregateOutput
where
    C: DirectoryApi + ?Sized,
{
    if !resolve_owners {
        return aggregate_credentials(objects, options, None);
    }

    let reported: HashSet<String> = collect_rows(objects, options, None)
        .into_iter()
        .map(|r| r.object_id)
        .collect();
    let owned: Vec<OwningObject> = objects
        .iter()
        .filter(|o| reported.contains(&o.id))
        .cloned()
        .collect();

    let cache = OwnerCache::new();
    let bar = create_progress_bar(owned.len() as u64, "Owners", show_progress);
    cache.prefetch(client, &owned, || bar.inc(1)).await;
    bar.finish_and_clear();

    aggregate_credentials(objects, options, Some(&cache))
}

fn render<R, D>(
    opts: &GlobalOptions,
    raw: &[R],
    display: Vec<D>,
    totals: &CredentialTotals,
) -> Result<()>
where
    R: Serialize,
    D: Tabled + Serialize,
{
    if let Some(path) = &opts.output {
        let written = output::csv::write_csv(Path::new(path), &display)?;
        if opts.format != OutputFormat::Json {
            eprintln!("{} Wrote {} rows to {}", "✓".green(), written, path.cyan());
        }
    }

    match opts.format {
        OutputFormat::Json => println!("{}", format_json_with_summary(raw, totals)?),
        OutputFormat::Table => output::print(&display, OutputFormat::Table)?,
        OutputFormat::Pretty => {
            output::print(&display, OutputFormat::Pretty)?;
            println!("\n{}", summary_line(&totals.summary_items()));
        }
    }
    Ok(())
}

/// Run the credentials report
pub async fn run(
    opts: &GlobalOptions,
    filters: &CredentialFilterArgs,
    resolve_owners: bool,
    flatten: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let definitions = ctx.config.managed_app_definitions();

    let objects = collect_objects(ctx.client.as_ref(), filters.scope, &definitions).await?;
    let options = build_options(filters, flatten, &ctx.config, ctx.reference);
    info!(
        "Reporting credentials expiring within {} days of {}",
        options.threshold_days,
        options.reference.to_rfc3339()
    );

    let report = build_report(
        ctx.client.as_ref(),
        &objects,
        &options,
        resolve_owners,
        opts.show_progress(),
    )
    .await;
    let totals = CredentialTotals::from_output(&report);

    match &report {
        AggregateOutput::Rows(rows) => {
            let display: Vec<CredentialDisplay> = rows.iter().map(CredentialDisplay::from).collect();
            render(opts, rows, display, &totals)
        }
        AggregateOutput::Summaries(summaries) => {
            let display: Vec<ObjectSummaryDisplay> =
                summaries.iter().map(ObjectSummaryDisplay::from).collect();
            render(opts, summaries, display, &totals)
        }
    }
}
