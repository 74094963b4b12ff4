//! Credential classification, filtering and per-object summaries

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::object::{CredentialKind, OwningObject};
use super::sso::SsoType;
use super::status::{Classification, CredentialStatus, classify_credential};
use crate::cache::OwnerCache;
use crate::client::ObjectKind;

/// Threshold substituted when expiration filtering is switched off
pub const IGNORE_EXPIRATION_THRESHOLD_DAYS: i64 = 3650;

/// Default reporting window in days
pub const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// Filters and switches for one aggregation run
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Classification reference, shared by every credential in the run
    pub reference: DateTime<Utc>,
    /// Include non-expired credentials with at most this many days left
    pub threshold_days: i64,
    pub exclude_expired: bool,
    /// Empty means every kind
    pub kinds: Vec<CredentialKind>,
    /// Empty means no SSO filtering; otherwise objects without an SSO type are dropped
    pub sso_types: Vec<SsoType>,
    pub exclude_managed_identities: bool,
    pub exclude_managed_apps: bool,
    /// Emit one summary per object instead of one row per credential
    pub flatten: bool,
}

impl AggregateOptions {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            reference,
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            exclude_expired: false,
            kinds: Vec::new(),
            sso_types: Vec::new(),
            exclude_managed_identities: false,
            exclude_managed_apps: false,
            flatten: false,
        }
    }

    /// Report every credential regardless of how far out it expires
    pub fn ignore_expiration(mut self) -> Self {
        self.threshold_days = IGNORE_EXPIRATION_THRESHOLD_DAYS;
        self
    }

    fn includes_object(&self, object: &OwningObject) -> bool {
        if self.exclude_managed_identities && object.is_managed_identity() {
            return false;
        }
        if self.exclude_managed_apps && object.managed_app.is_some() {
            return false;
        }
        if self.sso_types.is_empty() {
            return true;
        }
        object
            .sso
            .as_ref()
            .is_some_and(|sso| self.sso_types.iter().any(|t| t.matches(&sso.sso_type)))
    }

    fn includes_kind(&self, kind: CredentialKind) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|k| kind.selected_by(*k))
    }

    fn includes(&self, classification: &Classification) -> bool {
        if classification.status == CredentialStatus::Expired {
            return !self.exclude_expired;
        }
        classification
            .days_remaining
            .is_none_or(|days| days <= self.threshold_days)
    }
}

/// One credential in the report
#[derive(Debug, Clone, Serialize)]
pub struct CredentialRow {
    pub object_kind: ObjectKind,
    pub object_id: String,
    pub app_id: String,
    pub display_name: String,
    pub sso_type: Option<SsoType>,
    pub kind: CredentialKind,
    pub key_id: Option<String>,
    pub credential_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub days_remaining: Option<i64>,
    pub days_past_expiration: Option<i64>,
    pub status: CredentialStatus,
    pub owners: Option<String>,
}

/// All reported credentials of one object folded into a single row
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSummary {
    pub object_kind: ObjectKind,
    pub object_id: String,
    pub app_id: String,
    pub display_name: String,
    pub sso_type: Option<SsoType>,
    pub total_credentials: usize,
    pub secrets: usize,
    pub certificates: usize,
    pub saml_signing_certificates: usize,
    pub expired: usize,
    /// Expiring today or within the soon window
    pub expiring_soon: usize,
    pub earliest_expiration: Option<DateTime<Utc>>,
    pub earliest_days_remaining: Option<i64>,
    pub worst_status: CredentialStatus,
    pub owners: Option<String>,
}

/// Aggregation output, shaped by [`AggregateOptions::flatten`]
#[derive(Debug, Clone)]
pub enum AggregateOutput {
    Rows(Vec<CredentialRow>),
    Summaries(Vec<ObjectSummary>),
}

/// Ascending by days remaining, never-expiring last, earlier end date first on ties
fn compare_remaining(
    a: (Option<i64>, Option<DateTime<Utc>>),
    b: (Option<i64>, Option<DateTime<Utc>>),
) -> Ordering {
    match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(&b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Classify every credential of every object and apply the filters.
///
/// Password credentials sharing a key ID with a certificate are the
/// certificate's private-key password and are dropped before classification.
pub fn collect_rows(
    objects: &[OwningObject],
    options: &AggregateOptions,
    owners: Option<&OwnerCache>,
) -> Vec<CredentialRow> {
    let mut rows = Vec::new();

    for object in objects.iter().filter(|o| options.includes_object(o)) {
        let owner_text = owners.and_then(|cache| cache.describe(&object.id));
        let sso_type = object.sso.as_ref().map(|s| s.sso_type.clone());

        let certificate_key_ids: HashSet<&str> = object
            .key_credentials
            .iter()
            .filter_map(|k| k.key_id.as_deref())
            .collect();

        let secrets = object
            .password_credentials
            .iter()
            .filter(|p| {
                p.key_id
                    .as_deref()
                    .is_none_or(|id| !certificate_key_ids.contains(id))
            })
            .map(|p| {
                (
                    CredentialKind::Secret,
                    p.key_id.clone(),
                    p.display_name.clone(),
                    p.start_date_time,
                    p.end_date_time,
                )
            });

        let certificates = object.key_credentials.iter().map(|k| {
            let kind = if k.is_signing_certificate() {
                CredentialKind::SamlSigningCertificate
            } else {
                CredentialKind::Certificate
            };
            (
                kind,
                k.key_id.clone(),
                k.display_name.clone(),
                k.start_date_time,
                k.end_date_time,
            )
        });

        for (kind, key_id, name, start, end) in secrets.chain(certificates) {
            if !options.includes_kind(kind) {
                continue;
            }
            let classification = classify_credential(end, options.reference);
            if !options.includes(&classification) {
                continue;
            }

            rows.push(CredentialRow {
                object_kind: object.kind,
                object_id: object.id.clone(),
                app_id: object.app_id.clone(),
                display_name: object.display_name.clone(),
                sso_type: sso_type.clone(),
                kind,
                key_id,
                credential_name: name,
                start,
                end,
                days_remaining: classification.days_remaining,
                days_past_expiration: classification.days_past_expiration,
                status: classification.status,
                owners: owner_text.clone(),
            });
        }
    }

    rows.sort_by(|a, b| compare_remaining((a.days_remaining, a.end), (b.days_remaining, b.end)));
    rows
}

/// Fold credential rows into one summary per object.
///
/// Groups keep first-seen order before the final sort. The worst status is the
/// most severe status in the group; equal severities are interchangeable since
/// only the status value is reported.
pub fn flatten_rows(rows: Vec<CredentialRow>) -> Vec<ObjectSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<ObjectSummary> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.object_id.clone()).or_insert_with(|| {
            summaries.push(ObjectSummary {
                object_kind: row.object_kind,
                object_id: row.object_id.clone(),
                app_id: row.app_id.clone(),
                display_name: row.display_name.clone(),
                sso_type: row.sso_type.clone(),
                total_credentials: 0,
                secrets: 0,
                certificates: 0,
                saml_signing_certificates: 0,
                expired: 0,
                expiring_soon: 0,
                earliest_expiration: None,
                earliest_days_remaining: None,
                worst_status: row.status,
                owners: row.owners.clone(),
            });
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];

        summary.total_credentials += 1;
        match row.kind {
            CredentialKind::Secret => summary.secrets += 1,
            CredentialKind::Certificate => summary.certificates += 1,
            CredentialKind::SamlSigningCertificate => summary.saml_signing_certificates += 1,
        }
        if row.status == CredentialStatus::Expired {
            summary.expired += 1;
        }
        if row.status.is_expiring_soon() {
            summary.expiring_soon += 1;
        }
        summary.worst_status = summary.worst_status.min(row.status);

        if let Some(end) = row.end
            && summary.earliest_expiration.is_none_or(|current| end < current)
        {
            summary.earliest_expiration = Some(end);
            summary.earliest_days_remaining = row.days_remaining;
        }
    }

    summaries.sort_by(|a, b| {
        compare_remaining(
            (a.earliest_days_remaining, a.earliest_expiration),
            (b.earliest_days_remaining, b.earliest_expiration),
        )
    });
    summaries
}

/// Classify, filter, de-duplicate and optionally flatten credentials.
pub fn aggregate_credentials(
    objects: &[OwningObject],
    options: &AggregateOptions,
    owners: Option<&OwnerCache>,
) -> AggregateOutput {
    let rows = collect_rows(objects, options, owners);
    if options.flatten {
        AggregateOutput::Summaries(flatten_rows(rows))
    } else {
        AggregateOutput::Rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::managed::builtin_definitions;
    use crate::cache::OwnerInfo;
    use crate::client::ServicePrincipal;
    use crate::client::models::{KeyCredential, PasswordCredential};
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    fn secret(key_id: &str, days: Option<i64>) -> PasswordCredential {
        PasswordCredential {
            key_id: Some(key_id.to_string()),
            display_name: Some(format!("secret-{}", key_id)),
            end_date_time: days.map(|d| reference() + Duration::days(d)),
            ..Default::default()
        }
    }

    fn cert(key_id: &str, days: i64, usage: &str) -> KeyCredential {
        KeyCredential {
            key_id: Some(key_id.to_string()),
            key_type: Some("AsymmetricX509Cert".to_string()),
            usage: Some(usage.to_string()),
            end_date_time: Some(reference() + Duration::days(days)),
            ..Default::default()
        }
    }

    fn object(id: &str, secrets: Vec<PasswordCredential>, certs: Vec<KeyCredential>) -> OwningObject {
        OwningObject {
            kind: ObjectKind::Application,
            id: id.to_string(),
            app_id: format!("app-{}", id),
            display_name: format!("App {}", id),
            owner_tenant_id: None,
            service_principal_type: None,
            password_credentials: secrets,
            key_credentials: certs,
            sso: None,
            managed_app: None,
        }
    }

    fn rows(output: AggregateOutput) -> Vec<CredentialRow> {
        match output {
            AggregateOutput::Rows(rows) => rows,
            AggregateOutput::Summaries(_) => panic!("Expected rows"),
        }
    }

    #[test]
    fn test_threshold_inclusion() {
        let objects = vec![object("a", vec![secret("k1", Some(45))], vec![])];
        let mut options = AggregateOptions::new(reference());

        options.threshold_days = 30;
        assert!(collect_rows(&objects, &options, None).is_empty());

        options.threshold_days = 45;
        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, CredentialStatus::ExpiringMedium);
        assert_eq!(rows[0].days_remaining, Some(45));
    }

    #[test]
    fn test_expired_inclusion_and_exclusion() {
        let objects = vec![object("a", vec![secret("k1", Some(-10))], vec![])];
        let mut options = AggregateOptions::new(reference());

        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days_past_expiration, Some(10));

        options.exclude_expired = true;
        assert!(collect_rows(&objects, &options, None).is_empty());
    }

    #[test]
    fn test_no_expiration_bypasses_threshold() {
        let objects = vec![object("a", vec![secret("k1", None)], vec![])];
        let options = AggregateOptions::new(reference());
        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, CredentialStatus::NoExpiration);
    }

    #[test]
    fn test_ignore_expiration_uses_large_threshold() {
        let objects = vec![object("a", vec![secret("k1", Some(700))], vec![])];
        let options = AggregateOptions::new(reference()).ignore_expiration();
        assert_eq!(options.threshold_days, 3650);
        assert_eq!(collect_rows(&objects, &options, None).len(), 1);
    }

    #[test]
    fn test_certificate_password_pair_is_deduplicated() {
        let objects = vec![object(
            "a",
            vec![secret("shared", Some(5)), secret("other", Some(6))],
            vec![cert("shared", 5, "Verify")],
        )];
        let rows = collect_rows(&objects, &AggregateOptions::new(reference()), None);

        let shared: Vec<&CredentialRow> = rows
            .iter()
            .filter(|r| r.key_id.as_deref() == Some("shared"))
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].kind, CredentialKind::Certificate);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_signing_certificate_kind() {
        let objects = vec![object(
            "a",
            vec![],
            vec![cert("s", 3, "Sign"), cert("v", 4, "Verify")],
        )];
        let rows = collect_rows(&objects, &AggregateOptions::new(reference()), None);
        assert_eq!(rows[0].kind, CredentialKind::SamlSigningCertificate);
        assert_eq!(rows[1].kind, CredentialKind::Certificate);
    }

    #[test]
    fn test_kind_filter() {
        let objects = vec![object(
            "a",
            vec![secret("k1", Some(2))],
            vec![cert("c1", 3, "Sign")],
        )];
        let mut options = AggregateOptions::new(reference());
        options.kinds = vec![CredentialKind::Certificate];

        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, CredentialKind::SamlSigningCertificate);
    }

    #[test]
    fn test_sorted_ascending_with_no_expiration_last() {
        let objects = vec![object(
            "a",
            vec![
                secret("never", None),
                secret("twenty", Some(20)),
                secret("expired", Some(-3)),
                secret("two", Some(2)),
            ],
            vec![],
        )];
        let rows = collect_rows(&objects, &AggregateOptions::new(reference()), None);
        let order: Vec<&str> = rows.iter().map(|r| r.key_id.as_deref().unwrap()).collect();
        assert_eq!(order, vec!["expired", "two", "twenty", "never"]);
    }

    #[test]
    fn test_flatten_expired_and_valid() {
        let objects = vec![object(
            "a",
            vec![secret("old", Some(-1)), secret("new", Some(200))],
            vec![],
        )];
        let mut options = AggregateOptions::new(reference()).ignore_expiration();
        options.flatten = true;

        match aggregate_credentials(&objects, &options, None) {
            AggregateOutput::Summaries(summaries) => {
                assert_eq!(summaries.len(), 1);
                let s = &summaries[0];
                assert_eq!(s.worst_status, CredentialStatus::Expired);
                assert_eq!(s.total_credentials, 2);
                assert_eq!(s.secrets, 2);
                assert_eq!(s.expired, 1);
                assert_eq!(s.earliest_days_remaining, Some(0));
                assert_eq!(s.earliest_expiration, Some(reference() - Duration::days(1)));
            }
            AggregateOutput::Rows(_) => panic!("Expected summaries"),
        }
    }

    #[test]
    fn test_flatten_counts_and_order() {
        let objects = vec![
            object("late", vec![secret("l1", Some(25))], vec![]),
            object(
                "early",
                vec![secret("e1", Some(1)), secret("e2", None)],
                vec![cert("e3", 0, "Sign"), cert("e4", 10, "Verify")],
            ),
            object("never", vec![secret("n1", None)], vec![]),
        ];
        let summaries = flatten_rows(collect_rows(
            &objects,
            &AggregateOptions::new(reference()),
            None,
        ));

        let ids: Vec<&str> = summaries.iter().map(|s| s.object_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "never"]);

        let early = &summaries[0];
        assert_eq!(early.total_credentials, 4);
        assert_eq!(early.secrets, 2);
        assert_eq!(early.certificates, 1);
        assert_eq!(early.saml_signing_certificates, 1);
        assert_eq!(early.expiring_soon, 3);
        assert_eq!(early.worst_status, CredentialStatus::ExpiringToday);
        assert_eq!(early.earliest_days_remaining, Some(0));

        let never = &summaries[2];
        assert_eq!(never.worst_status, CredentialStatus::NoExpiration);
        assert!(never.earliest_expiration.is_none());
    }

    #[test]
    fn test_object_filters() {
        let sp = |id: &str, mode: &str, sp_type: &str| {
            OwningObject::from_service_principal(
                ServicePrincipal {
                    id: id.to_string(),
                    app_id: id.to_string(),
                    preferred_single_sign_on_mode: Some(mode.to_string()),
                    service_principal_type: Some(sp_type.to_string()),
                    password_credentials: vec![secret(&format!("{}-k", id), Some(1))],
                    ..Default::default()
                },
                &builtin_definitions(),
            )
        };
        let objects = vec![
            sp("saml-app", "saml", "Application"),
            sp("oidc-app", "oidc", "Application"),
            sp("mi", "", "ManagedIdentity"),
            object("registration", vec![secret("r", Some(1))], vec![]),
        ];

        let mut options = AggregateOptions::new(reference());
        options.sso_types = vec![SsoType::Saml];
        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].object_id, "saml-app");

        let mut options = AggregateOptions::new(reference());
        options.exclude_managed_identities = true;
        let rows = collect_rows(&objects, &options, None);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.object_id != "mi"));
    }

    #[test]
    fn test_managed_apps_excluded_on_request() {
        let mut managed = object("p2p", vec![secret("k", Some(3))], vec![]);
        managed.managed_app = Some("P2P Server".to_string());
        let objects = vec![managed];

        let mut options = AggregateOptions::new(reference());
        assert_eq!(collect_rows(&objects, &options, None).len(), 1);

        options.exclude_managed_apps = true;
        assert!(collect_rows(&objects, &options, None).is_empty());
    }

    #[test]
    fn test_owner_annotation_from_cache() {
        let cache = OwnerCache::new();
        cache.insert(
            "a",
            vec![OwnerInfo {
                display_name: "Ada".to_string(),
                user_principal_name: Some("ada@contoso.com".to_string()),
                object_id: "u1".to_string(),
                type_tag: "user".to_string(),
            }],
        );
        let objects = vec![object("a", vec![secret("k", Some(1))], vec![])];

        let rows = collect_rows(&objects, &AggregateOptions::new(reference()), Some(&cache));
        assert_eq!(rows[0].owners.as_deref(), Some("Ada (ada@contoso.com)"));

        let rows = collect_rows(&objects, &AggregateOptions::new(reference()), None);
        assert!(rows[0].owners.is_none());
    }
}
