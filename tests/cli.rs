use assert_cmd::prelude::*;
use chrono::Utc;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const GUID_A: &str = "11111111-1111-1111-1111-111111111111";
const GUID_B: &str = "22222222-2222-2222-2222-222222222222";

fn hours_from_now(hours: i64) -> String {
    (Utc::now() + chrono::Duration::hours(hours)).to_rfc3339()
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn graphaudit() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("graphaudit"));
    cmd.env_remove("GRAPHAUDIT_TOKEN")
        .env_remove("GRAPHAUDIT_CONFIG")
        .env_remove("GRAPHAUDIT_API_HOST")
        .env_remove("GRAPHAUDIT_FORMAT")
        .env_remove("GRAPHAUDIT_OUTPUT");
    cmd
}

#[test]
fn version_prints_package_version() {
    graphaudit()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_report_commands() {
    graphaudit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("credentials"))
        .stdout(predicate::str::contains("sso"))
        .stdout(predicate::str::contains("filter-test"));
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(
        temp.path(),
        "tenant_id: contoso.onmicrosoft.com\naccess_token: tok\npreferences:\n  threshold_days: 45\n",
    );

    let assert = graphaudit()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Tenant: contoso.onmicrosoft.com"));
    assert!(stdout.contains("Access token configured"));
    assert!(stdout.contains("Report window: 45 days"));
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));

    Ok(())
}

#[test]
fn status_without_config_points_to_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    graphaudit()
        .arg("status")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration not found"))
        .stdout(predicate::str::contains("graphaudit init"));

    Ok(())
}

#[test]
fn credentials_without_token_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    graphaudit()
        .arg("credentials")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Access token not configured"));

    Ok(())
}

#[test]
fn filter_test_rejects_out_of_range_batch_size() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    graphaudit()
        .arg("filter-test")
        .arg(GUID_A)
        .arg("--batch-size")
        .arg("25")
        .arg("--token")
        .arg("dummy")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch size must be between 1 and 20"));

    Ok(())
}

#[test]
fn sso_rejects_unknown_type_filter() {
    graphaudit()
        .arg("sso")
        .arg("--sso-type")
        .arg("kerberos")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown SSO type"));
}

fn applications_body() -> String {
    format!(
        r#"{{
            "value": [
                {{
                    "id": "app-obj",
                    "appId": "{GUID_A}",
                    "displayName": "Payroll",
                    "passwordCredentials": [
                        {{ "keyId": "s1", "displayName": "ci", "endDateTime": "{soon}" }},
                        {{ "keyId": "s2", "displayName": "old", "endDateTime": "{past}" }}
                    ],
                    "keyCredentials": null
                }}
            ]
        }}"#,
        soon = hours_from_now(5 * 24),
        past = hours_from_now(-84),
    )
}

fn service_principals_body() -> String {
    format!(
        r#"{{
            "value": [
                {{
                    "id": "sp-obj",
                    "appId": "{GUID_B}",
                    "displayName": "Salesforce",
                    "preferredSingleSignOnMode": "saml",
                    "servicePrincipalType": "Application",
                    "keyCredentials": [
                        {{
                            "keyId": "c1",
                            "type": "AsymmetricX509Cert",
                            "usage": "Sign",
                            "endDateTime": "{soon}"
                        }}
                    ]
                }}
            ]
        }}"#,
        soon = hours_from_now(10 * 24),
    )
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn credentials_json_report() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _apps = server
        .mock("GET", "/applications")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(applications_body())
        .create();
    let _sps = server
        .mock("GET", "/servicePrincipals")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(service_principals_body())
        .create();

    let temp = tempdir()?;
    let assert = graphaudit()
        .arg("credentials")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .env("GRAPHAUDIT_TOKEN", "dummy")
        .env("GRAPHAUDIT_API_HOST", server.url())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)?;
    let data = json["data"].as_array().expect("data array");

    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["status"], "Expired");
    // 3.5 days ago floors to 4 days past
    assert_eq!(data[0]["days_past_expiration"], 4);
    assert_eq!(data[2]["kind"], "SamlSigningCertificate");
    assert_eq!(json["meta"]["summary"]["expired"], 1);
    assert_eq!(json["meta"]["summary"]["objects"], 2);

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn credentials_flatten_writes_csv() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _apps = server
        .mock("GET", "/applications")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(applications_body())
        .create();

    let temp = tempdir()?;
    let csv_path = temp.path().join("report.csv");

    graphaudit()
        .arg("credentials")
        .arg("--scope")
        .arg("applications")
        .arg("--flatten")
        .arg("--output")
        .arg(&csv_path)
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .env("GRAPHAUDIT_TOKEN", "dummy")
        .env("GRAPHAUDIT_API_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Payroll"));

    let csv = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("object_type,name,app_id"));
    assert!(lines[1].contains("Payroll"));
    assert!(lines[1].contains("Expired"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn credentials_unauthorized_exits_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _apps = server
        .mock("GET", "/applications")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .create();

    let temp = tempdir()?;
    graphaudit()
        .arg("credentials")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .env("GRAPHAUDIT_TOKEN", "expired")
        .env("GRAPHAUDIT_API_HOST", server.url())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Authentication failed"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn filter_test_reports_found_and_malformed() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _sps = server
        .mock("GET", "/servicePrincipals")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(service_principals_body())
        .expect(1)
        .create();

    let temp = tempdir()?;
    let assert = graphaudit()
        .arg("filter-test")
        .arg(GUID_A)
        .arg(GUID_B)
        .arg("not-a-guid")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .env("GRAPHAUDIT_TOKEN", "dummy")
        .env("GRAPHAUDIT_API_HOST", server.url())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)?;
    let summary = &json["meta"]["summary"];

    assert_eq!(summary["requested"], 3);
    assert_eq!(summary["found"], 1);
    assert_eq!(summary["not_found"], 1);
    assert_eq!(summary["malformed"], 1);
    assert_eq!(summary["failed_batches"], 0);
    assert_eq!(json["data"][0]["size"], 2);

    Ok(())
}
