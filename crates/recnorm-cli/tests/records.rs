//! Integration tests for record and configuration file handling.

use std::collections::BTreeMap;
use std::fs;

use serde_json::json;
use tempfile::TempDir;

use recnorm_cli::records::{
    normalize_records, read_optional_map, read_records, records_to_json, sanitized_renames,
};
use recnorm_model::RawConfig;
use recnorm_normalization::{DtypeRegistry, ModuleConfigBuilder};

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn leads_config(dir: &TempDir) -> std::path::PathBuf {
    let renames = write(
        dir,
        "renames.json",
        r#"{"Lead Id": "lead_id", "Annual Revenue": "annual_revenue", "Email Opt Out": "email_opt_out", "Fax": null}"#,
    );
    let dtypes = write(
        dir,
        "dtypes.json",
        r#"{"Lead Id": "int", "Annual Revenue": "float", "Email Opt Out": "bool", "Fax": "str"}"#,
    );
    let renames = read_optional_map(&renames).unwrap();
    let dtypes = read_optional_map(&dtypes).unwrap();
    let config = ModuleConfigBuilder::build("Leads", &renames, &dtypes);
    write(dir, "config.json", &config.to_json_pretty().unwrap())
}

const RECORDS: &str = r#"[
    {"Lead Id": "17", "Annual Revenue": "2.5M", "Email Opt Out": "false", "Fax": "555", "Website": "example.com"},
    {"Lead Id": 18, "Annual Revenue": "n/a", "Email Opt Out": "yes"}
]"#;

#[test]
fn test_normalize_configured_fields() {
    let dir = TempDir::new().unwrap();
    let config_path = leads_config(&dir);
    let records_path = write(&dir, "records.json", RECORDS);

    let registry = DtypeRegistry::standard();
    let raw = RawConfig::from_path(&config_path).unwrap();
    let modules = ModuleConfigBuilder::new(&registry).resolve(&raw).unwrap();
    let records = read_records(&records_path).unwrap();
    let normalized = normalize_records(&registry, &modules["Leads"], &records, false).unwrap();

    assert_eq!(
        records_to_json(&normalized),
        json!([
            {"annual_revenue": 2_500_000.0, "email_opt_out": false, "lead_id": 17},
            {"annual_revenue": 0.0, "email_opt_out": true, "lead_id": 18}
        ])
    );
}

#[test]
fn test_normalize_keeps_unconfigured_fields() {
    let dir = TempDir::new().unwrap();
    let config_path = leads_config(&dir);
    let records_path = write(&dir, "records.json", RECORDS);

    let registry = DtypeRegistry::standard();
    let raw = RawConfig::from_path(&config_path).unwrap();
    let modules = ModuleConfigBuilder::new(&registry).resolve(&raw).unwrap();
    let records = read_records(&records_path).unwrap();
    let normalized = normalize_records(&registry, &modules["Leads"], &records, true).unwrap();

    assert_eq!(
        records_to_json(&normalized[..1]),
        json!([{
            "Website": "example.com",
            "annual_revenue": 2_500_000.0,
            "email_opt_out": false,
            "lead_id": 17
        }])
    );
}

#[test]
fn test_sanitized_renames_build_resolvable_config() {
    let dtypes: BTreeMap<String, Option<String>> = [
        ("Created Time".to_string(), Some("datetime".to_string())),
        ("Lead-Owner".to_string(), Some("str".to_string())),
    ]
    .into_iter()
    .collect();
    let renames = sanitized_renames(dtypes.keys());
    let raw = ModuleConfigBuilder::build("Leads", &renames, &dtypes);

    let registry = DtypeRegistry::standard();
    let modules = ModuleConfigBuilder::new(&registry).resolve(&raw).unwrap();
    let leads = &modules["Leads"];
    assert_eq!(
        leads.field("Created Time").unwrap().target_name(),
        "created_time"
    );
    assert_eq!(leads.field("Lead-Owner").unwrap().target_name(), "lead_owner");
}

#[test]
fn test_missing_records_file() {
    let dir = TempDir::new().unwrap();
    let err = read_records(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("read records"));
}
