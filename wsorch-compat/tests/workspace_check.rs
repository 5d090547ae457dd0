//! End-to-end compatibility checks over temporary workspaces.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;
use wsorch_compat::{Checker, NpmRange, ROOT_TARGET_NAME, RuntimeVersions, parse_runtime_version};
use wsorch_discover::{DEFAULT_ROOTS, scan_manifests};
use wsorch_types::compat::{CompatStatus, CompatSummary, Severity};

fn workspace() -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    (temp, root)
}

fn write_manifest(root: &Utf8PathBuf, rel: &str, contents: &str) {
    let dir = if rel.is_empty() { root.clone() } else { root.join(rel) };
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), contents).unwrap();
}

fn roots() -> Vec<String> {
    DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect()
}

fn node18() -> RuntimeVersions {
    RuntimeVersions::from_raw(Some("v18.19.0"), Some("10.2.3"))
}

#[test]
fn root_comes_first_and_members_are_named_by_directory() {
    let (_temp, root) = workspace();
    write_manifest(&root, "", r#"{ "name": "ws", "private": true }"#);
    write_manifest(&root, "packages/ui", r#"{ "name": "@ws/ui" }"#);
    write_manifest(&root, "projects/site", r#"{ "name": "site" }"#);

    let manifests = scan_manifests(&root, &roots()).unwrap();
    let results = Checker::new(node18()).check_workspace(&root, &manifests);
    let names: Vec<_> = results.iter().map(|r| r.target_name.as_str()).collect();
    assert_eq!(names, vec![ROOT_TARGET_NAME, "ui", "projects/site"]);
    assert!(results.iter().all(|r| r.status == CompatStatus::Compatible));
}

#[test]
fn engines_above_runtime_is_error() {
    let (_temp, root) = workspace();
    write_manifest(
        &root,
        "packages/modern",
        r#"{ "name": "modern", "version": "1.0.0", "engines": { "node": ">=20" } }"#,
    );

    let manifests = scan_manifests(&root, &roots()).unwrap();
    let results = Checker::new(node18()).check_workspace(&root, &manifests);
    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r.status, CompatStatus::Error);
    let err = r
        .issues
        .iter()
        .find(|i| i.severity == Severity::Error)
        .unwrap();
    assert!(err.message.contains(">=20"));
    assert!(err.message.contains("18.19.0"));
    assert_eq!(
        r.manifest.as_ref().and_then(|m| m.version.as_deref()),
        Some("1.0.0")
    );
}

#[test]
fn unreadable_manifest_is_error_result() {
    let (_temp, root) = workspace();
    write_manifest(&root, "packages/broken", "{");

    let manifests = scan_manifests(&root, &roots()).unwrap();
    let results = Checker::new(node18()).check_workspace(&root, &manifests);
    assert_eq!(results[0].status, CompatStatus::Error);
    assert!(results[0].manifest.is_none());
    assert!(results[0].issues[0].message.starts_with("failed to read package.json"));
}

#[test]
fn runtime_pin_mismatch_lands_on_root() {
    let (_temp, root) = workspace();
    write_manifest(&root, "", r#"{ "name": "ws" }"#);

    let results = Checker::new(node18())
        .with_runtime_pin(Some("20".to_string()))
        .check_workspace(&root, &[]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].target_name, ROOT_TARGET_NAME);
    assert_eq!(results[0].status, CompatStatus::Warning);
}

#[test]
fn runtime_pin_without_root_manifest_still_reported() {
    let (_temp, root) = workspace();
    let results = Checker::new(node18())
        .with_runtime_pin(Some("20".to_string()))
        .check_workspace(&root, &[]);
    assert_eq!(results.len(), 1);
    assert!(results[0].manifest.is_none());
}

#[test]
fn no_root_no_pin_no_root_result() {
    let (_temp, root) = workspace();
    let results = Checker::new(node18()).check_workspace(&root, &[]);
    assert!(results.is_empty());
}

#[test]
fn summary_over_mixed_workspace() {
    let (_temp, root) = workspace();
    write_manifest(&root, "packages/a", r#"{ "engines": { "node": ">=16" } }"#);
    write_manifest(&root, "packages/b", r#"{ "engines": { "node": ">=20" } }"#);
    write_manifest(&root, "packages/c", r#"{ "devDependencies": { "vite": "^5.0.0" } }"#);

    let manifests = scan_manifests(&root, &roots()).unwrap();
    let old_node = RuntimeVersions::from_raw(Some("17.0.0"), None);
    let results = Checker::new(old_node).check_workspace(&root, &manifests);
    let summary = CompatSummary::from_results(&results);
    assert_eq!(
        summary,
        CompatSummary {
            total: 3,
            compatible: 1,
            warnings: 1,
            errors: 1,
        }
    );
}

proptest! {
    /// `>=N` accepts exactly the runtimes with major >= N, and an unmet `>=N`
    /// always reports a runtime below the range minimum.
    #[test]
    fn greater_eq_major_agrees_with_major_comparison(
        required in 0u64..40,
        major in 0u64..40,
        minor in 0u64..30,
        patch in 0u64..30,
    ) {
        let range = NpmRange::parse(&format!(">={required}")).unwrap();
        let version = parse_runtime_version(&format!("v{major}.{minor}.{patch}")).unwrap();
        prop_assert_eq!(range.matches(&version), major >= required);
        if !range.matches(&version) {
            prop_assert!(version < range.minimum().unwrap());
        }
    }
}
