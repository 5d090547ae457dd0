use crate::checker::RuntimeVersions;
use crate::known;
use crate::range::{NpmRange, parse_runtime_version};
use semver::Version;
use wsorch_types::compat::Issue;
use wsorch_types::manifest::PackageManifest;

/// Check `engines.node` and `engines.npm` against the running versions.
pub fn check_engines(manifest: &PackageManifest, runtime: &RuntimeVersions) -> Vec<Issue> {
    let mut issues = Vec::new();
    if let Some(req) = manifest.engine("node") {
        issues.extend(check_engine("node", req, runtime.node.as_ref()));
    }
    if let Some(req) = manifest.engine("npm") {
        issues.extend(check_engine("npm", req, runtime.npm.as_ref()));
    }
    issues
}

fn check_engine(engine: &str, requirement: &str, current: Option<&Version>) -> Vec<Issue> {
    let shown = current
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut issues = vec![Issue::info(format!(
        "{engine} requirement: {requirement}, current: {shown}"
    ))];

    let Some(range) = NpmRange::parse(requirement) else {
        issues.push(Issue::info(format!(
            "{engine} requirement '{requirement}' is not a version range; treated as unconstrained"
        )));
        return issues;
    };

    let Some(current) = current else {
        issues.push(Issue::warning(format!(
            "could not determine the running {engine} version; \
             requirement {requirement} not checked"
        )));
        return issues;
    };

    if range.matches(current) {
        return issues;
    }

    match range.minimum() {
        Some(min) if *current < min => issues.push(Issue::error(format!(
            "{engine} {current} does not meet requirement {requirement} (needs at least {min})"
        ))),
        _ => issues.push(Issue::warning(format!(
            "{engine} {current} is outside the supported range {requirement}"
        ))),
    }
    issues
}

/// Look up declared dependencies in the known-issue table.
pub fn check_dependencies(manifest: &PackageManifest, runtime: &RuntimeVersions) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (name, declared) in manifest.all_dependencies() {
        let Some(entry) = known::lookup(name) else {
            continue;
        };
        if !declared_reaches(declared, entry.since) {
            continue;
        }

        let unmet = entry.requires_node.and_then(|req| {
            let range = NpmRange::parse(req)?;
            let node = runtime.node.as_ref()?;
            (!range.matches(node)).then(|| (req, node))
        });

        match unmet {
            Some((req, node)) => issues.push(Issue::warning(format!(
                "{name}@{declared} requires node {req}, running {node}"
            ))),
            None => issues.push(Issue::info(format!("{name}@{declared}: {}", entry.note))),
        }
    }
    issues
}

/// Whether the lowest version a declared dependency range allows falls within `since`.
fn declared_reaches(declared: &str, since: &str) -> bool {
    let (Some(declared), Some(since)) = (NpmRange::parse(declared), NpmRange::parse(since)) else {
        return false;
    };
    declared.minimum().is_some_and(|min| since.matches(&min))
}

/// Compare the workspace's pinned runtime (`.nvmrc`) with the running node.
pub fn check_runtime_pin(pin: &str, runtime: &RuntimeVersions) -> Vec<Issue> {
    let Some(pinned) = parse_runtime_version(pin) else {
        return vec![Issue::info(format!(
            "runtime pin '{pin}' is not a version number; not checked"
        ))];
    };
    let Some(node) = runtime.node.as_ref() else {
        return vec![Issue::warning(format!(
            "workspace pins node {pin} but the running node version is unknown"
        ))];
    };
    if pinned.major != node.major {
        return vec![Issue::warning(format!(
            "workspace pins node {pin} but node {node} is running"
        ))];
    }
    vec![Issue::info(format!("node {node} matches pinned version {pin}"))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsorch_types::compat::Severity;

    fn runtime(node: &str, npm: &str) -> RuntimeVersions {
        RuntimeVersions {
            node: parse_runtime_version(node),
            npm: parse_runtime_version(npm),
        }
    }

    fn manifest(json: &str) -> PackageManifest {
        serde_json::from_str(json).unwrap()
    }

    fn severities(issues: &[Issue]) -> Vec<Severity> {
        issues.iter().map(|i| i.severity).collect()
    }

    #[test]
    fn node_below_minimum_is_error_naming_both_versions() {
        let m = manifest(r#"{ "engines": { "node": ">=20" } }"#);
        let issues = check_engines(&m, &runtime("v18.19.0", "10.2.0"));
        assert_eq!(severities(&issues), vec![Severity::Info, Severity::Error]);
        let msg = &issues[1].message;
        assert!(msg.contains(">=20"), "{msg}");
        assert!(msg.contains("18.19.0"), "{msg}");
    }

    #[test]
    fn satisfied_engine_is_info_only() {
        let m = manifest(r#"{ "engines": { "node": ">=18", "npm": ">=9" } }"#);
        let issues = check_engines(&m, &runtime("20.11.0", "10.2.4"));
        assert_eq!(severities(&issues), vec![Severity::Info, Severity::Info]);
    }

    #[test]
    fn above_upper_bound_is_warning() {
        let m = manifest(r#"{ "engines": { "node": ">=14 <18" } }"#);
        let issues = check_engines(&m, &runtime("20.0.0", "10.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Info, Severity::Warning]);
    }

    #[test]
    fn exclusive_bound_at_version_ceiling_is_warning() {
        let m = manifest(r#"{ "engines": { "node": ">18446744073709551615" } }"#);
        let issues = check_engines(&m, &runtime("18.0.0", "10.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Info, Severity::Warning]);
    }

    #[test]
    fn malformed_engine_falls_back_to_no_constraint() {
        let m = manifest(r#"{ "engines": { "node": "lts/*" } }"#);
        let issues = check_engines(&m, &runtime("12.0.0", "6.0.0"));
        assert!(issues.iter().all(|i| i.severity == Severity::Info));
    }

    #[test]
    fn unknown_runtime_is_warning() {
        let m = manifest(r#"{ "engines": { "node": ">=18" } }"#);
        let issues = check_engines(&m, &RuntimeVersions::default());
        assert_eq!(severities(&issues), vec![Severity::Info, Severity::Warning]);
    }

    #[test]
    fn npm_engine_is_checked_too() {
        let m = manifest(r#"{ "engines": { "npm": ">=10" } }"#);
        let issues = check_engines(&m, &runtime("20.0.0", "8.19.4"));
        assert_eq!(issues.last().unwrap().severity, Severity::Error);
        assert!(issues.last().unwrap().message.starts_with("npm 8.19.4"));
    }

    #[test]
    fn no_engines_no_issues() {
        let m = manifest("{}");
        assert!(check_engines(&m, &runtime("20.0.0", "10.0.0")).is_empty());
    }

    #[test]
    fn known_dependency_met_is_info() {
        let m = manifest(r#"{ "dependencies": { "react": "^18.2.0" } }"#);
        let issues = check_dependencies(&m, &runtime("20.0.0", "10.0.0"));
        assert_eq!(issues, vec![Issue::info("react@^18.2.0: Requires Node.js >= 16")]);
    }

    #[test]
    fn known_dependency_unmet_is_warning() {
        let m = manifest(r#"{ "devDependencies": { "vite": "^5.1.0" } }"#);
        let issues = check_dependencies(&m, &runtime("16.20.0", "8.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Warning]);
        assert!(issues[0].message.contains("vite@^5.1.0"));
    }

    #[test]
    fn older_dependency_versions_are_not_flagged() {
        let m = manifest(r#"{ "dependencies": { "react": "^17.0.2", "vite": "workspace:*" } }"#);
        assert!(check_dependencies(&m, &runtime("14.0.0", "6.0.0")).is_empty());
    }

    #[test]
    fn informational_entry_without_node_requirement() {
        let m = manifest(r#"{ "dependencies": { "three": "^0.160.0" } }"#);
        let issues = check_dependencies(&m, &runtime("10.0.0", "6.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Info]);
    }

    #[test]
    fn runtime_pin_major_mismatch_warns() {
        let issues = check_runtime_pin("20", &runtime("18.19.0", "10.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Warning]);
        let issues = check_runtime_pin("18.17.1", &runtime("18.19.0", "10.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Info]);
        let issues = check_runtime_pin("lts/hydrogen", &runtime("18.19.0", "10.0.0"));
        assert_eq!(severities(&issues), vec![Severity::Info]);
    }
}
