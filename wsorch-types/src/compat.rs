use crate::info::EnvironmentInfo;
use crate::manifest::ManifestSummary;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One advisory attached to a compatibility result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatStatus {
    Compatible,
    Warning,
    Error,
}

impl CompatStatus {
    /// Worst severity wins; info-only issues leave a result compatible.
    pub fn from_issues(issues: &[Issue]) -> Self {
        match issues.iter().map(|i| i.severity).max() {
            Some(Severity::Error) => CompatStatus::Error,
            Some(Severity::Warning) => CompatStatus::Warning,
            Some(Severity::Info) | None => CompatStatus::Compatible,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompatStatus::Compatible => "compatible",
            CompatStatus::Warning => "warning",
            CompatStatus::Error => "error",
        }
    }
}

/// Advisory compatibility verdict for one manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub target_name: String,
    pub path: Utf8PathBuf,
    pub status: CompatStatus,

    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Absent when the manifest could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestSummary>,
}

impl CompatibilityResult {
    pub fn from_issues(
        target_name: impl Into<String>,
        path: Utf8PathBuf,
        issues: Vec<Issue>,
        manifest: Option<ManifestSummary>,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            path,
            status: CompatStatus::from_issues(&issues),
            issues,
            manifest,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatSummary {
    pub total: u64,
    pub compatible: u64,
    pub warnings: u64,
    pub errors: u64,
}

impl CompatSummary {
    pub fn from_results(results: &[CompatibilityResult]) -> Self {
        let mut s = CompatSummary::default();
        for r in results {
            s.total += 1;
            match r.status {
                CompatStatus::Compatible => s.compatible += 1,
                CompatStatus::Warning => s.warnings += 1,
                CompatStatus::Error => s.errors += 1,
            }
        }
        s
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// JSON form of a compatibility run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatReport {
    pub schema: String,
    pub generated_at: String,
    pub environment: EnvironmentInfo,
    pub summary: CompatSummary,
    pub results: Vec<CompatibilityResult>,
}

impl CompatReport {
    pub fn new(
        generated_at: impl Into<String>,
        environment: EnvironmentInfo,
        results: Vec<CompatibilityResult>,
    ) -> Self {
        Self {
            schema: crate::schema::WSORCH_COMPAT_REPORT_V1.to_string(),
            generated_at: generated_at.into(),
            environment,
            summary: CompatSummary::from_results(&results),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_no_issues_is_compatible() {
        assert_eq!(CompatStatus::from_issues(&[]), CompatStatus::Compatible);
    }

    #[test]
    fn info_only_is_compatible() {
        let issues = vec![Issue::info("node requirement: >=18")];
        assert_eq!(CompatStatus::from_issues(&issues), CompatStatus::Compatible);
    }

    #[test]
    fn error_outranks_warning() {
        let issues = vec![Issue::warning("w"), Issue::error("e"), Issue::info("i")];
        assert_eq!(CompatStatus::from_issues(&issues), CompatStatus::Error);
    }

    #[test]
    fn summary_counts_each_status() {
        let mk = |name: &str, issues: Vec<Issue>| {
            CompatibilityResult::from_issues(name, Utf8PathBuf::from(name), issues, None)
        };
        let results = vec![
            mk("a", vec![]),
            mk("b", vec![Issue::warning("w")]),
            mk("c", vec![Issue::error("e")]),
            mk("d", vec![Issue::info("i")]),
        ];
        let s = CompatSummary::from_results(&results);
        assert_eq!(
            s,
            CompatSummary {
                total: 4,
                compatible: 2,
                warnings: 1,
                errors: 1
            }
        );
        assert!(s.has_errors());
    }

    #[test]
    fn severity_serializes_snake_case() {
        let v = serde_json::to_value(Issue::warning("x")).unwrap();
        assert_eq!(v["severity"], "warning");
    }

    #[test]
    fn report_carries_schema_and_summary() {
        let results = vec![CompatibilityResult::from_issues(
            "a",
            Utf8PathBuf::from("a"),
            vec![Issue::error("e")],
            None,
        )];
        let report = CompatReport::new("now", EnvironmentInfo::default(), results);
        assert_eq!(report.schema, crate::schema::WSORCH_COMPAT_REPORT_V1);
        assert_eq!(report.summary.errors, 1);
    }

    #[test]
    fn report_survives_json_round_trip() {
        let env = EnvironmentInfo {
            node_version: Some("20.11.1".to_string()),
            ..EnvironmentInfo::default()
        };
        let results = vec![CompatibilityResult::from_issues(
            "b",
            Utf8PathBuf::from("packages/b"),
            vec![Issue::info("node requirement: >=20"), Issue::warning("w")],
            None,
        )];
        let report = CompatReport::new("2024-01-01T00:00:00Z", env, results);
        let json = serde_json::to_string(&report).unwrap();
        let back: CompatReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
