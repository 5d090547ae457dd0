use crate::compat::CompatSummary;
use crate::target::{BuildTarget, TargetKind};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Outcome of running one target's build command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub target_name: String,
    pub path: Utf8PathBuf,
    pub kind: TargetKind,
    pub success: bool,

    /// `None` when the process could not be spawned or was killed by a signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    pub duration_ms: u64,

    #[serde(default)]
    pub stdout: String,

    #[serde(default)]
    pub stderr: String,
}

impl BuildResult {
    /// A failed result for a target whose process never started.
    pub fn spawn_failure(target: &BuildTarget, duration_ms: u64, message: String) -> Self {
        Self {
            target_name: target.name.clone(),
            path: target.path.clone(),
            kind: target.kind,
            success: false,
            exit_code: None,
            duration_ms,
            stdout: String::new(),
            stderr: message,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate build result for target '{0}'")]
pub struct DuplicateResult(pub String);

/// Results of one runner invocation, keyed by target name.
///
/// Each key is written exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResults {
    results: BTreeMap<String, BuildResult>,
}

impl BuildResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: BuildResult) -> Result<(), DuplicateResult> {
        if self.results.contains_key(&result.target_name) {
            return Err(DuplicateResult(result.target_name));
        }
        self.results.insert(result.target_name.clone(), result);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BuildResult> {
        self.results.get(name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All results, ordered by target name.
    pub fn iter(&self) -> impl Iterator<Item = &BuildResult> {
        self.results.values()
    }

    pub fn successful(&self) -> impl Iterator<Item = &BuildResult> {
        self.iter().filter(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &BuildResult> {
        self.iter().filter(|r| !r.success)
    }

    pub fn any_failed(&self) -> bool {
        self.iter().any(|r| !r.success)
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            total: self.results.len() as u64,
            successful: self.successful().count() as u64,
            failed: self.failed().count() as u64,
            total_duration_ms: self.iter().map(|r| r.duration_ms).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,

    /// Sum of per-target durations (not wall-clock time in parallel mode).
    pub total_duration_ms: u64,
}

/// JSON form of a build run, written next to the Markdown report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub schema: String,
    pub generated_at: String,
    pub summary: BuildSummary,
    pub results: Vec<BuildResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatSummary>,
}

impl BuildReport {
    pub fn new(
        generated_at: impl Into<String>,
        results: &BuildResults,
        compatibility: Option<CompatSummary>,
    ) -> Self {
        Self {
            schema: crate::schema::WSORCH_BUILD_REPORT_V1.to_string(),
            generated_at: generated_at.into(),
            summary: results.summary(),
            results: results.iter().cloned().collect(),
            compatibility,
        }
    }
}
