use crate::manifest::PackageManifest;
use crate::target::TargetKind;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host environment captured for the info and compatibility reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_version: Option<String>,

    /// Version pinned in `.nvmrc` / `.node-version`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_pin: Option<String>,

    pub platform: String,
    pub arch: String,
    pub cwd: Utf8PathBuf,
}

/// Per-manifest overview used by the workspace info report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
    pub module_type: String,
    pub private: bool,
    pub description: String,
    pub main: String,
    pub scripts: Vec<String>,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub peer_dependencies: Vec<String>,
    pub engines: BTreeMap<String, String>,
    pub relative_path: Utf8PathBuf,
    pub kind: TargetKind,

    /// Set when the manifest could not be read; the other fields are then defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PackageSummary {
    pub fn from_manifest(
        manifest: &PackageManifest,
        dir_name: &str,
        relative_path: Utf8PathBuf,
        kind: TargetKind,
    ) -> Self {
        Self {
            name: manifest
                .name
                .clone()
                .unwrap_or_else(|| dir_name.to_string()),
            version: manifest
                .version
                .clone()
                .unwrap_or_else(|| "0.0.0".to_string()),
            module_type: manifest
                .module_type
                .clone()
                .unwrap_or_else(|| "commonjs".to_string()),
            private: manifest.private,
            description: manifest.description.clone().unwrap_or_default(),
            main: manifest.main.clone().unwrap_or_default(),
            scripts: manifest.scripts.keys().cloned().collect(),
            dependencies: manifest.dependencies.keys().cloned().collect(),
            dev_dependencies: manifest.dev_dependencies.keys().cloned().collect(),
            peer_dependencies: manifest.peer_dependencies.keys().cloned().collect(),
            engines: manifest.engines.clone(),
            relative_path,
            kind,
            error: None,
        }
    }

    pub fn unreadable(
        dir_name: &str,
        relative_path: Utf8PathBuf,
        kind: TargetKind,
        error: String,
    ) -> Self {
        Self::from_manifest(&PackageManifest::default(), dir_name, relative_path, kind)
            .with_error(error)
    }

    fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyUsage {
    pub name: String,
    pub count: u64,
}

/// Dependency usage counts across the workspace, most used first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyOverview {
    pub production: Vec<DependencyUsage>,
    pub development: Vec<DependencyUsage>,
    pub peer: Vec<DependencyUsage>,
}

impl DependencyOverview {
    /// Count how many manifests declare each dependency.
    ///
    /// Ties are broken by name so the output is stable.
    pub fn tally<'a>(summaries: impl IntoIterator<Item = &'a PackageSummary>) -> Self {
        let mut prod: BTreeMap<&str, u64> = BTreeMap::new();
        let mut dev: BTreeMap<&str, u64> = BTreeMap::new();
        let mut peer: BTreeMap<&str, u64> = BTreeMap::new();

        for s in summaries {
            for d in &s.dependencies {
                *prod.entry(d).or_default() += 1;
            }
            for d in &s.dev_dependencies {
                *dev.entry(d).or_default() += 1;
            }
            for d in &s.peer_dependencies {
                *peer.entry(d).or_default() += 1;
            }
        }

        Self {
            production: ranked(prod),
            development: ranked(dev),
            peer: ranked(peer),
        }
    }
}

fn ranked(counts: BTreeMap<&str, u64>) -> Vec<DependencyUsage> {
    let mut out: Vec<DependencyUsage> = counts
        .into_iter()
        .map(|(name, count)| DependencyUsage {
            name: name.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration already orders by name; a stable sort keeps that as the tie-break.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub schema: String,
    pub environment: EnvironmentInfo,

    /// The root manifest; `None` when the workspace root has no `package.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PackageSummary>,

    pub packages: Vec<PackageSummary>,
    pub projects: Vec<PackageSummary>,
    pub apps: Vec<PackageSummary>,
    pub dependencies: DependencyOverview,

    /// Helper script files under `scripts/`.
    pub scripts: Vec<String>,
}

impl WorkspaceInfo {
    pub fn members(&self) -> impl Iterator<Item = &PackageSummary> {
        self.packages
            .iter()
            .chain(self.projects.iter())
            .chain(self.apps.iter())
    }
}
