//! Default port implementations.

use crate::ports::{ManifestSource, RuntimeProbe, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::process::{Command, Stdio};
use tracing::debug;
use wsorch_discover::{LoadedManifest, ManifestLoadError};
use wsorch_types::manifest::PackageManifest;

/// Loads manifests from the filesystem via `wsorch_discover::scan_manifests`.
#[derive(Debug, Clone)]
pub struct FsManifestSource {
    pub workspace_root: Utf8PathBuf,
}

impl FsManifestSource {
    pub fn new(workspace_root: Utf8PathBuf) -> Self {
        Self { workspace_root }
    }
}

impl ManifestSource for FsManifestSource {
    fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    fn load_manifests(&self, roots: &[String]) -> anyhow::Result<Vec<LoadedManifest>> {
        wsorch_discover::scan_manifests(&self.workspace_root, roots)
            .with_context(|| format!("scan manifests under {}", self.workspace_root))
    }

    fn load_root(&self) -> Option<Result<PackageManifest, ManifestLoadError>> {
        let path = self.workspace_root.join("package.json");
        if !path.is_file() {
            return None;
        }
        Some(wsorch_discover::load_manifest(&path))
    }
}

/// Asks `node --version` and `npm --version`.
///
/// A missing binary or a non-zero exit reads as "unknown".
#[derive(Debug, Clone, Default)]
pub struct ShellRuntimeProbe;

impl RuntimeProbe for ShellRuntimeProbe {
    fn node_version(&self) -> Option<String> {
        query_version("node")
    }

    fn npm_version(&self) -> Option<String> {
        query_version(if cfg!(windows) { "npm.cmd" } else { "npm" })
    }
}

fn query_version(program: &str) -> Option<String> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => {
            let raw = String::from_utf8_lossy(&out.stdout);
            let v = raw.trim().trim_start_matches('v');
            (!v.is_empty()).then(|| v.to_string())
        }
        Ok(out) => {
            debug!(program, status = %out.status, "version query failed");
            None
        }
        Err(e) => {
            debug!(program, error = %e, "version query could not start");
            None
        }
    }
}

/// Fixed versions, for command-line overrides and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRuntimeProbe {
    pub node: Option<String>,
    pub npm: Option<String>,
}

impl StaticRuntimeProbe {
    pub fn new(node: Option<&str>, npm: Option<&str>) -> Self {
        Self {
            node: node.map(str::to_string),
            npm: npm.map(str::to_string),
        }
    }
}

impl RuntimeProbe for StaticRuntimeProbe {
    fn node_version(&self) -> Option<String> {
        self.node.clone()
    }

    fn npm_version(&self) -> Option<String> {
        self.npm.clone()
    }
}

/// Prefers explicit versions and asks the fallback probe for the rest.
pub struct OverrideRuntimeProbe<'a> {
    pub overrides: StaticRuntimeProbe,
    pub fallback: &'a dyn RuntimeProbe,
}

impl RuntimeProbe for OverrideRuntimeProbe<'_> {
    fn node_version(&self) -> Option<String> {
        self.overrides
            .node
            .clone()
            .or_else(|| self.fallback.node_version())
    }

    fn npm_version(&self) -> Option<String> {
        self.overrides
            .npm
            .clone()
            .or_else(|| self.fallback.npm_version())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }
}
