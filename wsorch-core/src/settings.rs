//! Clap-free settings for the wsorch pipelines.

use camino::{Utf8Path, Utf8PathBuf};
use wsorch_discover::DEFAULT_ROOTS;
use wsorch_runner::{Invocation, RunMode};

pub const DEFAULT_BUILD_REPORT: &str = "docs/build-report.md";
pub const DEFAULT_COMPAT_REPORT: &str = "docs/guide/package-compatibility.md";
pub const DEFAULT_INFO_REPORT: &str = "docs/workspace-info.md";
pub const DEFAULT_SCRIPTS_DIR: &str = "scripts";

pub fn default_roots() -> Vec<String> {
    DEFAULT_ROOTS.iter().map(|r| r.to_string()).collect()
}

/// Resolve a report path against the workspace root; absolute paths pass through.
pub fn resolve_in(workspace_root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}

/// Settings for target discovery.
#[derive(Debug, Clone)]
pub struct DiscoverSettings {
    pub roots: Vec<String>,
}

impl Default for DiscoverSettings {
    fn default() -> Self {
        Self {
            roots: default_roots(),
        }
    }
}

/// Settings for the compatibility check.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub roots: Vec<String>,

    /// Markdown report, relative to the workspace root unless absolute.
    pub report_path: Utf8PathBuf,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            report_path: Utf8PathBuf::from(DEFAULT_COMPAT_REPORT),
        }
    }
}

/// Settings for the build pipeline.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub roots: Vec<String>,
    pub report_path: Utf8PathBuf,

    /// Command run in every target directory.
    pub build: Invocation,

    /// Command run once at the root before building; `None` skips the clean step.
    pub clean: Option<Invocation>,

    pub mode: RunMode,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            report_path: Utf8PathBuf::from(DEFAULT_BUILD_REPORT),
            build: Invocation::npm_build(),
            clean: None,
            mode: RunMode::default(),
        }
    }
}

/// Settings for the workspace info pipeline.
#[derive(Debug, Clone)]
pub struct InfoSettings {
    pub roots: Vec<String>,
    pub report_path: Utf8PathBuf,

    /// Directory whose `.js`/`.mjs`/`.sh` files are listed as helper scripts.
    pub scripts_dir: Utf8PathBuf,
}

impl Default for InfoSettings {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            report_path: Utf8PathBuf::from(DEFAULT_INFO_REPORT),
            scripts_dir: Utf8PathBuf::from(DEFAULT_SCRIPTS_DIR),
        }
    }
}
