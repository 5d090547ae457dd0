use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Which workspace root a target was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Package,
    Project,
    App,
}

impl TargetKind {
    /// Map a configured root directory name onto a kind.
    ///
    /// Unknown roots are treated as packages.
    pub fn from_root_dir(dir: &str) -> Self {
        match dir {
            "projects" => TargetKind::Project,
            "apps" => TargetKind::App,
            _ => TargetKind::Package,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Package => "package",
            TargetKind::Project => "project",
            TargetKind::App => "app",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A discovered package/project with a declared `build` script.
///
/// Names are unique within one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub name: String,

    /// Directory containing the manifest; also the build working directory.
    pub path: Utf8PathBuf,

    pub kind: TargetKind,

    pub manifest_path: Utf8PathBuf,

    /// The raw `scripts.build` value, kept for display only.
    pub build_script: String,
}
