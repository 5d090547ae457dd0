use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use thiserror::Error;
use tracing::debug;
use wsorch_types::manifest::PackageManifest;
use wsorch_types::target::TargetKind;

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: Utf8PathBuf,

    /// Name of the directory holding the manifest.
    pub dir_name: String,

    /// The configured root this manifest was found under, e.g. `packages`.
    pub root_dir: String,

    pub kind: TargetKind,
    pub manifest: Result<PackageManifest, ManifestLoadError>,
}

impl LoadedManifest {
    /// Directory containing the manifest.
    pub fn package_dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// `<root_dir>/<dir_name>`, relative to the workspace root.
    pub fn relative_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.root_dir).join(&self.dir_name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

/// Read and parse a single `package.json`.
pub fn load_manifest(path: &Utf8Path) -> Result<PackageManifest, ManifestLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| ManifestLoadError::Io {
        message: e.to_string(),
    })?;
    serde_json::from_str::<PackageManifest>(&contents).map_err(|e| ManifestLoadError::Json {
        message: e.to_string(),
    })
}

/// Collect every `<root>/<dir>/*/package.json` under the workspace.
///
/// Missing root directories contribute nothing. Output is sorted by path.
pub fn scan_manifests(
    workspace_root: &Utf8Path,
    roots: &[String],
) -> anyhow::Result<Vec<LoadedManifest>> {
    let mut out = Vec::new();

    for root_dir in roots {
        let pattern = workspace_root.join(root_dir).join("*/package.json");
        let pattern_str = escape_pattern_prefix(workspace_root, root_dir);

        debug!(pattern = %pattern, "scanning for manifests");

        for entry in glob(&pattern_str).with_context(|| format!("glob {}", pattern))? {
            let path = entry
                .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
                .to_string_lossy()
                .to_string();
            let utf8_path = Utf8PathBuf::from(path);

            let dir_name = utf8_path
                .parent()
                .and_then(|p| p.file_name())
                .unwrap_or("unknown")
                .to_string();

            let manifest = load_manifest(&utf8_path);
            if let Err(e) = &manifest {
                debug!(path = %utf8_path, error = %e, "manifest failed to load");
            }

            out.push(LoadedManifest {
                path: utf8_path,
                dir_name,
                root_dir: root_dir.clone(),
                kind: TargetKind::from_root_dir(root_dir),
                manifest,
            });
        }
    }

    // Directory listing order differs across filesystems; sort so repeated scans agree.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Build the glob pattern with the literal workspace prefix escaped.
///
/// Workspace paths may contain glob metacharacters (`[`, `*`), which must match literally.
fn escape_pattern_prefix(workspace_root: &Utf8Path, root_dir: &str) -> String {
    let prefix = workspace_root.join(root_dir);
    let escaped = glob::Pattern::escape(prefix.as_str());
    format!("{}/*/package.json", escaped.trim_end_matches('/'))
}
