//! Port traits abstracting I/O away from the pipelines.

use camino::Utf8Path;
use wsorch_discover::{LoadedManifest, ManifestLoadError};
use wsorch_types::manifest::PackageManifest;

/// Source of workspace manifests.
pub trait ManifestSource {
    fn workspace_root(&self) -> &Utf8Path;

    /// Member manifests under the given root directories, sorted by path.
    fn load_manifests(&self, roots: &[String]) -> anyhow::Result<Vec<LoadedManifest>>;

    /// The workspace root `package.json`; `None` when there is none.
    fn load_root(&self) -> Option<Result<PackageManifest, ManifestLoadError>>;
}

/// Versions of the JavaScript runtime and package manager on this host.
pub trait RuntimeProbe {
    fn node_version(&self) -> Option<String>;
    fn npm_version(&self) -> Option<String>;
}

/// File-system write operations.
pub trait WritePort {
    /// Write `contents` to `path`, creating missing parent directories.
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}
