//! Workspace discovery.
//!
//! Scans the configured workspace roots (`packages/`, `projects/`, `apps/` by default) for
//! `package.json` manifests. The scan is tolerant: a manifest that cannot be read or parsed is
//! recorded with its error instead of aborting the whole scan, and callers decide whether to
//! skip it (target discovery) or surface it (compatibility and info reports).

mod load;
mod pin;
mod targets;

pub use load::{LoadedManifest, ManifestLoadError, load_manifest, scan_manifests};
pub use pin::{PIN_FILES, read_runtime_pin};
pub use targets::{discover_targets, targets_from_manifests};

/// Workspace roots scanned when no configuration overrides them.
pub const DEFAULT_ROOTS: &[&str] = &["packages", "projects", "apps"];
