use crate::load::{LoadedManifest, scan_manifests};
use camino::Utf8Path;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use wsorch_types::target::BuildTarget;

/// Discover every manifest under `roots` that declares a non-empty `build` script.
pub fn discover_targets(
    workspace_root: &Utf8Path,
    roots: &[String],
) -> anyhow::Result<Vec<BuildTarget>> {
    let manifests = scan_manifests(workspace_root, roots)?;
    Ok(targets_from_manifests(&manifests))
}

/// Filter scanned manifests down to build targets.
///
/// Unreadable manifests are logged and skipped. When two manifests resolve to the same
/// name, the first one (in path order) wins and the later one is skipped.
pub fn targets_from_manifests(manifests: &[LoadedManifest]) -> Vec<BuildTarget> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for loaded in manifests {
        let manifest = match &loaded.manifest {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %loaded.path, error = %e, "skipping unreadable package.json");
                continue;
            }
        };

        let Some(build_script) = manifest.build_script() else {
            debug!(path = %loaded.path, "no build script");
            continue;
        };

        let name = manifest
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| loaded.dir_name.clone());

        if !seen.insert(name.clone()) {
            warn!(name = %name, path = %loaded.path, "duplicate target name; skipping");
            continue;
        }

        out.push(BuildTarget {
            name,
            path: loaded.package_dir().to_path_buf(),
            kind: loaded.kind,
            manifest_path: loaded.path.clone(),
            build_script: build_script.to_string(),
        });
    }

    out
}
