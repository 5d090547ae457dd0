use crate::range::parse_runtime_version;
use crate::rules::{check_dependencies, check_engines, check_runtime_pin};
use camino::Utf8Path;
use semver::Version;
use tracing::debug;
use wsorch_discover::{LoadedManifest, ManifestLoadError, load_manifest};
use wsorch_types::compat::{CompatStatus, CompatibilityResult, Issue};
use wsorch_types::manifest::PackageManifest;

/// Name given to the workspace root manifest in results.
pub const ROOT_TARGET_NAME: &str = "root";

/// Versions of the tools the workspace runs under. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeVersions {
    pub node: Option<Version>,
    pub npm: Option<Version>,
}

impl RuntimeVersions {
    /// Parse raw version strings as reported by `node --version` / `npm --version`.
    pub fn from_raw(node: Option<&str>, npm: Option<&str>) -> Self {
        Self {
            node: node.and_then(parse_runtime_version),
            npm: npm.and_then(parse_runtime_version),
        }
    }
}

/// Produces one [`CompatibilityResult`] per manifest.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    runtime: RuntimeVersions,
    runtime_pin: Option<String>,
}

impl Checker {
    pub fn new(runtime: RuntimeVersions) -> Self {
        Self {
            runtime,
            runtime_pin: None,
        }
    }

    /// Also compare the running node against a pinned version (`.nvmrc`).
    pub fn with_runtime_pin(mut self, pin: Option<String>) -> Self {
        self.runtime_pin = pin;
        self
    }

    pub fn runtime(&self) -> &RuntimeVersions {
        &self.runtime
    }

    /// Check a single manifest, or report why it could not be read.
    pub fn check_manifest(
        &self,
        name: &str,
        path: &Utf8Path,
        manifest: Result<&PackageManifest, &ManifestLoadError>,
    ) -> CompatibilityResult {
        match manifest {
            Ok(m) => {
                let mut issues = check_engines(m, &self.runtime);
                issues.extend(check_dependencies(m, &self.runtime));
                CompatibilityResult::from_issues(
                    name,
                    path.to_path_buf(),
                    issues,
                    Some(m.summary()),
                )
            }
            Err(e) => CompatibilityResult::from_issues(
                name,
                path.to_path_buf(),
                vec![Issue::error(format!("failed to read package.json: {e}"))],
                None,
            ),
        }
    }

    /// Check the workspace root manifest followed by every scanned member manifest.
    ///
    /// Reads `<workspace_root>/package.json` itself; see [`Checker::check_with_root`].
    pub fn check_workspace(
        &self,
        workspace_root: &Utf8Path,
        manifests: &[LoadedManifest],
    ) -> Vec<CompatibilityResult> {
        let root_manifest = workspace_root.join("package.json");
        let root = root_manifest
            .is_file()
            .then(|| load_manifest(&root_manifest));
        self.check_with_root(workspace_root, root.as_ref().map(Result::as_ref), manifests)
    }

    /// Like [`Checker::check_workspace`], with the root manifest already loaded.
    ///
    /// The root result also carries the runtime pin comparison. When the root has no
    /// `package.json`, a root result is only produced if the pin check has something to say.
    pub fn check_with_root(
        &self,
        workspace_root: &Utf8Path,
        root: Option<Result<&PackageManifest, &ManifestLoadError>>,
        manifests: &[LoadedManifest],
    ) -> Vec<CompatibilityResult> {
        let mut out = Vec::with_capacity(manifests.len() + 1);

        let pin_issues = self
            .runtime_pin
            .as_deref()
            .map(|pin| check_runtime_pin(pin, &self.runtime))
            .unwrap_or_default();

        match root {
            Some(loaded) => {
                let mut result = self.check_manifest(ROOT_TARGET_NAME, workspace_root, loaded);
                append_issues(&mut result, pin_issues);
                out.push(result);
            }
            None if !pin_issues.is_empty() => {
                debug!(root = %workspace_root, "no root package.json; reporting runtime pin only");
                out.push(CompatibilityResult::from_issues(
                    ROOT_TARGET_NAME,
                    workspace_root.to_path_buf(),
                    pin_issues,
                    None,
                ));
            }
            None => {}
        }

        for loaded in manifests {
            let name = display_name(loaded);
            out.push(self.check_manifest(&name, loaded.package_dir(), loaded.manifest.as_ref()));
        }

        out
    }
}

fn append_issues(result: &mut CompatibilityResult, issues: Vec<Issue>) {
    result.issues.extend(issues);
    result.status = CompatStatus::from_issues(&result.issues);
}

/// Packages are listed by directory name; other roots keep their prefix (`projects/site`).
fn display_name(loaded: &LoadedManifest) -> String {
    if loaded.root_dir == "packages" {
        loaded.dir_name.clone()
    } else {
        loaded.relative_dir().to_string()
    }
}
