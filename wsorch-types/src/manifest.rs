use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tolerant view of `package.json`.
///
/// Unknown fields are ignored and every field is optional, so a manifest "as found" in a
/// workspace still loads when it misses fields the tooling does not need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `"module"` or `"commonjs"`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub engines: BTreeMap<String, String>,

    /// Either an array of globs or an object with a `packages` array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<serde_json::Value>,
}

impl PackageManifest {
    /// The `build` script, if declared and non-blank.
    pub fn build_script(&self) -> Option<&str> {
        self.scripts
            .get("build")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn engine(&self, name: &str) -> Option<&str> {
        self.engines.get(name).map(String::as_str)
    }

    /// Dependencies, devDependencies, and peerDependencies merged in that order.
    ///
    /// Later tables win when the same name appears twice.
    pub fn all_dependencies(&self) -> BTreeMap<&str, &str> {
        let mut out = BTreeMap::new();
        for table in [
            &self.dependencies,
            &self.dev_dependencies,
            &self.peer_dependencies,
        ] {
            for (name, version) in table {
                out.insert(name.as_str(), version.as_str());
            }
        }
        out
    }

    pub fn summary(&self) -> ManifestSummary {
        ManifestSummary {
            name: self.name.clone(),
            version: self.version.clone(),
            module_type: self.module_type.clone(),
            engines: self.engines.clone(),
        }
    }
}

/// The subset of a manifest echoed into compatibility reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub engines: BTreeMap<String, String>,
}
