//! Configuration file loading for wsorch.
//!
//! Discovers and loads `wsorch.toml` from the workspace root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use wsorch_core::Invocation;
use wsorch_core::settings::{
    DEFAULT_BUILD_REPORT, DEFAULT_COMPAT_REPORT, DEFAULT_INFO_REPORT, default_roots,
};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "wsorch.toml";

/// Top-level configuration from wsorch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WsorchConfig {
    pub discovery: DiscoveryConfig,
    pub build: BuildConfig,
    pub clean: CleanConfig,
    pub reports: ReportsConfig,
    pub runtime: RuntimeConfig,
}

/// Where to look for workspace members.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directories (relative to the root) whose children hold `package.json` files.
    pub roots: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
        }
    }
}

/// The per-target build command. Defaults to `npm run build`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub program: Option<String>,
    pub args: Vec<String>,

    /// Build all targets concurrently.
    pub parallel: bool,
}

/// The root clean command. Defaults to `npm run clean --workspaces --if-present`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub program: Option<String>,
    pub args: Vec<String>,
}

/// Report locations, relative to the workspace root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub build: Option<Utf8PathBuf>,
    pub compatibility: Option<Utf8PathBuf>,
    pub info: Option<Utf8PathBuf>,
}

/// Runtime versions to assume instead of asking `node`/`npm`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub node_version: Option<String>,
    pub npm_version: Option<String>,
}

/// Discover the wsorch.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(workspace_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a wsorch.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<WsorchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<WsorchConfig> {
    let config: WsorchConfig = toml::from_str(contents).context("invalid TOML")?;
    if let Some(program) = &config.build.program
        && program.trim().is_empty()
    {
        anyhow::bail!("[build] program must not be empty");
    }
    if let Some(program) = &config.clean.program
        && program.trim().is_empty()
    {
        anyhow::bail!("[clean] program must not be empty");
    }
    Ok(config)
}

/// Load config from the workspace root, or return default if not found.
pub fn load_or_default(workspace_root: &Utf8Path) -> anyhow::Result<WsorchConfig> {
    match discover_config(workspace_root) {
        Some(path) => load_config(&path),
        None => Ok(WsorchConfig::default()),
    }
}

/// Command-line values that take part in the merge. `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub roots: Vec<String>,
    pub report: Option<Utf8PathBuf>,
    pub node_version: Option<String>,
    pub npm_version: Option<String>,
    pub parallel: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub roots: Vec<String>,

    /// Report path for the command being run.
    pub report_path: Utf8PathBuf,

    pub build: Invocation,
    pub clean: Invocation,
    pub parallel: bool,
    pub node_version: Option<String>,
    pub npm_version: Option<String>,
}

/// Which command's report path to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Build,
    Compatibility,
    Info,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: WsorchConfig,
}

impl ConfigMerger {
    pub fn new(config: WsorchConfig) -> Self {
        Self { config }
    }

    /// Merge with CLI arguments for one command.
    ///
    /// CLI roots replace the configured list; `--parallel` can only switch parallelism on.
    pub fn merge(self, kind: ReportKind, cli: CliOverrides) -> MergedConfig {
        let config = self.config;

        let roots = if cli.roots.is_empty() {
            config.discovery.roots
        } else {
            cli.roots
        };

        let (configured, default) = match kind {
            ReportKind::Build => (config.reports.build, DEFAULT_BUILD_REPORT),
            ReportKind::Compatibility => (config.reports.compatibility, DEFAULT_COMPAT_REPORT),
            ReportKind::Info => (config.reports.info, DEFAULT_INFO_REPORT),
        };
        let report_path = cli
            .report
            .or(configured)
            .unwrap_or_else(|| Utf8PathBuf::from(default));

        let build = match config.build.program {
            Some(program) => Invocation::new(program, config.build.args),
            None => Invocation::npm_build(),
        };
        let clean = match config.clean.program {
            Some(program) => Invocation::new(program, config.clean.args),
            None => Invocation::npm_clean(),
        };

        MergedConfig {
            roots,
            report_path,
            build,
            clean,
            parallel: cli.parallel || config.build.parallel,
            node_version: cli.node_version.or(config.runtime.node_version),
            npm_version: cli.npm_version.or(config.runtime.npm_version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[discovery]
roots = ["packages", "tools"]

[build]
program = "pnpm"
args = ["run", "build"]
parallel = true

[clean]
program = "pnpm"
args = ["-r", "clean"]

[reports]
build = "out/build.md"
compatibility = "out/compat.md"

[runtime]
node_version = "20.11.1"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.discovery.roots, vec!["packages", "tools"]);
        assert_eq!(config.build.program.as_deref(), Some("pnpm"));
        assert_eq!(config.build.args, vec!["run", "build"]);
        assert!(config.build.parallel);
        assert_eq!(config.clean.args, vec!["-r", "clean"]);
        assert_eq!(config.reports.build.as_deref(), Some(Utf8Path::new("out/build.md")));
        assert!(config.reports.info.is_none());
        assert_eq!(config.runtime.node_version.as_deref(), Some("20.11.1"));
        assert!(config.runtime.npm_version.is_none());
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.discovery.roots, vec!["packages", "projects", "apps"]);
        assert!(config.build.program.is_none());
        assert!(!config.build.parallel);
    }

    #[test]
    fn test_parse_rejects_unknown_types() {
        let err = parse_config("[build]\nparallel = \"yes\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_parse_rejects_blank_program() {
        let err = parse_config("[build]\nprogram = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("[build] program"));
    }

    #[test]
    fn test_merge_defaults() {
        let merged = ConfigMerger::new(WsorchConfig::default())
            .merge(ReportKind::Build, CliOverrides::default());
        assert_eq!(merged.roots, vec!["packages", "projects", "apps"]);
        assert_eq!(merged.report_path, DEFAULT_BUILD_REPORT);
        assert_eq!(merged.build, Invocation::npm_build());
        assert_eq!(merged.clean, Invocation::npm_clean());
        assert!(!merged.parallel);
        assert!(merged.node_version.is_none());
    }

    #[test]
    fn test_merge_cli_wins() {
        let config = parse_config(
            r#"
[discovery]
roots = ["packages"]

[reports]
compatibility = "from-config.md"

[runtime]
node_version = "16.0.0"
npm_version = "8.0.0"
"#,
        )
        .unwrap();

        let merged = ConfigMerger::new(config).merge(
            ReportKind::Compatibility,
            CliOverrides {
                roots: vec!["apps".to_string()],
                report: Some(Utf8PathBuf::from("from-cli.md")),
                node_version: Some("20.0.0".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(merged.roots, vec!["apps"]);
        assert_eq!(merged.report_path, "from-cli.md");
        assert_eq!(merged.node_version.as_deref(), Some("20.0.0"));
        assert_eq!(merged.npm_version.as_deref(), Some("8.0.0"));
    }

    #[test]
    fn test_merge_config_report_per_kind() {
        let config = parse_config("[reports]\ninfo = \"docs/info.md\"\n").unwrap();
        let merged =
            ConfigMerger::new(config.clone()).merge(ReportKind::Info, CliOverrides::default());
        assert_eq!(merged.report_path, "docs/info.md");

        let merged = ConfigMerger::new(config).merge(ReportKind::Build, CliOverrides::default());
        assert_eq!(merged.report_path, DEFAULT_BUILD_REPORT);
    }

    #[test]
    fn test_merge_parallel_from_either_source() {
        let config = parse_config("[build]\nparallel = true\n").unwrap();
        let merged = ConfigMerger::new(config).merge(ReportKind::Build, CliOverrides::default());
        assert!(merged.parallel);

        let merged = ConfigMerger::new(WsorchConfig::default()).merge(
            ReportKind::Build,
            CliOverrides {
                parallel: true,
                ..Default::default()
            },
        );
        assert!(merged.parallel);
    }

    #[test]
    fn test_merge_custom_commands() {
        let config = parse_config(
            "[build]\nprogram = \"sh\"\nargs = [\"build.sh\"]\n\n[clean]\nprogram = \"make\"\n",
        )
        .unwrap();
        let merged = ConfigMerger::new(config).merge(ReportKind::Build, CliOverrides::default());
        assert_eq!(merged.build, Invocation::new("sh", ["build.sh"]));
        assert_eq!(merged.clean.command_line(), "make");
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert_eq!(cfg.discovery.roots, default_roots());
        assert!(cfg.reports.build.is_none());
    }

    #[test]
    fn test_load_config_reports_path_on_error() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(root.join(CONFIG_FILE_NAME), "[build\n").expect("write config");
        let err = load_or_default(&root).expect_err("bad toml");
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }
}
