//! Discover, check, build, and info pipelines, extracted from the CLI.
//!
//! Manifest access, runtime probing, and report writing go through the port
//! traits. Build commands run through `wsorch-runner`.

use crate::ports::{ManifestSource, RuntimeProbe, WritePort};
use crate::settings::{BuildSettings, CheckSettings, DiscoverSettings, InfoSettings, resolve_in};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};
use fs_err as fs;
use tracing::{debug, info, warn};
use wsorch_compat::{Checker, RuntimeVersions};
use wsorch_discover::{LoadedManifest, read_runtime_pin, targets_from_manifests};
use wsorch_render::{RenderContext, render_build_md, render_compat_md, render_info_md};
use wsorch_runner::{CleanOutcome, run_all, run_clean};
use wsorch_types::build::{BuildReport, BuildResults};
use wsorch_types::compat::{CompatReport, CompatStatus, CompatSummary, CompatibilityResult};
use wsorch_types::info::{DependencyOverview, EnvironmentInfo, PackageSummary, WorkspaceInfo};
use wsorch_types::schema::WSORCH_WORKSPACE_INFO_V1;
use wsorch_types::target::{BuildTarget, TargetKind};

const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "sh"];

/// Report stamp for a run started now.
pub fn render_context() -> RenderContext {
    RenderContext::new(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// List build targets.
pub fn run_discover(
    settings: &DiscoverSettings,
    source: &dyn ManifestSource,
) -> anyhow::Result<Vec<BuildTarget>> {
    let manifests = source.load_manifests(&settings.roots)?;
    let targets = targets_from_manifests(&manifests);
    debug!(count = targets.len(), "discovered build targets");
    Ok(targets)
}

/// Outcome of `run_check`.
pub struct CheckOutcome {
    pub environment: EnvironmentInfo,
    pub results: Vec<CompatibilityResult>,
    pub summary: CompatSummary,
    pub markdown: String,
    pub generated_at: String,
}

impl CheckOutcome {
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.status == CompatStatus::Error)
    }

    pub fn json_report(&self) -> CompatReport {
        CompatReport::new(
            self.generated_at.clone(),
            self.environment.clone(),
            self.results.clone(),
        )
    }
}

/// Check every manifest against the running toolchain and render the report.
///
/// The caller writes the report (see [`write_report`]).
pub fn run_check(
    settings: &CheckSettings,
    source: &dyn ManifestSource,
    probe: &dyn RuntimeProbe,
    ctx: &RenderContext,
) -> anyhow::Result<CheckOutcome> {
    let manifests = source.load_manifests(&settings.roots)?;
    let environment = probe_environment(source.workspace_root(), probe);
    let results = check_manifests(source, &manifests, &environment);
    let summary = CompatSummary::from_results(&results);

    info!(
        total = summary.total,
        warnings = summary.warnings,
        errors = summary.errors,
        "compatibility check finished"
    );

    let markdown = render_compat_md(ctx, &environment, &results);
    Ok(CheckOutcome {
        environment,
        results,
        summary,
        markdown,
        generated_at: ctx.generated_at.clone(),
    })
}

/// Outcome of `run_build`.
pub struct BuildOutcome {
    pub targets: Vec<BuildTarget>,
    pub results: BuildResults,
    pub compat: Vec<CompatibilityResult>,
    pub clean: Option<CleanOutcome>,

    /// `None` when there was nothing to build.
    pub markdown: Option<String>,
    pub generated_at: String,
}

impl BuildOutcome {
    pub fn any_failed(&self) -> bool {
        self.results.any_failed()
    }

    pub fn json_report(&self) -> BuildReport {
        BuildReport::new(
            self.generated_at.clone(),
            &self.results,
            Some(CompatSummary::from_results(&self.compat)),
        )
    }
}

/// Discover, check, optionally clean, then build every target.
///
/// Compatibility results are advisory here: they go into the report but never
/// stop the build.
pub async fn run_build(
    settings: &BuildSettings,
    source: &dyn ManifestSource,
    probe: &dyn RuntimeProbe,
    ctx: &RenderContext,
) -> anyhow::Result<BuildOutcome> {
    let root = source.workspace_root().to_path_buf();
    let manifests = source.load_manifests(&settings.roots)?;
    let targets = targets_from_manifests(&manifests);

    let environment = probe_environment(&root, probe);
    let compat = check_manifests(source, &manifests, &environment);
    let compat_summary = CompatSummary::from_results(&compat);
    if compat_summary.has_errors() {
        warn!(
            errors = compat_summary.errors,
            "compatibility errors found; building anyway"
        );
    }

    if targets.is_empty() {
        warn!(roots = ?settings.roots, "no build targets found");
        return Ok(BuildOutcome {
            targets,
            results: BuildResults::new(),
            compat,
            clean: None,
            markdown: None,
            generated_at: ctx.generated_at.clone(),
        });
    }

    let clean = match &settings.clean {
        Some(invocation) => Some(run_clean(&root, invocation).await),
        None => None,
    };

    let results = run_all(&targets, &settings.build, settings.mode).await;
    let summary = results.summary();
    info!(
        total = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        duration_ms = summary.total_duration_ms,
        "build finished"
    );

    let markdown = render_build_md(ctx, &results, Some(&compat_summary));
    Ok(BuildOutcome {
        targets,
        results,
        compat,
        clean,
        markdown: Some(markdown),
        generated_at: ctx.generated_at.clone(),
    })
}

/// Outcome of `run_info`.
pub struct InfoOutcome {
    pub info: WorkspaceInfo,
    pub markdown: String,
}

/// Gather the workspace overview and render the report.
pub fn run_info(
    settings: &InfoSettings,
    source: &dyn ManifestSource,
    probe: &dyn RuntimeProbe,
    ctx: &RenderContext,
) -> anyhow::Result<InfoOutcome> {
    let root = source.workspace_root();
    let manifests = source.load_manifests(&settings.roots)?;

    let root_name = root.file_name().unwrap_or("workspace");
    let workspace = source.load_root().map(|loaded| match loaded {
        Ok(m) => PackageSummary::from_manifest(
            &m,
            root_name,
            Utf8PathBuf::from("."),
            TargetKind::Package,
        ),
        Err(e) => {
            warn!(root = %root, error = %e, "root package.json unreadable");
            PackageSummary::unreadable(
                root_name,
                Utf8PathBuf::from("."),
                TargetKind::Package,
                e.to_string(),
            )
        }
    });

    let (mut packages, mut projects, mut apps) = (Vec::new(), Vec::new(), Vec::new());
    for loaded in &manifests {
        let summary = member_summary(loaded);
        match summary.kind {
            TargetKind::Package => packages.push(summary),
            TargetKind::Project => projects.push(summary),
            TargetKind::App => apps.push(summary),
        }
    }

    let dependencies = DependencyOverview::tally(
        workspace
            .iter()
            .chain(packages.iter())
            .chain(projects.iter())
            .chain(apps.iter()),
    );
    let scripts = list_scripts(&resolve_in(root, &settings.scripts_dir))?;

    let info = WorkspaceInfo {
        schema: WSORCH_WORKSPACE_INFO_V1.to_string(),
        environment: probe_environment(root, probe),
        workspace,
        packages,
        projects,
        apps,
        dependencies,
        scripts,
    };
    let markdown = render_info_md(ctx, &info);
    Ok(InfoOutcome { info, markdown })
}

/// Write a rendered report, creating parent directories and overwriting any previous file.
pub fn write_report(
    path: &Utf8Path,
    markdown: &str,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer
        .write_file(path, markdown.as_bytes())
        .with_context(|| format!("write report {}", path))?;
    info!(path = %path, "report written");
    Ok(())
}

fn check_manifests(
    source: &dyn ManifestSource,
    manifests: &[LoadedManifest],
    environment: &EnvironmentInfo,
) -> Vec<CompatibilityResult> {
    let runtime = RuntimeVersions::from_raw(
        environment.node_version.as_deref(),
        environment.npm_version.as_deref(),
    );
    let root = source.load_root();
    Checker::new(runtime)
        .with_runtime_pin(environment.runtime_pin.clone())
        .check_with_root(
            source.workspace_root(),
            root.as_ref().map(Result::as_ref),
            manifests,
        )
}

fn probe_environment(root: &Utf8Path, probe: &dyn RuntimeProbe) -> EnvironmentInfo {
    let cwd = std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_else(|| root.to_path_buf());
    EnvironmentInfo {
        node_version: probe.node_version(),
        npm_version: probe.npm_version(),
        runtime_pin: read_runtime_pin(root),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cwd,
    }
}

fn member_summary(loaded: &LoadedManifest) -> PackageSummary {
    match &loaded.manifest {
        Ok(m) => {
            PackageSummary::from_manifest(m, &loaded.dir_name, loaded.relative_dir(), loaded.kind)
        }
        Err(e) => PackageSummary::unreadable(
            &loaded.dir_name,
            loaded.relative_dir(),
            loaded.kind,
            e.to_string(),
        ),
    }
}

/// Helper script files directly inside `dir`, sorted by name. A missing directory lists nothing.
fn list_scripts(dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry.with_context(|| format!("read entry in {}", dir))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_script = Utf8Path::new(&name)
            .extension()
            .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext));
        if is_script && entry.path().is_file() {
            out.push(name);
        }
    }
    out.sort();
    Ok(out)
}
