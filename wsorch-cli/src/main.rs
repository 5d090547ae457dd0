use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use wsorch_cli::config::{self, CliOverrides, ConfigMerger, MergedConfig, ReportKind};
use wsorch_core::RunMode;
use wsorch_core::adapters::{
    FsManifestSource, FsWritePort, OverrideRuntimeProbe, ShellRuntimeProbe, StaticRuntimeProbe,
};
use wsorch_core::pipeline::{
    render_context, run_build, run_check, run_discover, run_info, write_report,
};
use wsorch_core::ports::WritePort;
use wsorch_core::settings::{
    BuildSettings, CheckSettings, DiscoverSettings, InfoSettings, resolve_in,
};
use wsorch_types::compat::Severity;

#[derive(Debug, Parser)]
#[command(
    name = "wsorch",
    version,
    about = "Discover, check, and build the members of a JavaScript monorepo."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List workspace members that declare a build script.
    Discover(DiscoverArgs),
    /// Check every manifest against the running Node.js/npm and write a report.
    CheckCompatibility(CheckArgs),
    /// Build every target and write a build report.
    Build(BuildArgs),
    /// Write an overview of the workspace.
    Info(InfoArgs),
}

#[derive(Debug, clap::Args)]
struct CommonArgs {
    /// Workspace root (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Member directories to scan, comma separated (default: packages,projects,apps).
    #[arg(long, value_delimiter = ',')]
    roots: Vec<String>,
}

#[derive(Debug, clap::Args)]
struct RuntimeArgs {
    /// Assume this Node.js version instead of running `node --version`.
    #[arg(long)]
    node_version: Option<String>,

    /// Assume this npm version instead of running `npm --version`.
    #[arg(long)]
    npm_version: Option<String>,
}

#[derive(Debug, Parser)]
struct DiscoverArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    runtime: RuntimeArgs,

    /// Markdown report path (default: docs/guide/package-compatibility.md).
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Also write the results as JSON to this path.
    #[arg(long)]
    json: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct BuildArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    runtime: RuntimeArgs,

    /// Build all targets concurrently.
    #[arg(short, long, default_value_t = false)]
    parallel: bool,

    /// Run the clean command at the root before building.
    #[arg(short, long, default_value_t = false)]
    clean: bool,

    /// Markdown report path (default: docs/build-report.md).
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Also write the results as JSON to this path.
    #[arg(long)]
    json: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct InfoArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    runtime: RuntimeArgs,

    /// Markdown report path (default: docs/workspace-info.md).
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Also write the overview as JSON to this path.
    #[arg(long)]
    json: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Discover(args) => cmd_discover(args),
        Command::CheckCompatibility(args) => cmd_check(args),
        Command::Build(args) => cmd_build(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn merged_config(
    common: &CommonArgs,
    kind: ReportKind,
    overrides: CliOverrides,
) -> anyhow::Result<MergedConfig> {
    let file_config =
        config::load_or_default(&common.root).context("load wsorch.toml config")?;
    let merged = ConfigMerger::new(file_config).merge(
        kind,
        CliOverrides {
            roots: common.roots.clone(),
            ..overrides
        },
    );
    debug!(
        "merged config: roots={:?}, report={}, build={}, parallel={}",
        merged.roots,
        merged.report_path,
        merged.build.command_line(),
        merged.parallel
    );
    Ok(merged)
}

fn overrides(runtime: &RuntimeArgs, report: Option<&Utf8PathBuf>) -> CliOverrides {
    CliOverrides {
        report: report.cloned(),
        node_version: runtime.node_version.clone(),
        npm_version: runtime.npm_version.clone(),
        ..Default::default()
    }
}

fn cmd_discover(args: DiscoverArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(&args.common, ReportKind::Build, CliOverrides::default())?;
    let source = FsManifestSource::new(args.common.root.clone());
    let settings = DiscoverSettings {
        roots: merged.roots,
    };
    let targets = run_discover(&settings, &source)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&targets).context("serialize targets")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Found {} build target(s)", targets.len());
            for t in &targets {
                println!(
                    "  {:<30} {:<8} {}",
                    t.name,
                    t.kind,
                    relative(&args.common.root, &t.path)
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let root = args.common.root.clone();
    let merged = merged_config(
        &args.common,
        ReportKind::Compatibility,
        overrides(&args.runtime, args.report.as_ref()),
    )?;

    let source = FsManifestSource::new(root.clone());
    let probe = OverrideRuntimeProbe {
        overrides: runtime_probe(&merged),
        fallback: &ShellRuntimeProbe,
    };
    let settings = CheckSettings {
        roots: merged.roots.clone(),
        report_path: merged.report_path.clone(),
    };

    let outcome = run_check(&settings, &source, &probe, &render_context())?;

    let writer = FsWritePort;
    let report_path = resolve_in(&root, &settings.report_path);
    write_report(&report_path, &outcome.markdown, &writer)?;
    if let Some(json) = &args.json {
        write_json(&resolve_in(&root, json), &outcome.json_report(), &writer)?;
    }

    println!(
        "Node.js {} / npm {}",
        outcome.environment.node_version.as_deref().unwrap_or("unknown"),
        outcome.environment.npm_version.as_deref().unwrap_or("unknown")
    );
    for r in &outcome.results {
        println!("  {:<10} {}", r.status.label(), r.target_name);
        for issue in r.issues.iter().filter(|i| i.severity > Severity::Info) {
            println!("             - {}", issue.message);
        }
    }
    let s = &outcome.summary;
    println!(
        "{} checked: {} compatible, {} warning(s), {} error(s)",
        s.total, s.compatible, s.warnings, s.errors
    );
    println!("Compatibility report written to {}", report_path);

    if outcome.has_errors() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<ExitCode> {
    let root = args.common.root.clone();
    let merged = merged_config(
        &args.common,
        ReportKind::Build,
        CliOverrides {
            parallel: args.parallel,
            ..overrides(&args.runtime, args.report.as_ref())
        },
    )?;

    let source = FsManifestSource::new(root.clone());
    let probe = OverrideRuntimeProbe {
        overrides: runtime_probe(&merged),
        fallback: &ShellRuntimeProbe,
    };
    let settings = BuildSettings {
        roots: merged.roots.clone(),
        report_path: merged.report_path.clone(),
        build: merged.build.clone(),
        clean: args.clean.then(|| merged.clean.clone()),
        mode: RunMode::from_parallel(merged.parallel),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let outcome = runtime.block_on(run_build(&settings, &source, &probe, &render_context()))?;

    let Some(markdown) = &outcome.markdown else {
        println!("No build targets found under {}", merged.roots.join(", "));
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(clean) = &outcome.clean
        && !clean.success
    {
        println!("Clean step failed ({}); continued with build", clean.command);
    }

    let writer = FsWritePort;
    let report_path = resolve_in(&root, &settings.report_path);
    write_report(&report_path, markdown, &writer)?;
    if let Some(json) = &args.json {
        write_json(&resolve_in(&root, json), &outcome.json_report(), &writer)?;
    }

    for r in outcome.results.iter() {
        let status = if r.success { "ok" } else { "FAILED" };
        println!("  {:<8} {:<30} {}ms", status, r.target_name, r.duration_ms);
    }
    let s = outcome.results.summary();
    println!(
        "{} built: {} successful, {} failed ({}ms)",
        s.total, s.successful, s.failed, s.total_duration_ms
    );
    println!("Build report written to {}", report_path);

    if outcome.any_failed() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<ExitCode> {
    let root = args.common.root.clone();
    let merged = merged_config(
        &args.common,
        ReportKind::Info,
        overrides(&args.runtime, args.report.as_ref()),
    )?;

    let source = FsManifestSource::new(root.clone());
    let probe = OverrideRuntimeProbe {
        overrides: runtime_probe(&merged),
        fallback: &ShellRuntimeProbe,
    };
    let settings = InfoSettings {
        roots: merged.roots.clone(),
        report_path: merged.report_path.clone(),
        ..Default::default()
    };

    let outcome = run_info(&settings, &source, &probe, &render_context())?;

    let writer = FsWritePort;
    let report_path = resolve_in(&root, &settings.report_path);
    write_report(&report_path, &outcome.markdown, &writer)?;
    if let Some(json) = &args.json {
        write_json(&resolve_in(&root, json), &outcome.info, &writer)?;
    }

    let info = &outcome.info;
    println!(
        "{}: {} package(s), {} project(s), {} app(s), {} script(s)",
        info.workspace
            .as_ref()
            .map(|w| w.name.as_str())
            .unwrap_or("Unnamed workspace"),
        info.packages.len(),
        info.projects.len(),
        info.apps.len(),
        info.scripts.len()
    );
    println!("Workspace report written to {}", report_path);
    Ok(ExitCode::SUCCESS)
}

fn runtime_probe(merged: &MergedConfig) -> StaticRuntimeProbe {
    StaticRuntimeProbe::new(merged.node_version.as_deref(), merged.npm_version.as_deref())
}

fn relative<'a>(root: &Utf8Path, path: &'a Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn write_json<T: serde::Serialize>(
    path: &Utf8Path,
    v: &T,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    writer.write_file(path, s.as_bytes())
}
