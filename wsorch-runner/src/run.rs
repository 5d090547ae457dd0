use crate::invocation::Invocation;
use std::process::Stdio;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use wsorch_types::build::{BuildResult, BuildResults};
use wsorch_types::target::BuildTarget;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// One target at a time, in discovery order.
    #[default]
    Sequential,
    /// Every target launched at once; no concurrency cap.
    Parallel,
}

impl RunMode {
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            RunMode::Parallel
        } else {
            RunMode::Sequential
        }
    }
}

/// Run `invocation` in the target's directory and record the outcome.
pub async fn run_target(target: &BuildTarget, invocation: &Invocation) -> BuildResult {
    let invocation = invocation.in_dir(&target.path);
    info!(
        target = %target.name,
        kind = %target.kind,
        command = %invocation.command_line(),
        "building"
    );

    let start = Instant::now();
    let output = invocation
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;
    let duration_ms = elapsed_ms(start);

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            warn!(target = %target.name, error = %e, "failed to spawn build");
            return BuildResult::spawn_failure(
                target,
                duration_ms,
                format!("failed to spawn `{}`: {e}", invocation.command_line()),
            );
        }
    };

    let result = BuildResult {
        target_name: target.name.clone(),
        path: target.path.clone(),
        kind: target.kind,
        success: output.status.success(),
        exit_code: output.status.code(),
        duration_ms,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if result.success {
        info!(target = %target.name, duration_ms, "built");
    } else {
        warn!(target = %target.name, exit_code = ?result.exit_code, duration_ms, "build failed");
        debug!(target = %target.name, stderr = %result.stderr, "build stderr");
    }
    result
}

/// Run every target and collect exactly one result per target.
///
/// A failing target never stops the others.
pub async fn run_all(
    targets: &[BuildTarget],
    invocation: &Invocation,
    mode: RunMode,
) -> BuildResults {
    let mut results = BuildResults::new();

    match mode {
        RunMode::Sequential => {
            info!(count = targets.len(), "building targets sequentially");
            for target in targets {
                record(&mut results, run_target(target, invocation).await);
            }
        }
        RunMode::Parallel => {
            info!(count = targets.len(), "building targets in parallel");
            let mut set = JoinSet::new();
            for target in targets {
                let target = target.clone();
                let invocation = invocation.clone();
                set.spawn(async move { run_target(&target, &invocation).await });
            }
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(result) => record(&mut results, result),
                    Err(e) => warn!(error = %e, "build task did not complete"),
                }
            }
        }
    }

    // A task that panicked left no result behind; fill the gap so no target goes missing.
    for target in targets {
        if results.get(&target.name).is_none() {
            record(
                &mut results,
                BuildResult::spawn_failure(target, 0, "build task did not complete".to_string()),
            );
        }
    }

    results
}

fn record(results: &mut BuildResults, result: BuildResult) {
    if let Err(e) = results.insert(result) {
        warn!(error = %e, "ignoring extra build result");
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
