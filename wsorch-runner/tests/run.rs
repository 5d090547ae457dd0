//! Runner tests. These spawn `sh`, so they only run on unix hosts.
#![cfg(unix)]

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use wsorch_runner::{Invocation, RunMode, run_all, run_clean, run_target};
use wsorch_types::target::{BuildTarget, TargetKind};

fn workspace() -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    (temp, root)
}

/// A target whose `build.sh` runs `script`.
fn target(root: &Utf8PathBuf, name: &str, script: &str) -> BuildTarget {
    let dir = root.join("packages").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("build.sh"), script).unwrap();
    BuildTarget {
        name: name.to_string(),
        path: dir.clone(),
        kind: TargetKind::Package,
        manifest_path: dir.join("package.json"),
        build_script: "sh build.sh".to_string(),
    }
}

fn sh_build() -> Invocation {
    Invocation::new("sh", ["build.sh"])
}

#[tokio::test]
async fn successful_build_captures_stdout() {
    let (_temp, root) = workspace();
    let t = target(&root, "a", "echo built a\n");
    let r = run_target(&t, &sh_build()).await;
    assert!(r.success);
    assert_eq!(r.exit_code, Some(0));
    assert_eq!(r.stdout.trim(), "built a");
    assert!(r.stderr.is_empty());
}

#[tokio::test]
async fn failing_build_is_recorded_not_raised() {
    let (_temp, root) = workspace();
    let t = target(&root, "b", "echo 'type error' >&2\nexit 3\n");
    let r = run_target(&t, &sh_build()).await;
    assert!(!r.success);
    assert_eq!(r.exit_code, Some(3));
    assert_eq!(r.stderr.trim(), "type error");
}

#[tokio::test]
async fn spawn_failure_becomes_failed_result() {
    let (_temp, root) = workspace();
    let t = target(&root, "c", "");
    let inv = Invocation::new("wsorch-definitely-not-a-program", ["build"]);
    let r = run_target(&t, &inv).await;
    assert!(!r.success);
    assert_eq!(r.exit_code, None);
    assert!(r.stderr.contains("failed to spawn"));
}

#[tokio::test]
async fn sequential_run_continues_after_failure() {
    let (_temp, root) = workspace();
    let targets = vec![
        target(&root, "a", "exit 0\n"),
        target(&root, "b", "echo broken >&2\nexit 1\n"),
        target(&root, "c", "exit 0\n"),
    ];
    let results = run_all(&targets, &sh_build(), RunMode::Sequential).await;
    assert_eq!(results.len(), 3);
    assert!(results.get("a").unwrap().success);
    assert!(!results.get("b").unwrap().success);
    assert!(results.get("c").unwrap().success);
    assert!(results.any_failed());
}

#[tokio::test]
async fn parallel_run_records_each_target_in_its_own_directory() {
    let (_temp, root) = workspace();
    let targets: Vec<_> = ["x", "y", "z"]
        .iter()
        .map(|n| target(&root, n, "pwd\n"))
        .collect();
    let results = run_all(&targets, &sh_build(), RunMode::Parallel).await;
    assert_eq!(results.len(), 3);
    for t in &targets {
        let r = results.get(&t.name).unwrap();
        assert!(r.success);
        assert_eq!(r.path, t.path);
        let cwd = r.stdout.trim();
        assert!(cwd.ends_with(&format!("/packages/{}", t.name)), "{cwd}");
    }
}

#[tokio::test]
async fn parallel_and_sequential_agree_on_outcomes() {
    let (_temp, root) = workspace();
    let targets = vec![
        target(&root, "ok", "exit 0\n"),
        target(&root, "bad", "exit 2\n"),
    ];
    let seq = run_all(&targets, &sh_build(), RunMode::Sequential).await;
    let par = run_all(&targets, &sh_build(), RunMode::Parallel).await;
    let outcome = |rs: &wsorch_types::build::BuildResults| {
        rs.iter()
            .map(|r| (r.target_name.clone(), r.success, r.exit_code))
            .collect::<Vec<_>>()
    };
    assert_eq!(outcome(&seq), outcome(&par));
}

#[tokio::test]
async fn empty_target_list_yields_empty_results() {
    let results = run_all(&[], &sh_build(), RunMode::Parallel).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn clean_failure_is_reported_not_raised() {
    let (_temp, root) = workspace();
    let ok = run_clean(&root, &Invocation::new("sh", ["-c", "exit 0"])).await;
    assert!(ok.success);
    assert!(ok.message.is_none());

    let failed = run_clean(&root, &Invocation::new("sh", ["-c", "exit 4"])).await;
    assert!(!failed.success);
    assert!(failed.message.is_some());
}

#[test]
fn run_mode_from_flag() {
    assert_eq!(RunMode::from_parallel(true), RunMode::Parallel);
    assert_eq!(RunMode::from_parallel(false), RunMode::Sequential);
}
