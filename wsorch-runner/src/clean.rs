use crate::invocation::Invocation;
use camino::Utf8Path;
use tracing::{info, warn};

/// Result of the optional pre-build clean step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome {
    pub command: String,
    pub success: bool,

    /// Why the clean step failed, when it did.
    pub message: Option<String>,
}

/// Run the clean command at the workspace root with inherited stdio.
///
/// Failures are reported, never propagated: the build continues regardless.
pub async fn run_clean(workspace_root: &Utf8Path, invocation: &Invocation) -> CleanOutcome {
    let invocation = invocation.in_dir(workspace_root);
    let command = invocation.command_line();
    info!(command = %command, "cleaning build artifacts");

    let message = match invocation.to_command().status().await {
        Ok(status) if status.success() => None,
        Ok(status) => Some(format!("clean exited with {status}")),
        Err(e) => Some(format!("failed to spawn `{command}`: {e}")),
    };

    if let Some(m) = &message {
        warn!(message = %m, "clean command failed, continuing");
    }

    CleanOutcome {
        command,
        success: message.is_none(),
        message,
    }
}
