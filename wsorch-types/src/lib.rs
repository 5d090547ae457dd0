//! Shared DTOs for the wsorch workspace.
//!
//! # Design constraints
//! - Every type here is produced fresh on each run; nothing is persisted except rendered reports.
//! - Types are serializable so the CLI can emit JSON alongside Markdown.
//! - Results are immutable once created; aggregation happens through the summary helpers.

pub mod build;
pub mod compat;
pub mod info;
pub mod manifest;
pub mod target;

/// Schema identifiers for JSON output.
pub mod schema {
    pub const WSORCH_BUILD_REPORT_V1: &str = "wsorch.build-report.v1";
    pub const WSORCH_COMPAT_REPORT_V1: &str = "wsorch.compat-report.v1";
    pub const WSORCH_WORKSPACE_INFO_V1: &str = "wsorch.workspace-info.v1";
}
