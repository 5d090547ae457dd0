//! Rendering helpers (markdown) for human-readable reports.
//!
//! Renderers are pure: the same inputs and [`RenderContext`] always produce the same text.

mod build;
mod compat;
mod info;

pub use build::render_build_md;
pub use compat::render_compat_md;
pub use info::render_info_md;

/// Values that vary per run and are stamped into every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub generated_at: String,
}

impl RenderContext {
    pub fn new(generated_at: impl Into<String>) -> Self {
        Self {
            generated_at: generated_at.into(),
        }
    }
}

/// Wrap `text` in a code fence longer than any backtick run inside it.
pub(crate) fn fenced(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    let body = text.trim_end_matches('\n');
    format!("{fence}\n{body}\n{fence}\n")
}
