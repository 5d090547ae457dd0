use camino::Utf8Path;
use fs_err as fs;
use tracing::debug;

/// Runtime pin files, in lookup order.
pub const PIN_FILES: &[&str] = &[".nvmrc", ".node-version"];

/// Read the expected runtime version from the workspace root, if pinned.
///
/// The first existing pin file wins. A leading `v` is stripped; blank files count as unpinned.
pub fn read_runtime_pin(workspace_root: &Utf8Path) -> Option<String> {
    for name in PIN_FILES {
        let path = workspace_root.join(name);
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        let pin = contents
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.strip_prefix('v').unwrap_or(l).to_string());
        debug!(path = %path, pin = ?pin, "read runtime pin");
        return pin;
    }
    None
}
