use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// A program plus arguments, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory; `None` inherits the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<Utf8PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// `npm run build`
    pub fn npm_build() -> Self {
        Self::new(npm_program(), ["run", "build"])
    }

    /// `npm run clean --workspaces --if-present`
    pub fn npm_clean() -> Self {
        Self::new(npm_program(), ["run", "clean", "--workspaces", "--if-present"])
    }

    /// The same command bound to another working directory.
    pub fn in_dir(&self, cwd: &Utf8Path) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            ..self.clone()
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// npm ships as a `.cmd` shim on Windows, which `CreateProcess` does not resolve by itself.
fn npm_program() -> &'static str {
    if cfg!(windows) { "npm.cmd" } else { "npm" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npm_build_command_line() {
        let inv = Invocation::npm_build();
        assert!(inv.command_line().ends_with("run build"));
        assert!(inv.cwd.is_none());
    }

    #[test]
    fn in_dir_keeps_program_and_args() {
        let inv = Invocation::new("pnpm", ["build"]).in_dir(Utf8Path::new("/ws/packages/ui"));
        assert_eq!(inv.program, "pnpm");
        assert_eq!(inv.args, vec!["build"]);
        assert_eq!(inv.cwd.as_deref(), Some(Utf8Path::new("/ws/packages/ui")));
    }

    #[test]
    fn deserializes_without_cwd() {
        let inv: Invocation =
            serde_json::from_str(r#"{ "program": "yarn", "args": ["build"] }"#).unwrap();
        assert_eq!(inv, Invocation::new("yarn", ["build"]));
    }
}
