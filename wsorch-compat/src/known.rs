/// A dependency version that carries a runtime requirement worth surfacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownIssue {
    pub dependency: &'static str,

    /// npm range the declared dependency version must reach for the note to apply.
    pub since: &'static str,

    /// Node range required by dependency versions within `since`.
    pub requires_node: Option<&'static str>,

    pub note: &'static str,
}

pub const KNOWN_ISSUES: &[KnownIssue] = &[
    KnownIssue {
        dependency: "react",
        since: ">=18",
        requires_node: Some(">=16"),
        note: "Requires Node.js >= 16",
    },
    KnownIssue {
        dependency: "vite",
        since: ">=5",
        requires_node: Some(">=18"),
        note: "Requires Node.js >= 18",
    },
    KnownIssue {
        dependency: "three",
        since: ">=0.150",
        requires_node: None,
        note: "Modern Three.js version - good compatibility",
    },
];

pub(crate) fn lookup(dependency: &str) -> Option<&'static KnownIssue> {
    KNOWN_ISSUES.iter().find(|k| k.dependency == dependency)
}
