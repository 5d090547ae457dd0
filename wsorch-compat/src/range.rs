use semver::{Comparator, Op, Version, VersionReq};

/// An npm-style version range: `||`-separated alternatives of space-separated comparators.
///
/// Each alternative is translated into a Cargo-syntax [`VersionReq`]. The translation keeps
/// npm's meaning for bare versions (exact match, or any version within a partial one), hyphen
/// ranges, and `x`/`*` wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl NpmRange {
    /// Parse a range, returning `None` for anything that does not constrain the version.
    ///
    /// Empty strings, bare wildcards, dist-tags (`latest`), `lts/*` aliases, and malformed
    /// ranges all count as "no constraint".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut alternatives = Vec::new();
        for alt in trimmed.split("||") {
            let req = translate_set(alt)?;
            alternatives.push(req);
        }

        Some(Self {
            raw: trimmed.to_string(),
            alternatives,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    /// The lowest version any alternative could accept.
    ///
    /// `None` when some alternative has no lower bound.
    pub fn minimum(&self) -> Option<Version> {
        let mut lowest: Option<Version> = None;
        for req in &self.alternatives {
            let bound = req.comparators.iter().filter_map(lower_bound).max()?;
            lowest = match lowest {
                Some(cur) if cur <= bound => Some(cur),
                _ => Some(bound),
            };
        }
        lowest
    }
}

impl std::fmt::Display for NpmRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse a runtime version as printed by `node --version` or written in `.nvmrc`.
///
/// Accepts a leading `v` and partial versions (`18`, `18.19`), which are zero-padded.
pub fn parse_runtime_version(raw: &str) -> Option<Version> {
    let s = raw.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    let split_at = s.find(['-', '+']).unwrap_or(s.len());
    let (core, rest) = s.split_at(split_at);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
        return None;
    }
    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    Version::parse(&format!("{padded}{rest}")).ok()
}

fn translate_set(set: &str) -> Option<VersionReq> {
    let tokens = join_operators(set.split_whitespace().collect());
    if tokens.is_empty() {
        return None;
    }

    let mut comparators = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        // Hyphen range: `a - b`
        if i + 2 < tokens.len() && tokens[i + 1] == "-" {
            comparators.push(format!(">={}", strip_wildcards(clean_version(&tokens[i]))?));
            comparators.push(format!("<={}", strip_wildcards(clean_version(&tokens[i + 2]))?));
            i += 3;
            continue;
        }
        comparators.push(translate_comparator(&tokens[i])?);
        i += 1;
    }

    // A lone wildcard places no constraint on the version.
    if comparators.iter().all(|c| c == "*") {
        return None;
    }
    comparators.retain(|c| c != "*");

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Merge operator-only tokens with the version that follows (`>= 18` → `>=18`).
fn join_operators(tokens: Vec<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Option<&str> = None;
    for tok in tokens {
        if is_operator(tok) {
            pending = Some(tok);
            continue;
        }
        match pending.take() {
            Some(op) => out.push(format!("{op}{tok}")),
            None => out.push(tok.to_string()),
        }
    }
    if let Some(op) = pending {
        out.push(op.to_string());
    }
    out
}

fn is_operator(tok: &str) -> bool {
    matches!(tok, ">=" | "<=" | ">" | "<" | "=" | "^" | "~" | "~>")
}

fn translate_comparator(tok: &str) -> Option<String> {
    let (op, version) = split_operator(tok);
    let version = clean_version(version);
    if is_wildcard(version) {
        return Some("*".to_string());
    }
    let stripped = strip_wildcards(version)?;
    let op = match op {
        "" | "=" => "=",
        "~>" => "~",
        other => other,
    };
    Some(format!("{op}{stripped}"))
}

fn split_operator(tok: &str) -> (&str, &str) {
    for op in [">=", "<=", "~>", ">", "<", "=", "^", "~"] {
        if let Some(rest) = tok.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", tok)
}

fn clean_version(v: &str) -> &str {
    let v = v.trim();
    v.strip_prefix('v').unwrap_or(v)
}

fn is_wildcard(v: &str) -> bool {
    matches!(v, "" | "*" | "x" | "X")
}

/// Drop trailing wildcard components (`18.x` → `18`), leaving a partial version.
///
/// Returns `None` if a wildcard is followed by a concrete component (`1.x.3`).
fn strip_wildcards(v: &str) -> Option<String> {
    let mut kept = Vec::new();
    let mut wild = false;
    for part in v.split('.') {
        if is_wildcard(part) {
            wild = true;
        } else if wild {
            return None;
        } else {
            kept.push(part);
        }
    }
    if kept.is_empty() {
        return None;
    }
    Some(kept.join("."))
}

fn lower_bound(c: &Comparator) -> Option<Version> {
    let minor = c.minor.unwrap_or(0);
    let patch = c.patch.unwrap_or(0);
    match c.op {
        Op::Exact | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard => {
            let mut v = Version::new(c.major, minor, patch);
            v.pre = c.pre.clone();
            Some(v)
        }
        // A bound past u64::MAX has no representable minimum.
        Op::Greater => match (c.minor, c.patch) {
            (None, _) => Some(Version::new(c.major.checked_add(1)?, 0, 0)),
            (Some(m), None) => Some(Version::new(c.major, m.checked_add(1)?, 0)),
            (Some(m), Some(p)) => Some(Version::new(c.major, m, p.checked_add(1)?)),
        },
        _ => None,
    }
}
