//! Compatibility checking: compare declared `engines` ranges and a small table of known
//! dependency requirements against the running runtime.
//!
//! Every result is advisory. Nothing here blocks a build; callers decide what an `error`
//! status means for their exit code.

mod checker;
mod known;
mod range;
mod rules;

pub use checker::{Checker, ROOT_TARGET_NAME, RuntimeVersions};
pub use known::{KNOWN_ISSUES, KnownIssue};
pub use range::{NpmRange, parse_runtime_version};
pub use rules::{check_dependencies, check_engines, check_runtime_pin};
