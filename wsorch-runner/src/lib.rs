//! Build runner.
//!
//! Runs one typed [`Invocation`] per target with the target directory as working directory and
//! records a [`BuildResult`](wsorch_types::build::BuildResult) for each. The runner never fails:
//! non-zero exits and spawn errors are recorded as unsuccessful results, and the caller decides
//! what the aggregate means. There are no retries, timeouts, or cancellation.

mod clean;
mod invocation;
mod run;

pub use clean::{CleanOutcome, run_clean};
pub use invocation::Invocation;
pub use run::{RunMode, run_all, run_target};
