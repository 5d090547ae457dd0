//! Embeddable core library for wsorch.
//!
//! Provides a clap-free, I/O-abstracted entry point for each wsorch command.
//!
//! # Port traits
//!
//! I/O is abstracted behind port traits in [`ports`]:
//! - [`ManifestSource`](ports::ManifestSource): scan workspace manifests
//! - [`RuntimeProbe`](ports::RuntimeProbe): query node/npm versions
//! - [`WritePort`](ports::WritePort): write report files
//!
//! The [`adapters`] module provides default implementations. Build commands
//! always run as real processes through `wsorch-runner`.
//!
//! # Entry points
//!
//! - [`run_discover`](pipeline::run_discover): list build targets
//! - [`run_check`](pipeline::run_check): compatibility check + report
//! - [`run_build`](pipeline::run_build): build every target + report
//! - [`run_info`](pipeline::run_info): workspace overview + report

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-exported so embedders don't need the lower crates directly.
pub use wsorch_discover::{DEFAULT_ROOTS, LoadedManifest, ManifestLoadError};
pub use wsorch_runner::{Invocation, RunMode};
