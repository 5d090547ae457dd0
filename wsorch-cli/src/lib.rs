//! Library half of the `wsorch` binary: configuration loading and merging.

pub mod config;
