//! Test harnesses for trailhead.
//!
//! Provides `TestRoutes` for manifest-level recognition and generation tests,
//! plus CLI regression tests against the `trailhead` binary.

#[cfg(test)]
pub mod cli;
pub mod harness;
#[cfg(test)]
mod manifests;

pub use harness::{fixtures, TestError, TestRoutes};
