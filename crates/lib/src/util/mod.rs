//! Shared utilities.
//!
//! Filesystem helpers used by the staleness checks, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
