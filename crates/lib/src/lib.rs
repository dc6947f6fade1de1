//! onabuild-lib: incremental module builds for the Ona engine tree.
//!
//! A module is a directory with a `build.json` describing its target type and
//! dependencies. Building a module:
//! - builds its dependencies first, each at most once per [`execute::BuildSession`]
//! - compares timestamps to find stale translation units ([`staleness`])
//! - compiles them in parallel ([`execute::compile`])
//! - links a static library, shared library or executable ([`execute::link`])

pub mod config;
pub mod consts;
pub mod execute;
pub mod layout;
pub mod settings;
pub mod staleness;
pub mod util;
