//! Shared utilities for the equity research workspace
//!
//! Logging setup and environment lookups used by every other crate.

pub mod env;
pub mod logging;

pub use env::{env_var, parse_env_value};
pub use logging::{init_tracing, init_tracing_with};
