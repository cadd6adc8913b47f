//! Common test utilities for yippie CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated working directory with a cleared environment
//! - Fixtures: Complete configuration sets

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
