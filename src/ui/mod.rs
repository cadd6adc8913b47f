//! Terminal presentation: design tokens, capability detection, error and
//! summary rendering.

pub mod error;
pub mod json;
pub mod terminal;
pub mod theme;
pub mod views;
