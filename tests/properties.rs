//! Property tests for yippie.
//!
//! Properties use randomized input generation to protect invariants like
//! "derived names are pure" and "archives are deterministic".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/naming.rs"]
mod naming;

#[path = "properties/archive.rs"]
mod archive;
