//! Domain Entities
//!
//! - `ArchiveArtifact` - A built site archive awaiting upload
//! - `ResolvedTarget` - Derived names for one namespace
//! - `StackDescriptor` - Template and parameters ready for the orchestrator

mod archive;
mod target;

pub use archive::ArchiveArtifact;
pub use target::{ResolvedTarget, StackDescriptor, StackParameter};
