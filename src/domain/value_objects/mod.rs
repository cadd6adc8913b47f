//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod namespace;
pub mod naming;
mod phase;
mod update_mode;

pub use namespace::{DeploymentNamespace, NamespaceError, MAX_LABEL_LEN, MAX_NAMESPACE_LEN};
pub use naming::ArchiveKey;
pub use phase::Phase;
pub use update_mode::UpdateMode;
