//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Does NOT talk to AWS or the filesystem directly
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeploymentCoordinator` - Archive, upload, synthesize and orchestrate a
//!   deploy; or tear the stack down on destroy
//!
//! ## Services
//!
//! - `synth` - Bind template parameters into a stack descriptor

pub mod deploy;
pub mod synth;

pub use deploy::{DeploySummary, DeploymentCoordinator, DestroySummary, RunOutcome};
pub use synth::{synthesize, StackTemplate};
