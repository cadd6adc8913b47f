//! Deploy Module
//!
//! Sequences a deploy or destroy run for one namespace.
//!
//! ## Structure
//!
//! - `result` - Result types (`DeploySummary`, `DestroySummary`, `RunOutcome`)
//! - `use_case` - Core coordinator logic (`DeploymentCoordinator`)
//!
//! ## Usage
//!
//! ```ignore
//! use yippie::application::deploy::DeploymentCoordinator;
//!
//! let coordinator = DeploymentCoordinator::new(config, template, archiver, store, orchestrator, SystemClock);
//! let summary = coordinator.deploy()?;
//! ```

mod result;
mod use_case;

pub use result::{DeploySummary, DestroySummary, RunOutcome};
pub use use_case::DeploymentCoordinator;
