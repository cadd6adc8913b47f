//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod archive_builder;
pub mod artifact_store;
pub mod clock;
pub mod deploy_events;
pub mod orchestrator;

pub use archive_builder::{ArchiveBuilder, ArchiveError};
pub use artifact_store::{ArtifactStore, UploadError, UploadReceipt};
pub use clock::{Clock, SystemClock};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink, Operation};
pub use orchestrator::{OrchestrationError, Orchestrator, StackChange, StackOutcome};
