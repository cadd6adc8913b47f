//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `archive/` - Zip archive builder
//! - `aws/` - S3 artifact store, CloudFormation orchestrator, STS account check
//! - `events/` - Console and NDJSON event sinks

pub mod archive;
pub mod aws;
pub mod events;

// Re-export for convenience
pub use archive::ZipArchiveBuilder;
pub use aws::{AwsContext, CloudFormationOrchestrator, S3ArtifactStore};
pub use events::{ConsoleEventSink, JsonEventSink};
