//! Domain Layer
//!
//! Naming rules, run phases and the port traits, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Archive artifact, resolved target, stack descriptor
//! - `value_objects/` - Namespace, derived names, phases, update mode
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Derived names depend only on their inputs
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod value_objects;
