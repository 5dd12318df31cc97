//! # Model registry core for heddle
//!
//! Builds a canonical, deduplicated schema document for a set of structured
//! data types ("models") discovered by pluggable describers, and assigns
//! each one a stable, collision-free definition name.
//!
//! Registration is two-phase: [`ModelRegistry::register`] reserves a name
//! immediately and returns a reference token; the schema itself is produced
//! later, when [`ModelRegistry::finalize`] drains the pending queue through
//! describer dispatch. Describers may re-enter the registry to register the
//! nested types they discover; the drain loops until no model is pending.
//! A final pass merges structurally identical definitions and rewrites
//! every reference to the merged-away names.
//!
//! ## Modules
//!
//! - [`registry`] - The registry: registration queue, drain loop, dispatch
//! - [`model`] - `Model` identity: type descriptor + serialization groups
//! - [`descriptor`] - `TypeDescriptor`, what a model is *of*
//! - [`describer`] - The `ModelDescriber` contract
//! - [`dedup`] - Duplicate elimination over the finished document
//! - [`config`] - User-declared alternative-name entries
//! - [`error`] - Fatal registry errors

pub mod config;
pub mod dedup;
pub mod describer;
pub mod descriptor;
pub mod error;
pub mod model;
mod names;
pub mod registry;

pub use config::AlternativeName;
pub use dedup::DuplicateEliminator;
pub use describer::ModelDescriber;
pub use descriptor::TypeDescriptor;
pub use error::{RegistryError, Result};
pub use model::Model;
pub use registry::ModelRegistry;
