//! # Schema document object model for heddle
//!
//! A document is a set of named schema definitions plus API paths whose
//! responses reference those definitions. This crate owns the value types
//! and the document container; the registry core (`heddle-registry`) drives
//! them.
//!
//! ## Modules
//!
//! - [`schema`] - The `Schema` value type (properties, items, `$ref`, ...)
//! - [`document`] - The `Document` container: definitions and paths
//! - [`refs`] - `SchemaRef`, the `#/definitions/<name>` reference token
//! - [`error`] - Document errors

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod document;
pub mod error;
pub mod refs;
pub mod schema;

pub use document::{Document, Operation, PathItem, Response};
pub use error::{DocumentError, Result};
pub use refs::{DEFINITIONS_PREFIX, SchemaRef};
pub use schema::Schema;
