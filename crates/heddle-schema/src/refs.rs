use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::fmt;

/// Prefix of every definition reference produced by this crate.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Reference token pointing at a named definition in a [`Document`].
///
/// Stored as a single small string of the form `#/definitions/<name>`;
/// opaque to describers, which embed it into the schemas they produce.
///
/// [`Document`]: crate::document::Document
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SchemaRef(SmolStr);

impl SchemaRef {
    /// Build a reference to the definition with the given name.
    pub fn definition(name: impl AsRef<str>) -> Self {
        Self(format_smolstr!("{DEFINITIONS_PREFIX}{}", name.as_ref()))
    }

    /// The definition name this token points at, if it is a definition
    /// reference.
    pub fn definition_name(&self) -> Option<&str> {
        self.0.strip_prefix(DEFINITIONS_PREFIX)
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaRef({})", self.0)
    }
}

impl From<SchemaRef> for SmolStr {
    fn from(value: SchemaRef) -> Self {
        value.0
    }
}

impl AsRef<str> for SchemaRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
