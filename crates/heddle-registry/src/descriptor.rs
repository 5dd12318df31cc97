use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::fmt;

/// What a model is *of*: a primitive, an object identified by its
/// fully-qualified type path, or a collection of some element type.
///
/// Collections always carry an element type; there is no untyped-collection
/// case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDescriptor {
    Boolean,
    Integer,
    Float,
    String,
    /// A named structured type, identified by its `::`-separated path
    /// (e.g. `acme::dto::User`).
    Object { class: SmolStr },
    /// An array-like type of homogeneous elements.
    Collection { value: Box<TypeDescriptor> },
}

impl TypeDescriptor {
    /// An object descriptor for the given fully-qualified type path.
    pub fn object(class: impl Into<SmolStr>) -> Self {
        Self::Object {
            class: class.into(),
        }
    }

    /// A collection descriptor over the given element type.
    pub fn collection_of(value: TypeDescriptor) -> Self {
        Self::Collection {
            value: Box::new(value),
        }
    }

    /// Short, human-readable base name used for generated definition names.
    ///
    /// Collections derive the element's short name and append `[]`; objects
    /// take the last segment of their type path; primitives use their
    /// lowercase name.
    pub fn short_name(&self) -> SmolStr {
        match self {
            Self::Boolean => SmolStr::new_static("boolean"),
            Self::Integer => SmolStr::new_static("integer"),
            Self::Float => SmolStr::new_static("float"),
            Self::String => SmolStr::new_static("string"),
            Self::Object { class } => {
                SmolStr::new(class.rsplit("::").next().unwrap_or(class.as_str()))
            }
            Self::Collection { value } => format_smolstr!("{}[]", value.short_name()),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    /// Full rendering for error messages: objects keep their whole path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Object { class } => f.write_str(class),
            Self::Collection { value } => write!(f, "{value}[]"),
        }
    }
}
