use crate::descriptor::TypeDescriptor;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Fatal registry errors.
///
/// Both registry-specific kinds are configuration/programming mistakes that
/// recur deterministically on retry, so nothing here is recoverable: a
/// build that hits one must be considered invalid.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    /// A model already bound to one name was registered again under a
    /// different explicit name.
    #[error(
        "provided alternative name \"{requested}\" differs from the one already known for this model: \"{existing}\""
    )]
    #[diagnostic(
        code(registry::ambiguous_name),
        help("declare a single alternative name per (type, groups) pair, or reuse the bound name")
    )]
    AmbiguousName {
        /// The name already bound to the model's identity hash.
        existing: SmolStr,
        /// The conflicting name passed to this registration.
        requested: SmolStr,
    },

    /// Dispatch found no describer whose `supports` accepts the model.
    #[error("schema of type \"{type_display}\" can't be generated, no describer supports it")]
    #[diagnostic(
        code(registry::no_describer),
        help("add a describer for this model to the registry's describer list")
    )]
    NoDescriber {
        /// Full rendering of the model's type descriptor.
        type_display: String,
    },

    /// The document store failed while serializing or merging.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] heddle_schema::DocumentError),
}

impl RegistryError {
    /// Create an ambiguous-name error.
    pub fn ambiguous_name(existing: impl Into<SmolStr>, requested: impl Into<SmolStr>) -> Self {
        Self::AmbiguousName {
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Create a no-describer error for the given type.
    pub fn no_describer(ty: &TypeDescriptor) -> Self {
        Self::NoDescriber {
            type_display: ty.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
