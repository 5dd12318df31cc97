use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the document store.
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    /// The document could not be serialized to its structural form.
    #[error("failed to serialize document to structural form")]
    #[diagnostic(code(document::structural_form))]
    StructuralForm {
        #[source]
        source: serde_json::Error,
    },

    /// A structural form could not be read back into the document.
    #[error("failed to merge structural form back into document")]
    #[diagnostic(
        code(document::merge),
        help("the tree must come from Document::to_structural_form")
    )]
    Merge {
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
