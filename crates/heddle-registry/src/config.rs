use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use smol_str::SmolStr;

/// A user-declared `name -> (type, groups)` binding, applied before normal
/// discovery starts so the chosen name wins over an auto-generated one.
///
/// Plain serde data so hosts can ship these in their configuration files.
/// When the same name is declared more than once, the first declaration in
/// the list wins.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeName {
    /// The definition name to use.
    pub name: SmolStr,
    /// Fully-qualified path of the object type this name is for.
    #[serde(rename = "type")]
    pub ty: SmolStr,
    /// Serialization groups the binding applies to.
    pub groups: Option<Vec<SmolStr>>,
}
