use crate::error::{DocumentError, Result};
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use smol_str::SmolStr;

/// Methods of a path, keyed by lowercase HTTP method name.
pub type PathItem = IndexMap<SmolStr, Operation>;

/// A single operation on a path: its responses, keyed by status code.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub summary: Option<String>,
    #[serde(default)]
    pub responses: IndexMap<SmolStr, Response>,
}

/// A response entry: free-text description plus the schema of the body.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

/// The schema document being assembled: named definitions plus API paths
/// whose responses reference them.
///
/// Definition and path order is insertion order, and it is semantic: the
/// duplicate-elimination pass keeps the earliest-seen of two structurally
/// identical definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub definitions: IndexMap<SmolStr, Schema>,
    #[serde(default)]
    pub paths: IndexMap<SmolStr, PathItem>,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition slot for `name`, created empty if absent.
    ///
    /// Used both to reserve a name (the empty placeholder keeps the name
    /// generator from handing it out again) and to write a finished schema.
    pub fn definition_mut(&mut self, name: impl Into<SmolStr>) -> &mut Schema {
        self.definitions.entry(name.into()).or_default()
    }

    /// Whether a definition (or reservation) with this name exists.
    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Write a finished schema under `name`, replacing any placeholder.
    pub fn set_definition(&mut self, name: impl Into<SmolStr>, schema: Schema) {
        self.definitions.insert(name.into(), schema);
    }

    /// Remove a definition, keeping the order of the remaining entries.
    pub fn remove_definition(&mut self, name: &str) -> Option<Schema> {
        self.definitions.shift_remove(name)
    }

    /// The path entry for `path`, created empty if absent.
    pub fn path_mut(&mut self, path: impl Into<SmolStr>) -> &mut PathItem {
        self.paths.entry(path.into()).or_default()
    }

    /// Serialize the whole document to its plain structural form.
    ///
    /// Key order in the tree matches document order.
    pub fn to_structural_form(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|source| DocumentError::StructuralForm { source })
    }

    /// Replace definitions and paths from a structural form previously
    /// produced by [`to_structural_form`](Self::to_structural_form).
    ///
    /// Replacement rather than key-wise merging: entries absent from the
    /// tree are dropped, so a compaction pass needs no separate removal
    /// channel.
    pub fn merge_from(&mut self, tree: serde_json::Value) -> Result<()> {
        let merged: Document =
            serde_json::from_value(tree).map_err(|source| DocumentError::Merge { source })?;
        self.definitions = merged.definitions;
        self.paths = merged.paths;
        Ok(())
    }
}
