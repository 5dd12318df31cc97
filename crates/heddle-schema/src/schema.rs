use crate::refs::SchemaRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use smol_str::SmolStr;

/// A single schema value: either a reference to a named definition or an
/// inline shape (object with properties, array with items, primitive).
///
/// Every field is optional; a freshly reserved definition slot is the empty
/// schema and serializes as `{}`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref")]
    pub reference: Option<SchemaRef>,
    #[serde(rename = "type")]
    pub schema_type: Option<SmolStr>,
    pub format: Option<SmolStr>,
    pub title: Option<SmolStr>,
    pub description: Option<String>,
    pub required: Option<Vec<SmolStr>>,
    pub properties: Option<IndexMap<SmolStr, Schema>>,
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    pub default: Option<serde_json::Value>,
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// A schema that is nothing but a reference to a definition.
    pub fn reference(reference: SchemaRef) -> Self {
        Self {
            reference: Some(reference),
            ..Self::default()
        }
    }

    /// An empty `object`-typed schema.
    pub fn object() -> Self {
        Self {
            schema_type: Some(SmolStr::new_static("object")),
            ..Self::default()
        }
    }

    /// An `array`-typed schema with the given item schema.
    pub fn array_of(items: Schema) -> Self {
        Self {
            schema_type: Some(SmolStr::new_static("array")),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// A primitive schema (`string`, `integer`, `number`, `boolean`).
    pub fn primitive(schema_type: impl Into<SmolStr>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// Insert a property, creating the property map on first use.
    pub fn set_property(&mut self, name: impl Into<SmolStr>, schema: Schema) -> &mut Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    /// True when no field has been set: the placeholder state of a
    /// reserved-but-not-yet-described definition slot.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
