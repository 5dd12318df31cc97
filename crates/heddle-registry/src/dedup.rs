//! Duplicate elimination over the finished document.
//!
//! Runs once, after every pending model has been described. Definitions
//! whose bodies are structurally identical and whose names are related are
//! merged into the earliest-seen of them; every reference to a merged-away
//! name (definition properties, array items, path responses) is rewritten
//! to the survivor. Rewrites can expose new equalities, e.g. two container
//! definitions whose item types just collapsed, so the pass iterates to a
//! fixed point.

use crate::error::Result;
use heddle_schema::{DEFINITIONS_PREFIX, Document};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Ceiling on rewrite passes, exclusive: at most this many passes run.
///
/// A soft guard against a pathological document, not an error path: on
/// reaching it the eliminator merges whatever state exists at that point.
pub const MAX_PASSES: usize = 100;

/// Compacts structurally identical, name-related definitions and rewrites
/// all references to the eliminated names.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateEliminator {
    max_passes: usize,
}

impl Default for DuplicateEliminator {
    fn default() -> Self {
        Self {
            max_passes: MAX_PASSES,
        }
    }
}

/// Where a definition-level reference lives within a property.
enum RefSlot {
    /// `properties.<name>.$ref`
    Direct,
    /// `properties.<name>.items.$ref`
    Items,
}

struct DefinitionUse {
    definition: String,
    property: String,
    slot: RefSlot,
}

struct PathUse {
    path: String,
    method: String,
    code: String,
}

/// One scan's findings: duplicates to merge and every use site, indexed by
/// the referenced definition name.
#[derive(Default)]
struct MergePlan {
    /// (duplicate name, surviving base name) pairs.
    duplicates: Vec<(String, String)>,
    definition_uses: HashMap<String, Vec<DefinitionUse>>,
    path_uses: HashMap<String, Vec<PathUse>>,
}

impl DuplicateEliminator {
    /// An eliminator with a custom pass ceiling; mainly for tests.
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Compact `document` in place.
    ///
    /// Side effects are confined to the document's definitions and paths.
    pub fn run(&self, document: &mut Document) -> Result<()> {
        let mut tree = document.to_structural_form()?;

        for pass in 0..self.max_passes {
            let plan = scan(&tree);
            if plan.duplicates.is_empty() {
                debug!(passes = pass, "duplicate elimination converged");
                break;
            }
            apply(&mut tree, &plan);
        }

        document.merge_from(tree)?;
        Ok(())
    }
}

/// Definitions whose names differ only in decimal digits are "related":
/// a base name and its numeric-suffix siblings (`Foo`, `Foo2`).
///
/// Only related names ever merge. Structurally identical but unrelated
/// definitions (say a `Color` and a `Status` that are both one string
/// field) are left alone on purpose; widening this predicate would fold
/// semantically distinct types together.
fn related_names(a: &str, b: &str) -> bool {
    strip_digits(a) == strip_digits(b)
}

fn strip_digits(name: &str) -> String {
    name.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// One pass over the structural form: content-hash every definition,
/// record later structural twins of related-named earlier definitions as
/// duplicates, and gather every reference use site.
fn scan(tree: &Value) -> MergePlan {
    let mut plan = MergePlan::default();
    // content hash -> earliest-seen definition name. First insertion wins,
    // so the earliest of a twin group is always the survivor.
    let mut seen: HashMap<[u8; 32], String> = HashMap::new();

    if let Some(definitions) = tree.get("definitions").and_then(Value::as_object) {
        for (name, definition) in definitions {
            collect_definition_uses(name, definition, &mut plan.definition_uses);

            let hash = content_hash(definition);
            match seen.entry(hash) {
                Entry::Occupied(base) => {
                    if related_names(base.get(), name) {
                        plan.duplicates.push((name.clone(), base.get().clone()));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(name.clone());
                }
            }
        }
    }

    if let Some(paths) = tree.get("paths").and_then(Value::as_object) {
        for (path, methods) in paths {
            let Some(methods) = methods.as_object() else {
                continue;
            };
            for (method, operation) in methods {
                let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
                    continue;
                };
                for (code, response) in responses {
                    let target = response
                        .get("schema")
                        .and_then(|schema| schema.get("$ref"))
                        .and_then(Value::as_str)
                        .and_then(|raw| raw.strip_prefix(DEFINITIONS_PREFIX));
                    if let Some(target) = target {
                        plan.path_uses
                            .entry(target.to_owned())
                            .or_default()
                            .push(PathUse {
                                path: path.clone(),
                                method: method.clone(),
                                code: code.clone(),
                            });
                    }
                }
            }
        }
    }

    plan
}

fn collect_definition_uses(
    name: &str,
    definition: &Value,
    uses: &mut HashMap<String, Vec<DefinitionUse>>,
) {
    let Some(properties) = definition.get("properties").and_then(Value::as_object) else {
        return;
    };
    for (property, value) in properties {
        let direct = value
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|raw| raw.strip_prefix(DEFINITIONS_PREFIX));
        let items = value
            .get("items")
            .and_then(|items| items.get("$ref"))
            .and_then(Value::as_str)
            .and_then(|raw| raw.strip_prefix(DEFINITIONS_PREFIX));

        let (target, slot) = match (direct, items) {
            (Some(target), _) => (target, RefSlot::Direct),
            (None, Some(target)) => (target, RefSlot::Items),
            (None, None) => continue,
        };
        uses.entry(target.to_owned()).or_default().push(DefinitionUse {
            definition: name.to_owned(),
            property: property.clone(),
            slot,
        });
    }
}

/// Rewrite every use of each duplicate to its base name, then drop the
/// duplicate's definition.
fn apply(tree: &mut Value, plan: &MergePlan) {
    for (duplicate, base) in &plan.duplicates {
        debug!(%duplicate, %base, "merging duplicate definition");
        let base_ref = Value::String(format!("{DEFINITIONS_PREFIX}{base}"));

        if let Some(uses) = plan.definition_uses.get(duplicate) {
            for site in uses {
                rewrite_definition_use(tree, site, &base_ref);
            }
        }
        if let Some(uses) = plan.path_uses.get(duplicate) {
            for site in uses {
                rewrite_path_use(tree, site, &base_ref);
            }
        }

        if let Some(definitions) = tree.get_mut("definitions").and_then(Value::as_object_mut) {
            definitions.shift_remove(duplicate);
        }
    }
}

fn rewrite_definition_use(tree: &mut Value, site: &DefinitionUse, base_ref: &Value) {
    let property = tree
        .get_mut("definitions")
        .and_then(|definitions| definitions.get_mut(&site.definition))
        .and_then(|definition| definition.get_mut("properties"))
        .and_then(|properties| properties.get_mut(&site.property));
    let Some(property) = property else {
        // Use site vanished, e.g. the referencing definition was itself
        // merged away earlier in this pass.
        return;
    };

    let slot = match site.slot {
        RefSlot::Direct => Some(property),
        RefSlot::Items => property.get_mut("items"),
    };
    if let Some(target) = slot.and_then(|slot| slot.get_mut("$ref")) {
        *target = base_ref.clone();
    }
}

fn rewrite_path_use(tree: &mut Value, site: &PathUse, base_ref: &Value) {
    let target = tree
        .get_mut("paths")
        .and_then(|paths| paths.get_mut(&site.path))
        .and_then(|methods| methods.get_mut(&site.method))
        .and_then(|operation| operation.get_mut("responses"))
        .and_then(|responses| responses.get_mut(&site.code))
        .and_then(|response| response.get_mut("schema"))
        .and_then(|schema| schema.get_mut("$ref"));
    if let Some(target) = target {
        *target = base_ref.clone();
    }
}

/// Sha256 over a tagged, canonical encoding of the definition body.
///
/// Object keys are visited in sorted order, so map key order never
/// distinguishes two definitions; array order stays significant.
fn content_hash(value: &Value) -> [u8; 32] {
    let mut hasher = Sha256::new();
    feed_value(value, &mut hasher);
    hasher.finalize().into()
}

fn feed_value(value: &Value, hasher: &mut Sha256) {
    match value {
        Value::Null => hasher.update([0u8]),
        Value::Bool(b) => hasher.update([1u8, u8::from(*b)]),
        Value::Number(n) => {
            hasher.update([2u8]);
            feed_str(&n.to_string(), hasher);
        }
        Value::String(s) => {
            hasher.update([3u8]);
            feed_str(s, hasher);
        }
        Value::Array(items) => {
            hasher.update([4u8]);
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                feed_value(item, hasher);
            }
        }
        Value::Object(map) => {
            hasher.update([5u8]);
            hasher.update((map.len() as u64).to_be_bytes());
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                feed_str(key, hasher);
                feed_value(&map[key.as_str()], hasher);
            }
        }
    }
}

fn feed_str(s: &str, hasher: &mut Sha256) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}
