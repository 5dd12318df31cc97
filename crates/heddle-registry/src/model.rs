use crate::descriptor::TypeDescriptor;
use sha2::{Digest, Sha256};
use smol_str::SmolStr;

/// One schema to produce: a type descriptor plus an optional set of
/// serialization-group labels.
///
/// Two models are the same entity iff their identity hashes are equal. The
/// hash is a pure function of (descriptor, normalized groups): groups are
/// sorted and deduplicated at construction, so two independently built
/// models for the same logical type+groups collide intentionally. `None`
/// (no group filtering) is distinct from `Some([])`.
///
/// Immutable after construction; the hash is computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    ty: TypeDescriptor,
    groups: Option<Vec<SmolStr>>,
    hash: SmolStr,
}

impl Model {
    /// Build a model, normalizing the group set.
    pub fn new(ty: TypeDescriptor, groups: Option<Vec<SmolStr>>) -> Self {
        let groups = groups.map(|mut groups| {
            groups.sort();
            groups.dedup();
            groups
        });
        let hash = identity_hash(&ty, groups.as_deref());
        Self { ty, groups, hash }
    }

    /// A model with no group filtering.
    pub fn of(ty: TypeDescriptor) -> Self {
        Self::new(ty, None)
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn groups(&self) -> Option<&[SmolStr]> {
        self.groups.as_deref()
    }

    /// The identity hash: lowercase hex, stable for the process lifetime,
    /// the sole key under which the registry tracks this model.
    pub fn identity_hash(&self) -> &SmolStr {
        &self.hash
    }
}

/// Sha256 over a tagged canonical byte encoding of (descriptor, groups).
///
/// Strings are length-prefixed so adjacent fields can never alias.
fn identity_hash(ty: &TypeDescriptor, groups: Option<&[SmolStr]>) -> SmolStr {
    let mut hasher = Sha256::new();
    feed_descriptor(ty, &mut hasher);
    match groups {
        None => hasher.update([0u8]),
        Some(groups) => {
            hasher.update([1u8]);
            hasher.update((groups.len() as u64).to_be_bytes());
            for group in groups {
                feed_str(group, &mut hasher);
            }
        }
    }
    SmolStr::new(hex::encode(hasher.finalize()))
}

fn feed_descriptor(ty: &TypeDescriptor, hasher: &mut Sha256) {
    match ty {
        TypeDescriptor::Boolean => hasher.update([1u8]),
        TypeDescriptor::Integer => hasher.update([2u8]),
        TypeDescriptor::Float => hasher.update([3u8]),
        TypeDescriptor::String => hasher.update([4u8]),
        TypeDescriptor::Object { class } => {
            hasher.update([5u8]);
            feed_str(class, hasher);
        }
        TypeDescriptor::Collection { value } => {
            hasher.update([6u8]);
            feed_descriptor(value, hasher);
        }
    }
}

fn feed_str(s: &str, hasher: &mut Sha256) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}
