use crate::config::AlternativeName;
use crate::dedup::DuplicateEliminator;
use crate::describer::ModelDescriber;
use crate::descriptor::TypeDescriptor;
use crate::error::{RegistryError, Result};
use crate::model::Model;
use crate::names;
use heddle_schema::{Document, Schema, SchemaRef};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The model registry: owns the document for the duration of one build,
/// tracks every known model by identity hash, and drives discovery to a
/// fixed point.
///
/// One registry per document build. [`register`] reserves a name and
/// returns a reference token immediately; [`finalize`] consumes the
/// registry, describes everything that is pending (describers may register
/// further models while they run), materializes unreferenced alternative
/// names, compacts structurally identical definitions, and hands the
/// finished document back.
///
/// [`register`]: Self::register
/// [`finalize`]: Self::finalize
pub struct ModelRegistry {
    describers: Vec<Box<dyn ModelDescriber>>,
    document: Document,
    /// identity hash -> model. Append-only: an existing hash is never
    /// overwritten.
    models: IndexMap<SmolStr, Model>,
    /// identity hash -> assigned definition name. Set at most once per
    /// hash; rebinding to a different name is the ambiguous-name error.
    names: HashMap<SmolStr, SmolStr>,
    /// Hashes registered but not yet described.
    pending: Vec<SmolStr>,
    /// Preloaded name bindings, materialized only if still unreferenced
    /// once normal discovery has drained.
    alternative_names: Vec<Model>,
}

impl ModelRegistry {
    /// Build a registry over `document` with the given describer list
    /// (order is dispatch priority) and user-declared name bindings.
    ///
    /// Alternative names are applied in reverse declaration order, so when
    /// one name is declared twice the first declaration in the original
    /// list ends up winning. Each binding reserves its name in the document
    /// right away; the bound models stay out of the pending queue until
    /// [`finalize`](Self::finalize) decides they were never referenced.
    pub fn new(
        describers: Vec<Box<dyn ModelDescriber>>,
        document: Document,
        alternative_names: Vec<AlternativeName>,
    ) -> Self {
        let mut registry = Self {
            describers,
            document,
            models: IndexMap::new(),
            names: HashMap::new(),
            pending: Vec::new(),
            alternative_names: Vec::new(),
        };

        for entry in alternative_names.into_iter().rev() {
            let model = Model::new(TypeDescriptor::object(entry.ty), entry.groups);
            registry
                .names
                .insert(model.identity_hash().clone(), entry.name.clone());
            registry.document.definition_mut(entry.name);
            registry.alternative_names.push(model);
        }

        registry
    }

    /// The document as assembled so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document, e.g. for hosts adding paths.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Register a model, reserving a generated name for it, and return the
    /// reference token to embed.
    ///
    /// Registering the same (type, groups) model twice returns the same
    /// token without duplicate work.
    pub fn register(&mut self, model: Model) -> Result<SchemaRef> {
        self.register_inner(model, None)
    }

    /// Register a model under an explicit name.
    ///
    /// Fails with [`RegistryError::AmbiguousName`] if the model is already
    /// bound to a different name.
    pub fn register_with_name(
        &mut self,
        model: Model,
        name: impl Into<SmolStr>,
    ) -> Result<SchemaRef> {
        self.register_inner(model, Some(name.into()))
    }

    fn register_inner(&mut self, model: Model, explicit: Option<SmolStr>) -> Result<SchemaRef> {
        let hash = model.identity_hash().clone();
        if !self.models.contains_key(&hash) {
            trace!(ty = %model.ty(), %hash, "registering model");
            self.pending.push(hash.clone());
            self.models.insert(hash.clone(), model);
        }

        match (self.names.get(&hash).cloned(), explicit) {
            (Some(existing), Some(requested)) if existing != requested => {
                return Err(RegistryError::ambiguous_name(existing, requested));
            }
            (Some(_), _) => {}
            (None, requested) => {
                let name = requested
                    .unwrap_or_else(|| names::generate(&self.document, &self.models[&hash]));
                self.names.insert(hash.clone(), name);
            }
        }

        // Reserve the name; idempotent once a schema has been written.
        let name = &self.names[&hash];
        self.document.definition_mut(name.clone());
        Ok(SchemaRef::definition(name))
    }

    /// Drain the pending queue to a fixed point, materialize alternative
    /// names that discovery never reached, compact duplicates, and return
    /// the finished document.
    pub fn finalize(mut self) -> Result<Document> {
        loop {
            self.drain_pending()?;
            if self.alternative_names.is_empty() {
                break;
            }
            // Names nobody referenced still get definitions, and whatever
            // their schemas pull in goes through the same drain.
            for model in std::mem::take(&mut self.alternative_names) {
                self.register(model)?;
            }
        }

        DuplicateEliminator::default().run(&mut self.document)?;
        Ok(self.document)
    }

    fn drain_pending(&mut self) -> Result<()> {
        while !self.pending.is_empty() {
            let mut batch: IndexMap<SmolStr, Model> = IndexMap::new();
            for hash in std::mem::take(&mut self.pending) {
                // Every pending hash was bound by register_inner.
                batch.insert(self.names[&hash].clone(), self.models[&hash].clone());
            }

            debug!(count = batch.len(), "describing pending models");
            for (name, model) in batch {
                let schema = self.describe(&model)?;
                self.document.set_definition(name, schema);
            }
        }
        Ok(())
    }

    /// First-match dispatch over the describer list.
    ///
    /// The list is detached from the registry for the duration of the call
    /// so the winning describer can be handed `&mut self` to register
    /// nested models.
    fn describe(&mut self, model: &Model) -> Result<Schema> {
        let describers = std::mem::take(&mut self.describers);
        let mut outcome = None;
        for describer in &describers {
            if describer.supports(model) {
                let mut schema = Schema::default();
                outcome = Some(
                    describer
                        .describe(model, &mut schema, self)
                        .map(|()| schema),
                );
                break;
            }
        }
        self.describers = describers;

        outcome.unwrap_or_else(|| Err(RegistryError::no_describer(model.ty())))
    }
}
