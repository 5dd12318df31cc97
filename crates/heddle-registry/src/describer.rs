use crate::error::Result;
use crate::model::Model;
use crate::registry::ModelRegistry;
use heddle_schema::Schema;

/// A pluggable component that turns a [`Model`] into a schema, possibly
/// discovering further models along the way.
///
/// Describers are consulted in list order; the first whose [`supports`]
/// returns `true` wins, so the order a host configures is a significant
/// tie-break. During [`describe`] a describer may call
/// [`ModelRegistry::register`] any number of times, synchronously, to
/// register the nested types it encounters; the registry hands itself in
/// as an explicit parameter for exactly that.
///
/// [`supports`]: ModelDescriber::supports
/// [`describe`]: ModelDescriber::describe
pub trait ModelDescriber {
    /// Pure capability predicate: can this describer produce a schema for
    /// the model?
    fn supports(&self, model: &Model) -> bool;

    /// Populate `schema` for `model`.
    fn describe(
        &self,
        model: &Model,
        schema: &mut Schema,
        registry: &mut ModelRegistry,
    ) -> Result<()>;
}
