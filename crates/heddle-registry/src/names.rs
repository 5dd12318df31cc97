use crate::model::Model;
use heddle_schema::Document;
use smol_str::{SmolStr, format_smolstr};

/// Derive a collision-free definition name for a model.
///
/// Base name comes from the descriptor's short name; collisions with names
/// already present (or reserved) in the document are disambiguated with a
/// numeric suffix. The first collision yields `Base2`, never `Base1`. The
/// caller reserves the returned name immediately, so generation and
/// reservation cannot interleave.
pub(crate) fn generate(document: &Document, model: &Model) -> SmolStr {
    let base = model.ty().short_name();
    let mut candidate = base.clone();
    let mut i = 1u32;
    while document.has_definition(&candidate) {
        i += 1;
        candidate = format_smolstr!("{base}{i}");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;

    #[test]
    fn first_registration_gets_the_base_name() {
        let document = Document::new();
        let model = Model::of(TypeDescriptor::object("acme::Order"));
        assert_eq!(generate(&document, &model), "Order");
    }

    #[test]
    fn first_collision_yields_suffix_two() {
        let mut document = Document::new();
        document.definition_mut("Order");

        let model = Model::of(TypeDescriptor::object("shop::Order"));
        assert_eq!(generate(&document, &model), "Order2");

        document.definition_mut("Order2");
        assert_eq!(generate(&document, &model), "Order3");
    }

    #[test]
    fn collection_names_carry_brackets() {
        let mut document = Document::new();
        let model = Model::of(TypeDescriptor::collection_of(TypeDescriptor::object(
            "acme::Order",
        )));
        assert_eq!(generate(&document, &model), "Order[]");

        document.definition_mut("Order[]");
        assert_eq!(generate(&document, &model), "Order[]2");
    }
}
