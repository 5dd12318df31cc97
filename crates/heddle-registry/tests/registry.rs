//! End-to-end registry behavior: two-phase registration, recursive
//! discovery, alternative names, fixed-point termination.

use heddle_registry::error::Result;
use heddle_registry::{
    AlternativeName, Model, ModelDescriber, ModelRegistry, TypeDescriptor,
};
use heddle_schema::{Document, Schema};
use smol_str::SmolStr;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone)]
enum Field {
    Primitive(&'static str),
    /// Reference to another object type; groups are inherited from the
    /// model being described.
    Ref(&'static str),
    /// Array of references to another object type.
    Array(&'static str),
}

/// Table-driven describer: knows a fixed set of object classes and their
/// fields, registers nested models as it goes, counts dispatches.
struct ObjectDescriber {
    fields: HashMap<&'static str, Vec<(&'static str, Field)>>,
    dispatches: Rc<Cell<usize>>,
}

impl ObjectDescriber {
    fn new(
        fields: impl IntoIterator<Item = (&'static str, Vec<(&'static str, Field)>)>,
        dispatches: Rc<Cell<usize>>,
    ) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            dispatches,
        }
    }
}

impl ModelDescriber for ObjectDescriber {
    fn supports(&self, model: &Model) -> bool {
        matches!(model.ty(), TypeDescriptor::Object { class } if self.fields.contains_key(class.as_str()))
    }

    fn describe(
        &self,
        model: &Model,
        schema: &mut Schema,
        registry: &mut ModelRegistry,
    ) -> Result<()> {
        self.dispatches.set(self.dispatches.get() + 1);
        let TypeDescriptor::Object { class } = model.ty() else {
            unreachable!("supports() only accepts objects")
        };

        *schema = Schema::object();
        for (name, field) in &self.fields[class.as_str()] {
            let groups = model.groups().map(<[SmolStr]>::to_vec);
            let property = match field {
                Field::Primitive(ty) => Schema::primitive(*ty),
                Field::Ref(class) => {
                    let reference =
                        registry.register(Model::new(TypeDescriptor::object(*class), groups))?;
                    Schema::reference(reference)
                }
                Field::Array(class) => {
                    let reference =
                        registry.register(Model::new(TypeDescriptor::object(*class), groups))?;
                    Schema::array_of(Schema::reference(reference))
                }
            };
            schema.set_property(*name, property);
        }
        Ok(())
    }
}

/// Describes `chain::Node<i>` and registers `chain::Node<i+1>` until the
/// limit, to exercise the drain loop's fixed point.
struct ChainDescriber {
    limit: u32,
    dispatches: Rc<Cell<usize>>,
}

impl ModelDescriber for ChainDescriber {
    fn supports(&self, model: &Model) -> bool {
        matches!(model.ty(), TypeDescriptor::Object { class } if class.starts_with("chain::Node"))
    }

    fn describe(
        &self,
        model: &Model,
        schema: &mut Schema,
        registry: &mut ModelRegistry,
    ) -> Result<()> {
        self.dispatches.set(self.dispatches.get() + 1);
        let TypeDescriptor::Object { class } = model.ty() else {
            unreachable!("supports() only accepts objects")
        };
        let index: u32 = class["chain::Node".len()..].parse().expect("node index");

        *schema = Schema::object();
        schema.set_property("id", Schema::primitive("integer"));
        if index < self.limit {
            let next = registry.register(Model::of(TypeDescriptor::object(format!(
                "chain::Node{}",
                index + 1
            ))))?;
            schema.set_property("next", Schema::reference(next));
        }
        Ok(())
    }
}

fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

#[test]
fn same_model_registered_twice_is_described_once() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [("acme::User", vec![("id", Field::Primitive("integer"))])],
        dispatches.clone(),
    );
    let mut registry = ModelRegistry::new(vec![Box::new(describer)], Document::new(), vec![]);

    // Separately constructed, semantically equal models.
    let first = registry
        .register(Model::of(TypeDescriptor::object("acme::User")))
        .expect("first registration");
    let second = registry
        .register(Model::of(TypeDescriptor::object("acme::User")))
        .expect("second registration");
    assert_eq!(first, second);

    let document = registry.finalize().expect("finalize");
    assert_eq!(dispatches.get(), 1);
    assert!(document.has_definition("User"));
    assert_eq!(document.definitions.len(), 1);
}

#[test]
fn nested_models_are_discovered_recursively() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [
            (
                "acme::User",
                vec![
                    ("id", Field::Primitive("integer")),
                    ("address", Field::Ref("acme::Address")),
                    ("orders", Field::Array("acme::Order")),
                ],
            ),
            ("acme::Address", vec![("street", Field::Primitive("string"))]),
            ("acme::Order", vec![("total", Field::Primitive("number"))]),
        ],
        dispatches.clone(),
    );
    let mut registry = ModelRegistry::new(vec![Box::new(describer)], Document::new(), vec![]);
    registry
        .register(Model::of(TypeDescriptor::object("acme::User")))
        .expect("register");

    let document = registry.finalize().expect("finalize");
    assert_eq!(dispatches.get(), 3);
    assert!(document.has_definition("User"));
    assert!(document.has_definition("Address"));
    assert!(document.has_definition("Order"));

    let user = &document.definitions["User"];
    let properties = user.properties.as_ref().expect("user properties");
    assert_eq!(
        properties["address"]
            .reference
            .as_ref()
            .and_then(|r| r.definition_name()),
        Some("Address")
    );
    assert_eq!(
        properties["orders"]
            .items
            .as_ref()
            .and_then(|items| items.reference.as_ref())
            .and_then(|r| r.definition_name()),
        Some("Order")
    );
}

#[test]
fn structurally_different_models_with_one_base_name_get_suffixes() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [
            ("acme::Order", vec![("total", Field::Primitive("number"))]),
            ("shop::Order", vec![("sku", Field::Primitive("string"))]),
        ],
        dispatches,
    );
    let mut registry = ModelRegistry::new(vec![Box::new(describer)], Document::new(), vec![]);

    let first = registry
        .register(Model::of(TypeDescriptor::object("acme::Order")))
        .expect("first");
    let second = registry
        .register(Model::of(TypeDescriptor::object("shop::Order")))
        .expect("second");
    assert_eq!(first.definition_name(), Some("Order"));
    assert_eq!(second.definition_name(), Some("Order2"));

    let document = registry.finalize().expect("finalize");
    assert!(document.has_definition("Order"));
    assert!(document.has_definition("Order2"));
}

#[test]
fn preloaded_alternative_name_is_materialized_without_explicit_registration() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [("acme::User", vec![("id", Field::Primitive("integer"))])],
        dispatches.clone(),
    );
    let registry = ModelRegistry::new(
        vec![Box::new(describer)],
        Document::new(),
        vec![AlternativeName {
            name: "UserDTO".into(),
            ty: "acme::User".into(),
            groups: Some(vec!["default".into()]),
        }],
    );

    // No register() call mentions acme::User before the drain.
    let document = registry.finalize().expect("finalize");
    assert_eq!(dispatches.get(), 1);
    assert!(document.has_definition("UserDTO"));
    assert!(!document.has_definition("User"));
    assert!(!document.definitions["UserDTO"].is_empty());
}

#[test]
fn registration_under_a_preloaded_binding_uses_the_declared_name() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [("acme::User", vec![("id", Field::Primitive("integer"))])],
        dispatches,
    );
    let mut registry = ModelRegistry::new(
        vec![Box::new(describer)],
        Document::new(),
        vec![AlternativeName {
            name: "UserDTO".into(),
            ty: "acme::User".into(),
            groups: Some(vec!["default".into()]),
        }],
    );

    let reference = registry
        .register(Model::new(
            TypeDescriptor::object("acme::User"),
            Some(vec!["default".into()]),
        ))
        .expect("register");
    assert_eq!(reference.definition_name(), Some("UserDTO"));
}

#[test]
fn alternative_names_propagate_through_nested_discovery() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [
            (
                "acme::User",
                vec![("address", Field::Ref("acme::Address"))],
            ),
            ("acme::Address", vec![("street", Field::Primitive("string"))]),
        ],
        dispatches,
    );
    let registry = ModelRegistry::new(
        vec![Box::new(describer)],
        Document::new(),
        vec![
            AlternativeName {
                name: "UserDTO".into(),
                ty: "acme::User".into(),
                groups: Some(vec!["default".into()]),
            },
            AlternativeName {
                name: "AddressDTO".into(),
                ty: "acme::Address".into(),
                groups: Some(vec!["default".into()]),
            },
        ],
    );

    let document = registry.finalize().expect("finalize");
    assert!(document.has_definition("UserDTO"));
    assert!(document.has_definition("AddressDTO"));

    let user = &document.definitions["UserDTO"];
    let properties = user.properties.as_ref().expect("user properties");
    assert_eq!(
        properties["address"]
            .reference
            .as_ref()
            .and_then(|r| r.definition_name()),
        Some("AddressDTO")
    );
}

#[test]
fn first_declaration_wins_when_one_name_is_declared_twice() {
    let dispatches = counter();
    let describer = ObjectDescriber::new(
        [
            ("acme::A", vec![("a", Field::Primitive("string"))]),
            ("acme::B", vec![("b", Field::Primitive("string"))]),
        ],
        dispatches,
    );
    let registry = ModelRegistry::new(
        vec![Box::new(describer)],
        Document::new(),
        vec![
            AlternativeName {
                name: "Payload".into(),
                ty: "acme::A".into(),
                groups: None,
            },
            AlternativeName {
                name: "Payload".into(),
                ty: "acme::B".into(),
                groups: None,
            },
        ],
    );

    let document = registry.finalize().expect("finalize");
    let payload = &document.definitions["Payload"];
    let properties = payload.properties.as_ref().expect("payload properties");
    assert!(properties.contains_key("a"));
    assert!(!properties.contains_key("b"));
}

#[test]
fn drain_reaches_a_fixed_point_over_describer_registered_chains() {
    let dispatches = counter();
    let describer = ChainDescriber {
        limit: 5,
        dispatches: dispatches.clone(),
    };
    let mut registry = ModelRegistry::new(vec![Box::new(describer)], Document::new(), vec![]);
    registry
        .register(Model::of(TypeDescriptor::object("chain::Node0")))
        .expect("register root");

    let document = registry.finalize().expect("finalize");
    // Node0 through Node5: one dispatch per distinct model, then the loop
    // stops.
    assert_eq!(dispatches.get(), 6);
    for index in 0..=5 {
        assert!(document.has_definition(&format!("Node{index}")));
    }

    let node0 = &document.definitions["Node0"];
    let next = node0
        .properties
        .as_ref()
        .and_then(|properties| properties["next"].reference.as_ref())
        .and_then(|r| r.definition_name());
    assert_eq!(next, Some("Node1"));
}
