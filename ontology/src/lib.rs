//! PBConf device ontology encoded as typed Rust data.
//!
//! The `pbconf-ontology` crate provides the vocabulary the PBConf validation
//! engine reasons over (SEL-421 relays, Linux hosts, their services,
//! credentials and authorized users), the logical model a knowledge base
//! stores ([`axiom`]), the [`KnowledgeBase`] interface the engine consumes,
//! and an in-memory reference implementation of it ([`MemoryKnowledgeBase`]).
//!
//! # Entry Point
//!
//! ```
//! use pbconf_ontology::{EntityKind, KnowledgeBase, MemoryKnowledgeBase};
//!
//! let kb = MemoryKnowledgeBase::bootstrap();
//! assert!(kb.exists(EntityKind::Class, "SEL421", true));
//! assert!(kb.is_consistent());
//! ```
//!
//! # Serialization
//!
//! ```
//! let ontology = pbconf_ontology::Ontology::bootstrap();
//! let document = pbconf_ontology::serializer::json::to_json(ontology);
//! assert!(document["namespaces"].is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod axiom;
pub mod kb;
pub mod memory;
pub mod model;
pub mod namespaces;
#[cfg(feature = "serializers")]
pub mod serializer;

pub use axiom::{
    AnnotatedAxiom, Axiom, ClassExpression, DataRange, Datatype, EntityKind, Facet, Identifier,
    Literal, Pattern, PatternError, PrefixMap,
};
pub use kb::{Assertion, AssertionValue, KbError, KnowledgeBase, Snapshot};
pub use memory::MemoryKnowledgeBase;
pub use model::iris;
pub use model::{
    Class, Individual, IndividualValue, Namespace, NamespaceModule, Ontology, Property,
    PropertyKind, Scope,
};

impl Ontology {
    /// Returns the PBConf vocabulary.
    ///
    /// Assembly order: `pbconf` (core) → `config` → `partial` → `policy`.
    #[must_use]
    pub fn bootstrap() -> &'static Ontology {
        static ONTOLOGY: std::sync::OnceLock<Ontology> = std::sync::OnceLock::new();
        ONTOLOGY.get_or_init(|| Ontology {
            version: "1.0.0",
            base_iri: model::iris::PBCONF,
            namespaces: vec![
                namespaces::pbconf::module(),
                namespaces::config::module(),
                namespaces::config::partial_module(),
                namespaces::policy::module(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_count() {
        assert_eq!(Ontology::bootstrap().namespaces.len(), 4);
    }

    #[test]
    fn every_scope_has_one_namespace() {
        for scope in Scope::ALL {
            let count = Ontology::bootstrap()
                .namespaces
                .iter()
                .filter(|m| m.namespace.scope == scope)
                .count();
            assert_eq!(count, 1, "scope {scope} should have exactly one namespace");
        }
    }

    #[test]
    fn class_count() {
        // 9 device classes + 2 reasoner classes.
        assert_eq!(Ontology::bootstrap().class_count(), 11);
    }

    #[test]
    fn status_individuals_are_declared() {
        let ontology = Ontology::bootstrap();
        for state in ["on", "off"] {
            let iri = format!("{}#{state}", model::iris::NS_CORE);
            let individual = ontology.find_individual(&iri);
            assert!(individual.is_some(), "missing status individual {state}");
        }
    }

    #[test]
    fn all_class_iris_unique() {
        let mut iris = std::collections::HashSet::new();
        for module in &Ontology::bootstrap().namespaces {
            for class in &module.classes {
                assert!(iris.insert(class.id), "Duplicate class IRI: {}", class.id);
            }
        }
    }

    #[test]
    fn all_property_iris_unique() {
        let mut iris = std::collections::HashSet::new();
        for module in &Ontology::bootstrap().namespaces {
            for prop in &module.properties {
                assert!(iris.insert(prop.id), "Duplicate property IRI: {}", prop.id);
            }
        }
    }

    #[test]
    fn class_references_resolve() {
        let ontology = Ontology::bootstrap();
        for module in &ontology.namespaces {
            for class in &module.classes {
                for other in class.disjoint_with.iter().chain(class.subclass_of) {
                    if *other == model::iris::OWL_THING {
                        continue;
                    }
                    assert!(
                        ontology.find_class(other).is_some(),
                        "{} references unknown class {other}",
                        class.id
                    );
                }
            }
        }
    }
}
