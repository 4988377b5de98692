//! JSON serializer.
//!
//! The vocabulary document lists every namespace with its classes,
//! properties and individuals. Scope dumps list each axiom in functional
//! syntax together with its comment.

use serde_json::{json, Map, Value};

use crate::kb::Snapshot;
use crate::model::{IndividualValue, Ontology, PropertyKind};

/// Serializes the vocabulary to a JSON `Value`.
#[must_use]
pub fn to_json(ontology: &Ontology) -> Value {
    let mut prefixes = Map::new();
    for module in &ontology.namespaces {
        prefixes.insert(
            module.namespace.prefix.to_owned(),
            json!(module.namespace.iri),
        );
    }

    let namespaces: Vec<Value> = ontology
        .namespaces
        .iter()
        .map(|module| {
            let classes: Vec<Value> = module
                .classes
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "label": c.label,
                        "comment": c.comment,
                        "subClassOf": c.subclass_of,
                        "disjointWith": c.disjoint_with,
                    })
                })
                .collect();
            let properties: Vec<Value> = module
                .properties
                .iter()
                .map(|p| {
                    let kind = match p.kind {
                        PropertyKind::Datatype => "DatatypeProperty",
                        PropertyKind::Object => "ObjectProperty",
                    };
                    json!({
                        "id": p.id,
                        "label": p.label,
                        "kind": kind,
                        "functional": p.functional,
                        "range": p.range,
                    })
                })
                .collect();
            let individuals: Vec<Value> = module
                .individuals
                .iter()
                .map(|i| {
                    let mut props = Map::new();
                    for (prop, value) in i.properties {
                        props.insert((*prop).to_owned(), individual_value(value));
                    }
                    json!({
                        "id": i.id,
                        "types": i.types,
                        "label": i.label,
                        "properties": Value::Object(props),
                    })
                })
                .collect();
            json!({
                "prefix": module.namespace.prefix,
                "iri": module.namespace.iri,
                "label": module.namespace.label,
                "scope": module.namespace.scope.as_str(),
                "imports": module.namespace.imports,
                "classes": classes,
                "properties": properties,
                "individuals": individuals,
            })
        })
        .collect();

    json!({
        "version": ontology.version,
        "base": ontology.base_iri,
        "prefixes": Value::Object(prefixes),
        "namespaces": namespaces,
    })
}

/// Serializes one scope snapshot to a JSON `Value`.
#[must_use]
pub fn snapshot_to_json(snapshot: &Snapshot) -> Value {
    let axioms: Vec<Value> = snapshot
        .axioms
        .iter()
        .map(|(axiom, comment)| match comment {
            Some(comment) => json!({ "axiom": axiom.to_string(), "comment": comment }),
            None => json!({ "axiom": axiom.to_string() }),
        })
        .collect();
    json!({
        "scope": snapshot.scope.as_str(),
        "axioms": axioms,
    })
}

fn individual_value(value: &IndividualValue) -> Value {
    match value {
        IndividualValue::Str(s) => json!(s),
        IndividualValue::Int(i) => json!(i),
        IndividualValue::Bool(b) => json!(b),
        IndividualValue::IriRef(iri) => json!({ "id": iri }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kb::KnowledgeBase;
    use crate::memory::MemoryKnowledgeBase;
    use crate::model::Scope;

    #[test]
    fn vocabulary_lists_every_namespace() {
        let value = to_json(Ontology::bootstrap());
        let namespaces = value["namespaces"].as_array().unwrap();
        assert_eq!(namespaces.len(), Ontology::bootstrap().namespaces.len());
        assert_eq!(
            value["prefixes"]["pbconf"],
            json!("http://iti.illinois.edu/iti/pbconf/core")
        );
    }

    #[test]
    fn snapshot_dump_keeps_comments() {
        let kb = MemoryKnowledgeBase::bootstrap();
        let value = snapshot_to_json(&kb.snapshot(Scope::Core).unwrap());
        assert_eq!(value["scope"], json!("core"));
        let axioms = value["axioms"].as_array().unwrap();
        assert!(axioms
            .iter()
            .any(|a| a["axiom"].as_str().unwrap_or("").starts_with("DisjointClasses(")
                && a.get("comment").is_some()));
    }
}
