//! `policy` namespace: closed-world rule vocabulary.
//!
//! Closed-world rules are stored as individuals of a reasoner class, each
//! carrying string-valued data assertions that name the rule kind and its
//! fields. Two reasoner classes exist so that test rules never mix with the
//! operator's rules.
//!
//! **Scope:** `policy`.

use crate::model::iris::*;
use crate::model::{Class, Namespace, NamespaceModule, Property, PropertyKind, Scope};

/// Returns the policy namespace module.
#[must_use]
pub fn module() -> NamespaceModule {
    NamespaceModule {
        namespace: Namespace {
            prefix: "policy",
            iri: NS_POLICY,
            label: "PBConf Policy",
            comment: "Policy axioms and the closed-world rules evaluated on every \
                      validation pass.",
            scope: Scope::Policy,
            imports: &[NS_CORE],
        },
        classes: classes(),
        properties: properties(),
        individuals: vec![],
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/policy#ClosedWorldReasoner",
            label: "ClosedWorldReasoner",
            comment: "A closed-world rule registered by an operator policy.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/policy#TESTClosedWorldReasoner",
            label: "TESTClosedWorldReasoner",
            comment: "A closed-world rule registered by a test run.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[],
        },
    ]
}

fn rule_field(id: &'static str, label: &'static str, comment: &'static str) -> Property {
    Property {
        id,
        label,
        comment,
        kind: PropertyKind::Datatype,
        functional: true,
        domain: None,
        range: Some(XSD_STRING),
    }
}

fn properties() -> Vec<Property> {
    vec![
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#hasReasonerName",
            "hasReasonerName",
            "The kind of closed-world rule (e.g., `ClassMustHaveProperty`).",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#hasClassTarget",
            "hasClassTarget",
            "The class whose instances a rule constrains.",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#hasIndividualTarget",
            "hasIndividualTarget",
            "The individual a rule constrains.",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#requiresProperty",
            "requiresProperty",
            "The property a must-have or must-not-have rule looks for.",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#subject",
            "subject",
            "The property a restriction rule tests.",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#predicate",
            "predicate",
            "The comparison a restriction rule applies.",
        ),
        rule_field(
            "http://iti.illinois.edu/iti/pbconf/policy#object",
            "object",
            "The value a restriction rule compares against.",
        ),
    ]
}
