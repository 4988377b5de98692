//! Closed-world rules.
//!
//! The reasoner works under the open-world assumption: a device without a
//! password is not inconsistent, its password is merely unknown. Closed-world
//! rules close that gap. Each rule is stored in the policy scope as an
//! individual of the active reasoner class (`ClosedWorldReasoner` or
//! `TESTClosedWorldReasoner`), named `cwr0`, `cwr1`, ..., with one string
//! assertion per field. Evaluation reads them back and checks them against
//! every scope.

mod eval;
mod store;

pub use eval::{check_value, evaluate, Comparator};
pub use store::RuleStore;

use std::collections::BTreeMap;

use pbconf_ontology::Identifier;

use crate::resolve::RuleKind;
use crate::statement::ParsedStatement;

/// A rule about one property of every instance of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPropertyRequest {
    /// The class whose instances are checked.
    pub class: String,
    /// The property that must (or must not) be asserted.
    pub property: String,
}

/// A rule about one property of one individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualPropertyRequest {
    /// The individual that is checked.
    pub individual: String,
    /// The property that must (or must not) be asserted.
    pub property: String,
}

/// A comparison every value of a property must pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRequest {
    /// The class or individual that is checked.
    pub target: String,
    /// The property whose values are compared.
    pub subject: String,
    /// The comparison (`min-length`, `gt`, `isA`, ...).
    pub predicate: String,
    /// The value compared against.
    pub object: String,
}

/// A closed-world rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// See [`RuleKind::ClassMustHaveProperty`].
    ClassMustHaveProperty(ClassPropertyRequest),
    /// See [`RuleKind::ClassMustNotHaveProperty`].
    ClassMustNotHaveProperty(ClassPropertyRequest),
    /// See [`RuleKind::IndividualMustHaveProperty`].
    IndividualMustHaveProperty(IndividualPropertyRequest),
    /// See [`RuleKind::IndividualMustNotHaveProperty`].
    IndividualMustNotHaveProperty(IndividualPropertyRequest),
    /// See [`RuleKind::ClassPropertyRestrictions`].
    ClassPropertyRestrictions(RestrictionRequest),
    /// See [`RuleKind::IndividualPropertyRestrictions`].
    IndividualPropertyRestrictions(RestrictionRequest),
}

const REASONER_NAME: &str = "hasReasonerName";
const CLASS_TARGET: &str = "hasClassTarget";
const INDIVIDUAL_TARGET: &str = "hasIndividualTarget";
const REQUIRES: &str = "requiresProperty";
const SUBJECT: &str = "subject";
const PREDICATE: &str = "predicate";
const OBJECT: &str = "object";

impl Rule {
    /// Builds a presence rule (`must have` / `must not have`).
    ///
    /// Returns `None` for a restriction kind.
    #[must_use]
    pub fn presence(kind: RuleKind, target: &str, property: &str) -> Option<Self> {
        let class = || ClassPropertyRequest {
            class: target.to_owned(),
            property: property.to_owned(),
        };
        let individual = || IndividualPropertyRequest {
            individual: target.to_owned(),
            property: property.to_owned(),
        };
        Some(match kind {
            RuleKind::ClassMustHaveProperty => Rule::ClassMustHaveProperty(class()),
            RuleKind::ClassMustNotHaveProperty => Rule::ClassMustNotHaveProperty(class()),
            RuleKind::IndividualMustHaveProperty => Rule::IndividualMustHaveProperty(individual()),
            RuleKind::IndividualMustNotHaveProperty => {
                Rule::IndividualMustNotHaveProperty(individual())
            }
            RuleKind::ClassPropertyRestrictions | RuleKind::IndividualPropertyRestrictions => {
                return None
            }
        })
    }

    /// Builds a restriction rule.
    ///
    /// Returns `None` for a presence kind.
    #[must_use]
    pub fn restriction(kind: RuleKind, request: RestrictionRequest) -> Option<Self> {
        match kind {
            RuleKind::ClassPropertyRestrictions => Some(Rule::ClassPropertyRestrictions(request)),
            RuleKind::IndividualPropertyRestrictions => {
                Some(Rule::IndividualPropertyRestrictions(request))
            }
            _ => None,
        }
    }

    /// Builds the rule a closed-world statement asks for.
    ///
    /// Presence rules take the translated subject and object; restrictions
    /// keep the object as written.
    #[must_use]
    pub fn from_statement(parsed: &ParsedStatement) -> Option<Self> {
        let kind = parsed.rule_kind?;
        if kind.is_restriction() {
            Self::restriction(
                kind,
                RestrictionRequest {
                    target: parsed.target.clone(),
                    subject: parsed.subject.clone(),
                    predicate: parsed.predicate.clone(),
                    object: parsed.original.object.clone(),
                },
            )
        } else {
            Self::presence(kind, &parsed.subject, &parsed.object)
        }
    }

    /// The rule's kind.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::ClassMustHaveProperty(_) => RuleKind::ClassMustHaveProperty,
            Rule::ClassMustNotHaveProperty(_) => RuleKind::ClassMustNotHaveProperty,
            Rule::IndividualMustHaveProperty(_) => RuleKind::IndividualMustHaveProperty,
            Rule::IndividualMustNotHaveProperty(_) => RuleKind::IndividualMustNotHaveProperty,
            Rule::ClassPropertyRestrictions(_) => RuleKind::ClassPropertyRestrictions,
            Rule::IndividualPropertyRestrictions(_) => RuleKind::IndividualPropertyRestrictions,
        }
    }

    /// The stored fields, by property local name. The kind is not included.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Rule::ClassMustHaveProperty(r) | Rule::ClassMustNotHaveProperty(r) => {
                vec![(CLASS_TARGET, r.class.as_str()), (REQUIRES, r.property.as_str())]
            }
            Rule::IndividualMustHaveProperty(r) | Rule::IndividualMustNotHaveProperty(r) => {
                vec![(INDIVIDUAL_TARGET, r.individual.as_str()), (REQUIRES, r.property.as_str())]
            }
            Rule::ClassPropertyRestrictions(r) => vec![
                (CLASS_TARGET, r.target.as_str()),
                (SUBJECT, r.subject.as_str()),
                (PREDICATE, r.predicate.as_str()),
                (OBJECT, r.object.as_str()),
            ],
            Rule::IndividualPropertyRestrictions(r) => vec![
                (INDIVIDUAL_TARGET, r.target.as_str()),
                (SUBJECT, r.subject.as_str()),
                (PREDICATE, r.predicate.as_str()),
                (OBJECT, r.object.as_str()),
            ],
        }
    }

    /// Rebuilds a rule from its kind and stored fields.
    ///
    /// Returns `None` when a field the kind needs is missing.
    #[must_use]
    pub fn from_fields(kind: RuleKind, fields: &BTreeMap<String, String>) -> Option<Self> {
        let get = |name: &str| fields.get(name).cloned();
        let target_field = if kind.is_class_target() {
            CLASS_TARGET
        } else {
            INDIVIDUAL_TARGET
        };
        let target = get(target_field)?;
        if kind.is_restriction() {
            Self::restriction(
                kind,
                RestrictionRequest {
                    target,
                    subject: get(SUBJECT)?,
                    predicate: get(PREDICATE)?,
                    object: get(OBJECT)?,
                },
            )
        } else {
            Self::presence(kind, &target, &get(REQUIRES)?)
        }
    }
}

/// A stored rule and its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    /// The rule individual (`policy#cwr3`).
    pub id: Identifier,
    /// The rule.
    pub rule: Rule,
}
