use std::str::FromStr;

use pbconf_ontology::{Axiom, EntityKind, Identifier, KnowledgeBase, Scope};
use tracing::{debug, warn};

use super::{ClassPropertyRequest, IndividualPropertyRequest, RestrictionRequest, Rule, RuleStore};
use crate::report::{Explanation, Failure};

/// The comparisons a restriction rule can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `state` / `status`: the value names the given status.
    State,
    /// `min-length`.
    MinLength,
    /// `max-length`.
    MaxLength,
    /// `gt`.
    Gt,
    /// `lt`.
    Lt,
    /// `gte`.
    Gte,
    /// `lte`.
    Lte,
    /// `eq`.
    Eq,
    /// `neq`.
    Neq,
    /// `complexity`: letter case of the value.
    Complexity,
    /// `isA`: the individual is of the class.
    IsA,
    /// `isNotA`: the individual is not of the class.
    IsNotA,
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "state" | "status" => Comparator::State,
            "min-length" => Comparator::MinLength,
            "max-length" => Comparator::MaxLength,
            "gt" => Comparator::Gt,
            "lt" => Comparator::Lt,
            "gte" => Comparator::Gte,
            "lte" => Comparator::Lte,
            "eq" => Comparator::Eq,
            "neq" => Comparator::Neq,
            "complexity" => Comparator::Complexity,
            "isa" => Comparator::IsA,
            "isnota" => Comparator::IsNotA,
            _ => return Err(format!("Invalid predicate : {s}")),
        })
    }
}

/// Integers in rule values and asserted values parse leniently: anything
/// that is not an integer counts as 0.
fn lenient(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

/// The local part of a name written as `prefix:leaf`, `<iri#leaf>` or `leaf`.
fn leaf(name: &str) -> &str {
    let name = name.trim_start_matches('<').trim_end_matches('>');
    let name = name.rsplit_once('#').map_or(name, |(_, l)| l);
    name.rsplit_once(':').map_or(name, |(_, l)| l)
}

/// Compares one asserted value against a rule value.
///
/// `isA` and `isNotA` test types, not values, and always pass here.
///
/// # Errors
///
/// Returns the failure reason when the value breaks the rule.
pub fn check_value(comparator: Comparator, expected: &str, actual: &str) -> Result<(), String> {
    let v = lenient(expected);
    let a = || lenient(actual);
    let len = || i64::try_from(actual.chars().count()).unwrap_or(i64::MAX);
    let fail = |failed: bool, reason: String| if failed { Err(reason) } else { Ok(()) };
    match comparator {
        Comparator::State => {
            let (want, have) = (leaf(expected).to_lowercase(), leaf(actual).to_lowercase());
            fail(want != have, format!("{have} state != {want}"))
        }
        Comparator::MinLength => fail(len() <= v, "Too short".to_owned()),
        Comparator::MaxLength => fail(len() >= v, "Too long".to_owned()),
        Comparator::Gt => fail(a() <= v, "Too short".to_owned()),
        Comparator::Lt => fail(a() >= v, "Too long".to_owned()),
        Comparator::Gte => fail(a() < v, "Too short".to_owned()),
        Comparator::Lte => fail(a() > v, "Too long".to_owned()),
        Comparator::Eq => fail(a() != v, format!("{v} != {}", a())),
        Comparator::Neq => fail(a() == v, format!("{v} == {}", a())),
        Comparator::Complexity => {
            let lower = actual == actual.to_lowercase();
            let upper = actual == actual.to_uppercase();
            match expected.to_ascii_lowercase().as_str() {
                "lowercase" => fail(!lower, "Not lower case".to_owned()),
                "uppercase" => fail(!upper, "Not upper case".to_owned()),
                "mixedcase" => fail(lower || upper, "Not mixed case".to_owned()),
                _ => Err("Invalid complexity value".to_owned()),
            }
        }
        Comparator::IsA | Comparator::IsNotA => Ok(()),
    }
}

/// Evaluates every rule of the store, in rule order, and stops at the first
/// rule that fails.
///
/// Returns `None` when every rule passes.
pub fn evaluate<K: KnowledgeBase + ?Sized>(kb: &K, store: &RuleStore) -> Option<Explanation> {
    for record in store.load(kb) {
        let failures = check_rule(kb, &record.rule);
        if !failures.is_empty() {
            debug!(
                rule = %record.id,
                kind = %record.rule.kind(),
                failures = failures.len(),
                "closed-world rule failed"
            );
            return Some(Explanation {
                failed_validator: record.rule.kind(),
                failures,
            });
        }
    }
    None
}

fn check_rule<K: KnowledgeBase + ?Sized>(kb: &K, rule: &Rule) -> Vec<Failure> {
    match rule {
        Rule::ClassMustHaveProperty(ClassPropertyRequest { class, property }) => {
            presence(kb, &instances(kb, class), property, true)
        }
        Rule::ClassMustNotHaveProperty(ClassPropertyRequest { class, property }) => {
            presence(kb, &instances(kb, class), property, false)
        }
        Rule::IndividualMustHaveProperty(IndividualPropertyRequest {
            individual,
            property,
        }) => presence(kb, &[individual_id(kb, individual)], property, true),
        Rule::IndividualMustNotHaveProperty(IndividualPropertyRequest {
            individual,
            property,
        }) => presence(kb, &[individual_id(kb, individual)], property, false),
        Rule::ClassPropertyRestrictions(request) => {
            restriction(kb, &instances(kb, &request.target), request)
        }
        Rule::IndividualPropertyRestrictions(request) => {
            restriction(kb, &[individual_id(kb, &request.target)], request)
        }
    }
}

fn instances<K: KnowledgeBase + ?Sized>(kb: &K, class: &str) -> Vec<Identifier> {
    kb.find(EntityKind::Class, class, true)
        .map(|class| kb.instances_of(&class))
        .unwrap_or_default()
}

fn individual_id<K: KnowledgeBase + ?Sized>(kb: &K, name: &str) -> Identifier {
    kb.find(EntityKind::Individual, name, false)
        .unwrap_or_else(|| kb.resolve(name))
}

fn presence<K: KnowledgeBase + ?Sized>(
    kb: &K,
    individuals: &[Identifier],
    property: &str,
    required: bool,
) -> Vec<Failure> {
    individuals
        .iter()
        .filter(|ind| {
            let present = kb
                .assertions(ind, &Scope::ALL)
                .iter()
                .any(|a| a.property.matches(property));
            present != required
        })
        .map(|ind| Failure {
            individual: ind.iri(),
            property: Some(leaf(property).to_owned()),
            axiom: None,
            reason: None,
        })
        .collect()
}

fn restriction<K: KnowledgeBase + ?Sized>(
    kb: &K,
    individuals: &[Identifier],
    request: &RestrictionRequest,
) -> Vec<Failure> {
    let comparator = match request.predicate.parse::<Comparator>() {
        Ok(c) => c,
        Err(err) => {
            warn!(predicate = %request.predicate, "{err}");
            return Vec::new();
        }
    };
    individuals
        .iter()
        .filter_map(|ind| {
            let (axiom, reason) = match comparator {
                Comparator::IsA | Comparator::IsNotA => type_failure(kb, ind, comparator, &request.object)?,
                _ => kb
                    .assertions(ind, &Scope::ALL)
                    .iter()
                    .filter(|a| a.property.matches(&request.subject))
                    .find_map(|a| {
                        check_value(comparator, &request.object, &a.value.text())
                            .err()
                            .map(|reason| (a.to_axiom(ind), reason))
                    })?,
            };
            Some(Failure {
                individual: ind.iri(),
                property: None,
                axiom: Some(axiom.to_string()),
                reason: Some(reason),
            })
        })
        .collect()
}

fn type_failure<K: KnowledgeBase + ?Sized>(
    kb: &K,
    individual: &Identifier,
    comparator: Comparator,
    class: &str,
) -> Option<(Axiom, String)> {
    let wanted = leaf(class);
    let member = kb
        .types_of(individual)
        .iter()
        .any(|t| t.local_name().eq_ignore_ascii_case(wanted));
    let axiom = || Axiom::ClassAssertion {
        class: kb
            .find(EntityKind::Class, class, true)
            .unwrap_or_else(|| kb.resolve(class)),
        individual: individual.clone(),
    };
    match (comparator, member) {
        (Comparator::IsA, false) => Some((axiom(), format!("Individual is not of class {class}"))),
        (Comparator::IsNotA, true) => Some((axiom(), format!("Individual is of class {class}"))),
        _ => None,
    }
}
