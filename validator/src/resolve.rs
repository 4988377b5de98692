//! Policy-kind resolution.
//!
//! Once every term of a statement is classified, the combination of target
//! and object classifications decides how the statement is enforced: as a
//! data-range axiom checked by the reasoner, or as a closed-world rule. For
//! closed-world statements the predicate then picks the rule kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classify::{Classification, Classifications};

/// How a statement is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// A data-range restriction on a data property.
    DirectData,
    /// A restriction on an object property. Nothing produces it yet; object
    /// ranges are expressed through the expression language.
    DirectObject,
    /// A closed-world rule.
    ClosedWorld,
    /// The statement cannot be enforced.
    Invalid,
}

/// Decides the policy kind from the statement's classifications.
#[must_use]
pub fn resolve_policy_kind(c: &Classifications) -> PolicyKind {
    use Classification as C;
    if [c.target, c.subject, c.object].contains(&C::Invalid) {
        return PolicyKind::Invalid;
    }
    match (c.target, c.object) {
        (C::Class | C::Individual, C::Class | C::Individual | C::Object | C::Data | C::Literal) => {
            PolicyKind::ClosedWorld
        }
        (C::Data, C::Data) => PolicyKind::ClosedWorld,
        (C::Data, C::Literal) => PolicyKind::DirectData,
        _ => PolicyKind::Invalid,
    }
}

/// The six kinds of closed-world rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Every instance of a class must assert a property.
    ClassMustHaveProperty,
    /// No instance of a class may assert a property.
    ClassMustNotHaveProperty,
    /// An individual must assert a property.
    IndividualMustHaveProperty,
    /// An individual may not assert a property.
    IndividualMustNotHaveProperty,
    /// Every instance of a class must satisfy a comparison.
    ClassPropertyRestrictions,
    /// An individual must satisfy a comparison.
    IndividualPropertyRestrictions,
}

impl RuleKind {
    /// Every rule kind.
    pub const ALL: [RuleKind; 6] = [
        RuleKind::ClassMustHaveProperty,
        RuleKind::ClassMustNotHaveProperty,
        RuleKind::IndividualMustHaveProperty,
        RuleKind::IndividualMustNotHaveProperty,
        RuleKind::ClassPropertyRestrictions,
        RuleKind::IndividualPropertyRestrictions,
    ];

    /// The name stored in rule records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::ClassMustHaveProperty => "ClassMustHaveProperty",
            RuleKind::ClassMustNotHaveProperty => "ClassMustNotHaveProperty",
            RuleKind::IndividualMustHaveProperty => "IndividualMustHaveProperty",
            RuleKind::IndividualMustNotHaveProperty => "IndividualMustNotHaveProperty",
            RuleKind::ClassPropertyRestrictions => "ClassPropertyRestrictions",
            RuleKind::IndividualPropertyRestrictions => "IndividualPropertyRestrictions",
        }
    }

    /// Whether the rule targets every instance of a class.
    #[must_use]
    pub fn is_class_target(self) -> bool {
        matches!(
            self,
            RuleKind::ClassMustHaveProperty
                | RuleKind::ClassMustNotHaveProperty
                | RuleKind::ClassPropertyRestrictions
        )
    }

    /// Whether the rule compares values rather than checking presence.
    #[must_use]
    pub fn is_restriction(self) -> bool {
        matches!(
            self,
            RuleKind::ClassPropertyRestrictions | RuleKind::IndividualPropertyRestrictions
        )
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown closed-world rule kind : {s}"))
    }
}

/// Predicates a restriction rule can compare with.
pub const RESTRICTION_PREDICATES: [&str; 13] = [
    "state",
    "status",
    "isa",
    "isnota",
    "gt",
    "lt",
    "gte",
    "lte",
    "eq",
    "neq",
    "min-length",
    "max-length",
    "complexity",
];

/// Picks the rule kind of a closed-world statement.
///
/// The predicate is compared case-insensitively. Returns `None` for a target
/// that is neither a class nor an individual, or for a predicate no rule
/// kind accepts.
#[must_use]
pub fn resolve_rule_kind(target: Classification, predicate: &str) -> Option<RuleKind> {
    let predicate = predicate.to_ascii_lowercase();
    let class = match target {
        Classification::Class => true,
        Classification::Individual => false,
        _ => return None,
    };
    let kind = match predicate.as_str() {
        "requires" | "capability" if class => RuleKind::ClassMustHaveProperty,
        "requires" | "capability" => RuleKind::IndividualMustHaveProperty,
        "mustnothave" if class => RuleKind::ClassMustNotHaveProperty,
        "mustnothave" => RuleKind::IndividualMustNotHaveProperty,
        p if RESTRICTION_PREDICATES.contains(&p) && class => RuleKind::ClassPropertyRestrictions,
        p if RESTRICTION_PREDICATES.contains(&p) => RuleKind::IndividualPropertyRestrictions,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Classification as C;

    fn kinds(target: C, subject: C, object: C) -> PolicyKind {
        resolve_policy_kind(&Classifications {
            target,
            subject,
            object,
        })
    }

    #[test]
    fn class_targets_are_closed_world() {
        assert_eq!(kinds(C::Class, C::Class, C::Data), PolicyKind::ClosedWorld);
        assert_eq!(kinds(C::Individual, C::Data, C::Literal), PolicyKind::ClosedWorld);
    }

    #[test]
    fn data_targets_with_literals_are_direct() {
        assert_eq!(kinds(C::Data, C::Data, C::Literal), PolicyKind::DirectData);
        assert_eq!(kinds(C::Data, C::Data, C::Data), PolicyKind::ClosedWorld);
        assert_eq!(kinds(C::Data, C::Data, C::Class), PolicyKind::Invalid);
    }

    #[test]
    fn invalid_anywhere_wins() {
        assert_eq!(kinds(C::Class, C::Invalid, C::Data), PolicyKind::Invalid);
        assert_eq!(kinds(C::Object, C::Object, C::Individual), PolicyKind::Invalid);
    }

    #[test]
    fn predicates_pick_rule_kinds() {
        assert_eq!(
            resolve_rule_kind(C::Class, "requires"),
            Some(RuleKind::ClassMustHaveProperty)
        );
        assert_eq!(
            resolve_rule_kind(C::Individual, "MustNotHave"),
            Some(RuleKind::IndividualMustNotHaveProperty)
        );
        assert_eq!(
            resolve_rule_kind(C::Class, "min-length"),
            Some(RuleKind::ClassPropertyRestrictions)
        );
        assert_eq!(
            resolve_rule_kind(C::Individual, "isNotA"),
            Some(RuleKind::IndividualPropertyRestrictions)
        );
        assert_eq!(resolve_rule_kind(C::Data, "requires"), None);
        assert_eq!(resolve_rule_kind(C::Class, "disjointWith"), None);
    }

    #[test]
    fn rule_kind_names_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str().parse::<RuleKind>(), Ok(kind));
        }
        assert!("Nope".parse::<RuleKind>().is_err());
    }
}
