//! Fact classifier.
//!
//! Decides what each term of a statement denotes. A term the knowledge base
//! knows is classified by what it is (class, then individual, then object
//! relation, then data relation). An unknown term is classified from its
//! neighbours and the predicate.

use pbconf_ontology::{EntityKind, KnowledgeBase};

/// What a statement term denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A class.
    Class,
    /// A named individual.
    Individual,
    /// An object property.
    Object,
    /// A data property.
    Data,
    /// A literal value. Only produced for objects.
    Literal,
    /// Nothing the statement can use.
    Invalid,
}

/// The classifications of a statement's three terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifications {
    /// The target.
    pub target: Classification,
    /// The subject.
    pub subject: Classification,
    /// The object.
    pub object: Classification,
}

/// Which entity kinds a name exists as, in any scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Existence {
    class: bool,
    individual: bool,
    object: bool,
    data: bool,
}

impl Existence {
    fn of<K: KnowledgeBase + ?Sized>(kb: &K, name: &str) -> Self {
        if name.is_empty() {
            return Self::default();
        }
        Self {
            class: kb.exists(EntityKind::Class, name, false),
            individual: kb.exists(EntityKind::Individual, name, false),
            object: kb.exists(EntityKind::ObjectProperty, name, false),
            data: kb.exists(EntityKind::DataProperty, name, false),
        }
    }

    fn kind(self) -> Option<Classification> {
        if self.class {
            Some(Classification::Class)
        } else if self.individual {
            Some(Classification::Individual)
        } else if self.object {
            Some(Classification::Object)
        } else if self.data {
            Some(Classification::Data)
        } else {
            None
        }
    }

    fn known(self) -> bool {
        self.kind().is_some()
    }

    fn relation(self) -> bool {
        self.object || self.data
    }

    fn entity(self) -> bool {
        self.class || self.individual
    }
}

const PRESENCE: [&str; 3] = ["requires", "capability", "mustNotHave"];
const COMPARISONS: [&str; 6] = ["eq", "neq", "gt", "lt", "gte", "lte"];

/// Classifies all three terms of a statement.
///
/// `subject` is the subject after an empty subject has been replaced by the
/// target. Names are looked up as translated.
pub fn classify<K: KnowledgeBase + ?Sized>(
    kb: &K,
    target: &str,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Classifications {
    let t = Existence::of(kb, target);
    let s = Existence::of(kb, subject);
    let o = Existence::of(kb, object);

    let target_class = classify_target(t, s, o, target, subject);
    let subject_class = classify_subject(t, s, o, target, subject, predicate, object);
    let object_class = classify_object(o, target_class, subject_class, predicate);
    Classifications {
        target: target_class,
        subject: subject_class,
        object: object_class,
    }
}

fn classify_target(
    t: Existence,
    s: Existence,
    o: Existence,
    target: &str,
    subject: &str,
) -> Classification {
    if let Some(kind) = t.kind() {
        return kind;
    }
    if !s.known() {
        if target == subject && !target.is_empty() {
            return by_object(o);
        }
        return Classification::Invalid;
    }
    if s.class {
        Classification::Class
    } else if s.individual {
        Classification::Invalid
    } else {
        Classification::Individual
    }
}

fn classify_subject(
    t: Existence,
    s: Existence,
    o: Existence,
    target: &str,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Classification {
    if let Some(kind) = s.kind() {
        return kind;
    }
    if subject.is_empty() || subject == target {
        if let Some(kind) = t.kind() {
            return kind;
        }
    }
    if PRESENCE.contains(&predicate) {
        by_object(o)
    } else if matches!(predicate, "isA" | "isNotA") {
        Classification::Individual
    } else if matches!(predicate, "state" | "status") {
        Classification::Object
    } else if COMPARISONS.contains(&predicate) || (!o.known() && !object.is_empty()) {
        Classification::Data
    } else {
        Classification::Invalid
    }
}

fn classify_object(
    o: Existence,
    target: Classification,
    subject: Classification,
    predicate: &str,
) -> Classification {
    if let Some(kind) = o.kind() {
        return kind;
    }
    if target == Classification::Invalid || subject == Classification::Invalid {
        return Classification::Invalid;
    }
    match subject {
        Classification::Data => Classification::Literal,
        Classification::Object => Classification::Individual,
        Classification::Class => match predicate {
            "isA" | "isNotA" => Classification::Class,
            "state" | "status" => Classification::Individual,
            p if COMPARISONS.contains(&p)
                || matches!(p, "min-length" | "max-length" | "complexity") =>
            {
                Classification::Literal
            }
            _ => Classification::Invalid,
        },
        _ => Classification::Invalid,
    }
}

/// An unknown term takes its kind from the object it relates to: a relation
/// makes it an individual, a class or individual makes it a class.
fn by_object(o: Existence) -> Classification {
    if o.relation() {
        Classification::Individual
    } else if o.entity() {
        Classification::Class
    } else {
        Classification::Invalid
    }
}
