//! The knowledge-base interface consumed by the validation engine.
//!
//! A knowledge base holds axioms in four [`Scope`]s. It keeps a committed
//! state and a working state: every mutation lands in the working state,
//! [`KnowledgeBase::commit`] makes it durable and [`KnowledgeBase::reload`]
//! discards it.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::axiom::{AnnotatedAxiom, Axiom, EntityKind, Identifier, Literal, PrefixMap};
use crate::model::Scope;

/// Failures of the backing store.
///
/// These are infrastructure problems, never policy outcomes.
#[derive(Debug, Error)]
pub enum KbError {
    /// A scope could not be loaded.
    #[error("Ontology not available for scope {scope}: {message}")]
    Unavailable {
        /// The scope that failed to load.
        scope: Scope,
        /// Backend detail.
        message: String,
    },

    /// Working state could not be made durable.
    #[error("Failed to commit knowledge base: {0}")]
    Commit(String),

    /// A snapshot was restored into a store it was not taken from.
    #[error("Snapshot of scope {0} does not belong to this knowledge base")]
    ForeignSnapshot(Scope),
}

/// Result alias for knowledge-base operations.
pub type Result<T> = std::result::Result<T, KbError>;

/// A frozen copy of one scope's axioms, used for backup and rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The scope the copy was taken from.
    pub scope: Scope,
    /// Axioms and their comment annotations.
    pub axioms: BTreeMap<Axiom, Option<String>>,
}

impl Snapshot {
    /// Number of axioms in the copy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    /// Whether the copy holds no axioms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }
}

/// The value side of a property assertion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssertionValue {
    /// An object property value.
    Individual(Identifier),
    /// A data property value.
    Literal(Literal),
}

impl AssertionValue {
    /// The value as it is compared by closed-world rules: the local name of an
    /// individual or the lexical form of a literal.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            AssertionValue::Individual(id) => id.local_name().to_owned(),
            AssertionValue::Literal(lit) => lit.lexical(),
        }
    }
}

/// A property assertion about one individual.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Assertion {
    /// The scope the assertion was found in.
    pub scope: Scope,
    /// The asserted property.
    pub property: Identifier,
    /// The asserted value.
    pub value: AssertionValue,
}

impl Assertion {
    /// Rebuilds the assertion axiom for `subject`.
    #[must_use]
    pub fn to_axiom(&self, subject: &Identifier) -> Axiom {
        match &self.value {
            AssertionValue::Individual(object) => Axiom::ObjectPropertyAssertion {
                property: self.property.clone(),
                subject: subject.clone(),
                object: object.clone(),
            },
            AssertionValue::Literal(value) => Axiom::DataPropertyAssertion {
                property: self.property.clone(),
                subject: subject.clone(),
                value: value.clone(),
            },
        }
    }
}

/// A description-logic knowledge base with scoped, transactional state.
///
/// Name lookups take the strings users type (`SEL421`, `pbconf:SEL421`, a
/// full IRI); everything else takes resolved [`Identifier`]s.
pub trait KnowledgeBase {
    /// The prefix map names are resolved with.
    fn prefixes(&self) -> &PrefixMap;

    /// Resolves a name to an identifier without checking that it exists.
    fn resolve(&self, name: &str) -> Identifier {
        self.prefixes().resolve(name)
    }

    /// Whether an entity of `kind` named `name` occurs in any scope (or only
    /// in the core scope when `core_only` is set).
    fn exists(&self, kind: EntityKind, name: &str, core_only: bool) -> bool;

    /// Finds the entity of `kind` named `name`.
    ///
    /// With `prioritize_core`, a match in the core scope wins over matches
    /// elsewhere; without it, the entity `name` resolves to wins.
    fn find(&self, kind: EntityKind, name: &str, prioritize_core: bool) -> Option<Identifier>;

    /// Adds an axiom to a scope of the working state.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn apply_axiom(&mut self, scope: Scope, axiom: Axiom) -> Result<()>;

    /// Adds an axiom carrying an `rdfs:comment` annotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn annotate_axiom(&mut self, scope: Scope, axiom: Axiom, comment: &str) -> Result<()>;

    /// Removes every assertion of `property` about `individual` in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn remove_property(
        &mut self,
        scope: Scope,
        individual: &Identifier,
        property: &Identifier,
    ) -> Result<()>;

    /// Removes every axiom of `scope` that mentions `individual`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn remove_individual(&mut self, scope: Scope, individual: &Identifier) -> Result<()>;

    /// Keeps only the axioms of `scope` for which `keep` returns true.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn retain(&mut self, scope: Scope, keep: &dyn Fn(&Axiom) -> bool) -> Result<()>;

    /// Removes every axiom of `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn clear_scope(&mut self, scope: Scope) -> Result<()> {
        self.retain(scope, &|_| false)
    }

    /// Moves every axiom of `from` into `into`, leaving `from` empty.
    ///
    /// # Errors
    ///
    /// Returns an error if either scope cannot be written.
    fn merge_scope(&mut self, from: Scope, into: Scope) -> Result<()>;

    /// Whether the working state is consistent.
    fn is_consistent(&self) -> bool;

    /// The axioms behind the first inconsistency, or an empty list.
    fn explain(&self) -> Vec<AnnotatedAxiom>;

    /// The axioms behind every inconsistency, one list per inconsistency.
    fn explain_all(&self) -> Vec<Vec<AnnotatedAxiom>>;

    /// Copies one scope of the working state.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be read.
    fn snapshot(&self, scope: Scope) -> Result<Snapshot>;

    /// Replaces a scope of the working state with a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope cannot be written.
    fn restore(&mut self, snapshot: Snapshot) -> Result<()>;

    /// Every individual that is a member of `class`, in identifier order.
    fn instances_of(&self, class: &Identifier) -> Vec<Identifier>;

    /// Every named class `individual` is a member of, including superclasses.
    fn types_of(&self, individual: &Identifier) -> Vec<Identifier>;

    /// Property assertions about `individual` found in `scopes`.
    fn assertions(&self, individual: &Identifier, scopes: &[Scope]) -> Vec<Assertion>;

    /// Whether the object property `property` declares `class` as its range.
    fn object_property_has_range(&self, property: &Identifier, class: &Identifier) -> bool;

    /// Discards the working state, returning to the last committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the committed state cannot be loaded.
    fn reload(&mut self) -> Result<()>;

    /// Makes the working state the committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be persisted.
    fn commit(&mut self) -> Result<()>;
}
