//! In-memory reference knowledge base.
//!
//! [`MemoryKnowledgeBase`] is seeded from the static vocabulary and keeps its
//! committed and working states as ordered axiom maps. Its consistency check
//! is structural: it evaluates class expressions over the asserted facts with
//! three-valued logic and reports a violation only when the facts settle it.
//! Absence of a fact is never evidence against a class membership.
//!
//! Checked constraints:
//! - `DisjointClasses`: no individual is definitely in two operands
//! - `EquivalentClasses`: no individual is definitely in one operand and
//!   definitely outside another
//! - `DataPropertyRange`: every asserted literal lies in the range
//! - `ObjectPropertyRange`: no value is definitely outside the range class
//! - functional properties: at most one distinct value per subject

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::axiom::{
    AnnotatedAxiom, Axiom, ClassExpression, DataRange, Datatype, EntityKind, Identifier, Literal,
    PrefixMap,
};
use crate::kb::{Assertion, AssertionValue, KbError, KnowledgeBase, Result, Snapshot};
use crate::model::{iris, IndividualValue, Ontology, PropertyKind, Scope};

type ScopeStore = BTreeMap<Axiom, Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct State {
    scopes: BTreeMap<Scope, ScopeStore>,
}

impl State {
    fn store_mut(&mut self, scope: Scope) -> &mut ScopeStore {
        self.scopes.entry(scope).or_default()
    }

    fn entries(&self) -> impl Iterator<Item = (Scope, &Axiom, Option<&str>)> {
        self.scopes.iter().flat_map(|(scope, store)| {
            store
                .iter()
                .map(move |(axiom, comment)| (*scope, axiom, comment.as_deref()))
        })
    }
}

/// A knowledge base held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryKnowledgeBase {
    prefixes: PrefixMap,
    committed: State,
    current: State,
}

impl MemoryKnowledgeBase {
    /// Builds a knowledge base from a vocabulary. The seeded state is committed.
    #[must_use]
    pub fn new(ontology: &Ontology) -> Self {
        let core = ontology
            .namespaces
            .iter()
            .find(|m| m.namespace.scope == Scope::Core)
            .map_or(iris::NS_CORE, |m| m.namespace.iri);
        let mut prefixes = PrefixMap::new(core);
        let mut state = State::default();
        for module in &ontology.namespaces {
            prefixes.insert(module.namespace.prefix, module.namespace.iri);
            seed_module(&mut state, ontology, module);
        }
        for scope in Scope::ALL {
            state.store_mut(scope);
        }
        debug!(
            axioms = state.entries().count(),
            "seeded in-memory knowledge base"
        );
        Self {
            prefixes,
            committed: state.clone(),
            current: state,
        }
    }

    /// Builds a knowledge base from the PBConf vocabulary.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self::new(Ontology::bootstrap())
    }

    fn candidates(&self, kind: EntityKind, name: &str) -> Vec<(Scope, &Identifier)> {
        let mut out: Vec<(Scope, &Identifier)> = Vec::new();
        for (scope, axiom, _) in self.current.entries() {
            for (k, id) in axiom.signature() {
                if k == kind && id.matches(name) && !out.iter().any(|(s, i)| *s == scope && *i == id)
                {
                    out.push((scope, id));
                }
            }
        }
        out
    }

    fn violations(&self) -> Vec<Vec<AnnotatedAxiom>> {
        Index::build(&self.current).violations()
    }
}

fn seed_module(state: &mut State, ontology: &Ontology, module: &crate::model::NamespaceModule) {
    let scope = module.namespace.scope;
    let store = state.store_mut(scope);
    let label_of = |iri: &str| {
        ontology
            .find_class(iri)
            .map_or_else(|| iri.rsplit('#').next().unwrap_or(iri).to_owned(), |c| c.label.to_owned())
    };

    for class in &module.classes {
        let Some(id) = Identifier::parse(class.id) else {
            continue;
        };
        store.insert(
            Axiom::Declaration {
                kind: EntityKind::Class,
                entity: id.clone(),
            },
            Some(class.comment.to_owned()),
        );
        for sup in class.subclass_of.iter().filter(|s| **s != iris::OWL_THING) {
            if let Some(sup) = Identifier::parse(sup) {
                store.insert(
                    Axiom::SubClassOf {
                        sub: id.clone(),
                        sup,
                    },
                    None,
                );
            }
        }
        for other in class.disjoint_with {
            let Some(other_id) = Identifier::parse(other) else {
                continue;
            };
            let (first, second) = if id <= other_id {
                (id.clone(), other_id)
            } else {
                (other_id, id.clone())
            };
            let comment = format!(
                "Nothing can be both a {} and a {}.",
                label_of(&first.iri()),
                label_of(&second.iri())
            );
            store.insert(
                Axiom::DisjointClasses(vec![
                    ClassExpression::Class(first),
                    ClassExpression::Class(second),
                ]),
                Some(comment),
            );
        }
    }

    for property in &module.properties {
        let Some(id) = Identifier::parse(property.id) else {
            continue;
        };
        match property.kind {
            PropertyKind::Object => {
                store.insert(
                    Axiom::Declaration {
                        kind: EntityKind::ObjectProperty,
                        entity: id.clone(),
                    },
                    Some(property.comment.to_owned()),
                );
                if property.functional {
                    store.insert(
                        Axiom::FunctionalObjectProperty(id.clone()),
                        Some(format!("{} takes a single value.", property.label)),
                    );
                }
                if let Some(range) = property.range.and_then(Identifier::parse) {
                    let comment = format!(
                        "Values of {} must be of class {}.",
                        property.label,
                        range.local_name()
                    );
                    store.insert(
                        Axiom::ObjectPropertyRange {
                            property: id,
                            range,
                        },
                        Some(comment),
                    );
                }
            }
            PropertyKind::Datatype => {
                store.insert(
                    Axiom::Declaration {
                        kind: EntityKind::DataProperty,
                        entity: id.clone(),
                    },
                    Some(property.comment.to_owned()),
                );
                if property.functional {
                    store.insert(
                        Axiom::FunctionalDataProperty(id.clone()),
                        Some(format!("{} takes a single value.", property.label)),
                    );
                }
                if let Some(dt) = property.range.and_then(Datatype::from_iri) {
                    let comment = format!("Values of {} must be of type {dt}.", property.label);
                    store.insert(
                        Axiom::DataPropertyRange {
                            property: id,
                            range: DataRange::Datatype(dt),
                        },
                        Some(comment),
                    );
                }
            }
        }
    }

    for individual in &module.individuals {
        let Some(id) = Identifier::parse(individual.id) else {
            continue;
        };
        store.insert(
            Axiom::Declaration {
                kind: EntityKind::Individual,
                entity: id.clone(),
            },
            Some(individual.comment.to_owned()),
        );
        for class in individual.types.iter().filter_map(|t| Identifier::parse(t)) {
            store.insert(
                Axiom::ClassAssertion {
                    class,
                    individual: id.clone(),
                },
                None,
            );
        }
        for (property, value) in individual.properties {
            let Some(property) = Identifier::parse(property) else {
                continue;
            };
            let axiom = match value {
                IndividualValue::IriRef(iri) => match Identifier::parse(iri) {
                    Some(object) => Axiom::ObjectPropertyAssertion {
                        property,
                        subject: id.clone(),
                        object,
                    },
                    None => continue,
                },
                IndividualValue::Str(s) => Axiom::DataPropertyAssertion {
                    property,
                    subject: id.clone(),
                    value: Literal::Str((*s).to_owned()),
                },
                IndividualValue::Int(i) => Axiom::DataPropertyAssertion {
                    property,
                    subject: id.clone(),
                    value: Literal::Int(*i),
                },
                IndividualValue::Bool(b) => Axiom::DataPropertyAssertion {
                    property,
                    subject: id.clone(),
                    value: Literal::Bool(*b),
                },
            };
            store.insert(axiom, None);
        }
    }
}

impl KnowledgeBase for MemoryKnowledgeBase {
    fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    fn exists(&self, kind: EntityKind, name: &str, core_only: bool) -> bool {
        self.candidates(kind, name)
            .iter()
            .any(|(scope, _)| !core_only || *scope == Scope::Core)
    }

    fn find(&self, kind: EntityKind, name: &str, prioritize_core: bool) -> Option<Identifier> {
        let candidates = self.candidates(kind, name);
        let preferred = if prioritize_core {
            candidates.iter().find(|(scope, _)| *scope == Scope::Core)
        } else {
            let resolved = self.prefixes.resolve(name);
            candidates.iter().find(|(_, id)| **id == resolved)
        };
        preferred
            .or_else(|| candidates.first())
            .map(|(_, id)| (*id).clone())
    }

    fn apply_axiom(&mut self, scope: Scope, axiom: Axiom) -> Result<()> {
        self.current.store_mut(scope).entry(axiom).or_insert(None);
        Ok(())
    }

    fn annotate_axiom(&mut self, scope: Scope, axiom: Axiom, comment: &str) -> Result<()> {
        self.current
            .store_mut(scope)
            .insert(axiom, Some(comment.to_owned()));
        Ok(())
    }

    fn remove_property(
        &mut self,
        scope: Scope,
        individual: &Identifier,
        property: &Identifier,
    ) -> Result<()> {
        self.current.store_mut(scope).retain(|axiom, _| match axiom {
            Axiom::ObjectPropertyAssertion {
                property: p,
                subject,
                ..
            }
            | Axiom::DataPropertyAssertion {
                property: p,
                subject,
                ..
            } => !(subject == individual && p == property),
            _ => true,
        });
        Ok(())
    }

    fn remove_individual(&mut self, scope: Scope, individual: &Identifier) -> Result<()> {
        self.current
            .store_mut(scope)
            .retain(|axiom, _| !axiom.mentions(individual));
        Ok(())
    }

    fn retain(&mut self, scope: Scope, keep: &dyn Fn(&Axiom) -> bool) -> Result<()> {
        self.current.store_mut(scope).retain(|axiom, _| keep(axiom));
        Ok(())
    }

    fn merge_scope(&mut self, from: Scope, into: Scope) -> Result<()> {
        let moved = std::mem::take(self.current.store_mut(from));
        debug!(from = %from, into = %into, axioms = moved.len(), "merging scope");
        self.current.store_mut(into).extend(moved);
        Ok(())
    }

    fn is_consistent(&self) -> bool {
        let violations = self.violations();
        if !violations.is_empty() {
            debug!(violations = violations.len(), "knowledge base is inconsistent");
        }
        violations.is_empty()
    }

    fn explain(&self) -> Vec<AnnotatedAxiom> {
        self.violations().into_iter().next().unwrap_or_default()
    }

    fn explain_all(&self) -> Vec<Vec<AnnotatedAxiom>> {
        self.violations()
    }

    fn snapshot(&self, scope: Scope) -> Result<Snapshot> {
        Ok(Snapshot {
            scope,
            axioms: self.current.scopes.get(&scope).cloned().unwrap_or_default(),
        })
    }

    fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        if !self.current.scopes.contains_key(&snapshot.scope) {
            return Err(KbError::ForeignSnapshot(snapshot.scope));
        }
        self.current.scopes.insert(snapshot.scope, snapshot.axioms);
        Ok(())
    }

    fn instances_of(&self, class: &Identifier) -> Vec<Identifier> {
        let index = Index::build(&self.current);
        index
            .individuals
            .iter()
            .filter(|ind| index.closure(ind).contains(class))
            .map(|ind| (*ind).clone())
            .collect()
    }

    fn types_of(&self, individual: &Identifier) -> Vec<Identifier> {
        Index::build(&self.current)
            .closure(individual)
            .into_iter()
            .cloned()
            .collect()
    }

    fn assertions(&self, individual: &Identifier, scopes: &[Scope]) -> Vec<Assertion> {
        let mut out = Vec::new();
        for scope in scopes {
            let Some(store) = self.current.scopes.get(scope) else {
                continue;
            };
            for axiom in store.keys() {
                match axiom {
                    Axiom::ObjectPropertyAssertion {
                        property,
                        subject,
                        object,
                    } if subject == individual => out.push(Assertion {
                        scope: *scope,
                        property: property.clone(),
                        value: AssertionValue::Individual(object.clone()),
                    }),
                    Axiom::DataPropertyAssertion {
                        property,
                        subject,
                        value,
                    } if subject == individual => out.push(Assertion {
                        scope: *scope,
                        property: property.clone(),
                        value: AssertionValue::Literal(value.clone()),
                    }),
                    _ => {}
                }
            }
        }
        out
    }

    fn object_property_has_range(&self, property: &Identifier, class: &Identifier) -> bool {
        self.current.entries().any(|(_, axiom, _)| {
            matches!(axiom, Axiom::ObjectPropertyRange { property: p, range } if p == property && range == class)
        })
    }

    fn reload(&mut self) -> Result<()> {
        self.current = self.committed.clone();
        debug!("reloaded committed knowledge base");
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = self.current.clone();
        debug!(
            axioms = self.committed.entries().count(),
            "committed knowledge base"
        );
        Ok(())
    }
}

/// Three-valued truth for open-world evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// Lookup tables over one state, rebuilt for every query.
struct Index<'a> {
    entries: Vec<(&'a Axiom, Option<&'a str>)>,
    supers: BTreeMap<&'a Identifier, Vec<&'a Identifier>>,
    disjoint: BTreeSet<(&'a Identifier, &'a Identifier)>,
    types: BTreeMap<&'a Identifier, Vec<&'a Identifier>>,
    objects: BTreeMap<(&'a Identifier, &'a Identifier), Vec<&'a Identifier>>,
    literals: BTreeMap<(&'a Identifier, &'a Identifier), Vec<&'a Literal>>,
    functional: BTreeSet<&'a Identifier>,
    individuals: BTreeSet<&'a Identifier>,
}

impl<'a> Index<'a> {
    fn build(state: &'a State) -> Self {
        let mut index = Index {
            entries: Vec::new(),
            supers: BTreeMap::new(),
            disjoint: BTreeSet::new(),
            types: BTreeMap::new(),
            objects: BTreeMap::new(),
            literals: BTreeMap::new(),
            functional: BTreeSet::new(),
            individuals: BTreeSet::new(),
        };
        for (_, axiom, comment) in state.entries() {
            index.entries.push((axiom, comment));
            for (kind, id) in axiom.signature() {
                if kind == EntityKind::Individual {
                    index.individuals.insert(id);
                }
            }
            match axiom {
                Axiom::SubClassOf { sub, sup } => index.supers.entry(sub).or_default().push(sup),
                Axiom::ClassAssertion { class, individual } => {
                    index.types.entry(individual).or_default().push(class);
                }
                Axiom::ObjectPropertyAssertion {
                    property,
                    subject,
                    object,
                } => index
                    .objects
                    .entry((subject, property))
                    .or_default()
                    .push(object),
                Axiom::DataPropertyAssertion {
                    property,
                    subject,
                    value,
                } => index
                    .literals
                    .entry((subject, property))
                    .or_default()
                    .push(value),
                Axiom::FunctionalObjectProperty(p) | Axiom::FunctionalDataProperty(p) => {
                    index.functional.insert(p);
                }
                Axiom::DisjointClasses(ops) => {
                    let named: Vec<&Identifier> = ops
                        .iter()
                        .filter_map(|op| match op {
                            ClassExpression::Class(id) => Some(id),
                            _ => None,
                        })
                        .collect();
                    for (i, a) in named.iter().enumerate() {
                        for b in &named[i + 1..] {
                            index.disjoint.insert((a, b));
                            index.disjoint.insert((b, a));
                        }
                    }
                }
                _ => {}
            }
        }
        index
    }

    /// Named classes `individual` belongs to, following subclass links.
    fn closure(&self, individual: &Identifier) -> BTreeSet<&'a Identifier> {
        let mut seen = BTreeSet::new();
        let mut queue: Vec<&'a Identifier> = self.types.get(individual).cloned().unwrap_or_default();
        while let Some(class) = queue.pop() {
            if seen.insert(class) {
                if let Some(sups) = self.supers.get(class) {
                    queue.extend(sups.iter().copied());
                }
            }
        }
        seen
    }

    fn eval(&self, individual: &Identifier, expr: &ClassExpression) -> Truth {
        match expr {
            ClassExpression::Class(class) => {
                if class.iri() == iris::OWL_THING {
                    return Truth::True;
                }
                let closure = self.closure(individual);
                if closure.contains(class) {
                    Truth::True
                } else if closure.iter().any(|t| self.disjoint.contains(&(*t, class))) {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let values = self.object_values(individual, property);
                let results: Vec<Truth> = values.iter().map(|v| self.eval(v, filler)).collect();
                if results.contains(&Truth::True) {
                    Truth::True
                } else if self.functional.contains(property)
                    && !results.is_empty()
                    && results.iter().all(|r| *r == Truth::False)
                {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            ClassExpression::ObjectHasValue {
                property,
                individual: wanted,
            } => {
                let values = self.object_values(individual, property);
                if values.contains(&wanted) {
                    Truth::True
                } else if self.functional.contains(property) && !values.is_empty() {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            ClassExpression::DataHasValue { property, value } => {
                let values = self
                    .literals
                    .get(&(individual, property))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if values.contains(&value) {
                    Truth::True
                } else if self.functional.contains(property) && !values.is_empty() {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            ClassExpression::Intersection(ops) => ops
                .iter()
                .fold(Truth::True, |acc, op| acc.and(self.eval(individual, op))),
            ClassExpression::Union(ops) => ops
                .iter()
                .fold(Truth::False, |acc, op| acc.or(self.eval(individual, op))),
            ClassExpression::Complement(inner) => self.eval(individual, inner).not(),
        }
    }

    fn object_values<'b>(&'b self, individual: &'b Identifier, property: &'b Identifier) -> &'b [&'b Identifier] {
        self.objects
            .get(&(individual, property))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn annotated(&self, axiom: &Axiom) -> AnnotatedAxiom {
        let comment = self
            .entries
            .iter()
            .find(|(a, c)| *a == axiom && c.is_some())
            .and_then(|(_, c)| c.map(str::to_owned));
        AnnotatedAxiom {
            axiom: axiom.clone(),
            comment,
        }
    }

    /// The constraint axiom followed by every assertion about `individual`.
    fn justify(&self, constraint: &Axiom, individual: &Identifier) -> Vec<AnnotatedAxiom> {
        let mut out = vec![self.annotated(constraint)];
        let mut seen = BTreeSet::new();
        for (axiom, _) in &self.entries {
            if axiom.is_about(individual) && seen.insert(*axiom) {
                out.push(self.annotated(axiom));
            }
        }
        out
    }

    fn violations(&self) -> Vec<Vec<AnnotatedAxiom>> {
        let mut out = Vec::new();
        let mut seen: BTreeSet<&Axiom> = BTreeSet::new();
        for (axiom, _) in &self.entries {
            if !seen.insert(*axiom) {
                continue;
            }
            match axiom {
                Axiom::DisjointClasses(ops) => {
                    for ind in &self.individuals {
                        let members = ops
                            .iter()
                            .filter(|op| self.eval(ind, op) == Truth::True)
                            .count();
                        if members >= 2 {
                            out.push(self.justify(axiom, ind));
                        }
                    }
                }
                Axiom::EquivalentClasses(ops) => {
                    for ind in &self.individuals {
                        let results: Vec<Truth> = ops.iter().map(|op| self.eval(ind, op)).collect();
                        if results.contains(&Truth::True) && results.contains(&Truth::False) {
                            out.push(self.justify(axiom, ind));
                        }
                    }
                }
                Axiom::DataPropertyRange { property, range } => {
                    for ((subject, p), values) in &self.literals {
                        if *p != property {
                            continue;
                        }
                        for value in values.iter().filter(|v| !range.matches(v)) {
                            let assertion = Axiom::DataPropertyAssertion {
                                property: property.clone(),
                                subject: (*subject).clone(),
                                value: (*value).clone(),
                            };
                            out.push(vec![self.annotated(axiom), self.annotated(&assertion)]);
                        }
                    }
                }
                Axiom::ObjectPropertyRange { property, range } => {
                    let class = ClassExpression::Class(range.clone());
                    for ((subject, p), values) in &self.objects {
                        if *p != property {
                            continue;
                        }
                        for value in values {
                            if self.eval(value, &class) == Truth::False {
                                let mut entries = self.justify(axiom, value);
                                entries.push(self.annotated(&Axiom::ObjectPropertyAssertion {
                                    property: property.clone(),
                                    subject: (*subject).clone(),
                                    object: (*value).clone(),
                                }));
                                out.push(entries);
                            }
                        }
                    }
                }
                Axiom::FunctionalObjectProperty(property) => {
                    for ((subject, p), values) in &self.objects {
                        let distinct: BTreeSet<_> = values.iter().collect();
                        if *p == property && distinct.len() > 1 {
                            out.push(self.justify(axiom, subject));
                        }
                    }
                }
                Axiom::FunctionalDataProperty(property) => {
                    for ((subject, p), values) in &self.literals {
                        let distinct: BTreeSet<_> = values.iter().collect();
                        if *p == property && distinct.len() > 1 {
                            out.push(self.justify(axiom, subject));
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }
}
