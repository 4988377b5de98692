//! The logical model stored by a knowledge base.
//!
//! Entity names are carried as [`Identifier`] values, produced once by
//! [`PrefixMap::resolve`] when a name enters the knowledge base. Everything
//! downstream compares identifiers, never raw IRI strings.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::model::iris;

/// A namespaced entity name: `<namespace#local_name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    namespace: String,
    local_name: String,
}

impl Identifier {
    /// Creates an identifier from a namespace IRI (without `#`) and a local name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Splits a full IRI (optionally wrapped in `<...>`) at its last `#`.
    ///
    /// Returns `None` when the IRI has no fragment.
    #[must_use]
    pub fn parse(iri: &str) -> Option<Self> {
        let iri = iri.trim_start_matches('<').trim_end_matches('>');
        let (namespace, local_name) = iri.rsplit_once('#')?;
        Some(Self::new(namespace, local_name))
    }

    /// The namespace IRI, without the trailing `#`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local name (the IRI fragment).
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The full IRI, `namespace#local_name`.
    #[must_use]
    pub fn iri(&self) -> String {
        format!("{}#{}", self.namespace, self.local_name)
    }

    /// Whether `name` refers to this entity.
    ///
    /// A full IRI must match exactly. Prefixed and bare names match on the
    /// local name alone, so a name stays usable across namespaces.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim_start_matches('<').trim_end_matches('>');
        if name.contains('#') {
            return self.iri() == name;
        }
        let local = name.rsplit_once(':').map_or(name, |(_, leaf)| leaf);
        self.local_name == local
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.namespace, self.local_name)
    }
}

/// Maps prefixes to namespace IRIs and resolves names to identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
    core: String,
}

impl PrefixMap {
    /// Creates a map whose unprefixed names resolve into `core`.
    #[must_use]
    pub fn new(core: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            core: core.into(),
        }
    }

    /// Binds `prefix` to a namespace IRI, replacing any previous binding.
    pub fn insert(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        let iri = iri.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = iri,
            None => self.entries.push((prefix, iri)),
        }
    }

    /// Returns the namespace bound to `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, iri)| iri.as_str())
    }

    /// The namespace unprefixed names resolve into.
    #[must_use]
    pub fn core(&self) -> &str {
        &self.core
    }

    /// Iterates over `(prefix, namespace)` bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    /// Resolves a name to an identifier.
    ///
    /// - `prefix:leaf` with a bound prefix resolves into that namespace
    /// - a full `http(s)://...#leaf` IRI is split at its fragment
    /// - anything else resolves into the core namespace
    #[must_use]
    pub fn resolve(&self, name: &str) -> Identifier {
        let name = name.trim_start_matches('<').trim_end_matches('>');
        if name.starts_with("http://") || name.starts_with("https://") {
            if let Some(id) = Identifier::parse(name) {
                return id;
            }
        }
        if let Some((prefix, leaf)) = name.split_once(':') {
            if let Some(iri) = self.get(prefix) {
                return Identifier::new(iri, leaf);
            }
        }
        Identifier::new(self.core.as_str(), name)
    }
}

/// The four kinds of named entity a knowledge base distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// An OWL class.
    Class,
    /// A named individual.
    Individual,
    /// A datatype property.
    DataProperty,
    /// An object property.
    ObjectProperty,
}

impl EntityKind {
    /// Returns the OWL keyword for the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::Individual => "NamedIndividual",
            EntityKind::DataProperty => "DataProperty",
            EntityKind::ObjectProperty => "ObjectProperty",
        }
    }
}

/// The XSD datatypes literals may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    /// `xsd:string`.
    String,
    /// `xsd:integer`.
    Integer,
    /// `xsd:boolean`.
    Boolean,
}

impl Datatype {
    /// Returns the full datatype IRI.
    #[must_use]
    pub fn iri(self) -> &'static str {
        match self {
            Datatype::String => iris::XSD_STRING,
            Datatype::Integer => iris::XSD_INTEGER,
            Datatype::Boolean => iris::XSD_BOOLEAN,
        }
    }

    /// Maps a datatype IRI back to a datatype.
    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            iris::XSD_STRING => Some(Datatype::String),
            iris::XSD_INTEGER => Some(Datatype::Integer),
            iris::XSD_BOOLEAN => Some(Datatype::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Datatype::String => "xsd:string",
            Datatype::Integer => "xsd:integer",
            Datatype::Boolean => "xsd:boolean",
        })
    }
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Literal {
    /// `xsd:string`.
    Str(String),
    /// `xsd:integer`.
    Int(i64),
    /// `xsd:boolean`.
    Bool(bool),
}

impl Literal {
    /// The literal's datatype.
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            Literal::Str(_) => Datatype::String,
            Literal::Int(_) => Datatype::Integer,
            Literal::Bool(_) => Datatype::Boolean,
        }
    }

    /// The lexical form (`"abc"`, `"42"`, `"true"`).
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::Int(i) => i.to_string(),
            Literal::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"^^{}", self.lexical(), self.datatype())
    }
}

/// An `xsd:pattern` that did not compile.
#[derive(Debug, Error)]
#[error("Invalid pattern `{pattern}`: {error}")]
pub struct PatternError {
    /// The pattern as written.
    pub pattern: String,
    /// Why it did not compile.
    #[source]
    pub error: regex::Error,
}

/// A compiled `xsd:pattern`, anchored to the whole lexical form.
///
/// Compared, ordered and hashed by its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: regex::Regex,
}

impl Pattern {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if `source` is not a valid regular
    /// expression.
    pub fn new(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        match regex::Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => Ok(Self { source, regex }),
            Err(error) => Err(PatternError {
                pattern: source,
                error,
            }),
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole of `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

/// A constraining facet of a datatype restriction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    /// `xsd:length`: exact length of the lexical form.
    Length(i64),
    /// `xsd:minLength`.
    MinLength(i64),
    /// `xsd:maxLength`.
    MaxLength(i64),
    /// `xsd:pattern`: the whole lexical form must match.
    Pattern(Pattern),
    /// `xsd:minInclusive`.
    MinInclusive(i64),
    /// `xsd:maxInclusive`.
    MaxInclusive(i64),
    /// `xsd:minExclusive`.
    MinExclusive(i64),
    /// `xsd:maxExclusive`.
    MaxExclusive(i64),
}

impl Facet {
    /// Returns the facet's XSD keyword.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Length(_) => "xsd:length",
            Facet::MinLength(_) => "xsd:minLength",
            Facet::MaxLength(_) => "xsd:maxLength",
            Facet::Pattern(_) => "xsd:pattern",
            Facet::MinInclusive(_) => "xsd:minInclusive",
            Facet::MaxInclusive(_) => "xsd:maxInclusive",
            Facet::MinExclusive(_) => "xsd:minExclusive",
            Facet::MaxExclusive(_) => "xsd:maxExclusive",
        }
    }

    /// Whether `literal` satisfies the facet.
    ///
    /// Length facets measure the lexical form in characters; bound facets only
    /// admit integers.
    #[must_use]
    pub fn admits(&self, literal: &Literal) -> bool {
        let length = || i64::try_from(literal.lexical().chars().count()).unwrap_or(i64::MAX);
        let integer = || match literal {
            Literal::Int(i) => Some(*i),
            _ => None,
        };
        match self {
            Facet::Length(n) => length() == *n,
            Facet::MinLength(n) => length() >= *n,
            Facet::MaxLength(n) => length() <= *n,
            Facet::Pattern(pattern) => pattern.is_match(&literal.lexical()),
            Facet::MinInclusive(n) => integer().is_some_and(|v| v >= *n),
            Facet::MaxInclusive(n) => integer().is_some_and(|v| v <= *n),
            Facet::MinExclusive(n) => integer().is_some_and(|v| v > *n),
            Facet::MaxExclusive(n) => integer().is_some_and(|v| v < *n),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Facet::Pattern(p) => Literal::Str(p.as_str().to_owned()),
            Facet::Length(n)
            | Facet::MinLength(n)
            | Facet::MaxLength(n)
            | Facet::MinInclusive(n)
            | Facet::MaxInclusive(n)
            | Facet::MinExclusive(n)
            | Facet::MaxExclusive(n) => Literal::Int(*n),
        };
        write!(f, "{} {}", self.as_str(), value)
    }
}

/// A data range: the set of literals a data property may take.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataRange {
    /// Every literal of a datatype.
    Datatype(Datatype),
    /// Literals of a datatype satisfying every facet.
    Restriction {
        /// Base datatype.
        datatype: Datatype,
        /// Facets, all of which must hold.
        facets: Vec<Facet>,
    },
    /// Literals in any member range.
    Union(Vec<DataRange>),
    /// Literals not in the inner range.
    Complement(Box<DataRange>),
}

impl DataRange {
    /// Whether `literal` falls inside the range.
    #[must_use]
    pub fn matches(&self, literal: &Literal) -> bool {
        match self {
            DataRange::Datatype(dt) => literal.datatype() == *dt,
            DataRange::Restriction { datatype, facets } => {
                literal.datatype() == *datatype && facets.iter().all(|f| f.admits(literal))
            }
            DataRange::Union(ranges) => ranges.iter().any(|r| r.matches(literal)),
            DataRange::Complement(inner) => !inner.matches(literal),
        }
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataRange::Datatype(dt) => write!(f, "{dt}"),
            DataRange::Restriction { datatype, facets } => {
                write!(f, "DatatypeRestriction({datatype}")?;
                for facet in facets {
                    write!(f, " {facet}")?;
                }
                f.write_str(")")
            }
            DataRange::Union(ranges) => {
                f.write_str("DataUnionOf(")?;
                write_joined(f, ranges)?;
                f.write_str(")")
            }
            DataRange::Complement(inner) => write!(f, "DataComplementOf({inner})"),
        }
    }
}

/// A class expression, named or anonymous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassExpression {
    /// A named class.
    Class(Identifier),
    /// Individuals with at least one `property` value in `filler`.
    ObjectSomeValuesFrom {
        /// Object property.
        property: Identifier,
        /// Filler class expression.
        filler: Box<ClassExpression>,
    },
    /// Individuals related to `individual` through `property`.
    ObjectHasValue {
        /// Object property.
        property: Identifier,
        /// Required value.
        individual: Identifier,
    },
    /// Individuals with the literal `value` for `property`.
    DataHasValue {
        /// Data property.
        property: Identifier,
        /// Required literal.
        value: Literal,
    },
    /// Individuals in every operand.
    Intersection(Vec<ClassExpression>),
    /// Individuals in any operand.
    Union(Vec<ClassExpression>),
    /// Individuals not in the operand.
    Complement(Box<ClassExpression>),
}

impl ClassExpression {
    fn collect_signature<'a>(&'a self, out: &mut Vec<(EntityKind, &'a Identifier)>) {
        match self {
            ClassExpression::Class(id) => out.push((EntityKind::Class, id)),
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                out.push((EntityKind::ObjectProperty, property));
                filler.collect_signature(out);
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                out.push((EntityKind::ObjectProperty, property));
                out.push((EntityKind::Individual, individual));
            }
            ClassExpression::DataHasValue { property, .. } => {
                out.push((EntityKind::DataProperty, property));
            }
            ClassExpression::Intersection(ops) | ClassExpression::Union(ops) => {
                for op in ops {
                    op.collect_signature(out);
                }
            }
            ClassExpression::Complement(inner) => inner.collect_signature(out),
        }
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassExpression::Class(id) => write!(f, "{id}"),
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
            ClassExpression::DataHasValue { property, value } => {
                write!(f, "DataHasValue({property} {value})")
            }
            ClassExpression::Intersection(ops) => {
                f.write_str("ObjectIntersectionOf(")?;
                write_joined(f, ops)?;
                f.write_str(")")
            }
            ClassExpression::Union(ops) => {
                f.write_str("ObjectUnionOf(")?;
                write_joined(f, ops)?;
                f.write_str(")")
            }
            ClassExpression::Complement(inner) => write!(f, "ObjectComplementOf({inner})"),
        }
    }
}

/// A single logical assertion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axiom {
    /// Declares an entity of a given kind.
    Declaration {
        /// Entity kind.
        kind: EntityKind,
        /// Declared entity.
        entity: Identifier,
    },
    /// `sub` is a subclass of `sup`.
    SubClassOf {
        /// Subclass.
        sub: Identifier,
        /// Superclass.
        sup: Identifier,
    },
    /// `individual` is a member of `class`.
    ClassAssertion {
        /// Class.
        class: Identifier,
        /// Member.
        individual: Identifier,
    },
    /// `subject property object`.
    ObjectPropertyAssertion {
        /// Object property.
        property: Identifier,
        /// Subject individual.
        subject: Identifier,
        /// Object individual.
        object: Identifier,
    },
    /// `subject property value`.
    DataPropertyAssertion {
        /// Data property.
        property: Identifier,
        /// Subject individual.
        subject: Identifier,
        /// Literal value.
        value: Literal,
    },
    /// Every value of `property` is a member of `range`.
    ObjectPropertyRange {
        /// Object property.
        property: Identifier,
        /// Range class.
        range: Identifier,
    },
    /// Every value of `property` lies in `range`.
    DataPropertyRange {
        /// Data property.
        property: Identifier,
        /// Range.
        range: DataRange,
    },
    /// An individual has at most one value for the object property.
    FunctionalObjectProperty(Identifier),
    /// An individual has at most one value for the data property.
    FunctionalDataProperty(Identifier),
    /// No individual is a member of two of the expressions.
    DisjointClasses(Vec<ClassExpression>),
    /// The expressions have the same members.
    EquivalentClasses(Vec<ClassExpression>),
}

impl Axiom {
    /// Every entity the axiom mentions, with the kind it is used as.
    #[must_use]
    pub fn signature(&self) -> Vec<(EntityKind, &Identifier)> {
        let mut out = Vec::new();
        match self {
            Axiom::Declaration { kind, entity } => out.push((*kind, entity)),
            Axiom::SubClassOf { sub, sup } => {
                out.push((EntityKind::Class, sub));
                out.push((EntityKind::Class, sup));
            }
            Axiom::ClassAssertion { class, individual } => {
                out.push((EntityKind::Class, class));
                out.push((EntityKind::Individual, individual));
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                out.push((EntityKind::ObjectProperty, property));
                out.push((EntityKind::Individual, subject));
                out.push((EntityKind::Individual, object));
            }
            Axiom::DataPropertyAssertion {
                property, subject, ..
            } => {
                out.push((EntityKind::DataProperty, property));
                out.push((EntityKind::Individual, subject));
            }
            Axiom::ObjectPropertyRange { property, range } => {
                out.push((EntityKind::ObjectProperty, property));
                out.push((EntityKind::Class, range));
            }
            Axiom::DataPropertyRange { property, .. } | Axiom::FunctionalDataProperty(property) => {
                out.push((EntityKind::DataProperty, property));
            }
            Axiom::FunctionalObjectProperty(property) => {
                out.push((EntityKind::ObjectProperty, property));
            }
            Axiom::DisjointClasses(ops) | Axiom::EquivalentClasses(ops) => {
                for op in ops {
                    op.collect_signature(&mut out);
                }
            }
        }
        out
    }

    /// Whether the axiom mentions `entity` in any position.
    #[must_use]
    pub fn mentions(&self, entity: &Identifier) -> bool {
        self.signature().iter().any(|(_, id)| *id == entity)
    }

    /// Whether the axiom is an assertion whose subject is `individual`.
    #[must_use]
    pub fn is_about(&self, individual: &Identifier) -> bool {
        match self {
            Axiom::ClassAssertion { individual: i, .. } => i == individual,
            Axiom::ObjectPropertyAssertion { subject, .. }
            | Axiom::DataPropertyAssertion { subject, .. } => subject == individual,
            _ => false,
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::Declaration { kind, entity } => {
                write!(f, "Declaration({}({entity}))", kind.as_str())
            }
            Axiom::SubClassOf { sub, sup } => write!(f, "SubClassOf({sub} {sup})"),
            Axiom::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "ObjectPropertyAssertion({property} {subject} {object})"),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "DataPropertyAssertion({property} {subject} {value})"),
            Axiom::ObjectPropertyRange { property, range } => {
                write!(f, "ObjectPropertyRange({property} {range})")
            }
            Axiom::DataPropertyRange { property, range } => {
                write!(f, "DataPropertyRange({property} {range})")
            }
            Axiom::FunctionalObjectProperty(p) => write!(f, "FunctionalObjectProperty({p})"),
            Axiom::FunctionalDataProperty(p) => write!(f, "FunctionalDataProperty({p})"),
            Axiom::DisjointClasses(ops) => {
                f.write_str("DisjointClasses(")?;
                write_joined(f, ops)?;
                f.write_str(")")
            }
            Axiom::EquivalentClasses(ops) => {
                f.write_str("EquivalentClasses(")?;
                write_joined(f, ops)?;
                f.write_str(")")
            }
        }
    }
}

/// An axiom together with its `rdfs:comment` annotation, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedAxiom {
    /// The axiom.
    pub axiom: Axiom,
    /// Human-readable comment attached to the axiom.
    pub comment: Option<String>,
}

impl fmt::Display for AnnotatedAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.axiom)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn core() -> PrefixMap {
        let mut map = PrefixMap::new(iris::NS_CORE);
        map.insert("pbconf", iris::NS_CORE);
        map.insert("policy", iris::NS_POLICY);
        map
    }

    #[test]
    fn bare_names_resolve_into_core() {
        let id = core().resolve("SEL421");
        assert_eq!(id.namespace(), iris::NS_CORE);
        assert_eq!(id.local_name(), "SEL421");
        assert_eq!(
            id.to_string(),
            "<http://iti.illinois.edu/iti/pbconf/core#SEL421>"
        );
    }

    #[test]
    fn prefixed_names_use_the_bound_namespace() {
        let id = core().resolve("policy:cwr3");
        assert_eq!(id.namespace(), iris::NS_POLICY);
        assert_eq!(id.local_name(), "cwr3");
    }

    #[test]
    fn full_iris_are_split_at_the_fragment() {
        let id = core().resolve("<http://example.org/other#thing>");
        assert_eq!(id.namespace(), "http://example.org/other");
        assert_eq!(id.local_name(), "thing");
    }

    #[test]
    fn unknown_prefix_stays_in_core() {
        let id = core().resolve("nope:leaf");
        assert_eq!(id.namespace(), iris::NS_CORE);
        assert_eq!(id.local_name(), "nope:leaf");
    }

    #[test]
    fn identifier_matching() {
        let id = Identifier::new(iris::NS_CORE, "hasLvl1Pwd");
        assert!(id.matches("hasLvl1Pwd"));
        assert!(id.matches("config:hasLvl1Pwd"));
        assert!(id.matches("http://iti.illinois.edu/iti/pbconf/core#hasLvl1Pwd"));
        assert!(!id.matches("http://example.org/x#hasLvl1Pwd"));
        assert!(!id.matches("hasLvl2Pwd"));
    }

    #[test]
    fn pattern_facets_match_the_whole_lexical_form() {
        let lower = Facet::Pattern(Pattern::new("[a-z]*").unwrap());
        assert!(lower.admits(&Literal::Str("abc".to_owned())));
        assert!(!lower.admits(&Literal::Str("abC".to_owned())));
        assert!(!lower.admits(&Literal::Str("xabcx!".to_owned())));
    }

    #[test]
    fn invalid_patterns_are_reported_when_compiled() {
        let err = Pattern::new("[").unwrap_err();
        assert_eq!(err.pattern, "[");
        assert!(err.to_string().starts_with("Invalid pattern `[`"));
    }

    #[test]
    fn patterns_compare_by_source() {
        let a = Pattern::new("[a-z]*").unwrap();
        assert_eq!(a, Pattern::new("[a-z]*").unwrap());
        assert!(a < Pattern::new("[b-z]*").unwrap());
        assert_eq!(a.as_str(), "[a-z]*");
    }

    #[test]
    fn length_facets_measure_lexical_form() {
        assert!(Facet::MinLength(4).admits(&Literal::Str("abcd".to_owned())));
        assert!(!Facet::MinLength(4).admits(&Literal::Str("abc".to_owned())));
        assert!(Facet::MaxLength(3).admits(&Literal::Str("abc".to_owned())));
        // A length facet on an integer counts digits.
        assert!(Facet::Length(2).admits(&Literal::Int(10)));
        assert!(!Facet::Length(10).admits(&Literal::Int(10)));
    }

    #[test]
    fn bound_facets_only_admit_integers() {
        assert!(Facet::MinExclusive(5).admits(&Literal::Int(6)));
        assert!(!Facet::MinExclusive(5).admits(&Literal::Int(5)));
        assert!(Facet::MaxInclusive(5).admits(&Literal::Int(5)));
        assert!(!Facet::MinInclusive(0).admits(&Literal::Str("7".to_owned())));
    }

    #[test]
    fn mixed_case_range_rejects_single_case_values() {
        let range = DataRange::Complement(Box::new(DataRange::Union(vec![
            DataRange::Restriction {
                datatype: Datatype::String,
                facets: vec![Facet::Pattern(Pattern::new("[a-z]*").unwrap())],
            },
            DataRange::Restriction {
                datatype: Datatype::String,
                facets: vec![Facet::Pattern(Pattern::new("[A-Z]*").unwrap())],
            },
        ])));
        assert!(range.matches(&Literal::Str("AbC".to_owned())));
        assert!(!range.matches(&Literal::Str("abc".to_owned())));
        assert!(!range.matches(&Literal::Str("ABC".to_owned())));
    }

    #[test]
    fn axiom_display_uses_functional_syntax() {
        let ax = Axiom::DataPropertyAssertion {
            property: Identifier::new(iris::NS_CORE, "hasTelnetPort"),
            subject: Identifier::new(iris::NS_CORE, "linuxa"),
            value: Literal::Int(23),
        };
        assert_eq!(
            ax.to_string(),
            "DataPropertyAssertion(<http://iti.illinois.edu/iti/pbconf/core#hasTelnetPort> \
             <http://iti.illinois.edu/iti/pbconf/core#linuxa> \"23\"^^xsd:integer)"
        );
    }

    #[test]
    fn signature_covers_nested_expressions() {
        let joe = Identifier::new(iris::NS_CORE, "Joe");
        let ax = Axiom::DisjointClasses(vec![
            ClassExpression::Class(Identifier::new(iris::NS_CORE, "LINUX")),
            ClassExpression::Complement(Box::new(ClassExpression::ObjectHasValue {
                property: Identifier::new(iris::NS_CORE, "authDNP"),
                individual: joe.clone(),
            })),
        ]);
        assert!(ax.mentions(&joe));
        assert!(ax
            .signature()
            .contains(&(EntityKind::Individual, &joe)));
    }
}
