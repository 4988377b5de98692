//! Static vocabulary types.
//!
//! These types describe the PBConf vocabulary (classes, properties and named
//! individuals of each namespace) as typed Rust data. They are the seed from
//! which a knowledge base is built; the logical model that a knowledge base
//! stores lives in [`crate::axiom`]. The top-level entry point is
//! [`Ontology::bootstrap()`](crate::Ontology::bootstrap).

/// The named sub-stores of a knowledge base.
///
/// - `Core`: the device vocabulary, read-only at runtime
/// - `Config`: committed device configuration
/// - `PartialConfig`: scratch overlay used to stage a configuration request
/// - `Policy`: policy axioms and closed-world rule records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Scope {
    /// Device vocabulary.
    Core,
    /// Committed device configuration.
    Config,
    /// Staging overlay for configuration requests.
    PartialConfig,
    /// Policy axioms and closed-world rules.
    Policy,
}

impl Scope {
    /// Every scope, in the order closed-world searches visit them.
    pub const ALL: [Scope; 4] = [Scope::Core, Scope::Config, Scope::PartialConfig, Scope::Policy];

    /// Returns the scope name used in dumps and log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Core => "core",
            Scope::Config => "config",
            Scope::PartialConfig => "partial-config",
            Scope::Policy => "policy",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A PBConf namespace (e.g., `pbconf`, `config`, `policy`).
#[derive(Debug, Clone)]
pub struct Namespace {
    /// The prefix used in prefixed names (e.g., `"pbconf"`).
    pub prefix: &'static str,
    /// The namespace IRI, without the trailing `#`.
    pub iri: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description of the namespace.
    pub comment: &'static str,
    /// The knowledge-base scope the namespace's axioms are loaded into.
    pub scope: Scope,
    /// IRIs of imported namespaces.
    pub imports: &'static [&'static str],
}

/// An OWL class definition.
#[derive(Debug, Clone)]
pub struct Class {
    /// Full IRI (e.g., `"http://iti.illinois.edu/iti/pbconf/core#SEL421"`).
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
    /// Full IRIs of parent classes (`rdfs:subClassOf`).
    pub subclass_of: &'static [&'static str],
    /// Full IRIs of mutually exclusive classes (`owl:disjointWith`).
    pub disjoint_with: &'static [&'static str],
}

/// Whether a property is a datatype or object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `owl:DatatypeProperty`: relates an individual to a literal.
    Datatype,
    /// `owl:ObjectProperty`: relates two individuals.
    Object,
}

/// An OWL property definition.
#[derive(Debug, Clone)]
pub struct Property {
    /// Full IRI.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
    /// Datatype or object property.
    pub kind: PropertyKind,
    /// Whether this is also an `owl:FunctionalProperty`.
    pub functional: bool,
    /// Full IRI of the domain class, or `None` if unspecified.
    pub domain: Option<&'static str>,
    /// Full IRI of the range class or XSD datatype, or `None` if unspecified.
    pub range: Option<&'static str>,
}

/// A value in a named individual's property assertion.
#[derive(Debug, Clone)]
pub enum IndividualValue {
    /// A plain string literal.
    Str(&'static str),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// An IRI reference to another individual.
    IriRef(&'static str),
}

/// A named individual (OWL `owl:NamedIndividual`).
#[derive(Debug, Clone)]
pub struct Individual {
    /// Full IRI.
    pub id: &'static str,
    /// Full IRIs of the classes this individual is asserted to be a member of.
    pub types: &'static [&'static str],
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
    /// Property assertions: pairs of (property IRI, value).
    pub properties: &'static [(&'static str, IndividualValue)],
}

/// A complete namespace module: namespace metadata + classes + properties + individuals.
#[derive(Debug, Clone)]
pub struct NamespaceModule {
    /// Namespace metadata.
    pub namespace: Namespace,
    /// All OWL classes defined in this namespace.
    pub classes: Vec<Class>,
    /// All OWL properties defined in this namespace.
    pub properties: Vec<Property>,
    /// All named individuals declared in this namespace.
    pub individuals: Vec<Individual>,
}

/// The complete PBConf vocabulary.
#[derive(Debug)]
pub struct Ontology {
    /// Vocabulary version (e.g., `"1.0.0"`).
    pub version: &'static str,
    /// Base IRI shared by all namespaces.
    pub base_iri: &'static str,
    /// All namespace modules, core first.
    pub namespaces: Vec<NamespaceModule>,
}

impl Ontology {
    /// Looks up a class by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn find_class(&self, iri: &str) -> Option<&Class> {
        self.namespaces
            .iter()
            .flat_map(|m| m.classes.iter())
            .find(|c| c.id == iri)
    }

    /// Looks up a property by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn find_property(&self, iri: &str) -> Option<&Property> {
        self.namespaces
            .iter()
            .flat_map(|m| m.properties.iter())
            .find(|p| p.id == iri)
    }

    /// Looks up a named individual by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn find_individual(&self, iri: &str) -> Option<&Individual> {
        self.namespaces
            .iter()
            .flat_map(|m| m.individuals.iter())
            .find(|i| i.id == iri)
    }

    /// Looks up a namespace module by prefix.
    #[must_use]
    pub fn find_namespace(&self, prefix: &str) -> Option<&NamespaceModule> {
        self.namespaces
            .iter()
            .find(|m| m.namespace.prefix == prefix)
    }

    /// Returns the total number of classes across all namespaces.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.namespaces.iter().map(|m| m.classes.len()).sum()
    }

    /// Returns the total number of properties across all namespaces.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.namespaces.iter().map(|m| m.properties.len()).sum()
    }

    /// Returns the total number of named individuals across all namespaces.
    #[must_use]
    pub fn individual_count(&self) -> usize {
        self.namespaces.iter().map(|m| m.individuals.len()).sum()
    }
}

/// Standard IRI constants used across all namespace modules.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// PBConf base IRI.
    pub const PBCONF: &str = "http://iti.illinois.edu/iti/pbconf/";

    // Namespace IRIs
    /// Core device vocabulary.
    pub const NS_CORE: &str = "http://iti.illinois.edu/iti/pbconf/core";
    /// Committed configuration.
    pub const NS_CONFIG: &str = "http://iti.illinois.edu/iti/pbconf/config";
    /// Staged (partial) configuration.
    pub const NS_PARTIAL_CONFIG: &str = "http://iti.illinois.edu/iti/pbconf/partialconfig";
    /// Policy and closed-world rules.
    pub const NS_POLICY: &str = "http://iti.illinois.edu/iti/pbconf/policy";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
}
