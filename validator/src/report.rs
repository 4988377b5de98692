//! Validation outcomes and their explanations.
//!
//! Every engine operation that judges a request returns an [`Outcome`]: a
//! [`Status`] plus a human-readable explanation. Closed-world failures carry a
//! structured [`Explanation`] whose JSON form is the explanation text.

use std::fmt;

use pbconf_ontology::AnnotatedAxiom;
use serde::Serialize;
use thiserror::Error;

use crate::resolve::RuleKind;

/// Whether a request was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The request was accepted and committed.
    Valid,
    /// The request was rejected and rolled back.
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Valid => "VALID",
            Status::Invalid => "INVALID",
        })
    }
}

/// Which check rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The request could not be parsed or translated.
    Structural,
    /// The knowledge base became inconsistent.
    Consistency,
    /// A closed-world rule failed.
    ClosedWorld,
}

/// The verdict on one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Accepted or rejected.
    pub status: Status,
    /// The check that rejected the request, if any.
    #[serde(skip)]
    pub rejection: Option<Rejection>,
    /// Why the request was rejected; empty when it was accepted.
    pub explanation: String,
}

impl Outcome {
    /// An accepted request.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            status: Status::Valid,
            rejection: None,
            explanation: String::new(),
        }
    }

    /// A request rejected before it reached the knowledge base.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::rejected(Rejection::Structural, message.into())
    }

    /// A request that made the knowledge base inconsistent.
    pub fn consistency(explanation: impl Into<String>) -> Self {
        Self::rejected(Rejection::Consistency, explanation.into())
    }

    /// A request that failed a closed-world rule.
    #[must_use]
    pub fn closed_world(explanation: &Explanation) -> Self {
        Self::rejected(Rejection::ClosedWorld, explanation.to_string())
    }

    fn rejected(rejection: Rejection, explanation: String) -> Self {
        Self {
            status: Status::Invalid,
            rejection: Some(rejection),
            explanation,
        }
    }

    /// Whether the request was accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == Status::Valid
    }
}

/// A statement that could not be turned into knowledge-base changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StructuralError(pub String);

impl StructuralError {
    /// Creates a structural error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<StructuralError> for Outcome {
    fn from(err: StructuralError) -> Self {
        Outcome::structural(err.0)
    }
}

/// Why a closed-world rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// The kind of the failing rule.
    pub failed_validator: RuleKind,
    /// One entry per offending individual.
    pub failures: Vec<Failure>,
}

/// One offending individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Full IRI of the individual.
    pub individual: String,
    /// The property that is missing or present, for must-have rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// The assertion that broke a restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axiom: Option<String>,
    /// Why the assertion broke the restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Renders an inconsistency justification for a person.
///
/// The comments annotating the justifying axioms are listed one per line.
/// When none of them carries a comment, the axioms themselves are listed.
#[must_use]
pub fn friendly_explanation(axioms: &[AnnotatedAxiom]) -> String {
    if axioms.is_empty() {
        return "The ontology is consistent. Nothing to explain.".to_owned();
    }
    let comments: Vec<&str> = axioms.iter().filter_map(|a| a.comment.as_deref()).collect();
    if comments.is_empty() {
        let mut out =
            String::from("Sorry, I don't have a friendly explanation. The best I can do is:\n");
        for axiom in axioms {
            out.push_str(&axiom.to_string());
            out.push('\n');
        }
        return out;
    }
    let mut out = String::new();
    for comment in comments {
        out.push_str(comment);
        out.push('\n');
    }
    out
}

/// Renders every justification, numbered from 1.
#[must_use]
pub fn friendly_explanations(justifications: &[Vec<AnnotatedAxiom>]) -> String {
    let mut out = String::new();
    for (i, axioms) in justifications.iter().enumerate() {
        out.push_str(&format!(
            "Explanation {} -------------------------------------\n",
            i + 1
        ));
        out.push_str(&friendly_explanation(axioms));
    }
    out
}

/// The verdict on one request of a batch, with a label naming the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    /// Label of the request (e.g., `line 3`).
    pub label: String,
    /// The verdict.
    pub outcome: Outcome,
}

/// A collection of verdicts from a batch run.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// All verdicts in request order.
    pub results: Vec<RequestResult>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a verdict.
    pub fn push(&mut self, label: impl Into<String>, outcome: Outcome) {
        self.results.push(RequestResult {
            label: label.into(),
            outcome,
        });
    }

    /// Returns the number of rejected requests.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.outcome.is_valid()).count()
    }

    /// Returns `true` if every request was accepted.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}
