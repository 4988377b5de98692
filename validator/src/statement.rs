//! Statements and their parsed form.

use pbconf_ontology::{Identifier, KnowledgeBase};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Classifications};
use crate::report::StructuralError;
use crate::resolve::{resolve_policy_kind, resolve_rule_kind, PolicyKind, RuleKind};
use crate::translate::translate;

/// A generic `(target, subject, predicate, object)` statement.
///
/// In the policy path the target is a class, individual or property and the
/// predicate is a comparison or presence keyword. In the configuration path
/// the target is a device, the subject a configuration key, the predicate an
/// operation and the object the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// What the statement is about.
    pub target: String,
    /// The property or entity being constrained; empty means the target.
    #[serde(default)]
    pub subject: String,
    /// The relation.
    pub predicate: String,
    /// The value.
    #[serde(default)]
    pub object: String,
    /// Service qualifier of a `service_option` configuration command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl Statement {
    /// Creates a statement without a service qualifier.
    pub fn new(
        target: impl Into<String>,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            service: None,
        }
    }
}

/// The type a statement's value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A whole number.
    Integer,
    /// An `on`/`off` status.
    Status,
    /// An IP address, kept as text.
    IpAddress,
    /// Anything else.
    String,
}

/// Decides the value type from the subject as written and the predicate.
#[must_use]
pub fn value_type(original_subject: &str, predicate: &str) -> ValueType {
    let length = matches!(predicate, "min-length" | "max-length");
    match original_subject {
        "" => {
            if length {
                ValueType::Integer
            } else {
                ValueType::String
            }
        }
        s if s.starts_with("password") => {
            if length {
                ValueType::Integer
            } else {
                ValueType::String
            }
        }
        "macAddr" => ValueType::String,
        "accessTimeout" | "telnetPort" | "telnetTimeout" => ValueType::Integer,
        "ntp" | "ftp" | "telnet" | "ping" | "dnp" | "dnp3" | "iec" => ValueType::Status,
        "ipAddr" | "routerIPAddr" => ValueType::IpAddress,
        _ => ValueType::String,
    }
}

/// A coerced statement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An integer.
    Integer(i64),
    /// The core `on` or `off` individual.
    Status(Identifier),
    /// Text (strings and IP addresses).
    Text(String),
}

/// Coerces `raw` to `value_type`.
///
/// # Errors
///
/// Returns a [`StructuralError`] when an integer value does not parse.
pub fn coerce<K: KnowledgeBase + ?Sized>(
    kb: &K,
    value_type: ValueType,
    raw: &str,
) -> Result<Value, StructuralError> {
    match value_type {
        ValueType::Integer => raw
            .trim()
            .parse()
            .map(Value::Integer)
            .map_err(|_| StructuralError::new(format!("Value is not an integer : {raw}"))),
        ValueType::Status => {
            let state = if raw.eq_ignore_ascii_case("on") { "on" } else { "off" };
            Ok(Value::Status(Identifier::new(kb.prefixes().core(), state)))
        }
        ValueType::IpAddress | ValueType::String => Ok(Value::Text(raw.to_owned())),
    }
}

/// A statement with every term classified and its value coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    /// The statement as received.
    pub original: Statement,
    /// Translated target.
    pub target: String,
    /// Translated subject, with an empty subject replaced by the target.
    pub subject: String,
    /// Predicate, unchanged.
    pub predicate: String,
    /// Translated object.
    pub object: String,
    /// What each term denotes.
    pub classifications: Classifications,
    /// How the statement is enforced.
    pub policy_kind: PolicyKind,
    /// The closed-world rule kind, for closed-world statements.
    pub rule_kind: Option<RuleKind>,
    /// The type the value was coerced to.
    pub value_type: ValueType,
    /// The coerced object.
    pub value: Value,
}

impl ParsedStatement {
    /// Translates, classifies and coerces a statement.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] when the value cannot be coerced.
    pub fn parse<K: KnowledgeBase + ?Sized>(
        kb: &K,
        statement: &Statement,
    ) -> Result<Self, StructuralError> {
        let original_subject = if statement.subject.is_empty() {
            statement.target.as_str()
        } else {
            statement.subject.as_str()
        };
        let target = translate(&statement.target).to_owned();
        let subject = translate(original_subject).to_owned();
        let object = translate(&statement.object).to_owned();

        let classifications = classify(kb, &target, &subject, &statement.predicate, &object);
        let mut policy_kind = resolve_policy_kind(&classifications);
        let rule_kind = match policy_kind {
            PolicyKind::ClosedWorld => {
                let kind = resolve_rule_kind(classifications.target, &statement.predicate);
                if kind.is_none() {
                    policy_kind = PolicyKind::Invalid;
                }
                kind
            }
            _ => None,
        };

        let value_type = value_type(&statement.subject, &statement.predicate);
        let value = coerce(kb, value_type, &statement.object)?;

        Ok(Self {
            original: statement.clone(),
            target,
            subject,
            predicate: statement.predicate.clone(),
            object,
            classifications,
            policy_kind,
            rule_kind,
            value_type,
            value,
        })
    }
}
