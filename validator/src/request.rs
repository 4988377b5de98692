//! Request documents.
//!
//! A request is one line of input: either a JSON document naming its
//! `ontology` (`config` or `policy`) or a bare command (`validate`, `reset`,
//! `exit`).
//!
//! ```json
//! {"ontology": "config", "ontologizer": "SEL421", "individual": "test421a",
//!  "properties": [{"Op": "password", "Key": "password.level1", "Val": "abc"}]}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One configuration command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    /// The operation (`service_option`, `service`, `variable`, `password`,
    /// `type`).
    #[serde(rename = "Op")]
    pub op: String,
    /// The configuration key.
    #[serde(rename = "Key", default)]
    pub key: String,
    /// The value.
    #[serde(rename = "Val", default, deserialize_with = "text")]
    pub val: String,
    /// The service a `service_option` applies to.
    #[serde(rename = "Svc", default)]
    pub svc: String,
}

/// A device configuration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    /// The device family (`SEL421`, `LINUX`).
    pub ontologizer: String,
    /// The device.
    pub individual: String,
    /// The commands, applied in order.
    #[serde(default)]
    pub properties: Vec<ConfigProperty>,
}

/// One `(s, p, o)` policy statement of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAxiom {
    /// Subject; empty means the group's class.
    #[serde(default)]
    pub s: String,
    /// Predicate.
    pub p: String,
    /// Object.
    #[serde(default, deserialize_with = "text")]
    pub o: String,
}

/// Policy statements about one class (or individual, or property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyGroup {
    /// The statements' target.
    #[serde(rename = "Class")]
    pub class: String,
    /// The statements.
    #[serde(rename = "Axioms", default)]
    pub axioms: Vec<PolicyAxiom>,
}

/// A complete policy set. It replaces the stored policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRequest {
    /// Groups of policy groups, applied in order.
    #[serde(default)]
    pub data: Vec<Vec<PolicyGroup>>,
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Configure a device.
    Config(ConfigRequest),
    /// Replace the policy.
    Policy(PolicyRequest),
    /// Validate the stored state.
    Validate,
    /// Clear configuration and policy.
    Reset,
    /// End the session.
    Exit,
    /// A request the engine cannot act on, with the reason.
    Invalid(String),
}

impl Request {
    /// Parses one request line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Ok(document) = serde_json::from_str::<Value>(line) {
            if document.is_object() {
                return Self::from_document(document);
            }
        }
        let command = line.split_whitespace().next().unwrap_or_default();
        if command.eq_ignore_ascii_case("validate") {
            Request::Validate
        } else if command.eq_ignore_ascii_case("reset") {
            Request::Reset
        } else if command == "exit" || command == "close" {
            Request::Exit
        } else {
            Request::Invalid("Invalid command".to_owned())
        }
    }

    /// Interprets a JSON document by its `ontology` field.
    #[must_use]
    pub fn from_document(document: Value) -> Self {
        let ontology = document
            .get("ontology")
            .and_then(Value::as_str)
            .map(str::to_ascii_lowercase);
        let parsed = match ontology.as_deref() {
            Some("config") => serde_json::from_value(document).map(Request::Config),
            Some("policy") => serde_json::from_value(document).map(Request::Policy),
            _ => return Request::Invalid("Invalid Ontology Choice".to_owned()),
        };
        parsed.unwrap_or_else(|err| Request::Invalid(format!("Malformed request : {err}")))
    }
}

/// Accepts strings, numbers and booleans for text fields.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_documents() {
        let line = r#"{"ontology":"Config","ontologizer":"SEL421","individual":"test421a",
            "properties":[{"Op":"variable","Key":"telnetPort","Val":23}]}"#;
        let Request::Config(request) = Request::parse(line) else {
            unreachable!("expected a config request");
        };
        assert_eq!(request.individual, "test421a");
        assert_eq!(request.properties[0].val, "23");
        assert_eq!(request.properties[0].svc, "");
    }

    #[test]
    fn policy_documents() {
        let line = r#"{"ontology":"policy","data":[[{"Class":"SEL421",
            "Axioms":[{"s":"","p":"requires","o":"hasLvl1Pwd"}]}]]}"#;
        let Request::Policy(request) = Request::parse(line) else {
            unreachable!("expected a policy request");
        };
        assert_eq!(request.data[0][0].class, "SEL421");
        assert_eq!(request.data[0][0].axioms[0].p, "requires");
    }

    #[test]
    fn commands() {
        assert_eq!(Request::parse("VALIDATE"), Request::Validate);
        assert_eq!(Request::parse(" reset now"), Request::Reset);
        assert_eq!(Request::parse("exit"), Request::Exit);
        assert_eq!(
            Request::parse("dance"),
            Request::Invalid("Invalid command".to_owned())
        );
    }

    #[test]
    fn unknown_ontology() {
        assert_eq!(
            Request::parse(r#"{"ontology":"firmware"}"#),
            Request::Invalid("Invalid Ontology Choice".to_owned())
        );
        assert!(matches!(
            Request::parse(r#"{"ontology":"config"}"#),
            Request::Invalid(reason) if reason.starts_with("Malformed request")
        ));
    }
}
