//! Engine configuration.
//!
//! [`EngineConfig::default`] is the stock configuration; a JSON file with any
//! subset of the fields can override it. Unknown fields are rejected:
//!
//! ```json
//! {
//!   "policyPrefix": "policy",
//!   "testMode": true,
//!   "protectedNames": ["ClosedWorldReasoner"]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// The class and name prefix closed-world rules are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleNamespace {
    /// Local name of the class every rule individual belongs to.
    pub class: String,
    /// Prefix of generated rule names (`cwr` gives `cwr0`, `cwr1`, ...).
    pub prefix: String,
}

impl RuleNamespace {
    /// Creates a rule namespace.
    pub fn new(class: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            prefix: prefix.into(),
        }
    }

    /// `ClosedWorldReasoner` / `cwr`.
    #[must_use]
    pub fn standard() -> Self {
        Self::new("ClosedWorldReasoner", "cwr")
    }

    /// `TESTClosedWorldReasoner` / `tcwr`.
    #[must_use]
    pub fn test() -> Self {
        Self::new("TESTClosedWorldReasoner", "tcwr")
    }
}

/// Configuration of a [`PolicyEngine`](crate::PolicyEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Prefix of the policy namespace, where rule records live.
    pub policy_prefix: String,
    /// Rule namespace used in normal operation.
    pub closed_world: RuleNamespace,
    /// Rule namespace used in test mode.
    pub test_closed_world: RuleNamespace,
    /// Local names that survive a policy-set replacement.
    pub protected_names: Vec<String>,
    /// Store and evaluate rules under the test namespace.
    pub test_mode: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy_prefix: "policy".to_owned(),
            closed_world: RuleNamespace::standard(),
            test_closed_world: RuleNamespace::test(),
            protected_names: ["test421a", "test421b", "test421c"]
                .into_iter()
                .chain(["ClosedWorldReasoner", "TESTClosedWorldReasoner"])
                .map(str::to_owned)
                .collect(),
            test_mode: false,
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The rule namespace in effect.
    #[must_use]
    pub fn active_rules(&self) -> &RuleNamespace {
        if self.test_mode {
            &self.test_closed_world
        } else {
            &self.closed_world
        }
    }

    /// Whether `local_name` is protected from policy-set replacement.
    #[must_use]
    pub fn is_protected(&self, local_name: &str) -> bool {
        self.protected_names.iter().any(|n| n == local_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_standard_rules() {
        let config = EngineConfig::default();
        assert_eq!(config.active_rules(), &RuleNamespace::standard());
        assert!(config.is_protected("TESTClosedWorldReasoner"));
        assert!(!config.is_protected("cwr0"));
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = EngineConfig::from_json(r#"{"testMode": true}"#).unwrap();
        assert_eq!(config.active_rules().prefix, "tcwr");
        assert_eq!(config.policy_prefix, "policy");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_json(r#"{"corePrefix": "pbconf"}"#).unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::from_path("/nonexistent/pbconf.json").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn bad_json_is_a_json_error() {
        let err = EngineConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
