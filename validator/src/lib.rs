//! PBConf validation engine.
//!
//! `pbconf-validator` decides whether device configuration changes and policy
//! changes are acceptable. Each request is turned into description-logic
//! axioms over a [`KnowledgeBase`](pbconf_ontology::KnowledgeBase), checked for
//! open-world consistency, then checked against the closed-world rules kept in
//! the policy scope. A request that fails either check is rolled back and
//! reported with an explanation.
//!
//! # Entry Point
//!
//! ```
//! use pbconf_ontology::MemoryKnowledgeBase;
//! use pbconf_validator::{EngineConfig, PolicyEngine, Request, Status};
//!
//! let engine = PolicyEngine::new(MemoryKnowledgeBase::bootstrap(), EngineConfig::default());
//! let request = Request::parse(
//!     r#"{"ontology": "config", "ontologizer": "LINUX", "individual": "linuxa",
//!         "properties": [{"Op": "type", "Key": "", "Val": "LINUX"}]}"#,
//! );
//! let outcome = engine.handle(&request)?;
//! assert_eq!(outcome.status, Status::Valid);
//! assert!(engine.validate()?.is_valid());
//! # Ok::<(), pbconf_validator::EngineError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod classify;
pub mod closed_world;
pub mod compile;
pub mod config;
pub mod engine;
pub mod error;
pub mod expression;
pub mod ontologizer;
pub mod report;
pub mod request;
pub mod resolve;
pub mod statement;
pub mod translate;

pub use closed_world::{Comparator, Rule, RuleRecord, RuleStore};
pub use config::{EngineConfig, RuleNamespace};
pub use engine::PolicyEngine;
pub use error::{EngineError, Result};
pub use ontologizer::DeviceKind;
pub use report::{
    Explanation, Failure, Outcome, Rejection, RequestResult, Status, StructuralError,
    ValidationReport,
};
pub use request::{ConfigProperty, ConfigRequest, PolicyAxiom, PolicyGroup, PolicyRequest, Request};
pub use resolve::{PolicyKind, RuleKind};
pub use statement::{ParsedStatement, Statement};
