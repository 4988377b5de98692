//! `config` and partial-config namespaces.
//!
//! Neither declares vocabulary: device individuals and their assertions are
//! written here by configuration requests. The partial-config namespace is the
//! staging overlay a request is validated in before it is merged into config.

use crate::model::iris::*;
use crate::model::{Namespace, NamespaceModule, Scope};

/// Returns the committed configuration namespace module.
#[must_use]
pub fn module() -> NamespaceModule {
    NamespaceModule {
        namespace: Namespace {
            prefix: "config",
            iri: NS_CONFIG,
            label: "PBConf Configuration",
            comment: "Committed device configuration.",
            scope: Scope::Config,
            imports: &[NS_CORE],
        },
        classes: vec![],
        properties: vec![],
        individuals: vec![],
    }
}

/// Returns the staging (partial configuration) namespace module.
#[must_use]
pub fn partial_module() -> NamespaceModule {
    NamespaceModule {
        namespace: Namespace {
            prefix: "partial",
            iri: NS_PARTIAL_CONFIG,
            label: "PBConf Partial Configuration",
            comment: "Configuration staged by a request that has not been validated yet.",
            scope: Scope::PartialConfig,
            imports: &[NS_CORE, NS_CONFIG],
        },
        classes: vec![],
        properties: vec![],
        individuals: vec![],
    }
}
