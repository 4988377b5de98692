//! PBConf namespace modules.
//!
//! Each sub-module encodes one namespace of the PBConf vocabulary as Rust
//! static data. Modules are named after their prefix; see
//! [`crate::Ontology::bootstrap`] for the assembly order.

pub mod config;
pub mod pbconf;
pub mod policy;
