//! Serializers for the PBConf vocabulary and knowledge-base snapshots.
//!
//! - **JSON** ([`json`]): a vocabulary document and per-scope axiom dumps,
//!   used by `pbconf-validate --dump`

pub mod json;
