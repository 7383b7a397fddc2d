//! bindfix-core: Core logic for bindfix
//!
//! This crate provides the configuration, patch computation, and apply
//! functionality for adapting generated WebAssembly bindings to a
//! non-browser host runtime.

mod config;
mod error;
mod patch;

pub use config::{PatchConfig, SubstitutionRule};
pub use error::CoreError;
pub use patch::{
    PatchOutcome, RuleOutcome, RunOptions, apply_rule, compute_patch, prepend_preamble, run,
};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
