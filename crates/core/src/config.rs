//! Patch configuration: import preamble and substitution rules

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CoreError;

/// A pattern/replacement pair applied to the bindings file
///
/// The pattern is a regular expression compiled in multiline mode, so `^`
/// and `$` anchor to line boundaries rather than the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionRule {
    /// Regular expression to match
    pub pattern: String,
    /// Literal replacement text
    pub replacement: String,
    /// Fail the run if the pattern matches nothing
    #[serde(default)]
    pub required: bool,
}

/// Configuration for one patch run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatchConfig {
    /// Lines prepended to the bindings file, in order
    #[serde(default)]
    pub preamble: Vec<String>,
    /// Substitution rules applied in order after the prepend
    #[serde(default, rename = "rule")]
    pub rules: Vec<SubstitutionRule>,
}

impl PatchConfig {
    /// Built-in configuration adapting wasm-bindgen web output for Node
    ///
    /// Supplies a fetch polyfill and disarms the `instanceof Window` check
    /// the generated glue performs on return values.
    pub fn node_fetch() -> Self {
        Self {
            preamble: vec![
                "import fetch from 'node-fetch';".to_string(),
                "globalThis.fetch = fetch;".to_string(),
            ],
            rules: vec![SubstitutionRule {
                pattern: r"getObject\(arg0\) instanceof Window;".to_string(),
                replacement: "true; // patched".to_string(),
                required: false,
            }],
        }
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|e| CoreError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&text).map_err(|e| CoreError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Check the line-count invariant: preamble lines and replacements may
    /// not embed newlines, and patterns may not match across line
    /// boundaries (a rule that consumed a newline would merge lines).
    fn validate(&self, path: &Path) -> Result<(), CoreError> {
        for line in &self.preamble {
            if line.contains('\n') {
                return Err(CoreError::Config {
                    path: path.display().to_string(),
                    message: format!("preamble line contains a newline: {:?}", line),
                });
            }
        }
        for rule in &self.rules {
            if rule.pattern.contains('\n')
                || rule.pattern.contains('\r')
                || rule.pattern.contains("\\n")
                || rule.pattern.contains("\\r")
            {
                return Err(CoreError::Config {
                    path: path.display().to_string(),
                    message: format!(
                        "pattern may not match across line boundaries: {:?}",
                        rule.pattern
                    ),
                });
            }
            if rule.replacement.contains('\n') {
                return Err(CoreError::Config {
                    path: path.display().to_string(),
                    message: format!("replacement contains a newline: {:?}", rule.replacement),
                });
            }
        }
        Ok(())
    }
}
