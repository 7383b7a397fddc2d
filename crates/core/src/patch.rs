//! Patch computation and application

use regex::{NoExpand, RegexBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::{PatchConfig, SubstitutionRule};
use crate::error::CoreError;

/// The result of applying one substitution rule
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// The rule's pattern, for reporting
    pub pattern: String,
    /// Number of replacements made
    pub matches: usize,
}

/// The computed patch for a bindings file
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// The rewritten file content
    pub content: String,
    /// Number of preamble lines inserted
    pub preamble_lines: usize,
    /// Per-rule replacement counts, in rule order
    pub rules: Vec<RuleOutcome>,
}

impl PatchOutcome {
    /// Check if the patch changed anything
    pub fn has_changes(&self) -> bool {
        self.preamble_lines > 0 || self.rules.iter().any(|r| r.matches > 0)
    }

    /// Total number of substitutions across all rules
    pub fn total_matches(&self) -> usize {
        self.rules.iter().map(|r| r.matches).sum()
    }
}

/// Options for a patch run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Compute the patch but do not write the output file
    pub dry_run: bool,
    /// Treat every rule as required
    pub strict: bool,
}

/// Prepend the preamble lines, in order, above the existing content.
///
/// Each preamble line is terminated with `\n`; the original content follows
/// byte-for-byte.
pub fn prepend_preamble(content: &str, preamble: &[String]) -> String {
    if preamble.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(
        content.len() + preamble.iter().map(|l| l.len() + 1).sum::<usize>(),
    );
    for line in preamble {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(content);
    out
}

/// Apply a single substitution rule to the content.
///
/// Every occurrence of the pattern is replaced. Returns the rewritten
/// content and the number of replacements; zero matches is a no-op unless
/// the rule is required.
pub fn apply_rule(content: &str, rule: &SubstitutionRule) -> Result<(String, usize), CoreError> {
    let re = RegexBuilder::new(&rule.pattern).multi_line(true).build()?;

    let matches = re.find_iter(content).count();
    if matches == 0 {
        if rule.required {
            return Err(CoreError::PatternNotFound {
                pattern: rule.pattern.clone(),
            });
        }
        return Ok((content.to_string(), 0));
    }

    // NoExpand: replacements are literal text, never capture references
    let rewritten = re.replace_all(content, NoExpand(&rule.replacement));
    Ok((rewritten.into_owned(), matches))
}

/// Compute the full patch: prepend the preamble, then apply each rule in
/// order.
pub fn compute_patch(
    content: &str,
    config: &PatchConfig,
    options: &RunOptions,
) -> Result<PatchOutcome, CoreError> {
    let mut current = prepend_preamble(content, &config.preamble);
    let mut rules = Vec::with_capacity(config.rules.len());

    for rule in &config.rules {
        let effective = SubstitutionRule {
            required: rule.required || options.strict,
            ..rule.clone()
        };

        let (rewritten, matches) = apply_rule(&current, &effective)?;
        if matches == 0 {
            // An absent pattern usually means the generator's output changed
            // shape upstream; surface it rather than skipping silently.
            warn!("Pattern matched nothing: {}", rule.pattern);
        } else {
            debug!("Replaced {} occurrence(s) of: {}", matches, rule.pattern);
        }

        current = rewritten;
        rules.push(RuleOutcome {
            pattern: rule.pattern.clone(),
            matches,
        });
    }

    Ok(PatchOutcome {
        content: current,
        preamble_lines: config.preamble.len(),
        rules,
    })
}

/// Patch the bindings file at `input` and write the result to `output`.
///
/// `output` may equal `input` for an in-place rewrite. The result is written
/// to a temporary file in the output's directory and renamed into place, so
/// a crash mid-write never leaves a truncated bindings file.
pub fn run(
    input: &Path,
    output: &Path,
    config: &PatchConfig,
    options: &RunOptions,
) -> Result<PatchOutcome, CoreError> {
    info!("Patching {}", input.display());
    let content = fs::read_to_string(input)?;

    let outcome = compute_patch(&content, config, options)?;

    if options.dry_run {
        debug!("Dry run, skipping write to {}", output.display());
        return Ok(outcome);
    }

    write_atomic(output, &outcome.content)?;
    info!(
        "Wrote {} ({} preamble line(s), {} substitution(s))",
        output.display(),
        outcome.preamble_lines,
        outcome.total_matches()
    );

    Ok(outcome)
}

/// Write content via a temp file in the same directory, then rename.
fn write_atomic(path: &Path, content: &str) -> Result<(), CoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| CoreError::FileOperation {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
