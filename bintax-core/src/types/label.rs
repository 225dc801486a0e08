//! Taxonomic label predicates shared across the engine
//!
//! The placeholder pattern (`Insecta_X`, `Insecta_XX`, ...) marks a rank as
//! "unknown, inherited from ancestor". The filler, the consensus calculator
//! and the uniqueness validator all recognise placeholders through the same
//! predicate; the pattern must not be re-derived elsewhere.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches labels that end in an underscore followed by a run of `X`s
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_X+$").expect("valid regex"));

/// Prefix marking ranks deeper than the consensus could resolve
pub const UNRESOLVED_PREFIX: &str = "unresolved.";

/// Check whether a label is a placeholder derived from an ancestor label
pub fn is_placeholder(label: &str) -> bool {
    PLACEHOLDER_RE.is_match(label)
}

/// Derive the placeholder for the rank directly below `parent`
///
/// Starts a new chain (`Insecta` -> `Insecta_X`) or extends an existing one
/// (`Insecta_X` -> `Insecta_XX`).
pub fn extend_placeholder(parent: &str) -> String {
    if is_placeholder(parent) {
        format!("{}X", parent)
    } else {
        format!("{}_X", parent)
    }
}

/// Build the unresolved marker for ranks deeper than `last_known`
pub fn unresolved(last_known: &str) -> String {
    format!("{}{}", UNRESOLVED_PREFIX, last_known)
}

/// Check whether a label is an unresolved marker
pub fn is_unresolved(label: &str) -> bool {
    label.starts_with(UNRESOLVED_PREFIX)
}
