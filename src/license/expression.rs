//! Builds SPDX license expressions out of raw extractor-reported license
//! strings.

use std::collections::BTreeSet;

use crate::license::ids::is_canonical;

/// The literal SPDX no-assertion value.
pub const NO_ASSERTION: &str = "NOASSERTION";

/// Prefix for locally synthesized references to non-standard licenses.
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";

/// Placeholder tokens that void an entire license list (compared
/// case-insensitively).
const UNKNOWN_PLACEHOLDER: &str = "UNKNOWN";
const NON_STANDARD_PLACEHOLDER: &str = "NON-STANDARD";

/// The outcome of normalizing a license list: either a well-formed SPDX
/// expression or an explicit no-assertion. Modeled as a variant rather than
/// the `NOASSERTION` magic string so call sites cannot forget the empty
/// case; [`LicenseOutcome::as_spdx`] renders the wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseOutcome {
    Resolved(String),
    NoAssertion,
}

impl LicenseOutcome {
    pub fn as_spdx(&self) -> &str {
        match self {
            LicenseOutcome::Resolved(expression) => expression,
            LicenseOutcome::NoAssertion => NO_ASSERTION,
        }
    }
}

/// A normalized license expression plus the non-standard license texts it
/// references. `other_licenses` holds the verbatim input strings behind
/// every synthesized `LicenseRef-`; the SPDX exporter emits them as
/// extracted licensing info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseExpression {
    pub outcome: LicenseOutcome,
    pub other_licenses: BTreeSet<String>,
}

impl LicenseExpression {
    fn no_assertion() -> Self {
        Self {
            outcome: LicenseOutcome::NoAssertion,
            other_licenses: BTreeSet::new(),
        }
    }
}

/// Normalizes a list of raw license strings into one SPDX expression.
///
/// Total: never fails, for any input. Empty lists and lists of empty
/// strings produce a no-assertion. A single unknown/non-standard
/// placeholder anywhere voids the whole expression — deliberately
/// all-or-nothing, since a partial license assertion would overclaim; no
/// side-set can leak out of a voided list.
pub fn license_expression(raw_licenses: &[String]) -> LicenseExpression {
    let tokens = clean(raw_licenses);
    if tokens.is_empty() {
        return LicenseExpression::no_assertion();
    }
    if tokens.iter().any(|t| is_placeholder(t)) {
        return LicenseExpression::no_assertion();
    }

    let mut terms = BTreeSet::new();
    let mut other_licenses = BTreeSet::new();
    for token in &tokens {
        let normalized = token.replace(" or ", " OR ");
        let branches: Vec<&str> = normalized.split(" OR ").collect();
        if branches.len() > 1 {
            let resolved: Vec<String> = branches
                .iter()
                .map(|branch| resolve(branch, &mut other_licenses))
                .collect();
            terms.insert(format!("({})", resolved.join(" OR ")));
        } else {
            terms.insert(resolve(&normalized, &mut other_licenses));
        }
    }

    LicenseExpression {
        outcome: LicenseOutcome::Resolved(
            terms.into_iter().collect::<Vec<_>>().join(" AND "),
        ),
        other_licenses,
    }
}

/// Splits raw entries into atomic license tokens: empty entries dropped,
/// one pair of outer parentheses stripped, literal `" and "` uppercased,
/// then each entry split on `" AND "`.
fn clean(raw_licenses: &[String]) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw in raw_licenses {
        if raw.is_empty() {
            continue;
        }
        let mut entry = raw.as_str();
        if let Some(inner) = entry
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            entry = inner;
        }
        let entry = entry.replace(" and ", " AND ");
        for token in entry.split(" AND ") {
            if !token.is_empty() {
                tokens.push(token.to_string());
            }
        }
    }
    tokens
}

fn is_placeholder(token: &str) -> bool {
    token.eq_ignore_ascii_case(UNKNOWN_PLACEHOLDER)
        || token.eq_ignore_ascii_case(NON_STANDARD_PLACEHOLDER)
}

/// Resolves one atomic token: canonical SPDX identifiers pass through
/// verbatim, anything else becomes a `LicenseRef-` with its original text
/// recorded for the extracted-license table.
fn resolve(token: &str, other_licenses: &mut BTreeSet<String>) -> String {
    if is_canonical(token) {
        return token.to_string();
    }
    other_licenses.insert(token.to_string());
    format!("{}{}", LICENSE_REF_PREFIX, license_ref_suffix(token))
}

/// SPDX idstrings admit only letters, digits, `.` and `-`; every other
/// character becomes `-`.
fn license_ref_suffix(token: &str) -> String {
    token
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Renders the document-level reference identifier for a non-standard
/// license text.
pub fn license_ref_id(text: &str) -> String {
    format!("{}{}", LICENSE_REF_PREFIX, license_ref_suffix(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_list_is_no_assertion() {
        let result = license_expression(&[]);
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);
        assert_eq!(result.outcome.as_spdx(), "NOASSERTION");
        assert!(result.other_licenses.is_empty());
    }

    #[test]
    fn test_all_empty_strings_is_no_assertion() {
        let result = license_expression(&strings(&["", "", ""]));
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);
    }

    #[test]
    fn test_single_canonical_license() {
        let result = license_expression(&strings(&["MIT"]));
        assert_eq!(result.outcome, LicenseOutcome::Resolved("MIT".to_string()));
        assert!(result.other_licenses.is_empty());
    }

    #[test]
    fn test_poison_token_voids_everything() {
        let result = license_expression(&strings(&["UNKNOWN", "MIT"]));
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);
        assert!(result.other_licenses.is_empty());
    }

    #[test]
    fn test_poison_token_case_insensitive() {
        let result = license_expression(&strings(&["MIT", "unknown"]));
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);

        let result = license_expression(&strings(&["non-standard"]));
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);
    }

    #[test]
    fn test_poison_inside_compound_entry() {
        let result = license_expression(&strings(&["MIT AND UNKNOWN"]));
        assert_eq!(result.outcome, LicenseOutcome::NoAssertion);
    }

    #[test]
    fn test_or_branches_grouped() {
        let result = license_expression(&strings(&["MIT OR LGPL-2.0-only"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved("(MIT OR LGPL-2.0-only)".to_string())
        );
        assert!(result.other_licenses.is_empty());
    }

    #[test]
    fn test_lowercase_or_recognized() {
        let result = license_expression(&strings(&["MIT or Apache-2.0"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved("(MIT OR Apache-2.0)".to_string())
        );
    }

    #[test]
    fn test_non_standard_license_referenced() {
        let result = license_expression(&strings(&["MADE UP"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved("LicenseRef-MADE-UP".to_string())
        );
        assert_eq!(result.other_licenses.len(), 1);
        assert!(result.other_licenses.contains("MADE UP"));
    }

    #[test]
    fn test_terms_sorted_and_deduplicated() {
        let result = license_expression(&strings(&["MIT", "Apache-2.0", "MIT", "MADE UP"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved(
                "Apache-2.0 AND LicenseRef-MADE-UP AND MIT".to_string()
            )
        );
        assert_eq!(result.other_licenses.len(), 1);
    }

    #[test]
    fn test_outer_parentheses_stripped() {
        let result = license_expression(&strings(&["(MIT)"]));
        assert_eq!(result.outcome, LicenseOutcome::Resolved("MIT".to_string()));
    }

    #[test]
    fn test_lowercase_and_splits_entries() {
        let result = license_expression(&strings(&["MIT and Apache-2.0"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved("Apache-2.0 AND MIT".to_string())
        );
    }

    #[test]
    fn test_or_branch_with_non_standard_license() {
        let result = license_expression(&strings(&["MIT OR MADE UP"]));
        assert_eq!(
            result.outcome,
            LicenseOutcome::Resolved("(MIT OR LicenseRef-MADE-UP)".to_string())
        );
        assert!(result.other_licenses.contains("MADE UP"));
    }

    #[test]
    fn test_license_ref_id_sanitizes() {
        assert_eq!(license_ref_id("MADE UP"), "LicenseRef-MADE-UP");
        assert_eq!(license_ref_id("Foo (Bar)"), "LicenseRef-Foo--Bar-");
    }
}
