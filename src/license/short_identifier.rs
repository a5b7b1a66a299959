//! Fuzzy resolution of informal license spellings to canonical SPDX short
//! identifiers.
//!
//! The lookup table is generated from the canonical registry rather than
//! hand-enumerated: every canonical identifier contributes its uppercase
//! form plus a family of morphological variants (suffix-stripped, trailing
//! `.0` groups dropped, version-adjoining hyphens removed, all hyphens
//! removed, derived initialisms). Literal-name variants always win over
//! derived initialisms, and suffixed identifiers (`-only`/`-or-later`) are
//! processed after their bare counterparts so they take priority for
//! identical informal keys.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::license::ids::{is_canonical, SPDX_LICENSE_IDS};

struct TableEntry {
    canonical: &'static str,
    /// Whether the key came from a literal name variant rather than a
    /// derived initialism.
    literal: bool,
}

static LOOKUP_TABLE: OnceLock<HashMap<String, TableEntry>> = OnceLock::new();

/// Resolves an arbitrary license string to its canonical SPDX short
/// identifier.
///
/// Exact canonical spellings resolve immediately; everything else goes
/// through the generated informal-name table, first verbatim (uppercased),
/// then with version-adjoining hyphens removed. Ambiguous or unregistered
/// names yield `None` rather than guessing.
pub fn short_identifier(name: &str) -> Option<&'static str> {
    if is_canonical(name) {
        return SPDX_LICENSE_IDS.iter().copied().find(|id| *id == name);
    }
    let table = LOOKUP_TABLE.get_or_init(build_table);
    let upper = name.to_uppercase();
    if let Some(entry) = table.get(&upper) {
        return Some(entry.canonical);
    }
    table
        .get(&remove_version_hyphens(&upper))
        .map(|entry| entry.canonical)
}

fn build_table() -> HashMap<String, TableEntry> {
    let mut ids: Vec<&'static str> = SPDX_LICENSE_IDS.to_vec();
    // Lexicographic order makes suffixed identifiers override bare ones
    // that share an informal key.
    ids.sort_unstable();

    let mut table = HashMap::new();
    for id in ids {
        insert(&mut table, id.to_uppercase(), id, true);

        let upper = id.to_uppercase();
        let base = if let Some(stripped) = upper.strip_suffix("-ONLY") {
            stripped.to_string()
        } else if let Some(stripped) = upper.strip_suffix("-OR-LATER") {
            // The or-later family keeps its historical `+` marker.
            format!("{stripped}+")
        } else {
            upper
        };
        register_variants(&mut table, &base, id, true);

        if let Some(initialism) = initialism(id) {
            register_variants(&mut table, &initialism.to_uppercase(), id, false);
        }
    }
    table
}

/// Registers every morphological variant of `base`: the form itself, the
/// form with version-adjoining hyphens removed, the form with all hyphens
/// removed, then the same three again for each successively shorter
/// trailing-`.0`-stripped form until none remain.
fn register_variants(
    table: &mut HashMap<String, TableEntry>,
    base: &str,
    canonical: &'static str,
    literal: bool,
) {
    let mut form = base.to_string();
    loop {
        insert(table, form.clone(), canonical, literal);
        insert(table, remove_version_hyphens(&form), canonical, literal);
        insert(table, form.replace('-', ""), canonical, literal);
        match strip_trailing_zero(&form) {
            Some(shorter) => form = shorter,
            None => break,
        }
    }
}

fn insert(table: &mut HashMap<String, TableEntry>, key: String, canonical: &'static str, literal: bool) {
    if let Some(existing) = table.get(&key) {
        // A literal name never gives way to a less-specific initialism.
        if existing.literal && !literal && existing.canonical != canonical {
            return;
        }
        let literal = literal || existing.literal;
        table.insert(key, TableEntry { canonical, literal });
        return;
    }
    table.insert(key, TableEntry { canonical, literal });
}

/// Removes hyphens that adjoin a digit on either side, e.g. `LGPL-2` to
/// `LGPL2` and `2.0-` to `2.0`.
fn remove_version_hyphens(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c == '-' {
            let prev_digit = i > 0 && bytes[i - 1].is_ascii_digit();
            let next_digit = i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit();
            if prev_digit || next_digit {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Strips one trailing `.0` version group, preserving a trailing `+`
/// marker: `LGPL-2.0+` to `LGPL-2+`, `2.0.0` to `2.0`.
fn strip_trailing_zero(s: &str) -> Option<String> {
    let (core, plus) = match s.strip_suffix('+') {
        Some(core) => (core, "+"),
        None => (s, ""),
    };
    core.strip_suffix(".0").map(|short| format!("{short}{plus}"))
}

/// Collapses a trailing run of two or more capitalized words into their
/// initials, e.g. `Foo-Digital-Assets` to `Foo-DA`. A trailing version
/// segment is preserved after the initials so that zero-stripping still
/// applies to the result. All-caps segments never collapse; an acronym is
/// already an initialism.
fn initialism(id: &str) -> Option<String> {
    let segments: Vec<&str> = id.split('-').collect();

    let mut end = segments.len();
    while end > 0 && is_version_segment(segments[end - 1]) {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && is_capitalized_word(segments[start - 1]) {
        start -= 1;
    }
    if end - start < 2 {
        return None;
    }

    let initials: String = segments[start..end]
        .iter()
        .filter_map(|word| word.chars().next())
        .collect();
    let mut parts: Vec<String> = segments[..start].iter().map(|s| s.to_string()).collect();
    parts.push(initials);
    parts.extend(segments[end..].iter().map(|s| s.to_string()));
    Some(parts.join("-"))
}

fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut rest_len = 0;
            for c in chars {
                if !c.is_ascii_lowercase() {
                    return false;
                }
                rest_len += 1;
            }
            rest_len > 0
        }
        _ => false,
    }
}

fn is_version_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit() || c == '.')
}
