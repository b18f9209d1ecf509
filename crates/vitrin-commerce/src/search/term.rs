//! Search term normalization.
//!
//! User input is untrusted: it is trimmed, lower-cased with Turkish casing
//! rules, and stripped down to letters, digits, whitespace and hyphens
//! before it goes anywhere near a query.
//!
//! The content store only lower-cases field text before `match`; it does
//! not fold diacritics or apply Turkish casing. All spelling variants are
//! therefore produced on the term side. Folding is one-directional: a term
//! typed with diacritics also finds text written without them, but a term
//! typed without them (`canta`) does not find `Çanta`.

use crate::error::CommerceError;

/// Longest normalized term we will search for, in characters.
pub const MAX_TERM_CHARS: usize = 100;

/// A normalized search term.
///
/// Constructed per request and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    normalized: String,
    lowered: String,
    folded: String,
}

impl SearchTerm {
    /// Normalize raw user input.
    ///
    /// Returns [`CommerceError::EmptyQuery`] when nothing searchable is
    /// left; callers short-circuit with an empty result set.
    pub fn parse(raw: &str) -> Result<Self, CommerceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommerceError::EmptyQuery);
        }

        let normalized = sanitize(&turkish_lowercase(trimmed));
        if normalized.is_empty() {
            return Err(CommerceError::EmptyQuery);
        }
        let lowered = sanitize(&store_lowercase(trimmed));
        let folded = fold_diacritics(&normalized);

        Ok(Self {
            raw: raw.to_string(),
            normalized,
            lowered,
            folded,
        })
    }

    /// The input as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased, sanitized term (diacritics kept).
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Sanitized term lower-cased the way the content store lower-cases
    /// field text (`I` becomes `i`, not `ı`).
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Normalized term with diacritics folded to ASCII.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Word-prefix pattern for the normalized term: `bez* çanta*`.
    pub fn pattern(&self) -> String {
        prefix_pattern(&self.normalized)
    }

    /// Word-prefix pattern for the store-lowered term.
    pub fn lowered_pattern(&self) -> String {
        prefix_pattern(&self.lowered)
    }

    /// Word-prefix pattern for the folded term: `bez* canta*`.
    pub fn folded_pattern(&self) -> String {
        prefix_pattern(&self.folded)
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

/// Keep permitted characters, collapse whitespace, cap the length.
fn sanitize(lowered: &str) -> String {
    let kept: String = lowered.chars().filter(|c| is_permitted(*c)).collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TERM_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn prefix_pattern(term: &str) -> String {
    term.split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Characters allowed to survive sanitization.
pub fn is_permitted(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace() || c == '-'
}

/// Lower-case with Turkish dotted/dotless I rules.
pub fn turkish_lowercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Lower-case the way the content store's `lower()` does: no Turkish
/// casing, and `İ` maps to a plain `i`.
pub fn store_lowercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Fold Turkish (and a few common Latin) diacritics to ASCII.
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            'â' | 'á' | 'à' | 'ä' => 'a',
            'î' | 'í' | 'ì' | 'ï' => 'i',
            'û' | 'ú' | 'ù' => 'u',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'ó' | 'ò' | 'ô' => 'o',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Split field text into lower-cased word tokens, the way the content
/// store tokenizes a field for `match`.
pub fn searchable_tokens(text: &str) -> Vec<String> {
    store_lowercase(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether every word of `pattern` prefixes some token of `text`.
///
/// Only `text` is lower-cased. The pattern is compared as given, so
/// `canta*` does not match `Çanta`.
pub fn prefix_matches(pattern: &str, text: &str) -> bool {
    let tokens = searchable_tokens(text);
    let words: Vec<&str> = pattern
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    !words.is_empty()
        && words
            .iter()
            .all(|word| tokens.iter().any(|token| token.starts_with(word)))
}
