//! Type-string and default-value normalization.
//!
//! Every dialect spells column types its own way (`VARCHAR(255)`,
//! `varchar`, `INT`). This module reduces raw type strings to a base
//! name plus an optional length qualifier, and canonicalizes default
//! expressions, so states built from different sources compare cleanly.

/// A length qualifier that could not be parsed out of a raw type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed length qualifier in type {raw:?}")]
pub struct LenParseError {
    /// The raw type string as reported by the source.
    pub raw: String,
}

/// Splits a raw SQL type string into its base type and length qualifier.
///
/// A string without parentheses is returned unchanged with length 0
/// (length 0 means "unspecified"). For `base(N)` the text between the
/// first `(` and the trailing `)` must parse as a non-negative integer.
///
/// Multi-argument qualifiers such as `decimal(10,2)` are not handled
/// and return an error rather than a guessed split.
///
/// # Errors
///
/// Returns [`LenParseError`] when the parenthesized content is not a
/// single non-negative integer or the closing paren is missing.
pub fn parse_type_len(raw: &str) -> Result<(String, u32), LenParseError> {
    let Some(paren) = raw.find('(') else {
        return Ok((raw.to_owned(), 0));
    };
    let len = raw[paren + 1..]
        .strip_suffix(')')
        .and_then(|inner| inner.parse::<u32>().ok())
        .ok_or_else(|| LenParseError {
            raw: raw.to_owned(),
        })?;
    Ok((raw[..paren].to_owned(), len))
}

/// Normalizes a default-value expression for comparison.
///
/// Single-quoted string literals are preserved verbatim (their case is
/// data); every other expression is lowercased so that keyword casing
/// differences between drivers (`CURRENT_TIMESTAMP` vs
/// `current_timestamp`) do not produce spurious diffs.
#[must_use]
pub fn normalize_default(expr: &str) -> String {
    if expr.starts_with('\'') && expr.ends_with('\'') && expr.len() >= 2 {
        expr.to_owned()
    } else {
        expr.to_lowercase()
    }
}
