//! Metric cell parsing.
//!
//! OCR numeric cells arrive with thousands separators, stray glyphs, and
//! occasional parenthesized negatives. A cell that fails to parse becomes
//! `None`, never zero: a missing value and a zero value are distinct facts
//! in the source report and must stay distinct downstream.

/// OCR artifacts that look numeric but carry no value. Observed in the
/// wild as fragments of decimal tails and misread dashes.
const JUNK_TOKENS: &[&str] = &[".00", "00", "ON", "-", ""];

/// Parses a metric cell into a number.
///
/// Normalization before parsing: outer whitespace, thousands separators,
/// stray `:` and `%` glyphs are removed; `(1,234)` becomes `-1234`.
/// Returns `None` for junk tokens and anything that still fails to parse.
pub fn parse_metric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if JUNK_TOKENS.contains(&trimmed) {
        return None;
    }

    let mut cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | ':' | '%'))
        .collect();

    // Accounting-style negatives: (1234) -> -1234.
    let mut negative = false;
    if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() > 2 {
        negative = true;
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    if JUNK_TOKENS.contains(&cleaned.as_str()) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}
