//! Repair heuristics for known OCR corruption patterns.
//!
//! Each heuristic is a pure transform with a strict precondition, so it
//! never fires on unambiguous data. The chain runs in a fixed order,
//! once per record, with no fixpoint iteration; a heuristic inspects
//! only its own field and never reacts to another heuristic's edit.
//! When no safe repair exists the value is left alone and the record is
//! flagged; guessing a label is worse than admitting corruption.

use tracing::debug;

use casewise_config::{SectionConfig, Vocabulary};
use casewise_model::{HierarchyRecord, RecordFlag};

/// Collapses an exact self-concatenation, at character level
/// ("ABCABC" -> "ABC") or word level ("DOM WHSKY DOM WHSKY" ->
/// "DOM WHSKY", the printed form separating the copies with a space).
/// Returns `None` when the label is not an exact duplication.
pub fn collapse_duplicated_label(label: &str) -> Option<String> {
    let half = label.len() / 2;
    if label.len() % 2 == 0
        && half > 0
        && label.is_char_boundary(half)
        && label[..half] == label[half..]
    {
        return Some(label[..half].to_string());
    }

    let words: Vec<&str> = label.split_whitespace().collect();
    if words.len() >= 2 && words.len() % 2 == 0 {
        let mid = words.len() / 2;
        if words[..mid] == words[mid..] {
            return Some(words[..mid].join(" "));
        }
    }
    None
}

/// Whether a label shows a duplication symptom (a word immediately
/// repeated) without being an exact self-concatenation. Such labels are
/// left untouched and flagged for review.
fn has_unrepaired_duplication(label: &str) -> bool {
    label
        .split_whitespace()
        .zip(label.split_whitespace().skip(1))
        .any(|(a, b)| a == b)
}

/// Strips exactly one configured stray trailing token (e.g. an
/// aggregate-row marker OCR merged onto a brand name). Whole-token
/// match only; partial suffixes never strip.
pub fn strip_stray_suffix(label: &str, stray_suffixes: &[String]) -> Option<String> {
    for suffix in stray_suffixes {
        if let Some(rest) = label.strip_suffix(suffix.as_str()) {
            let trimmed = rest.trim_end();
            // The suffix must be a separate trailing token, not the
            // whole label and not the tail of a longer word.
            if !trimmed.is_empty() && trimmed.len() < rest.len() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Applies the repair chain to one record, in fixed order:
/// duplicated-label collapse, stray-suffix strip, truncation flag,
/// negative-value nulling.
pub fn repair_record(
    record: &mut HierarchyRecord,
    section: &SectionConfig,
    vocabulary: &Vocabulary,
) {
    // 1. Duplicated labels, brand then class.
    if let Some(fixed) = collapse_duplicated_label(&record.brand) {
        debug!(brand = %record.brand, "collapsed duplicated brand label");
        record.brand = fixed;
    } else if has_unrepaired_duplication(&record.brand) {
        record.flags.push(RecordFlag::UnrepairedDuplication {
            field: "brand".to_string(),
        });
    }
    if let Some(class) = &record.class {
        if let Some(fixed) = collapse_duplicated_label(class) {
            debug!(class = %class, "collapsed duplicated class label");
            record.class = Some(fixed);
        } else if has_unrepaired_duplication(class) {
            record.flags.push(RecordFlag::UnrepairedDuplication {
                field: "class".to_string(),
            });
        }
    }

    // 2. Stray trailing tokens merged onto the brand.
    if let Some(fixed) = strip_stray_suffix(&record.brand, &section.stray_suffixes) {
        debug!(brand = %record.brand, "stripped stray suffix from brand");
        record.brand = fixed;
    }

    // 3. Truncated class names: flag, never complete.
    if let Some(class) = &record.class {
        if vocabulary.is_strict_prefix(class) {
            record.flags.push(RecordFlag::Truncated {
                field: "class".to_string(),
            });
        }
    }

    // 4. Negative values in non-negative columns become null.
    for column in &section.non_negative_columns {
        if let Some(slot) = record.metrics.get_mut(column) {
            if slot.is_some_and(|v| v < 0.0) {
                *slot = None;
                record.flags.push(RecordFlag::NegativeValueCleared {
                    column: column.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casewise_model::Metrics;

    fn section() -> SectionConfig {
        let toml = r#"
label_bound = { column = "label", x_min = 0.04, x_max = 0.17 }
metric_columns = ["l12m_this_year", "delta_pct"]
non_negative_columns = ["l12m_this_year"]
stray_suffixes = ["TOTAL VENDOR"]
detail_bounds = [
    { column = "l12m_this_year", x_min = 0.370, x_max = 0.420 },
    { column = "delta_pct", x_min = 0.420, x_max = 0.470 },
]
total_bounds = [
    { column = "l12m_this_year", x_min = 0.370, x_max = 0.445 },
    { column = "delta_pct", x_min = 0.445, x_max = 0.470 },
]
"#;
        toml::from_str(toml).unwrap()
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec![
            "DOM WHSKY-STRT-BRBN/TN".to_string(),
            "VODKA-CLASSIC-DOM".to_string(),
        ])
    }

    fn record(brand: &str, class: Option<&str>) -> HierarchyRecord {
        HierarchyRecord {
            vendor: "ACME DIST".to_string(),
            brand: brand.to_string(),
            class: class.map(str::to_string),
            metrics: Metrics::new(),
            source_rows: vec![0],
            flags: Vec::new(),
        }
    }

    #[test]
    fn exact_char_duplication_collapses() {
        assert_eq!(collapse_duplicated_label("ABCABC").as_deref(), Some("ABC"));
    }

    #[test]
    fn exact_word_duplication_collapses() {
        assert_eq!(
            collapse_duplicated_label("DOM WHSKY-STRT DOM WHSKY-STRT").as_deref(),
            Some("DOM WHSKY-STRT")
        );
    }

    #[test]
    fn near_duplication_is_left_untouched() {
        assert_eq!(collapse_duplicated_label("ABCABD"), None);
        assert_eq!(collapse_duplicated_label("DOM DOM WHSKY"), None);
        assert_eq!(collapse_duplicated_label("ABC"), None);
        assert_eq!(collapse_duplicated_label(""), None);
    }

    #[test]
    fn duplication_collapse_is_idempotent() {
        let once = collapse_duplicated_label("VODKAVODKA").unwrap();
        assert_eq!(once, "VODKA");
        // Applying again is a no-op on the repaired value.
        assert_eq!(collapse_duplicated_label(&once), None);
    }

    #[test]
    fn partial_duplication_is_flagged_not_repaired() {
        let mut rec = record("FOO", Some("DOM DOM WHSKY"));
        repair_record(&mut rec, &section(), &vocabulary());
        assert_eq!(rec.class.as_deref(), Some("DOM DOM WHSKY"));
        assert!(rec.flags.contains(&RecordFlag::UnrepairedDuplication {
            field: "class".to_string()
        }));
    }

    #[test]
    fn stray_suffix_is_stripped_whole_token_only() {
        let strays = vec!["TOTAL VENDOR".to_string()];
        assert_eq!(
            strip_stray_suffix("WASTELAND JCE TOTAL VENDOR", &strays).as_deref(),
            Some("WASTELAND JCE")
        );
        // The whole label being the stray token is a different defect;
        // stripping would leave an empty brand.
        assert_eq!(strip_stray_suffix("TOTAL VENDOR", &strays), None);
        // Tail of a longer word does not count.
        assert_eq!(strip_stray_suffix("CAPITOTAL VENDOR", &strays), None);
        assert_eq!(strip_stray_suffix("PLAIN BRAND", &strays), None);
    }

    #[test]
    fn truncated_class_is_flagged_value_unchanged() {
        let mut rec = record("FOO", Some("DOM WHSKY-STRT"));
        repair_record(&mut rec, &section(), &vocabulary());
        assert_eq!(rec.class.as_deref(), Some("DOM WHSKY-STRT"));
        assert!(rec.flags.contains(&RecordFlag::Truncated {
            field: "class".to_string()
        }));
    }

    #[test]
    fn exact_vocabulary_match_is_never_flagged_truncated() {
        let mut rec = record("FOO", Some("VODKA-CLASSIC-DOM"));
        repair_record(&mut rec, &section(), &vocabulary());
        assert!(rec.flags.is_empty());
    }

    #[test]
    fn negative_value_in_non_negative_column_is_nulled_and_flagged() {
        let mut rec = record("FOO", None);
        rec.metrics.insert("l12m_this_year".to_string(), Some(-42.0));
        rec.metrics.insert("delta_pct".to_string(), Some(-3.5));
        repair_record(&mut rec, &section(), &vocabulary());
        assert_eq!(rec.metrics["l12m_this_year"], None);
        // Columns without a non-negative domain pass through.
        assert_eq!(rec.metrics["delta_pct"], Some(-3.5));
        assert_eq!(
            rec.flags,
            vec![RecordFlag::NegativeValueCleared {
                column: "l12m_this_year".to_string()
            }]
        );
    }

    #[test]
    fn non_negative_and_missing_values_pass_through() {
        let mut rec = record("FOO", None);
        rec.metrics.insert("l12m_this_year".to_string(), Some(0.0));
        repair_record(&mut rec, &section(), &vocabulary());
        assert_eq!(rec.metrics["l12m_this_year"], Some(0.0));
        assert!(rec.flags.is_empty());

        let mut rec = record("BAR", None);
        rec.metrics.insert("l12m_this_year".to_string(), None);
        repair_record(&mut rec, &section(), &vocabulary());
        assert_eq!(rec.metrics["l12m_this_year"], None);
        assert!(rec.flags.is_empty());
    }
}
