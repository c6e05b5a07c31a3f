//! Section content → block conversion.
//!
//! Every function here is total: content that does not fit a shape falls
//! back to a coarser block and leaves an [`ImportWarning`] behind.

use serde_json::{Map, Value};

use super::ImportWarning;
use super::policy::Shape;
use crate::block::{Block, FaqEntry, Reference};

/// Convert one section's content following the shapes its heading accepts.
///
/// Returns `None` only when a reference list yields no valid entry.
pub fn convert_section(
    heading: &str,
    shapes: &[Shape],
    content: &Value,
    warnings: &mut Vec<ImportWarning>,
) -> Option<Block> {
    for shape in shapes {
        match (shape, content) {
            (Shape::Text, Value::String(text)) => return Some(Block::markdown(text.as_str())),
            (Shape::List, Value::Array(items)) => {
                return Some(convert_bullets(heading, items, warnings));
            }
            (Shape::FaqList, Value::Array(items)) => {
                if let Some(entries) = faq_entries(items) {
                    return Some(Block::FaqList(entries));
                }
            }
            (Shape::ReferenceList, Value::Array(items)) => {
                return convert_references(heading, items, warnings);
            }
            _ => {}
        }
    }

    if !shapes.is_empty() {
        warnings.push(ImportWarning::ShapeMismatch {
            heading: heading.to_owned(),
            found: kind_name(content),
        });
    }
    Some(convert_default(heading, content, warnings))
}

/// Fallback conversion used for unknown headings and mismatched content.
pub fn convert_default(heading: &str, content: &Value, warnings: &mut Vec<ImportWarning>) -> Block {
    match content {
        Value::Array(items) => convert_bullets(heading, items, warnings),
        Value::String(text) => Block::markdown(text.as_str()),
        Value::Object(map) => Block::rich_text(key_value_lines(map, false)),
        other => Block::rich_text(stringify(other)),
    }
}

// ============================================================================
// Bullets
// ============================================================================

/// Convert a list of items into bullet points.
///
/// | Items                   | Bullet                         |
/// |-------------------------|--------------------------------|
/// | all strings (or empty)  | the string                     |
/// | all single-key objects  | the sole value                 |
/// | all multi-key objects   | `Key: value` lines             |
/// | anything else           | one `RichText` of all items    |
pub fn convert_bullets(heading: &str, items: &[Value], warnings: &mut Vec<ImportWarning>) -> Block {
    if items.iter().all(Value::is_string) {
        return Block::BulletPoints(items.iter().map(stringify).collect());
    }

    let objects: Option<Vec<&Map<String, Value>>> = items.iter().map(Value::as_object).collect();
    if let Some(objects) = objects {
        if objects.iter().all(|obj| obj.len() == 1) {
            let bullets = objects
                .iter()
                .filter_map(|obj| obj.values().next())
                .map(stringify)
                .collect();
            return Block::BulletPoints(bullets);
        }
        if objects.iter().all(|obj| obj.len() > 1) {
            let bullets = objects
                .iter()
                .map(|obj| key_value_lines(obj, true))
                .collect();
            return Block::BulletPoints(bullets);
        }
    }

    warnings.push(ImportWarning::MixedList {
        heading: heading.to_owned(),
    });
    let joined: Vec<String> = items.iter().map(stringify).collect();
    Block::rich_text(joined.join("\n"))
}

// ============================================================================
// FAQs
// ============================================================================

/// Entries of a FAQ list, or `None` if any element lacks `question`/`answer`.
fn faq_entries(items: &[Value]) -> Option<Vec<FaqEntry>> {
    items
        .iter()
        .map(|item| {
            let obj = item.as_object()?;
            let question = obj.get("question")?;
            let answer = obj.get("answer")?;
            Some(FaqEntry {
                question: stringify(question),
                answer: stringify(answer),
            })
        })
        .collect()
}

// ============================================================================
// References
// ============================================================================

fn convert_references(
    heading: &str,
    items: &[Value],
    warnings: &mut Vec<ImportWarning>,
) -> Option<Block> {
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match parse_reference(item) {
            Ok(reference) => entries.push(reference),
            Err(reason) => warnings.push(ImportWarning::InvalidReference {
                heading: heading.to_owned(),
                index,
                reason,
            }),
        }
    }

    if entries.is_empty() {
        warnings.push(ImportWarning::NoValidReferences {
            heading: heading.to_owned(),
        });
        return None;
    }
    Some(Block::ReferenceList(entries))
}

/// Parse one reference entry, applying field defaults.
fn parse_reference(item: &Value) -> Result<Reference, String> {
    let Some(obj) = item.as_object() else {
        return Err(format!("expected an object, found {}", kind_name(item)));
    };

    let number = obj
        .get("reference_number")
        .and_then(reference_number)
        .ok_or("'reference_number' must be a non-zero integer")?;

    let title = obj.get("title").map(stringify).unwrap_or_default();
    if title.trim().is_empty() {
        return Err(format!("reference {number} has no title"));
    }

    // Null and blank strings count as missing.
    let field = |key: &str, default: &str| {
        obj.get(key)
            .filter(|v| !v.is_null() && v.as_str().is_none_or(|s| !s.trim().is_empty()))
            .map_or_else(|| default.to_owned(), stringify)
    };

    Ok(Reference {
        number,
        authors: field("authors", "Unknown"),
        year: field("year", "Unknown"),
        title,
        journal: field("journal_source", "N/A"),
        url_or_doi: field("url_doi", ""),
    })
}

/// Accept a positive integer or an integer-valued string.
fn reference_number(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (number != 0).then_some(number)
}

// ============================================================================
// Helpers
// ============================================================================

/// Text form of a JSON value: strings as-is, everything else as JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Short name of a JSON value's type, for warnings.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// `key: value` lines joined by `\n`, optionally capitalizing each key.
fn key_value_lines(map: &Map<String, Value>, capitalize_keys: bool) -> String {
    let lines: Vec<String> = map
        .iter()
        .map(|(key, value)| {
            let key = if capitalize_keys {
                capitalize(key)
            } else {
                key.clone()
            };
            format!("{key}: {}", stringify(value))
        })
        .collect();
    lines.join("\n")
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bullets(content: Value) -> (Block, Vec<ImportWarning>) {
        let mut warnings = Vec::new();
        let Value::Array(items) = content else {
            panic!("test input must be a list");
        };
        let block = convert_bullets("Symptoms", &items, &mut warnings);
        (block, warnings)
    }

    #[test]
    fn test_bullets_from_strings() {
        let (block, warnings) = bullets(json!(["Fever", "Cough"]));
        assert_eq!(block, Block::BulletPoints(vec!["Fever".into(), "Cough".into()]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_list_is_empty_bullets() {
        let (block, warnings) = bullets(json!([]));
        assert_eq!(block, Block::BulletPoints(vec![]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bullets_from_single_key_objects() {
        let (block, _) = bullets(json!([{"name": "Fever"}, {"other": 3}]));
        assert_eq!(block, Block::BulletPoints(vec!["Fever".into(), "3".into()]));
    }

    #[test]
    fn test_bullets_from_multi_key_objects() {
        let (block, _) = bullets(json!([{"a": 1, "B": 2}]));
        assert_eq!(block, Block::BulletPoints(vec!["A: 1\nB: 2".into()]));

        let (block, _) = bullets(json!([{"risk FACTOR": "age", "note": "x"}]));
        assert_eq!(
            block,
            Block::BulletPoints(vec!["Risk factor: age\nNote: x".into()])
        );
    }

    #[test]
    fn test_mixed_list_falls_back_to_rich_text() {
        let (block, warnings) = bullets(json!(["a", {"k": "v"}, 3]));
        assert_eq!(block, Block::rich_text("a\n{\"k\":\"v\"}\n3"));
        assert!(matches!(warnings[0], ImportWarning::MixedList { .. }));
    }

    #[test]
    fn test_mixed_object_sizes_fall_back() {
        let (block, warnings) = bullets(json!([{"a": 1}, {"a": 1, "b": 2}]));
        assert!(matches!(block, Block::RichText(_)));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_default_conversion() {
        let mut warnings = Vec::new();
        assert_eq!(
            convert_default("X", &json!("**bold**"), &mut warnings),
            Block::markdown("**bold**")
        );
        assert_eq!(
            convert_default("X", &json!({"Onset": "sudden", "Days": 3}), &mut warnings),
            Block::rich_text("Onset: sudden\nDays: 3")
        );
        assert_eq!(
            convert_default("X", &json!(42), &mut warnings),
            Block::rich_text("42")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_faq_shape() {
        let mut warnings = Vec::new();
        let content = json!([{"question": "Q?", "answer": "A."}]);
        let block = convert_section("FAQs", &[Shape::FaqList], &content, &mut warnings);
        assert_eq!(
            block,
            Some(Block::FaqList(vec![FaqEntry {
                question: "Q?".into(),
                answer: "A.".into()
            }]))
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_faq_shape_mismatch_uses_default() {
        let mut warnings = Vec::new();
        let content = json!(["What is it?", "How to treat?"]);
        let block = convert_section("FAQs", &[Shape::FaqList], &content, &mut warnings);
        assert_eq!(
            block,
            Some(Block::BulletPoints(vec![
                "What is it?".into(),
                "How to treat?".into()
            ]))
        );
        assert!(matches!(
            warnings[0],
            ImportWarning::ShapeMismatch { found: "list", .. }
        ));
    }

    #[test]
    fn test_reference_blank_fields_default() {
        let mut warnings = Vec::new();
        let content = json!([
            {"reference_number": 4, "title": "D", "authors": "", "year": " ", "journal_source": "", "url_doi": ""},
        ]);
        let block = convert_section("References", &[Shape::ReferenceList], &content, &mut warnings);

        let Some(Block::ReferenceList(entries)) = block else {
            panic!("expected a reference list");
        };
        assert_eq!(entries[0].authors, "Unknown");
        assert_eq!(entries[0].year, "Unknown");
        assert_eq!(entries[0].journal, "N/A");
        assert_eq!(entries[0].url_or_doi, "");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_references_filter_and_default() {
        let mut warnings = Vec::new();
        let content = json!([
            {"reference_number": 1, "title": "A"},
            {"reference_number": 2},
            "not an object",
            {"reference_number": "3", "title": "C", "journal_source": "Lancet", "year": 2021},
            {"reference_number": 0, "title": "Zero"},
        ]);
        let block = convert_section("References", &[Shape::ReferenceList], &content, &mut warnings);

        let Some(Block::ReferenceList(entries)) = block else {
            panic!("expected a reference list");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].number, 1);
        assert_eq!(entries[0].authors, "Unknown");
        assert_eq!(entries[0].year, "Unknown");
        assert_eq!(entries[0].journal, "N/A");
        assert_eq!(entries[0].url_or_doi, "");
        assert_eq!(entries[1].number, 3);
        assert_eq!(entries[1].year, "2021");
        assert_eq!(entries[1].journal, "Lancet");

        let skipped: Vec<usize> = warnings
            .iter()
            .filter_map(|w| match w {
                ImportWarning::InvalidReference { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![1, 2, 4]);
    }

    #[test]
    fn test_references_all_invalid_yield_no_block() {
        let mut warnings = Vec::new();
        let content = json!([{"title": "no number"}]);
        let block = convert_section("References", &[Shape::ReferenceList], &content, &mut warnings);
        assert_eq!(block, None);
        assert!(matches!(
            warnings.last(),
            Some(ImportWarning::NoValidReferences { .. })
        ));
    }

    #[test]
    fn test_reference_number_forms() {
        assert_eq!(reference_number(&json!(7)), Some(7));
        assert_eq!(reference_number(&json!(7.0)), Some(7));
        assert_eq!(reference_number(&json!(" 12 ")), Some(12));
        assert_eq!(reference_number(&json!(7.5)), None);
        assert_eq!(reference_number(&json!(-1)), None);
        assert_eq!(reference_number(&json!("")), None);
        assert_eq!(reference_number(&json!(0)), None);
        assert_eq!(reference_number(&json!(null)), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("é"), "É");
    }
}
