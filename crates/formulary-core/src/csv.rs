//! # Product Catalog CSV Codec
//!
//! Import/export format for the product catalog.
//!
//! ## Dialect
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CSV Dialect                                      │
//! │                                                                         │
//! │  name,description,category                 ← header, `name` required   │
//! │  Ureia 10%,Hidratante,Dermatológicos                                   │
//! │  "Loção, capilar","Contains ""quotes""",   ← quoting, doubled quotes   │
//! │                                                                         │
//! │  • Header columns matched case-insensitively, order-independent        │
//! │  • Quoted fields may contain commas, quotes and line breaks            │
//! │  • Export rows are CRLF-terminated (spreadsheet friendly)              │
//! │  • Blank lines are ignored on import                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dedup against the existing catalog is NOT done here; the importer in the
//! app crate owns that rule. This module is a pure codec.

use crate::error::CsvError;
use crate::types::Product;

/// One decoded catalog row, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvProduct {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Splits raw CSV text into records of fields.
///
/// Handles quoted fields (commas, CR/LF and doubled quotes inside) and both
/// LF and CRLF line endings.
fn split_records(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // A doubled quote is an escaped quote; anything else
                    // closes the field.
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                // Swallow the LF of a CRLF pair; bare CR also ends the row.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line });
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // Drop blank lines (a record with a single empty field).
    records.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));

    Ok(records)
}

/// Parses product CSV text into rows.
///
/// The header row must contain a `name` column; `description` and
/// `category` are optional. Unknown columns are ignored.
pub fn parse_products_csv(text: &str) -> Result<Vec<CsvProduct>, CsvError> {
    let records = split_records(text)?;

    let mut iter = records.into_iter();
    let header = iter.next().ok_or(CsvError::Empty)?;

    let position = |wanted: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };

    let name_idx = position("name").ok_or(CsvError::MissingNameColumn)?;
    let description_idx = position("description");
    let category_idx = position("category");

    let field = |record: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let rows = iter
        .map(|record| {
            let category = field(&record, category_idx);
            CsvProduct {
                name: field(&record, Some(name_idx)),
                description: field(&record, description_idx),
                category: (!category.is_empty()).then_some(category),
            }
        })
        .collect();

    Ok(rows)
}

// =============================================================================
// Formatting
// =============================================================================

/// Quotes a field when it contains a comma, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Formats the catalog as CSV with a `name,description,category` header.
/// Rows are CRLF-separated.
pub fn format_products_csv(products: &[Product]) -> String {
    let mut rows = Vec::with_capacity(products.len() + 1);
    rows.push("name,description,category".to_string());

    for p in products {
        rows.push(format!(
            "{},{},{}",
            escape_field(&p.name),
            escape_field(&p.description),
            escape_field(p.category.as_deref().unwrap_or(""))
        ));
    }

    rows.join("\r\n")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rows() {
        let text = "name,description,category\nUreia 10%,Hidratante,Derma\nMelatonina,,\n";
        let rows = parse_products_csv(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ureia 10%");
        assert_eq!(rows[0].category.as_deref(), Some("Derma"));
        assert_eq!(rows[1].name, "Melatonina");
        assert_eq!(rows[1].description, "");
        assert_eq!(rows[1].category, None);
    }

    #[test]
    fn parses_quoted_fields_with_commas_and_doubled_quotes() {
        let text = "name,description\r\n\"Loção, capilar\",\"diz \"\"forte\"\"\"\r\n";
        let rows = parse_products_csv(text).unwrap();

        assert_eq!(rows[0].name, "Loção, capilar");
        assert_eq!(rows[0].description, "diz \"forte\"");
    }

    #[test]
    fn parses_quoted_newline_inside_field() {
        let text = "name,description\n\"Base\",\"linha um\nlinha dois\"\n";
        let rows = parse_products_csv(text).unwrap();

        assert_eq!(rows[0].description, "linha um\nlinha dois");
    }

    #[test]
    fn header_columns_match_any_order_and_case() {
        let text = "Category,NAME\nDerma,Ureia\n";
        let rows = parse_products_csv(text).unwrap();

        assert_eq!(rows[0].name, "Ureia");
        assert_eq!(rows[0].category.as_deref(), Some("Derma"));
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let text = "description,category\nfoo,bar\n";
        assert_eq!(parse_products_csv(text), Err(CsvError::MissingNameColumn));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_products_csv(""), Err(CsvError::Empty));
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let text = "name\n\"never closed\n";
        assert!(matches!(
            parse_products_csv(text),
            Err(CsvError::UnterminatedQuote { .. })
        ));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let text = "name\n\nUreia\n\n";
        let rows = parse_products_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn format_escapes_only_when_needed() {
        let products = vec![
            Product {
                id: "1".to_string(),
                name: "Ureia 10%".to_string(),
                description: "plain".to_string(),
                category: None,
            },
            Product {
                id: "2".to_string(),
                name: "Loção, capilar".to_string(),
                description: "diz \"forte\"".to_string(),
                category: Some("Derma".to_string()),
            },
        ];

        let csv = format_products_csv(&products);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "name,description,category");
        assert_eq!(lines[1], "Ureia 10%,plain,");
        assert_eq!(lines[2], "\"Loção, capilar\",\"diz \"\"forte\"\"\",Derma");
    }

    #[test]
    fn format_then_parse_round_trips() {
        let products = vec![Product {
            id: "1".to_string(),
            name: "Loção, \"x\"".to_string(),
            description: "a\nb".to_string(),
            category: Some("c".to_string()),
        }];

        let rows = parse_products_csv(&format_products_csv(&products)).unwrap();
        assert_eq!(rows[0].name, "Loção, \"x\"");
        assert_eq!(rows[0].description, "a\nb");
        assert_eq!(rows[0].category.as_deref(), Some("c"));
    }
}
