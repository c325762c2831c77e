// src/readers/headerreader.rs

//! Extraction of header metadata fields from a log source.
//!
//! Runs independently of the event timeline extraction, over the same
//! lines: for each configured [`HeaderRule`] every line containing the
//! key literal contributes one captured value, the trimmed remainder of
//! the line after the first occurrence of the key.
//!
//! Matching here is case-sensitive exact substring, distinct from the
//! case-insensitive keyword matcher; firmware variable names like
//! `g_meterId` are exact.
//!
//! [`HeaderRule`]: crate::data::header::HeaderRule

use crate::common::Count;
use crate::data::header::{HeaderField, HeaderFields, HeaderRules};
use crate::data::line::LogLines;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Extract every configured header field from `lines`.
///
/// Single pass. A key that never occurs is returned with an empty value
/// sequence, not omitted; the report prints every configured field.
pub fn header_fields_extract(
    lines: &LogLines,
    rules: &HeaderRules,
) -> HeaderFields {
    defn!("(lines[{}], rules[{}])", lines.len(), rules.len());

    let mut fields: HeaderFields = rules
        .iter()
        .map(|rule| HeaderField::new(rule.clone()))
        .collect();
    let mut count_values: Count = 0;
    for logline in lines.iter() {
        for field in fields.iter_mut() {
            if let Some(at) = logline.text().find(field.key()) {
                let value: &str = &logline.text()[at + field.key().len()..];
                field.push_value(String::from(value.trim()));
                count_values += 1;
            }
        }
    }
    defx!("captured {} values across {} fields", count_values, fields.len());

    fields
}
