//! Rendering of aggregated results for terminal output.

use comfy_table::{Attribute, Cell, Table};

use crate::models::{AggregatedResult, Record};
use crate::utils::field_to_csv;

/// Maximum characters shown for a title in table output
pub const TITLE_WIDTH: usize = 60;

/// Truncate text to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept.trim_end())
}

/// String value at `key`, or an empty string
fn text_field<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

/// Comma-separated `key` values of the objects in the array at `field`
fn nested_csv(record: &Record, field: &str, key: &str) -> String {
    let nested: Vec<Record> = record
        .get(field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default();
    field_to_csv(&nested, key)
}

/// Date part of an ISO-8601 timestamp
fn date_only(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

/// Render records as a table with name, modification date, attachments and UUID.
///
/// `authors_key` selects which field of each attachment is listed.
pub fn render_table(result: &AggregatedResult, authors_key: &str) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Title", "Modified", "Attachments", "UUID"]);

    for record in &result.records {
        table.add_row(vec![
            Cell::new(truncate_with_ellipsis(text_field(record, "name"), TITLE_WIDTH))
                .add_attribute(Attribute::Bold),
            Cell::new(date_only(text_field(record, "modifiedDate"))),
            Cell::new(nested_csv(record, "attachments", authors_key)),
            Cell::new(text_field(record, "uuid")),
        ]);
    }

    format!("{table}\n{}", summary(result))
}

/// Render records one per line followed by a summary
pub fn render_plain(result: &AggregatedResult) -> String {
    let mut out = String::new();
    for record in &result.records {
        out.push_str(&format!(
            "{} ({})\n",
            text_field(record, "name"),
            text_field(record, "uuid")
        ));
        let description = text_field(record, "description");
        if !description.is_empty() {
            out.push_str(&format!("  {}\n", description));
        }
    }
    out.push_str(&summary(result));
    out
}

/// Render the whole result as pretty-printed JSON
pub fn render_json(result: &AggregatedResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// "Showing N of M records"
pub fn summary(result: &AggregatedResult) -> String {
    format!(
        "Showing {} of {} records",
        result.len(),
        result.total_available
    )
}
