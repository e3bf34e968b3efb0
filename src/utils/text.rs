//! Comma-separated rendering of lists and record fields.

use crate::models::Record;

/// Join plain values with a bare comma.
///
/// No spaces are added, so the output can go straight into a URL.
pub fn list_to_csv<S: AsRef<str>>(values: &[S]) -> String {
    let joined = values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    joined.trim_end_matches([',', ' ']).to_string()
}

/// Join the string at `key` of every record with `", "`.
///
/// Names in the repository often carry a username suffix in brackets
/// (`"Jane Doe[jdoe]"`); the suffix is dropped. Records without a string
/// under `key` are skipped.
pub fn field_to_csv(records: &[Record], key: &str) -> String {
    let joined = records
        .iter()
        .filter_map(|record| record.get(key).and_then(|v| v.as_str()))
        .map(strip_username)
        .collect::<Vec<_>>()
        .join(", ");
    joined.trim_end_matches([',', ' ']).to_string()
}

fn strip_username(value: &str) -> &str {
    match value.find('[') {
        // A leading bracket is kept as-is; there is no name before it.
        Some(idx) if idx > 0 => value[..idx].trim_end(),
        _ => value,
    }
}
