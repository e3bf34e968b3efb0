//! Utility modules supporting catalogue queries.
//!
//! - [`HttpClient`]: shared reqwest client with a per-request timeout
//! - [`list_to_csv`] / [`field_to_csv`]: comma-separated rendering of values and record fields
//! - [`render_table`], [`render_plain`], [`render_json`]: terminal output of results
//!
//! # Listing names from records
//!
//! ```rust
//! use textbook_catalogue::models::Record;
//! use textbook_catalogue::utils::field_to_csv;
//!
//! let records: Vec<Record> = serde_json::from_str(
//!     r#"[{"name": "Jane Doe[jdoe]"}, {"name": "Sam Lee"}]"#,
//! ).unwrap();
//! assert_eq!(field_to_csv(&records, "name"), "Jane Doe, Sam Lee");
//! ```

mod display;
mod http;
mod text;

pub use display::{
    render_json, render_plain, render_table, summary, truncate_with_ellipsis, TITLE_WIDTH,
};
pub use http::{default_user_agent, HttpClient, DEFAULT_TIMEOUT};
pub use text::{field_to_csv, list_to_csv};
