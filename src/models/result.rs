//! Response pages and the aggregated result handed back to callers.

use serde::{Deserialize, Serialize};

/// A single catalogue entry, passed through exactly as the API returned it
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One page of the remote search response.
///
/// All four fields are required; a body missing any of them is a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Total number of matching records on the server
    pub available: usize,

    /// Number of records in this page
    pub length: usize,

    /// Offset of the first record in this page
    pub start: usize,

    /// Records in this page, in server order
    pub results: Vec<Record>,
}

/// All records of a query, concatenated across pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Total reported by the first page
    pub total_available: usize,

    /// Records from every fetched page, in order
    pub records: Vec<Record>,
}

impl AggregatedResult {
    /// Start an aggregate from the first page of a response
    pub fn from_first_page(page: ResultPage) -> Self {
        Self {
            total_available: page.available,
            records: page.results,
        }
    }

    /// Append the records of a later page
    pub fn extend(&mut self, page: ResultPage) {
        self.records.extend(page.results);
    }

    /// Number of records collected
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the server reported more records than were collected
    pub fn has_more(&self) -> bool {
        self.records.len() < self.total_available
    }
}
