//! Core data models for catalogue queries and their results.

mod criteria;
mod result;

pub use criteria::{
    SearchCriteria, SearchMode, SortOrder, DEFAULT_COLLECTION_ID, DEFAULT_INFO, MAX_PAGE_SIZE,
};
pub use result::{AggregatedResult, Record, ResultPage};
