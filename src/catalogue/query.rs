//! Search URL construction.
//!
//! The remote API takes a free-text `q`, paging parameters and an optional
//! `where` filter clause written in its own query language, e.g.
//!
//! ```text
//! /xml/item/keywords is 'Biology' OR /xml/item/keywords is 'biology'
//! ```
//!
//! The filter clause is percent-encoded (`%20` for spaces) while `q` is
//! form-encoded (`+` for spaces).

use crate::models::{SearchCriteria, SearchMode};
use crate::utils::list_to_csv;

const SUBJECT_PATH_1: &str = "/xml/item/subject_class_level1";
const SUBJECT_PATH_2: &str = "/xml/item/subject_class_level2";
const CONTRIBUTOR_PATH: &str = "/xml/contributordetails/institution";
const KEYWORD_PATH: &str = "/xml/item/keywords";

const OPR_IS: &str = " is ";
const OPR_OR: &str = " OR ";

/// A fully resolved query that only lacks its paging window.
///
/// Built once per fetch so every page reuses the same filter clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    endpoint: String,
    query: Option<String>,
    collection: String,
    order: &'static str,
    filter: String,
    info: String,
}

impl SearchRequest {
    /// Resolve `criteria` against the API rooted at `base_url`
    pub fn new(base_url: &str, criteria: &SearchCriteria) -> Self {
        let term = criteria.trimmed_term();
        let query = (criteria.mode == SearchMode::All && !term.is_empty())
            .then(|| form_encode(term));

        let filter = filter_clause(criteria)
            .map(|clause| urlencoding::encode(&clause).into_owned())
            .unwrap_or_default();

        let info = criteria
            .info
            .iter()
            .map(|section| urlencoding::encode(section).into_owned())
            .collect::<Vec<_>>();

        Self {
            endpoint: format!("{}/search", base_url.trim_end_matches('/')),
            query,
            collection: urlencoding::encode(&criteria.collection_id).into_owned(),
            order: criteria.resolved_order().as_str(),
            filter,
            info: list_to_csv(&info),
        }
    }

    /// URL of the page starting at `start` holding up to `length` records
    pub fn url(&self, start: usize, length: usize) -> String {
        let query = self
            .query
            .as_deref()
            .map(|q| format!("q={}&", q))
            .unwrap_or_default();

        format!(
            "{}?{}collections={}&start={}&length={}&order={}&where={}&info={}",
            self.endpoint, query, self.collection, start, length, self.order, self.filter, self.info
        )
    }
}

/// URL for a single page of `criteria`
pub fn build_search_url(
    base_url: &str,
    criteria: &SearchCriteria,
    start: usize,
    length: usize,
) -> String {
    SearchRequest::new(base_url, criteria).url(start, length)
}

/// Unencoded filter clause for `criteria`, or `None` when no filter applies.
///
/// A filter mode with an empty term falls back to an unfiltered search.
pub fn filter_clause(criteria: &SearchCriteria) -> Option<String> {
    let term = criteria.trimmed_term();
    if term.is_empty() {
        return None;
    }

    let matches: Vec<(&str, String)> = match criteria.mode {
        SearchMode::All => return None,
        // The index is case sensitive, so match both common spellings.
        SearchMode::Keyword => vec![
            (KEYWORD_PATH, title_case(term)),
            (KEYWORD_PATH, term.to_lowercase()),
        ],
        SearchMode::Contributor => vec![(CONTRIBUTOR_PATH, term.to_string())],
        SearchMode::Subject => vec![
            (SUBJECT_PATH_1, term.to_string()),
            (SUBJECT_PATH_2, term.to_string()),
        ],
    };

    Some(
        matches
            .iter()
            .map(|(path, value)| format!("{}{}{}", path, OPR_IS, quote(value)))
            .collect::<Vec<_>>()
            .join(OPR_OR),
    )
}

/// Uppercase the first letter of every whitespace-separated word
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
