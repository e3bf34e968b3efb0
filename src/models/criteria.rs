//! Search criteria for catalogue queries.

use serde::{Deserialize, Serialize};

/// Hard cap on the number of records the remote API returns per request
pub const MAX_PAGE_SIZE: usize = 50;

/// Collection the open textbook catalogue lives in
pub const DEFAULT_COLLECTION_ID: &str = "7567d816-90cc-4547-af7a-3dbd43277639";

/// Detail sections requested for each record unless told otherwise
pub const DEFAULT_INFO: [&str; 5] = ["basic", "metadata", "detail", "attachment", "drm"];

/// Which field(s) the search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Both subject classification levels
    Subject,
    /// The keywords field, matched in title and lower case
    Keyword,
    /// The contributing institution
    Contributor,
    /// No filter; the term, if any, is a free-text query
    #[default]
    All,
}

/// Result ordering understood by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Modified,
    Relevance,
}

impl SortOrder {
    /// Value of the `order` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Modified => "modified",
            SortOrder::Relevance => "relevance",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single catalogue query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Field selection for the filter clause
    pub mode: SearchMode,

    /// Subject, keyword, institution or free text, depending on `mode`
    pub term: String,

    /// Collection UUID scoping the search
    pub collection_id: String,

    /// Requested records per page; 0 means "as many as allowed"
    pub page_size: usize,

    /// Ordering used when no term is given
    pub sort_order: SortOrder,

    /// Detail sections to request for each record
    pub info: Vec<String>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            mode: SearchMode::All,
            term: String::new(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            page_size: MAX_PAGE_SIZE,
            sort_order: SortOrder::Modified,
            info: DEFAULT_INFO.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SearchCriteria {
    /// Every record in the collection, most recently modified first
    pub fn all() -> Self {
        Self::default()
    }

    /// Free-text search across the collection
    pub fn text(term: impl Into<String>) -> Self {
        Self::new(SearchMode::All, term)
    }

    /// Records classified under `subject` at either level
    pub fn subject(subject: impl Into<String>) -> Self {
        Self::new(SearchMode::Subject, subject)
    }

    /// Records tagged with `keyword`
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::new(SearchMode::Keyword, keyword)
    }

    /// Records contributed by `institution`
    pub fn contributor(institution: impl Into<String>) -> Self {
        Self::new(SearchMode::Contributor, institution)
    }

    /// Create criteria for an arbitrary mode
    pub fn new(mode: SearchMode, term: impl Into<String>) -> Self {
        Self {
            mode,
            term: term.into(),
            ..Default::default()
        }
    }

    /// Set the requested page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the collection to search
    pub fn collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = id.into();
        self
    }

    /// Set the ordering used for term-less searches
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Replace the requested detail sections
    pub fn info<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.info = sections.into_iter().map(Into::into).collect();
        self
    }

    /// The search term with surrounding whitespace removed
    pub fn trimmed_term(&self) -> &str {
        self.term.trim()
    }

    /// Page size actually sent to the API.
    ///
    /// Zero and anything above the cap are clamped to [`MAX_PAGE_SIZE`].
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Ordering actually sent to the API: a term always sorts by relevance
    pub fn resolved_order(&self) -> SortOrder {
        if self.trimmed_term().is_empty() {
            self.sort_order
        } else {
            SortOrder::Relevance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria() {
        let criteria = SearchCriteria::all();
        assert_eq!(criteria.mode, SearchMode::All);
        assert_eq!(criteria.collection_id, DEFAULT_COLLECTION_ID);
        assert_eq!(criteria.info.join(","), "basic,metadata,detail,attachment,drm");
        assert_eq!(criteria.effective_page_size(), 50);
    }

    #[test]
    fn test_empty_term_sorts_by_modified() {
        assert_eq!(SearchCriteria::all().resolved_order(), SortOrder::Modified);
        assert_eq!(
            SearchCriteria::text("   ").resolved_order(),
            SortOrder::Modified
        );
    }

    #[test]
    fn test_term_sorts_by_relevance() {
        for criteria in [
            SearchCriteria::text("chemistry"),
            SearchCriteria::subject("Biology"),
            SearchCriteria::keyword("calculus"),
            SearchCriteria::contributor("BCcampus"),
        ] {
            assert_eq!(criteria.resolved_order(), SortOrder::Relevance);
        }
    }

    #[test]
    fn test_term_overrides_explicit_order() {
        let criteria = SearchCriteria::keyword("physics").sort_order(SortOrder::Modified);
        assert_eq!(criteria.resolved_order(), SortOrder::Relevance);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(SearchCriteria::all().page_size(0).effective_page_size(), 50);
        assert_eq!(SearchCriteria::all().page_size(500).effective_page_size(), 50);
        assert_eq!(SearchCriteria::all().page_size(20).effective_page_size(), 20);
        assert_eq!(SearchCriteria::all().page_size(50).effective_page_size(), 50);
    }

    #[test]
    fn test_builder_setters() {
        let criteria = SearchCriteria::subject("History")
            .collection_id("abc")
            .info(["basic", "drm"]);
        assert_eq!(criteria.mode, SearchMode::Subject);
        assert_eq!(criteria.term, "History");
        assert_eq!(criteria.collection_id, "abc");
        assert_eq!(criteria.info, vec!["basic".to_string(), "drm".to_string()]);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&SearchMode::Contributor).unwrap();
        assert_eq!(json, "\"contributor\"");
        let mode: SearchMode = serde_json::from_str("\"keyword\"").unwrap();
        assert_eq!(mode, SearchMode::Keyword);
    }
}
