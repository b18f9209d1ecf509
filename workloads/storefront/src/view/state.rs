//! Search view states.

use vitrin_commerce::search::SearchResult;

/// Where the search view is in its request cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// Nothing typed yet.
    #[default]
    Idle,
    /// Waiting for input to settle.
    Debouncing { term: String },
    /// Request in flight.
    Loading { term: String },
    /// Results for `term`. Empty term means the prompt is shown.
    Success {
        term: String,
        results: Vec<SearchResult>,
    },
    /// The last request failed; `message` is safe to display.
    Error { term: String, message: String },
}

impl SearchState {
    /// The term this state belongs to.
    pub fn term(&self) -> &str {
        match self {
            SearchState::Idle => "",
            SearchState::Debouncing { term }
            | SearchState::Loading { term }
            | SearchState::Success { term, .. }
            | SearchState::Error { term, .. } => term,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SearchState::Debouncing { .. } | SearchState::Loading { .. }
        )
    }

    /// Results, when settled successfully.
    pub fn results(&self) -> Option<&[SearchResult]> {
        match self {
            SearchState::Success { results, .. } => Some(results),
            _ => None,
        }
    }
}
