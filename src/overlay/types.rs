use ratatui::text::Line;

use crate::query::ProviderKind;

/// One search hit, in display order. Produced by providers, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub digest: String,
}

/// Pagination bookkeeping for the current result page.
///
/// `next`/`prev` are `None` exactly when no further page exists in that
/// direction. Start indexes are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub next: Option<u64>,
    pub prev: Option<u64>,
    pub total: u64,
    pub current: u64,
}

/// One provider response: the rows plus the navigation metadata they cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
    /// 1-based index of the first row on this page, 0 when empty.
    pub first_index: u64,
    /// 1-based index of the last row on this page, 0 when empty.
    pub last_index: u64,
}

/// The three-way status contract of the query error handler.
///
/// `Timeout` is recognized but never produced by the bundled provider;
/// external provider implementations set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Success,
    Timeout,
    Other,
}

impl QueryStatus {
    pub fn id(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::Other => "error",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "timeout" => Self::Timeout,
            _ => Self::Other,
        }
    }
}

/// The single error kind a provider can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query failed ({}): {message}", status.id())]
pub struct QueryFailure {
    pub status: QueryStatus,
    pub message: String,
}

impl QueryFailure {
    pub fn new(status: QueryStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(QueryStatus::Other, message)
    }
}

/// Selects the user-visible message for a failed query.
pub fn error_message(query_text: &str, status: QueryStatus) -> String {
    match status {
        QueryStatus::Success => format!("No result found for \"{query_text}\"."),
        QueryStatus::Timeout => "Unfortunate timeout.".to_string(),
        QueryStatus::Other => "Mysterious failure.".to_string(),
    }
}

/// Resolved footer branding for a provider with a configured logo asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandBadge {
    pub provider: ProviderKind,
    pub url: String,
    pub asset: String,
}

/// One rendered result row, ready for the view adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRowView {
    pub lines: Vec<Line<'static>>,
}

/// Range counters shown in the footer ("first–last of total").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeView {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

/// Everything the terminal adapter needs to draw the overlay.
///
/// This is the widget's view binding: each field names one interactive
/// region of the modal, decoupled from how the adapter realizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub input: String,
    pub cursor: usize,
    pub loading_visible: bool,
    pub loading_percent: u8,
    pub rows: Vec<ResultRowView>,
    pub results_loaded: bool,
    pub scroll_top: usize,
    pub metadata: Option<RangeView>,
    pub error: Option<String>,
    pub brand: Option<BrandBadge>,
    pub next_available: bool,
    pub prev_available: bool,
}

#[cfg(test)]
mod tests {
    use super::{QueryStatus, error_message};

    #[test]
    fn parse_recognizes_the_three_way_contract() {
        assert_eq!(QueryStatus::parse("success"), QueryStatus::Success);
        assert_eq!(QueryStatus::parse("timeout"), QueryStatus::Timeout);
        assert_eq!(QueryStatus::parse(""), QueryStatus::Other);
        assert_eq!(QueryStatus::parse("abort"), QueryStatus::Other);
    }

    #[test]
    fn success_message_quotes_the_query() {
        assert_eq!(
            error_message("cats", QueryStatus::Success),
            "No result found for \"cats\"."
        );
    }

    #[test]
    fn timeout_and_unknown_statuses_have_fixed_messages() {
        assert_eq!(
            error_message("cats", QueryStatus::Timeout),
            "Unfortunate timeout."
        );
        assert_eq!(
            error_message("cats", QueryStatus::parse("teapot")),
            "Mysterious failure."
        );
        assert_eq!(
            error_message("cats", QueryStatus::parse("")),
            "Mysterious failure."
        );
    }
}
