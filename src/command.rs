#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenSearch { seed: Option<String> },
    CloseOverlay,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    OpenSearch,
    CloseOverlay,
    Submit,
    Search,
    NextPage,
    PrevPage,
    QueryComplete,
    QueryFailed,
    Quit,
    Input,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenSearch => "open-search",
            Self::CloseOverlay => "close-overlay",
            Self::Submit => "submit",
            Self::Search => "search",
            Self::NextPage => "next-page",
            Self::PrevPage => "prev-page",
            Self::QueryComplete => "query-complete",
            Self::QueryFailed => "query-failed",
            Self::Quit => "quit",
            Self::Input => "input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ActionId;

    #[test]
    fn action_ids_use_kebab_case() {
        assert_eq!(ActionId::OpenSearch.as_str(), "open-search");
        assert_eq!(ActionId::QueryFailed.as_str(), "query-failed");
    }
}
