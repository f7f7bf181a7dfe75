use crate::overlay::{QueryFailure, SearchPage};

/// A search backend. Implementations run on the engine's worker thread and
/// must stay independent of the UI: they turn a query plus a 1-based start
/// index into one page of results and its pagination metadata.
pub trait SearchProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn execute(
        &self,
        query: &str,
        start_index: u64,
        per_page: usize,
    ) -> Result<SearchPage, QueryFailure>;
}

/// The recognized backends. Only `Hexo` (a static-site index on disk) has
/// a bundled execution capability; the hosted backends exist as branding
/// targets for external provider implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Google,
    Algolia,
    Hexo,
    Azure,
    Baidu,
}

impl ProviderKind {
    pub const ALL: [Self; 5] = [
        Self::Google,
        Self::Algolia,
        Self::Hexo,
        Self::Azure,
        Self::Baidu,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Algolia => "algolia",
            Self::Hexo => "hexo",
            Self::Azure => "azure",
            Self::Baidu => "baidu",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "google" => Some(Self::Google),
            "algolia" => Some(Self::Algolia),
            "hexo" => Some(Self::Hexo),
            "azure" => Some(Self::Azure),
            "baidu" => Some(Self::Baidu),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderKind;

    #[test]
    fn ids_round_trip_through_parse() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::parse(kind.id()), Some(kind));
        }
        assert_eq!(ProviderKind::parse("bing"), None);
    }
}
