use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use serde::Deserialize;

use crate::overlay::{Pagination, QueryFailure, SearchPage, SearchResult};

use super::provider::{ProviderKind, SearchProvider};

const INDEX_CACHE_CAP: usize = 8;
const DIGEST_MAX_CHARS: usize = 120;

/// One record of a generated site index.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// An in-memory site search index, parsed from the JSON array a static
/// site generator emits (`[{ "url", "title", "content" }, ...]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose title or content contains `needle`, in index order.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> Vec<&IndexEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(needle)
                    || entry.content.to_lowercase().contains(needle)
            })
            .collect()
    }
}

/// The bundled provider: serves queries from a static site's own search
/// index on disk. Parsed indexes are LRU-cached per path so pagination
/// does not re-read the file.
pub struct StaticIndexProvider {
    path: PathBuf,
    cache: Mutex<LruCache<PathBuf, Arc<SearchIndex>>>,
}

impl StaticIndexProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let cap = NonZeroUsize::new(INDEX_CACHE_CAP).unwrap_or(NonZeroUsize::MIN);
        Self {
            path: path.into(),
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Arc<SearchIndex>, QueryFailure> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| QueryFailure::other("index cache is poisoned"))?;
        if let Some(index) = cache.get(&self.path) {
            return Ok(index.clone());
        }

        let raw = fs::read_to_string(&self.path).map_err(|err| {
            QueryFailure::other(format!(
                "failed to read index {}: {err}",
                self.path.display()
            ))
        })?;
        let index = Arc::new(SearchIndex::from_json(&raw).map_err(|err| {
            QueryFailure::other(format!(
                "failed to parse index {}: {err}",
                self.path.display()
            ))
        })?);
        cache.put(self.path.clone(), index.clone());
        Ok(index)
    }
}

impl SearchProvider for StaticIndexProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Hexo
    }

    fn execute(
        &self,
        query: &str,
        start_index: u64,
        per_page: usize,
    ) -> Result<SearchPage, QueryFailure> {
        let index = self.load()?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchPage::default());
        }

        let matched = index.matches(&needle);
        let total = matched.len() as u64;
        let per_page = per_page.max(1);
        let start = start_index.max(1);
        let offset = (start - 1) as usize;

        let results: Vec<SearchResult> = matched
            .iter()
            .skip(offset)
            .take(per_page)
            .map(|entry| SearchResult {
                url: entry.url.clone(),
                title: entry.title.clone(),
                digest: excerpt(&entry.content, &needle, DIGEST_MAX_CHARS),
            })
            .collect();

        let count = results.len() as u64;
        let next = (offset + per_page < matched.len()).then(|| start + per_page as u64);
        let prev = (offset > 0).then(|| start.saturating_sub(per_page as u64).max(1));
        let current = (offset / per_page) as u64 + 1;
        let (first_index, last_index) = if count == 0 {
            (0, 0)
        } else {
            (start, start + count - 1)
        };

        Ok(SearchPage {
            results,
            pagination: Pagination {
                next,
                prev,
                total,
                current,
            },
            first_index,
            last_index,
        })
    }
}

/// A char-boundary-safe window of `content` around the first occurrence of
/// `needle` (lowercased). Falls back to the head of the content when the
/// match position cannot be located byte-exactly.
fn excerpt(content: &str, needle: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // ASCII lowercasing is byte-preserving, so positions found in the
    // lowered copy are valid offsets into the original.
    let haystack = trimmed.to_ascii_lowercase();
    let needle_ascii = needle.to_ascii_lowercase();
    let hit = if needle_ascii.is_empty() {
        None
    } else {
        haystack.find(&needle_ascii)
    };

    // Keep a quarter of the window as context before the match.
    let lead = max_chars / 4;
    let window_start = match hit {
        Some(pos) => {
            let mut start = pos;
            let mut stepped = 0;
            for (idx, _) in trimmed[..pos].char_indices().rev() {
                start = idx;
                stepped += 1;
                if stepped >= lead {
                    break;
                }
            }
            start
        }
        None => 0,
    };

    let mut end = trimmed.len();
    let mut taken = 0;
    for (idx, _) in trimmed[window_start..].char_indices() {
        if taken >= max_chars {
            end = window_start + idx;
            break;
        }
        taken += 1;
    }

    let mut out = String::new();
    if window_start > 0 {
        out.push('\u{2026}');
    }
    out.push_str(trimmed[window_start..end].trim());
    if end < trimmed.len() {
        out.push('\u{2026}');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::overlay::QueryStatus;
    use crate::query::provider::SearchProvider;

    use super::{DIGEST_MAX_CHARS, SearchIndex, StaticIndexProvider, excerpt};

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("usearch_index_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    fn sample_index_json(posts: usize) -> String {
        let entries: Vec<String> = (0..posts)
            .map(|i| {
                format!(
                    r#"{{"url":"https://blog.example/p{i}","title":"Post {i}","content":"body of post {i} mentions ferris the crab"}}"#
                )
            })
            .collect();
        format!("[{}]", entries.join(","))
    }

    #[test]
    fn from_json_parses_entries_with_optional_content() {
        let index = SearchIndex::from_json(
            r#"[{"url":"/a","title":"A","content":"alpha"},{"url":"/b","title":"B"}]"#,
        )
        .expect("index should parse");
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn execute_matches_title_and_content_case_insensitively() {
        let path = unique_temp_path("match.json");
        fs::write(
            &path,
            r#"[
                {"url":"/a","title":"Rust Notes","content":"systems programming"},
                {"url":"/b","title":"Gardening","content":"growing rust-colored roses"},
                {"url":"/c","title":"Cooking","content":"nothing relevant"}
            ]"#,
        )
        .expect("index file should be written");

        let provider = StaticIndexProvider::new(&path);
        let page = provider
            .execute("RUST", 1, 10)
            .expect("query should succeed");
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].url, "/a");
        assert_eq!(page.results[1].url, "/b");
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.next, None);
        assert_eq!(page.pagination.prev, None);
        assert_eq!((page.first_index, page.last_index), (1, 2));

        fs::remove_file(&path).expect("index file should be removed");
    }

    #[test]
    fn execute_paginates_with_one_based_start_indexes() {
        let path = unique_temp_path("pages.json");
        fs::write(&path, sample_index_json(25)).expect("index file should be written");

        let provider = StaticIndexProvider::new(&path);
        let first = provider
            .execute("ferris", 1, 10)
            .expect("first page should succeed");
        assert_eq!(first.results.len(), 10);
        assert_eq!(first.pagination.next, Some(11));
        assert_eq!(first.pagination.prev, None);
        assert_eq!(first.pagination.current, 1);

        let second = provider
            .execute("ferris", 11, 10)
            .expect("second page should succeed");
        assert_eq!(second.results.len(), 10);
        assert_eq!(second.pagination.next, Some(21));
        assert_eq!(second.pagination.prev, Some(1));
        assert_eq!(second.pagination.current, 2);
        assert_eq!((second.first_index, second.last_index), (11, 20));

        let last = provider
            .execute("ferris", 21, 10)
            .expect("last page should succeed");
        assert_eq!(last.results.len(), 5);
        assert_eq!(last.pagination.next, None);
        assert_eq!(last.pagination.prev, Some(11));
        assert_eq!((last.first_index, last.last_index), (21, 25));

        fs::remove_file(&path).expect("index file should be removed");
    }

    #[test]
    fn execute_returns_empty_page_for_no_hits_or_blank_query() {
        let path = unique_temp_path("empty.json");
        fs::write(&path, sample_index_json(3)).expect("index file should be written");

        let provider = StaticIndexProvider::new(&path);
        let none = provider
            .execute("zebra", 1, 10)
            .expect("no-hit query should succeed");
        assert!(none.results.is_empty());
        assert_eq!(none.pagination.total, 0);

        let blank = provider
            .execute("   ", 1, 10)
            .expect("blank query should succeed");
        assert!(blank.results.is_empty());

        fs::remove_file(&path).expect("index file should be removed");
    }

    #[test]
    fn missing_or_malformed_index_reports_other_status() {
        let missing = StaticIndexProvider::new(unique_temp_path("missing.json"));
        let failure = missing
            .execute("rust", 1, 10)
            .expect_err("missing index should fail");
        assert_eq!(failure.status, QueryStatus::Other);

        let path = unique_temp_path("broken.json");
        fs::write(&path, "{not json").expect("index file should be written");
        let broken = StaticIndexProvider::new(&path);
        let failure = broken
            .execute("rust", 1, 10)
            .expect_err("malformed index should fail");
        assert_eq!(failure.status, QueryStatus::Other);
        assert!(failure.message.contains("parse"));

        fs::remove_file(&path).expect("index file should be removed");
    }

    #[test]
    fn excerpt_windows_around_the_first_match() {
        let head: String = "x".repeat(200);
        let content = format!("{head} needle and the tail goes on for a while after the match");
        let digest = excerpt(&content, "needle", DIGEST_MAX_CHARS);

        assert!(digest.starts_with('\u{2026}'));
        assert!(digest.contains("needle"));
        assert!(digest.chars().count() <= DIGEST_MAX_CHARS + 2);
    }

    #[test]
    fn excerpt_falls_back_to_the_head_without_a_byte_match() {
        let digest = excerpt("short body", "ünïcode", DIGEST_MAX_CHARS);
        assert_eq!(digest, "short body");
    }

    #[test]
    fn excerpt_is_char_boundary_safe_for_multibyte_content() {
        let content = "\u{3042}\u{3044}\u{3046}\u{3048}\u{304a}".repeat(60);
        let digest = excerpt(&content, "\u{3046}", 20);
        assert!(digest.chars().count() <= 22);
    }
}
