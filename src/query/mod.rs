mod engine;
mod provider;
mod static_index;

pub use engine::{QueryEngine, QueryEvent};
pub use provider::{ProviderKind, SearchProvider};
pub use static_index::{IndexEntry, SearchIndex, StaticIndexProvider};
