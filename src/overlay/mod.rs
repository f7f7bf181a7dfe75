mod loading;
mod manager;
mod results;
mod types;

pub use loading::LoadingBar;
pub use manager::{OverlayKeyResult, OverlayManager, OverlayPhase};
pub use results::{CHEVRON, build_result};
pub use types::{
    BrandBadge, OverlayView, Pagination, QueryFailure, QueryStatus, RangeView, ResultRowView,
    SearchPage, SearchResult, error_message,
};
