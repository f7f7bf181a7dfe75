mod chrome;
mod layout;
mod overlay;

pub use chrome::draw_chrome;
pub use layout::{UiLayout, split_layout};
pub use overlay::draw_search_overlay;
