use crate::command::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Overlay,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub status: StatusState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            status: StatusState::default(),
        }
    }
}
