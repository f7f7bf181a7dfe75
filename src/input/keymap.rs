use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;
use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

/// Normal-mode key dispatch. Overlay-mode keys are owned by the overlay
/// manager and never reach this map.
pub fn map_key_to_command(key: KeyEvent, mode: Mode, preset: KeymapPreset) -> Option<Command> {
    match mode {
        Mode::Normal => match preset {
            KeymapPreset::Default => map_normal_mode_key_default(key),
            KeymapPreset::Emacs => map_normal_mode_key_emacs(key),
        },
        Mode::Overlay => None,
    }
}

fn map_normal_mode_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('/') => Some(Command::OpenSearch { seed: None }),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_normal_mode_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && let KeyCode::Char('s') = key.code
    {
        return Some(Command::OpenSearch { seed: None });
    }

    map_normal_mode_key_default(key)
}
