use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::command::{ActionId, Command, CommandOutcome};
use crate::config::Config;
use crate::error::AppResult;
use crate::input::{KeymapPreset, map_key_to_command};
use crate::overlay::{OverlayKeyResult, OverlayManager};
use crate::query::{ProviderKind, QueryEngine, SearchProvider};

use super::state::{AppState, Mode};

pub struct App {
    pub state: AppState,
    pub config: Config,
    pub overlay: OverlayManager,
    pub engine: QueryEngine,
    provider_kind: ProviderKind,
    index_label: String,
    keymap: KeymapPreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyOutcome {
    pub(crate) quit_requested: bool,
    pub(crate) redraw: bool,
}

impl App {
    /// Builds the app around one provider binding. `provider` being `None`
    /// leaves the engine without a query capability; searches then surface
    /// the capability-missing failure instead of running.
    pub fn new(
        config: Config,
        provider_kind: ProviderKind,
        provider: Option<Arc<dyn SearchProvider>>,
        index_label: String,
    ) -> Self {
        let keymap = KeymapPreset::parse(&config.keymap.preset);
        let engine = match provider {
            Some(provider) => QueryEngine::with_provider(provider, config.search.per_page),
            None => QueryEngine::without_provider(),
        };
        let mut overlay = OverlayManager::new(&config);
        overlay.add_logo(&config.branding, provider_kind);

        Self {
            state: AppState::default(),
            config,
            overlay,
            engine,
            provider_kind,
            index_label,
            keymap,
        }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider_kind
    }

    pub fn index_label(&self) -> &str {
        &self.index_label
    }

    pub fn apply_command(&mut self, command: Command) -> AppResult<CommandOutcome> {
        match command {
            Command::OpenSearch { seed } => {
                self.overlay.open_with_seed(seed);
                self.state.mode = Mode::Overlay;
                self.state.status.last_action_id = Some(ActionId::OpenSearch);
                self.state.status.message = "search opened".to_string();
                Ok(CommandOutcome::Applied)
            }
            Command::CloseOverlay => {
                self.overlay.close();
                self.state.mode = Mode::Normal;
                self.state.status.last_action_id = Some(ActionId::CloseOverlay);
                self.state.status.message = "search closed".to_string();
                Ok(CommandOutcome::Applied)
            }
            Command::Quit => {
                self.state.status.last_action_id = Some(ActionId::Quit);
                Ok(CommandOutcome::Applied)
            }
        }
    }

    /// Opens the overlay and submits `query` as if it had been typed into
    /// the form. Used for the `--query` CLI flag.
    pub fn submit_initial_query(&mut self, query: String, now: Instant) -> AppResult<()> {
        self.apply_command(Command::OpenSearch { seed: Some(query) })?;
        let outcome = self.overlay.on_submit(&mut self.engine, now)?;
        if outcome == CommandOutcome::Applied {
            self.state.status.last_action_id = Some(ActionId::Submit);
        }
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> AppResult<KeyOutcome> {
        match self.state.mode {
            Mode::Normal => {
                let Some(command) = map_key_to_command(key, self.state.mode, self.keymap) else {
                    return Ok(KeyOutcome {
                        quit_requested: false,
                        redraw: false,
                    });
                };
                if command == Command::Quit {
                    return Ok(KeyOutcome {
                        quit_requested: true,
                        redraw: false,
                    });
                }
                self.apply_command(command)?;
                Ok(KeyOutcome {
                    quit_requested: false,
                    redraw: true,
                })
            }
            Mode::Overlay => match self.overlay.handle_key(&mut self.engine, key, now)? {
                OverlayKeyResult::Consumed { redraw } => Ok(KeyOutcome {
                    quit_requested: false,
                    redraw,
                }),
                OverlayKeyResult::CloseRequested => {
                    self.apply_command(Command::CloseOverlay)?;
                    Ok(KeyOutcome {
                        quit_requested: false,
                        redraw: true,
                    })
                }
            },
        }
    }

    /// Drains query completions and refreshes the status line. Returns
    /// true when something changed and a redraw is due.
    pub(crate) fn drain_background(&mut self, now: Instant) -> bool {
        let changed = self.overlay.on_query_events(&mut self.engine, now);
        if !changed {
            return false;
        }

        if self.overlay.error().is_some() {
            self.state.status.last_action_id = Some(ActionId::QueryFailed);
            self.state.status.message = "query failed".to_string();
        } else {
            self.state.status.last_action_id = Some(ActionId::QueryComplete);
            self.state.status.message =
                format!("{} results", self.overlay.pagination().total);
        }
        true
    }
}
