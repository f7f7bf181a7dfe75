use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::command::CommandOutcome;
use crate::config::{BrandingConfig, Config};
use crate::error::AppResult;
use crate::query::{ProviderKind, QueryEngine, QueryEvent};

use super::loading::LoadingBar;
use super::results::build_result;
use super::types::{
    BrandBadge, OverlayView, Pagination, QueryStatus, RangeView, SearchResult, error_message,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKeyResult {
    Consumed { redraw: bool },
    CloseRequested,
}

/// The modal search overlay: owns visibility, query text, pagination
/// bookkeeping, the loading bar, and the error slot. Query execution is
/// delegated to the engine's provider; completions come back through
/// [`OverlayManager::on_query_events`].
pub struct OverlayManager {
    phase: OverlayPhase,
    query_text: String,
    input: Input,
    results: Vec<SearchResult>,
    results_loaded: bool,
    pagination: Pagination,
    range: Option<RangeView>,
    error: Option<String>,
    brand: Option<BrandBadge>,
    scroll_top: usize,
    loading: LoadingBar,
    in_flight: Option<u64>,
}

impl OverlayManager {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: OverlayPhase::Closed,
            query_text: String::new(),
            input: Input::default(),
            results: Vec::new(),
            results_loaded: true,
            pagination: Pagination::default(),
            range: None,
            error: None,
            brand: None,
            scroll_top: 0,
            loading: LoadingBar::new(&config.loading),
            in_flight: None,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != OverlayPhase::Closed
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn open(&mut self) {
        if self.phase == OverlayPhase::Closed {
            self.phase = OverlayPhase::Idle;
        }
    }

    pub fn open_with_seed(&mut self, seed: Option<String>) {
        self.open();
        if let Some(seed) = seed {
            self.query_text = seed;
            self.input = Input::new(self.query_text.clone());
        }
    }

    /// Closes the modal. Idempotent; results and query text survive so a
    /// reopen shows the previous page.
    pub fn close(&mut self) {
        self.phase = OverlayPhase::Closed;
    }

    /// The complete search operation: pre-query UI phase, then delegation
    /// to the engine. `start_index` is a 1-based result offset.
    ///
    /// With no query capability configured this logs a diagnostic, reports
    /// a failure with an empty status, and runs the post-query phase
    /// immediately.
    pub fn search(
        &mut self,
        engine: &mut QueryEngine,
        start_index: u64,
        now: Instant,
    ) -> AppResult<()> {
        self.before_query();

        if !engine.has_provider() {
            tracing::warn!("no query capability is configured");
            let query = self.query_text.clone();
            self.on_query_error(&query, QueryStatus::parse(""));
            self.after_query(now);
            return Ok(());
        }

        let generation = engine.submit(self.query_text.clone(), start_index)?;
        self.in_flight = Some(generation);
        Ok(())
    }

    /// Form-submit: adopt the input value as the query text and search the
    /// first page. Empty input is a no-op.
    pub fn on_submit(
        &mut self,
        engine: &mut QueryEngine,
        now: Instant,
    ) -> AppResult<CommandOutcome> {
        let value = self.input.value().to_string();
        if value.is_empty() {
            return Ok(CommandOutcome::Noop);
        }

        self.query_text = value;
        self.search(engine, 1, now)?;
        Ok(CommandOutcome::Applied)
    }

    pub fn next_page(
        &mut self,
        engine: &mut QueryEngine,
        now: Instant,
    ) -> AppResult<CommandOutcome> {
        match self.pagination.next {
            Some(start_index) => {
                self.search(engine, start_index, now)?;
                Ok(CommandOutcome::Applied)
            }
            None => Ok(CommandOutcome::Noop),
        }
    }

    pub fn prev_page(
        &mut self,
        engine: &mut QueryEngine,
        now: Instant,
    ) -> AppResult<CommandOutcome> {
        match self.pagination.prev {
            Some(start_index) => {
                self.search(engine, start_index, now)?;
                Ok(CommandOutcome::Applied)
            }
            None => Ok(CommandOutcome::Noop),
        }
    }

    /// Clears the results region and shows the status-selected message in
    /// the error slot.
    pub fn on_query_error(&mut self, query_text: &str, status: QueryStatus) {
        self.results.clear();
        self.error = Some(error_message(query_text, status));
    }

    /// Installs the footer brand badge when the provider has a non-empty
    /// logo asset configured; no-op otherwise.
    pub fn add_logo(&mut self, branding: &BrandingConfig, kind: ProviderKind) {
        if let Some(brand) = branding.brand(kind.id())
            && !brand.logo.is_empty()
        {
            self.brand = Some(BrandBadge {
                provider: kind,
                url: brand.url.clone(),
                asset: branding.asset_path(&brand.logo),
            });
        }
    }

    pub fn brand(&self) -> Option<&BrandBadge> {
        self.brand.as_ref()
    }

    /// Overlay-mode key dispatch. Esc requests close; Enter submits;
    /// Ctrl-N/PageDown and Ctrl-P/PageUp paginate; Up/Down scroll the
    /// results; everything else edits the input field.
    pub fn handle_key(
        &mut self,
        engine: &mut QueryEngine,
        key: KeyEvent,
        now: Instant,
    ) -> AppResult<OverlayKeyResult> {
        match key.code {
            KeyCode::Esc => return Ok(OverlayKeyResult::CloseRequested),
            KeyCode::Enter => {
                let outcome = self.on_submit(engine, now)?;
                return Ok(OverlayKeyResult::Consumed {
                    redraw: outcome == CommandOutcome::Applied,
                });
            }
            KeyCode::PageDown => {
                let outcome = self.next_page(engine, now)?;
                return Ok(OverlayKeyResult::Consumed {
                    redraw: outcome == CommandOutcome::Applied,
                });
            }
            KeyCode::PageUp => {
                let outcome = self.prev_page(engine, now)?;
                return Ok(OverlayKeyResult::Consumed {
                    redraw: outcome == CommandOutcome::Applied,
                });
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let outcome = self.next_page(engine, now)?;
                return Ok(OverlayKeyResult::Consumed {
                    redraw: outcome == CommandOutcome::Applied,
                });
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let outcome = self.prev_page(engine, now)?;
                return Ok(OverlayKeyResult::Consumed {
                    redraw: outcome == CommandOutcome::Applied,
                });
            }
            KeyCode::Up => {
                self.scroll_top = self.scroll_top.saturating_sub(1);
                return Ok(OverlayKeyResult::Consumed { redraw: true });
            }
            KeyCode::Down => {
                if self.scroll_top + 1 < self.results.len() {
                    self.scroll_top += 1;
                }
                return Ok(OverlayKeyResult::Consumed { redraw: true });
            }
            _ => {}
        }

        self.input.handle_event(&Event::Key(key));
        Ok(OverlayKeyResult::Consumed { redraw: true })
    }

    /// Drains engine completions. Stale generations (superseded by a newer
    /// `search`) are ignored. Returns true when the view changed.
    pub fn on_query_events(&mut self, engine: &mut QueryEngine, now: Instant) -> bool {
        let events = engine.drain_events();
        if events.is_empty() {
            return false;
        }

        let mut changed = false;
        for event in events {
            match event {
                QueryEvent::Completed { generation, page } => {
                    if Some(generation) != self.in_flight {
                        continue;
                    }
                    self.in_flight = None;
                    if page.results.is_empty() {
                        let query = self.query_text.clone();
                        self.on_query_error(&query, QueryStatus::Success);
                    } else {
                        self.results = page.results;
                        self.pagination = page.pagination;
                        self.range = Some(RangeView {
                            first: page.first_index,
                            last: page.last_index,
                            total: page.pagination.total,
                        });
                        self.error = None;
                    }
                    self.after_query(now);
                    changed = true;
                }
                QueryEvent::Failed {
                    generation,
                    status,
                    message,
                } => {
                    if Some(generation) != self.in_flight {
                        continue;
                    }
                    self.in_flight = None;
                    tracing::debug!(%message, status = status.id(), "query failed");
                    let query = self.query_text.clone();
                    self.on_query_error(&query, status);
                    self.after_query(now);
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn on_loading_tick(&mut self, now: Instant) -> bool {
        self.loading.on_tick(now)
    }

    pub fn loading_active(&self) -> bool {
        self.loading.is_active()
    }

    pub fn loading_tick_interval(&self) -> Duration {
        self.loading.tick_interval()
    }

    pub fn loading_percent(&self) -> u8 {
        self.loading.percent()
    }

    /// Short status-bar segment describing the current result set.
    pub fn status_segment(&self) -> Option<String> {
        if self.phase == OverlayPhase::Loading {
            return Some(format!("searching \"{}\"", self.query_text));
        }
        if self.error.is_some() {
            return Some("query failed".to_string());
        }
        self.range
            .map(|range| format!("{}\u{2013}{} of {}", range.first, range.last, range.total))
    }

    pub fn view(&self) -> Option<OverlayView> {
        if !self.is_open() {
            return None;
        }

        let rows = self
            .results
            .iter()
            .map(|result| build_result(&result.url, &result.title, &result.digest))
            .collect();

        Some(OverlayView {
            input: self.input.value().to_string(),
            cursor: self.input.visual_cursor(),
            loading_visible: self.loading.is_visible(),
            loading_percent: self.loading.percent(),
            rows,
            results_loaded: self.results_loaded,
            scroll_top: self.scroll_top,
            metadata: self.range,
            error: self.error.clone(),
            brand: self.brand.clone(),
            next_available: self.pagination.next.is_some(),
            prev_available: self.pagination.prev.is_some(),
        })
    }

    /// Pre-query phase: open if closed, sync the input field to the query
    /// text, hide the error slot, mark the results stale, start loading.
    fn before_query(&mut self) {
        if self.phase == OverlayPhase::Closed {
            self.phase = OverlayPhase::Idle;
        }
        self.input = Input::new(self.query_text.clone());
        self.error = None;
        self.results_loaded = false;
        self.loading.start();
        self.phase = OverlayPhase::Loading;
    }

    /// Post-query phase: scroll back to the top, mark the results fresh,
    /// stop the loading bar.
    fn after_query(&mut self, now: Instant) {
        self.scroll_top = 0;
        self.results_loaded = true;
        self.loading.stop(now);
        if self.phase == OverlayPhase::Loading {
            self.phase = OverlayPhase::Idle;
        }
    }
}
