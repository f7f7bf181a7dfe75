use std::time::Instant;

use crossterm::event::{Event, KeyEventKind};
use tokio::time::{self, MissedTickBehavior};

use crate::error::AppResult;
use crate::ui::{draw_chrome, draw_search_overlay, split_layout};

use super::core::App;
use super::event_bus::{DomainEvent, EventBusRuntime};
use super::terminal_session::{TerminalSession, TerminalSurface};

enum LoopControl {
    Continue,
    Break,
}

impl App {
    pub async fn run(&mut self) -> AppResult<()> {
        let mut session = TerminalSession::enter()?;
        let result = self.run_loop(&mut session).await;
        session.restore()?;
        result
    }

    async fn run_loop(&mut self, session: &mut TerminalSession) -> AppResult<()> {
        let (mut event_rx, mut bus) = EventBusRuntime::spawn();
        let mut loading_tick = time::interval(self.overlay.loading_tick_interval());
        loading_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut needs_redraw = true;

        let result = loop {
            if self.drain_background(Instant::now()) {
                needs_redraw = true;
            }
            if needs_redraw {
                if let Err(err) = self.draw_frame(session) {
                    break Err(err);
                }
                needs_redraw = false;
            }

            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break Ok(());
                    };
                    match self.handle_domain_event(event, &mut needs_redraw) {
                        Ok(LoopControl::Continue) => {}
                        Ok(LoopControl::Break) => break Ok(()),
                        Err(err) => break Err(err),
                    }
                }
                _ = loading_tick.tick() => {
                    if self.overlay.loading_active()
                        && self.overlay.on_loading_tick(Instant::now())
                    {
                        needs_redraw = true;
                    }
                }
            }
        };

        bus.shutdown();
        result
    }

    fn handle_domain_event(
        &mut self,
        event: DomainEvent,
        needs_redraw: &mut bool,
    ) -> AppResult<LoopControl> {
        match event {
            DomainEvent::Input(Event::Key(key))
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
            {
                let outcome = self.handle_key(key, Instant::now())?;
                if outcome.quit_requested {
                    return Ok(LoopControl::Break);
                }
                if outcome.redraw {
                    *needs_redraw = true;
                }
            }
            DomainEvent::Input(Event::Resize(_, _)) => {
                *needs_redraw = true;
            }
            DomainEvent::Input(_) => {}
            DomainEvent::InputError(message) => {
                tracing::warn!(%message, "input stream error");
                self.state.status.message = format!("input error: {message}");
                *needs_redraw = true;
            }
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn draw_frame(&self, session: &mut impl TerminalSurface) -> AppResult<()> {
        let segment = self.overlay.status_segment();
        let view = self.overlay.view();
        session.draw(|frame| {
            let layout = split_layout(frame.area());
            draw_chrome(
                frame,
                layout,
                &self.state,
                self.provider_kind(),
                self.index_label(),
                segment.as_deref(),
            );
            if let Some(view) = &view {
                draw_search_overlay(frame, layout.content, view);
            }
        })?;
        Ok(())
    }
}
