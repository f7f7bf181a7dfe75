use std::time::{Duration, Instant};

use crate::config::LoadingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadingPhase {
    Idle,
    Filling,
    Draining { until: Instant },
}

/// The loading-bar animation: fills in fixed steps while a query is in
/// flight, snaps to 100% on stop, and resets to 0 after a short delay.
///
/// The bar never advances past `cap` on its own; only `stop` reaches 100%.
/// Clock instants are passed in by the caller so the cycle is testable
/// without timers.
#[derive(Debug, Clone)]
pub struct LoadingBar {
    phase: LoadingPhase,
    percent: u8,
    step: u8,
    cap: u8,
    tick: Duration,
    reset_delay: Duration,
}

impl LoadingBar {
    pub fn new(config: &LoadingConfig) -> Self {
        Self {
            phase: LoadingPhase::Idle,
            percent: 0,
            step: config.step_percent,
            cap: config.cap_percent,
            tick: Duration::from_millis(config.tick_ms),
            reset_delay: Duration::from_millis(config.reset_delay_ms),
        }
    }

    /// Cadence the host loop should tick this bar at.
    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    pub fn start(&mut self) {
        self.phase = LoadingPhase::Filling;
    }

    pub fn stop(&mut self, now: Instant) {
        self.percent = 100;
        self.phase = LoadingPhase::Draining {
            until: now + self.reset_delay,
        };
    }

    /// Advances the animation. Returns true when the visible state changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.phase {
            LoadingPhase::Idle => false,
            LoadingPhase::Filling => {
                let next = self.percent.saturating_add(self.step).min(self.cap);
                let changed = next != self.percent;
                self.percent = next;
                changed
            }
            LoadingPhase::Draining { until } => {
                if now < until {
                    return false;
                }
                self.phase = LoadingPhase::Idle;
                self.percent = 0;
                true
            }
        }
    }

    /// True while the bar still needs ticks (filling or waiting to reset).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, LoadingPhase::Idle)
    }

    pub fn is_visible(&self) -> bool {
        self.is_active()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }
}
