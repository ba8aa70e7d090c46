//! Gesture debouncing: turns a per-frame zone signal into discrete actions.
//!
//! The default mode is level-triggered with a cooldown: staying in the
//! trigger zone keeps firing, once per interval. Rising-edge mode only fires
//! when the zone is entered, still honoring the cooldown.

use crate::{constants::DEFAULT_DEBOUNCE_MILLIS, zones::Zone, Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// How repeated frames in the trigger zone are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebounceMode {
    /// Fire whenever the zone matches and the cooldown elapsed
    #[default]
    Level,
    /// Fire only on the frame the trigger zone is entered
    RisingEdge,
}

/// Discrete action signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEvent {
    /// Frame timestamp the action fired at
    pub fired_at_ms: i64,
}

/// Mutable part of a [`GestureDebouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebouncerState {
    pub last_fired_at_ms: Option<i64>,
    /// Whether the previous observed frame was in the trigger zone
    pub was_in_trigger: bool,
}

/// Edge detector with minimum re-fire interval
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    trigger: Zone,
    interval_ms: i64,
    mode: DebounceMode,
    state: DebouncerState,
}

impl GestureDebouncer {
    /// # Errors
    ///
    /// Returns an error if the interval is negative.
    pub fn new(trigger: Zone, interval_ms: i64, mode: DebounceMode) -> Result<Self> {
        if interval_ms < 0 {
            return Err(Error::ConfigError(format!(
                "Debounce interval must be non-negative, got {interval_ms} ms"
            )));
        }
        Ok(Self {
            trigger,
            interval_ms,
            mode,
            state: DebouncerState::default(),
        })
    }

    #[must_use]
    pub const fn trigger(&self) -> Zone {
        self.trigger
    }

    #[must_use]
    pub const fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    #[must_use]
    pub const fn mode(&self) -> DebounceMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> DebouncerState {
        self.state
    }

    /// Feed one classified frame
    pub fn update(&mut self, zone: Zone, now_ms: i64) -> Option<ActionEvent> {
        let in_trigger = zone == self.trigger;
        let entered = in_trigger && !self.state.was_in_trigger;
        let cooled_down = self
            .state
            .last_fired_at_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);

        let fire = in_trigger
            && cooled_down
            && match self.mode {
                DebounceMode::Level => true,
                DebounceMode::RisingEdge => entered,
            };

        self.state.was_in_trigger = in_trigger;
        if !fire {
            return None;
        }

        debug!("{} held, action fired at {} ms", self.trigger, now_ms);
        self.state.last_fired_at_ms = Some(now_ms);
        Some(ActionEvent { fired_at_ms: now_ms })
    }

    pub fn reset(&mut self) {
        self.state = DebouncerState::default();
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self {
            trigger: Zone::BottomLeft,
            interval_ms: DEFAULT_DEBOUNCE_MILLIS,
            mode: DebounceMode::Level,
            state: DebouncerState::default(),
        }
    }
}
