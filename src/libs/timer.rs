//! Fasting timer state and its transitions.
//!
//! [`TimerState`] is a plain value persisted under the fixed `"current"` key.
//! Every transition is a pure function of the previous state and the caller's
//! clock reading (`now`, epoch milliseconds); nothing here reads the wall
//! clock, so the same inputs always produce the same state.
//!
//! ## State Model
//!
//! ```text
//!            start            pause
//! stopped ────────▶ running ────────▶ paused
//!    ▲                 ▲                 │
//!    │                 └──── resume ─────┘
//!    └──── stop / reset (from any state)
//! ```
//!
//! While running, elapsed active time is `(now - startTime) - totalPausedTime`.
//! While paused, the clock is frozen at `pauseTime`.
//!
//! ## Usage
//!
//! ```rust
//! use fastslowly::libs::timer::TimerState;
//!
//! let timer = TimerState::default().start(0);
//! let timer = timer.pause(60_000).resume(120_000);
//! assert_eq!(timer.elapsed_ms(180_000), 120_000);
//! ```

use crate::libs::daily_log::DailyLog;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Furthest back a running fast's start time may be moved.
pub const MAX_START_SHIFT_MS: i64 = 7 * 24 * HOUR_MS;

/// Protocol whose target is set explicitly rather than from the table.
pub const CUSTOM_PROTOCOL: &str = "custom";

pub const DEFAULT_PROTOCOL: &str = "16:8";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub name: String,
    pub fasting_hours: f64,
    pub eating_hours: f64,
    #[serde(default)]
    pub description: String,
}

impl Protocol {
    fn new(name: &str, fasting_hours: f64, eating_hours: f64, description: &str) -> Self {
        Protocol {
            name: name.to_string(),
            fasting_hours,
            eating_hours,
            description: description.to_string(),
        }
    }
}

/// The built-in protocol table.
pub fn default_protocols() -> BTreeMap<String, Protocol> {
    [
        ("16:8", Protocol::new("16:8", 16.0, 8.0, "16 hours fasting, 8 hours eating")),
        ("18:6", Protocol::new("18:6", 18.0, 6.0, "18 hours fasting, 6 hours eating")),
        ("20:4", Protocol::new("20:4", 20.0, 4.0, "20 hours fasting, 4 hours eating")),
        ("OMAD", Protocol::new("OMAD", 23.0, 1.0, "One Meal A Day")),
        ("5:2", Protocol::new("5:2", 24.0, 0.0, "5 days normal eating, 2 days fasting")),
        (CUSTOM_PROTOCOL, Protocol::new("Custom", 16.0, 8.0, "Custom protocol")),
    ]
    .into_iter()
    .map(|(key, protocol)| (key.to_string(), protocol))
    .collect()
}

/// Persisted timer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerState {
    pub is_running: bool,
    pub is_paused: bool,
    /// Epoch ms of the current fast's start.
    pub start_time: Option<i64>,
    /// Epoch ms the current pause began; set only while paused.
    pub pause_time: Option<i64>,
    pub total_paused_time: i64,
    pub target_duration: i64,
    pub current_protocol: String,
    pub protocols: BTreeMap<String, Protocol>,
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState {
            is_running: false,
            is_paused: false,
            start_time: None,
            pause_time: None,
            total_paused_time: 0,
            target_duration: 16 * HOUR_MS,
            current_protocol: DEFAULT_PROTOCOL.to_string(),
            protocols: default_protocols(),
        }
    }
}

/// Summary of a fast that was stopped while running.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    pub start_time: i64,
    pub elapsed_ms: i64,
    pub protocol: String,
    pub target_reached: bool,
}

impl CompletedSession {
    /// A completed log for the day the fast started, in UTC.
    pub fn to_daily_log(&self) -> DailyLog {
        let date = DateTime::<Utc>::from_timestamp_millis(self.start_time)
            .unwrap_or_default()
            .date_naive();
        let mut log = DailyLog::new(date);
        log.fasting_hours = round_hours(self.elapsed_ms).min(24.0);
        log.completed = self.target_reached;
        log.protocol = self.protocol.clone();
        log
    }
}

fn round_hours(ms: i64) -> f64 {
    (ms as f64 / HOUR_MS as f64 * 10.0).round() / 10.0
}

impl TimerState {
    pub fn start(&self, now: i64) -> Self {
        TimerState {
            is_running: true,
            is_paused: false,
            start_time: Some(now),
            pause_time: None,
            total_paused_time: 0,
            ..self.clone()
        }
    }

    /// No-op unless running and not already paused.
    pub fn pause(&self, now: i64) -> Self {
        if !self.is_running || self.is_paused {
            return self.clone();
        }
        TimerState {
            is_paused: true,
            pause_time: Some(now),
            ..self.clone()
        }
    }

    /// No-op unless running and paused.
    pub fn resume(&self, now: i64) -> Self {
        let Some(paused_at) = self.pause_time.filter(|_| self.is_running && self.is_paused) else {
            return self.clone();
        };
        TimerState {
            is_paused: false,
            pause_time: None,
            total_paused_time: self.total_paused_time + (now - paused_at).max(0),
            ..self.clone()
        }
    }

    fn cleared(&self) -> Self {
        TimerState {
            is_running: false,
            is_paused: false,
            start_time: None,
            pause_time: None,
            total_paused_time: 0,
            ..self.clone()
        }
    }

    /// Finishes the current fast.
    ///
    /// Returns the cleared state and, when a fast was running, the session
    /// that just ended.
    pub fn stop(&self, now: i64) -> (Self, Option<CompletedSession>) {
        let session = self.start_time.filter(|_| self.is_running).map(|start_time| CompletedSession {
            start_time,
            elapsed_ms: self.elapsed_ms(now),
            protocol: self.current_protocol.clone(),
            target_reached: self.is_target_reached(now),
        });
        (self.cleared(), session)
    }

    /// Abandons the current fast without producing a session.
    pub fn reset(&self) -> Self {
        self.cleared()
    }

    /// Switches protocol. An unknown name leaves the state unchanged; the
    /// custom protocol keeps the current target.
    pub fn set_protocol(&self, name: &str) -> Self {
        let Some(protocol) = self.protocols.get(name) else {
            return self.clone();
        };
        let target_duration = if name == CUSTOM_PROTOCOL {
            self.target_duration
        } else {
            hours_to_ms(protocol.fasting_hours)
        };
        TimerState {
            current_protocol: name.to_string(),
            target_duration,
            ..self.clone()
        }
    }

    pub fn set_custom_duration(&self, hours: f64) -> Self {
        TimerState {
            target_duration: hours_to_ms(hours),
            ..self.clone()
        }
    }

    /// Adds or replaces protocol table entries.
    pub fn update_protocols(&self, protocols: BTreeMap<String, Protocol>) -> Self {
        let mut merged = self.protocols.clone();
        merged.extend(protocols);
        TimerState {
            protocols: merged,
            ..self.clone()
        }
    }

    /// Moves the start of the running fast.
    ///
    /// The new start may be neither in the future nor more than seven days
    /// before `now`. Accumulated pause time is discarded, and an active pause
    /// restarts at `now`.
    pub fn modify_start_time(&self, new_start: i64, now: i64) -> Result<Self> {
        if !self.is_running {
            msg_bail_anyhow!(Message::TimerNotRunning);
        }
        if new_start > now {
            msg_bail_anyhow!(Message::StartTimeInFuture);
        }
        if new_start < now - MAX_START_SHIFT_MS {
            msg_bail_anyhow!(Message::StartTimeTooOld);
        }
        Ok(TimerState {
            start_time: Some(new_start),
            total_paused_time: 0,
            pause_time: self.pause_time.map(|_| now),
            ..self.clone()
        })
    }

    /// Active fasting time, excluding pauses.
    pub fn elapsed_ms(&self, now: i64) -> i64 {
        let Some(start) = self.start_time.filter(|_| self.is_running) else {
            return 0;
        };
        let clock = if self.is_paused { self.pause_time.unwrap_or(now) } else { now };
        (clock - start - self.total_paused_time).max(0)
    }

    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.target_duration - self.elapsed_ms(now)).max(0)
    }

    /// Fraction of the target completed, clamped to 0.0..=1.0.
    pub fn progress(&self, now: i64) -> f64 {
        if self.target_duration <= 0 {
            return if self.is_running { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms(now) as f64 / self.target_duration as f64).clamp(0.0, 1.0)
    }

    pub fn is_target_reached(&self, now: i64) -> bool {
        self.is_running && self.elapsed_ms(now) >= self.target_duration
    }

    pub fn protocol(&self) -> Option<&Protocol> {
        self.protocols.get(&self.current_protocol)
    }
}

fn hours_to_ms(hours: f64) -> i64 {
    (hours * HOUR_MS as f64).round() as i64
}

/// Formats milliseconds as `HH:MM:SS`.
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * 1000;

    #[test]
    fn test_default_protocol_table() {
        let timer = TimerState::default();
        assert_eq!(timer.protocols.len(), 6);
        assert_eq!(timer.current_protocol, "16:8");
        assert_eq!(timer.target_duration, 16 * HOUR_MS);
        assert_eq!(timer.protocols["OMAD"].fasting_hours, 23.0);
        assert_eq!(timer.protocols["5:2"].eating_hours, 0.0);
    }

    #[test]
    fn test_elapsed_excludes_pauses_and_freezes_while_paused() {
        let timer = TimerState::default().start(0).pause(10 * MINUTE);
        assert_eq!(timer.elapsed_ms(50 * MINUTE), 10 * MINUTE);

        let timer = timer.resume(30 * MINUTE);
        assert_eq!(timer.total_paused_time, 20 * MINUTE);
        assert_eq!(timer.elapsed_ms(40 * MINUTE), 20 * MINUTE);
    }

    #[test]
    fn test_set_protocol() {
        let timer = TimerState::default().set_protocol("20:4");
        assert_eq!(timer.current_protocol, "20:4");
        assert_eq!(timer.target_duration, 20 * HOUR_MS);

        let custom = timer.set_protocol(CUSTOM_PROTOCOL);
        assert_eq!(custom.current_protocol, CUSTOM_PROTOCOL);
        assert_eq!(custom.target_duration, 20 * HOUR_MS);

        let unknown = custom.set_protocol("36:12");
        assert_eq!(unknown, custom);

        let custom = custom.set_custom_duration(14.5);
        assert_eq!(custom.target_duration, 14 * HOUR_MS + 30 * MINUTE);
    }

    #[test]
    fn test_update_protocols_merges() {
        let mut extra = BTreeMap::new();
        extra.insert("36:12".to_string(), Protocol::new("36:12", 36.0, 12.0, "Alternate day"));
        let timer = TimerState::default().update_protocols(extra).set_protocol("36:12");

        assert_eq!(timer.protocols.len(), 7);
        assert_eq!(timer.target_duration, 36 * HOUR_MS);
    }

    #[test]
    fn test_modify_start_time_bounds() {
        let now = 10 * 24 * HOUR_MS;
        let timer = TimerState::default().start(now - HOUR_MS);

        assert!(timer.modify_start_time(now + 1, now).is_err());
        assert!(timer.modify_start_time(now - MAX_START_SHIFT_MS - 1, now).is_err());
        assert!(TimerState::default().modify_start_time(now - HOUR_MS, now).is_err());

        let moved = timer.modify_start_time(now - 3 * HOUR_MS, now).unwrap();
        assert_eq!(moved.start_time, Some(now - 3 * HOUR_MS));
        assert_eq!(moved.elapsed_ms(now), 3 * HOUR_MS);
    }

    #[test]
    fn test_modify_start_time_while_paused_restarts_pause() {
        let now = 5 * HOUR_MS;
        let timer = TimerState::default().start(HOUR_MS).pause(2 * HOUR_MS);

        let moved = timer.modify_start_time(0, now).unwrap();
        assert!(moved.is_paused);
        assert_eq!(moved.pause_time, Some(now));
        assert_eq!(moved.total_paused_time, 0);
        assert_eq!(moved.elapsed_ms(now + HOUR_MS), 5 * HOUR_MS);
    }

    #[test]
    fn test_progress_and_remaining() {
        let timer = TimerState::default().start(0);
        assert_eq!(timer.progress(8 * HOUR_MS), 0.5);
        assert_eq!(timer.remaining_ms(8 * HOUR_MS), 8 * HOUR_MS);
        assert!(!timer.is_target_reached(8 * HOUR_MS));

        assert_eq!(timer.progress(20 * HOUR_MS), 1.0);
        assert_eq!(timer.remaining_ms(20 * HOUR_MS), 0);
        assert!(timer.is_target_reached(20 * HOUR_MS));

        let stopped = TimerState::default();
        assert_eq!(stopped.progress(HOUR_MS), 0.0);
        assert_eq!(stopped.remaining_ms(HOUR_MS), 16 * HOUR_MS);
    }

    #[test]
    fn test_stop_produces_session_and_log() {
        // 2024-01-15T20:00:00Z
        let start = 1_705_348_800_000;
        let timer = TimerState::default().start(start);
        let (stopped, session) = timer.stop(start + 17 * HOUR_MS);

        assert!(!stopped.is_running);
        let session = session.unwrap();
        assert!(session.target_reached);

        let log = session.to_daily_log();
        assert_eq!(log.key(), "2024-01-15");
        assert_eq!(log.fasting_hours, 17.0);
        assert!(log.completed);
        assert_eq!(log.protocol, "16:8");

        let (_, none) = stopped.stop(start);
        assert!(none.is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(16 * HOUR_MS + 5 * MINUTE + 9_000), "16:05:09");
        assert_eq!(format_duration(-5), "00:00:00");
    }
}
