//! Statistics derived from the daily log calendar.
//!
//! [`compute_stats`] is a pure fold over every stored log. Statistics are
//! never persisted; callers recompute them whenever the log collection
//! changes. Only logs marked `completed` contribute.
//!
//! ## Streaks
//!
//! Completed dates are walked newest first. A run continues while two
//! adjacent dates are exactly one calendar day apart. The current streak is
//! the run that starts at the newest completed date, whether or not that
//! date is today; recency policy belongs to the caller.

use crate::libs::daily_log::{DailyLog, LogBook};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_fasting_days: u32,
    pub average_fasting_hours: f64,
    /// Last recorded weight minus the first; 0 with fewer than two weights.
    pub weight_change: f64,
    pub last_weight: Option<f64>,
}

pub fn compute_stats(logs: &LogBook) -> Stats {
    let completed: Vec<&DailyLog> = logs.values().filter(|log| log.completed).collect();
    if completed.is_empty() {
        return Stats::default();
    }

    let total = completed.len();
    let average_fasting_hours = completed.iter().map(|log| log.fasting_hours).sum::<f64>() / total as f64;

    // LogBook iterates in ascending date order
    let newest_first: Vec<NaiveDate> = completed.iter().rev().map(|log| log.date).collect();
    let (current_streak, longest_streak) = streaks(&newest_first);

    let weights: Vec<f64> = completed.iter().filter_map(|log| log.weight).collect();
    let weight_change = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) if weights.len() >= 2 => last - first,
        _ => 0.0,
    };

    Stats {
        current_streak,
        longest_streak,
        total_fasting_days: total as u32,
        average_fasting_hours,
        weight_change,
        last_weight: weights.last().copied(),
    }
}

/// Returns (current, longest) run lengths over dates sorted newest first.
fn streaks(newest_first: &[NaiveDate]) -> (u32, u32) {
    let mut current = 0;
    let mut longest = 0;
    let mut run = 0;
    let mut in_first_run = true;

    for (i, date) in newest_first.iter().enumerate() {
        let continues = i > 0 && newest_first[i - 1].signed_duration_since(*date).num_days() == 1;
        if continues {
            run += 1;
        } else {
            if i > 0 {
                in_first_run = false;
            }
            run = 1;
        }
        if in_first_run {
            current = run;
        }
        longest = longest.max(run);
    }

    (current, longest)
}
