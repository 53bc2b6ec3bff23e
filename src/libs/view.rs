use super::daily_log::{date_key, LogBook};
use super::settings::Settings;
use super::stats::Stats;
use super::sync::{QueuedRecord, SyncState};
use super::timer::{format_duration, TimerState};
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn logs(logs: &LogBook) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "FASTING", "WEIGHT", "WATER", "MOOD", "PROTOCOL", "DONE", "NOTES"]);
        for log in logs.values() {
            table.add_row(row![
                date_key(log.date),
                format!("{:.1}h", log.fasting_hours),
                log.weight.map(|w| format!("{:.1}", w)).unwrap_or_else(|| "-".to_string()),
                log.hydration,
                log.mood.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
                log.protocol,
                if log.completed { "yes" } else { "no" },
                log.notes
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &Stats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["CURRENT STREAK", "LONGEST STREAK", "FASTING DAYS", "AVG HOURS", "WEIGHT CHANGE", "LAST WEIGHT"]);
        table.add_row(row![
            stats.current_streak,
            stats.longest_streak,
            stats.total_fasting_days,
            format!("{:.1}", stats.average_fasting_hours),
            format!("{:+.1}", stats.weight_change),
            stats.last_weight.map(|w| format!("{:.1}", w)).unwrap_or_else(|| "-".to_string())
        ]);
        table.printstd();

        Ok(())
    }

    pub fn timer(timer: &TimerState, now: i64) -> Result<()> {
        let mut table = Table::new();
        let status = match (timer.is_running, timer.is_paused) {
            (true, true) => "paused",
            (true, false) => "running",
            _ => "stopped",
        };

        table.add_row(row!["STATUS", "PROTOCOL", "ELAPSED", "REMAINING", "TARGET", "PROGRESS"]);
        table.add_row(row![
            status,
            timer.current_protocol,
            format_duration(timer.elapsed_ms(now)),
            format_duration(timer.remaining_ms(now)),
            format_duration(timer.target_duration),
            format!("{:.0}%", timer.progress(now) * 100.0)
        ]);
        table.printstd();

        Ok(())
    }

    pub fn protocols(timer: &TimerState) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["KEY", "NAME", "FASTING", "EATING", "DESCRIPTION"]);
        for (key, protocol) in &timer.protocols {
            let marker = if *key == timer.current_protocol { "*" } else { "" };
            table.add_row(row![
                format!("{}{}", key, marker),
                protocol.name,
                format!("{}h", protocol.fasting_hours),
                format!("{}h", protocol.eating_hours),
                protocol.description
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn settings(settings: &Settings) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        table.add_row(row!["Theme", settings.theme]);
        table.add_row(row!["Offline mode", settings.offline_mode]);
        table.add_row(row!["Notifications", settings.notifications.enabled]);
        table.add_row(row!["Hydration interval", format!("{}h", settings.notifications.hydration_interval)]);
        table.add_row(row!["Font size", format!("{:?}", settings.accessibility.font_size).to_lowercase()]);
        table.add_row(row!["Weight unit", format!("{:?}", settings.units.weight).to_lowercase()]);
        table.add_row(row!["Temperature unit", format!("{:?}", settings.units.temperature).to_lowercase()]);
        table.add_row(row!["Data sharing", settings.privacy.data_sharing]);
        table.add_row(row!["Analytics", settings.privacy.analytics]);
        table.printstd();

        Ok(())
    }

    pub fn sync(state: &SyncState, queue: &[QueuedRecord], remote: &str) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ONLINE", "STATUS", "QUEUED", "LAST SYNC", "LAST ERROR", "REMOTE"]);
        table.add_row(row![
            state.online,
            format!("{:?}", state.status).to_lowercase(),
            queue.len(),
            state
                .last_sync
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            state.last_error.clone().unwrap_or_else(|| "-".to_string()),
            remote
        ]);
        table.printstd();

        Ok(())
    }
}
