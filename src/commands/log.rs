use super::{open_persistence, parse_date};
use crate::{
    libs::{daily_log::DailyLog, messages::Message, persistence::Record},
    msg_success,
};
use anyhow::Result;
use clap::Args;

/// Fields left out keep their stored value, or the default for a new day.
#[derive(Debug, Args)]
pub struct LogArgs {
    #[arg(default_value = "today")]
    date: String,

    /// Hours fasted (0-24)
    #[arg(long)]
    hours: Option<f64>,

    #[arg(short, long)]
    weight: Option<f64>,

    /// Glasses of water
    #[arg(long)]
    water: Option<u32>,

    /// Mood from 1 to 5
    #[arg(short, long)]
    mood: Option<u8>,

    #[arg(short, long)]
    notes: Option<String>,

    /// Mark the day as a completed fast
    #[arg(short, long)]
    completed: Option<bool>,

    /// Protocol tag; defaults to the timer's current protocol
    #[arg(short, long)]
    protocol: Option<String>,
}

pub async fn cmd(args: LogArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let persistence = open_persistence()?;

    let mut log = match persistence.load_log(date).await {
        Some(log) => log,
        None => {
            let mut log = DailyLog::new(date);
            log.protocol = persistence.load_timer().await.current_protocol;
            log
        }
    };

    if let Some(hours) = args.hours {
        log.fasting_hours = hours;
    }
    if args.weight.is_some() {
        log.weight = args.weight;
    }
    if let Some(water) = args.water {
        log.hydration = water;
    }
    if args.mood.is_some() {
        log.mood = args.mood;
    }
    if let Some(notes) = args.notes {
        log.notes = notes;
    }
    if let Some(completed) = args.completed {
        log.completed = completed;
    }
    if let Some(protocol) = args.protocol {
        log.protocol = protocol;
    }
    log.validate()?;

    let key = log.key();
    persistence.save(Record::Log(log)).await;
    msg_success!(Message::LogSaved(key));
    Ok(())
}
