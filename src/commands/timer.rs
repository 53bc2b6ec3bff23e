use super::{now_ms, open_persistence};
use crate::{
    libs::{
        daily_log::DailyLog,
        messages::Message,
        persistence::Record,
        timer::format_duration,
        view::View,
    },
    msg_error_anyhow, msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::{Local, NaiveDateTime, TimeZone};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TimerArgs {
    #[command(subcommand)]
    command: TimerCommand,
}

#[derive(Debug, Subcommand)]
enum TimerCommand {
    /// Start a new fast
    Start,
    Pause,
    Resume,
    /// Finish the fast and record it in the daily log
    Stop {
        /// Do not write a daily log for the finished fast
        #[arg(long)]
        no_log: bool,
    },
    /// Abandon the fast without recording it
    Reset,
    Status,
    /// Switch protocol, or list protocols when no name is given
    Protocol { name: Option<String> },
    /// Set the target of the custom protocol in hours
    Custom { hours: f64 },
    /// Move the start of the running fast (`yyyy-MM-dd HH:MM`, local time)
    ModifyStart { start: String },
}

pub async fn cmd(args: TimerArgs) -> Result<()> {
    let persistence = open_persistence()?;
    let timer = persistence.load_timer().await;
    let now = now_ms();

    match args.command {
        TimerCommand::Start => {
            if timer.is_running {
                msg_warning!(Message::TimerAlreadyRunning);
                return Ok(());
            }
            persistence.save(Record::Timer(timer.start(now))).await;
            msg_success!(Message::TimerStarted(timer.current_protocol));
        }
        TimerCommand::Pause => {
            if !timer.is_running || timer.is_paused {
                msg_warning!(Message::TimerCannotPause);
                return Ok(());
            }
            persistence.save(Record::Timer(timer.pause(now))).await;
            msg_success!(Message::TimerPaused);
        }
        TimerCommand::Resume => {
            if !timer.is_paused {
                msg_warning!(Message::TimerNotPaused);
                return Ok(());
            }
            persistence.save(Record::Timer(timer.resume(now))).await;
            msg_success!(Message::TimerResumed);
        }
        TimerCommand::Stop { no_log } => {
            let (stopped, session) = timer.stop(now);
            let Some(session) = session else {
                msg_warning!(Message::TimerNotRunning);
                return Ok(());
            };
            persistence.save(Record::Timer(stopped)).await;
            msg_success!(Message::TimerStopped(format_duration(session.elapsed_ms)));

            if session.target_reached {
                msg_success!(Message::FastingGoalReached);
            }
            if !no_log {
                let mut log = session.to_daily_log();
                if let Some(existing) = persistence.load_log(log.date).await {
                    log = DailyLog {
                        fasting_hours: log.fasting_hours,
                        completed: log.completed || existing.completed,
                        protocol: log.protocol,
                        ..existing
                    };
                }
                let key = log.key();
                persistence.save(Record::Log(log)).await;
                msg_info!(Message::LogSaved(key));
            }
        }
        TimerCommand::Reset => {
            persistence.save(Record::Timer(timer.reset())).await;
            msg_success!(Message::TimerReset);
        }
        TimerCommand::Status => {
            View::timer(&timer, now)?;
            if timer.is_target_reached(now) {
                msg_success!(Message::FastingGoalReached);
            }
        }
        TimerCommand::Protocol { name } => match name {
            None => View::protocols(&timer)?,
            Some(name) => {
                if !timer.protocols.contains_key(&name) {
                    return Err(msg_error_anyhow!(Message::UnknownProtocol(name)));
                }
                persistence.save(Record::Timer(timer.set_protocol(&name))).await;
                msg_success!(Message::ProtocolChanged(name));
            }
        },
        TimerCommand::Custom { hours } => {
            if !(hours > 0.0 && hours <= 72.0) {
                return Err(msg_error_anyhow!(Message::InvalidCustomDuration(hours)));
            }
            persistence.save(Record::Timer(timer.set_custom_duration(hours))).await;
            msg_success!(Message::CustomDurationSet(hours));
        }
        TimerCommand::ModifyStart { start } => {
            let new_start = parse_local_datetime(&start)?;
            let modified = timer.modify_start_time(new_start, now)?;
            persistence.save(Record::Timer(modified)).await;
            msg_success!(Message::StartTimeUpdated(start));
        }
    }

    Ok(())
}

fn parse_local_datetime(value: &str) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|_| msg_error_anyhow!(Message::InvalidDateTime(value.to_string())))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| msg_error_anyhow!(Message::InvalidDateTime(value.to_string())))
}
