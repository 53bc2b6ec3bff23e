use super::{open_persistence, parse_date};
use crate::{
    libs::{daily_log::LogBook, messages::Message, view::View},
    msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Date to show; all logs when omitted
    date: Option<String>,
}

pub async fn cmd(args: ShowArgs) -> Result<()> {
    let persistence = open_persistence()?;

    let logs = match args.date {
        Some(date) => {
            let date = parse_date(&date)?;
            persistence.load_log(date).await.map(|log| LogBook::from([(date, log)])).unwrap_or_default()
        }
        None => persistence.load_logs().await,
    };

    if logs.is_empty() {
        msg_info!(Message::NoLogsFound);
        return Ok(());
    }
    View::logs(&logs)
}
