use super::{open_persistence, parse_date};
use crate::{
    libs::{daily_log::date_key, messages::Message},
    msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    date: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: DeleteArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let key = date_key(date);
    let persistence = open_persistence()?;

    if persistence.load_log(date).await.is_none() {
        msg_info!(Message::LogNotFound(key));
        return Ok(());
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteLog(key.clone()).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if !persistence.delete_log(date).await {
        return Err(msg_error_anyhow!(Message::LogDeleteFailed(key)));
    }
    msg_success!(Message::LogDeleted(key));
    Ok(())
}
