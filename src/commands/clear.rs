use super::open_persistence;
use crate::{
    libs::messages::Message,
    msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: ClearArgs) -> Result<()> {
    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearAll.to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let persistence = open_persistence()?;
    if !persistence.clear_all().await {
        return Err(msg_error_anyhow!(Message::ClearAllFailed));
    }
    msg_success!(Message::AllDataCleared);
    Ok(())
}
