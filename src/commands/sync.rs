use super::open_persistence;
use crate::{
    libs::{messages::Message, sync::SyncOutcome, view::View},
    msg_info, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    command: SyncCommand,
}

#[derive(Debug, Subcommand)]
enum SyncCommand {
    /// Report that connectivity is back and drain the queue
    Online,
    /// Report that connectivity was lost; saves are queued from now on
    Offline,
    /// Push the queue immediately
    Now,
    Status,
}

pub async fn cmd(args: SyncArgs) -> Result<()> {
    let persistence = open_persistence()?;
    let sync = persistence.sync();

    let outcome = match args.command {
        SyncCommand::Online => sync.on_online().await,
        SyncCommand::Offline => {
            sync.on_offline();
            return Ok(());
        }
        SyncCommand::Now => sync.sync_now().await,
        SyncCommand::Status => {
            return View::sync(&sync.state(), &sync.queue(), &sync.remote().describe());
        }
    };

    match outcome {
        Ok(SyncOutcome::NothingToSync) => msg_info!(Message::SyncNothingToSync),
        Ok(SyncOutcome::AlreadySyncing) => msg_info!(Message::SyncAlreadyRunning),
        Ok(SyncOutcome::Deferred) => msg_info!(Message::SyncDeferred),
        Ok(SyncOutcome::Offline) | Ok(SyncOutcome::Synced(_)) => {}
        Err(e) => msg_warning!(Message::SyncRetryLater(e.to_string())),
    }
    Ok(())
}
