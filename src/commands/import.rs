use super::open_persistence;
use crate::{
    libs::{backup::Backup, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON backup written by `export`
    path: PathBuf,
}

pub async fn cmd(args: ImportArgs) -> Result<()> {
    let persistence = open_persistence()?;

    let count = Backup::import(&persistence, &args.path).await?;

    msg_success!(Message::BackupImported(count));
    Ok(())
}
