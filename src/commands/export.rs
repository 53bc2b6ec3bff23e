use super::open_persistence;
use crate::{
    libs::{
        backup::{Backup, BackupFormat},
        messages::Message,
    },
    msg_info,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "json")]
    format: BackupFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: ExportArgs) -> Result<()> {
    let persistence = open_persistence()?;

    msg_info!(Message::ExportingLogs(format!("{:?}", args.format).to_lowercase()));

    Backup::new(args.format, args.output).export(&persistence).await?;

    Ok(())
}
