use super::open_persistence;
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let persistence = open_persistence()?;
    let stats = persistence.stats().await;

    msg_print!(Message::StatsHeader, true);
    View::stats(&stats)
}
