use super::open_persistence;
use crate::{
    libs::{
        messages::Message,
        persistence::Record,
        settings::{TemperatureUnit, Theme, Units, WeightUnit},
        view::View,
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Show,
    Theme {
        #[arg(value_enum)]
        theme: Theme,
    },
    /// Toggle offline mode; going back online drains the sync queue
    Offline,
    Units {
        #[arg(short, long, value_enum)]
        weight: Option<WeightUnit>,
        #[arg(short, long, value_enum)]
        temperature: Option<TemperatureUnit>,
    },
}

pub async fn cmd(args: SettingsArgs) -> Result<()> {
    let persistence = open_persistence()?;
    let settings = persistence.load_settings().await;

    let updated = match args.command {
        SettingsCommand::Show => return View::settings(&settings),
        SettingsCommand::Theme { theme } => settings.with_theme(theme),
        SettingsCommand::Offline => settings.toggle_offline_mode(),
        SettingsCommand::Units { weight, temperature } => settings.update_units(Units {
            weight: weight.unwrap_or(settings.units.weight),
            temperature: temperature.unwrap_or(settings.units.temperature),
        }),
    };

    let offline_changed = updated.offline_mode != settings.offline_mode;
    let offline_mode = updated.offline_mode;

    if offline_changed && offline_mode {
        persistence.on_offline();
    }
    persistence.save(Record::Settings(updated)).await;
    msg_success!(Message::SettingsSaved);

    if offline_changed && !offline_mode {
        if let Err(e) = persistence.on_online().await {
            msg_warning!(Message::SyncRetryLater(e.to_string()));
        }
    }

    Ok(())
}
