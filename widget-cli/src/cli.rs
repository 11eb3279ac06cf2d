use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, Select, Text};
use weather_widget_core::{Config, Locale};

use crate::host;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Weather card for a fixed location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Card width in columns.
    #[arg(long, global = true, default_value_t = host::DEFAULT_WIDTH)]
    pub width: usize,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive card (default).
    Run,

    /// Fetch once, print the card and exit.
    Show {
        /// Display language: "ar" or "en". Defaults to the configured one.
        #[arg(long)]
        locale: Option<String>,
    },

    /// Configure the API key and the displayed location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load()?;
                host::run_interactive(&config, self.width).await
            }
            Command::Show { locale } => {
                let mut config = Config::load()?;
                if let Some(code) = locale {
                    config.default_locale = Locale::try_from(code.as_str())?;
                }
                host::show_once(&config, self.width).await
            }
            Command::Configure => configure(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;

    let location_label = Text::new("Location label:")
        .with_default(&current.location_label)
        .prompt()
        .context("Failed to read location label")?;

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(current.latitude)
        .with_error_message("Please type a decimal number")
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(current.longitude)
        .with_error_message("Please type a decimal number")
        .prompt()
        .context("Failed to read longitude")?;

    let default_locale = Select::new("Default language:", Locale::all().to_vec())
        .with_starting_cursor(match current.default_locale {
            Locale::Ar => 0,
            Locale::En => 1,
        })
        .prompt()
        .context("Failed to read default language")?;

    let config = Config {
        api_key: if api_key.trim().is_empty() {
            current.api_key.clone()
        } else {
            api_key
        },
        location_label,
        latitude,
        longitude,
        default_locale,
        ..current
    };
    config.validate()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["weather-widget"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.width, host::DEFAULT_WIDTH);
    }

    #[test]
    fn show_accepts_locale_and_width() {
        let cli =
            Cli::try_parse_from(["weather-widget", "show", "--locale", "en", "--width", "40"])
                .expect("parse");

        assert_eq!(cli.width, 40);
        match cli.command {
            Some(Command::Show { locale }) => assert_eq!(locale.as_deref(), Some("en")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["weather-widget", "forecast"]).is_err());
    }
}
