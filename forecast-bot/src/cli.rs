use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    ATTACHMENT_NAME, Config, ForecastService, Locale, OpenWeatherProvider,
    provider::openweather::DEFAULT_BASE_URL,
};
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::info;

use crate::discord;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast-bot", version, about = "Discord bot for 5-day weather forecasts")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do; `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to Discord and serve /forecast.
    Run,

    /// Store the bot token, API key and language in the config file.
    Configure,

    /// Run one forecast locally, print the text and save the chart.
    Preview {
        /// City name, as you would type it in Discord.
        city: String,

        /// Where to write the chart.
        #[arg(long, default_value = ATTACHMENT_NAME)]
        out: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let cfg = load_config(self.config.as_ref())?;
                let token = cfg.discord_token()?.to_owned();
                let service = forecast_service(&cfg)?;
                info!(language = %cfg.locale(), "starting forecast bot");
                discord::run(&token, service).await
            }
            Command::Configure => configure(self.config.as_ref()),
            Command::Preview { city, out } => {
                let cfg = load_config(self.config.as_ref())?;
                let service = forecast_service(&cfg)?;

                let reply = service.forecast(&city).await?;
                println!("{}", reply.text);

                tokio::fs::write(&out, &reply.png)
                    .await
                    .with_context(|| format!("Failed to write chart to {}", out.display()))?;
                println!("Chart written to {}", out.display());
                Ok(())
            }
        }
    }
}

/// File values first, environment on top.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let mut cfg = load_file(path)?;
    cfg.apply_env()?;
    Ok(cfg)
}

fn load_file(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn forecast_service(cfg: &Config) -> anyhow::Result<ForecastService> {
    let api_key = cfg.openweather_api_key()?.to_owned();
    let base_url = cfg.openweather_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let provider = OpenWeatherProvider::with_base_url(api_key, cfg.locale(), base_url);
    Ok(ForecastService::new(Arc::new(provider), cfg.locale()))
}

fn configure(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut cfg = load_file(path)?;

    if let Some(token) = prompt_secret("Discord bot token:", cfg.discord_token.is_some())? {
        cfg.discord_token = Some(token);
    }
    if let Some(key) = prompt_secret("OpenWeather API key:", cfg.openweather_api_key.is_some())? {
        cfg.openweather_api_key = Some(key);
    }

    let current = Locale::all().iter().position(|l| *l == cfg.locale()).unwrap_or(0);
    let language = Select::new("Language:", Locale::all().to_vec())
        .with_starting_cursor(current)
        .prompt()?;
    cfg.language = Some(language);

    let written = match path {
        Some(path) => {
            cfg.save_to(path)?;
            path.clone()
        }
        None => cfg.save()?,
    };
    println!("Configuration saved to {}", written.display());
    Ok(())
}

/// `None` keeps the stored value when the user just presses enter.
fn prompt_secret(message: &str, has_value: bool) -> anyhow::Result<Option<String>> {
    let help = if has_value { "leave empty to keep the current value" } else { "required" };
    let value = Password::new(message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(help)
        .prompt()?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
