use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use weather_core::{
    Config, ProviderId, WeatherProvider, WeatherQuery, lookup,
    provider::{default_provider_from_config, provider_from_config},
};

use crate::api::{AppState, create_router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `GET /api/weather?city=<name>` over HTTP.
    Serve {
        /// Address to bind; overrides `server.host` from the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind; overrides `server.port` from the config file.
        #[arg(long)]
        port: Option<u16>,

        /// Provider short name, "static" or "weatherapi".
        #[arg(long)]
        provider: Option<String>,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, "static" or "weatherapi".
        provider: String,
    },

    /// Show current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Provider short name; defaults to the configured provider.
        #[arg(long)]
        provider: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port, provider } => {
                let mut config = Config::load_with_env()?;
                crate::init_tracing(&config.logging);

                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }

                let provider = resolve_provider(&config, provider.as_deref())?;
                serve(&config, provider).await
            }
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, provider } => {
                let config = Config::load_with_env()?;
                crate::init_tracing(&config.logging);

                let provider = resolve_provider(&config, provider.as_deref())?;
                let record = lookup(provider.as_ref(), &WeatherQuery::new(city)).await?;

                println!("{}: {}°C, {}", record.city, record.temperature, record.condition);
                Ok(())
            }
        }
    }
}

fn resolve_provider(
    config: &Config,
    requested: Option<&str>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    match requested {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, config),
        None => default_provider_from_config(config),
    }
}

async fn serve(config: &Config, provider: Box<dyn WeatherProvider>) -> anyhow::Result<()> {
    let provider_id = provider.id();
    let router = create_router(AppState::from(provider));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, provider = %provider_id, "Listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Interactive setup; env overrides are not applied so they never end up on disk.
fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = inquire::Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?;

        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key must not be empty");
        }

        config.upsert_provider_api_key(id, api_key.to_string());
    }

    match config.default_provider_id() {
        Ok(current) if current == id => {}
        Ok(current) => {
            let make_default =
                inquire::Confirm::new(&format!("Replace default provider '{current}' with '{id}'?"))
                    .with_default(true)
                    .prompt()
                    .context("Failed to read answer")?;
            if make_default {
                config.set_default_provider(id);
            }
        }
        Err(_) => config.set_default_provider(id),
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
