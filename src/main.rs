use dotenvy::dotenv;
use kino_bot::{config, tg, tmdb::TmdbClient};
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // путь к конфигу (можно через ENV)
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| config::DEFAULT_PATH.to_string());
    let config = match config::load_or_explain(&config_path, &mut std::io::stdout()) {
        Ok(c) => c,
        Err(_) => std::process::exit(config::EXIT_MISSING_KEYS),
    };
    tracing::debug!(?config, "конфиг загружен");

    let tmdb = match &config.tmdb_base_url {
        Some(url) => TmdbClient::with_base_url(config.api_key.clone(), url.clone()),
        None => TmdbClient::new(config.api_key.clone()),
    };
    let bot = Bot::new(config.bot_token);

    tg::run(bot, tmdb).await;
    Ok(())
}
