mod config;
mod predictor;
mod rating;
mod sentiment;
mod web;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::predictor::RatingPredictor;
use crate::sentiment::LexiconScorer;
use crate::web::server::WebServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config (before tracing, it picks the log level and format)
    let config_path = std::env::args().nth(1);
    let mut config = Config::load_or_default(config_path.as_deref())?;
    config.apply_env_overrides()?;

    init_tracing(&config);

    info!("⭐ feedback-rating v{} starting...", env!("CARGO_PKG_VERSION"));
    match config_path {
        Some(ref path) => info!("Config loaded from {}", path),
        None if std::path::Path::new(crate::config::DEFAULT_CONFIG_PATH).exists() => {
            info!("Config loaded from {}", crate::config::DEFAULT_CONFIG_PATH)
        }
        None => info!("No config file, using defaults"),
    }

    let config = Arc::new(config);

    let scorer = Arc::new(LexiconScorer::from_config(&config.sentiment)?);
    let predictor = Arc::new(RatingPredictor::new(scorer));

    let web = WebServer::new(predictor, config.clone());
    web.run().await
}

fn init_tracing(config: &Config) {
    let default_filter = if config.server.debug {
        "feedback_rating=debug,tower_http=debug"
    } else {
        "feedback_rating=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if config.logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
