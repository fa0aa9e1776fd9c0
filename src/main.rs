//! Dribbble gallery server
//!
//! - `GET /` gallery (or the "Integrate" button) and OAuth redirect-back
//! - `GET /authorize` redirect to Dribbble
//! - `POST /api/token` code exchange
//! - `GET /api/shots` single page of shots
//! - `POST /account/remove` drop the session cookie

use dribbble_gallery::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; real deployments set the variables directly
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for production, pretty (or unset) for development
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dribbble_gallery=info,tower_http=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(log_format = %log_format, "Starting Dribbble gallery");

    let config = Config::from_env_or_file()?;
    info!(
        per_page = config.per_page,
        sealed_cookie = config.cookie_key.is_some(),
        "Configuration loaded"
    );
    if config.cookie_key.is_none() {
        info!("COOKIE_KEY not set, token cookie is stored unencrypted");
    }

    dribbble_gallery::run_server(&config).await?;

    Ok(())
}
