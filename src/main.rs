use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resq_core::config::{assessment_timeout_from_env_value, hospitals_file_from_env_value};
use resq_core::{Assessor, CoreConfig, DispatchCenter, HeuristicAssessor, Location};
use resq_gemini::{GeminiAssessor, GeminiConfig};

/// Main entry point for the ResQ coordination server
///
/// Resolves configuration from the environment, picks an assessor and serves the REST API.
///
/// # Environment Variables
/// - `RESQ_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RESQ_HOSPITALS_FILE`: YAML hospital seed (default: built-in demonstration network)
/// - `RESQ_ASSESSMENT_TIMEOUT_SECS`: assessor timeout in seconds (default: 20)
/// - `GEMINI_API_KEY`: enables the Gemini assessor; without it the offline heuristic is used
/// - `GEMINI_MODEL`: Gemini model identifier (default: "gemini-1.5-flash")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("resq=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RESQ_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        assessment_timeout_from_env_value(std::env::var("RESQ_ASSESSMENT_TIMEOUT_SECS").ok())?,
        hospitals_file_from_env_value(std::env::var("RESQ_HOSPITALS_FILE").ok()),
        Location::default(),
    )?);

    let assessor = assessor_from_env();
    let dispatch = Arc::new(DispatchCenter::from_config(cfg, assessor)?);

    api_rest::serve(&rest_addr, dispatch).await?;

    Ok(())
}

fn assessor_from_env() -> Arc<dyn Assessor> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    match api_key {
        Some(key) => {
            let mut config = GeminiConfig::new(key);
            if let Some(model) = std::env::var("GEMINI_MODEL").ok().filter(|m| !m.trim().is_empty()) {
                config = config.with_model(model.trim().to_string());
            }
            let assessor = GeminiAssessor::new(config);
            tracing::info!(model = assessor.model(), "using Gemini assessor");
            Arc::new(assessor)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; using offline heuristic assessor");
            Arc::new(HeuristicAssessor::new())
        }
    }
}
