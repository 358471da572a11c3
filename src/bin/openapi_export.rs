// Exports the OpenAPI components for problem responses
// Run with: cargo run --bin openapi_export > problem-openapi.json

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use problem_response::render::openapi::ProblemApiDoc;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let json = ProblemApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;

    info!("Exported {} bytes of OpenAPI JSON", json.len());
    println!("{}", json);
    Ok(())
}
