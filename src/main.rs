use anyhow::{Context, Result};
use simplytranslate_gemini::config::Config;
use simplytranslate_gemini::engines::{self, EngineRegistry};
use simplytranslate_gemini::gateway::Gateway;
use simplytranslate_gemini::gemini;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("simplytranslate_gemini=info".parse()?),
        )
        .init();

    info!("Starting SimplyTranslate gemini capsule");

    let config = Config::from_env()?;

    // Engines are fixed for the life of the process
    let client = engines::http_client(&config)?;
    let registry = EngineRegistry::new(engines::from_config(&config, client).await?)?;
    info!("Enabled engines: {}", registry.names().join(", "));

    let gateway = Gateway::new(registry, config.backend_timeout)
        .context("Failed to compile routes")?;

    let tls = gemini::load_tls_config(&config.tls_cert_file, &config.tls_key_file)?;
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    gemini::serve(listener, tls, config.hostname.clone(), Arc::new(gateway)).await
}
