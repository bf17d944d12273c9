use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use poducate::{
    database::{Database, Datastore},
    generation::{PipelineSettings, PodcastPipeline},
    library::SessionStore,
    llm::openai::openai::OpenAI,
    router,
    speech::elevenlabs::elevenlabs::ElevenLabs,
    trace::init_tracing_subscriber,
    AppState, Config, Tutor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = Config::load().context("Cannot load config")?;

    let _guard = init_tracing_subscriber(&config.otel_http_url)?;
    config.log_credentials();

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Cannot build HTTP client")?;

    let openai = Arc::new(OpenAI::new(
        client.clone(),
        config.openai_api_key.clone(),
        &config.openai_base_url,
        &config.openai_model,
    ));
    let elevenlabs = Arc::new(ElevenLabs::new(
        client,
        config.elevenlabs_api_key.clone(),
        &config.elevenlabs_base_url,
    ));

    let datastore: Option<Arc<dyn Datastore>> = match &config.redis_url {
        Some(url) => Some(Arc::new(Database::connect(url).context("Invalid redis_url")?)),
        None => {
            warn!("redis_url is not set, /test-db will report the datastore as unavailable");
            None
        }
    };

    let state = AppState {
        pipeline: Arc::new(PodcastPipeline::new(
            openai.clone(),
            elevenlabs,
            PipelineSettings::from_config(&config),
        )),
        tutor: Arc::new(Tutor::new(openai, config.tutor_max_tokens)),
        sessions: Arc::new(SessionStore::new(config.session_capacity)?),
        datastore,
        timeout: config.request_timeout(),
    };

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Cannot bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
