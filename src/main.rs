use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use file_explainer::{router, session::run_sweeper, AppState, Config, GeminiExplainer};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::parse();
    let policy = cfg.policy();
    if policy.intake_exceeds_submission() {
        warn!(
            max_size_mb = policy.max_size_mb,
            submission_limit_mb = policy.submission_limit_mb,
            "files accepted into a selection can exceed the submission limit; \
             such submissions will be refused"
        );
    }

    let explainer = GeminiExplainer::new(cfg.api_key.clone())
        .with_model(cfg.model.clone())
        .with_base_url(cfg.api_base_url.clone());

    let state = AppState::new(policy, Arc::new(explainer), cfg.progress_interval());
    tokio::spawn(run_sweeper(Arc::clone(&state.sessions), cfg.session_ttl()));

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&cfg.listen).await?;

    info!(listen = %cfg.listen, model = %cfg.model, "server running");

    axum::serve(listener, app).await?;
    Ok(())
}
