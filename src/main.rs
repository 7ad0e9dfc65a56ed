use std::sync::Arc;

use portal_nav::{
    AppConfig, Env, HttpPrincipalClient, InMemoryTokenStore, create_guard,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// A host harness for the navigation core: it wires the real HTTP principal
/// client, seeds an optional token from the environment, and replays the
/// navigation targets given on the command line, logging every decision.
/// Useful for exercising the guard against a live backend without a browser.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portal_nav=debug".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for centralized log aggregation.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Navigation harness starting in {:?} mode", config.env);
    tracing::info!("Principal endpoint: {}{}", config.api_base_url, config.info_path);

    // 4. Collaborator Assembly
    // The token would normally come from cookie storage; the harness takes
    // it from the environment instead.
    let tokens = Arc::new(InMemoryTokenStore::new(std::env::var("PORTAL_TOKEN").ok()));
    let client = Arc::new(HttpPrincipalClient::new(&config));

    let mut state = create_guard(tokens, client);

    // 5. Replay the requested navigations.
    let targets: Vec<String> = std::env::args().skip(1).collect();
    if targets.is_empty() {
        tracing::warn!("no navigation targets given; try: portal-nav /user/dashboard");
        return;
    }

    for target in targets {
        match state.driver.navigate(&target).await {
            Ok(route) => {
                tracing::info!(requested = %target, rendered = %route.path, title = %route.title, "navigation complete");
            }
            Err(e) => {
                tracing::error!(requested = %target, error = %e, "navigation failed");
            }
        }
    }
}
