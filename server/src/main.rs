use anyhow::Context;
use std::env;
use std::sync::Arc;
use tastecheck_server::config::ServerConfig;
use tastecheck_server::media_store::{HttpMediaStore, MediaStore, NoopMediaStore};
use tastecheck_server::{api, build_router, db, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("failed to render OpenAPI document")?;
        println!("{}", spec);
        return Ok(());
    }

    telemetry::init_telemetry();

    let config = ServerConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.pool_size)?;

    let media: Arc<dyn MediaStore> = match &config.media_store {
        Some(store) => {
            tracing::info!(api = %store.api_base_url, "media cleanup enabled");
            Arc::new(HttpMediaStore::new(store))
        }
        None => {
            tracing::info!("MEDIA_API_BASE_URL not set, media cleanup disabled");
            Arc::new(NoopMediaStore)
        }
    };

    let app = build_router(AppState {
        pool: Arc::new(pool),
        media,
        write_timeout: config.write_timeout,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
