mod config;
mod db;
mod errors;
mod generation;
mod ingest;
mod models;
mod records;
mod routes;
mod state;
mod storage;
mod templates;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, S3Config};
use crate::db::create_pool;
use crate::generation::profile::OrganizationProfile;
use crate::generation::renderer::ResolutionRenderer;
use crate::ingest::session::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::local::LocalOutputStore;
use crate::storage::s3::S3OutputStore;
use crate::storage::OutputStore;
use crate::templates::defaults::seed_default_templates;
use crate::templates::postgres::PgTemplateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resolutions API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations) and seed templates on first start
    let db = create_pool(&config.database_url).await?;
    let seeded = seed_default_templates(&db).await?;
    if seeded == 0 {
        info!("Resolution templates already present");
    }

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Output store: S3 / MinIO when configured, local directory otherwise
    let output: Arc<dyn OutputStore> = match &config.s3 {
        Some(s3_config) => {
            let client = build_s3_client(s3_config).await;
            info!("S3 output store initialized (bucket: {})", s3_config.bucket);
            Arc::new(S3OutputStore::new(client, s3_config.bucket.clone()))
        }
        None => Arc::new(LocalOutputStore::open(&config.generated_dir).await?),
    };

    let profile = load_profile(&config)?;
    info!(
        "Organization profile: {} ({}), writing {:?}",
        profile.center_line, profile.city, config.output_format
    );

    // Build app state
    let state = AppState {
        db: db.clone(),
        sessions: SessionStore::new(redis),
        templates: Arc::new(PgTemplateStore::new(db)),
        renderer: ResolutionRenderer::new(Arc::new(profile), output.clone())
            .with_format(config.output_format),
        output,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Defaults, then the optional JSON file, then single-field env overrides.
fn load_profile(config: &Config) -> Result<OrganizationProfile> {
    let profile = match &config.organization_profile {
        Some(path) => OrganizationProfile::from_json_file(path)
            .context("ORGANIZATION_PROFILE could not be loaded")?,
        None => OrganizationProfile::default(),
    };
    Ok(profile.with_overrides(
        config.city.clone(),
        config.signatory_name.clone(),
        config.signatory_title.clone(),
    ))
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "resolutions-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
