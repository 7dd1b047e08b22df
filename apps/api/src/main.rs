use nexen_api::{
    config::Config,
    infrastructure::{
        database::pool::create_pool,
        ml::http_ml_engine::HttpMlEngine,
        repositories::{
            sqlx_agent_log_repository::SqlxAgentLogRepository,
            sqlx_alert_repository::SqlxAlertRepository,
            sqlx_metric_definition_repository::SqlxMetricDefinitionRepository,
            sqlx_snapshot_repository::SqlxSnapshotRepository,
            sqlx_user_repository::SqlxUserRepository,
            sqlx_warehouse_repository::SqlxWarehouseRepository,
        },
        security::rate_limiter::RedisRateLimitStore,
    },
    presentation::http::{server::build_app, state::AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,nexen_api=debug,tower_http=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(config.ignore_missing_migrations);
    migrator.run(&db).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;
    let ml_engine = HttpMlEngine::new(
        &config.ml_engine_url,
        Duration::from_secs(config.ml_engine_timeout_seconds),
    )?;

    let state = AppState {
        config: config.clone(),
        rate_limiter: Arc::new(RedisRateLimitStore::new(redis)),
        warehouses: Arc::new(SqlxWarehouseRepository::new(db.clone())),
        snapshots: Arc::new(SqlxSnapshotRepository::new(db.clone())),
        definitions: Arc::new(SqlxMetricDefinitionRepository::new(db.clone())),
        alerts: Arc::new(SqlxAlertRepository::new(db.clone())),
        users: Arc::new(SqlxUserRepository::new(db.clone())),
        agent_logs: Arc::new(SqlxAgentLogRepository::new(db.clone())),
        ml_engine: Arc::new(ml_engine),
    };

    let app = build_app(state)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Nexen API listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
