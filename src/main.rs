use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use educonnect_chat::adapters::http::{app_router, NotificationHandlers};
use educonnect_chat::adapters::postgres::{
    PostgresIdentityReader, PostgresMessageStore, PostgresNotificationStore, MIGRATOR,
};
use educonnect_chat::adapters::websocket::{ChannelRegistry, RealtimeDispatcher, WebSocketState};
use educonnect_chat::adapters::JwtTokenVerifier;
use educonnect_chat::application::handlers::{
    ConnectionAuthenticator, ListUserMessagesHandler, MarkAdminMessageReadHandler,
    SendAdminMessageHandler,
};
use educonnect_chat::config::{AppConfig, LogFormat, ServerConfig};
use educonnect_chat::ports::{IdentityReader, MessageStore, NotificationStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "EduConnect chat starting"
    );

    let pool: PgPool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let identities: Arc<dyn IdentityReader> = Arc::new(PostgresIdentityReader::new(pool.clone()));
    let messages: Arc<dyn MessageStore> = Arc::new(PostgresMessageStore::new(pool.clone()));
    let notifications: Arc<dyn NotificationStore> =
        Arc::new(PostgresNotificationStore::new(pool));

    let verifier = Arc::new(JwtTokenVerifier::new(
        SecretString::new(config.auth.jwt_secret.expose_secret().clone()),
    ));
    let authenticator = ConnectionAuthenticator::new(verifier, identities.clone());

    let registry = Arc::new(ChannelRegistry::new(config.realtime.outbox_capacity));
    let moderation = Arc::new(config.realtime.moderation_filter()?);
    let dispatcher = Arc::new(RealtimeDispatcher::new(
        registry,
        messages,
        notifications.clone(),
        identities.clone(),
        moderation,
    ));

    let notification_handlers = NotificationHandlers::new(
        Arc::new(SendAdminMessageHandler::new(identities, notifications.clone())),
        Arc::new(MarkAdminMessageReadHandler::new(notifications.clone())),
        Arc::new(ListUserMessagesHandler::new(notifications)),
        dispatcher.clone(),
    );

    let app = app_router(
        WebSocketState::new(dispatcher, authenticator.clone()),
        notification_handlers,
        authenticator,
    )
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
