use std::sync::Arc;

use auth::Authenticator;
use incident_service::config::Config;
use incident_service::config::StoreBackend;
use incident_service::domain::incident::ports::IncidentServicePort;
use incident_service::domain::incident::service::IncidentService;
use incident_service::domain::user::ports::AuthServicePort;
use incident_service::domain::user::service::AuthService;
use incident_service::inbound::http::router::create_router;
use incident_service::outbound::repositories::InMemoryIncidentRepository;
use incident_service::outbound::repositories::InMemoryUserRepository;
use incident_service::outbound::repositories::PostgresIncidentRepository;
use incident_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "incident-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        store_backend = ?config.store.backend,
        users_table = %config.store.users_table,
        incidents_table = %config.store.incidents_table,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));

    let (auth_service, incident_service): (Arc<dyn AuthServicePort>, Arc<dyn IncidentServicePort>) =
        match config.store.backend {
            StoreBackend::Postgres => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(&config.database.url)
                    .await?;
                tracing::info!(
                    max_connections = config.database.max_connections,
                    database = "postgresql",
                    "Database connection pool created"
                );

                let user_repository = Arc::new(PostgresUserRepository::new(
                    pg_pool.clone(),
                    config.store.users_table.clone(),
                ));
                let incident_repository = Arc::new(PostgresIncidentRepository::new(
                    pg_pool,
                    config.store.incidents_table.clone(),
                ));

                user_repository.ensure_schema().await?;
                incident_repository.ensure_schema().await?;
                tracing::info!(database = "postgresql", "Database schema ready");

                let auth_service: Arc<dyn AuthServicePort> =
                    Arc::new(AuthService::new(user_repository, Arc::clone(&authenticator)));
                let incident_service: Arc<dyn IncidentServicePort> =
                    Arc::new(IncidentService::new(incident_repository));

                (auth_service, incident_service)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");

                let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::clone(&authenticator),
                ));
                let incident_service: Arc<dyn IncidentServicePort> = Arc::new(
                    IncidentService::new(Arc::new(InMemoryIncidentRepository::new())),
                );

                (auth_service, incident_service)
            }
        };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, incident_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
