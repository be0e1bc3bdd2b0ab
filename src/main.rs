use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;

use stockledger_backend::api::{AuthApi, HealthApi, LogsApi, StockApi, UsersApi};
use stockledger_backend::config::{init_logging, AppSettings};
use stockledger_backend::services::{AuthService, TokenService};
use stockledger_backend::stores::{AuditStore, CredentialStore, InventoryStore};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging();

    // Fail fast: the process must not serve with incomplete configuration.
    let settings = AppSettings::from_env().expect("Invalid configuration");

    let db = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("database migrations completed");

    let credential_store = Arc::new(CredentialStore::new(db.clone()));
    let inventory_store = Arc::new(InventoryStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db));

    // The default admin account must exist before the first request.
    credential_store
        .ensure_admin_bootstrap(&settings)
        .await
        .expect("Failed to bootstrap admin account");

    let token_service = Arc::new(TokenService::new(&settings));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&credential_store),
        Arc::clone(&token_service),
    ));

    let auth_api = AuthApi::new(Arc::clone(&auth_service), Arc::clone(&token_service));
    let users_api = UsersApi::new(
        Arc::clone(&credential_store),
        Arc::clone(&audit_store),
        Arc::clone(&auth_service),
    );
    let stock_api = StockApi::new(
        inventory_store,
        Arc::clone(&audit_store),
        Arc::clone(&auth_service),
    );
    let logs_api = LogsApi::new(audit_store, auth_service);

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, users_api, stock_api, logs_api),
        "Stock Ledger API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("starting server on http://0.0.0.0:3000");
    Server::new(TcpListener::bind("0.0.0.0:3000")).run(app).await
}
