//! Gatherly community events service
//!
//! Main application entry point

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use gatherly::{
    config::Settings,
    database::{self, Database},
    routes::create_routes,
    services::ServiceFactory,
    state::AppState,
    utils::logging,
    AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().map_err(|e| AppError::Config(e.to_string()))?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting gatherly...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::DatabaseConfig::from_settings(&settings.database);
    let pool = database::create_pool(&db_config).await?;

    // Run database migrations
    database::run_migrations(&pool).await?;

    let db = Database::new(pool);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, db.clone())?;

    let state = AppState::new(settings.clone(), db, services);
    let app = create_routes(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    info!("Server listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("gatherly has shut down.");
    Ok(())
}
