use events::EventPublisher;
use log::{error, info};
use service::{config::Config, logging::Logger};
use sse::{Manager, SseDomainEventHandler};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting Daylist backend [{}]", config.runtime_env());

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    // One registry per process; every stream and broadcast goes through it.
    let sse_manager = Arc::new(Manager::new());
    let event_publisher = EventPublisher::new()
        .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));

    let app_state = service::AppState::new(config, &db, sse_manager, event_publisher);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}
