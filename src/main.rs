use tokio::net::TcpListener;
use wordfreq_charts::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    log::info!(
        "Starting server on {} (fetch timeout {:?}, top {})",
        server_addr,
        config.fetch_timeout,
        config.top_n
    );

    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    log::info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
