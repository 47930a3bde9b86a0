mod config;
mod db;
mod routes;
mod rpc;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");
    tracing::info!(max_connections = config.db_max_connections, "database connection initialized");

    let _sweeper = services::session::spawn_session_sweeper(pool.clone(), config.session_sweep_secs);

    let state = state::AppState::new(pool, config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "auth server listening");
    axum::serve(listener, app).await.expect("server failed");
}
