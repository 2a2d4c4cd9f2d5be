use std::sync::Arc;
use anyhow::Context;
use tracing::info;

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use userext_server::{
    build_sqlite_url, config::Settings, connect_pool, init_tracing, policy::DaysGoodFor, routes, run_migrations,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env().context("load settings")?;
    // Costruisci l'URL del database SQLite
    let db_url = build_sqlite_url(&settings.database_url).context("build sqlite DATABASE_URL")?;
    info!("Using DATABASE_URL = {}", db_url);
    // Connetti al database
    let pool = connect_pool(&db_url).await.context("connect to sqlite")?;
    // Esegui le migrazioni del database
    run_migrations(&pool).await.context("run migrations")?;
    // Stato condiviso: gli hook "account creato" vengono registrati qui, una volta sola
    let state = Arc::new(AppState::new(pool, Arc::new(DaysGoodFor::new(settings.days_good_for))));
    info!("registration hooks: {:?}", state.hooks.names());
    let app = routes::router(state);

    info!("Listening on http://{}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .context("bind tcp listener")?;
    // Avvia il server Axum
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
