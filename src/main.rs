//! CoCon Vote Monitor - server entry point
//!
//! Follows the CoCon room server and serves the vote board plus the `/ws`
//! snapshot stream.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;

use vote_monitor::api::{create_router, AppState};
use vote_monitor::cocon::worker;
use vote_monitor::{MonitorConfig, MonitorResult, Snapshot};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MonitorResult<()> {
    let config = MonitorConfig::from_env()?;
    log::info!(
        "{} v{}: CoCon at {}:{}, room {:?}",
        vote_monitor::NAME,
        vote_monitor::VERSION,
        config.cocon_host,
        config.cocon_port,
        config.room_name
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        log::info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    })?;

    let state = Arc::new(AppState::new(Snapshot::default()));
    let worker = tokio::spawn(worker::run(
        config.clone(),
        state.clone(),
        shutdown_rx.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("Serving vote board on http://{}", config.bind);

    let mut server_shutdown = shutdown_rx;
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    if let Err(e) = worker.await {
        log::error!("CoCon worker panicked: {}", e);
    }
    Ok(())
}
