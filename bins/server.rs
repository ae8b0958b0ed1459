use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn install_panic_hook(instance_id: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(%instance_id, message = %info, "unhandled panic");
    }));
}

/// Worker count: config.toml first, then TOKIO_WORKER_THREADS.
fn worker_threads() -> Option<usize> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()),
    }
}

fn build_runtime(workers: Option<usize>) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = workers {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env before the logger so RUST_LOG takes effect
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let instance_id = Uuid::new_v4();
    install_panic_hook(instance_id);

    let workers = worker_threads();
    let rt = match build_runtime(workers) {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "tokio runtime build failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        %instance_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        workers = workers.unwrap_or_default(),
        "marketplace API starting"
    );

    rt.block_on(async move {
        let server = tokio::spawn(server::run());
        tokio::select! {
            res = server => match res {
                Ok(Ok(())) => {
                    info!(%instance_id, "server stopped");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(error = %e, "server exited with error");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(error = %e, "server task panicked");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(%instance_id, "interrupt received, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
