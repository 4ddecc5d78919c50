use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;
mod storage;
mod upload;

const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let addr = cfg.get_socket_addr()?;
    if cfg.server.mode == config::DeploymentMode::Local {
        tokio::fs::create_dir_all(cfg.storage.uploads_dir()).await?;
    }

    let state = Arc::new(config::AppState::new(&cfg)?);
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    if cfg.uses_default_password() {
        logger::log_warning(
            "Using the default admin password; set ADMIN_PASSWORD before exposing this server",
        );
    }
    logger::log_info(&format!("Content storage: {}", state.content.describe()));
    logger::log_info(&format!("Image uploads: {}", state.assets.describe()));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(listener, state, signals))
        .await?;

    logger::log_info("Server stopped");
    Ok(())
}
