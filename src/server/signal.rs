// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) both request a graceful shutdown: the accept
// loop stops and in-flight connections get a grace period to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown notification shared between the signal task and the accept loop
pub struct SignalHandler {
    pub shutdown: Notify,
    requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            requested: AtomicBool::new(false),
        }
    }

    /// Ask the accept loop to stop; only the first call has any effect
    pub fn request_shutdown(&self, reason: &str) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            logger::log_info(&format!("[Signal] {reason} received, shutting down"));
            // `notify_one` keeps a permit if the loop is not waiting yet
            self.shutdown.notify_one();
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the task that turns SIGTERM/SIGINT into a shutdown request
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => handler.request_shutdown("SIGTERM"),
            _ = sigint.recv() => handler.request_shutdown("SIGINT"),
        }
    });
}

/// Non-Unix fallback: Ctrl+C only
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => handler.request_shutdown("Ctrl+C"),
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
}
