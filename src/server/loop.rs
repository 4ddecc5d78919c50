// Server loop module
// Accepts connections until shutdown, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL: Duration = Duration::from_millis(50);
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Accept loop; must run inside a `LocalSet` since connections use `spawn_local`
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = signals.shutdown.notified() => break,
        }
    }

    // Stop taking new connections before waiting on the old ones
    drop(listener);
    drain_connections(&active_connections, DRAIN_GRACE).await;
    Ok(())
}

async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{config_with_dirs, TEST_PASSWORD};
    use crate::config::DeploymentMode;
    use crate::server::create_reusable_listener;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let data = tempfile::tempdir().unwrap();
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("content.json"), r#"{"title":"Fallback"}"#).unwrap();
        let cfg = config_with_dirs(data.path(), site.path(), DeploymentMode::Local);
        let state = Arc::new(AppState::new(&cfg).unwrap());

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let signals = Arc::new(SignalHandler::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(run_server(
                    listener,
                    state,
                    Arc::clone(&signals),
                ));
                let client = reqwest::Client::new();

                let saved = client
                    .put(format!("{base}/api/content"))
                    .header("x-admin-password", TEST_PASSWORD)
                    .body(r#"{"title":"Saved"}"#)
                    .send()
                    .await
                    .unwrap();
                assert_eq!(saved.status(), 200);

                let doc: serde_json::Value = client
                    .get(format!("{base}/api/content"))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                assert_eq!(doc, serde_json::json!({"title": "Saved"}));
                drop(client);

                signals.request_shutdown("test");
                let finished = tokio::time::timeout(Duration::from_secs(10), server).await;
                assert!(matches!(finished, Ok(Ok(Ok(())))));
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let active = AtomicUsize::new(0);
        tokio::time::timeout(
            Duration::from_secs(1),
            drain_connections(&active, Duration::from_secs(30)),
        )
        .await
        .unwrap();
    }
}
