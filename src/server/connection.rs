// Connection module
// Accepts a TCP stream, enforces the connection cap and serves HTTP/1.1 on it

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Request};
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLogEntry};

/// Accept a connection unless `max_connections` is already reached
///
/// The counter is bumped before the check so concurrent accepts cannot both
/// slip under the limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Rejected {peer_addr}"
            ));
            drop(stream);
            return;
        }
    }

    logger::log_debug(&format!("Accepted connection from {peer_addr}"));
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let perf = &state.config.performance;
        let timeout_duration = connection_timeout(perf.read_timeout, perf.write_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(perf.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| serve_request(req, peer_addr, Arc::clone(&service_state))),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {}s",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Whole-connection budget: the longer of the read and write timeouts
const fn connection_timeout(read_timeout: u64, write_timeout: u64) -> Duration {
    Duration::from_secs(if read_timeout > write_timeout {
        read_timeout
    } else {
        write_timeout
    })
}

/// Run one request through the router and write its access log line
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<hyper::Response<http_body_util::Full<hyper::body::Bytes>>, std::convert::Infallible> {
    if !state.config.logging.access_log {
        return handler::handle_request(req, state).await;
    }

    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(str::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.referer = header_string(&req, header::REFERER);
    entry.user_agent = header_string(&req, header::USER_AGENT);

    let format = state.config.logging.access_log_format.clone();
    let result = handler::handle_request(req, state).await;

    if let Ok(ref resp) = result {
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
    }
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, &format);

    result
}

fn header_string<B>(req: &Request<B>, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

const fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
}
