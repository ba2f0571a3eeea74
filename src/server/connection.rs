// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing `performance.max_connections`.
///
/// Connections above the cap are closed immediately.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    // Increment first, then check, so concurrent accepts cannot both slip under the cap
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            log::warn!("Max connections reached: {prev_count}/{max_conn}. Connection rejected.");
            drop(stream);
            return;
        }
    }

    log::debug!("Accepted connection from {peer_addr}");
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve one connection in a spawned task.
///
/// The connection is HTTP/1.1 with keep-alive per `performance.keep_alive`,
/// bounded by `performance.read_timeout`. Dropping it on timeout or client
/// disconnect drops any in-flight handler future as well.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = state.config.performance.read_timeout();

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                log::debug!(
                    "Connection from {peer_addr} closed after {} seconds",
                    timeout_duration.as_secs()
                );
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
