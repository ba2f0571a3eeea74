// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use super::connection::accept_connection;
use crate::config::AppState;

const DRAIN_POLL: Duration = Duration::from_millis(50);
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Run the accept loop until `state.shutdown` is notified.
///
/// The listener is closed first, then active connections get up to
/// `performance.shutdown_grace` seconds to finish.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => {
                        // Usually fd exhaustion; back off instead of spinning
                        log::error!("Failed to accept connection: {e}");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                }
            }

            () = state.shutdown.notified() => {
                log::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    wait_for_connections(&state).await;
}

async fn wait_for_connections(state: &AppState) {
    let deadline = Instant::now() + state.config.performance.shutdown_grace();

    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 {
            log::info!("All connections closed");
            return;
        }
        if Instant::now() >= deadline {
            log::warn!("Shutdown grace period elapsed with {active} connection(s) still open");
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::GeoPoint;
    use crate::geocoder::{Geocode, GeocodeError};
    use crate::server::bind_listener;
    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    struct NoGeocoder;

    #[async_trait]
    impl Geocode for NoGeocoder {
        async fn lookup(&self, _address: &str) -> Result<GeoPoint, GeocodeError> {
            Err(GeocodeError::NotFound)
        }
    }

    fn state(tweak: impl FnOnce(&mut Config)) -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        tweak(&mut config);
        Arc::new(AppState::new(config, Arc::new(NoGeocoder)))
    }

    async fn get_health(addr: std::net::SocketAddr) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let state = state(|_| {});
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, Arc::clone(&state)));

        let response = get_health(addr).await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.ends_with("ok"), "{response}");

        state.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server loop stops after shutdown")
            .unwrap();
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_max_connections_rejects_extra() {
        let state = state(|c| c.performance.max_connections = Some(1));
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, Arc::clone(&state)));

        // Hold the only slot open
        let _held = tokio::net::TcpStream::connect(addr).await.unwrap();
        while state.active_connections.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let mut rejected = tokio::net::TcpStream::connect(addr).await.unwrap();
        let _ = rejected
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut buf = Vec::new();
        let read = rejected.read_to_end(&mut buf).await;
        assert!(read.is_err() || buf.is_empty());
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 1);

        state.shutdown.notify_one();
        server.abort();
    }

    #[tokio::test]
    async fn test_shutdown_grace_gives_up() {
        let state = state(|c| c.performance.shutdown_grace = 1);
        state.active_connections.fetch_add(1, Ordering::SeqCst);

        let started = Instant::now();
        wait_for_connections(&state).await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
