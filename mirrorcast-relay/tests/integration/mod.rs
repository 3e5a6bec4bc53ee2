pub mod protocol_tests;

use mirrorcast_relay::{RelayService, router};
use std::net::SocketAddr;
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Bind the relay on an ephemeral local port and serve it in the
/// background. The returned service handle shares state with the
/// server, so tests can assert on the registry directly.
pub async fn spawn_relay() -> (SocketAddr, RelayService) {
    let service = RelayService::new();
    let app = router(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind relay listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, service)
}
