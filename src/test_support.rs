//! Local HTTP servers standing in for the external services in tests

use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind an ephemeral port on the loopback interface
pub async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Serve `router` on an already bound listener in the background
pub fn serve_router(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

/// Serve `router` on a fresh local port
pub async fn spawn_router(router: Router) -> SocketAddr {
    let (listener, addr) = bind_local().await;
    serve_router(listener, router);
    addr
}

/// Accept connections but never answer them; the counter tracks accepted connections
pub async fn spawn_silent_server() -> (SocketAddr, Arc<AtomicU32>) {
    let (listener, addr) = bind_local().await;
    let accepted = Arc::new(AtomicU32::new(0));
    let counter = accepted.clone();

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            open.push(socket);
        }
    });

    (addr, accepted)
}
