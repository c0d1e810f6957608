//! # Redirect Listener
//!
//! Loopback HTTP server that stands in for the in-app web view. The user
//! completes payment in a browser; the payment page redirects to
//! `/payment/success` or `/payment/failed` and the waiting command picks
//! up the resulting [`Route`].

use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use wash_core::{Language, Route};

/// Running redirect listener
#[derive(Debug)]
pub struct RedirectListener {
    addr: SocketAddr,
    outcomes: mpsc::Receiver<Route>,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<()>,
}

impl RedirectListener {
    /// Bind `addr` and start serving. Port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, language: Language) -> anyhow::Result<Self> {
        let (tx, outcomes) = mpsc::channel(1);
        let app = create_router(AppState::new(tx, language));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!("redirect listener failed: {}", e);
            }
        });

        info!("Redirect listener on http://{}", addr);
        Ok(Self {
            addr,
            outcomes,
            shutdown: Some(shutdown_tx),
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn success_url(&self) -> String {
        format!("http://{}/payment/success", self.addr)
    }

    pub fn failure_url(&self) -> String {
        format!("http://{}/payment/failed", self.addr)
    }

    /// First redirect outcome, or `None` after `timeout`
    pub async fn wait(&mut self, timeout: Duration) -> Option<Route> {
        match tokio::time::timeout(timeout, self.outcomes.recv()).await {
            Ok(route) => route,
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "no payment redirect received");
                None
            }
        }
    }

    /// Stop serving and wait for the server task
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.server).await {
            error!("redirect listener task failed: {}", e);
        }
        debug!("redirect listener stopped");
    }
}

impl Drop for RedirectListener {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.server.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bind() -> RedirectListener {
        RedirectListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)), Language::En)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_redirect_resolves_orders() {
        let mut listener = bind().await;
        assert_ne!(listener.local_addr().port(), 0);

        let body = reqwest::get(listener.success_url()).await.unwrap().text().await.unwrap();
        assert!(body.contains("Payment completed"));

        assert_eq!(listener.wait(Duration::from_secs(2)).await, Some(Route::Orders));
        listener.shutdown().await;
    }

    #[tokio::test]
    async fn test_failure_redirect() {
        let mut listener = bind().await;

        reqwest::get(listener.failure_url()).await.unwrap();

        assert_eq!(listener.wait(Duration::from_secs(2)).await, Some(Route::PaymentFailed));
        listener.shutdown().await;
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let mut listener = bind().await;
        assert_eq!(listener.wait(Duration::from_millis(50)).await, None);
        listener.shutdown().await;
    }
}
