use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};

use crate::{api, error::ServerError, types::CallbackParams};

/// Hands the first callback to whoever waits on the server.
pub type CallbackSender = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Local HTTP endpoint the authorization server redirects the browser to.
///
/// Lives only for one authorization round trip: it stops after the first
/// callback or when the timeout expires.
pub struct CallbackServer {
    listener: TcpListener,
    path: String,
}

impl CallbackServer {
    pub async fn bind(addr: SocketAddr, path: &str) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
        Ok(CallbackServer {
            listener,
            path: path.to_string(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Bind)
    }

    pub async fn wait(self, timeout: Duration) -> Result<CallbackParams, ServerError> {
        let (callback_tx, callback_rx) = oneshot::channel();
        let sender: CallbackSender = Arc::new(Mutex::new(Some(callback_tx)));
        let app = router(&self.path, sender);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let received = tokio::time::timeout(timeout, callback_rx).await;

        let _ = shutdown_tx.send(());
        // Idle keep-alive connections must not hold the CLI hostage.
        let _ = tokio::time::timeout(Duration::from_secs(2), server).await;

        match received {
            Ok(Ok(params)) => Ok(params),
            Ok(Err(_)) => Err(ServerError::Closed),
            Err(_) => Err(ServerError::Timeout(timeout)),
        }
    }
}

pub fn router(callback_path: &str, sender: CallbackSender) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::callback).layer(Extension(sender)))
}
