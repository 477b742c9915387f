use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info};
use url::Url;

use super::{AuthError, RedirectOutcome, parse_redirect};

const COMPLETE_PATH: &str = "/complete";

// The fragment never reaches a server, so the redirect page posts its own
// location back to the listener and closes itself.
const CALLBACK_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"/><title>spotlite</title></head>
<body style="font-family:sans-serif;background:#121212;color:#b3b3b3">
<p>Finishing sign in, this window will close.</p>
<script>
fetch("/complete", { method: "POST", body: window.location.href })
  .finally(() => window.close());
</script>
</body>
</html>"#;

#[derive(Clone)]
struct ListenerState {
    outcome_tx: Arc<Mutex<Option<oneshot::Sender<RedirectOutcome>>>>,
}

/// One-shot loopback server receiving the provider redirect.
pub struct RedirectListener {
    addr: SocketAddr,
    outcome_rx: oneshot::Receiver<RedirectOutcome>,
    server: JoinHandle<()>,
}

impl RedirectListener {
    pub async fn bind(redirect_uri: &Url) -> Result<Self, AuthError> {
        let host = redirect_uri
            .host_str()
            .ok_or_else(|| AuthError::InvalidRedirectUri(redirect_uri.to_string()))?;
        let port = redirect_uri
            .port_or_known_default()
            .ok_or_else(|| AuthError::InvalidRedirectUri(redirect_uri.to_string()))?;

        Self::bind_addr(&format!("{host}:{port}"), redirect_uri.path()).await
    }

    pub async fn bind_addr(addr: &str, callback_path: &str) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| AuthError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        let addr = listener.local_addr().map_err(|source| AuthError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let state = ListenerState {
            outcome_tx: Arc::new(Mutex::new(Some(outcome_tx))),
        };

        let app = Router::new()
            .route(callback_path, get(callback_page))
            .route(COMPLETE_PATH, post(complete))
            .with_state(state);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Redirect listener error: {}", e);
            }
        });

        info!("Waiting for authorization redirect on http://{}", addr);

        Ok(Self {
            addr,
            outcome_rx,
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits for the first redirect and shuts the listener down.
    pub async fn wait(self, timeout: Duration) -> Result<RedirectOutcome, AuthError> {
        let Self {
            outcome_rx, server, ..
        } = self;

        let result = tokio::time::timeout(timeout, outcome_rx).await;
        server.abort();

        match result {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(AuthError::Abandoned),
            Err(_) => Err(AuthError::Timeout),
        }
    }
}

async fn callback_page() -> Html<&'static str> {
    Html(CALLBACK_PAGE)
}

async fn complete(State(state): State<ListenerState>, href: String) -> Html<&'static str> {
    let outcome = parse_redirect(href.trim());
    debug!(authorized = matches!(outcome, RedirectOutcome::Authorized(_)), "Redirect received");

    if let Some(tx) = state.outcome_tx.lock().await.take() {
        let _ = tx.send(outcome);
    }

    Html("ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_forwarding_page_on_callback_path() {
        let listener = RedirectListener::bind_addr("127.0.0.1:0", "/callback")
            .await
            .unwrap();
        let url = format!("http://{}/callback", listener.local_addr());

        let body = reqwest::get(url).await.unwrap().text().await.unwrap();
        assert!(body.contains("window.location.href"));
        assert!(body.contains(COMPLETE_PATH));
    }

    #[tokio::test]
    async fn first_redirect_resolves_the_wait() {
        let listener = RedirectListener::bind_addr("127.0.0.1:0", "/callback")
            .await
            .unwrap();
        let complete_url = format!("http://{}{}", listener.local_addr(), COMPLETE_PATH);

        let client = reqwest::Client::new();
        client
            .post(&complete_url)
            .body("http://127.0.0.1:8888/callback#access_token=tok&token_type=Bearer&expires_in=3600")
            .send()
            .await
            .unwrap();
        client
            .post(&complete_url)
            .body("http://127.0.0.1:8888/callback#error=access_denied")
            .send()
            .await
            .unwrap();

        let outcome = listener.wait(Duration::from_secs(5)).await.unwrap();
        assert!(matches!(
            outcome,
            RedirectOutcome::Authorized(ref s) if s.access_token == "tok"
        ));
    }

    #[tokio::test]
    async fn times_out_without_redirect() {
        let listener = RedirectListener::bind_addr("127.0.0.1:0", "/callback")
            .await
            .unwrap();
        let result = listener.wait(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(AuthError::Timeout)));
    }
}
