//! Stand-in Ollama server for tests.
//!
//! Serves `GET /api/tags` and `POST /api/generate` with one canned reply and
//! records every request it sees, including ones to unknown paths.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

pub use axum::http::Method;

pub enum Reply {
    Respond {
        status: u16,
        content_type: &'static str,
        body: String,
    },
    /// Accept the request, then never answer.
    Hang,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn is(&self, method: Method, path: &str) -> bool {
        self.method == method && self.path == path
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone)]
struct StubState {
    reply: Arc<Reply>,
    hits: Arc<AtomicUsize>,
    seen: mpsc::UnboundedSender<CapturedRequest>,
}

pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Mutex<mpsc::UnboundedReceiver<CapturedRequest>>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        let hits = Arc::new(AtomicUsize::new(0));
        let (seen, rx) = mpsc::unbounded_channel();

        let state = StubState {
            reply: Arc::new(reply),
            hits: hits.clone(),
            seen,
        };
        let app = Router::new()
            .route("/api/tags", get(answer))
            .route("/api/generate", post(answer))
            .fallback(unknown)
            .with_state(state);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            hits,
            requests: Mutex::new(rx),
        }
    }

    /// Base URL of an address nothing is listening on.
    pub async fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind throwaway listener");
        let addr = listener.local_addr().expect("throwaway listener address");
        drop(listener);
        format!("http://{addr}")
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The next request the server received.
    pub async fn request(&self) -> CapturedRequest {
        let mut rx = self.requests.lock().await;
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no request within 5s")
            .expect("stub server stopped")
    }

    /// Wait `window`, then report whether any request arrived.
    pub async fn was_contacted(&self, window: Duration) -> bool {
        tokio::time::sleep(window).await;
        self.hits() > 0
    }
}

fn record(state: &StubState, method: Method, uri: &Uri, body: String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let _ = state.seen.send(CapturedRequest {
        method,
        path: uri.path().to_string(),
        body,
    });
}

async fn answer(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    record(&state, method, &uri, body);
    match state.reply.as_ref() {
        Reply::Respond {
            status,
            content_type,
            body,
        } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, *content_type)], body.clone()).into_response()
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

async fn unknown(State(state): State<StubState>, method: Method, uri: Uri, body: String) -> StatusCode {
    record(&state, method, &uri, body);
    StatusCode::NOT_FOUND
}
