//! A stand-in for the YouTube Data API that tests can point a client at.

use http_body_util::Full;
use hyper::body::{self, Bytes};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

/// A request the mock server received.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub(crate) endpoint: String,
    pub(crate) query: HashMap<String, String>,
}

/// An http1 server on a random local port that answers every request through a handler.
///
/// The handler gets the endpoint name (the last path segment, e.g. `videos`) and the decoded
/// query string. The server lives until the test's runtime shuts down.
pub(crate) struct MockApi {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub(crate) fn json_response(value: serde_json::Value) -> (StatusCode, String) {
    (StatusCode::OK, value.to_string())
}

impl MockApi {
    pub(crate) async fn start<H>(handler: H) -> Self
    where
        H: Fn(&str, &HashMap<String, String>) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let socket = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to localhost");
        let addr = socket.local_addr().expect("get local address");
        let handler = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((conn, _)) = socket.accept().await {
                let conn = hyper_util::rt::TokioIo::new(conn);
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                let service = service_fn(move |req: Request<body::Incoming>| {
                    let endpoint = req
                        .uri()
                        .path()
                        .rsplit('/')
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    let query: HashMap<String, String> =
                        form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
                            .into_owned()
                            .collect();
                    let (status, body) = handler(&endpoint, &query);
                    recorded
                        .lock()
                        .expect("poisoned")
                        .push(Recorded { endpoint, query });
                    let mut response = Response::new(Full::<Bytes>::from(body));
                    *response.status_mut() = status;
                    async move { Ok::<_, Infallible>(response) }
                });
                tokio::spawn(async move {
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(conn, service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/youtube/v3"),
            requests,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every request served so far, oldest first.
    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("poisoned").clone()
    }
}
