//! Scripted HTTP transport.
//!
//! Routes are matched by method and URL suffix. Every request is recorded on
//! arrival, before any configured delay, so tests can observe how many calls
//! reached the "network" while others are still waiting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buildlink_core::{Error, HttpMethod, HttpRequest, HttpResponse, HttpTransport, Result};
use parking_lot::Mutex;

type Responder = Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    delay: Option<Duration>,
    responder: Responder,
}

/// In-memory [`HttpTransport`] with scripted responses.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a responder for `method` requests whose URL ends with `path`.
    ///
    /// Later registrations for the same route take precedence.
    pub fn route<F>(&self, method: HttpMethod, path: &str, responder: F) -> &Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            delay: None,
            responder: Arc::new(responder),
        });
        self
    }

    /// Register a fixed JSON response.
    pub fn json(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) -> &Self {
        let bytes = body.to_string().into_bytes();
        self.route(method, path, move |_| Ok(HttpResponse::new(status, bytes.clone())))
    }

    /// Register a fixed raw-body response.
    pub fn raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        let body = body.to_string();
        self.route(method, path, move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    /// Register a transport-level failure.
    pub fn fail(&self, method: HttpMethod, path: &str, message: &str) -> &Self {
        let message = message.to_string();
        self.route(method, path, move |_| Err(Error::Transport(message.clone())))
    }

    /// Delay responses of the most recently registered matching route.
    pub fn delay(&self, method: HttpMethod, path: &str, delay: Duration) -> &Self {
        let mut routes = self.routes.lock();
        if let Some(route) = routes
            .iter_mut()
            .rev()
            .find(|r| r.method == method && r.path == path)
        {
            route.delay = Some(delay);
        }
        self
    }

    /// Number of recorded requests whose URL ends with `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.ends_with(path))
            .count()
    }

    /// All recorded requests in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request whose URL ends with `path`.
    pub fn last_request(&self, path: &str) -> Option<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|r| r.url.ends_with(path))
            .cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        let matched = {
            let routes = self.routes.lock();
            routes
                .iter()
                .rev()
                .find(|r| r.method == request.method && request.url.ends_with(&r.path))
                .map(|r| (r.delay, r.responder.clone()))
        };

        let Some((delay, responder)) = matched else {
            return Err(Error::Transport(format!(
                "No mock route for {} {}",
                request.method, request.url
            )));
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        responder(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_and_responds() {
        let mock = MockTransport::new();
        mock.json(HttpMethod::Get, "/metadata", 200, json!([]));

        let resp = mock
            .send(HttpRequest::get("http://bms.test/api/v1/metadata"))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.text(), "[]");
        assert_eq!(mock.calls("/metadata"), 1);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_transport_error() {
        let mock = MockTransport::new();
        let result = mock.send(HttpRequest::get("http://bms.test/unknown")).await;
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_latest_route_wins() {
        let mock = MockTransport::new();
        mock.raw(HttpMethod::Get, "/metadata", 500, "down");
        mock.raw(HttpMethod::Get, "/metadata", 200, "[]");

        let resp = mock
            .send(HttpRequest::get("http://bms.test/metadata"))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
    }
}
