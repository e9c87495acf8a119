//! Mock HTTP client for testing.
//!
//! Responses can be fixed per URL, scripted as a FIFO sequence per URL, or
//! computed from the incoming request. A URL can also be held behind a
//! gate so a test can observe what happens while that call is in flight.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::traits::{Headers, HttpClient, HttpError, Method, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Value of the `Authorization` header, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get("Authorization").map(String::as_str)
    }

    /// Bearer credential carried by the request, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.authorization()
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Fail at the transport level
    Error(HttpError),
}

impl MockResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_value(status, &value))
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// Handle to a held URL. Dropping it does not release the gate.
#[derive(Debug, Clone)]
pub struct MockGate {
    semaphore: Arc<Semaphore>,
}

impl MockGate {
    /// Let every held and future request through.
    pub fn release(&self) {
        self.semaphore.close();
    }
}

/// Mock HTTP client for testing.
///
/// Resolution order for a request: handler, then the scripted queue,
/// then the fixed response, then the default.
///
/// # Example
///
/// ```ignore
/// use tripkit::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response("http://api/users/profile", MockResponse::json(401, json!({"msg": "Token has expired"})));
/// client.push_response("http://api/users/profile", MockResponse::json(200, json!({"id": 1})));
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    scripted: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    handlers: Arc<Mutex<HashMap<String, Handler>>>,
    gates: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("requests", &self.requests.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            scripted: Arc::new(Mutex::new(HashMap::new())),
            handlers: Arc::new(Mutex::new(HashMap::new())),
            gates: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer `url` with `response`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Append a one-shot response for `url`. Scripted responses are
    /// consumed in order before the fixed response applies.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.scripted
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Compute the response for `url` from the request itself.
    pub fn set_handler<F>(&self, url: &str, handler: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::new(handler));
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Hold requests to `url` (after recording them) until the returned
    /// gate is released.
    pub fn hold(&self, url: &str) -> MockGate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(url.to_string(), semaphore.clone());
        MockGate { semaphore }
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests to a single URL, in arrival order.
    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn resolve(&self, request: &RecordedRequest) -> Option<MockResponse> {
        let handler = self.handlers.lock().unwrap().get(&request.url).cloned();
        if let Some(handler) = handler {
            return Some(handler(request));
        }

        if let Some(queue) = self.scripted.lock().unwrap().get_mut(&request.url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        if let Some(response) = self.responses.lock().unwrap().get(&request.url) {
            return Some(response.clone());
        }

        self.default_response.lock().unwrap().clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let request = RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        };
        self.record_request(request.clone());

        let gate = self.gates.lock().unwrap().get(url).cloned();
        if let Some(gate) = gate {
            // A closed semaphore means the gate was released.
            let _ = gate.acquire().await;
        }

        match self.resolve(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
