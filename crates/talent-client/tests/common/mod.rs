#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use talent_client::ApiClient;
use talent_client::config::ClientConfig;
use talent_client::error::ApiError;
use talent_client::mock::MockStore;
use talent_client::session::{Session, Tokens};
use talent_client::transport::{BoxFuture, HttpRequest, HttpResponse, HttpTransport};

/// Replays canned outcomes in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.outcomes.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Transport(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, ApiError>> {
        self.requests.lock().unwrap().push(request);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())));
        Box::pin(async move { outcome })
    }
}

/// Answers each request from its content rather than its position, after
/// yielding once so concurrent callers interleave.
pub struct RoutedTransport<F> {
    route: F,
    requests: Mutex<Vec<HttpRequest>>,
}

impl<F> RoutedTransport<F>
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    pub fn new(route: F) -> Arc<Self> {
        Arc::new(Self {
            route,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl<F> HttpTransport for RoutedTransport<F>
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, ApiError>> {
        let response = (self.route)(&request);
        self.requests.lock().unwrap().push(request);
        Box::pin(async move {
            tokio::task::yield_now().await;
            Ok(response)
        })
    }
}

pub fn reply(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.as_bytes().to_vec(),
    }
}

pub fn config(mock_fallback: bool) -> ClientConfig {
    ClientConfig {
        api_base: "http://api.test".to_string(),
        mock_fallback,
        ..ClientConfig::default()
    }
}

pub fn client(transport: &Arc<ScriptedTransport>, mock_fallback: bool) -> ApiClient {
    ApiClient::with_transport(config(mock_fallback), transport.clone(), Session::in_memory())
        .with_mock(MockStore::seeded(jiff::Timestamp::now()))
}

pub async fn logged_in(transport: &Arc<ScriptedTransport>, refresh: Option<&str>) -> ApiClient {
    let client = client(transport, false);
    client
        .session()
        .set_tokens(Tokens {
            access_token: "access-1".to_string(),
            refresh_token: refresh.map(str::to_string),
        })
        .await
        .unwrap();
    client
}
