use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use talent_core::api_paths;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::mock::MockStore;
use crate::session::{Session, Tokens};
use crate::transport::{
    Body, FilePart, HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport,
};

/// Where a response value came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Fetched::Live(v) | Fetched::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback(_))
    }
}

#[derive(Debug, Clone)]
enum Auth {
    None,
    Session,
    Bearer(String),
}

#[derive(Debug, serde::Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Backend client. Cheap to clone; clones share the session and mock data.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
    mock: MockStore,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport), session))
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        session: Session,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            session: Arc::new(session),
            mock: MockStore::seeded(jiff::Timestamp::now()),
        }
    }

    pub fn with_mock(mut self, mock: MockStore) -> Self {
        self.mock = mock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mock(&self) -> &MockStore {
        &self.mock
    }

    pub fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: impl Into<String>,
    ) -> Request<'_, T> {
        Request {
            client: self,
            method,
            path: path.into(),
            body: Ok(Body::Empty),
            fallback: None,
            auth: Auth::None,
            _response: PhantomData,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, path: impl Into<String>) -> Request<'_, T> {
        self.request(Method::Get, path)
    }

    pub fn post<T: DeserializeOwned>(&self, path: impl Into<String>) -> Request<'_, T> {
        self.request(Method::Post, path)
    }

    pub fn put<T: DeserializeOwned>(&self, path: impl Into<String>) -> Request<'_, T> {
        self.request(Method::Put, path)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: impl Into<String>) -> Request<'_, T> {
        self.request(Method::Delete, path)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Body,
        bearer: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url: self.config.url(path),
            bearer,
            body,
        };
        tracing::debug!(method = method.as_str(), path, "api request");
        self.transport.execute(request).await
    }

    /// Send once, and for session-authenticated requests answer a 401 with a
    /// single refresh and a single retry.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Body,
        auth: &Auth,
    ) -> Result<Value, ApiError> {
        let bearer = match auth {
            Auth::None => None,
            Auth::Bearer(token) => Some(token.clone()),
            Auth::Session => match self.session.access_token().await {
                Some(token) => Some(token),
                None => self.config.auth_token.clone(),
            },
        };

        let response = self.execute(method, path, body.clone(), bearer).await?;
        if response.status != 401 || !matches!(auth, Auth::Session) {
            return into_value(path, response);
        }

        tracing::info!(path, "access token rejected, refreshing");
        let token = match self.refresh().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(path, error = %e, "token refresh failed");
                self.session.expire().await;
                return Err(ApiError::SessionExpired);
            }
        };

        let retry = self.execute(method, path, body, Some(token)).await?;
        if retry.status == 401 {
            tracing::warn!(path, "retry rejected after refresh");
            self.session.expire().await;
            return Err(ApiError::SessionExpired);
        }
        into_value(path, retry)
    }

    /// Exchange the refresh token for a new access token.
    pub(crate) async fn refresh(&self) -> Result<String, ApiError> {
        let refresh_token = self
            .session
            .refresh_token()
            .await
            .ok_or(ApiError::SessionExpired)?;
        let body = Body::Json(serde_json::json!({ "refresh_token": refresh_token }));
        let response = self.execute(Method::Post, api_paths::REFRESH, body, None).await?;
        let refreshed: RefreshResponse =
            decode(api_paths::REFRESH, into_value(api_paths::REFRESH, response)?)?;

        let access_token = refreshed.access_token.clone();
        self.session
            .set_tokens(Tokens {
                access_token: refreshed.access_token,
                refresh_token: refreshed.refresh_token,
            })
            .await?;
        tracing::info!("access token refreshed");
        Ok(access_token)
    }
}

/// A pending request. Built with [`ApiClient::request`], run with
/// [`Request::send`].
#[must_use = "requests do nothing until sent"]
pub struct Request<'a, T> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    body: Result<Body, serde_json::Error>,
    fallback: Option<T>,
    auth: Auth,
    _response: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Request<'_, T> {
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = serde_json::to_value(body).map(Body::Json);
        self
    }

    pub fn file(mut self, file: FilePart) -> Self {
        self.body = Ok(Body::Multipart(file));
        self
    }

    /// Value returned when the request fails and mock fallback is enabled.
    pub fn fallback(mut self, value: T) -> Self {
        self.fallback = Some(value);
        self
    }

    pub fn fallback_opt(mut self, value: Option<T>) -> Self {
        self.fallback = value;
        self
    }

    /// Send the session's access token and refresh it on 401.
    pub fn authenticated(mut self) -> Self {
        self.auth = Auth::Session;
        self
    }

    /// Send an explicit token. No refresh is attempted.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    pub async fn send(self) -> Result<T, ApiError> {
        self.send_fetched().await.map(Fetched::into_inner)
    }

    pub async fn send_fetched(self) -> Result<Fetched<T>, ApiError> {
        let Request {
            client,
            method,
            path,
            body,
            fallback,
            auth,
            ..
        } = self;
        let body = body?;

        let outcome = client
            .dispatch(method, &path, body, &auth)
            .await
            .and_then(|value| decode(&path, value));

        match (outcome, fallback) {
            (Ok(value), _) => Ok(Fetched::Live(value)),
            (Err(e), Some(fallback)) if e.is_recoverable() && client.config.mock_fallback => {
                tracing::warn!(
                    method = method.as_str(),
                    path = %path,
                    error = %e,
                    "request failed, using mock data"
                );
                Ok(Fetched::Fallback(fallback))
            }
            (Err(e), _) => Err(e),
        }
    }
}

fn into_value(path: &str, response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            detail: error_detail(&response),
        });
    }
    if response.status == 204 || response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// The `detail` field of an error body: a message string, or a list of
/// validation errors whose messages are joined.
fn error_detail(response: &HttpResponse) -> String {
    let parsed: Option<Value> = serde_json::from_slice(&response.body).ok();
    let detail = parsed.as_ref().and_then(|v| v.get("detail"));
    match detail {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => format!("请求失败: {}", response.status),
    }
}

/// Deserialize a response. An empty body stands in for whichever empty
/// shape `T` accepts: unit, `None`, or an empty list.
fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    let empty = value.is_null();
    serde_json::from_value(value)
        .or_else(|e| {
            if empty {
                serde_json::from_value(Value::Array(Vec::new())).map_err(|_| e)
            } else {
                Err(e)
            }
        })
        .map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
}
