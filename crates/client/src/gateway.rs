//! API gateway: the only path from the console to the backend.
//!
//! Per call:
//! 1. Build the request (base URL, JSON content type, bearer token if stored).
//! 2. Send it. No response at all is `NETWORK_ERROR`.
//! 3. 401: clear the store, force the session anonymous, publish the redirect,
//!    then fail with `UNAUTHORIZED`. All of this is idempotent, so any number
//!    of concurrent 401s converge on the same state.
//! 4. 403: `FORBIDDEN`; the session is left alone.
//! 5. 5xx: `SERVER_ERROR`.
//! 6. Otherwise decode the envelope and classify (`PARSE_ERROR`, `API_ERROR`,
//!    `HTTP_ERROR`), or unwrap its `data` payload on success.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use sgms_events::{EventBus, InMemoryEventBus, SessionEvent};

use crate::context::SessionTerminator;
use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult, INVALID_RESPONSE, REQUEST_FAILED, UNEXPECTED_FORMAT};
use crate::session_store::PersistentSessionStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Bus carrying session events from the gateway and the auth service.
pub type SessionBus = InMemoryEventBus<SessionEvent>;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    public_entry: Arc<str>,
    transport: Arc<dyn HttpTransport>,
    store: PersistentSessionStore,
    terminator: SessionTerminator,
    events: Arc<SessionBus>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("public_entry", &self.public_entry)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        public_entry: &str,
        transport: Arc<dyn HttpTransport>,
        store: PersistentSessionStore,
        terminator: SessionTerminator,
        events: Arc<SessionBus>,
    ) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            public_entry: Arc::from(public_entry),
            transport,
            store,
            terminator,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.request(Method::Post, path, Some(encode(body)?)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.request(Method::Put, path, Some(encode(body)?)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.request(Method::Patch, path, Some(encode(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::Delete, path, None).await
    }

    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(self.get(path).await?)
    }

    pub async fn post_as<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.post(path, body).await?)
    }

    pub async fn put_as<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.put(path, body).await?)
    }

    pub async fn patch_as<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.patch(path, body).await?)
    }

    pub async fn delete_as<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(self.delete(path).await?)
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> ApiResult<Value> {
        self.get(crate::config::endpoints::HEALTH).await
    }

    /// Send one request and classify the outcome.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<Value> {
        let request_id = Uuid::now_v7();
        let request = self.build_request(method, path, body, request_id);

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    %method,
                    path,
                    %request_id,
                    error = %err,
                    "request did not reach the server"
                );
                return Err(ApiError::network(err.0));
            }
        };

        tracing::debug!(
            %method,
            path,
            %request_id,
            status = response.status,
            "response received"
        );
        self.classify(response)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        request_id: Uuid,
    ) -> HttpRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (REQUEST_ID_HEADER.to_string(), request_id.to_string()),
        ];

        // Absence of a credential is not an error here; the backend decides.
        if let Some(credential) = self.store.credential() {
            headers.push(("Authorization".to_string(), credential.bearer()));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        }
    }

    fn classify(&self, response: HttpResponse) -> ApiResult<Value> {
        match response.status {
            401 => {
                self.terminate_session();
                return Err(ApiError::unauthorized());
            }
            403 => return Err(ApiError::forbidden()),
            status if status >= 500 => return Err(ApiError::server(status)),
            _ => {}
        }

        if !response.is_json() {
            let message = if response.body.trim().is_empty() {
                UNEXPECTED_FORMAT.to_string()
            } else {
                response.body
            };
            return Err(ApiError::parse(message, Some(response.status)));
        }

        let raw: Value = serde_json::from_str(&response.body).map_err(|err| {
            tracing::debug!(error = %err, "response body is not valid JSON");
            ApiError::parse(UNEXPECTED_FORMAT, Some(response.status))
        })?;
        let envelope = Envelope::from_value(raw);

        if !response.is_success() {
            // Envelope wording wins over generic HTTP wording.
            return Err(match envelope.failure_message() {
                Some(message) => ApiError::api(
                    message,
                    envelope.status.unwrap_or(response.status),
                    envelope.error.clone(),
                ),
                None => ApiError::http(response.status, &response.reason),
            });
        }

        if envelope.is_failure() {
            return Err(ApiError::api(
                envelope.message.as_deref().unwrap_or(REQUEST_FAILED),
                envelope.status.unwrap_or(response.status),
                envelope.error.clone(),
            ));
        }

        Ok(envelope.into_payload())
    }

    /// Store first, broadcast second, redirect last.
    fn terminate_session(&self) {
        self.store.clear();
        let changed = self.terminator.force_anonymous();
        if changed {
            tracing::info!("credential rejected by backend; session terminated");
        }

        if let Err(err) = self
            .events
            .publish(SessionEvent::terminated(&*self.public_entry))
        {
            tracing::warn!(error = ?err, "failed to publish session termination");
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|err| {
        tracing::warn!(error = %err, "request body could not be serialized");
        ApiError::parse(format!("Request body could not be encoded: {err}"), None)
    })
}

fn decode<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
    serde_json::from_value(payload).map_err(|err| {
        tracing::debug!(error = %err, "payload does not match the expected shape");
        ApiError::parse(INVALID_RESPONSE, None)
    })
}
