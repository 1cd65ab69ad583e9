// Gateway HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer credential
// attachment and uniform status handling. Endpoint methods live in
// `crate::endpoints::*` as inherent impls to keep this module focused on
// transport mechanics.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{ApiPaths, CredentialProvider};
use crate::error::Error;
use crate::models::MessageResponse;
use crate::transport::TransportConfig;

const ERROR_PREVIEW_CHARS: usize = 200;

/// FastAPI-style error body: `{"detail": "..."}` or `{"detail": [{...}]}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the backend API.
///
/// Every request asks the injected [`CredentialProvider`] for the current
/// bearer token, and every 401 is reported back to it before the call
/// fails with [`Error::Unauthenticated`]. There is no per-call credential
/// override.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    paths: ApiPaths,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a transport config.
    pub fn new(
        base_url: Url,
        paths: ApiPaths,
        transport: &TransportConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, paths, credentials))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        paths: ApiPaths,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            base_url,
            paths,
            credentials,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured route prefixes.
    pub fn paths(&self) -> &ApiPaths {
        &self.paths
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append an absolute API path to the base URL, keeping any path the
    /// base URL already carries (e.g. a reverse-proxy mount point).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Like [`url`](Self::url), then push one percent-encoded path segment
    /// per user-supplied value (usernames, MAC addresses).
    pub(crate) fn url_with(&self, path: &str, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidRequest(format!("cannot extend URL '{path}'")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    /// Start a request with the current bearer token attached.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and classify the response status.
    ///
    /// 401 notifies the credential provider and maps to
    /// [`Error::Unauthenticated`]; any other non-2xx maps to
    /// [`Error::Api`] with the server's detail text.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        trace!(%status, "response received");

        if status == StatusCode::UNAUTHORIZED {
            debug!("backend rejected credentials (HTTP 401)");
            self.credentials.on_unauthorized();
            return Err(Error::Unauthenticated);
        }

        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        Ok(resp)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.send(self.request(Method::GET, url)).await?;
        decode(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        trace!(?params, "query parameters");
        let resp = self
            .send(self.request(Method::GET, url).query(params))
            .await?;
        decode(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.send(self.request(Method::POST, url).json(body)).await?;
        decode(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.send(self.request(Method::PUT, url).json(body)).await?;
        decode(resp).await
    }

    /// Send a bodiless request whose response is a `{message}` acknowledgement.
    pub(crate) async fn acknowledge(
        &self,
        method: Method,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<MessageResponse, Error> {
        let mut builder = self.request(method, url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let resp = self.send(builder).await?;
        decode_ack(resp).await
    }
}

// ── Response decoding ────────────────────────────────────────────────

pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// Acknowledgements are informational only: an empty or unexpected body
/// still counts as success once the status was 2xx.
pub(crate) async fn decode_ack(resp: Response) -> Result<MessageResponse, Error> {
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(MessageResponse::default());
    }
    Ok(serde_json::from_str(&body).unwrap_or_else(|_| MessageResponse {
        message: serde_json::from_str::<String>(&body).ok(),
    }))
}

async fn parse_error(status: StatusCode, resp: Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    Error::Api {
        status: status.as_u16(),
        detail: error_detail(&raw),
    }
}

/// Extract operator-facing detail from an error body.
pub(crate) fn error_detail(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    if let Ok(body) = serde_json::from_str::<ErrorBody>(raw) {
        match body.detail {
            Some(serde_json::Value::String(s)) => return Some(s),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .map(|item| {
                        item.get("msg")
                            .and_then(serde_json::Value::as_str)
                            .map_or_else(|| item.to_string(), String::from)
                    })
                    .collect();
                return Some(messages.join("; "));
            }
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
        if let Some(message) = body.message {
            return Some(message);
        }
    }

    Some(preview(raw))
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Room already exists"}"#).as_deref(),
            Some("Room already exists")
        );
    }

    #[test]
    fn detail_from_validation_list() {
        let raw = r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"},
                                 {"loc": ["body", "device_macs"], "msg": "bad mac"}]}"#;
        assert_eq!(
            error_detail(raw).as_deref(),
            Some("field required; bad mac")
        );
    }

    #[test]
    fn detail_from_message_field() {
        assert_eq!(
            error_detail(r#"{"message": "nope"}"#).as_deref(),
            Some("nope")
        );
    }

    #[test]
    fn detail_falls_back_to_truncated_body() {
        let raw = "x".repeat(500);
        assert_eq!(error_detail(&raw).map(|d| d.len()), Some(ERROR_PREVIEW_CHARS));
        assert_eq!(error_detail("   "), None);
    }
}
