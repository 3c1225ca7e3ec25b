//! # Recipe API Relay
//!
//! Stateless relay in front of the external recipe API so browsers can call
//! it without CORS failures and without holding the API key.
//!
//! Every request under `/recipe2-api/` is forwarded to `BASE_URL` with the
//! same method, path and query. The configured key replaces any inbound
//! `Authorization` header. Upstream responses are returned untouched apart
//! from the CORS headers, including non-2xx statuses. Only a failure of the
//! relay itself produces a 500.

use anyhow::Context;
use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONNECTION,
            CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING,
        },
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::ProxyConfig;

/// Largest request body accepted for relaying
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
const ALLOWED_HEADERS: &str = "Content-Type,Authorization";

#[derive(Clone)]
pub struct ProxyState {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        // No request timeout; upstream calls wait as long as the connection allows
        let client = Client::builder()
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

/// Router for the `recipe-proxy` binary
pub fn create_proxy_router(config: &ProxyConfig) -> anyhow::Result<Router> {
    let state = ProxyState::new(config)?;

    Ok(Router::new()
        .route("/recipe2-api/", any(relay))
        .route("/recipe2-api/*path", any(relay))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn relay(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = if method == Method::GET || method == Method::HEAD {
        Ok(None)
    } else {
        json_payload(&headers, &body).map(Some)
    };
    let result = match payload {
        Ok(payload) => forward(&state, method, &uri, headers, payload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            error!("Proxy error for {}: {:#}", uri, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            )
                .into_response()
        }
    }
}

/// Outbound body for methods that carry one. JSON bodies are re-serialized;
/// anything else (including an empty body) becomes `{}`.
fn json_payload(headers: &HeaderMap, body: &Bytes) -> anyhow::Result<Vec<u8>> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.to_ascii_lowercase().contains("json"));

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(b"{}".to_vec());
    }

    let value: Value = serde_json::from_slice(body).context("request body is not valid JSON")?;
    Ok(serde_json::to_vec(&value)?)
}

async fn forward(
    state: &ProxyState,
    method: Method,
    uri: &Uri,
    mut headers: HeaderMap,
    payload: Option<Vec<u8>>,
) -> anyhow::Result<Response> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = format!("{}{}", state.base_url, path_and_query);
    info!("[proxy] {} -> {}", method, url);

    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);
    if let Some(key) = &state.api_key {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .context("API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, bearer);
    }

    let mut request = state.client.request(method, &url).headers(headers);
    if let Some(payload) = payload {
        request = request.body(payload);
    }

    let upstream = request
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;
    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let bytes = upstream
        .bytes()
        .await
        .with_context(|| format!("failed to read response from {}", url))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    for (name, value) in upstream_headers.iter() {
        // Framing is recomputed for the relayed body
        if name == TRANSFER_ENCODING || name == CONTENT_LENGTH || name == CONNECTION {
            continue;
        }
        response_headers.append(name.clone(), value.clone());
    }
    response_headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response_headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    Ok(response)
}
