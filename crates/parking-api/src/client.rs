use crate::errors::{ApiError, Result};
use log::{debug, error};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

/// Immutable connection settings, read once at startup and shared by every
/// request issued through one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

/// One HTTP exchange, described before execution. Constructed fresh per
/// call and dropped once the response is classified.
#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    route: String,
    body: Option<Value>,
    query: Option<Value>,
    skip_auth: bool,
    form_encoded: bool,
}

/// Transport layer: executes exactly one authenticated HTTP request per
/// invocation and produces a uniformly classified outcome.
///
/// The four verb entry points all funnel into [`HttpClient::perform_request`].
/// There is no retry, backoff, or timeout configuration; a single failed
/// attempt is terminal for that call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        debug!("Creating HttpClient for {}", config.base_url);
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn get(&self, route: &str, query: Option<Value>, skip_auth: bool) -> Result<Value> {
        self.perform_request(RequestSpec {
            method: Method::GET,
            route: route.to_string(),
            body: None,
            query,
            skip_auth,
            form_encoded: false,
        })
        .await
    }

    pub async fn post(
        &self,
        route: &str,
        body: Option<Value>,
        skip_auth: bool,
        form_encoded: bool,
    ) -> Result<Value> {
        self.perform_request(RequestSpec {
            method: Method::POST,
            route: route.to_string(),
            body,
            query: None,
            skip_auth,
            form_encoded,
        })
        .await
    }

    pub async fn put(&self, route: &str, body: Option<Value>, skip_auth: bool) -> Result<Value> {
        self.perform_request(RequestSpec {
            method: Method::PUT,
            route: route.to_string(),
            body,
            query: None,
            skip_auth,
            form_encoded: false,
        })
        .await
    }

    pub async fn delete(&self, route: &str, skip_auth: bool) -> Result<Value> {
        self.perform_request(RequestSpec {
            method: Method::DELETE,
            route: route.to_string(),
            body: None,
            query: None,
            skip_auth,
            form_encoded: false,
        })
        .await
    }

    /// Execute one request and classify the outcome.
    ///
    /// A status of 200 or 202 is success regardless of body shape: the body
    /// is decoded as JSON, and a non-JSON body is wrapped as
    /// `{"result": "<raw>"}` rather than failing. Any other status yields
    /// [`ApiError::Status`] with that exact code and the raw body.
    async fn perform_request(&self, spec: RequestSpec) -> Result<Value> {
        debug!(
            "{} '{}'{}{}",
            spec.method,
            spec.route,
            spec.body
                .as_ref()
                .map(|b| format!(", body: {b}"))
                .unwrap_or_default(),
            spec.query
                .as_ref()
                .map(|q| format!(", query: {q}"))
                .unwrap_or_default(),
        );

        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            spec.route.trim_start_matches('/')
        );

        let mut request = self
            .client
            .request(spec.method.clone(), &url)
            .header("Accept", "application/json")
            .header(
                "Content-Type",
                if spec.form_encoded {
                    "application/x-www-form-urlencoded"
                } else {
                    "application/json"
                },
            );

        // The OAuth2 token-creation endpoint authenticates via client
        // credentials in the body; everything else carries the bearer key.
        if !spec.skip_auth {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        if let Some(query) = &spec.query {
            request = request.query(&scalar_pairs(query));
        }

        if let Some(body) = &spec.body {
            request = if spec.form_encoded {
                request.form(&scalar_pairs(body))
            } else {
                request.json(body)
            };
        }

        let response = request.send().await.map_err(|e| {
            error!("{} request to '{}' failed: {e}", spec.method, spec.route);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let raw = response.text().await.map_err(ApiError::Transport)?;

        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            error!(
                "request replied with status code {}: {raw}",
                status.as_u16()
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        let decoded = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            // Plain-text acknowledgment bodies are tolerated, not rejected.
            Err(_) => json!({ "result": raw }),
        };
        debug!("response: {decoded}");

        Ok(decoded)
    }
}

/// Flatten a JSON object into string key/value pairs for query strings and
/// form bodies. Only scalars participate; nested values are skipped.
fn scalar_pairs(value: &Value) -> Vec<(String, String)> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
