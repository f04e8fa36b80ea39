use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{Ack, Oauth2Token, Oauth2TokenCreate};
use std::sync::Arc;

const BASE_ROUTE: &str = "/api/v1/oauth2tokens";

/// Client for OAuth2 access tokens.
///
/// These routes never carry a bearer header: `create` authenticates via
/// client credentials in a form-encoded body, and on `get`/`delete` the
/// token in the path is itself the credential.
#[derive(Debug, Clone)]
pub struct Oauth2TokenApi {
    http: Arc<HttpClient>,
}

impl Oauth2TokenApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Exchange client credentials for a new access token.
    pub async fn create(&self, body: &Oauth2TokenCreate) -> Result<Oauth2Token> {
        let body = serde_json::to_value(body)?;
        let res = self.http.post(BASE_ROUTE, Some(body), true, true).await?;
        Ok(serde_json::from_value(res)?)
    }

    pub async fn get(&self, token: &str) -> Result<Oauth2Token> {
        let route = format!("{BASE_ROUTE}/{token}");
        let res = self.http.get(&route, None, true).await?;
        Ok(serde_json::from_value(res)?)
    }

    /// Revoke a token.
    pub async fn delete(&self, token: &str) -> Result<Ack> {
        let route = format!("{BASE_ROUTE}/{token}");
        let res = self.http.delete(&route, true).await?;
        Ok(serde_json::from_value(res)?)
    }
}
