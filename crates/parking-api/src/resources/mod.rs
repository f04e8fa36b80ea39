//! Resource layer: one typed client per resource family, each a thin,
//! declarative composition of a route prefix, a transport call, and a
//! hydration rule.
//!
//! The shared CRUD shape lives in [`Collection`]; the per-resource clients
//! only fix the route prefix and the element types.

pub mod lanes;
pub mod oauth2_tokens;
pub mod parking_lots;
pub mod sensor_logs;
pub mod sensors;

pub use lanes::LaneApi;
pub use oauth2_tokens::Oauth2TokenApi;
pub use parking_lots::ParkingLotApi;
pub use sensor_logs::SensorLogApi;
pub use sensors::SensorApi;

use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{Ack, Created};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Serialize an optional typed query/body into the transport's JSON form.
pub(crate) fn opt_value<T: Serialize>(value: Option<&T>) -> Result<Option<Value>> {
    Ok(value.map(serde_json::to_value).transpose()?)
}

/// A route prefix over a shared transport, supplying the uniform operation
/// set every resource client is built from.
///
/// Hydration rules are uniform: a list response must be a JSON array whose
/// elements hydrate independently (server order preserved); a get response
/// must be a JSON object; create/update/delete return the raw
/// acknowledgment shape, never a hydrated model.
#[derive(Debug, Clone)]
pub(crate) struct Collection {
    http: Arc<HttpClient>,
    base_route: &'static str,
}

impl Collection {
    pub(crate) fn new(http: Arc<HttpClient>, base_route: &'static str) -> Self {
        Self { http, base_route }
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    pub(crate) fn base_route(&self) -> &'static str {
        self.base_route
    }

    pub(crate) fn item_route(&self, id: &str) -> String {
        format!("{}/{}", self.base_route, id)
    }

    pub(crate) async fn list<T: DeserializeOwned>(&self, query: Option<Value>) -> Result<Vec<T>> {
        let res = self.http.get(self.base_route, query, false).await?;
        Ok(serde_json::from_value(res)?)
    }

    /// Relationship listing, e.g. `lanes/{id}/sensors`.
    pub(crate) async fn list_nested<T: DeserializeOwned>(
        &self,
        id: &str,
        sub_route: &str,
        query: Option<Value>,
    ) -> Result<Vec<T>> {
        let route = format!("{}/{}/{}", self.base_route, id, sub_route);
        let res = self.http.get(&route, query, false).await?;
        Ok(serde_json::from_value(res)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        let res = self.http.get(&self.item_route(id), None, false).await?;
        Ok(serde_json::from_value(res)?)
    }

    pub(crate) async fn create<B: Serialize>(&self, body: &B) -> Result<Created> {
        let body = serde_json::to_value(body)?;
        let res = self.http.post(self.base_route, Some(body), false, false).await?;
        Ok(serde_json::from_value(res)?)
    }

    pub(crate) async fn update<B: Serialize>(&self, id: &str, body: &B) -> Result<Ack> {
        let body = serde_json::to_value(body)?;
        let res = self.http.put(&self.item_route(id), Some(body), false).await?;
        Ok(serde_json::from_value(res)?)
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<Ack> {
        let res = self.http.delete(&self.item_route(id), false).await?;
        Ok(serde_json::from_value(res)?)
    }
}
