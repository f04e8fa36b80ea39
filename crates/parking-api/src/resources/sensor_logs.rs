use super::{opt_value, Collection};
use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{SensorLog, SensorLogQuery};
use std::sync::Arc;

/// Client for the sensor log resource family. Logs are written by the
/// server as uplinks arrive; the client only reads them.
#[derive(Debug, Clone)]
pub struct SensorLogApi {
    collection: Collection,
}

impl SensorLogApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self {
            collection: Collection::new(http, "/api/v1/sensorlogs"),
        }
    }

    pub async fn get_all(&self, query: Option<&SensorLogQuery>) -> Result<Vec<SensorLog>> {
        self.collection.list(opt_value(query)?).await
    }
}
