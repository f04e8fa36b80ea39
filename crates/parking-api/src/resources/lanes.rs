use super::{opt_value, Collection};
use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{
    Ack, Created, Lane, LaneCreate, LaneUpdate, Sensor, SensorLog, SensorLogQuery, SensorQuery,
};
use std::sync::Arc;

/// Client for the lane resource family.
#[derive(Debug, Clone)]
pub struct LaneApi {
    collection: Collection,
}

impl LaneApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self {
            collection: Collection::new(http, "/api/v1/lanes"),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Lane>> {
        self.collection.list(None).await
    }

    pub async fn create(&self, body: &LaneCreate) -> Result<Created> {
        self.collection.create(body).await
    }

    pub async fn get(&self, id: &str) -> Result<Lane> {
        self.collection.get(id).await
    }

    pub async fn update(&self, id: &str, body: &LaneUpdate) -> Result<Ack> {
        self.collection.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack> {
        self.collection.delete(id).await
    }

    /// The lane's front and back sensors.
    pub async fn get_sensors(&self, id: &str, query: Option<&SensorQuery>) -> Result<Vec<Sensor>> {
        self.collection
            .list_nested(id, "sensors", opt_value(query)?)
            .await
    }

    pub async fn get_sensor_logs(
        &self,
        id: &str,
        query: Option<&SensorLogQuery>,
    ) -> Result<Vec<SensorLog>> {
        self.collection
            .list_nested(id, "sensorlogs", opt_value(query)?)
            .await
    }
}
