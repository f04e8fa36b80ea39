use super::{opt_value, Collection};
use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{
    Ack, Created, Lane, ParkingLot, ParkingLotCreate, ParkingLotUpdate, Sensor, SensorLog,
    SensorLogQuery, SensorQuery,
};
use std::sync::Arc;

/// Client for the parking lot resource family.
#[derive(Debug, Clone)]
pub struct ParkingLotApi {
    collection: Collection,
}

impl ParkingLotApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self {
            collection: Collection::new(http, "/api/v1/parkinglots"),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<ParkingLot>> {
        self.collection.list(None).await
    }

    pub async fn create(&self, body: &ParkingLotCreate) -> Result<Created> {
        self.collection.create(body).await
    }

    pub async fn get(&self, id: &str) -> Result<ParkingLot> {
        self.collection.get(id).await
    }

    pub async fn update(&self, id: &str, body: &ParkingLotUpdate) -> Result<Ack> {
        self.collection.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack> {
        self.collection.delete(id).await
    }

    /// Sensors installed in this lot.
    pub async fn get_sensors(&self, id: &str, query: Option<&SensorQuery>) -> Result<Vec<Sensor>> {
        self.collection
            .list_nested(id, "sensors", opt_value(query)?)
            .await
    }

    /// Counting lanes attached to this lot.
    pub async fn get_lanes(&self, id: &str) -> Result<Vec<Lane>> {
        self.collection.list_nested(id, "lanes", None).await
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
