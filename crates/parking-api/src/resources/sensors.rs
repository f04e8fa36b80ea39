use super::{opt_value, Collection};
use crate::client::HttpClient;
use crate::errors::Result;
use parking_core::{
    Ack, ChirpStackUplink, Created, LoriotUplink, MachineqUplink, Sensor, SensorCreate, SensorLog,
    SensorLogQuery, SensorQuery, SensorUpdate, TtnUplink, UplinkPayload,
};
use serde::Serialize;
use std::sync::Arc;

/// Client for the sensor resource family, including uplink ingestion.
///
/// The four third-party uplink operations forward each vendor's native JSON
/// unchanged to its own sub-route; only the native format addresses a sensor
/// by id in the path.
#[derive(Debug, Clone)]
pub struct SensorApi {
    collection: Collection,
}

impl SensorApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self {
            collection: Collection::new(http, "/api/v1/sensors"),
        }
    }

    pub async fn get_all(&self, query: Option<&SensorQuery>) -> Result<Vec<Sensor>> {
        self.collection.list(opt_value(query)?).await
    }

    pub async fn create(&self, body: &SensorCreate) -> Result<Created> {
        self.collection.create(body).await
    }

    pub async fn get(&self, id: &str) -> Result<Sensor> {
        self.collection.get(id).await
    }

    pub async fn update(&self, id: &str, body: &SensorUpdate) -> Result<Ack> {
        self.collection.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack> {
        self.collection.delete(id).await
    }

    /// Submit a telemetry uplink in the service's native format.
    pub async fn uplink(&self, id: &str, body: &UplinkPayload) -> Result<Ack> {
        let route = format!("{}/uplink", self.collection.item_route(id));
        self.post_uplink(&route, body).await
    }

    /// Forward a The Things Network uplink verbatim.
    pub async fn ttn_uplink(&self, body: &TtnUplink) -> Result<Ack> {
        self.vendor_uplink("ttn", body).await
    }

    /// Forward a machineQ uplink verbatim.
    pub async fn machineq_uplink(&self, body: &MachineqUplink) -> Result<Ack> {
        self.vendor_uplink("machineq", body).await
    }

    /// Forward a LORIOT uplink verbatim.
    pub async fn loriot_uplink(&self, body: &LoriotUplink) -> Result<Ack> {
        self.vendor_uplink("loriot", body).await
    }

    /// Forward a ChirpStack uplink event verbatim.
    pub async fn chirpstack_uplink(&self, body: &ChirpStackUplink) -> Result<Ack> {
        self.vendor_uplink("chirpstack", body).await
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

    async fn vendor_uplink<B: Serialize>(&self, vendor: &str, body: &B) -> Result<Ack> {
        let route = format!("{}/uplink/{}", self.collection.base_route(), vendor);
        self.post_uplink(&route, body).await
    }

    async fn post_uplink<B: Serialize>(&self, route: &str, body: &B) -> Result<Ack> {
        let body = serde_json::to_value(body)?;
        let res = self
            .collection
            .http()
            .post(route, Some(body), false, false)
            .await?;
        Ok(serde_json::from_value(res)?)
    }
}
