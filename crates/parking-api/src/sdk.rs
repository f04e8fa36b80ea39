use crate::client::{ClientConfig, HttpClient};
use crate::resources::{LaneApi, Oauth2TokenApi, ParkingLotApi, SensorApi, SensorLogApi};
use std::sync::Arc;

/// One client per resource family, all sharing a single transport instance.
///
/// Every operation is a stateless request/response exchange on `&self`;
/// callers may issue operations concurrently or sequence them by awaiting
/// each result before using it in the next call.
#[derive(Debug, Clone)]
pub struct Api {
    pub parking_lots: ParkingLotApi,
    pub lanes: LaneApi,
    pub sensors: SensorApi,
    pub sensor_logs: SensorLogApi,
    pub oauth2_tokens: Oauth2TokenApi,
}

impl Api {
    pub fn new(config: ClientConfig) -> Self {
        let http = Arc::new(HttpClient::new(config));

        Self {
            parking_lots: ParkingLotApi::new(http.clone()),
            lanes: LaneApi::new(http.clone()),
            sensors: SensorApi::new(http.clone()),
            sensor_logs: SensorLogApi::new(http.clone()),
            oauth2_tokens: Oauth2TokenApi::new(http),
        }
    }
}
