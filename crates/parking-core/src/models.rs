use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-ground or surface-mount occupancy sensor as the server reports it.
///
/// Every field is optional: the server owns the schema, and a model is just
/// the projection of the fields this client knows about. Fields absent from
/// the response stay `None`; fields this struct does not declare are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parking_lot_id: Option<String>,
    pub mode: Option<String>,
    pub status: Option<i64>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub rssi: Option<i64>,
    pub snr: Option<f64>,
    pub server_time: Option<DateTime<Utc>>,
    pub gateway_time: Option<DateTime<Utc>>,
}

/// One decoded telemetry event recorded against a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorLog {
    pub sensor_id: Option<String>,
    pub mode: Option<String>,
    pub status: Option<i64>,
    pub keep_alive: Option<bool>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub frame_count: Option<i64>,
    pub rssi: Option<i64>,
    pub snr: Option<f64>,
    pub server_time: Option<DateTime<Utc>>,
    pub gateway_time: Option<DateTime<Utc>>,
}

/// A vehicle-counting lane: two paired sensors and a directional count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub id: Option<String>,
    pub name: Option<String>,
    pub front_id: Option<String>,
    pub back_id: Option<String>,
    pub parking_lot_id: Option<String>,
    pub direction: Option<bool>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLot {
    pub id: Option<String>,
    pub name: Option<String>,
    pub total_spaces: Option<i64>,
}

/// An OAuth2 access token record. The token string doubles as the resource
/// id on the token routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oauth2Token {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub client_id: Option<String>,
}

/// Acknowledgment returned by `create`: the server-assigned (or echoed) id.
///
/// Not a hydrated model: the server owns derived and defaulted fields, so
/// observing them takes a follow-up `get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}

/// Status-message acknowledgment returned by `update` and `delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub message: Option<String>,
}
