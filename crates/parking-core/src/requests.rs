//! Outbound payload and query types.
//!
//! The four third-party uplink shapes (TTN, machineQ, LORIOT, ChirpStack)
//! keep each vendor's own field names and casing on the wire. The client
//! never normalizes them; shape differences are the server's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorCreate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_lot_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_lot_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneCreate {
    pub name: String,
    pub front_id: String,
    pub back_id: String,
    pub parking_lot_id: String,
    pub direction: bool,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_lot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotCreate {
    pub name: String,
    pub total_spaces: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spaces: Option<i64>,
}

/// Client-credentials exchange body. Sent form-encoded, without a bearer
/// token, since this is the endpoint that creates the credential.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Oauth2TokenCreate {
    pub client_id: String,
    pub client_secret: String,
    pub validity_period: i64,
}

/// Filter for sensor listings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Time-window filter for sensor log listings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// Native uplink body for `POST sensors/{id}/uplink`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkPayload {
    pub payload: String,
    pub port: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_rate: Option<String>,
}

/// The Things Network uplink, as TTN posts it (snake_case).
#[derive(Debug, Clone, Serialize)]
pub struct TtnUplink {
    pub hardware_serial: String,
    pub port: i64,
    pub counter: i64,
    pub payload_raw: String,
    pub metadata: TtnMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TtnMetadata {
    pub frequency: f64,
    pub data_rate: String,
    pub gateways: Vec<TtnGateway>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TtnGateway {
    pub gtw_id: String,
    pub time: DateTime<Utc>,
    pub rssi: i64,
    pub snr: f64,
}

/// machineQ uplink. The vendor mixes PascalCase, SCREAMING abbreviations,
/// and one snake_case field; the renames reproduce that exactly.
#[derive(Debug, Clone, Serialize)]
pub struct MachineqUplink {
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "DevEUI")]
    pub dev_eui: String,
    #[serde(rename = "FPort")]
    pub f_port: i64,
    #[serde(rename = "FCntUp")]
    pub f_cnt_up: i64,
    pub payload_hex: String,
    #[serde(rename = "GatewayRSSI")]
    pub gateway_rssi: i64,
    #[serde(rename = "GatewaySNR")]
    pub gateway_snr: f64,
    #[serde(rename = "SpreadingFactor")]
    pub spreading_factor: String,
    #[serde(rename = "GatewayID")]
    pub gateway_id: String,
}

/// LORIOT uplink. Timestamp is epoch milliseconds, frequency is hertz.
#[derive(Debug, Clone, Serialize)]
pub struct LoriotUplink {
    #[serde(rename = "EUI")]
    pub eui: String,
    pub ts: i64,
    pub fcnt: i64,
    pub port: i64,
    pub data: String,
    pub freq: i64,
    pub dr: String,
    pub rssi: i64,
    pub snr: f64,
}

/// ChirpStack uplink event.
#[derive(Debug, Clone, Serialize)]
pub struct ChirpStackUplink {
    #[serde(rename = "applicationID", skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(rename = "applicationName", skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(rename = "deviceName", skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(rename = "devEUI")]
    pub dev_eui: String,
    #[serde(rename = "rxInfo")]
    pub rx_info: Vec<ChirpStackRxInfo>,
    #[serde(rename = "txInfo")]
    pub tx_info: ChirpStackTxInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adr: Option<bool>,
    #[serde(rename = "fCnt")]
    pub f_cnt: i64,
    #[serde(rename = "fPort")]
    pub f_port: i64,
    pub data: String,
    /// Decoded object payload, forwarded verbatim when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChirpStackRxInfo {
    #[serde(rename = "gatewayID")]
    pub gateway_id: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "uplinkID", skip_serializing_if = "Option::is_none")]
    pub uplink_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rssi: i64,
    #[serde(rename = "loRaSNR")]
    pub lo_ra_snr: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChirpStackTxInfo {
    pub frequency: i64,
    pub dr: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uplink_skips_absent_fields() {
        let body = UplinkPayload {
            payload: "210001".to_string(),
            port: 3,
            ..Default::default()
        };
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire, json!({ "payload": "210001", "port": 3 }));
    }

    #[test]
    fn machineq_wire_casing_is_preserved() {
        let body = MachineqUplink {
            time: "2019-06-01T12:00:00Z".parse().unwrap(),
            dev_eui: "00000000FFFFFFFF".to_string(),
            f_port: 3,
            f_cnt_up: 2,
            payload_hex: "0302016D156600".to_string(),
            gateway_rssi: -37,
            gateway_snr: 1.74,
            spreading_factor: "10".to_string(),
            gateway_id: "0000000000000001".to_string(),
        };
        let wire = serde_json::to_value(&body).unwrap();
        let keys: Vec<&str> = wire.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(keys.contains(&"DevEUI"));
        assert!(keys.contains(&"FCntUp"));
        assert!(keys.contains(&"payload_hex"));
        assert!(keys.contains(&"GatewayRSSI"));
    }

    #[test]
    fn chirpstack_wire_casing_is_preserved() {
        let body = ChirpStackUplink {
            application_id: None,
            application_name: None,
            device_name: None,
            dev_eui: "00000000FFFFFFFF".to_string(),
            rx_info: vec![ChirpStackRxInfo {
                gateway_id: "0000000000000002".to_string(),
                time: "2019-06-01T12:00:00Z".parse().unwrap(),
                uplink_id: None,
                name: None,
                rssi: -43,
                lo_ra_snr: 3.2,
                location: None,
            }],
            tx_info: ChirpStackTxInfo {
                frequency: 902300000,
                dr: 2,
            },
            adr: None,
            f_cnt: 4,
            f_port: 3,
            data: "N2YB".to_string(),
            object: None,
        };
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["devEUI"], json!("00000000FFFFFFFF"));
        assert_eq!(wire["rxInfo"][0]["loRaSNR"], json!(3.2));
        assert_eq!(wire["txInfo"]["frequency"], json!(902300000i64));
        assert_eq!(wire["fCnt"], json!(4));
        assert!(wire.get("applicationID").is_none());
    }

    #[test]
    fn oauth2_create_serializes_camel_case_scalars() {
        let body = Oauth2TokenCreate {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            validity_period: 3600,
        };
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(
            wire,
            json!({ "clientId": "client", "clientSecret": "secret", "validityPeriod": 3600 })
        );
    }
}
