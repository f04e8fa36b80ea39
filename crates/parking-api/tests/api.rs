//! End-to-end tests against the in-workspace mock server.
//!
//! Each test boots its own fixture on an ephemeral port, so state never
//! leaks between tests and they can run in parallel.

use chrono::Utc;
use parking_api::{Api, ClientConfig, HttpClient};
use parking_core::{
    ChirpStackRxInfo, ChirpStackTxInfo, ChirpStackUplink, LaneCreate, LaneUpdate, LoriotUplink,
    MachineqUplink, Oauth2TokenCreate, ParkingLotCreate, SensorCreate, SensorLogQuery,
    TtnGateway, TtnMetadata, TtnUplink, UplinkPayload,
};
use serde_json::json;

const API_KEY: &str = "test-api-key";

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        mock_server::run(listener, API_KEY).await.unwrap();
    });
    format!("http://{addr}")
}

fn api_for(base_url: &str) -> Api {
    Api::new(ClientConfig {
        base_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
    })
}

fn test_sensor(id: &str) -> SensorCreate {
    SensorCreate {
        id: id.to_string(),
        name: format!("client-test-{id}"),
        kind: "api-client-test".to_string(),
        parking_lot_id: None,
    }
}

fn test_uplink(frame: i64) -> UplinkPayload {
    UplinkPayload {
        payload: "0302016D026700EB156601".to_string(),
        port: 3,
        frame_count: Some(frame),
        rssi: Some(-41),
        snr: Some(1.62),
        gateway_id: Some("0080000000001234".to_string()),
        gateway_time: Some(Utc::now()),
        frequency: Some(902.1),
        data_rate: Some("SF7BW125".to_string()),
    }
}

#[tokio::test]
async fn uplink_to_unknown_sensor_is_404_then_create_and_resend_succeeds() {
    let api = api_for(&start_server().await);
    let sensor_id = "0000FFFF1111EEEE";

    let err = api
        .sensors
        .uplink(sensor_id, &test_uplink(1))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    let created = api.sensors.create(&test_sensor(sensor_id)).await.unwrap();
    assert_eq!(created.id, sensor_id);

    // 202 Accepted is success, same as 200.
    let ack = api.sensors.uplink(&created.id, &test_uplink(1)).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("uplink accepted"));
}

#[tokio::test]
async fn lane_create_returns_raw_id_and_get_echoes_submitted_fields() {
    let api = api_for(&start_server().await);

    let lot = api
        .parking_lots
        .create(&ParkingLotCreate {
            name: "client-test-lot".to_string(),
            total_spaces: 14,
        })
        .await
        .unwrap();
    api.sensors.create(&test_sensor("EEEE33336666FFFF")).await.unwrap();
    api.sensors.create(&test_sensor("8888AAAA22220000")).await.unwrap();

    let created = api
        .lanes
        .create(&LaneCreate {
            name: "client-test-lane".to_string(),
            front_id: "EEEE33336666FFFF".to_string(),
            back_id: "8888AAAA22220000".to_string(),
            parking_lot_id: lot.id.clone(),
            direction: true,
            count: 0,
        })
        .await
        .unwrap();
    assert!(!created.id.is_empty());

    let lane = api.lanes.get(&created.id).await.unwrap();
    assert_eq!(lane.name.as_deref(), Some("client-test-lane"));
    assert_eq!(lane.front_id.as_deref(), Some("EEEE33336666FFFF"));
    assert_eq!(lane.back_id.as_deref(), Some("8888AAAA22220000"));
    assert_eq!(lane.parking_lot_id.as_deref(), Some(lot.id.as_str()));
    assert_eq!(lane.direction, Some(true));
    assert_eq!(lane.count, Some(0));

    // Same id, unchanged remote state: structurally equal results.
    let again = api.lanes.get(&created.id).await.unwrap();
    assert_eq!(lane, again);
}

#[tokio::test]
async fn update_returns_acknowledgment_and_get_observes_the_change() {
    let api = api_for(&start_server().await);

    let lot = api
        .parking_lots
        .create(&ParkingLotCreate {
            name: "lot".to_string(),
            total_spaces: 20,
        })
        .await
        .unwrap();
    api.sensors.create(&test_sensor("FF00000000000001")).await.unwrap();
    api.sensors.create(&test_sensor("FF00000000000002")).await.unwrap();
    let lane = api
        .lanes
        .create(&LaneCreate {
            name: "lane1".to_string(),
            front_id: "FF00000000000001".to_string(),
            back_id: "FF00000000000002".to_string(),
            parking_lot_id: lot.id.clone(),
            direction: false,
            count: 0,
        })
        .await
        .unwrap();

    let ack = api
        .lanes
        .update(
            &lane.id,
            &LaneUpdate {
                direction: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(ack.message.is_some());

    let updated = api.lanes.get(&lane.id).await.unwrap();
    assert_eq!(updated.direction, Some(true));
    // Untouched fields survive a partial update.
    assert_eq!(updated.name.as_deref(), Some("lane1"));
}

#[tokio::test]
async fn sensor_log_listing_honors_limit() {
    let api = api_for(&start_server().await);

    let sensor = api.sensors.create(&test_sensor("AAAA000011112222")).await.unwrap();
    for frame in 1..=3 {
        api.sensors.uplink(&sensor.id, &test_uplink(frame)).await.unwrap();
    }

    let logs = api
        .sensor_logs
        .get_all(Some(&SensorLogQuery {
            limit: Some(1),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    // Newest first: the last frame submitted.
    assert_eq!(logs[0].frame_count, Some(3));
    assert_eq!(logs[0].sensor_id.as_deref(), Some(sensor.id.as_str()));
    // Fields the fixture never writes hydrate to None, not defaults.
    assert!(logs[0].mode.is_none());
    assert!(logs[0].status.is_none());

    let all = api.sensor_logs.get_all(None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let api = api_for(&start_server().await);

    let sensor = api.sensors.create(&test_sensor("DDDD000011112222")).await.unwrap();
    let ack = api.sensors.delete(&sensor.id).await.unwrap();
    assert!(ack.message.is_some());

    let err = api.sensors.get(&sensor.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn list_hydrates_every_element_in_server_order() {
    let api = api_for(&start_server().await);

    let ids = ["CC00000000000001", "CC00000000000002", "CC00000000000003"];
    for id in ids {
        api.sensors.create(&test_sensor(id)).await.unwrap();
    }

    let sensors = api.sensors.get_all(None).await.unwrap();
    assert_eq!(sensors.len(), ids.len());
    let listed: Vec<&str> = sensors.iter().filter_map(|s| s.id.as_deref()).collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn nested_listings_follow_relationships() {
    let api = api_for(&start_server().await);

    let lot = api
        .parking_lots
        .create(&ParkingLotCreate {
            name: "lot".to_string(),
            total_spaces: 4,
        })
        .await
        .unwrap();
    for id in ["BB00000000000001", "BB00000000000002"] {
        let mut sensor = test_sensor(id);
        sensor.parking_lot_id = Some(lot.id.clone());
        api.sensors.create(&sensor).await.unwrap();
    }
    let lane = api
        .lanes
        .create(&LaneCreate {
            name: "entry".to_string(),
            front_id: "BB00000000000001".to_string(),
            back_id: "BB00000000000002".to_string(),
            parking_lot_id: lot.id.clone(),
            direction: true,
            count: 0,
        })
        .await
        .unwrap();

    let lane_sensors = api.lanes.get_sensors(&lane.id, None).await.unwrap();
    let pair: Vec<&str> = lane_sensors.iter().filter_map(|s| s.id.as_deref()).collect();
    assert_eq!(pair, ["BB00000000000001", "BB00000000000002"]);

    let lot_lanes = api.parking_lots.get_lanes(&lot.id).await.unwrap();
    assert_eq!(lot_lanes.len(), 1);
    assert_eq!(lot_lanes[0].id.as_deref(), Some(lane.id.as_str()));

    let lot_sensors = api.parking_lots.get_sensors(&lot.id, None).await.unwrap();
    assert_eq!(lot_sensors.len(), 2);
}

#[tokio::test]
async fn vendor_uplinks_are_forwarded_and_logged() {
    let api = api_for(&start_server().await);
    let sensor_id = "00000000FFFFFFFF";
    api.sensors.create(&test_sensor(sensor_id)).await.unwrap();

    api.sensors
        .ttn_uplink(&TtnUplink {
            hardware_serial: sensor_id.to_string(),
            port: 3,
            counter: 1,
            payload_raw: "AmcAwhVmAQ==".to_string(),
            metadata: TtnMetadata {
                frequency: 903.5,
                data_rate: "SF10BW125".to_string(),
                gateways: vec![TtnGateway {
                    gtw_id: "0000000000000000".to_string(),
                    time: Utc::now(),
                    rssi: -35,
                    snr: 1.933,
                }],
            },
        })
        .await
        .unwrap();

    api.sensors
        .machineq_uplink(&MachineqUplink {
            time: Utc::now(),
            dev_eui: sensor_id.to_string(),
            f_port: 3,
            f_cnt_up: 2,
            payload_hex: "0302016D156600".to_string(),
            gateway_rssi: -37,
            gateway_snr: 1.74,
            spreading_factor: "10".to_string(),
            gateway_id: "0000000000000001".to_string(),
        })
        .await
        .unwrap();

    api.sensors
        .loriot_uplink(&LoriotUplink {
            eui: sensor_id.to_string(),
            ts: Utc::now().timestamp_millis(),
            fcnt: 3,
            port: 3,
            data: "156601".to_string(),
            freq: 902300000,
            dr: "SF10 BW125 4/5".to_string(),
            rssi: -39,
            snr: 1.942,
        })
        .await
        .unwrap();

    api.sensors
        .chirpstack_uplink(&ChirpStackUplink {
            application_id: Some("1".to_string()),
            application_name: Some("test-app".to_string()),
            device_name: Some("test-device".to_string()),
            dev_eui: sensor_id.to_string(),
            rx_info: vec![ChirpStackRxInfo {
                gateway_id: "0000000000000002".to_string(),
                time: Utc::now(),
                uplink_id: Some("0".to_string()),
                name: Some("test-gateway".to_string()),
                rssi: -43,
                lo_ra_snr: 3.2,
                location: None,
            }],
            tx_info: ChirpStackTxInfo {
                frequency: 902300000,
                dr: 2,
            },
            adr: Some(false),
            f_cnt: 4,
            f_port: 3,
            data: "N2YB".to_string(),
            object: None,
        })
        .await
        .unwrap();

    let logs = api.sensors.get_sensor_logs(sensor_id, None).await.unwrap();
    assert_eq!(logs.len(), 4);

    // A vendor uplink naming an unregistered device is refused, like the
    // native route.
    let err = api
        .sensors
        .loriot_uplink(&LoriotUplink {
            eui: "UNKNOWN0000000EE".to_string(),
            ts: Utc::now().timestamp_millis(),
            fcnt: 1,
            port: 3,
            data: "00".to_string(),
            freq: 902300000,
            dr: "SF10 BW125 4/5".to_string(),
            rssi: -39,
            snr: 1.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn token_exchange_is_form_encoded_without_bearer() {
    let api = api_for(&start_server().await);

    // The fixture rejects this route when a bearer header is present and
    // its form extractor rejects JSON bodies, so success here pins the
    // whole header contract.
    let token = api
        .oauth2_tokens
        .create(&Oauth2TokenCreate {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            validity_period: 3600,
        })
        .await
        .unwrap();
    let token_value = token.token.clone().unwrap();
    assert_eq!(token.client_id.as_deref(), Some("test-client"));
    assert!(token.expires_at.is_some());

    let fetched = api.oauth2_tokens.get(&token_value).await.unwrap();
    assert_eq!(fetched, token);

    api.oauth2_tokens.delete(&token_value).await.unwrap();
    let err = api.oauth2_tokens.get(&token_value).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn resource_routes_require_the_bearer_key() {
    let base_url = start_server().await;

    let wrong_key = Api::new(ClientConfig {
        base_url: base_url.clone(),
        api_key: "not-the-key".to_string(),
    });
    let err = wrong_key.sensors.get_all(None).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    // The raw rejection body rides on the error for diagnostics.
    match err {
        parking_api::ApiError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("401"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn plain_text_success_body_is_wrapped_not_rejected() {
    let base_url = start_server().await;
    let http = HttpClient::new(ClientConfig {
        base_url,
        api_key: API_KEY.to_string(),
    });

    let decoded = http.get("/health", None, true).await.unwrap();
    assert_eq!(decoded, json!({ "result": "OK" }));
}

#[tokio::test]
async fn transport_failure_is_classified_separately_from_http_failure() {
    // Nothing listens here; the exchange itself fails.
    let http = HttpClient::new(ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: API_KEY.to_string(),
    });

    let err = http.get("/api/v1/sensors", None, false).await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(matches!(err, parking_api::ApiError::Transport(_)));
}
