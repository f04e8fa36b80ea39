//! The demonstration applications, one per CLI subcommand.
//!
//! Each one is caller-level orchestration over the client: resources that
//! depend on each other are sequenced by awaiting each id before using it,
//! and error recovery (create-on-404) lives here, not in the client.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use parking_api::Api;
use parking_core::{
    ChirpStackRxInfo, ChirpStackTxInfo, ChirpStackUplink, LaneCreate, LaneUpdate, LoriotUplink,
    MachineqUplink, ParkingLotCreate, ParkingLotUpdate, SensorCreate, SensorLogQuery, SensorQuery,
    SensorUpdate, TtnGateway, TtnMetadata, TtnUplink, UplinkPayload,
};

fn banner(name: &str) {
    println!("{}", format!("=== {name} ===").cyan().bold());
}

fn limit(n: i64) -> SensorLogQuery {
    SensorLogQuery {
        limit: Some(n),
        ..Default::default()
    }
}

fn test_sensor(id: &str, name: &str, parking_lot_id: Option<String>) -> SensorCreate {
    SensorCreate {
        id: id.to_string(),
        name: name.to_string(),
        kind: "api-client-test".to_string(),
        parking_lot_id,
    }
}

/// Send an uplink; if the sensor is unknown (404), register it and resend.
pub async fn uplink_retry(api: &Api) -> Result<()> {
    banner("uplink-retry");

    let sensor_id = "0000FFFF1111EEEE";
    let uplink = UplinkPayload {
        payload: "0302016D026700EB156601".to_string(),
        port: 3,
        frame_count: Some(1),
        rssi: Some(-41),
        snr: Some(1.62),
        gateway_id: Some("0080000000001234".to_string()),
        gateway_time: Some(Utc::now()),
        frequency: Some(902.1),
        data_rate: Some("SF7BW125".to_string()),
    };

    match api.sensors.uplink(sensor_id, &uplink).await {
        Ok(_) => println!("uplink accepted for {sensor_id}"),
        Err(err) if err.status() == Some(404) => {
            println!("{}", format!("{sensor_id} not registered yet, creating it").yellow());
            let created = api
                .sensors
                .create(&test_sensor(
                    sensor_id,
                    &format!("client-app1-test-{sensor_id}"),
                    None,
                ))
                .await?;
            api.sensors.uplink(&created.id, &uplink).await?;
            println!("{}", "sensor created and uplink resent".green());
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Read-only checks: the caller's own token plus every list endpoint.
/// Against a fresh account these return the token record and empty arrays.
pub async fn smoke(api: &Api, api_key: &str) -> Result<()> {
    banner("smoke");

    let token = api.oauth2_tokens.get(api_key).await?;
    println!(
        "token for client {} expires {}",
        token.client_id.as_deref().unwrap_or("<unknown>"),
        token
            .expires_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "<never>".to_string()),
    );

    // Independent reads, issued concurrently.
    let (lots, lanes, sensors) = tokio::try_join!(
        api.parking_lots.get_all(),
        api.lanes.get_all(),
        api.sensors.get_all(None),
    )?;
    let logs = api.sensor_logs.get_all(Some(&limit(1))).await?;

    println!(
        "{} parking lots, {} lanes, {} sensors, newest log: {}",
        lots.len(),
        lanes.len(),
        sensors.len(),
        logs.first()
            .and_then(|l| l.server_time)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "<none>".to_string()),
    );

    Ok(())
}

/// Full pass over every resource: create a lot, two counting sensors and a
/// lane, read them back, update them, submit native and third-party
/// uplinks, query the logs, then remove everything.
pub async fn lifecycle(api: &Api) -> Result<()> {
    banner("lifecycle");

    // Create objects, dependencies first.
    let lot_id = api
        .parking_lots
        .create(&ParkingLotCreate {
            name: "client-test-lot-new".to_string(),
            total_spaces: 14,
        })
        .await?
        .id;
    let sensor1 = api
        .sensors
        .create(&test_sensor(
            "EEEE33336666FFFF",
            "client-test-sensor1-new",
            Some(lot_id.clone()),
        ))
        .await?
        .id;
    let sensor2 = api
        .sensors
        .create(&test_sensor(
            "8888AAAA22220000",
            "client-test-sensor2-new",
            Some(lot_id.clone()),
        ))
        .await?
        .id;
    let lane_id = api
        .lanes
        .create(&LaneCreate {
            name: "client-test-lane-new".to_string(),
            front_id: sensor1.clone(),
            back_id: sensor2.clone(),
            parking_lot_id: lot_id.clone(),
            direction: true,
            count: 0,
        })
        .await?
        .id;
    println!("created lot {lot_id}, lane {lane_id}");

    // Read the new objects back.
    api.parking_lots.get(&lot_id).await?;
    api.sensors.get(&sensor1).await?;
    api.sensors.get(&sensor2).await?;
    api.lanes.get(&lane_id).await?;
    api.parking_lots
        .get_sensors(
            &lot_id,
            Some(&SensorQuery {
                kind: Some("api-client-test".to_string()),
                state: None,
            }),
        )
        .await?;
    api.parking_lots.get_lanes(&lot_id).await?;
    api.lanes.get_sensors(&lane_id, None).await?;

    // Update them.
    api.parking_lots
        .update(
            &lot_id,
            &ParkingLotUpdate {
                name: Some("client-test-lot-updated".to_string()),
                total_spaces: Some(2),
            },
        )
        .await?;
    api.sensors
        .update(
            &sensor1,
            &SensorUpdate {
                name: Some("client-test-sensor1-updated".to_string()),
                kind: Some("test".to_string()),
                parking_lot_id: None,
            },
        )
        .await?;
    api.sensors
        .update(
            &sensor2,
            &SensorUpdate {
                name: Some("client-test-sensor2-updated".to_string()),
                ..Default::default()
            },
        )
        .await?;

    // A pair of counting uplinks right after each other: front then back.
    api.sensors
        .uplink(
            &sensor1,
            &UplinkPayload {
                payload: "0302016D026700EB210001".to_string(),
                port: 3,
                frame_count: Some(2),
                rssi: Some(-48),
                snr: Some(2.74),
                gateway_id: Some("0080000000004321".to_string()),
                gateway_time: Some(Utc::now()),
                frequency: Some(902.5),
                data_rate: Some("SF10BW125".to_string()),
            },
        )
        .await?;
    api.sensors
        .uplink(
            &sensor2,
            &UplinkPayload {
                payload: "0302016D026700DD210001".to_string(),
                port: 3,
                frame_count: Some(1),
                rssi: Some(-55),
                snr: Some(1.84),
                gateway_id: Some("0080000000004321".to_string()),
                gateway_time: Some(Utc::now()),
                frequency: Some(902.7),
                data_rate: Some("SF10BW125".to_string()),
            },
        )
        .await?;

    let lane = api.lanes.get(&lane_id).await?;
    println!("lane count after paired uplinks: {:?}", lane.count);

    // Check the logs from every angle.
    api.parking_lots.get_sensor_logs(&lot_id, Some(&limit(2))).await?;
    api.lanes.get_sensor_logs(&lane_id, Some(&limit(2))).await?;
    api.sensors.get_sensor_logs(&sensor1, Some(&limit(1))).await?;
    api.sensor_logs.get_all(Some(&limit(1))).await?;

    // Third-party uplinks against a presence sensor.
    let sensor3 = api
        .sensors
        .create(&test_sensor(
            "00000000FFFFFFFF",
            "client-test-sensor3-presence",
            Some(lot_id.clone()),
        ))
        .await?
        .id;
    api.sensors
        .ttn_uplink(&TtnUplink {
            hardware_serial: sensor3.clone(),
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
        .await?;
    api.sensors
        .machineq_uplink(&MachineqUplink {
            time: Utc::now(),
            dev_eui: sensor3.clone(),
            f_port: 3,
            f_cnt_up: 2,
            payload_hex: "0302016D156600".to_string(),
            gateway_rssi: -37,
            gateway_snr: 1.74,
            spreading_factor: "10".to_string(),
            gateway_id: "0000000000000001".to_string(),
        })
        .await?;
    api.sensors
        .loriot_uplink(&LoriotUplink {
            eui: sensor3.clone(),
            ts: Utc::now().timestamp_millis(),
            fcnt: 3,
            port: 3,
            data: "156601".to_string(),
            freq: 902300000,
            dr: "SF10 BW125 4/5".to_string(),
            rssi: -39,
            snr: 1.942,
        })
        .await?;
    api.sensors
        .chirpstack_uplink(&ChirpStackUplink {
            application_id: Some("1".to_string()),
            application_name: Some("test-app".to_string()),
            device_name: Some("test-device".to_string()),
            dev_eui: sensor3.clone(),
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
            object: Some(serde_json::json!({ "presenceSensor": { "55": 1 } })),
        })
        .await?;

    api.sensors.get(&sensor3).await?;
    let logs = api.sensors.get_sensor_logs(&sensor3, Some(&limit(3))).await?;
    println!("presence sensor has {} recent logs", logs.len());

    // Remove everything, dependents first.
    api.lanes.delete(&lane_id).await?;
    api.sensors.delete(&sensor1).await?;
    api.sensors.delete(&sensor2).await?;
    api.sensors.delete(&sensor3).await?;
    api.parking_lots.delete(&lot_id).await?;
    println!("{}", "lifecycle complete, all test resources removed".green());

    Ok(())
}

/// Vehicle-counting walkthrough: three lanes over six sensors, paired
/// uplinks for each crossing, direction flips halfway through.
pub async fn counting(api: &Api) -> Result<()> {
    banner("counting");

    let lot_id = api
        .parking_lots
        .create(&ParkingLotCreate {
            name: "vehicle-counting-test".to_string(),
            total_spaces: 20,
        })
        .await?
        .id;

    let names = [
        "lane1-front",
        "lane1-back",
        "lane2-front",
        "lane2-back",
        "lane3-front",
        "lane3-back",
    ];
    let mut sensor_ids = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let id = api
            .sensors
            .create(&SensorCreate {
                id: format!("FF0000000000000{}", index + 1),
                name: (*name).to_string(),
                kind: "testing".to_string(),
                parking_lot_id: Some(lot_id.clone()),
            })
            .await?
            .id;
        sensor_ids.push(id);
    }

    let lanes = [("lane1", true), ("lane2", false), ("lane3", false)];
    let mut lane_ids = Vec::new();
    for (index, (name, direction)) in lanes.iter().enumerate() {
        let id = api
            .lanes
            .create(&LaneCreate {
                name: (*name).to_string(),
                front_id: sensor_ids[index * 2].clone(),
                back_id: sensor_ids[index * 2 + 1].clone(),
                parking_lot_id: lot_id.clone(),
                direction: *direction,
                count: 0,
            })
            .await?
            .id;
        lane_ids.push(id);
    }

    // Five vehicles enter through lane 1.
    for frame in 1..=5 {
        crossing(api, &sensor_ids[0], &sensor_ids[1], frame).await?;
    }
    // One vehicle leaves through lane 2.
    crossing(api, &sensor_ids[2], &sensor_ids[3], 1).await?;
    // Two vehicles leave through lane 3.
    for frame in 1..=2 {
        crossing(api, &sensor_ids[4], &sensor_ids[5], frame).await?;
    }

    // Reverse lane 2 to inbound, then two vehicles enter.
    api.lanes
        .update(
            &lane_ids[1],
            &LaneUpdate {
                direction: Some(true),
                ..Default::default()
            },
        )
        .await?;
    for frame in 2..=3 {
        crossing(api, &sensor_ids[2], &sensor_ids[3], frame).await?;
    }

    // Reverse lane 1 to outbound, one vehicle leaves.
    api.lanes
        .update(
            &lane_ids[0],
            &LaneUpdate {
                direction: Some(false),
                ..Default::default()
            },
        )
        .await?;
    crossing(api, &sensor_ids[0], &sensor_ids[1], 6).await?;

    // The server owns the arithmetic; we only read the result.
    api.parking_lots.get(&lot_id).await?;
    let final_lanes = api.parking_lots.get_lanes(&lot_id).await?;
    for lane in &final_lanes {
        println!(
            "{}: count {:?}, direction {:?}",
            lane.name.as_deref().unwrap_or("<unnamed>"),
            lane.count,
            lane.direction,
        );
    }
    api.parking_lots.get_sensors(&lot_id, None).await?;

    // Tear down.
    for id in &lane_ids {
        api.lanes.delete(id).await?;
    }
    for id in &sensor_ids {
        api.sensors.delete(id).await?;
    }
    api.parking_lots.delete(&lot_id).await?;
    println!("{}", "counting walkthrough complete".green());

    Ok(())
}

/// One vehicle crossing: the front sensor fires, then the back.
async fn crossing(api: &Api, front: &str, back: &str, frame: i64) -> Result<()> {
    let payload = format!("2100{frame:02X}");
    api.sensors
        .uplink(
            front,
            &UplinkPayload {
                payload: payload.clone(),
                port: 3,
                ..Default::default()
            },
        )
        .await?;
    api.sensors
        .uplink(
            back,
            &UplinkPayload {
                payload,
                port: 3,
                ..Default::default()
            },
        )
        .await?;
    Ok(())
}
