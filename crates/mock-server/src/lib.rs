//! In-memory stub of the parking cloud REST surface.
//!
//! Just enough behavior to exercise the client end-to-end: per-collection
//! stores that preserve insertion order, 404s for unknown ids, 202 for
//! accepted uplinks, bearer-auth checks on resource routes, and a
//! form-encoded token exchange that rejects bearer headers. No counting or
//! occupancy logic lives here.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

type Rejection = (StatusCode, Json<Value>);

/// Insertion-ordered record stores, one per collection.
#[derive(Debug, Default)]
pub struct Store {
    parking_lots: Vec<Value>,
    lanes: Vec<Value>,
    sensors: Vec<Value>,
    sensor_logs: Vec<Value>,
    tokens: Vec<Value>,
}

#[derive(Clone)]
struct AppState {
    db: Arc<RwLock<Store>>,
    api_key: String,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        api_key: api_key.to_string(),
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/parkinglots",
            get(list_parking_lots).post(create_parking_lot),
        )
        .route(
            "/api/v1/parkinglots/{id}",
            get(get_parking_lot)
                .put(update_parking_lot)
                .delete(delete_parking_lot),
        )
        .route("/api/v1/parkinglots/{id}/sensors", get(parking_lot_sensors))
        .route("/api/v1/parkinglots/{id}/lanes", get(parking_lot_lanes))
        .route(
            "/api/v1/parkinglots/{id}/sensorlogs",
            get(parking_lot_sensor_logs),
        )
        .route("/api/v1/lanes", get(list_lanes).post(create_lane))
        .route(
            "/api/v1/lanes/{id}",
            get(get_lane).put(update_lane).delete(delete_lane),
        )
        .route("/api/v1/lanes/{id}/sensors", get(lane_sensors))
        .route("/api/v1/lanes/{id}/sensorlogs", get(lane_sensor_logs))
        .route("/api/v1/sensors", get(list_sensors).post(create_sensor))
        .route(
            "/api/v1/sensors/{id}",
            get(get_sensor).put(update_sensor).delete(delete_sensor),
        )
        .route("/api/v1/sensors/{id}/uplink", post(sensor_uplink))
        .route("/api/v1/sensors/{id}/sensorlogs", get(sensor_sensor_logs))
        .route("/api/v1/sensors/uplink/ttn", post(ttn_uplink))
        .route("/api/v1/sensors/uplink/machineq", post(machineq_uplink))
        .route("/api/v1/sensors/uplink/loriot", post(loriot_uplink))
        .route("/api/v1/sensors/uplink/chirpstack", post(chirpstack_uplink))
        .route("/api/v1/sensorlogs", get(list_sensor_logs))
        .route("/api/v1/oauth2tokens", post(create_token))
        .route(
            "/api/v1/oauth2tokens/{token}",
            get(get_token).delete(delete_token),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn health() -> &'static str {
    "OK"
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Rejection> {
    let expected = format!("Bearer {}", state.api_key);
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value == expected => Ok(()),
        _ => Err(reject(StatusCode::UNAUTHORIZED, "invalid bearer token")),
    }
}

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "message": message })),
    )
}

fn not_found() -> Rejection {
    reject(StatusCode::NOT_FOUND, "resource not found")
}

fn field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn find<'a>(records: &'a [Value], key: &str, id: &str) -> Option<&'a Value> {
    records.iter().find(|r| field(r, key) == Some(id))
}

/// Overwrite the stored record's fields with the update body's fields.
fn merge(record: &mut Value, update: &Value) {
    if let (Some(target), Some(source)) = (record.as_object_mut(), update.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Newest-first, truncated to the `limit` query parameter when present.
fn apply_limit(mut records: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    records.reverse();
    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        records.truncate(limit);
    }
    records
}

fn copy_fields(source: &Value, keys: &[&str], target: &mut Value) {
    for key in keys {
        if let Some(value) = source.get(*key) {
            target[*key] = value.clone();
        }
    }
}

// --- parking lots ---

async fn list_parking_lots(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    Ok(Json(Value::Array(state.db.read().await.parking_lots.clone())))
}

async fn create_parking_lot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let id = Uuid::new_v4().to_string();
    body["id"] = json!(id);
    state.db.write().await.parking_lots.push(body);
    Ok(Json(json!({ "id": id })))
}

async fn get_parking_lot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.parking_lots, "id", &id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_parking_lot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let record = db
        .parking_lots
        .iter_mut()
        .find(|r| field(r, "id") == Some(id.as_str()))
        .ok_or_else(not_found)?;
    merge(record, &body);
    Ok(Json(json!({ "message": "parking lot updated" })))
}

async fn delete_parking_lot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let before = db.parking_lots.len();
    db.parking_lots.retain(|r| field(r, "id") != Some(id.as_str()));
    if db.parking_lots.len() == before {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": "parking lot deleted" })))
}

async fn parking_lot_sensors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.parking_lots, "id", &id).ok_or_else(not_found)?;
    let sensors = db
        .sensors
        .iter()
        .filter(|s| field(s, "parkingLotId") == Some(id.as_str()))
        .filter(|s| match params.get("type") {
            Some(kind) => field(s, "type") == Some(kind.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    Ok(Json(Value::Array(sensors)))
}

async fn parking_lot_lanes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.parking_lots, "id", &id).ok_or_else(not_found)?;
    let lanes = db
        .lanes
        .iter()
        .filter(|l| field(l, "parkingLotId") == Some(id.as_str()))
        .cloned()
        .collect();
    Ok(Json(Value::Array(lanes)))
}

async fn parking_lot_sensor_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.parking_lots, "id", &id).ok_or_else(not_found)?;
    let sensor_ids: Vec<&str> = db
        .sensors
        .iter()
        .filter(|s| field(s, "parkingLotId") == Some(id.as_str()))
        .filter_map(|s| field(s, "id"))
        .collect();
    let logs: Vec<Value> = db
        .sensor_logs
        .iter()
        .filter(|l| field(l, "sensorId").is_some_and(|s| sensor_ids.contains(&s)))
        .cloned()
        .collect();
    Ok(Json(Value::Array(apply_limit(logs, &params))))
}

// --- lanes ---

async fn list_lanes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    Ok(Json(Value::Array(state.db.read().await.lanes.clone())))
}

async fn create_lane(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let id = Uuid::new_v4().to_string();
    body["id"] = json!(id);
    state.db.write().await.lanes.push(body);
    Ok(Json(json!({ "id": id })))
}

async fn get_lane(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.lanes, "id", &id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_lane(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let record = db
        .lanes
        .iter_mut()
        .find(|r| field(r, "id") == Some(id.as_str()))
        .ok_or_else(not_found)?;
    merge(record, &body);
    Ok(Json(json!({ "message": "lane updated" })))
}

async fn delete_lane(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let before = db.lanes.len();
    db.lanes.retain(|r| field(r, "id") != Some(id.as_str()));
    if db.lanes.len() == before {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": "lane deleted" })))
}

async fn lane_sensors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    let lane = find(&db.lanes, "id", &id).ok_or_else(not_found)?;
    // Front sensor first, then back, matching the lane's own ordering.
    let sensors: Vec<Value> = [field(lane, "frontId"), field(lane, "backId")]
        .into_iter()
        .flatten()
        .filter_map(|sensor_id| find(&db.sensors, "id", sensor_id).cloned())
        .collect();
    Ok(Json(Value::Array(sensors)))
}

async fn lane_sensor_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    let lane = find(&db.lanes, "id", &id).ok_or_else(not_found)?;
    let pair = [field(lane, "frontId"), field(lane, "backId")];
    let logs: Vec<Value> = db
        .sensor_logs
        .iter()
        .filter(|l| pair.contains(&field(l, "sensorId")))
        .cloned()
        .collect();
    Ok(Json(Value::Array(apply_limit(logs, &params))))
}

// --- sensors ---

async fn list_sensors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    let sensors = db
        .sensors
        .iter()
        .filter(|s| match params.get("type") {
            Some(kind) => field(s, "type") == Some(kind.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    Ok(Json(Value::Array(sensors)))
}

async fn create_sensor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    // Sensors carry their hardware EUI as id; mint one only if absent.
    let id = match field(&body, "id") {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };
    body["id"] = json!(id);
    state.db.write().await.sensors.push(body);
    Ok(Json(json!({ "id": id })))
}

async fn get_sensor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.sensors, "id", &id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_sensor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let record = db
        .sensors
        .iter_mut()
        .find(|r| field(r, "id") == Some(id.as_str()))
        .ok_or_else(not_found)?;
    merge(record, &body);
    Ok(Json(json!({ "message": "sensor updated" })))
}

async fn delete_sensor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let before = db.sensors.len();
    db.sensors.retain(|r| field(r, "id") != Some(id.as_str()));
    if db.sensors.len() == before {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": "sensor deleted" })))
}

async fn sensor_sensor_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    find(&db.sensors, "id", &id).ok_or_else(not_found)?;
    let logs: Vec<Value> = db
        .sensor_logs
        .iter()
        .filter(|l| field(l, "sensorId") == Some(id.as_str()))
        .cloned()
        .collect();
    Ok(Json(Value::Array(apply_limit(logs, &params))))
}

// --- uplink ingestion ---

async fn sensor_uplink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    authorize(&state, &headers)?;
    record_uplink(&state, &id, &body, &["frameCount", "rssi", "snr", "gatewayTime"]).await
}

async fn ttn_uplink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    authorize(&state, &headers)?;
    let id = field(&body, "hardware_serial")
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "hardware_serial missing"))?
        .to_string();
    record_uplink(&state, &id, &body, &[]).await
}

async fn machineq_uplink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    authorize(&state, &headers)?;
    let id = field(&body, "DevEUI")
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "DevEUI missing"))?
        .to_string();
    record_uplink(&state, &id, &body, &[]).await
}

async fn loriot_uplink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    authorize(&state, &headers)?;
    let id = field(&body, "EUI")
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "EUI missing"))?
        .to_string();
    record_uplink(&state, &id, &body, &[]).await
}

async fn chirpstack_uplink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    authorize(&state, &headers)?;
    let id = field(&body, "devEUI")
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "devEUI missing"))?
        .to_string();
    record_uplink(&state, &id, &body, &[]).await
}

/// Append a sensor log for a known sensor and acknowledge with 202.
async fn record_uplink(
    state: &AppState,
    sensor_id: &str,
    body: &Value,
    copied: &[&str],
) -> Result<(StatusCode, Json<Value>), Rejection> {
    let mut db = state.db.write().await;
    find(&db.sensors, "id", sensor_id).ok_or_else(not_found)?;

    let mut log = json!({
        "sensorId": sensor_id,
        "serverTime": Utc::now().to_rfc3339(),
    });
    copy_fields(body, copied, &mut log);
    db.sensor_logs.push(log);

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "uplink accepted" })),
    ))
}

// --- sensor logs ---

async fn list_sensor_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    Ok(Json(Value::Array(apply_limit(db.sensor_logs.clone(), &params))))
}

// --- oauth2 tokens ---

async fn create_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    // Client-credentials exchange: a bearer header here means the client
    // built the request wrong.
    if headers.get(header::AUTHORIZATION).is_some() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "token exchange must not carry a bearer token",
        ));
    }
    let client_id = form
        .get("clientId")
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "clientId missing"))?;
    let validity: i64 = form
        .get("validityPeriod")
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);

    let record = json!({
        "token": Uuid::new_v4().to_string(),
        "expiresAt": (Utc::now() + Duration::seconds(validity)).to_rfc3339(),
        "type": "bearer",
        "clientId": client_id,
    });
    state.db.write().await.tokens.push(record.clone());
    Ok(Json(record))
}

async fn get_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, Rejection> {
    let db = state.db.read().await;
    find(&db.tokens, "token", &token)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn delete_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, Rejection> {
    let mut db = state.db.write().await;
    let before = db.tokens.len();
    db.tokens.retain(|r| field(r, "token") != Some(token.as_str()));
    if db.tokens.len() == before {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": "token revoked" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_only_provided_fields() {
        let mut record = json!({ "id": "lane-1", "direction": true, "count": 5 });
        merge(&mut record, &json!({ "direction": false }));
        assert_eq!(record["direction"], json!(false));
        assert_eq!(record["count"], json!(5));
        assert_eq!(record["id"], json!("lane-1"));
    }

    #[test]
    fn apply_limit_returns_newest_first() {
        let logs = vec![json!({ "n": 1 }), json!({ "n": 2 }), json!({ "n": 3 })];
        let params = HashMap::from([("limit".to_string(), "2".to_string())]);
        let limited = apply_limit(logs, &params);
        assert_eq!(limited, vec![json!({ "n": 3 }), json!({ "n": 2 })]);
    }

    #[test]
    fn find_matches_on_the_given_key() {
        let records = vec![json!({ "token": "abc" }), json!({ "token": "def" })];
        assert!(find(&records, "token", "def").is_some());
        assert!(find(&records, "id", "abc").is_none());
    }
}
