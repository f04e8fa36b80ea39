//! # Parking Core
//!
//! Domain and wire types for the parking cloud API client.
//!
//! This crate contains plain data types with no I/O dependencies:
//! - Domain models hydrated from server responses
//! - Acknowledgment shapes for create/update/delete
//! - Outbound payload and query types, including the third-party
//!   LoRaWAN uplink formats
//!
//! Models are field projections of the server's JSON: every field is
//! optional, unknown fields are dropped, and hydration never fails just
//! because the server added or removed a field.

pub mod models;
pub mod requests;

// Re-export commonly used types
pub use models::{Ack, Created, Lane, Oauth2Token, ParkingLot, Sensor, SensorLog};
pub use requests::{
    ChirpStackRxInfo, ChirpStackTxInfo, ChirpStackUplink, LaneCreate, LaneUpdate, LoriotUplink,
    MachineqUplink, Oauth2TokenCreate, ParkingLotCreate, ParkingLotUpdate, SensorCreate,
    SensorLogQuery, SensorQuery, SensorUpdate, TtnGateway, TtnMetadata, TtnUplink, UplinkPayload,
};
