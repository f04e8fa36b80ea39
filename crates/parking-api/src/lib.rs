//! # Parking API
//!
//! HTTP client for the parking cloud REST API.
//! This crate provides the transport layer (one authenticated request per
//! invocation, uniformly classified outcome) and the typed resource clients
//! built on top of it.

pub mod client;
pub mod errors;
pub mod resources;
pub mod sdk;

// Re-export common types for convenience
pub use client::{ClientConfig, HttpClient};
pub use errors::{ApiError, Result};
pub use resources::{LaneApi, Oauth2TokenApi, ParkingLotApi, SensorApi, SensorLogApi};
pub use sdk::Api;

// Re-export core types that API consumers will need
pub use parking_core::{Ack, Created, Lane, Oauth2Token, ParkingLot, Sensor, SensorLog};
