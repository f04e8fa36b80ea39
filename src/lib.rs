//! Demonstration programs for the parking cloud API client.
//!
//! The library surface of the binary crate: environment bootstrap and the
//! demo applications the `parkingcloud` CLI dispatches to.

pub mod config;
pub mod demos;
