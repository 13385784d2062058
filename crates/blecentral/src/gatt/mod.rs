//! GATT (Generic Attribute Profile) layer
//!
//! Service and characteristic discovery, attribute value access, and
//! notification configuration against a connected peripheral.

pub mod client;
pub mod constants;
pub mod types;


pub use client::GattDriver;
pub use types::{Characteristic, CharacteristicProperties, Service, Uuid, UuidParseError};
