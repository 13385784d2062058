//! blecentral - central-role driver for a BLE network processor
//!
//! This library drives a BLE radio controller in the central role: it issues
//! GAP commands for scanning, connecting, and pairing, and GATT commands for
//! discovering and accessing the attribute tables of connected peripherals.
//! The serial framing and event de-multiplexing toward the controller live
//! behind the [`transport::RadioTransport`] contract, so the driver itself
//! is transport-agnostic.

pub mod error;
pub mod gap;
pub mod gatt;
pub mod smp;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export common types for convenience
pub use error::Error;
pub use gap::{
    AddressType, BdAddr, CentralAdapter, DiscoveredDevice, LinkParamUpdate, LinkSettings,
    Peripheral, ScanSettings,
};
pub use gatt::{Characteristic, CharacteristicProperties, GattDriver, Service, Uuid};
pub use smp::{
    AuthComplete, BondingKeys, IoCapability, KeyDistribution, SecurityContext, SecurityManager,
};
pub use transport::{
    Collector, ControllerStatus, RadioTransport, ResetKind, SerialConfig, TransportError,
};
