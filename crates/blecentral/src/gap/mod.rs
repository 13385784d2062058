//! GAP (Generic Access Profile) layer
//!
//! Connection lifecycle control for the central role: transport bring-up,
//! device discovery, link establishment and teardown, and link parameter
//! management.

pub mod central;
pub mod constants;
pub mod types;


pub use central::CentralAdapter;
pub use types::{
    AddressType, BdAddr, DiscoveredDevice, DiscoveryMode, GapParam, LinkParamUpdate, LinkSettings,
    Peripheral, ScanSettings,
};
