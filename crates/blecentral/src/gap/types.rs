use crate::gap::constants::*;
use crate::gatt::Service;
use std::fmt;
use std::str::FromStr;

/// Lower-layer address kind of a peer device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressType {
    #[default]
    Public,
    Random,
}

impl From<u8> for AddressType {
    fn from(value: u8) -> Self {
        match value {
            RANDOM_DEVICE_ADDRESS => AddressType::Random,
            _ => AddressType::Public,
        }
    }
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        match value {
            AddressType::Public => PUBLIC_DEVICE_ADDRESS,
            AddressType::Random => RANDOM_DEVICE_ADDRESS,
        }
    }
}

impl FromStr for AddressType {
    type Err = std::convert::Infallible;

    /// `"random"` maps to [`AddressType::Random`]; any other spelling is
    /// treated as a public address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(AddressType::Random),
            _ => Ok(AddressType::Public),
        }
    }
}

/// A 48-bit Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr {
    pub bytes: [u8; 6],
}

impl BdAddr {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= 6 {
            let mut bytes = [0u8; 6];
            bytes.copy_from_slice(&slice[0..6]);
            Some(Self { bytes })
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

/// Device discovery mode requested from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DiscoveryMode {
    NonDiscoverable = 0,
    General = 1,
    Limited = 2,
    All = 3,
}

/// Controller-held GAP parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GapParam {
    /// General discovery duration, in controller ticks
    GenDiscoveryScan = 2,
    /// Scan interval used while establishing a link
    ConnEstScanInterval = 16,
    /// Scan window used while establishing a link
    ConnEstScanWindow = 17,
    /// Minimum connection interval for new links
    ConnEstIntervalMin = 21,
    /// Maximum connection interval for new links
    ConnEstIntervalMax = 22,
    /// Supervision timeout for new links
    ConnEstSupervisionTimeout = 25,
    /// Slave latency for new links
    ConnEstLatency = 26,
}

impl GapParam {
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// One peripheral seen during device discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub address: BdAddr,
    pub address_type: AddressType,
    /// Advertising event type reported by the controller
    pub adv_event_type: u8,
    pub rssi: Option<i8>,
}

/// A remote device, connected or not.
///
/// The connection handle is assigned by the controller for the life of one
/// link and cleared on disconnect; the service tree is populated by GATT
/// discovery.
#[derive(Debug, Clone)]
pub struct Peripheral {
    pub address: BdAddr,
    pub address_type: AddressType,
    pub conn_handle: Option<u16>,
    pub services: Vec<Service>,
}

impl Peripheral {
    pub fn new(address: BdAddr, address_type: AddressType) -> Self {
        Self {
            address,
            address_type,
            conn_handle: None,
            services: Vec::new(),
        }
    }
}

impl From<&DiscoveredDevice> for Peripheral {
    fn from(dev: &DiscoveredDevice) -> Self {
        Peripheral::new(dev.address, dev.address_type)
    }
}

/// Scan parameter overrides; unset fields use the controller defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSettings {
    /// Discovery duration in controller ticks
    pub time: Option<u16>,
    pub interval: Option<u16>,
    pub window: Option<u16>,
}

/// Default link parameter overrides applied to new connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSettings {
    pub interval: Option<u16>,
    pub latency: Option<u16>,
    pub timeout: Option<u16>,
}

/// Link parameter update for an established connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParamUpdate {
    pub interval: u16,
    pub latency: u16,
    pub timeout: u16,
}
