//! Radio transport contract
//!
//! The serial framing, command encoding, and event de-multiplexing that talk
//! to the BLE network processor live behind this trait. The driver only sees
//! request functions that resolve to a decoded value or a transport error,
//! and — for multi-event commands — a [`Collector`] holding every event the
//! controller emitted during the lifetime of that command.

use crate::gap::{BdAddr, DiscoveredDevice, DiscoveryMode, GapParam};
use crate::gatt::Uuid;
use crate::smp::{AuthComplete, BondParam, PairingReply, PairingRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Serial port settings handed to the transport when it is brought up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyACM0`
    pub path: String,
    /// Baud rate for the UART link
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            baud_rate: 115_200,
        }
    }
}

/// Controller reset flavor.
///
/// Mode selection follows the controller convention: `0` or `"soft"` selects
/// a warm reset, anything else (including an omitted mode) a cold one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetKind {
    Soft,
    #[default]
    Hard,
}

impl From<u8> for ResetKind {
    fn from(mode: u8) -> Self {
        match mode {
            0 => ResetKind::Soft,
            _ => ResetKind::Hard,
        }
    }
}

impl FromStr for ResetKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" | "0" => Ok(ResetKind::Soft),
            _ => Ok(ResetKind::Hard),
        }
    }
}

/// Status names reported by the controller on a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    NoResources,
    InvalidParameter,
    IncorrectMode,
    NotConnected,
    Timeout,
    Unspecified,
    Other(u8),
}

impl std::fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerStatus::NoResources => write!(f, "bleNoResources"),
            ControllerStatus::InvalidParameter => write!(f, "bleInvalidParameter"),
            ControllerStatus::IncorrectMode => write!(f, "bleIncorrectMode"),
            ControllerStatus::NotConnected => write!(f, "bleNotConnected"),
            ControllerStatus::Timeout => write!(f, "bleTimeout"),
            ControllerStatus::Unspecified => write!(f, "bleUnspecified"),
            ControllerStatus::Other(code) => write!(f, "bleStatus({code:#04x})"),
        }
    }
}

/// Errors surfaced by the radio transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serial port error: {0}")]
    Serial(#[from] std::io::Error),

    #[error("controller rejected command: {0}")]
    Controller(ControllerStatus),

    #[error("request timed out")]
    Timeout,
}

/// One grouped-type entry from a primary-service discovery PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeGroup {
    pub start_handle: u16,
    pub end_handle: u16,
    /// Group value, the service UUID in 2- or 16-byte little-endian form
    pub value: Vec<u8>,
}

/// One read-by-group-type response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadByGroupTypeRsp {
    /// Per-PDU status; non-zero PDUs carry no usable entries
    pub status: u8,
    pub groups: Vec<AttributeGroup>,
}

/// One handle/value pair from a read-by-type response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleValue {
    pub handle: u16,
    pub value: Vec<u8>,
}

/// One read-by-type response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadByTypeRsp {
    pub status: u8,
    pub attributes: Vec<HandleValue>,
}

/// A plain attribute read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRsp {
    pub value: Vec<u8>,
}

/// One device-discovery-done event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDiscoveryRsp {
    pub devices: Vec<DiscoveredDevice>,
}

/// Link-established event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEstablished {
    pub address: BdAddr,
    pub address_type: crate::gap::AddressType,
    pub conn_handle: u16,
    pub interval: u16,
    pub latency: u16,
    pub timeout: u16,
    pub clock_accuracy: u8,
}

/// All events emitted by the controller during one logical operation,
/// grouped by event type and kept in PDU arrival order within each group.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    pub device_discovery: Vec<DeviceDiscoveryRsp>,
    pub link_established: Vec<LinkEstablished>,
    pub auth_complete: Vec<AuthComplete>,
    pub read_by_group_type: Vec<ReadByGroupTypeRsp>,
    pub read_by_type: Vec<ReadByTypeRsp>,
    pub read_rsp: Vec<ReadRsp>,
}

/// The command surface of the radio transport.
///
/// One method per controller command. Methods either acknowledge with a unit
/// value, resolve to a decoded payload, or — for commands whose outcome spans
/// several asynchronous events — resolve to a [`Collector`].
#[async_trait]
pub trait RadioTransport: Send + Sync {
    /// Bring the transport up in central role. Resolves with the local
    /// device address.
    async fn open(&self, config: &SerialConfig) -> Result<BdAddr, TransportError>;

    /// Shut the transport down.
    async fn close(&self) -> Result<(), TransportError>;

    /// Issue a controller reset.
    async fn reset_system(&self, kind: ResetKind) -> Result<(), TransportError>;

    async fn set_gap_param(&self, param: GapParam, value: u16) -> Result<(), TransportError>;

    async fn set_bond_param(&self, param: BondParam, value: &[u8]) -> Result<(), TransportError>;

    /// Run a bounded device discovery. The collector carries the
    /// discovery-done event with the peripherals seen.
    async fn device_discovery(
        &self,
        mode: DiscoveryMode,
        active_scan: bool,
        white_list: bool,
    ) -> Result<Collector, TransportError>;

    /// Terminate an in-flight device discovery early.
    async fn device_discovery_cancel(&self) -> Result<(), TransportError>;

    /// Request link establishment to a peer.
    async fn establish_link(
        &self,
        high_duty_cycle: bool,
        white_list: bool,
        addr_type: u8,
        address: BdAddr,
    ) -> Result<Collector, TransportError>;

    /// Terminate an established or pending link.
    async fn terminate_link(&self, conn_handle: u16, reason: u8) -> Result<(), TransportError>;

    async fn update_link_param(
        &self,
        conn_handle: u16,
        interval_min: u16,
        interval_max: u16,
        latency: u16,
        timeout: u16,
    ) -> Result<(), TransportError>;

    /// Start pairing on an established link.
    async fn authenticate(
        &self,
        conn_handle: u16,
        request: &PairingRequest,
        reply: &PairingReply,
    ) -> Result<Collector, TransportError>;

    async fn terminate_auth(&self, conn_handle: u16, reason: u8) -> Result<(), TransportError>;

    async fn bond(
        &self,
        conn_handle: u16,
        mitm: bool,
        ltk: &[u8],
        div: u16,
        rand: [u8; 8],
        key_size: u8,
    ) -> Result<(), TransportError>;

    async fn passkey_update(&self, conn_handle: u16, passkey: u32) -> Result<(), TransportError>;

    /// Discover all primary services over the full handle space.
    async fn discover_primary_services(&self, conn_handle: u16)
        -> Result<Collector, TransportError>;

    /// Discover all characteristics within a service's handle range.
    async fn discover_characteristics(
        &self,
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> Result<Collector, TransportError>;

    async fn read_char_value(
        &self,
        conn_handle: u16,
        handle: u16,
        uuid: &Uuid,
    ) -> Result<Collector, TransportError>;

    /// UUID-scoped read over a handle range.
    async fn read_by_char_uuid(
        &self,
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
        uuid: &Uuid,
    ) -> Result<Collector, TransportError>;

    async fn write_char_value(
        &self,
        conn_handle: u16,
        handle: u16,
        value: &[u8],
        uuid: &Uuid,
    ) -> Result<(), TransportError>;

    async fn write_no_rsp(
        &self,
        conn_handle: u16,
        handle: u16,
        value: &[u8],
        uuid: &Uuid,
    ) -> Result<(), TransportError>;

    /// Acknowledge a received indication.
    async fn handle_value_confirm(&self, conn_handle: u16) -> Result<(), TransportError>;

    /// Register the handle-to-UUID table used to resolve later notification
    /// events for a connection.
    fn register_uuid_table(&self, conn_handle: u16, table: HashMap<u16, Uuid>);
}
