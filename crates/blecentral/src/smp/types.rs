//! Type definitions for pairing and bonding

use crate::gap::BdAddr;
use crate::smp::constants;
use bitflags::bitflags;
use std::fmt;

/// IO capability advertised during pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCapability {
    DisplayOnly,
    DisplayYesNo,
    KeyboardOnly,
    NoInputNoOutput,
    KeyboardDisplay,
}

impl IoCapability {
    pub fn to_u8(self) -> u8 {
        match self {
            IoCapability::DisplayOnly => constants::IO_CAP_DISPLAY_ONLY,
            IoCapability::DisplayYesNo => constants::IO_CAP_DISPLAY_YES_NO,
            IoCapability::KeyboardOnly => constants::IO_CAP_KEYBOARD_ONLY,
            IoCapability::NoInputNoOutput => constants::IO_CAP_NO_INPUT_NO_OUTPUT,
            IoCapability::KeyboardDisplay => constants::IO_CAP_KEYBOARD_DISPLAY,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            constants::IO_CAP_DISPLAY_ONLY => Some(IoCapability::DisplayOnly),
            constants::IO_CAP_DISPLAY_YES_NO => Some(IoCapability::DisplayYesNo),
            constants::IO_CAP_KEYBOARD_ONLY => Some(IoCapability::KeyboardOnly),
            constants::IO_CAP_NO_INPUT_NO_OUTPUT => Some(IoCapability::NoInputNoOutput),
            constants::IO_CAP_KEYBOARD_DISPLAY => Some(IoCapability::KeyboardDisplay),
            _ => None,
        }
    }
}

impl fmt::Display for IoCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoCapability::DisplayOnly => write!(f, "Display Only"),
            IoCapability::DisplayYesNo => write!(f, "Display Yes/No"),
            IoCapability::KeyboardOnly => write!(f, "Keyboard Only"),
            IoCapability::NoInputNoOutput => write!(f, "No Input No Output"),
            IoCapability::KeyboardDisplay => write!(f, "Keyboard Display"),
        }
    }
}

bitflags! {
    /// Authentication requirement flags carried in a pairing request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AuthRequirements: u8 {
        const BONDING = 0x01;
        const MITM = 0x04;
    }
}

bitflags! {
    /// Key distribution mask: which key types each side hands out after
    /// pairing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyDistribution: u8 {
        const SLAVE_ENC_KEY = 0x01;
        const SLAVE_ID_KEY = 0x02;
        const SLAVE_SIGN_KEY = 0x04;
        const MASTER_ENC_KEY = 0x08;
        const MASTER_ID_KEY = 0x10;
        const MASTER_SIGN_KEY = 0x20;
    }
}

/// Bond-manager parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum BondParam {
    PairingMode = 0x0400,
    MitmProtection = 0x0402,
    IoCapabilities = 0x0403,
    OobEnabled = 0x0404,
    OobData = 0x0405,
    BondingEnabled = 0x0406,
    KeyDistList = 0x0407,
    EraseAllBonds = 0x040A,
}

impl BondParam {
    pub fn id(self) -> u16 {
        self as u16
    }
}

/// The local half of a pairing exchange sent to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRequest {
    pub io_capability: IoCapability,
    pub oob_available: bool,
    pub oob_data: [u8; 16],
    pub auth_req: AuthRequirements,
    pub max_key_size: u8,
    pub key_distribution: KeyDistribution,
}

/// Auto-reply policy for a pairing request initiated by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingReply {
    pub enabled: bool,
    pub io_capability: u8,
    pub oob_available: bool,
    pub auth_req: AuthRequirements,
    pub max_key_size: u8,
    pub key_distribution: KeyDistribution,
}

impl PairingReply {
    /// A reply policy that leaves peer-initiated pairing unanswered.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            io_capability: 0,
            oob_available: false,
            auth_req: AuthRequirements::empty(),
            max_key_size: constants::DEFAULT_ENC_KEY_SIZE,
            key_distribution: KeyDistribution::all(),
        }
    }
}

/// Long-term key material produced by bonding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondingKeys {
    /// LTK value; 8- and 16-byte keys are both in use
    pub ltk: Vec<u8>,
    /// Encrypted diversifier
    pub div: u16,
    /// Random value paired with the diversifier
    pub rand: [u8; 8],
}

/// Negotiated security material from an authentication-complete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityInfo {
    pub key_size: u8,
    pub ltk: Vec<u8>,
    pub div: u16,
    pub rand: [u8; 8],
}

/// Identity resolving material from an authentication-complete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInfo {
    pub irk: [u8; 16],
    pub address: BdAddr,
}

/// Signing material from an authentication-complete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInfo {
    pub csrk: [u8; 16],
    pub sign_counter: u32,
}

/// Full authentication-complete event payload.
///
/// Callers need more than a pass/fail bit: the negotiated key size and the
/// distributed key material all come out of this event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthComplete {
    pub conn_handle: u16,
    pub auth_state: u8,
    pub sec_info: Option<SecurityInfo>,
    pub dev_sec_info: Option<SecurityInfo>,
    pub identity_info: Option<IdentityInfo>,
    pub signing_info: Option<SigningInfo>,
}

/// Per-connection pairing state.
///
/// Created when authentication starts, updated with key material as pairing
/// and bonding complete, dropped on termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub io_capability: IoCapability,
    pub mitm: bool,
    pub bonding: bool,
    pub key_distribution: KeyDistribution,
    pub keys: Option<BondingKeys>,
}

impl SecurityContext {
    pub fn new(
        io_capability: IoCapability,
        mitm: bool,
        bonding: bool,
        key_distribution: KeyDistribution,
    ) -> Self {
        Self {
            io_capability,
            mitm,
            bonding,
            key_distribution,
            keys: None,
        }
    }
}
