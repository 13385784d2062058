//! Common types for GATT operations

use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// UUID of a service, characteristic, or descriptor.
///
/// 128-bit values are stored little-endian, matching the order they arrive
/// in attribute payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uuid {
    Uuid16(u16),
    Uuid128([u8; 16]),
}

impl Uuid {
    pub const fn from_u16(uuid: u16) -> Self {
        Uuid::Uuid16(uuid)
    }

    /// Convert little-endian attribute bytes to a UUID.
    ///
    /// Accepts 2-byte and 16-byte values; anything else is not a UUID this
    /// profile produces.
    pub fn try_from_slice_le(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            2 => Some(Uuid::Uuid16(u16::from_le_bytes([bytes[0], bytes[1]]))),
            16 => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(bytes);
                Some(Uuid::Uuid128(uuid))
            }
            _ => None,
        }
    }

    /// The little-endian byte representation used on the attribute wire.
    pub fn as_bytes_le(&self) -> Vec<u8> {
        match self {
            Uuid::Uuid16(uuid) => uuid.to_le_bytes().to_vec(),
            Uuid::Uuid128(uuid) => uuid.to_vec(),
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uuid::Uuid16(uuid) => write!(f, "0x{:04x}", uuid),
            Uuid::Uuid128(uuid) => {
                write!(
                    f,
                    "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
                    uuid[15], uuid[14], uuid[13], uuid[12],
                    uuid[11], uuid[10],
                    uuid[9], uuid[8],
                    uuid[7], uuid[6],
                    uuid[5], uuid[4], uuid[3], uuid[2], uuid[1], uuid[0]
                )
            }
        }
    }
}

/// Errors from parsing a UUID string.
#[derive(Debug, Error, PartialEq)]
pub enum UuidParseError {
    #[error("invalid UUID length: {0} hex digits")]
    InvalidLength(usize),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    /// Parses `0xNNNN`, bare 4-digit hex, and 32-digit hex with or without
    /// dashes (big-endian string order, as UUIDs are written).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_start_matches("0x")
            .chars()
            .filter(|c| *c != '-')
            .collect();

        match cleaned.len() {
            1..=4 => {
                let mut buf = [0u8; 2];
                let padded = format!("{:0>4}", cleaned);
                hex::decode_to_slice(&padded, &mut buf)?;
                Ok(Uuid::Uuid16(u16::from_be_bytes(buf)))
            }
            32 => {
                let mut be = [0u8; 16];
                hex::decode_to_slice(&cleaned, &mut be)?;
                be.reverse();
                Ok(Uuid::Uuid128(be))
            }
            n => Err(UuidParseError::InvalidLength(n)),
        }
    }
}

bitflags! {
    /// Capability set decoded from a characteristic's property bitmask.
    ///
    /// Unknown bits are retained, so re-encoding with [`Self::bits`]
    /// reproduces the original mask exactly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharacteristicProperties: u16 {
        const BROADCAST = 0x0001;
        const READ = 0x0002;
        const WRITE_WITHOUT_RESPONSE = 0x0004;
        const WRITE = 0x0008;
        const NOTIFY = 0x0010;
        const INDICATE = 0x0020;
        const AUTHENTICATED_SIGNED_WRITES = 0x0040;
        const EXTENDED_PROPERTIES = 0x0080;
    }
}

impl CharacteristicProperties {
    /// Decode a raw property bitmask. Pure; unset bits simply omit the
    /// capability.
    pub fn decode(mask: u16) -> Self {
        Self::from_bits_retain(mask)
    }

    /// Names of the capabilities present in this set.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// A GATT primary service and its discovered characteristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub uuid: Uuid,
    /// First handle of the service's attribute group
    pub start_handle: u16,
    /// Last handle of the service's attribute group; equal to
    /// `start_handle` for a service with no characteristics
    pub end_handle: u16,
    /// Characteristics in controller-reported discovery order
    pub characteristics: Vec<Characteristic>,
}

/// A GATT characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    /// Value attribute handle
    pub handle: u16,
    pub uuid: Uuid,
    pub properties: CharacteristicProperties,
}
