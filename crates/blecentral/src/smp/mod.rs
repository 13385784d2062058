//! Security layer: pairing, passkey exchange, and bonding
//!
//! The controller runs the Security Manager Protocol itself; this module
//! drives it — building pairing requests, relaying passkeys, supplying key
//! material for bonding — and tracks the resulting per-connection security
//! state.

pub mod constants;
pub mod manager;
pub mod types;


pub use manager::SecurityManager;
pub use types::{
    AuthComplete, AuthRequirements, BondParam, BondingKeys, IdentityInfo, IoCapability,
    KeyDistribution, PairingReply, PairingRequest, SecurityContext, SecurityInfo, SigningInfo,
};
