//! Error types for the blecentral library
//!
//! Transport and controller errors pass through verbatim; the only
//! normalization is the capacity error during link establishment, which is
//! re-signaled as [`Error::ConnectionLimitExceeded`] so callers can tell it
//! apart from other controller failures.

use crate::gatt::Uuid;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Connection Limit Exceeded")]
    ConnectionLimitExceeded,

    #[error("peripheral has no connection handle")]
    NotConnected,

    #[error("expected {0} event missing from collector")]
    MissingEvent(&'static str),

    #[error("characteristic {0} supports neither notify nor indicate")]
    SubscriptionUnsupported(Uuid),

    #[error("characteristic {0} is not writable")]
    NotWritable(Uuid),
}

/// Result alias used across the driver.
pub type Result<T> = std::result::Result<T, Error>;
