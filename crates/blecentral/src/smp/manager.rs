//! Pairing and bonding controller
//!
//! Drives authentication against the controller's bond manager and tracks a
//! per-connection [`SecurityContext`]. Controller-rejected pairing steps
//! surface their native error unmodified; a failed attempt is terminal and
//! must be restarted by the caller.

use crate::error::{Error, Result};
use crate::gap::Peripheral;
use crate::smp::constants::{DEFAULT_ENC_KEY_SIZE, TERM_AUTH_REASON};
use crate::smp::types::*;
use crate::transport::RadioTransport;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Authentication and bonding controller.
pub struct SecurityManager<T: RadioTransport> {
    transport: Arc<T>,
    contexts: Mutex<HashMap<u16, SecurityContext>>,
}

impl<T: RadioTransport> SecurityManager<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Start pairing on an established link.
    ///
    /// Requests distribution of every key type in both directions, with a
    /// zero-filled out-of-band block and MITM/bonding encoded as independent
    /// flags. Resolves with the full authentication-complete payload so the
    /// caller can read the negotiated parameters.
    pub async fn authenticate(
        &self,
        peripheral: &Peripheral,
        io_capability: IoCapability,
        mitm: bool,
        bonding: bool,
    ) -> Result<AuthComplete> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;

        let mut auth_req = AuthRequirements::empty();
        if mitm {
            auth_req |= AuthRequirements::MITM;
        }
        if bonding {
            auth_req |= AuthRequirements::BONDING;
        }

        let request = PairingRequest {
            io_capability,
            oob_available: false,
            oob_data: [0u8; 16],
            auth_req,
            max_key_size: DEFAULT_ENC_KEY_SIZE,
            key_distribution: KeyDistribution::all(),
        };
        let reply = PairingReply::disabled();

        self.contexts.lock().unwrap().insert(
            conn_handle,
            SecurityContext::new(io_capability, mitm, bonding, KeyDistribution::all()),
        );

        debug!(
            "pairing on {:#06x} (io {}, auth req {:#04x})",
            conn_handle,
            io_capability,
            auth_req.bits()
        );
        let collector = self
            .transport
            .authenticate(conn_handle, &request, &reply)
            .await?;

        let complete = collector
            .auth_complete
            .into_iter()
            .next()
            .ok_or(Error::MissingEvent("AuthenticationComplete"))?;

        if let Some(sec_info) = &complete.sec_info {
            let mut contexts = self.contexts.lock().unwrap();
            if let Some(context) = contexts.get_mut(&conn_handle) {
                context.keys = Some(BondingKeys {
                    ltk: sec_info.ltk.clone(),
                    div: sec_info.div,
                    rand: sec_info.rand,
                });
            }
        }

        info!("pairing complete on {:#06x}", conn_handle);
        Ok(complete)
    }

    /// Abort an in-progress pairing.
    pub async fn terminate_authentication(&self, peripheral: &Peripheral) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        self.transport
            .terminate_auth(conn_handle, TERM_AUTH_REASON)
            .await?;
        self.contexts.lock().unwrap().remove(&conn_handle);
        Ok(())
    }

    /// Complete bonding by handing the long-term key material to the
    /// controller.
    ///
    /// The key length is taken from the LTK buffer, so shortened keys are
    /// passed through as-is.
    pub async fn bond(
        &self,
        peripheral: &Peripheral,
        mitm: bool,
        keys: &BondingKeys,
    ) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        let key_size = keys.ltk.len() as u8;

        self.transport
            .bond(conn_handle, mitm, &keys.ltk, keys.div, keys.rand, key_size)
            .await?;

        let mut contexts = self.contexts.lock().unwrap();
        if let Some(context) = contexts.get_mut(&conn_handle) {
            context.keys = Some(keys.clone());
        }
        info!("bonded on {:#06x}", conn_handle);
        Ok(())
    }

    /// Supply a passkey during a numeric-entry pairing.
    pub async fn update_passkey(&self, peripheral: &Peripheral, passkey: u32) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        self.transport.passkey_update(conn_handle, passkey).await?;
        Ok(())
    }

    /// Wipe every bond record held by the controller's bond manager.
    pub async fn erase_all_bonds(&self) -> Result<()> {
        self.transport
            .set_bond_param(BondParam::EraseAllBonds, &[0])
            .await?;
        Ok(())
    }

    /// The pairing state tracked for a connection, if any.
    pub fn context(&self, conn_handle: u16) -> Option<SecurityContext> {
        self.contexts.lock().unwrap().get(&conn_handle).cloned()
    }

    /// Drop the pairing state for a connection, e.g. after disconnect.
    pub fn clear(&self, conn_handle: u16) {
        self.contexts.lock().unwrap().remove(&conn_handle);
    }
}
