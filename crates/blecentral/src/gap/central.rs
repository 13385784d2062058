use crate::error::{Error, Result};
use crate::gap::constants::*;
use crate::gap::types::*;
use crate::transport::{ControllerStatus, RadioTransport, ResetKind, SerialConfig, TransportError};
use log::{debug, info};
use std::sync::{Arc, Mutex};

/// Central-role connection lifecycle controller.
///
/// Owns the injected transport handle and drives transport bring-up, device
/// discovery, link establishment and teardown, and link parameter updates.
/// All other driver components share the same transport through their own
/// `Arc` clone.
pub struct CentralAdapter<T: RadioTransport> {
    transport: Arc<T>,
    local_address: Mutex<Option<BdAddr>>,
}

impl<T: RadioTransport> CentralAdapter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            local_address: Mutex::new(None),
        }
    }

    /// Bring the transport up in central role.
    ///
    /// Resolves with the local device address, which is also cached for
    /// later lookup via [`CentralAdapter::local_address`].
    pub async fn initialize(&self, config: &SerialConfig) -> Result<BdAddr> {
        let addr = self.transport.open(config).await?;
        *self.local_address.lock().unwrap() = Some(addr);
        info!("central initialized, local address {}", addr);
        Ok(addr)
    }

    /// The local device address, if the transport has been initialized.
    pub fn local_address(&self) -> Option<BdAddr> {
        *self.local_address.lock().unwrap()
    }

    /// Issue a controller reset.
    pub async fn reset(&self, kind: ResetKind) -> Result<()> {
        debug!("controller reset ({:?})", kind);
        self.transport.reset_system(kind).await?;
        Ok(())
    }

    /// Hard-reset the controller, then shut the transport down.
    ///
    /// A reset failure propagates before the shutdown is attempted.
    pub async fn close(&self) -> Result<()> {
        self.reset(ResetKind::Hard).await?;
        self.transport.close().await?;
        *self.local_address.lock().unwrap() = None;
        Ok(())
    }

    /// Write the three scan parameters, stopping at the first failure.
    pub async fn set_scan_parameters(&self, settings: ScanSettings) -> Result<()> {
        let time = settings.time.unwrap_or(DEFAULT_SCAN_DURATION);
        let interval = settings.interval.unwrap_or(DEFAULT_SCAN_INTERVAL);
        let window = settings.window.unwrap_or(DEFAULT_SCAN_WINDOW);

        self.transport
            .set_gap_param(GapParam::GenDiscoveryScan, time)
            .await?;
        self.transport
            .set_gap_param(GapParam::ConnEstScanInterval, interval)
            .await?;
        self.transport
            .set_gap_param(GapParam::ConnEstScanWindow, window)
            .await?;
        Ok(())
    }

    /// Write the controller's default link parameters for new connections,
    /// stopping at the first failure.
    ///
    /// The same interval value is written to both the minimum and maximum
    /// interval slots.
    pub async fn set_link_parameters(&self, settings: LinkSettings) -> Result<()> {
        let interval = settings.interval.unwrap_or(DEFAULT_CONN_INTERVAL);
        let latency = settings.latency.unwrap_or(DEFAULT_CONN_LATENCY);
        let timeout = settings.timeout.unwrap_or(DEFAULT_CONN_TIMEOUT);

        self.transport
            .set_gap_param(GapParam::ConnEstIntervalMin, interval)
            .await?;
        self.transport
            .set_gap_param(GapParam::ConnEstIntervalMax, interval)
            .await?;
        self.transport
            .set_gap_param(GapParam::ConnEstLatency, latency)
            .await?;
        self.transport
            .set_gap_param(GapParam::ConnEstSupervisionTimeout, timeout)
            .await?;
        Ok(())
    }

    /// Run one bounded, active, unfiltered device discovery.
    ///
    /// Resolves with the discovered-peripheral list once the controller
    /// reports discovery done; an empty list if nothing was seen.
    pub async fn scan(&self) -> Result<Vec<DiscoveredDevice>> {
        let collector = self
            .transport
            .device_discovery(DiscoveryMode::All, true, false)
            .await?;

        let devices = collector
            .device_discovery
            .into_iter()
            .next()
            .map(|evt| evt.devices)
            .unwrap_or_default();
        debug!("device discovery finished, {} peripherals", devices.len());
        Ok(devices)
    }

    /// Ask the controller to end an in-flight scan early.
    pub async fn cancel_scan(&self) -> Result<()> {
        self.transport.device_discovery_cancel().await?;
        Ok(())
    }

    /// Establish a link to a peripheral using the controller's default link
    /// parameters.
    ///
    /// Resolves with the connected peer's address. A controller
    /// resource-exhaustion status is re-signaled as
    /// [`Error::ConnectionLimitExceeded`]; every other controller error
    /// passes through unchanged.
    pub async fn connect(&self, peripheral: &Peripheral) -> Result<BdAddr> {
        let addr_type = u8::from(peripheral.address_type);

        debug!("establishing link to {}", peripheral.address);
        let collector = match self
            .transport
            .establish_link(true, false, addr_type, peripheral.address)
            .await
        {
            Ok(collector) => collector,
            Err(TransportError::Controller(ControllerStatus::NoResources)) => {
                return Err(Error::ConnectionLimitExceeded);
            }
            Err(err) => return Err(err.into()),
        };

        let link = collector
            .link_established
            .first()
            .ok_or(Error::MissingEvent("LinkEstablished"))?;
        info!(
            "link established to {} (handle {:#06x})",
            link.address, link.conn_handle
        );
        Ok(link.address)
    }

    /// Abort a connection attempt that has not completed yet.
    pub async fn connect_cancel(&self) -> Result<()> {
        self.transport
            .terminate_link(PENDING_CONN_HANDLE, TERM_REASON_USER)
            .await?;
        Ok(())
    }

    /// Terminate an established link.
    pub async fn disconnect(&self, peripheral: &Peripheral) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        debug!("terminating link {:#06x}", conn_handle);
        self.transport
            .terminate_link(conn_handle, TERM_REASON_USER)
            .await?;
        Ok(())
    }

    /// Request a link parameter update on an established connection.
    ///
    /// The caller-supplied interval is sent as both the minimum and the
    /// maximum interval.
    pub async fn update_link_parameters(
        &self,
        peripheral: &Peripheral,
        settings: LinkParamUpdate,
    ) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        self.transport
            .update_link_param(
                conn_handle,
                settings.interval,
                settings.interval,
                settings.latency,
                settings.timeout,
            )
            .await?;
        Ok(())
    }
}
