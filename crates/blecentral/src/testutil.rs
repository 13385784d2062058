//! Scripted mock transport shared by the driver tests.

use crate::gap::{BdAddr, DiscoveryMode, GapParam};
use crate::gatt::Uuid;
use crate::smp::{BondParam, PairingReply, PairingRequest};
use crate::transport::{
    Collector, RadioTransport, ResetKind, SerialConfig, TransportError,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const LOCAL_ADDR: BdAddr = BdAddr {
    bytes: [0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
};

/// Every request the driver issued, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(SerialConfig),
    Close,
    ResetSystem(ResetKind),
    SetGapParam(GapParam, u16),
    SetBondParam(BondParam, Vec<u8>),
    DeviceDiscovery {
        mode: DiscoveryMode,
        active_scan: bool,
        white_list: bool,
    },
    DeviceDiscoveryCancel,
    EstablishLink {
        high_duty_cycle: bool,
        white_list: bool,
        addr_type: u8,
        address: BdAddr,
    },
    TerminateLink {
        conn_handle: u16,
        reason: u8,
    },
    UpdateLinkParam {
        conn_handle: u16,
        interval_min: u16,
        interval_max: u16,
        latency: u16,
        timeout: u16,
    },
    Authenticate {
        conn_handle: u16,
        request: PairingRequest,
        reply: PairingReply,
    },
    TerminateAuth {
        conn_handle: u16,
        reason: u8,
    },
    Bond {
        conn_handle: u16,
        mitm: bool,
        ltk: Vec<u8>,
        div: u16,
        rand: [u8; 8],
        key_size: u8,
    },
    PasskeyUpdate {
        conn_handle: u16,
        passkey: u32,
    },
    DiscoverPrimaryServices {
        conn_handle: u16,
    },
    DiscoverCharacteristics {
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
    },
    ReadCharValue {
        conn_handle: u16,
        handle: u16,
        uuid: Uuid,
    },
    ReadByCharUuid {
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
        uuid: Uuid,
    },
    WriteCharValue {
        conn_handle: u16,
        handle: u16,
        value: Vec<u8>,
        uuid: Uuid,
    },
    WriteNoRsp {
        conn_handle: u16,
        handle: u16,
        value: Vec<u8>,
        uuid: Uuid,
    },
    HandleValueConfirm {
        conn_handle: u16,
    },
    RegisterUuidTable {
        conn_handle: u16,
        table: HashMap<u16, Uuid>,
    },
}

/// Mock transport replaying scripted outcomes.
///
/// Unit-returning commands drain `acks` in call order and default to
/// success; collector-returning commands consume their dedicated slot and
/// default to an empty collector. Characteristic discovery replies are keyed
/// by handle range so the fan-out stays order-independent.
#[derive(Default)]
pub struct MockTransport {
    pub calls: Mutex<Vec<Call>>,
    pub open_reply: Mutex<Option<Result<BdAddr, TransportError>>>,
    pub acks: Mutex<VecDeque<Result<(), TransportError>>>,
    pub discovery_reply: Mutex<Option<Result<Collector, TransportError>>>,
    pub link_reply: Mutex<Option<Result<Collector, TransportError>>>,
    pub auth_reply: Mutex<Option<Result<Collector, TransportError>>>,
    pub services_reply: Mutex<Option<Result<Collector, TransportError>>>,
    pub characteristics_replies: Mutex<HashMap<(u16, u16), Result<Collector, TransportError>>>,
    pub read_reply: Mutex<Option<Result<Collector, TransportError>>>,
    pub read_by_uuid_replies: Mutex<VecDeque<Result<Collector, TransportError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_ack(&self) -> Result<(), TransportError> {
        self.acks.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

fn take_or_empty(
    slot: &Mutex<Option<Result<Collector, TransportError>>>,
) -> Result<Collector, TransportError> {
    slot.lock()
        .unwrap()
        .take()
        .unwrap_or_else(|| Ok(Collector::default()))
}

#[async_trait]
impl RadioTransport for MockTransport {
    async fn open(&self, config: &SerialConfig) -> Result<BdAddr, TransportError> {
        self.record(Call::Open(config.clone()));
        self.open_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(LOCAL_ADDR))
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.record(Call::Close);
        self.next_ack()
    }

    async fn reset_system(&self, kind: ResetKind) -> Result<(), TransportError> {
        self.record(Call::ResetSystem(kind));
        self.next_ack()
    }

    async fn set_gap_param(&self, param: GapParam, value: u16) -> Result<(), TransportError> {
        self.record(Call::SetGapParam(param, value));
        self.next_ack()
    }

    async fn set_bond_param(&self, param: BondParam, value: &[u8]) -> Result<(), TransportError> {
        self.record(Call::SetBondParam(param, value.to_vec()));
        self.next_ack()
    }

    async fn device_discovery(
        &self,
        mode: DiscoveryMode,
        active_scan: bool,
        white_list: bool,
    ) -> Result<Collector, TransportError> {
        self.record(Call::DeviceDiscovery {
            mode,
            active_scan,
            white_list,
        });
        take_or_empty(&self.discovery_reply)
    }

    async fn device_discovery_cancel(&self) -> Result<(), TransportError> {
        self.record(Call::DeviceDiscoveryCancel);
        self.next_ack()
    }

    async fn establish_link(
        &self,
        high_duty_cycle: bool,
        white_list: bool,
        addr_type: u8,
        address: BdAddr,
    ) -> Result<Collector, TransportError> {
        self.record(Call::EstablishLink {
            high_duty_cycle,
            white_list,
            addr_type,
            address,
        });
        take_or_empty(&self.link_reply)
    }

    async fn terminate_link(&self, conn_handle: u16, reason: u8) -> Result<(), TransportError> {
        self.record(Call::TerminateLink {
            conn_handle,
            reason,
        });
        self.next_ack()
    }

    async fn update_link_param(
        &self,
        conn_handle: u16,
        interval_min: u16,
        interval_max: u16,
        latency: u16,
        timeout: u16,
    ) -> Result<(), TransportError> {
        self.record(Call::UpdateLinkParam {
            conn_handle,
            interval_min,
            interval_max,
            latency,
            timeout,
        });
        self.next_ack()
    }

    async fn authenticate(
        &self,
        conn_handle: u16,
        request: &PairingRequest,
        reply: &PairingReply,
    ) -> Result<Collector, TransportError> {
        self.record(Call::Authenticate {
            conn_handle,
            request: request.clone(),
            reply: reply.clone(),
        });
        take_or_empty(&self.auth_reply)
    }

    async fn terminate_auth(&self, conn_handle: u16, reason: u8) -> Result<(), TransportError> {
        self.record(Call::TerminateAuth {
            conn_handle,
            reason,
        });
        self.next_ack()
    }

    async fn bond(
        &self,
        conn_handle: u16,
        mitm: bool,
        ltk: &[u8],
        div: u16,
        rand: [u8; 8],
        key_size: u8,
    ) -> Result<(), TransportError> {
        self.record(Call::Bond {
            conn_handle,
            mitm,
            ltk: ltk.to_vec(),
            div,
            rand,
            key_size,
        });
        self.next_ack()
    }

    async fn passkey_update(&self, conn_handle: u16, passkey: u32) -> Result<(), TransportError> {
        self.record(Call::PasskeyUpdate {
            conn_handle,
            passkey,
        });
        self.next_ack()
    }

    async fn discover_primary_services(
        &self,
        conn_handle: u16,
    ) -> Result<Collector, TransportError> {
        self.record(Call::DiscoverPrimaryServices { conn_handle });
        take_or_empty(&self.services_reply)
    }

    async fn discover_characteristics(
        &self,
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> Result<Collector, TransportError> {
        self.record(Call::DiscoverCharacteristics {
            conn_handle,
            start_handle,
            end_handle,
        });
        self.characteristics_replies
            .lock()
            .unwrap()
            .remove(&(start_handle, end_handle))
            .unwrap_or_else(|| Ok(Collector::default()))
    }

    async fn read_char_value(
        &self,
        conn_handle: u16,
        handle: u16,
        uuid: &Uuid,
    ) -> Result<Collector, TransportError> {
        self.record(Call::ReadCharValue {
            conn_handle,
            handle,
            uuid: *uuid,
        });
        take_or_empty(&self.read_reply)
    }

    async fn read_by_char_uuid(
        &self,
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
        uuid: &Uuid,
    ) -> Result<Collector, TransportError> {
        self.record(Call::ReadByCharUuid {
            conn_handle,
            start_handle,
            end_handle,
            uuid: *uuid,
        });
        self.read_by_uuid_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Collector::default()))
    }

    async fn write_char_value(
        &self,
        conn_handle: u16,
        handle: u16,
        value: &[u8],
        uuid: &Uuid,
    ) -> Result<(), TransportError> {
        self.record(Call::WriteCharValue {
            conn_handle,
            handle,
            value: value.to_vec(),
            uuid: *uuid,
        });
        self.next_ack()
    }

    async fn write_no_rsp(
        &self,
        conn_handle: u16,
        handle: u16,
        value: &[u8],
        uuid: &Uuid,
    ) -> Result<(), TransportError> {
        self.record(Call::WriteNoRsp {
            conn_handle,
            handle,
            value: value.to_vec(),
            uuid: *uuid,
        });
        self.next_ack()
    }

    async fn handle_value_confirm(&self, conn_handle: u16) -> Result<(), TransportError> {
        self.record(Call::HandleValueConfirm { conn_handle });
        self.next_ack()
    }

    fn register_uuid_table(&self, conn_handle: u16, table: HashMap<u16, Uuid>) {
        self.record(Call::RegisterUuidTable { conn_handle, table });
    }
}
