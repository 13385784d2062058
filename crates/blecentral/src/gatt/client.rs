//! GATT client driver
//!
//! Discovery of the full service/characteristic tree, characteristic value
//! access, and notification configuration, all in terms of the radio
//! transport's command surface.

use crate::error::{Error, Result};
use crate::gap::Peripheral;
use crate::gatt::constants::*;
use crate::gatt::types::{Characteristic, CharacteristicProperties, Service, Uuid};
use crate::transport::{Collector, RadioTransport};
use byteorder::{LittleEndian, ReadBytesExt};
use futures::future;
use log::{debug, info};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// GATT discovery engine and attribute access driver.
pub struct GattDriver<T: RadioTransport> {
    transport: Arc<T>,
}

impl<T: RadioTransport> GattDriver<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Discover every primary service and, per service, every
    /// characteristic.
    ///
    /// Service discovery runs first over the full handle space; each
    /// discovered service with a non-empty handle range is then queried for
    /// characteristics concurrently. The operation resolves only once every
    /// per-service query has completed, with services and characteristics in
    /// controller-reported order. Any sub-query failure fails the whole
    /// operation; sibling queries still run to completion and their results
    /// are discarded.
    pub async fn discover_all_services_and_characteristics(
        &self,
        peripheral: &Peripheral,
    ) -> Result<Vec<Service>> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;

        let collector = self.transport.discover_primary_services(conn_handle).await?;
        let mut services = collect_services(&collector);
        debug!(
            "discovered {} primary services on {:#06x}",
            services.len(),
            conn_handle
        );

        // A service whose group is a single handle has no room for
        // characteristics and is never queried.
        let lookups: Vec<_> = services
            .iter()
            .enumerate()
            .filter(|(_, service)| service.start_handle != service.end_handle)
            .map(|(index, service)| {
                let (start_handle, end_handle) = (service.start_handle, service.end_handle);
                async move {
                    (
                        index,
                        self.discover_characteristics(conn_handle, start_handle, end_handle)
                            .await,
                    )
                }
            })
            .collect();

        for (index, outcome) in future::join_all(lookups).await {
            services[index].characteristics = outcome?;
        }

        info!(
            "service tree complete on {:#06x}: {} services",
            conn_handle,
            services.len()
        );
        Ok(services)
    }

    async fn discover_characteristics(
        &self,
        conn_handle: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> Result<Vec<Characteristic>> {
        let collector = self
            .transport
            .discover_characteristics(conn_handle, start_handle, end_handle)
            .await?;

        let mut characteristics = Vec::new();
        for rsp in &collector.read_by_type {
            if rsp.status != ATT_STATUS_SUCCESS {
                continue;
            }
            for attribute in &rsp.attributes {
                if let Some(characteristic) = decode_declaration(&attribute.value) {
                    characteristics.push(characteristic);
                }
            }
        }
        Ok(characteristics)
    }

    /// Read a characteristic's value.
    pub async fn read(
        &self,
        peripheral: &Peripheral,
        characteristic: &Characteristic,
    ) -> Result<Vec<u8>> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        let collector = self
            .transport
            .read_char_value(conn_handle, characteristic.handle, &characteristic.uuid)
            .await?;

        collector
            .read_rsp
            .into_iter()
            .next()
            .map(|rsp| rsp.value)
            .ok_or(Error::MissingEvent("ReadRsp"))
    }

    /// Read a characteristic's user-description descriptor.
    pub async fn read_descriptor(
        &self,
        peripheral: &Peripheral,
        service: &Service,
        characteristic: &Characteristic,
    ) -> Result<Vec<u8>> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;
        let end_handle = descriptor_search_end(service, characteristic.handle);
        let collector = self
            .transport
            .read_by_char_uuid(
                conn_handle,
                characteristic.handle,
                end_handle,
                &Uuid::from_u16(CHAR_USER_DESCRIPTION_UUID),
            )
            .await?;

        first_attribute(&collector)
            .map(|attribute| attribute.value.clone())
            .ok_or(Error::MissingEvent("ReadByTypeRsp"))
    }

    /// Write a characteristic's value, with or without response depending on
    /// the characteristic's capabilities.
    pub async fn write(
        &self,
        peripheral: &Peripheral,
        characteristic: &Characteristic,
        value: &[u8],
    ) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;

        if characteristic
            .properties
            .contains(CharacteristicProperties::WRITE)
        {
            self.transport
                .write_char_value(conn_handle, characteristic.handle, value, &characteristic.uuid)
                .await?;
        } else if characteristic
            .properties
            .contains(CharacteristicProperties::WRITE_WITHOUT_RESPONSE)
        {
            self.transport
                .write_no_rsp(conn_handle, characteristic.handle, value, &characteristic.uuid)
                .await?;
        } else {
            return Err(Error::NotWritable(characteristic.uuid));
        }
        Ok(())
    }

    /// Enable or disable notifications/indications for a characteristic.
    ///
    /// The client-characteristic-configuration descriptor lives between this
    /// characteristic's handle and the next characteristic in the owning
    /// service (or the service's end handle); its handle is resolved with a
    /// UUID-scoped read before the configuration value is written.
    pub async fn configure_notifications(
        &self,
        peripheral: &Peripheral,
        service: &Service,
        characteristic: &Characteristic,
        enable: bool,
    ) -> Result<()> {
        let conn_handle = peripheral.conn_handle.ok_or(Error::NotConnected)?;

        let config = if !enable {
            CCC_DISABLE
        } else if characteristic
            .properties
            .contains(CharacteristicProperties::NOTIFY)
        {
            CCC_NOTIFY
        } else if characteristic
            .properties
            .contains(CharacteristicProperties::INDICATE)
        {
            CCC_INDICATE
        } else {
            return Err(Error::SubscriptionUnsupported(characteristic.uuid));
        };

        let end_handle = descriptor_search_end(service, characteristic.handle);
        let cccd_uuid = Uuid::from_u16(CLIENT_CHAR_CONFIG_UUID);
        let collector = self
            .transport
            .read_by_char_uuid(conn_handle, characteristic.handle, end_handle, &cccd_uuid)
            .await?;

        let descriptor_handle = first_attribute(&collector)
            .map(|attribute| attribute.handle)
            .ok_or(Error::MissingEvent("ReadByTypeRsp"))?;

        debug!(
            "writing {:#06x} to config descriptor {:#06x} of {}",
            config, descriptor_handle, characteristic.uuid
        );
        self.transport
            .write_char_value(
                conn_handle,
                descriptor_handle,
                &config.to_le_bytes(),
                &cccd_uuid,
            )
            .await?;
        Ok(())
    }

    /// Acknowledge a received indication.
    pub async fn confirm_indication(&self, conn_handle: u16) -> Result<()> {
        self.transport.handle_value_confirm(conn_handle).await?;
        Ok(())
    }

    /// Register the peripheral's characteristic-handle-to-UUID table with
    /// the transport so later notification events resolve to UUIDs.
    ///
    /// A peripheral without a connection handle is silently skipped.
    pub fn register_uuid_handle_table(&self, peripheral: &Peripheral) {
        let Some(conn_handle) = peripheral.conn_handle else {
            return;
        };

        let mut table = HashMap::new();
        for service in &peripheral.services {
            for characteristic in &service.characteristics {
                table.insert(characteristic.handle, characteristic.uuid);
            }
        }
        self.transport.register_uuid_table(conn_handle, table);
    }
}

/// Flatten the grouped-type response PDUs into a service list, keeping PDU
/// arrival order. Non-success PDUs and groups with a malformed UUID are
/// dropped locally.
fn collect_services(collector: &Collector) -> Vec<Service> {
    let mut services = Vec::new();
    for rsp in &collector.read_by_group_type {
        if rsp.status != ATT_STATUS_SUCCESS {
            continue;
        }
        for group in &rsp.groups {
            let Some(uuid) = Uuid::try_from_slice_le(&group.value) else {
                continue;
            };
            services.push(Service {
                uuid,
                start_handle: group.start_handle,
                end_handle: group.end_handle,
                characteristics: Vec::new(),
            });
        }
    }
    services
}

/// Decode a characteristic declaration value:
/// `[properties(1), value handle(2 LE), uuid(2|16)]`.
/// Malformed declarations are skipped rather than failing the discovery.
fn decode_declaration(value: &[u8]) -> Option<Characteristic> {
    if value.len() < 5 {
        return None;
    }

    let mut cursor = Cursor::new(value);
    let properties = cursor.read_u8().ok()? as u16;
    let value_handle = cursor.read_u16::<LittleEndian>().ok()?;
    let uuid = Uuid::try_from_slice_le(&value[3..])?;

    Some(Characteristic {
        handle: value_handle,
        uuid,
        properties: CharacteristicProperties::decode(properties),
    })
}

/// Last handle of the gap a characteristic's descriptors can occupy: one
/// before the first later characteristic in the service's list order, or the
/// service's end handle for the last characteristic.
fn descriptor_search_end(service: &Service, start_handle: u16) -> u16 {
    service
        .characteristics
        .iter()
        .find(|characteristic| characteristic.handle > start_handle)
        .map(|characteristic| characteristic.handle - 1)
        .unwrap_or(service.end_handle)
}

fn first_attribute(collector: &Collector) -> Option<&crate::transport::HandleValue> {
    collector
        .read_by_type
        .first()
        .and_then(|rsp| rsp.attributes.first())
}
