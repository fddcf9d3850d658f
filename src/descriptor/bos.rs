use super::{DecodeError, Fields};
use crate::names::NameResolver;
use serde::Serialize;

const USB2_EXTENSION: u8 = 0x02;
const SUPERSPEED_USB: u8 = 0x03;
const CONTAINER_ID: u8 = 0x04;
const PLATFORM: u8 = 0x05;

/// One device capability from the Binary Object Store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCapability {
    pub capability_type: u8,
    pub capability_name: String,
    pub capability: Capability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Capability {
    Usb2Extension {
        attributes: u32,
        lpm_capable: bool,
    },
    SuperSpeed {
        attributes: u8,
        speeds_supported: u16,
        speeds: Vec<Speed>,
        functionality_support: u8,
        u1_dev_exit_latency: u8,
        u2_dev_exit_latency: u16,
    },
    ContainerId {
        container_id: String,
    },
    Platform {
        uuid: String,
        data: Vec<u8>,
    },
    Raw {
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Speed {
    Low,
    Full,
    High,
    SuperSpeed,
}

impl Speed {
    fn from_bitmap(bitmap: u16) -> Vec<Speed> {
        [Speed::Low, Speed::Full, Speed::High, Speed::SuperSpeed]
            .into_iter()
            .enumerate()
            .filter(|(bit, _)| bitmap & 1 << bit != 0)
            .map(|(_, speed)| speed)
            .collect()
    }
}

impl DeviceCapability {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("Device Capability", buf);
        let capability_type = f.u8(2)?;
        let capability = match capability_type {
            USB2_EXTENSION => {
                let attributes = f.u32(3)?;
                Capability::Usb2Extension {
                    attributes,
                    lpm_capable: attributes & 1 << 1 != 0,
                }
            }
            SUPERSPEED_USB => {
                let speeds_supported = f.u16(4)?;
                Capability::SuperSpeed {
                    attributes: f.u8(3)?,
                    speeds_supported,
                    speeds: Speed::from_bitmap(speeds_supported),
                    functionality_support: f.u8(6)?,
                    u1_dev_exit_latency: f.u8(7)?,
                    u2_dev_exit_latency: f.u16(8)?,
                }
            }
            CONTAINER_ID => Capability::ContainerId {
                container_id: hex(f.bytes(4, 16)?),
            },
            PLATFORM => Capability::Platform {
                uuid: hex(f.bytes(4, 16)?),
                data: f.rest(20).to_vec(),
            },
            _ => Capability::Raw {
                data: f.rest(3).to_vec(),
            },
        };
        Ok(DeviceCapability {
            capability_type,
            capability_name: names.capability_type_name(capability_type),
            capability,
        })
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
