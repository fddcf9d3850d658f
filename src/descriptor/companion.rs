use super::{DecodeError, Fields, TransferType};
use serde::Serialize;

/// SuperSpeed Endpoint Companion. Follows the endpoint it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperSpeedCompanion {
    pub max_burst: u8,
    pub attributes: u8,
    pub decoded: CompanionAttributes,
    pub bytes_per_interval: u16,
}

/// `bmAttributes` of a companion, whose meaning depends on the parent endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompanionAttributes {
    Bulk { max_streams: u8 },
    Isochronous { mult: u8, ssp_companion: bool },
    /// Control or interrupt parent, or no parent at all.
    Other { transfer: Option<TransferType> },
}

impl CompanionAttributes {
    fn new(attributes: u8, parent: Option<TransferType>) -> Self {
        match parent {
            Some(TransferType::Bulk) => Self::Bulk {
                max_streams: attributes & 0x1f,
            },
            Some(TransferType::Isochronous) => Self::Isochronous {
                mult: attributes & 0x03,
                ssp_companion: attributes & 1 << 7 != 0,
            },
            transfer => Self::Other { transfer },
        }
    }
}

impl SuperSpeedCompanion {
    pub(crate) fn from_raw(buf: &[u8], parent: Option<TransferType>) -> Result<Self, DecodeError> {
        let f = Fields::new("SuperSpeed Endpoint Companion", buf);
        let attributes = f.u8(3)?;
        Ok(SuperSpeedCompanion {
            max_burst: f.u8(2)?,
            attributes,
            decoded: CompanionAttributes::new(attributes, parent),
            bytes_per_interval: f.u16(4)?,
        })
    }

    /// Packets per service interval for an isochronous parent, `(Mult + 1) * (bMaxBurst + 1)`.
    pub fn max_packets_per_interval(&self) -> Option<u16> {
        match self.decoded {
            CompanionAttributes::Isochronous { mult, .. } => {
                Some((u16::from(mult) + 1) * (u16::from(self.max_burst) + 1))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperSpeedPlusIsochCompanion {
    pub reserved: u16,
    pub bytes_per_interval: u32,
}

impl SuperSpeedPlusIsochCompanion {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("SuperSpeedPlus Isochronous Endpoint Companion", buf);
        Ok(SuperSpeedPlusIsochCompanion {
            reserved: f.u16(2)?,
            bytes_per_interval: f.u32(4)?,
        })
    }
}
