use super::{DecodeError, Fields};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// The address of the endpoint on the USB device described by this descriptor.
    pub address: EndpointAddress,
    pub attributes: EndpointAttributes,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl Endpoint {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Endpoint, DecodeError> {
        let f = Fields::new("Endpoint", buf);
        Ok(Endpoint {
            address: EndpointAddress(f.u8(2)?),
            attributes: EndpointAttributes(f.u8(3)?),
            max_packet_size: f.u16(4)?,
            interval: f.u8(6)?,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndpointAddress(pub u8);

impl EndpointAddress {
    pub fn direction(&self) -> Direction {
        if self.0 & 1 << 7 == 0 {
            Direction::Out
        } else {
            Direction::In
        }
    }

    pub fn number(&self) -> u8 {
        self.0 & 0xf
    }
}

impl fmt::Debug for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(EndpointAddress))
            .field("direction", &self.direction())
            .field("number", &self.number())
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndpointAttributes(pub u8);

impl EndpointAttributes {
    pub fn transfer(&self) -> TransferType {
        match self.0 & 0x3 {
            0 => TransferType::Control,
            1 => TransferType::Isochronous,
            2 => TransferType::Bulk,
            _ => TransferType::Interrupt,
        }
    }

    /// Synchronization type; only meaningful for isochronous endpoints.
    pub fn sync(&self) -> Option<SyncType> {
        (self.transfer() == TransferType::Isochronous).then(|| match self.0 >> 2 & 0x3 {
            0 => SyncType::None,
            1 => SyncType::Async,
            2 => SyncType::Adaptive,
            _ => SyncType::Sync,
        })
    }

    /// Usage type; only meaningful for isochronous endpoints.
    pub fn usage(&self) -> Option<UsageType> {
        (self.transfer() == TransferType::Isochronous).then(|| match self.0 >> 4 & 0x3 {
            0 => UsageType::Data,
            1 => UsageType::Feedback,
            2 => UsageType::ImplicitFeedback,
            _ => UsageType::Reserved,
        })
    }
}

impl fmt::Debug for EndpointAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(EndpointAttributes))
            .field("transfer", &self.transfer())
            .field("sync", &self.sync())
            .field("usage", &self.usage())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncType {
    None,
    Async,
    Adaptive,
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UsageType {
    Data,
    Feedback,
    ImplicitFeedback,
    Reserved,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "IN",
            Self::Out => "OUT",
        })
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Control => "Control",
            Self::Isochronous => "Isochronous",
            Self::Bulk => "Bulk",
            Self::Interrupt => "Interrupt",
        })
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "No Synchronization",
            Self::Async => "Asynchronous",
            Self::Adaptive => "Adaptive",
            Self::Sync => "Synchronous",
        })
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Data => "Data endpoint",
            Self::Feedback => "Feedback endpoint",
            Self::ImplicitFeedback => "Implicit feedback Data endpoint",
            Self::Reserved => "Reserved",
        })
    }
}
