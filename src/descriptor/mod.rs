//! Per-type descriptor decoders.
//!
//! Each decoder reads one [`Record`] and produces a typed value. Field offsets used throughout
//! are relative to the start of the record (so `bLength` is offset 0), matching the tables in the
//! USB specifications.

mod audio;
mod bos;
mod companion;
mod configuration;
mod device;
mod endpoint;
mod hid;
mod interface;
mod report;
mod string;

pub use audio::*;
pub use bos::*;
pub use companion::*;
pub use configuration::*;
pub use device::*;
pub use endpoint::*;
pub use hid::*;
pub use interface::*;
pub use report::*;
pub use string::*;

use crate::names::NameResolver;
use crate::record::Record;
use log::trace;
use serde::Serialize;
use thiserror::Error;

pub const DEVICE: u8 = 0x01;
pub const CONFIGURATION: u8 = 0x02;
pub const STRING: u8 = 0x03;
pub const INTERFACE: u8 = 0x04;
pub const ENDPOINT: u8 = 0x05;
pub const DEVICE_QUALIFIER: u8 = 0x06;
pub const OTHER_SPEED_CONFIGURATION: u8 = 0x07;
pub const INTERFACE_ASSOCIATION: u8 = 0x0b;
pub const BOS: u8 = 0x0f;
pub const DEVICE_CAPABILITY: u8 = 0x10;
pub const SUPERSPEED_ENDPOINT_COMPANION: u8 = 0x30;
pub const SUPERSPEEDPLUS_ISOCH_ENDPOINT_COMPANION: u8 = 0x31;

pub const HID: u8 = 0x21;
pub const REPORT: u8 = 0x22;
pub const PHYSICAL: u8 = 0x23;
pub const CS_INTERFACE: u8 = 0x24;
pub const CS_ENDPOINT: u8 = 0x25;

/// Why a single record could not be decoded. Never fatal to the walk.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    #[error(
        "{descriptor}: field at offset {offset} needs {needed} byte(s) but the record has {available}"
    )]
    FieldBounds {
        descriptor: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("BCD value {0:#x} does not fit in 16 bits")]
    InvalidBcd(u32),
    #[error("{descriptor}: invalid {field} value {value}")]
    InvalidField {
        descriptor: &'static str,
        field: &'static str,
        value: u32,
    },
}

/// Formats a binary-coded-decimal version number, e.g. `0x0210` as `"2.10"`.
pub fn bcd_to_string(bcd: u32) -> Result<String, DecodeError> {
    if bcd > 0xffff {
        return Err(DecodeError::InvalidBcd(bcd));
    }
    let [_, _, major, minor] = bcd.to_be_bytes();
    Ok(format!(
        "{:x}{:x}.{:x}{:x}",
        major >> 4,
        major & 0xf,
        minor >> 4,
        minor & 0xf
    ))
}

/// Bounds-checked little-endian field access over one record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    descriptor: &'static str,
    bytes: &'a [u8],
}

impl<'a> Fields<'a> {
    pub(crate) fn new(descriptor: &'static str, bytes: &'a [u8]) -> Self {
        Self { descriptor, bytes }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn bytes(&self, at: usize, n: usize) -> Result<&'a [u8], DecodeError> {
        at.checked_add(n)
            .and_then(|end| self.bytes.get(at..end))
            .ok_or(DecodeError::FieldBounds {
                descriptor: self.descriptor,
                offset: at,
                needed: n,
                available: self.bytes.len(),
            })
    }

    /// Everything from `at` to the end of the record; empty when `at` is past the end.
    pub(crate) fn rest(&self, at: usize) -> &'a [u8] {
        self.bytes.get(at..).unwrap_or_default()
    }

    pub(crate) fn u8(&self, at: usize) -> Result<u8, DecodeError> {
        Ok(self.bytes(at, 1)?[0])
    }

    pub(crate) fn u16(&self, at: usize) -> Result<u16, DecodeError> {
        let b = self.bytes(at, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u24(&self, at: usize) -> Result<u32, DecodeError> {
        let b = self.bytes(at, 3)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], 0]))
    }

    pub(crate) fn u32(&self, at: usize) -> Result<u32, DecodeError> {
        let b = self.bytes(at, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn bcd(&self, at: usize) -> Result<String, DecodeError> {
        bcd_to_string(self.u16(at)?.into())
    }

    pub(crate) fn invalid(&self, field: &'static str, value: u32) -> DecodeError {
        DecodeError::InvalidField {
            descriptor: self.descriptor,
            field,
            value,
        }
    }
}

/// A decoded descriptor of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "fields")]
pub enum DecodedDescriptor {
    Device(Device),
    Configuration(Configuration),
    OtherSpeedConfiguration(Configuration),
    String(StringDescriptor),
    Interface(Interface),
    Endpoint(Endpoint),
    InterfaceAssociation(InterfaceAssociation),
    DeviceQualifier(DeviceQualifier),
    Bos(Bos),
    DeviceCapability(DeviceCapability),
    SuperSpeedEndpointCompanion(SuperSpeedCompanion),
    SuperSpeedPlusIsochEndpointCompanion(SuperSpeedPlusIsochCompanion),
    Hid(Hid),
    HidReport(Report),
    HidPhysical(Physical),
    AudioControl(AudioControl),
    AudioStreaming(AudioStreaming),
    AudioStreamingEndpoint(AudioEndpoint),
    /// A class-specific interface descriptor whose interface subclass has no decoder.
    UnknownInterfaceSubclass {
        subclass: Option<u8>,
        data: Vec<u8>,
    },
    Unknown {
        descriptor_type: u8,
        data: Vec<u8>,
    },
}

/// Discriminant of [`DecodedDescriptor`], handy for comparisons and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DescriptorKind {
    Device,
    Configuration,
    OtherSpeedConfiguration,
    String,
    Interface,
    Endpoint,
    InterfaceAssociation,
    DeviceQualifier,
    Bos,
    DeviceCapability,
    SuperSpeedEndpointCompanion,
    SuperSpeedPlusIsochEndpointCompanion,
    Hid,
    HidReport,
    HidPhysical,
    AudioControl,
    AudioStreaming,
    AudioStreamingEndpoint,
    UnknownInterfaceSubclass,
    Unknown,
}

impl DecodedDescriptor {
    pub fn kind(&self) -> DescriptorKind {
        use DescriptorKind as K;
        match self {
            Self::Device(_) => K::Device,
            Self::Configuration(_) => K::Configuration,
            Self::OtherSpeedConfiguration(_) => K::OtherSpeedConfiguration,
            Self::String(_) => K::String,
            Self::Interface(_) => K::Interface,
            Self::Endpoint(_) => K::Endpoint,
            Self::InterfaceAssociation(_) => K::InterfaceAssociation,
            Self::DeviceQualifier(_) => K::DeviceQualifier,
            Self::Bos(_) => K::Bos,
            Self::DeviceCapability(_) => K::DeviceCapability,
            Self::SuperSpeedEndpointCompanion(_) => K::SuperSpeedEndpointCompanion,
            Self::SuperSpeedPlusIsochEndpointCompanion(_) => K::SuperSpeedPlusIsochEndpointCompanion,
            Self::Hid(_) => K::Hid,
            Self::HidReport(_) => K::HidReport,
            Self::HidPhysical(_) => K::HidPhysical,
            Self::AudioControl(_) => K::AudioControl,
            Self::AudioStreaming(_) => K::AudioStreaming,
            Self::AudioStreamingEndpoint(_) => K::AudioStreamingEndpoint,
            Self::UnknownInterfaceSubclass { .. } => K::UnknownInterfaceSubclass,
            Self::Unknown { .. } => K::Unknown,
        }
    }
}

/// Decodes one record.
///
/// `interface_subclass` is the subclass of the most recent interface descriptor and selects the
/// layout of class-specific interface descriptors (type 0x24). SuperSpeed endpoint companions
/// decoded here have no parent endpoint; use [`decode_ss_companion`] when the parent is known.
pub fn decode(
    record: &Record<'_>,
    interface_subclass: Option<u8>,
    names: &dyn NameResolver,
) -> Result<DecodedDescriptor, DecodeError> {
    use DecodedDescriptor as D;
    let b = record.bytes;
    trace!(
        "decoding type {:#04x} at offset {} ({} bytes)",
        record.type_tag(),
        record.offset,
        b.len()
    );
    Ok(match record.type_tag() {
        DEVICE => D::Device(Device::from_raw(b, names)?),
        CONFIGURATION => D::Configuration(Configuration::from_raw(b)?),
        OTHER_SPEED_CONFIGURATION => D::OtherSpeedConfiguration(Configuration::from_raw(b)?),
        STRING => D::String(StringDescriptor::from_raw(b, names)?),
        INTERFACE => D::Interface(Interface::from_raw(b, names)?),
        ENDPOINT => D::Endpoint(Endpoint::from_raw(b)?),
        INTERFACE_ASSOCIATION => D::InterfaceAssociation(InterfaceAssociation::from_raw(b, names)?),
        DEVICE_QUALIFIER => D::DeviceQualifier(DeviceQualifier::from_raw(b, names)?),
        BOS => D::Bos(Bos::from_raw(b)?),
        DEVICE_CAPABILITY => D::DeviceCapability(DeviceCapability::from_raw(b, names)?),
        SUPERSPEED_ENDPOINT_COMPANION => decode_ss_companion(record, None)?,
        SUPERSPEEDPLUS_ISOCH_ENDPOINT_COMPANION => {
            D::SuperSpeedPlusIsochEndpointCompanion(SuperSpeedPlusIsochCompanion::from_raw(b)?)
        }
        HID => D::Hid(Hid::from_raw(b)?),
        REPORT => D::HidReport(Report::from_raw(b)),
        PHYSICAL => D::HidPhysical(Physical::from_raw(b)),
        // Keyed on the subclass alone, so a CDC subclass 2 interface also reads as AudioStreaming.
        CS_INTERFACE => match interface_subclass {
            Some(AUDIO_CONTROL) => D::AudioControl(AudioControl::from_raw(b)?),
            Some(AUDIO_STREAMING) => D::AudioStreaming(AudioStreaming::from_raw(b)?),
            subclass => D::UnknownInterfaceSubclass {
                subclass,
                data: record.payload().to_vec(),
            },
        },
        CS_ENDPOINT => D::AudioStreamingEndpoint(AudioEndpoint::from_raw(b)?),
        descriptor_type => D::Unknown {
            descriptor_type,
            data: record.payload().to_vec(),
        },
    })
}

/// Decodes a SuperSpeed endpoint companion (0x30), interpreting its attributes according to the
/// transfer type of the endpoint it follows.
pub fn decode_ss_companion(
    record: &Record<'_>,
    parent: Option<TransferType>,
) -> Result<DecodedDescriptor, DecodeError> {
    SuperSpeedCompanion::from_raw(record.bytes, parent)
        .map(DecodedDescriptor::SuperSpeedEndpointCompanion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::BuiltinNames;

    fn rec(bytes: &[u8]) -> Record<'_> {
        Record { offset: 0, bytes }
    }

    #[test]
    fn bcd() {
        assert_eq!(bcd_to_string(0x0210).unwrap(), "2.10");
        assert_eq!(bcd_to_string(0x0200).unwrap(), "2.00");
        assert_eq!(bcd_to_string(0x1234).unwrap(), "12.34");
        assert_eq!(bcd_to_string(0x1_0000), Err(DecodeError::InvalidBcd(0x1_0000)));
    }

    #[test]
    fn fields_bounds() {
        let f = Fields::new("Test", &[1, 2, 3]);
        assert_eq!(f.u16(1).unwrap(), 0x0302);
        assert_eq!(
            f.u16(2),
            Err(DecodeError::FieldBounds {
                descriptor: "Test",
                offset: 2,
                needed: 2,
                available: 3
            })
        );
        assert!(f.bytes(usize::MAX, 2).is_err());
        assert!(f.rest(7).is_empty());
        assert_eq!(f.u24(0).unwrap(), 0x030201);
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let d = decode(&rec(&[0x04, 0x42, 0xaa, 0xbb]), None, &BuiltinNames).unwrap();
        assert_eq!(
            d,
            DecodedDescriptor::Unknown {
                descriptor_type: 0x42,
                data: vec![0xaa, 0xbb]
            }
        );
        assert_eq!(d.kind(), DescriptorKind::Unknown);
    }

    #[test]
    fn class_specific_interface_without_subclass() {
        let d = decode(&rec(&[0x05, 0x24, 0x01, 0x00, 0x01]), None, &BuiltinNames).unwrap();
        assert!(matches!(
            d,
            DecodedDescriptor::UnknownInterfaceSubclass { subclass: None, .. }
        ));
        let d = decode(&rec(&[0x05, 0x24, 0x01, 0x00, 0x01]), Some(3), &BuiltinNames).unwrap();
        assert!(matches!(
            d,
            DecodedDescriptor::UnknownInterfaceSubclass {
                subclass: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn short_record_is_a_bounds_error() {
        let e = decode(&rec(&[0x04, 0x02, 0x20, 0x00]), None, &BuiltinNames).unwrap_err();
        assert!(matches!(
            e,
            DecodeError::FieldBounds {
                descriptor: "Configuration",
                ..
            }
        ));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let d = decode(&rec(&[0x03, 0x42, 0x07]), None, &BuiltinNames).unwrap();
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["kind"], "Unknown");
        assert_eq!(v["fields"]["descriptor_type"], 0x42);
    }
}
