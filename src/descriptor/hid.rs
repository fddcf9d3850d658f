use super::{DecodeError, Fields};
use crate::registry;
use serde::Serialize;

/// HID class descriptor, found between an HID interface and its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hid {
    pub bcd_hid: String,
    pub country_code: u8,
    pub country_name: String,
    pub num_descriptors: u8,
    /// The class descriptors this HID descriptor announces. May be shorter than
    /// `num_descriptors` when the record ends early.
    pub descriptors: Vec<HidClassDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HidClassDescriptor {
    pub descriptor_type: u8,
    pub type_name: &'static str,
    pub length: u16,
}

impl Hid {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("HID", buf);
        let bcd_hid = f.bcd(2)?;
        let b_country_code = f.u8(4)?;
        let b_num_descriptors = f.u8(5)?;

        let mut descriptors = Vec::with_capacity(b_num_descriptors.into());
        let mut offset = 6;
        for _ in 0..b_num_descriptors {
            if offset + 3 > f.len() {
                break;
            }
            let descriptor_type = f.u8(offset)?;
            descriptors.push(HidClassDescriptor {
                descriptor_type,
                type_name: registry::hid_class_descriptor_name(descriptor_type),
                length: f.u16(offset + 1)?,
            });
            offset += 3;
        }

        Ok(Hid {
            bcd_hid,
            country_code: b_country_code,
            country_name: registry::country_code_name(b_country_code),
            num_descriptors: b_num_descriptors,
            descriptors,
        })
    }
}

/// HID Physical descriptor, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Physical {
    pub data: Vec<u8>,
}

impl Physical {
    pub(crate) fn from_raw(buf: &[u8]) -> Self {
        Physical {
            data: buf.get(2..).unwrap_or_default().to_vec(),
        }
    }
}
