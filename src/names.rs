use crate::registry;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Turns numeric IDs found in descriptors into display strings.
///
/// Every method is total. Implementations must not fail and must be safe to call from several
/// decode passes at once.
pub trait NameResolver: Sync {
    fn vendor_name(&self, vendor: u16) -> String;

    fn product_name(&self, vendor: u16, product: u16) -> String;

    fn language_name(&self, langid: u16) -> String {
        registry::language_name(langid)
    }

    fn class_name(&self, class: u8) -> String {
        registry::class_info(class).name.to_string()
    }

    fn subclass_name(&self, class: u8, subclass: u8) -> String {
        registry::subclass_info(class, subclass).name.to_string()
    }

    fn protocol_name(&self, class: u8, subclass: u8, protocol: u8) -> String {
        registry::protocol_name(class, subclass, protocol).to_string()
    }

    fn capability_type_name(&self, capability_type: u8) -> String {
        registry::capability_type_name(capability_type).to_string()
    }
}

fn unknown_vendor(vendor: u16) -> String {
    format!("Unknown Vendor (0x{vendor:04x})")
}

fn unknown_product(product: u16) -> String {
    format!("Unknown Product (0x{product:04x})")
}

/// Resolver without a vendor database. Class, language and capability names still come from the
/// built-in tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinNames;

impl NameResolver for BuiltinNames {
    fn vendor_name(&self, vendor: u16) -> String {
        unknown_vendor(vendor)
    }

    fn product_name(&self, _vendor: u16, product: u16) -> String {
        unknown_product(product)
    }
}

#[derive(Debug, Default, Clone)]
struct Vendor {
    name: String,
    devices: HashMap<u16, String>,
}

/// Vendor and product names loaded from `usb.ids`, either in its native text form or as the
/// JSON layout `{"0x046d": {"name": "...", "devices": {"0xc077": {"name": "..."}}}}`.
#[derive(Debug, Default, Clone)]
pub struct UsbIdsDatabase {
    vendors: HashMap<u16, Vendor>,
}

#[derive(Debug, Error)]
pub enum NamesError {
    #[error("failed to read names database: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid names database JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid id {id:?} on line {line}")]
    InvalidId { line: usize, id: String },
}

#[derive(Deserialize)]
struct JsonVendor {
    name: String,
    #[serde(default)]
    devices: HashMap<String, JsonDevice>,
}

#[derive(Deserialize)]
struct JsonDevice {
    name: String,
}

fn parse_id(s: &str) -> Option<u16> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).ok()
}

impl UsbIdsDatabase {
    pub fn load(path: &Path) -> Result<Self, NamesError> {
        let contents = fs::read_to_string(path)?;
        let db = if contents.trim_start().starts_with('{') {
            Self::from_json(&contents)?
        } else {
            Self::from_usb_ids(&contents)?
        };
        debug!(
            "Loaded {} vendors from {}",
            db.vendors.len(),
            path.display()
        );
        Ok(db)
    }

    pub fn from_json(json: &str) -> Result<Self, NamesError> {
        let raw: HashMap<String, JsonVendor> = serde_json::from_str(json)?;
        let mut vendors = HashMap::with_capacity(raw.len());
        for (key, vendor) in raw {
            let Some(vendor_id) = parse_id(&key) else {
                warn!("Skipping vendor with invalid id {:?}", key);
                continue;
            };
            let devices = vendor
                .devices
                .into_iter()
                .filter_map(|(k, d)| parse_id(&k).map(|id| (id, d.name)))
                .collect();
            vendors.insert(
                vendor_id,
                Vendor {
                    name: vendor.name,
                    devices,
                },
            );
        }
        Ok(Self { vendors })
    }

    /// Parses the `usb.ids` text format. Only the vendor/device section is read; the class and
    /// language sections that follow it (lines starting with a keyword such as `C `) end parsing.
    pub fn from_usb_ids(text: &str) -> Result<Self, NamesError> {
        let mut vendors: HashMap<u16, Vendor> = HashMap::new();
        let mut current: Option<u16> = None;

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let depth = line.chars().take_while(|c| *c == '\t').count();
            let Some((id, name)) = line.trim().split_once(char::is_whitespace) else {
                continue;
            };
            let invalid = || NamesError::InvalidId {
                line: line_no,
                id: id.to_string(),
            };
            match depth {
                0 => {
                    if id.len() != 4 {
                        // Start of the class / language sections.
                        break;
                    }
                    let vendor_id = parse_id(id).ok_or_else(invalid)?;
                    vendors.insert(
                        vendor_id,
                        Vendor {
                            name: name.trim().to_string(),
                            devices: HashMap::new(),
                        },
                    );
                    current = Some(vendor_id);
                }
                1 => {
                    let product_id = parse_id(id).ok_or_else(invalid)?;
                    if let Some(vendor) = current.and_then(|v| vendors.get_mut(&v)) {
                        vendor.devices.insert(product_id, name.trim().to_string());
                    }
                }
                // Interface lines
                _ => {}
            }
        }

        Ok(Self { vendors })
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

impl NameResolver for UsbIdsDatabase {
    fn vendor_name(&self, vendor: u16) -> String {
        self.vendors
            .get(&vendor)
            .map_or_else(|| unknown_vendor(vendor), |v| v.name.clone())
    }

    fn product_name(&self, vendor: u16, product: u16) -> String {
        self.vendors
            .get(&vendor)
            .and_then(|v| v.devices.get(&product))
            .map_or_else(|| unknown_product(product), Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USB_IDS: &str = "\
# comment line
04d0  Mace Group, Inc.
\t0101  Example Keyboard
\t\t00  Interface zero
046d  Logitech, Inc.
\tc077  M105 Optical Mouse

C 00  (Defined at Interface level)
";

    #[test]
    fn builtin_fallbacks() {
        let n = BuiltinNames;
        assert_eq!(n.vendor_name(0x04d0), "Unknown Vendor (0x04d0)");
        assert_eq!(n.product_name(0x04d0, 0x0101), "Unknown Product (0x0101)");
        assert_eq!(n.class_name(3), "Human Interface Device");
        assert_eq!(n.capability_type_name(2), "USB 2.0 Extension");
        assert_eq!(n.language_name(0x0409), "English (United States)");
    }

    #[test]
    fn usb_ids_text() {
        let db = UsbIdsDatabase::from_usb_ids(USB_IDS).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.vendor_name(0x04d0), "Mace Group, Inc.");
        assert_eq!(db.product_name(0x046d, 0xc077), "M105 Optical Mouse");
        assert_eq!(db.product_name(0x046d, 0x0001), "Unknown Product (0x0001)");
        assert_eq!(db.vendor_name(0x1234), "Unknown Vendor (0x1234)");
    }

    #[test]
    fn usb_ids_json() {
        let json = r#"{
            "0x04d0": {"name": "Mace Group, Inc.", "devices": {"0x0101": {"name": "Keyboard", "interfaces": {}}}},
            "0x1d6b": {"name": "Linux Foundation"}
        }"#;
        let db = UsbIdsDatabase::from_json(json).unwrap();
        assert_eq!(db.product_name(0x04d0, 0x0101), "Keyboard");
        assert_eq!(db.vendor_name(0x1d6b), "Linux Foundation");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            UsbIdsDatabase::from_json("{not json"),
            Err(NamesError::Json(_))
        ));
    }

    #[test]
    fn invalid_product_id_is_reported() {
        let text = "04d0  Mace\n\tzzzz  Broken\n";
        assert!(matches!(
            UsbIdsDatabase::from_usb_ids(text),
            Err(NamesError::InvalidId { line: 2, .. })
        ));
    }
}
