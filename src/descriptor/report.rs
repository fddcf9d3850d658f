use crate::registry;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

const LONG_ITEM: u8 = 0b1111_11_10;

// Main items (HID 1.11, 6.2.2.4)
const INPUT: u8 = 0x80;
const OUTPUT: u8 = 0x90;
const COLLECTION: u8 = 0xa0;
const FEATURE: u8 = 0xb0;
const END_COLLECTION: u8 = 0xc0;

/// A HID Report descriptor split into items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub items: Vec<ReportItem>,
    /// Record offset of an item whose data runs past the end of the record. Decoding stops there.
    pub truncated_at: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    /// Offset of the item prefix within the record.
    pub offset: usize,
    pub prefix: u8,
    pub item_type: ItemType,
    pub name: String,
    /// Number of data bytes following the prefix.
    pub size: usize,
    pub value: ItemValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemType {
    Main,
    Global,
    Local,
    Reserved,
}

impl ItemType {
    fn from_prefix(prefix: u8) -> Self {
        match prefix >> 2 & 0b11 {
            0 => Self::Main,
            1 => Self::Global,
            2 => Self::Local,
            _ => Self::Reserved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemValue {
    Input(MainFlags),
    Output(MainFlags),
    Feature(MainFlags),
    Collection(Collection),
    EndCollection,
    /// Any other short item; data bytes read as a little-endian unsigned value.
    Data(u32),
    Long { tag: u8, data: Vec<u8> },
}

impl Report {
    pub(crate) fn from_raw(buf: &[u8]) -> Self {
        let mut items = Vec::new();
        let mut truncated_at = None;
        let mut offset = 2;
        while offset < buf.len() {
            match ReportItem::parse(buf, offset) {
                Some((item, next)) => {
                    items.push(item);
                    offset = next;
                }
                None => {
                    truncated_at = Some(offset);
                    break;
                }
            }
        }
        Report {
            items,
            truncated_at,
        }
    }
}

impl ReportItem {
    /// Parses the item starting at `offset`, returning it and the offset of the next item.
    fn parse(buf: &[u8], offset: usize) -> Option<(Self, usize)> {
        let prefix = *buf.get(offset)?;

        if prefix == LONG_ITEM {
            // Long item (6.2.2.3)
            let size = usize::from(*buf.get(offset + 1)?);
            let tag = *buf.get(offset + 2)?;
            let data = buf.get(offset + 3..offset + 3 + size)?;
            let item = ReportItem {
                offset,
                prefix,
                item_type: ItemType::Reserved,
                name: "Long Item".into(),
                size: size + 2,
                value: ItemValue::Long {
                    tag,
                    data: data.to_vec(),
                },
            };
            return Some((item, offset + 3 + size));
        }

        // Short item (6.2.2.2); size code 3 means four bytes
        let size = match prefix & 0b11 {
            3 => 4,
            n => usize::from(n),
        };
        let d = buf.get(offset + 1..offset + 1 + size)?;
        let data = d
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | u32::from(b) << (8 * i));

        let value = match prefix & !0b11 {
            INPUT => ItemValue::Input(MainFlags(data)),
            OUTPUT => ItemValue::Output(MainFlags(data)),
            FEATURE => ItemValue::Feature(MainFlags(data)),
            COLLECTION => ItemValue::Collection(Collection::from_raw((data & 0xff) as u8)),
            END_COLLECTION => ItemValue::EndCollection,
            _ => ItemValue::Data(data),
        };
        let item = ReportItem {
            offset,
            prefix,
            item_type: ItemType::from_prefix(prefix),
            name: registry::hid_item_tag_name(prefix),
            size,
            value,
        };
        Some((item, offset + 1 + size))
    }
}

/// Data of an Input, Output or Feature item.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MainFlags(pub u32);

macro_rules! flags {
    { $($flag:ident $bit:literal $set:literal $clear:literal $show_clear:literal)* } => {
        impl MainFlags {
            $(
                pub fn $flag(&self) -> bool {
                    self.0 & 1 << $bit != 0
                }
            )*

            /// One label per flag. Labels of flags in their default (clear) state are left out
            /// unless `show_defaults` is set; Data, Array and Absolute are always listed.
            pub fn describe(&self, show_defaults: bool) -> Vec<&'static str> {
                let mut labels = Vec::new();
                $(
                    if self.$flag() {
                        labels.push($set);
                    } else if show_defaults || $show_clear {
                        labels.push($clear);
                    }
                )*
                labels
            }
        }

        impl fmt::Debug for MainFlags {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!(MainFlags))
                    $(.field(stringify!($flag), &self.$flag()))*
                    .finish_non_exhaustive()
            }
        }

        impl Serialize for MainFlags {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let len = [$(stringify!($flag)),*].len() + 1;
                let mut s = serializer.serialize_struct(stringify!(MainFlags), len)?;
                s.serialize_field("raw", &self.0)?;
                $(s.serialize_field(stringify!($flag), &self.$flag())?;)*
                s.end()
            }
        }
    };
}

flags! {
    constant 0 "Constant" "Data" true
    variable 1 "Variable" "Array" true
    relative 2 "Relative" "Absolute" true
    wrap 3 "Wrap" "No Wrap" false
    non_linear 4 "Non Linear" "Linear" false
    no_preferred 5 "No Preferred" "Preferred State" false
    null_state 6 "Null State" "No Null Position" false
    volatile 7 "Volatile" "Non Volatile" false
    buffered_bytes 8 "Buffered Bytes" "Bit Field" false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Collection {
    Physical,
    Application,
    Logical,
    Report,
    NamedArray,
    UsageSwitch,
    UsageModifier,
    VendorDefined(u8),
}

impl Collection {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Physical,
            0x01 => Self::Application,
            0x02 => Self::Logical,
            0x03 => Self::Report,
            0x04 => Self::NamedArray,
            0x05 => Self::UsageSwitch,
            0x06 => Self::UsageModifier,
            r => Self::VendorDefined(r),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Physical => "Physical",
            Self::Application => "Application",
            Self::Logical => "Logical",
            Self::Report => "Report",
            Self::NamedArray => "Named Array",
            Self::UsageSwitch => "Usage Switch",
            Self::UsageModifier => "Usage Modifier",
            Self::VendorDefined(_) => "Vendor Defined",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(items: &[u8]) -> Vec<u8> {
        let mut raw = vec![items.len() as u8 + 2, 0x22];
        raw.extend_from_slice(items);
        raw
    }

    #[test]
    fn input_variable_data() {
        let r = Report::from_raw(&record(&[0x81, 0x02]));
        assert_eq!(r.items.len(), 1);
        let item = &r.items[0];
        assert_eq!(item.name, "Input");
        assert_eq!(item.item_type, ItemType::Main);
        let ItemValue::Input(flags) = item.value else {
            panic!("expected Input, got {:?}", item.value);
        };
        assert!(flags.variable());
        assert!(!flags.constant());
        assert_eq!(flags.describe(false), vec!["Data", "Variable", "Absolute"]);
        assert_eq!(flags.describe(true).len(), 9);
    }

    // Mouse report descriptor fragment, usb/dev-hid.c in QEMU
    #[test]
    fn mouse_fragment() {
        let r = Report::from_raw(&record(&[
            0x05, 0x01, 0x09, 0x02, 0xa1, 0x01, 0x09, 0x01, 0xa1, 0x00, 0x26, 0xff, 0x7f, 0xc0,
            0xc0,
        ]));
        let names: Vec<_> = r.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Usage Page",
                "Usage",
                "Collection",
                "Usage",
                "Collection",
                "Logical Maximum",
                "End Collection",
                "End Collection"
            ]
        );
        assert_eq!(r.items[2].value, ItemValue::Collection(Collection::Application));
        assert_eq!(r.items[4].value, ItemValue::Collection(Collection::Physical));
        assert_eq!(r.items[5].value, ItemValue::Data(0x7fff));
        assert_eq!(r.items[1].item_type, ItemType::Local);
        assert_eq!(r.truncated_at, None);
    }

    #[test]
    fn size_code_three_is_four_bytes() {
        let r = Report::from_raw(&record(&[0x27, 0x01, 0x02, 0x03, 0x04, 0xc0]));
        assert_eq!(r.items[0].size, 4);
        assert_eq!(r.items[0].value, ItemValue::Data(0x04030201));
        assert_eq!(r.items[1].value, ItemValue::EndCollection);
    }

    #[test]
    fn truncated_item_stops_decoding() {
        let r = Report::from_raw(&record(&[0x09, 0x01, 0x26, 0xff]));
        assert_eq!(r.items.len(), 1);
        assert_eq!(r.truncated_at, Some(4));
    }

    #[test]
    fn long_item() {
        let r = Report::from_raw(&record(&[0xfe, 0x02, 0xf0, 0xaa, 0xbb, 0xc0]));
        assert_eq!(
            r.items[0].value,
            ItemValue::Long {
                tag: 0xf0,
                data: vec![0xaa, 0xbb]
            }
        );
        assert_eq!(r.items[1].offset, 7);
    }

    #[test]
    fn vendor_collection() {
        let r = Report::from_raw(&record(&[0xa1, 0x80]));
        let ItemValue::Collection(c) = r.items[0].value else {
            panic!()
        };
        assert_eq!(c, Collection::VendorDefined(0x80));
        assert_eq!(c.to_string(), "Vendor Defined");
    }

    #[test]
    fn flags_serialize_as_booleans() {
        let v = serde_json::to_value(MainFlags(0x103)).unwrap();
        assert_eq!(v["raw"], 0x103);
        assert_eq!(v["constant"], true);
        assert_eq!(v["relative"], false);
        assert_eq!(v["buffered_bytes"], true);
    }
}
