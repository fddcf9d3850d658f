//! Static name tables for USB class codes, BOS capability types, HID items, audio terminal
//! types, HID country codes and language IDs.
//!
//! Every lookup is total: unknown codes map to a fallback string instead of failing.
//!
//! # References
//!
//! * <https://www.usb.org/defined-class-codes>
//! * USB 3.2 specification, table 9-14 (device capability type codes)
//! * Device Class Definition for HID 1.11, sections 6.2.1 and 6.2.2
//! * USB Device Class Definition for Terminal Types 1.0

/// Generates an `Option` lookup over a fixed code table.
macro_rules! names {
    { $(#[$m:meta])* fn $f:ident($t:ty) { $($k:literal $v:literal)* } } => {
        $(#[$m])*
        pub fn $f(code: $t) -> Option<&'static str> {
            match code {
                $($k => Some($v),)*
                _ => None,
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    pub code: u8,
    pub name: &'static str,
    pub subclasses: &'static [SubclassInfo],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubclassInfo {
    pub code: u8,
    pub name: &'static str,
    pub protocols: &'static [(u8, &'static str)],
}

const UNKNOWN: &str = "Unknown";

const NO_PROTOCOLS: &[(u8, &str)] = &[];

macro_rules! subclass {
    ($code:literal, $name:literal $(,)?) => {
        SubclassInfo {
            code: $code,
            name: $name,
            protocols: NO_PROTOCOLS,
        }
    };
    ($code:literal, $name:literal, $protocols:expr $(,)?) => {
        SubclassInfo {
            code: $code,
            name: $name,
            protocols: $protocols,
        }
    };
}

macro_rules! class {
    ($code:literal, $name:literal, $subclasses:expr $(,)?) => {
        ClassInfo {
            code: $code,
            name: $name,
            subclasses: $subclasses,
        }
    };
}

const HID_PROTOCOLS: &[(u8, &str)] = &[(0, "None"), (1, "Keyboard"), (2, "Mouse")];
const MASS_STORAGE_PROTOCOLS: &[(u8, &str)] = &[
    (0, "Control/Bulk/Interrupt"),
    (1, "Control/Bulk"),
    (80, "Bulk-Only"),
];
const MCTCP_PROTOCOLS: &[(u8, &str)] = &[(1, "MCTCP 1.x"), (2, "MCTCP 2.x")];

static CLASSES: &[ClassInfo] = &[
    class!(0x00, "(Defined at Interface level)", &[]),
    class!(
        0x01,
        "Audio",
        &[
            subclass!(1, "Control Device"),
            subclass!(2, "Streaming"),
            subclass!(3, "MIDI Streaming"),
        ],
    ),
    class!(
        0x02,
        "Communications",
        &[
            subclass!(1, "Direct Line"),
            subclass!(
                2,
                "Abstract (modem)",
                &[
                    (0, "None"),
                    (1, "AT-commands (v.25ter)"),
                    (2, "AT-commands (PCCA101)"),
                    (3, "AT-commands (PCCA101 + wakeup)"),
                    (4, "AT-commands (GSM)"),
                    (5, "AT-commands (3G)"),
                    (6, "AT-commands (CDMA)"),
                    (254, "Defined by command set descriptor"),
                    (255, "Vendor Specific (MSFT RNDIS?)"),
                ],
            ),
            subclass!(3, "Telephone"),
            subclass!(4, "Multi-Channel"),
            subclass!(5, "CAPI Control"),
            subclass!(6, "Ethernet Networking"),
            subclass!(7, "ATM Networking"),
            subclass!(8, "Wireless Handset Control"),
            subclass!(9, "Device Management"),
            subclass!(10, "Mobile Direct Line"),
            subclass!(11, "OBEX"),
            subclass!(12, "Ethernet Emulation", &[(7, "Ethernet Emulation (EEM)")]),
        ],
    ),
    class!(
        0x03,
        "Human Interface Device",
        &[
            subclass!(0, "No Subclass", HID_PROTOCOLS),
            subclass!(1, "Boot Interface Subclass", HID_PROTOCOLS),
        ],
    ),
    class!(0x05, "Physical Interface Device", &[]),
    class!(
        0x06,
        "Imaging",
        &[subclass!(
            1,
            "Still Image Capture",
            &[(1, "Picture Transfer Protocol (PIMA 15470)")],
        )],
    ),
    class!(
        0x07,
        "Printer",
        &[subclass!(
            1,
            "Printer",
            &[
                (0, "Reserved/Undefined"),
                (1, "Unidirectional"),
                (2, "Bidirectional"),
                (3, "IEEE 1284.4 compatible bidirectional"),
                (255, "Vendor Specific"),
            ],
        )],
    ),
    class!(
        0x08,
        "Mass Storage",
        &[
            subclass!(1, "RBC (typically Flash)", MASS_STORAGE_PROTOCOLS),
            subclass!(2, "SFF-8020i, MMC-2 (ATAPI)"),
            subclass!(3, "QIC-157"),
            subclass!(4, "Floppy (UFI)", MASS_STORAGE_PROTOCOLS),
            subclass!(5, "SFF-8070i"),
            subclass!(6, "SCSI", MASS_STORAGE_PROTOCOLS),
        ],
    ),
    class!(
        0x09,
        "Hub",
        &[subclass!(
            0,
            "Unused",
            &[
                (0, "Full speed (or root) hub"),
                (1, "Single TT"),
                (2, "TT per port"),
            ],
        )],
    ),
    class!(
        0x0a,
        "CDC Data",
        &[subclass!(
            0,
            "Unused",
            &[
                (48, "I.430 ISDN BRI"),
                (49, "HDLC"),
                (50, "Transparent"),
                (80, "Q.921M"),
                (81, "Q.921"),
                (82, "Q.921TM"),
                (144, "V.42bis"),
                (145, "Q.932 EuroISDN"),
                (146, "V.120 V.24 rate ISDN"),
                (147, "CAPI 2.0"),
                (253, "Host Based Driver"),
                (254, "CDC PUF"),
                (255, "Vendor specific"),
            ],
        )],
    ),
    class!(0x0b, "Chip/SmartCard", &[]),
    class!(0x0d, "Content Security", &[]),
    class!(
        0x0e,
        "Video",
        &[
            subclass!(0, "Undefined"),
            subclass!(1, "Video Control"),
            subclass!(2, "Video Streaming"),
            subclass!(3, "Video Interface Collection"),
        ],
    ),
    class!(0x0f, "Personal Healthcare", &[]),
    class!(
        0x10,
        "Audio/Video",
        &[
            subclass!(1, "AVData Control"),
            subclass!(2, "AVData Video Stream"),
            subclass!(3, "AVData Audio Stream"),
        ],
    ),
    class!(0x11, "Billboard", &[]),
    class!(0x12, "Type-C Bridge", &[]),
    class!(0x13, "Bulk Display", &[]),
    class!(
        0x14,
        "MCTCP over USB",
        &[
            subclass!(0, "MCTCP Management", MCTCP_PROTOCOLS),
            subclass!(1, "MCTCP Host", MCTCP_PROTOCOLS),
        ],
    ),
    class!(0x3c, "I3C", &[]),
    class!(0x58, "Xbox", &[subclass!(66, "Controller")]),
    class!(
        0xdc,
        "Diagnostic",
        &[subclass!(
            1,
            "Reprogrammable Diagnostics",
            &[(1, "USB2 Compliance")],
        )],
    ),
    class!(
        0xe0,
        "Wireless",
        &[
            subclass!(
                1,
                "Radio Frequency",
                &[
                    (1, "Bluetooth"),
                    (2, "Ultra WideBand Radio Control"),
                    (3, "RNDIS"),
                ],
            ),
            subclass!(
                2,
                "Wireless USB Wire Adapter",
                &[
                    (1, "Host Wire Adapter Control/Data Streaming"),
                    (2, "Device Wire Adapter Control/Data Streaming"),
                    (3, "Device Wire Adapter Isochronous Streaming"),
                ],
            ),
        ],
    ),
    class!(
        0xef,
        "Miscellaneous Device",
        &[
            subclass!(1, "?", &[(1, "Microsoft ActiveSync"), (2, "Palm Sync")]),
            subclass!(
                2,
                "?",
                &[
                    (1, "Interface Association"),
                    (2, "Wire Adapter Multifunction Peripheral"),
                ],
            ),
            subclass!(3, "?", &[(1, "Cable Based Association")]),
            subclass!(5, "USB3 Vision"),
        ],
    ),
    class!(
        0xfe,
        "Application Specific Interface",
        &[
            subclass!(1, "Device Firmware Update"),
            subclass!(2, "IRDA Bridge"),
            subclass!(3, "Test and Measurement", &[(1, "TMC"), (2, "USB488")]),
        ],
    ),
    class!(
        0xff,
        "Vendor Specific Class",
        &[subclass!(
            255,
            "Vendor Specific Subclass",
            &[(255, "Vendor Specific Protocol")],
        )],
    ),
];

/// Looks up a class code. Unknown codes yield a class named "Unknown" with no subclasses.
pub fn class_info(class_code: u8) -> ClassInfo {
    CLASSES
        .iter()
        .find(|c| c.code == class_code)
        .copied()
        .unwrap_or(ClassInfo {
            code: class_code,
            name: UNKNOWN,
            subclasses: &[],
        })
}

pub fn subclass_info(class_code: u8, subclass_code: u8) -> SubclassInfo {
    class_info(class_code)
        .subclasses
        .iter()
        .find(|s| s.code == subclass_code)
        .copied()
        .unwrap_or(SubclassInfo {
            code: subclass_code,
            name: UNKNOWN,
            protocols: NO_PROTOCOLS,
        })
}

pub fn protocol_name(class_code: u8, subclass_code: u8, protocol_code: u8) -> &'static str {
    subclass_info(class_code, subclass_code)
        .protocols
        .iter()
        .find(|(code, _)| *code == protocol_code)
        .map_or(UNKNOWN, |&(_, name)| name)
}

names! {
    fn capability_type(u8) {
        0x01 "Wireless USB"
        0x02 "USB 2.0 Extension"
        0x03 "SuperSpeed USB"
        0x04 "Container ID"
        0x05 "Platform"
        0x06 "Power Delivery Capability"
        0x07 "Battery Info Capability"
        0x08 "PD Consumer Port Capability"
        0x09 "PD Provider Port Capability"
        0x0a "SuperSpeed Plus"
        0x0b "Precision Time Measurement"
        0x0c "Wireless USB Ext"
        0x0d "Billboard"
        0x0e "Authentication"
        0x0f "Billboard Ex"
        0x10 "Configuration Summary"
        0x11 "FWStatus Capability"
    }
}

/// Name of a BOS device capability type (`bDevCapabilityType`).
pub fn capability_type_name(code: u8) -> &'static str {
    capability_type(code).unwrap_or("Reserved")
}

names! {
    /// HID short-item tags with the size bits cleared.
    fn hid_item_tag(u8) {
        0x04 "Usage Page"
        0x08 "Usage"
        0x14 "Logical Minimum"
        0x18 "Usage Minimum"
        0x24 "Logical Maximum"
        0x28 "Usage Maximum"
        0x34 "Physical Minimum"
        0x38 "Designator Index"
        0x44 "Physical Maximum"
        0x48 "Designator Minimum"
        0x54 "Unit Exponent"
        0x58 "Designator Maximum"
        0x64 "Unit"
        0x74 "Report Size"
        0x78 "String Index"
        0x80 "Input"
        0x84 "Report ID"
        0x88 "String Minimum"
        0x90 "Output"
        0x94 "Report Count"
        0x98 "String Maximum"
        0xa0 "Collection"
        0xa4 "Push"
        0xa8 "Delimiter"
        0xb0 "Feature"
        0xb4 "Pop"
        0xc0 "End Collection"
    }
}

/// Name of a HID item from its prefix byte. The two size bits are ignored.
pub fn hid_item_tag_name(prefix: u8) -> String {
    let tag = prefix & !0b11;
    match hid_item_tag(tag) {
        Some(name) => name.to_string(),
        None => format!("Unknown Tag 0x{tag:02x}"),
    }
}

names! {
    /// Class descriptor types listed inside a HID descriptor.
    fn hid_class_descriptor(u8) {
        0x21 "HID"
        0x22 "Report"
        0x23 "Physical"
    }
}

pub fn hid_class_descriptor_name(code: u8) -> &'static str {
    hid_class_descriptor(code).unwrap_or(UNKNOWN)
}

names! {
    fn audio_terminal_type(u16) {
        0x0100 "USB Undefined"
        0x0101 "USB Streaming"
        0x01ff "USB Vendor Specific"
        0x0200 "Input Undefined"
        0x0201 "Microphone"
        0x0202 "Desktop Microphone"
        0x0203 "Personal Microphone"
        0x0204 "Omni-directional Microphone"
        0x0205 "Microphone Array"
        0x0206 "Processing Microphone Array"
        0x0300 "Output Undefined"
        0x0301 "Speaker"
        0x0302 "Headphones"
        0x0303 "Head Mounted Display Audio"
        0x0304 "Desktop Speaker"
        0x0305 "Room Speaker"
        0x0306 "Communication Speaker"
        0x0307 "Low Frequency Effects Speaker"
        0x0400 "Bidirectional Undefined"
        0x0401 "Handset"
        0x0402 "Headset"
        0x0403 "Speakerphone, no echo reduction"
        0x0404 "Echo-suppressing speakerphone"
        0x0405 "Echo-canceling speakerphone"
        0x0500 "Telephony Undefined"
        0x0501 "Phone line"
        0x0502 "Telephone"
        0x0503 "Down Line Phone"
        0x0600 "External Undefined"
        0x0601 "Analog Connector"
        0x0602 "Digital Audio Interface"
        0x0603 "Line Connector"
        0x0604 "Legacy Audio Connector"
        0x0605 "SPDIF interface"
        0x0606 "1394 DA stream"
        0x0607 "1394 DV stream soundtrack"
        0x0700 "Embedded Undefined"
        0x0701 "Level Calibration Noise Source"
        0x0702 "Equalization Noise"
        0x0703 "CD Player"
        0x0704 "DAT"
        0x0705 "DCC"
        0x0706 "MiniDisc"
        0x0707 "Analog Tape"
        0x0708 "Phonograph"
        0x0709 "VCR Audio"
        0x070a "Video Disc Audio"
        0x070b "DVD Audio"
        0x070c "TV Tuner Audio"
        0x070d "Satellite Receiver Audio"
        0x070e "Cable Tuner Audio"
        0x070f "DSS Audio"
        0x0710 "Radio Receiver"
        0x0711 "Radio Transmitter"
        0x0712 "Multitrack Recorder"
        0x0713 "Synthesizer"
    }
}

pub fn audio_terminal_type_name(code: u16) -> &'static str {
    audio_terminal_type(code).unwrap_or(UNKNOWN)
}

names! {
    /// HID `bCountryCode` values.
    fn country_code(u8) {
        0x00 "Not Supported"
        0x01 "Arabic"
        0x02 "Belgian"
        0x03 "Canadian-Bilingual"
        0x04 "Canadian-French"
        0x05 "Czech Republic"
        0x06 "Danish"
        0x07 "Finnish"
        0x08 "French"
        0x09 "German"
        0x0a "Greek"
        0x0b "Hebrew"
        0x0c "Hungary"
        0x0d "International (ISO)"
        0x0e "Italian"
        0x0f "Japan (Katakana)"
        0x10 "Korean"
        0x11 "Latin American"
        0x12 "Netherlands/Dutch"
        0x13 "Norwegian"
        0x14 "Persian (Farsi)"
        0x15 "Poland"
        0x16 "Portuguese"
        0x17 "Russia"
        0x18 "Slovakia"
        0x19 "Spanish"
        0x1a "Swedish"
        0x1b "Swiss/French"
        0x1c "Swiss/German"
        0x1d "Switzerland"
        0x1e "Taiwan"
        0x1f "Turkish-Q"
        0x20 "UK"
        0x21 "US"
        0x22 "Yugoslavia"
        0x23 "Turkish-F"
    }
}

pub fn country_code_name(code: u8) -> String {
    match country_code(code) {
        Some(name) => name.to_string(),
        None => format!("Unknown (0x{code:02X})"),
    }
}

names! {
    /// A subset of the USB LANGID table covering the languages devices commonly report.
    fn language(u16) {
        0x0401 "Arabic (Saudi Arabia)"
        0x0402 "Bulgarian"
        0x0403 "Catalan"
        0x0404 "Chinese (Taiwan)"
        0x0405 "Czech"
        0x0406 "Danish"
        0x0407 "German (Standard)"
        0x0408 "Greek"
        0x0409 "English (United States)"
        0x040a "Spanish (Traditional Sort)"
        0x040b "Finnish"
        0x040c "French (Standard)"
        0x040d "Hebrew"
        0x040e "Hungarian"
        0x040f "Icelandic"
        0x0410 "Italian (Standard)"
        0x0411 "Japanese"
        0x0412 "Korean"
        0x0413 "Dutch (Netherlands)"
        0x0414 "Norwegian (Bokmal)"
        0x0415 "Polish"
        0x0416 "Portuguese (Brazil)"
        0x0418 "Romanian"
        0x0419 "Russian"
        0x041a "Croatian"
        0x041b "Slovak"
        0x041d "Swedish"
        0x041e "Thai"
        0x041f "Turkish"
        0x0421 "Indonesian"
        0x0422 "Ukrainian"
        0x0424 "Slovenian"
        0x0425 "Estonian"
        0x0426 "Latvian"
        0x0427 "Lithuanian"
        0x042a "Vietnamese"
        0x0439 "Hindi"
        0x0804 "Chinese (PRC)"
        0x0807 "German (Switzerland)"
        0x0809 "English (United Kingdom)"
        0x080a "Spanish (Mexican)"
        0x080c "French (Belgian)"
        0x0816 "Portuguese (Standard)"
        0x0c04 "Chinese (Hong Kong)"
        0x0c09 "English (Australian)"
        0x0c0a "Spanish (Modern Sort)"
        0x0c0c "French (Canadian)"
        0x1009 "English (Canadian)"
        0x04ff "HID (Usage Data Descriptor)"
        0xf0ff "HID (Vendor Defined 1)"
        0xf4ff "HID (Vendor Defined 2)"
        0xf8ff "HID (Vendor Defined 3)"
        0xfcff "HID (Vendor Defined 4)"
    }
}

/// English name of a USB language ID (as found in string descriptor zero).
pub fn language_name(langid: u16) -> String {
    match language(langid) {
        Some(name) => name.to_string(),
        None => format!("Unknown (0x{langid:04X})"),
    }
}

names! {
    /// Audio class endpoint `bLockDelayUnits`.
    fn lock_delay_unit(u8) {
        0 "Undefined"
        1 "Milliseconds"
        2 "Decoded PCM samples"
    }
}

pub fn lock_delay_unit_name(code: u8) -> &'static str {
    lock_delay_unit(code).unwrap_or(UNKNOWN)
}
