//! Display rows for decoded descriptors, shared by the DOT and text outputs.

use crate::descriptor::{
    AudioControl, AudioEndpoint, AudioStreaming, Capability, ClassCode, CompanionAttributes,
    Configuration, DecodedDescriptor, Device, DeviceCapability, DeviceQualifier, Endpoint,
    FormatType, Hid, ItemValue, Report, SampleFrequencies, StringDescriptor,
};
use crate::graph::{EdgeKind, GraphModel, Node};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Label {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, field: &str, value: impl ToString) -> &mut Self {
        self.rows.push((field.to_string(), value.to_string()));
        self
    }

    fn class(&mut self, prefix: &str, class: &ClassCode) -> &mut Self {
        self.row(
            &format!("b{prefix}Class"),
            format!("{} ({})", class.class, class.class_name),
        )
        .row(
            &format!("b{prefix}SubClass"),
            format!("{} ({})", class.subclass, class.subclass_name),
        )
        .row(
            &format!("b{prefix}Protocol"),
            format!("{} ({})", class.protocol, class.protocol_name),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabelOptions {
    /// List HID main-item flags that are in their default state.
    pub show_default_flags: bool,
}

/// Label for a graph node, including the record header. Nodes that failed to decode get a
/// "Decode error" label carrying the error text.
pub fn node_label(node: &Node, opts: &LabelOptions) -> Label {
    let mut label = match &node.descriptor {
        Ok(d) => rows(d, opts),
        Err(e) => {
            let mut l = Label::new("Decode error");
            l.row("error", e);
            l
        }
    };
    label.rows.insert(0, ("bLength".into(), node.length.to_string()));
    label
        .rows
        .insert(1, ("bDescriptorType".into(), format!("{:#04x}", node.type_tag)));
    label.rows.push(("offset".into(), node.offset.to_string()));
    label
}

/// Title and field rows of a decoded descriptor.
pub fn rows(d: &DecodedDescriptor, opts: &LabelOptions) -> Label {
    use DecodedDescriptor as D;
    match d {
        D::Device(d) => device(d),
        D::Configuration(c) => configuration("Configuration Descriptor", c),
        D::OtherSpeedConfiguration(c) => configuration("Other Speed Configuration Descriptor", c),
        D::String(s) => string(s),
        D::Interface(i) => {
            let mut l = Label::new("Interface Descriptor");
            l.row("bInterfaceNumber", i.number)
                .row("bAlternateSetting", i.alternate_setting)
                .row("bNumEndpoints", i.num_endpoints)
                .class("Interface", &i.class)
                .row("iInterface", i.index);
            l
        }
        D::Endpoint(e) => endpoint(e),
        D::InterfaceAssociation(a) => {
            let mut l = Label::new("Interface Association Descriptor");
            l.row("bFirstInterface", a.first_interface)
                .row("bInterfaceCount", a.interface_count)
                .class("Function", &a.function_class)
                .row("iFunction", a.index_function);
            l
        }
        D::DeviceQualifier(q) => qualifier(q),
        D::Bos(b) => {
            let mut l = Label::new("BOS Descriptor");
            l.row("wTotalLength", b.total_length)
                .row("bNumDeviceCaps", b.num_device_caps);
            l
        }
        D::DeviceCapability(c) => capability(c),
        D::SuperSpeedEndpointCompanion(c) => {
            let mut l = Label::new("SuperSpeed Endpoint Companion Descriptor");
            l.row("bMaxBurst", c.max_burst);
            let attributes = match c.decoded {
                CompanionAttributes::Bulk { max_streams } => {
                    format!("{:#04x} (MaxStreams: {max_streams})", c.attributes)
                }
                CompanionAttributes::Isochronous { mult, ssp_companion } => format!(
                    "{:#04x} (Mult: {mult}, {})",
                    c.attributes,
                    if ssp_companion { "SS+" } else { "No SS+" }
                ),
                CompanionAttributes::Other {
                    transfer: Some(transfer),
                } => format!("{:#04x} (undecoded for {transfer})", c.attributes),
                CompanionAttributes::Other { transfer: None } => {
                    format!("{:#04x} (no parent endpoint)", c.attributes)
                }
            };
            l.row("bmAttributes", attributes)
                .row("wBytesPerInterval", c.bytes_per_interval);
            l
        }
        D::SuperSpeedPlusIsochEndpointCompanion(c) => {
            let mut l = Label::new("SuperSpeedPlus Isochronous Endpoint Companion Descriptor");
            l.row("wReserved", c.reserved)
                .row("dwBytesPerInterval", c.bytes_per_interval);
            l
        }
        D::Hid(h) => hid(h),
        D::HidReport(r) => report(r, opts),
        D::HidPhysical(p) => {
            let mut l = Label::new("Physical Descriptor");
            l.row("Data", hex_list(&p.data));
            l
        }
        D::AudioControl(a) => audio_control(a),
        D::AudioStreaming(a) => audio_streaming(a),
        D::AudioStreamingEndpoint(e) => audio_endpoint(e),
        D::UnknownInterfaceSubclass { subclass, data } => {
            let mut l = Label::new("Unknown Interface Subclass");
            l.row(
                "Subclass",
                subclass.map_or_else(|| "none".into(), |s| format!("{s:#04x}")),
            )
            .row("Data", hex_list(data));
            l
        }
        D::Unknown {
            descriptor_type,
            data,
        } => {
            let mut l = Label::new(format!("Unknown Descriptor Type: {descriptor_type:#04x}"));
            l.row("Data", hex_list(data));
            l
        }
    }
}

/// Plain text listing: one block per node, with its parent, followed by the chains.
pub fn render_text(graph: &GraphModel, opts: &LabelOptions) -> String {
    let mut out = String::new();
    for node in &graph.nodes {
        let label = node_label(node, opts);
        let _ = write!(out, "{} {}", node.id, label.title);
        match graph.parent(node.id) {
            Some(parent) => {
                let _ = writeln!(out, " (in {parent})");
            }
            None => out.push('\n'),
        }
        for (field, value) in &label.rows {
            let _ = writeln!(out, "    {field}: {value}");
        }
    }
    for edge in graph.edges_of(EdgeKind::Chain) {
        let _ = writeln!(out, "{} then {}", edge.from, edge.to);
    }
    if let Some(e) = &graph.framing_error {
        let _ = writeln!(out, "stopped: {e}");
    }
    out
}

fn device(d: &Device) -> Label {
    let mut l = Label::new("Device Descriptor");
    l.row("bcdUSB", &d.usb)
        .class("Device", &d.class)
        .row("bMaxPacketSize0", d.max_packet_size_0)
        .row("idVendor", format!("{:#06x} ({})", d.vendor, d.vendor_name))
        .row("idProduct", format!("{:#06x} ({})", d.product, d.product_name))
        .row("bcdDevice", &d.device)
        .row("iManufacturer", d.index_manufacturer)
        .row("iProduct", d.index_product)
        .row("iSerialNumber", d.index_serial_number)
        .row("bNumConfigurations", d.num_configurations);
    l
}

fn qualifier(q: &DeviceQualifier) -> Label {
    let mut l = Label::new("Device Qualifier Descriptor");
    l.row("bcdUSB", &q.usb)
        .class("Device", &q.class)
        .row("bMaxPacketSize0", q.max_packet_size_0)
        .row("bNumConfigurations", q.num_configurations)
        .row("bReserved", q.reserved);
    l
}

fn configuration(title: &str, c: &Configuration) -> Label {
    let mut attributes = format!("{:#04x}", c.attributes.0);
    let mut flags = Vec::new();
    if c.attributes.self_powered() {
        flags.push("Self Powered");
    }
    if c.attributes.remote_wakeup() {
        flags.push("Remote Wakeup");
    }
    if !flags.is_empty() {
        attributes = format!("{attributes} ({})", flags.join(", "));
    }

    let mut l = Label::new(title);
    l.row("wTotalLength", c.total_length)
        .row("bNumInterfaces", c.num_interfaces)
        .row("bConfigurationValue", c.configuration_value)
        .row("iConfiguration", c.index_configuration)
        .row("bmAttributes", attributes)
        .row(
            "bMaxPower",
            format!("{} ({} mA)", c.max_power, c.max_power_milliamps()),
        );
    l
}

fn string(s: &StringDescriptor) -> Label {
    let mut l = Label::new("String Descriptor");
    match s {
        StringDescriptor::Text(text) => {
            l.row("String", text);
        }
        StringDescriptor::Languages(langs) => {
            for lang in langs {
                l.row("Supported Language", format!("{:#06x} ({})", lang.id, lang.name));
            }
        }
    }
    l
}

fn endpoint(e: &Endpoint) -> Label {
    let mut attributes = format!("{:#04x} ({}", e.attributes.0, e.attributes.transfer());
    if let (Some(sync), Some(usage)) = (e.attributes.sync(), e.attributes.usage()) {
        attributes.push_str(&format!(", {sync}, {usage}"));
    }
    attributes.push(')');

    let mut l = Label::new("Endpoint Descriptor");
    l.row(
        "bEndpointAddress",
        format!(
            "{:#04x} (EP {} {})",
            e.address.0,
            e.address.number(),
            e.address.direction()
        ),
    )
    .row("bmAttributes", attributes)
    .row("wMaxPacketSize", e.max_packet_size)
    .row("bInterval", e.interval);
    l
}

fn capability(c: &DeviceCapability) -> Label {
    let mut l = Label::new(format!("Device Capability Descriptor ({})", c.capability_name));
    l.row(
        "bDevCapabilityType",
        format!("{:#04x} ({})", c.capability_type, c.capability_name),
    );
    match &c.capability {
        Capability::Usb2Extension {
            attributes,
            lpm_capable,
        } => {
            l.row("bmAttributes", format!("{attributes:#010x}"))
                .row("LPM Capable", yes_no(*lpm_capable));
        }
        Capability::SuperSpeed {
            attributes,
            speeds_supported,
            speeds,
            functionality_support,
            u1_dev_exit_latency,
            u2_dev_exit_latency,
        } => {
            let speeds: Vec<_> = speeds.iter().map(|s| format!("{s:?}")).collect();
            l.row("bmAttributes", format!("{attributes:#04x}"))
                .row(
                    "wSpeedsSupported",
                    format!("{speeds_supported:#06x} ({})", speeds.join(", ")),
                )
                .row("bFunctionalitySupport", functionality_support)
                .row("bU1DevExitLat", format!("{u1_dev_exit_latency} us"))
                .row("wU2DevExitLat", format!("{u2_dev_exit_latency} us"));
        }
        Capability::ContainerId { container_id } => {
            l.row("ContainerID", container_id);
        }
        Capability::Platform { uuid, data } => {
            l.row("PlatformCapabilityUUID", uuid)
                .row("CapabilityData", hex_list(data));
        }
        Capability::Raw { data } => {
            l.row("Data", hex_list(data));
        }
    }
    l
}

fn hid(h: &Hid) -> Label {
    let mut l = Label::new("HID Descriptor");
    l.row("bcdHID", &h.bcd_hid)
        .row(
            "bCountryCode",
            format!("{} ({})", h.country_code, h.country_name),
        )
        .row("bNumDescriptors", h.num_descriptors);
    for (i, d) in h.descriptors.iter().enumerate() {
        l.row(
            &format!("Descriptor {i}"),
            format!("{:#04x} ({}), length {}", d.descriptor_type, d.type_name, d.length),
        );
    }
    l
}

fn report(r: &Report, opts: &LabelOptions) -> Label {
    let mut l = Label::new("Report Descriptor");
    for (i, item) in r.items.iter().enumerate() {
        let text = match &item.value {
            ItemValue::Input(flags) | ItemValue::Output(flags) | ItemValue::Feature(flags) => {
                format!(
                    "{} ({})",
                    item.name,
                    flags.describe(opts.show_default_flags).join(", ")
                )
            }
            ItemValue::Collection(c) => format!("Collection ({c})"),
            ItemValue::EndCollection => "End Collection".into(),
            ItemValue::Data(data) => format!("{}: {data:#x}", item.name),
            ItemValue::Long { tag, data } => {
                format!("Long Item {tag:#04x}: {}", hex_list(data))
            }
        };
        l.row(&format!("Item {i}"), text);
    }
    if let Some(offset) = r.truncated_at {
        l.row("Truncated", format!("item at offset {offset} runs past the record"));
    }
    l
}

fn audio_control(a: &AudioControl) -> Label {
    match a {
        AudioControl::Header {
            bcd_adc,
            total_length,
            in_collection,
            interface_numbers,
        } => {
            let mut l = Label::new("AudioControl Header Descriptor");
            l.row("bDescriptorSubtype", "1 (HEADER)")
                .row("bcdADC", bcd_adc)
                .row("wTotalLength", total_length)
                .row("bInCollection", in_collection)
                .row("baInterfaceNr", format!("{interface_numbers:?}"));
            l
        }
        AudioControl::InputTerminal {
            terminal_id,
            terminal_type,
            terminal_type_name,
            assoc_terminal,
            nr_channels,
            channel_config,
            index_channel_names,
            index_terminal,
        } => {
            let mut l = Label::new("Input Terminal Descriptor");
            l.row("bDescriptorSubtype", "2 (INPUT_TERMINAL)")
                .row("bTerminalID", terminal_id)
                .row(
                    "wTerminalType",
                    format!("{terminal_type:#06x} ({terminal_type_name})"),
                )
                .row("bAssocTerminal", assoc_terminal)
                .row("bNrChannels", nr_channels)
                .row("wChannelConfig", format!("{channel_config:#06x}"))
                .row("iChannelNames", index_channel_names)
                .row("iTerminal", index_terminal);
            l
        }
        AudioControl::OutputTerminal {
            terminal_id,
            terminal_type,
            terminal_type_name,
            assoc_terminal,
            source_id,
            index_terminal,
        } => {
            let mut l = Label::new("Output Terminal Descriptor");
            l.row("bDescriptorSubtype", "3 (OUTPUT_TERMINAL)")
                .row("bTerminalID", terminal_id)
                .row(
                    "wTerminalType",
                    format!("{terminal_type:#06x} ({terminal_type_name})"),
                )
                .row("bAssocTerminal", assoc_terminal)
                .row("bSourceID", source_id)
                .row("iTerminal", index_terminal);
            l
        }
        AudioControl::FeatureUnit {
            unit_id,
            source_id,
            control_size,
            controls,
            index_feature,
        } => {
            let controls: Vec<_> = controls.iter().map(|c| format!("{c:#x}")).collect();
            let mut l = Label::new("Feature Unit Descriptor");
            l.row("bDescriptorSubtype", "6 (FEATURE_UNIT)")
                .row("bUnitID", unit_id)
                .row("bSourceID", source_id)
                .row("bControlSize", control_size)
                .row("bmaControls", format!("[{}]", controls.join(", ")))
                .row("iFeature", index_feature);
            l
        }
        AudioControl::Unknown { subtype, data } => {
            let mut l = Label::new(format!("Unknown AudioControl Subtype: {subtype:#04x}"));
            l.row("Data", hex_list(data));
            l
        }
    }
}

fn audio_streaming(a: &AudioStreaming) -> Label {
    match a {
        AudioStreaming::General {
            terminal_link,
            delay,
            format_tag,
        } => {
            let mut l = Label::new("AudioStreaming General Descriptor");
            l.row("bDescriptorSubtype", "1 (AS_GENERAL)")
                .row("bTerminalLink", terminal_link)
                .row("bDelay", delay)
                .row("wFormatTag", format!("{format_tag:#06x}"));
            l
        }
        AudioStreaming::FormatType(FormatType::TypeI {
            nr_channels,
            subframe_size,
            bit_resolution,
            sam_freq_type,
            frequencies,
        }) => {
            let frequencies = match frequencies {
                SampleFrequencies::Continuous { lower, upper } => {
                    format!("Continuous from {lower} to {upper} Hz")
                }
                SampleFrequencies::Discrete(list) => {
                    let list: Vec<_> = list.iter().map(u32::to_string).collect();
                    format!("{} Hz", list.join(", "))
                }
            };
            let mut l = Label::new("Format Type I Descriptor");
            l.row("bDescriptorSubtype", "2 (FORMAT_TYPE)")
                .row("bFormatType", "1 (TYPE_I)")
                .row("bNrChannels", nr_channels)
                .row("bSubframeSize", subframe_size)
                .row("bBitResolution", bit_resolution)
                .row("bSamFreqType", sam_freq_type)
                .row("Sampling Frequencies", frequencies);
            l
        }
        AudioStreaming::FormatType(FormatType::Unsupported { format_type }) => {
            let mut l = Label::new(format!("Unsupported Format Type: {format_type}"));
            l.row("bDescriptorSubtype", "2 (FORMAT_TYPE)");
            l
        }
        AudioStreaming::Unknown { subtype, data } => {
            let mut l = Label::new(format!("Unknown AudioStreaming Subtype: {subtype:#04x}"));
            l.row("Data", hex_list(data));
            l
        }
    }
}

fn audio_endpoint(e: &AudioEndpoint) -> Label {
    let mut l = Label::new("Audio Streaming Endpoint Descriptor");
    l.row("bDescriptorSubtype", format!("{} (EP_GENERAL)", e.subtype))
        .row(
            "bmAttributes",
            format!(
                "{:#04x} (Sampling Frequency Control: {}, Pitch Control: {})",
                e.attributes,
                yes_no(e.sampling_frequency_control),
                yes_no(e.pitch_control)
            ),
        )
        .row(
            "bLockDelayUnits",
            format!("{} ({})", e.lock_delay_units, e.lock_delay_units_name),
        )
        .row("wLockDelay", e.lock_delay);
    l
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

fn hex_list(data: &[u8]) -> String {
    let bytes: Vec<_> = data.iter().map(|b| format!("{b:02x}")).collect();
    bytes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::decode;
    use crate::names::BuiltinNames;
    use crate::record::Record;

    fn label_of(bytes: &[u8], subclass: Option<u8>, opts: &LabelOptions) -> Label {
        let d = decode(&Record { offset: 0, bytes }, subclass, &BuiltinNames).unwrap();
        rows(&d, opts)
    }

    fn value<'a>(l: &'a Label, field: &str) -> Option<&'a str> {
        l.rows
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn endpoint_rows() {
        let l = label_of(&[0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x0a], None, &Default::default());
        assert_eq!(l.title, "Endpoint Descriptor");
        assert_eq!(value(&l, "bEndpointAddress"), Some("0x81 (EP 1 IN)"));
        assert_eq!(value(&l, "bmAttributes"), Some("0x03 (Interrupt)"));
    }

    #[test]
    fn report_hides_default_flags() {
        let raw = [0x04, 0x22, 0x81, 0x02];
        let l = label_of(&raw, None, &LabelOptions::default());
        assert_eq!(value(&l, "Item 0"), Some("Input (Data, Variable, Absolute)"));

        let l = label_of(
            &raw,
            None,
            &LabelOptions {
                show_default_flags: true,
            },
        );
        let item = value(&l, "Item 0").unwrap_or_default();
        assert!(item.contains("No Wrap"));
        assert!(item.contains("Bit Field"));
    }

    #[test]
    fn configuration_rows() {
        let l = label_of(
            &[0x09, 0x02, 0x22, 0x00, 0x01, 0x01, 0x00, 0xc0, 0x32],
            None,
            &Default::default(),
        );
        assert_eq!(value(&l, "bmAttributes"), Some("0xc0 (Self Powered)"));
        assert_eq!(value(&l, "bMaxPower"), Some("50 (100 mA)"));
    }

    #[test]
    fn text_listing() {
        let bytes = [
            0x09, 0x02, 0x12, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, // configuration
            0x09, 0x04, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, // interface
            0x02, 0x50, 0x02, 0x51, 0x00, 0x00,
        ];
        let g = crate::decode(&bytes);
        let text = render_text(&g, &Default::default());
        assert!(text.starts_with("desc_0 Configuration Descriptor\n    bLength: 9\n"));
        assert!(text.contains("desc_1 Interface Descriptor (in desc_0)\n"));
        assert!(text.contains("desc_2 then desc_3\n"));
        assert!(text.ends_with("stopped: descriptor at offset 22 declares a length of 0\n"));
    }

    #[test]
    fn error_node_label() {
        let node = Node {
            id: crate::graph::NodeId(3),
            offset: 12,
            length: 4,
            type_tag: 0x02,
            descriptor: decode(
                &Record {
                    offset: 12,
                    bytes: &[0x04, 0x02, 0x00, 0x00],
                },
                None,
                &BuiltinNames,
            ),
        };
        let l = node_label(&node, &Default::default());
        assert_eq!(l.title, "Decode error");
        assert_eq!(l.rows[0], ("bLength".to_string(), "4".to_string()));
        assert_eq!(value(&l, "bDescriptorType"), Some("0x02"));
        assert!(value(&l, "error").is_some_and(|e| e.contains("Configuration")));
    }
}
