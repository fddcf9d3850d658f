use descviz::descriptor::{ItemValue, StringDescriptor};
use descviz::{
    DecodedDescriptor, DescriptorKind, EdgeKind, FramingError, GraphModel, NameResolver, NodeId,
    UsbIdsDatabase, decode, decode_with, parse_hex_line,
};

const DEVICE_HEX: &str = "12 01 00 02 00 00 00 40 D0 04 01 01 00 01 02 03 01";

fn device_bytes() -> Vec<u8> {
    let mut bytes = parse_hex_line(DEVICE_HEX).unwrap();
    // The 18th byte, bNumConfigurations.
    bytes.push(0x01);
    bytes
}

fn kinds(g: &GraphModel) -> Vec<Option<DescriptorKind>> {
    g.nodes.iter().map(|n| n.kind()).collect()
}

#[test]
fn device_descriptor() {
    let bytes = device_bytes();
    assert_eq!(bytes.len(), 18);
    let g = decode(&bytes);
    assert_eq!(g.nodes.len(), 1);
    let Ok(DecodedDescriptor::Device(d)) = &g.nodes[0].descriptor else {
        panic!("expected a device, got {:?}", g.nodes[0].descriptor);
    };
    assert_eq!(d.usb, "2.00");
    assert_eq!(d.device, "1.00");
    assert_eq!(d.vendor, 0x04d0);
    assert_eq!(d.product, 0x0101);
    assert_eq!(g.anchor, Some(NodeId(0)));
    assert_eq!(g.framing_error, None);
}

#[test]
fn seventeen_byte_device_is_truncated() {
    // A 17-byte capture of an 18-byte descriptor cannot be framed.
    let g = decode(&parse_hex_line(DEVICE_HEX).unwrap());
    assert!(g.nodes.is_empty());
    assert_eq!(
        g.framing_error,
        Some(FramingError::Truncated {
            offset: 0,
            declared: 18,
            available: 17
        })
    );
}

#[test]
fn zero_length_halts_and_keeps_earlier_records() {
    let mut bytes = device_bytes();
    bytes.extend([0x00, 0x02, 0x09, 0x02, 0x12, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32]);
    let g = decode(&bytes);
    assert_eq!(g.nodes.len(), 1);
    assert_eq!(g.framing_error, Some(FramingError::ZeroLength { offset: 18 }));
}

#[test]
fn decoding_is_idempotent() {
    let bytes = parse_hex_line(
        "12 01 10 02 00 00 00 40 d0 04 01 01 00 01 01 02 03 01 \
         09 02 22 00 01 01 00 a0 32 \
         09 04 00 00 01 03 01 01 00 \
         09 21 11 01 00 01 22 3f 00 \
         07 05 81 03 08 00 0a \
         04 03 09 04",
    )
    .unwrap();
    let a = decode(&bytes);
    let b = decode(&bytes);
    assert_eq!(a, b);
    assert_eq!(kinds(&a), kinds(&b));
    assert_eq!(a.edges, b.edges);
}

#[test]
fn endpoint_companion_is_a_child() {
    let bytes = parse_hex_line(
        "12 01 00 03 00 00 00 09 d0 04 01 01 00 01 01 02 03 01 \
         09 02 2c 00 01 01 00 80 32 \
         09 04 00 00 02 08 06 50 00 \
         07 05 81 02 00 04 00 \
         06 30 0f 00 00 00 \
         07 05 02 02 00 04 00 \
         06 30 0f 00 00 00",
    )
    .unwrap();
    let g = decode(&bytes);
    assert_eq!(
        kinds(&g),
        [
            Some(DescriptorKind::Device),
            Some(DescriptorKind::Configuration),
            Some(DescriptorKind::Interface),
            Some(DescriptorKind::Endpoint),
            Some(DescriptorKind::SuperSpeedEndpointCompanion),
            Some(DescriptorKind::Endpoint),
            Some(DescriptorKind::SuperSpeedEndpointCompanion),
        ]
    );
    assert_eq!(g.parent(NodeId(4)), Some(NodeId(3)));
    assert_eq!(g.parent(NodeId(5)), Some(NodeId(2)));
    assert_eq!(g.parent(NodeId(6)), Some(NodeId(5)));
    assert!(g.unknown.is_empty());
    assert_eq!(g.framing_error, None);
}

#[test]
fn class_specific_interface_without_interface() {
    let bytes = parse_hex_line("09 24 01 00 01 09 00 01 01").unwrap();
    let g = decode(&bytes);
    assert!(matches!(
        g.nodes[0].descriptor,
        Ok(DecodedDescriptor::UnknownInterfaceSubclass { subclass: None, .. })
    ));
    assert_eq!(g.class_specific, vec![NodeId(0)]);
}

#[test]
fn device_configuration_interface_containment() {
    let mut bytes = device_bytes();
    bytes.extend(parse_hex_line("09 02 12 00 01 01 00 80 32 09 04 00 00 00 ff 00 00 00").unwrap());
    let g = decode(&bytes);
    assert_eq!(g.nodes.len(), 3);
    let containment: Vec<_> = g
        .edges_of(EdgeKind::Containment)
        .map(|e| (e.from, e.to))
        .collect();
    assert_eq!(
        containment,
        vec![(NodeId(0), NodeId(1)), (NodeId(1), NodeId(2))]
    );
    assert_eq!(g.anchor, Some(NodeId(1)));
}

#[test]
fn hid_report_input_item() {
    let g = decode(&parse_hex_line("04 22 81 02").unwrap());
    let Ok(DecodedDescriptor::HidReport(report)) = &g.nodes[0].descriptor else {
        panic!("expected a report, got {:?}", g.nodes[0].descriptor);
    };
    let ItemValue::Input(flags) = report.items[0].value else {
        panic!("expected an Input item");
    };
    assert!(flags.variable());
    assert!(!flags.constant());
}

#[test]
fn names_come_from_the_resolver() {
    let db = UsbIdsDatabase::from_usb_ids("04d0  Mace Group, Inc.\n\t0101  Keyboard\n").unwrap();
    assert_eq!(db.vendor_name(0x04d0), "Mace Group, Inc.");
    let mut bytes = device_bytes();
    bytes.extend(parse_hex_line("04 03 09 04").unwrap());
    let g = decode_with(&bytes, &db);
    let Ok(DecodedDescriptor::Device(d)) = &g.nodes[0].descriptor else {
        panic!("expected a device");
    };
    assert_eq!(d.vendor_name, "Mace Group, Inc.");
    assert_eq!(d.product_name, "Keyboard");
    assert!(matches!(
        &g.nodes[1].descriptor,
        Ok(DecodedDescriptor::String(StringDescriptor::Languages(l))) if l[0].name == "English (United States)"
    ));
}

#[test]
fn json_output_marks_layout_edges() {
    let mut bytes = device_bytes();
    bytes.extend(parse_hex_line("04 03 09 04").unwrap());
    let g = decode(&bytes);
    let v = serde_json::to_value(&g).unwrap();
    assert_eq!(v["nodes"][0]["descriptor"]["Ok"]["kind"], "Device");
    assert_eq!(v["edges"][0]["kind"], "LayoutOnly");
}
