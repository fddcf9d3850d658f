//! Decoder for USB GET_DESCRIPTOR responses.
//!
//! A response is a concatenation of length-prefixed descriptor records. [`decode`] splits it into
//! records, decodes each one into a [`DecodedDescriptor`] and links them into a [`GraphModel`]
//! following the USB containment rules (device, configuration, interface, endpoint), with side
//! lists for strings, class-specific and unknown descriptors.
//!
//! ```
//! let bytes = descviz::parse_hex_line("12 01 00 02 00 00 00 40 d0 04 01 01 00 01 01 02 03 01")?;
//! let graph = descviz::decode(&bytes);
//! let Ok(descviz::DecodedDescriptor::Device(device)) = &graph.nodes[0].descriptor else {
//!     panic!("not a device descriptor");
//! };
//! assert_eq!(device.usb, "2.00");
//! # Ok::<(), descviz::HexError>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod dot;
pub mod graph;
pub mod hex;
pub mod label;
pub mod names;
pub mod record;
pub mod registry;
pub mod walker;

pub use descriptor::{DecodeError, DecodedDescriptor, DescriptorKind};
pub use graph::{Edge, EdgeKind, GraphModel, Node, NodeId};
pub use hex::{HexError, parse_hex_line};
pub use names::{BuiltinNames, NameResolver, UsbIdsDatabase};
pub use record::FramingError;

/// Decodes a descriptor buffer using the built-in name tables.
pub fn decode(bytes: &[u8]) -> GraphModel {
    decode_with(bytes, &BuiltinNames)
}

/// Decodes a descriptor buffer, resolving vendor, product and other names through `names`.
pub fn decode_with(bytes: &[u8], names: &dyn NameResolver) -> GraphModel {
    walker::walk(bytes, names)
}
