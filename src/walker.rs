//! Turns a descriptor buffer into a [`GraphModel`].
//!
//! The walk is a single pass over the records. A small `ParseContext` remembers the device,
//! the current anchor, configuration, interface and endpoint so every record can be attached to
//! its structural parent. Class-specific interface records are decoded according to the subclass
//! of the most recent interface.

use crate::descriptor::{self, DecodedDescriptor, TransferType};
use crate::graph::{EdgeKind, GraphModel, NodeId};
use crate::names::NameResolver;
use crate::record::{Record, Records};
use log::{debug, info, warn};

/// State threaded through one walk. Decoders never see it.
#[derive(Debug, Default)]
struct ParseContext {
    device: Option<NodeId>,
    anchor: Option<NodeId>,
    config: Option<NodeId>,
    interface: Option<NodeId>,
    /// Selects the layout of 0x24 records.
    interface_subclass: Option<u8>,
    endpoint: Option<(NodeId, Option<TransferType>)>,
    strings: Vec<NodeId>,
    class_specific: Vec<NodeId>,
    unknown: Vec<NodeId>,
}

pub fn walk(buf: &[u8], names: &dyn NameResolver) -> GraphModel {
    let mut graph = GraphModel::default();
    let mut ctx = ParseContext::default();
    let mut records = Records::new(buf);

    while let Some(record) = records.next() {
        let id = step(&mut graph, &mut ctx, &record, names);
        if record.type_tag() == descriptor::ENDPOINT {
            companions(&mut graph, &ctx, &mut records, id, names);
        }
    }

    graph.framing_error = records.framing_error();
    if let Some(e) = graph.framing_error {
        warn!("stopped at offset {}: {e}", e.offset());
    }

    finish(&mut graph, ctx);
    info!(
        "decoded {} descriptors into {} edges ({} decode errors)",
        graph.nodes.len(),
        graph.edges.len(),
        graph.errors().count()
    );
    graph
}

/// Decodes one top-level record, adds its node and links it according to the context.
fn step(
    graph: &mut GraphModel,
    ctx: &mut ParseContext,
    record: &Record<'_>,
    names: &dyn NameResolver,
) -> NodeId {
    let decoded = descriptor::decode(record, ctx.interface_subclass, names);
    if let Err(e) = &decoded {
        warn!("descriptor at offset {}: {e}", record.offset);
    }
    let transfer = match &decoded {
        Ok(DecodedDescriptor::Endpoint(ep)) => Some(ep.attributes.transfer()),
        _ => None,
    };
    let subclass = match &decoded {
        Ok(DecodedDescriptor::Interface(i)) => Some(i.subclass()),
        _ => None,
    };
    let id = graph.push(record, decoded);
    debug!(
        "{id}: type {:#04x} at offset {}",
        record.type_tag(),
        record.offset
    );

    use descriptor::{
        BOS, CONFIGURATION, CS_ENDPOINT, CS_INTERFACE, DEVICE, DEVICE_CAPABILITY, DEVICE_QUALIFIER,
        ENDPOINT, HID, INTERFACE, INTERFACE_ASSOCIATION, OTHER_SPEED_CONFIGURATION, PHYSICAL,
        REPORT, STRING,
    };
    match record.type_tag() {
        DEVICE => {
            ctx.device = Some(id);
            ctx.anchor = Some(id);
            ctx.config = None;
            ctx.interface = None;
            ctx.interface_subclass = None;
            ctx.endpoint = None;
        }
        CONFIGURATION | OTHER_SPEED_CONFIGURATION => {
            contain(graph, ctx.device, id);
            ctx.config = Some(id);
            ctx.anchor = Some(id);
            ctx.interface = None;
            ctx.interface_subclass = None;
            ctx.endpoint = None;
        }
        BOS | DEVICE_CAPABILITY => {
            contain(graph, ctx.anchor, id);
            ctx.anchor = Some(id);
        }
        INTERFACE => {
            contain(graph, ctx.config.or(ctx.anchor), id);
            ctx.interface = Some(id);
            ctx.interface_subclass = subclass;
            ctx.endpoint = None;
        }
        ENDPOINT => {
            contain(graph, ctx.interface, id);
            ctx.endpoint = Some((id, transfer));
        }
        INTERFACE_ASSOCIATION | DEVICE_QUALIFIER => contain(graph, ctx.device, id),
        STRING => ctx.strings.push(id),
        HID | REPORT | PHYSICAL | CS_INTERFACE | CS_ENDPOINT => ctx.class_specific.push(id),
        _ => ctx.unknown.push(id),
    }
    id
}

/// Consumes the SuperSpeed companions that directly follow an endpoint and attaches them to it.
fn companions(
    graph: &mut GraphModel,
    ctx: &ParseContext,
    records: &mut Records<'_>,
    endpoint: NodeId,
    names: &dyn NameResolver,
) {
    let transfer = ctx.endpoint.and_then(|(_, t)| t);
    while let Some(record) = records.next_if(|r| {
        matches!(
            r.type_tag(),
            descriptor::SUPERSPEED_ENDPOINT_COMPANION
                | descriptor::SUPERSPEEDPLUS_ISOCH_ENDPOINT_COMPANION
        )
    }) {
        let decoded = if record.type_tag() == descriptor::SUPERSPEED_ENDPOINT_COMPANION {
            descriptor::decode_ss_companion(&record, transfer)
        } else {
            descriptor::decode(&record, ctx.interface_subclass, names)
        };
        if let Err(e) = &decoded {
            warn!("companion at offset {}: {e}", record.offset);
        }
        let id = graph.push(&record, decoded);
        debug!("{id}: companion of {endpoint}");
        graph.link(endpoint, id, EdgeKind::Containment);
    }
}

fn contain(graph: &mut GraphModel, parent: Option<NodeId>, child: NodeId) {
    match parent {
        Some(parent) => graph.link(parent, child, EdgeKind::Containment),
        None => debug!("{child} has no parent"),
    }
}

fn chain(graph: &mut GraphModel, list: &[NodeId]) {
    for pair in list.windows(2) {
        graph.link(pair[0], pair[1], EdgeKind::Chain);
    }
}

/// Chains the side lists and adds the layout-only edges tying them to the anchor.
fn finish(graph: &mut GraphModel, ctx: ParseContext) {
    chain(graph, &ctx.strings);
    chain(graph, &ctx.class_specific);
    chain(graph, &ctx.unknown);

    if let Some(anchor) = ctx.anchor {
        if let Some(&first) = ctx.strings.first() {
            graph.link(anchor, first, EdgeKind::LayoutOnly);
        }
        if let Some(&first) = ctx.class_specific.first() {
            graph.link(first, anchor, EdgeKind::LayoutOnly);
        }
    }

    graph.anchor = ctx.anchor;
    graph.strings = ctx.strings;
    graph.class_specific = ctx.class_specific;
    graph.unknown = ctx.unknown;
}
