use crate::descriptor::{DecodeError, DecodedDescriptor, DescriptorKind};
use crate::record::{FramingError, Record};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "desc_{}", self.0)
    }
}

/// One descriptor record and what it decoded to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Byte offset of the record in the input buffer.
    pub offset: usize,
    pub length: u8,
    pub type_tag: u8,
    pub descriptor: Result<DecodedDescriptor, DecodeError>,
}

impl Node {
    pub fn kind(&self) -> Option<DescriptorKind> {
        self.descriptor.as_ref().ok().map(DecodedDescriptor::kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Parent owns child, e.g. Interface to Endpoint.
    Containment,
    /// Ordering between consecutive members of a side list.
    Chain,
    /// No meaning beyond placement. Consumers that do not lay anything out can skip these.
    LayoutOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

/// The result of decoding one descriptor buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphModel {
    /// Indexed by [`NodeId`], in input order.
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// The anchor in effect when the walk finished: the device, or the configuration or BOS
    /// record that most recently superseded it.
    pub anchor: Option<NodeId>,
    pub strings: Vec<NodeId>,
    pub class_specific: Vec<NodeId>,
    pub unknown: Vec<NodeId>,
    /// Why the walk stopped before the end of the buffer, if it did.
    pub framing_error: Option<FramingError>,
}

impl GraphModel {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Edges that carry meaning, i.e. everything except layout hints.
    pub fn semantic_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(|e| e.kind != EdgeKind::LayoutOnly)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.edges_of(EdgeKind::Containment)
            .find(|e| e.to == id)
            .map(|e| e.from)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges_of(EdgeKind::Containment)
            .filter(move |e| e.from == id)
            .map(|e| e.to)
    }

    /// Nodes with a containment parent of their own are not roots.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| self.parent(id).is_none())
    }

    /// Nodes a renderer should place on one rank: the head of the class-specific list, the
    /// anchor and the head of the string list.
    pub fn same_rank(&self) -> Vec<NodeId> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        self.class_specific
            .first()
            .copied()
            .into_iter()
            .chain([anchor])
            .chain(self.strings.first().copied())
            .collect()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&Node, &DecodeError)> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.descriptor.as_ref().err().map(|e| (n, e)))
    }

    pub(crate) fn push(
        &mut self,
        record: &Record<'_>,
        descriptor: Result<DecodedDescriptor, DecodeError>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            offset: record.offset,
            length: record.declared_length(),
            type_tag: record.type_tag(),
            descriptor,
        });
        id
    }

    pub(crate) fn link(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        self.edges.push(Edge { from, to, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(offset: usize, bytes: &[u8]) -> Record<'_> {
        Record { offset, bytes }
    }

    fn unknown(tag: u8) -> Result<DecodedDescriptor, DecodeError> {
        Ok(DecodedDescriptor::Unknown {
            descriptor_type: tag,
            data: Vec::new(),
        })
    }

    #[test]
    fn relations() {
        let mut g = GraphModel::default();
        let a = g.push(&rec(0, &[2, 0x40]), unknown(0x40));
        let b = g.push(&rec(2, &[2, 0x41]), unknown(0x41));
        let c = g.push(&rec(4, &[2, 0x42]), unknown(0x42));
        g.link(a, b, EdgeKind::Containment);
        g.link(b, c, EdgeKind::Chain);
        g.link(a, c, EdgeKind::LayoutOnly);

        assert_eq!(g.parent(b), Some(a));
        assert_eq!(g.parent(c), None);
        assert_eq!(g.children(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(g.roots().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(g.semantic_edges().count(), 2);
        assert_eq!(g.node(c).map(|n| n.type_tag), Some(0x42));
        assert_eq!(a.to_string(), "desc_0");
    }

    #[test]
    fn same_rank_needs_an_anchor() {
        let mut g = GraphModel {
            strings: vec![NodeId(3)],
            class_specific: vec![NodeId(1), NodeId(2)],
            ..Default::default()
        };
        assert!(g.same_rank().is_empty());
        g.anchor = Some(NodeId(0));
        assert_eq!(g.same_rank(), vec![NodeId(1), NodeId(0), NodeId(3)]);
    }
}
