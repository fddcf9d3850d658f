//! Graphviz DOT output for a [`GraphModel`].

use crate::graph::{EdgeKind, GraphModel};
use crate::label::{self, Label, LabelOptions};
use std::fmt;

#[derive(Debug, Clone, Copy)]
pub struct DotOptions {
    /// Emit layout-only edges and rank groups.
    pub layout_edges: bool,
    pub label: LabelOptions,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            layout_edges: true,
            label: LabelOptions::default(),
        }
    }
}

pub fn render(graph: &GraphModel, opts: &DotOptions) -> String {
    Dot { graph, opts }.to_string()
}

struct Dot<'a> {
    graph: &'a GraphModel,
    opts: &'a DotOptions,
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.graph;
        writeln!(f, "digraph {{")?;

        for node in &g.nodes {
            let label = label::node_label(node, &self.opts.label);
            let header = if node.descriptor.is_ok() {
                "lightgrey"
            } else {
                "salmon"
            };
            writeln!(
                f,
                "\t{} [label=<{}> shape=none]",
                node.id,
                Table {
                    label: &label,
                    header
                }
            )?;
        }

        for edge in &g.edges {
            match edge.kind {
                EdgeKind::Containment | EdgeKind::Chain => {
                    writeln!(f, "\t{} -> {}", edge.from, edge.to)?
                }
                EdgeKind::LayoutOnly if self.opts.layout_edges => {
                    writeln!(f, "\t{} -> {} [style=invis]", edge.from, edge.to)?
                }
                EdgeKind::LayoutOnly => {}
            }
        }

        if self.opts.layout_edges {
            rank(f, "same", g.same_rank().iter())?;
            rank(f, "sink", g.unknown.iter())?;
        }

        writeln!(f, "}}")
    }
}

fn rank<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    rank: &str,
    nodes: impl ExactSizeIterator<Item = T>,
) -> fmt::Result {
    if nodes.len() == 0 {
        return Ok(());
    }
    write!(f, "\t{{ rank={rank};")?;
    for n in nodes {
        write!(f, " {n};")?;
    }
    writeln!(f, " }}")
}

struct Table<'a> {
    label: &'a Label,
    header: &'a str,
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0">"#)?;
        writeln!(
            f,
            r#"<TR><TD BGCOLOR="{}"><B>{}</B></TD></TR>"#,
            self.header,
            Escape(&self.label.title)
        )?;
        for (field, value) in &self.label.rows {
            writeln!(f, "<TR><TD>{}: {}</TD></TR>", Escape(field), Escape(value))?;
        }
        write!(f, "</TABLE>")
    }
}

/// HTML-escapes text for use inside a Graphviz HTML-like label.
struct Escape<'a>(&'a str);

impl fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\n' => f.write_str("<BR/>")?,
                c if c.is_control() => {}
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::BuiltinNames;
    use crate::walker::walk;

    const DEVICE_CONFIG_STRING_UNKNOWN: &[u8] = &[
        0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd0, 0x04, 0x01, 0x01, 0x00, 0x01, 0x01,
        0x02, 0x03, 0x01, // device
        0x09, 0x02, 0x12, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, // configuration
        0x06, 0x03, b'<', 0x00, b'&', 0x00, // string "<&"
        0x03, 0x44, 0x00, // unknown
    ];

    #[test]
    fn renders_nodes_and_edges() {
        let g = walk(DEVICE_CONFIG_STRING_UNKNOWN, &BuiltinNames);
        let dot = render(&g, &DotOptions::default());
        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("<B>Device Descriptor</B>"));
        assert!(dot.contains("\tdesc_0 -> desc_1\n"));
        assert!(dot.contains("\tdesc_1 -> desc_2 [style=invis]\n"));
        assert!(dot.contains("\t{ rank=same; desc_1; desc_2; }\n"));
        assert!(dot.contains("\t{ rank=sink; desc_3; }\n"));
        assert!(dot.contains("String: &lt;&amp;"));
    }

    #[test]
    fn layout_can_be_disabled() {
        let g = walk(DEVICE_CONFIG_STRING_UNKNOWN, &BuiltinNames);
        let dot = render(
            &g,
            &DotOptions {
                layout_edges: false,
                ..Default::default()
            },
        );
        assert!(!dot.contains("invis"));
        assert!(!dot.contains("rank="));
        assert!(dot.contains("\tdesc_0 -> desc_1\n"));
    }

    #[test]
    fn error_nodes_are_marked() {
        let g = walk(&[0x04, 0x02, 0x00, 0x00], &BuiltinNames);
        let dot = render(&g, &DotOptions::default());
        assert!(dot.contains(r#"<TD BGCOLOR="salmon"><B>Decode error</B>"#));
    }
}
