use super::Renderer;
use crate::core::{Edge, NodeRole};
use crate::discovery::Topology;
use std::io::{self, Write};

/// Graphviz `digraph` renderer.
///
/// Masters are red, replicas yellow, sentinels blue. Replicas point at their
/// master (`REPLICAOF`), sentinels at the masters they watch (`WATCHES`).
/// Edges whose target was never reached are left out.
#[derive(Debug, Default)]
pub struct GraphvizRenderer;

impl Renderer for GraphvizRenderer {
    fn render(&self, topology: &Topology, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "digraph redis {{")?;

        for node in topology.nodes() {
            let color = match node.role {
                NodeRole::Master => "red",
                NodeRole::Replica => "yellow",
                NodeRole::Sentinel => "blue",
            };
            writeln!(out, "\t{}[color={}];", quote(&node.address), color)?;

            if let Some(master) = node.master.as_ref().and_then(|edge| resolved(topology, edge)) {
                writeln!(
                    out,
                    "\t{} -> {}[label=\"REPLICAOF\"];",
                    quote(&node.address),
                    quote(master)
                )?;
            }

            for watched in node
                .watched_masters
                .iter()
                .filter_map(|edge| resolved(topology, edge))
            {
                writeln!(
                    out,
                    "\t{} -> {}[label=\"WATCHES\"];",
                    quote(&node.address),
                    quote(watched)
                )?;
            }
        }

        writeln!(out, "}}")
    }
}

fn resolved<'a>(topology: &'a Topology, edge: &Edge) -> Option<&'a str> {
    edge.node_id()
        .and_then(|id| topology.get(id))
        .map(|node| node.address.as_str())
}

/// Double-quoted DOT identifier
fn quote(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for c in id.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
