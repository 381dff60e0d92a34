//! Rendering of a discovered topology
//!
//! Renderers are selected through a [`RendererRegistry`] built once at
//! startup and handed to the render step.

mod graphviz;

pub use graphviz::GraphvizRenderer;

use crate::core::{Edge, NodeRole, TopologyError};
use crate::discovery::Topology;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structural dump for debugging
    Debug,
    /// Graphviz `digraph`
    #[default]
    Graphviz,
    /// JSON array of nodes
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Debug, Self::Graphviz, Self::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Graphviz => "graphviz",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "graphviz" => Ok(Self::Graphviz),
            "json" => Ok(Self::Json),
            other => Err(TopologyError::UnknownOutput(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a topology to a writer
pub trait Renderer {
    fn render(&self, topology: &Topology, out: &mut dyn Write) -> io::Result<()>;
}

/// Node with its edges resolved to addresses
#[derive(Debug, Serialize)]
struct NodeView<'a> {
    address: &'a str,
    role: NodeRole,
    master: Option<EdgeView<'a>>,
    replicas: Vec<EdgeView<'a>>,
    watched_masters: Vec<EdgeView<'a>>,
}

#[derive(Debug, Serialize)]
struct EdgeView<'a> {
    target: &'a str,
    resolved: bool,
}

fn edge_view<'a>(topology: &'a Topology, edge: &'a Edge) -> EdgeView<'a> {
    EdgeView {
        target: topology.edge_target(edge),
        resolved: edge.is_resolved(),
    }
}

fn node_views(topology: &Topology) -> Vec<NodeView<'_>> {
    topology
        .nodes()
        .iter()
        .map(|node| NodeView {
            address: &node.address,
            role: node.role,
            master: node.master.as_ref().map(|e| edge_view(topology, e)),
            replicas: node
                .replicas
                .iter()
                .map(|e| edge_view(topology, e))
                .collect(),
            watched_masters: node
                .watched_masters
                .iter()
                .map(|e| edge_view(topology, e))
                .collect(),
        })
        .collect()
}

/// Pretty-printed structural dump
#[derive(Debug, Default)]
pub struct DebugRenderer;

impl Renderer for DebugRenderer {
    fn render(&self, topology: &Topology, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{:#?}", node_views(topology))
    }
}

/// JSON array of nodes; edges carry their target address and whether it was reached
#[derive(Debug, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, topology: &Topology, out: &mut dyn Write) -> io::Result<()> {
        let views = node_views(topology);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &views)?;
        } else {
            serde_json::to_writer(&mut *out, &views)?;
        }
        writeln!(out)
    }
}

/// Explicit format -> renderer mapping
pub struct RendererRegistry {
    renderers: HashMap<OutputFormat, Box<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registry with every built-in format
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(OutputFormat::Debug, Box::new(DebugRenderer));
        registry.register(OutputFormat::Graphviz, Box::new(GraphvizRenderer));
        registry.register(OutputFormat::Json, Box::new(JsonRenderer { pretty: true }));
        registry
    }

    pub fn register(&mut self, format: OutputFormat, renderer: Box<dyn Renderer>) {
        self.renderers.insert(format, renderer);
    }

    pub fn get(&self, format: OutputFormat) -> Result<&dyn Renderer, TopologyError> {
        self.renderers
            .get(&format)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| TopologyError::UnknownOutput(format.to_string()))
    }

    pub fn render(
        &self,
        format: OutputFormat,
        topology: &Topology,
        out: &mut dyn Write,
    ) -> Result<(), TopologyError> {
        self.get(format)?.render(topology, out)?;
        Ok(())
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeRecord;

    fn sample() -> Topology {
        let mut topology = Topology::new();
        let master = topology.register(NodeRecord::new("10.0.0.1:6379", NodeRole::Master));
        let mut replica = NodeRecord::new("10.0.0.2:6379", NodeRole::Replica);
        replica.master = Some(Edge::Resolved(master));
        topology.register(replica);
        topology
    }

    fn render_to_string(
        registry: &RendererRegistry,
        format: OutputFormat,
        topology: &Topology,
    ) -> String {
        let mut buf = Vec::new();
        registry.render(format, topology, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("debug".parse::<OutputFormat>().unwrap(), OutputFormat::Debug);
        assert_eq!("graphviz".parse::<OutputFormat>().unwrap(), OutputFormat::Graphviz);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);

        let err = "dot".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, TopologyError::UnknownOutput(ref name) if name == "dot"));
    }

    #[test]
    fn test_output_format_display_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_json_output() {
        let registry = RendererRegistry::with_defaults();
        let output = render_to_string(&registry, OutputFormat::Json, &sample());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["address"], "10.0.0.1:6379");
        assert_eq!(nodes[0]["role"], "master");
        assert!(nodes[0]["master"].is_null());
        assert_eq!(nodes[1]["role"], "replica");
        assert_eq!(nodes[1]["master"]["target"], "10.0.0.1:6379");
        assert_eq!(nodes[1]["master"]["resolved"], true);
    }

    #[test]
    fn test_debug_output_mentions_every_node() {
        let registry = RendererRegistry::with_defaults();
        let output = render_to_string(&registry, OutputFormat::Debug, &sample());

        assert!(output.contains("\"10.0.0.1:6379\""));
        assert!(output.contains("\"10.0.0.2:6379\""));
        assert!(output.contains("Replica"));
    }

    #[test]
    fn test_unresolved_edge_view() {
        let mut topology = Topology::new();
        let mut sentinel = NodeRecord::new("10.0.0.5:26379", NodeRole::Sentinel);
        sentinel.watched_masters.push(Edge::Unresolved {
            target: "10.0.0.9:6379".to_string(),
        });
        topology.register(sentinel);

        let views = node_views(&topology);
        assert_eq!(views[0].watched_masters[0].target, "10.0.0.9:6379");
        assert!(!views[0].watched_masters[0].resolved);
    }

    #[test]
    fn test_empty_registry_rejects_format() {
        let registry = RendererRegistry::empty();
        let mut buf = Vec::new();
        let err = registry
            .render(OutputFormat::Graphviz, &sample(), &mut buf)
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownOutput(_)));
    }
}
