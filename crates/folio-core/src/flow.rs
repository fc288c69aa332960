//! Static node/edge templates behind the generated diagrams.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Teal,
    Teal2,
    Good,
    Warn,
    Bad,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Teal => "teal",
            Tone::Teal2 => "teal2",
            Tone::Good => "good",
            Tone::Warn => "warn",
            Tone::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    /// May contain `\n` line breaks.
    pub label: String,
    pub tone: Tone,
    pub desc: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl FlowNode {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.label.split('\n')
    }

    /// Label with line breaks collapsed to single spaces.
    pub fn flat_label(&self) -> String {
        self.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub direction: Direction,
    pub id: String,
    pub label: String,
}

impl Neighbor {
    pub fn describe(&self) -> String {
        match self.direction {
            Direction::Outgoing => format!("→ {}", self.label),
            Direction::Incoming => format!("← {}", self.label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub id: String,
    pub title: String,
    pub hint: String,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowSpec {
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Flattened label, or the raw id for nodes the flow does not define.
    pub fn label_for(&self, id: &str) -> String {
        self.node(id)
            .map(FlowNode::flat_label)
            .unwrap_or_else(|| id.to_string())
    }

    /// Outgoing neighbors first, then incoming, each in edge order.
    pub fn neighbors(&self, id: &str) -> Vec<Neighbor> {
        let outgoing = self.edges.iter().filter(|e| e.from == id).map(|e| Neighbor {
            direction: Direction::Outgoing,
            id: e.to.clone(),
            label: self.label_for(&e.to),
        });
        let incoming = self.edges.iter().filter(|e| e.to == id).map(|e| Neighbor {
            direction: Direction::Incoming,
            id: e.from.clone(),
            label: self.label_for(&e.from),
        });
        outgoing.chain(incoming).collect()
    }
}
