//! Step ports and their status state machine
//!
//! A port is in exactly one of three states:
//!
//! - `editable`: value supplied inline, not a graph-visible node
//! - `port`: visible and directly connectable
//! - `exposed`: value supplied by an implicitly managed top-level parameter
//!
//! Visibility is derived from the status, so the two can never disagree.

use serde::{Deserialize, Serialize};

use crate::graph::NodeKey;

/// Whether a port consumes or produces data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

/// Port status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    #[default]
    Editable,
    Port,
    Exposed,
}

/// The three status-changing operations on a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortTransition {
    Include,
    Expose,
    Clear,
}

impl PortStatus {
    /// Status after applying `transition`
    ///
    /// Every transition is total: it is accepted from every state.
    pub fn apply(self, transition: PortTransition) -> PortStatus {
        match transition {
            PortTransition::Include => PortStatus::Port,
            PortTransition::Expose => PortStatus::Exposed,
            PortTransition::Clear => PortStatus::Editable,
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, PortStatus::Port)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortStatus::Editable => "editable",
            PortStatus::Port => "port",
            PortStatus::Exposed => "exposed",
        }
    }
}

impl std::fmt::Display for PortStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input or output slot on a step
#[derive(Debug, Clone)]
pub struct Port {
    pub(crate) key: NodeKey,
    pub(crate) step: NodeKey,
    pub(crate) id: String,
    pub(crate) direction: PortDirection,
    pub(crate) status: PortStatus,
    /// Parameter type, opaque to the engine
    pub(crate) ty: serde_json::Value,
    /// Suppliers of an input port; always empty for output ports
    pub(crate) source: Vec<NodeKey>,
}

impl Port {
    pub(crate) fn new(
        key: NodeKey,
        step: NodeKey,
        id: impl Into<String>,
        direction: PortDirection,
        ty: serde_json::Value,
    ) -> Self {
        Self {
            key,
            step,
            id: id.into(),
            direction,
            status: PortStatus::Editable,
            ty,
            source: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Key of the owning step
    pub fn step(&self) -> NodeKey {
        self.step
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn status(&self) -> PortStatus {
        self.status
    }

    pub fn is_visible(&self) -> bool {
        self.status.is_visible()
    }

    pub fn ty(&self) -> &serde_json::Value {
        &self.ty
    }

    /// Keys of the nodes supplying this port, in connection order
    pub fn source(&self) -> &[NodeKey] {
        &self.source
    }

    pub(crate) fn transition(&mut self, transition: PortTransition) {
        self.status = self.status.apply(transition);
        if transition == PortTransition::Clear {
            self.source.clear();
        }
    }
}
