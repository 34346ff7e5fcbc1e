//! Node variants stored in the workflow graph

use crate::graph::NodeKey;
use crate::parameter::{InputParameter, OutputParameter};
use crate::port::Port;
use crate::step::Step;

/// Kind of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Step,
    Port,
    InputParameter,
    OutputParameter,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Step => "Step",
            Self::Port => "Port",
            Self::InputParameter => "InputParameter",
            Self::OutputParameter => "OutputParameter",
        };
        f.write_str(name)
    }
}

/// A node of the workflow graph
#[derive(Debug, Clone)]
pub enum Node {
    Step(Step),
    Port(Port),
    Input(InputParameter),
    Output(OutputParameter),
}

impl Node {
    pub fn key(&self) -> NodeKey {
        match self {
            Self::Step(step) => step.key,
            Self::Port(port) => port.key,
            Self::Input(input) => input.key,
            Self::Output(output) => output.key,
        }
    }

    /// Display identifier (port ids are only unique within their step)
    pub fn id(&self) -> &str {
        match self {
            Self::Step(step) => &step.id,
            Self::Port(port) => &port.id,
            Self::Input(input) => &input.id,
            Self::Output(output) => &output.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Step(_) => NodeKind::Step,
            Self::Port(_) => NodeKind::Port,
            Self::Input(_) => NodeKind::InputParameter,
            Self::Output(_) => NodeKind::OutputParameter,
        }
    }

    /// Whether this node's id takes part in graph-wide uniqueness
    pub(crate) fn has_global_id(&self) -> bool {
        !matches!(self, Self::Port(_))
    }

    /// The supplier list, for nodes that consume data
    pub(crate) fn source(&self) -> Option<&Vec<NodeKey>> {
        match self {
            Self::Port(port) if port.is_input() => Some(&port.source),
            Self::Output(output) => Some(&output.source),
            _ => None,
        }
    }

    pub(crate) fn source_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match self {
            Self::Port(port) if port.is_input() => Some(&mut port.source),
            Self::Output(output) => Some(&mut output.source),
            _ => None,
        }
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            Self::Step(step) => Some(step),
            _ => None,
        }
    }

    pub fn as_port(&self) -> Option<&Port> {
        match self {
            Self::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputParameter> {
        match self {
            Self::Input(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputParameter> {
        match self {
            Self::Output(output) => Some(output),
            _ => None,
        }
    }
}

/// A way of naming a node: its key, or its connection id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Key(NodeKey),
    ConnectionId(&'a str),
}

impl From<NodeKey> for NodeRef<'_> {
    fn from(key: NodeKey) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(connection_id: &'a str) -> Self {
        Self::ConnectionId(connection_id)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(connection_id: &'a String) -> Self {
        Self::ConnectionId(connection_id)
    }
}

impl From<&Step> for NodeRef<'_> {
    fn from(step: &Step) -> Self {
        Self::Key(step.key)
    }
}

impl From<&Port> for NodeRef<'_> {
    fn from(port: &Port) -> Self {
        Self::Key(port.key)
    }
}

impl From<&InputParameter> for NodeRef<'_> {
    fn from(input: &InputParameter) -> Self {
        Self::Key(input.key)
    }
}

impl From<&OutputParameter> for NodeRef<'_> {
    fn from(output: &OutputParameter) -> Self {
        Self::Key(output.key)
    }
}
