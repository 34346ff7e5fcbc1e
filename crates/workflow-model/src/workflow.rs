//! Workflow model
//!
//! The top-level aggregate. It owns one [`Graph`] holding every step, port
//! and top-level parameter, and implements every editing operation so that
//! after each call:
//!
//! - every connection id is unique
//! - every connection joins nodes that are present
//! - every `source` entry names a node that is present, with one matching
//!   connection per entry
//! - every port's visibility matches its status
//!
//! `steps`, `inputs`, `outputs`, `nodes` and `connections` are all read from
//! the same graph, so they cannot drift apart.
//!
//! Operations validate their arguments before the first mutation; a failed
//! call leaves the model untouched.

use crate::config::ModelConfig;
use crate::error::{Result, WorkflowModelError};
use crate::graph::{Edge, Graph, NodeKey};
use crate::node::{Node, NodeKind, NodeRef};
use crate::parameter::{InputParameter, OutputParameter};
use crate::port::{Port, PortDirection, PortStatus, PortTransition};
use crate::reference;
use crate::step::{Process, ProcessParameter, Step};
use crate::validation::{self, ValidationError};

/// A connection between two nodes, named by connection ids
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: String,
    pub destination: String,
}

/// In-memory pipeline definition
#[derive(Debug, Clone)]
pub struct WorkflowModel {
    pub(crate) id: String,
    pub(crate) label: Option<String>,
    pub(crate) config: ModelConfig,
    pub(crate) graph: Graph<Node>,
}

impl Default for WorkflowModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowModel {
    /// Create an empty model with default configuration
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Create an empty model
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            id: String::new(),
            label: None,
            config,
            graph: Graph::new(),
        }
    }

    /// Pipeline id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the pipeline id
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Human-readable pipeline label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set or clear the pipeline label
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Configuration the model was created with
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Steps in insertion order
    pub fn steps(&self) -> Vec<&Step> {
        self.graph.nodes().filter_map(|(_, n)| n.as_step()).collect()
    }

    /// Top-level inputs in insertion order
    pub fn inputs(&self) -> Vec<&InputParameter> {
        self.graph.nodes().filter_map(|(_, n)| n.as_input()).collect()
    }

    /// Top-level outputs in insertion order
    pub fn outputs(&self) -> Vec<&OutputParameter> {
        self.graph.nodes().filter_map(|(_, n)| n.as_output()).collect()
    }

    /// Every node: steps, their ports and top-level parameters
    pub fn nodes(&self) -> Vec<&Node> {
        self.graph.nodes().map(|(_, n)| n).collect()
    }

    /// Every connection, endpoints named by connection id
    pub fn connections(&self) -> Vec<Connection> {
        self.graph
            .edges()
            .iter()
            .filter_map(|edge| {
                Some(Connection {
                    source: self.connection_id(edge.source)?,
                    destination: self.connection_id(edge.destination)?,
                })
            })
            .collect()
    }

    /// Raw graph edges
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    /// Any node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.graph.node(key)
    }

    /// A step by key
    pub fn step(&self, key: NodeKey) -> Option<&Step> {
        self.graph.node(key).and_then(Node::as_step)
    }

    /// A step port by key
    pub fn port(&self, key: NodeKey) -> Option<&Port> {
        self.graph.node(key).and_then(Node::as_port)
    }

    /// A top-level input by key
    pub fn input(&self, key: NodeKey) -> Option<&InputParameter> {
        self.graph.node(key).and_then(Node::as_input)
    }

    /// A top-level output by key
    pub fn output(&self, key: NodeKey) -> Option<&OutputParameter> {
        self.graph.node(key).and_then(Node::as_output)
    }

    /// A step by id
    pub fn step_by_id(&self, id: &str) -> Option<&Step> {
        self.steps().into_iter().find(|s| s.id == id)
    }

    /// A top-level input by id
    pub fn input_by_id(&self, id: &str) -> Option<&InputParameter> {
        self.inputs().into_iter().find(|i| i.id == id)
    }

    /// A top-level output by id
    pub fn output_by_id(&self, id: &str) -> Option<&OutputParameter> {
        self.outputs().into_iter().find(|o| o.id == id)
    }

    /// Find a port of `step` by direction and id
    pub fn step_port(&self, step: NodeKey, direction: PortDirection, id: &str) -> Option<&Port> {
        let step = self.step(step)?;
        let keys = match direction {
            PortDirection::Input => &step.inputs,
            PortDirection::Output => &step.outputs,
        };
        keys.iter().filter_map(|k| self.port(*k)).find(|p| p.id == id)
    }

    /// Find a node by its connection id
    pub fn node_by_connection_id(&self, connection_id: &str) -> Option<&Node> {
        self.graph
            .nodes()
            .find(|(key, _)| self.connection_id(*key).as_deref() == Some(connection_id))
            .map(|(_, node)| node)
    }

    /// Resolve a key or connection id to the key of a present node
    pub fn resolve<'a>(&self, target: impl Into<NodeRef<'a>>) -> Option<NodeKey> {
        match target.into() {
            NodeRef::Key(key) => self.graph.contains(key).then_some(key),
            NodeRef::ConnectionId(id) => self.node_by_connection_id(id).map(Node::key),
        }
    }

    /// Graph-unique identity of a node
    pub fn connection_id(&self, key: NodeKey) -> Option<String> {
        match self.graph.node(key)? {
            Node::Step(step) => Some(step.id.clone()),
            Node::Port(port) => {
                let step = self.step(port.step)?;
                Some(match port.direction {
                    PortDirection::Input => reference::input_port_connection_id(&step.id, &port.id),
                    PortDirection::Output => {
                        reference::output_port_connection_id(&step.id, &port.id)
                    }
                })
            }
            Node::Input(input) => Some(reference::input_parameter_connection_id(&input.id)),
            Node::Output(output) => Some(reference::output_parameter_connection_id(&output.id)),
        }
    }

    /// Reference string other nodes use to name `key` as a supplier
    ///
    /// Defined for output ports (`#step.port`) and input parameters (`#id`).
    pub fn source_id(&self, key: NodeKey) -> Option<String> {
        match self.graph.node(key)? {
            Node::Port(port) if port.direction == PortDirection::Output => {
                let step = self.step(port.step)?;
                Some(reference::port_reference(&step.id, &port.id))
            }
            Node::Input(input) => Some(reference::parameter_reference(&input.id)),
            _ => None,
        }
    }

    /// Materialized `source` of an input port or output parameter
    pub fn source_refs(&self, key: NodeKey) -> Vec<String> {
        self.graph
            .node(key)
            .and_then(Node::source)
            .map(|source| source.iter().filter_map(|k| self.source_id(*k)).collect())
            .unwrap_or_default()
    }

    /// Integrity check of the whole model
    pub fn validate(&self) -> Vec<ValidationError> {
        validation::validate_model(self)
    }

    // ---------------------------------------------------------------------
    // Port status
    // ---------------------------------------------------------------------

    /// Make `port` a visible, directly connectable graph node
    ///
    /// An exposed port first loses its backing parameter and the connection
    /// binding it. Other parameters wired to the port are kept.
    pub fn include_port(&mut self, port: NodeKey) -> Result<()> {
        let status = self.require_port(port)?.status;
        if status == PortStatus::Exposed {
            self.release_backing_parameter(port);
        }
        self.transition(port, PortTransition::Include);
        log::debug!("Included port {}", self.describe(port));
        Ok(())
    }

    /// Promote `port` to a top-level parameter of the same id
    ///
    /// Returns the key of the backing parameter. A parameter already backing
    /// the port is replaced; parameters created separately stay wired.
    /// Already exposed ports are left as they are.
    pub fn expose_port(&mut self, port: NodeKey) -> Result<NodeKey> {
        let (status, direction, id, ty) = {
            let p = self.require_port(port)?;
            (p.status, p.direction, p.id.clone(), p.ty.clone())
        };

        if status == PortStatus::Exposed {
            if let Some(parameter) = self.bound_parameter(port) {
                log::trace!("Port {} is already exposed", self.describe(port));
                return Ok(parameter);
            }
        }

        self.release_backing_parameter(port);

        let parameter = match direction {
            PortDirection::Input => {
                let id = self.unique_id(&id);
                let parameter = self
                    .graph
                    .add_node_with(|key| Node::Input(InputParameter::new(key, id, ty)));
                self.link(parameter, port)?;
                parameter
            }
            PortDirection::Output => {
                let id = self.unique_id(&id);
                let parameter = self
                    .graph
                    .add_node_with(|key| Node::Output(OutputParameter::new(key, id, ty)));
                self.link(port, parameter)?;
                parameter
            }
        };

        self.transition(port, PortTransition::Expose);
        log::debug!(
            "Exposed port {} as {}",
            self.describe(port),
            self.describe(parameter)
        );
        Ok(parameter)
    }

    /// Return `port` to inline editing, dropping all of its connections
    ///
    /// Parameters left without any connection are removed. Clearing an
    /// editable port with no connections changes nothing.
    pub fn clear_port(&mut self, port: NodeKey) -> Result<()> {
        self.require_port(port)?;

        let touching = self.graph.edges_touching(port);
        self.unlink_all(port, &touching);
        self.transition(port, PortTransition::Clear);
        log::debug!(
            "Cleared port {} ({} connections removed)",
            self.describe(port),
            touching.len()
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Steps
    // ---------------------------------------------------------------------

    /// Add a step running `process`, with one editable port per declared
    /// parameter and no connections
    pub fn add_step_from_process(&mut self, process: Process) -> NodeKey {
        let base = self.sanitize_id(&process.id);
        let id = self.unique_id(&base);
        let inputs = process.inputs.clone();
        let outputs = process.outputs.clone();

        let step = self
            .graph
            .add_node_with(|key| Node::Step(Step::new(key, id, process)));

        let input_keys = self.add_ports(step, PortDirection::Input, inputs);
        let output_keys = self.add_ports(step, PortDirection::Output, outputs);
        if let Some(Node::Step(s)) = self.graph.node_mut(step) {
            s.inputs = input_keys;
            s.outputs = output_keys;
        }

        log::debug!("Added step {}", self.describe(step));
        step
    }

    pub(crate) fn add_ports(
        &mut self,
        step: NodeKey,
        direction: PortDirection,
        parameters: Vec<ProcessParameter>,
    ) -> Vec<NodeKey> {
        let mut keys: Vec<NodeKey> = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let duplicate = keys
                .iter()
                .filter_map(|k| self.port(*k))
                .any(|p| p.id == parameter.id);
            if duplicate {
                log::warn!(
                    "Skipping duplicate {:?} port '{}' on step {}",
                    direction,
                    parameter.id,
                    step
                );
                continue;
            }
            keys.push(self.graph.add_node_with(|key| {
                Node::Port(Port::new(key, step, parameter.id, direction, parameter.ty))
            }));
        }
        keys
    }

    /// Remove a step and its ports
    ///
    /// References to the step's output ports are scrubbed from every other
    /// port and output parameter; those nodes are kept.
    pub fn remove_step<'a>(&mut self, target: impl Into<NodeRef<'a>>) -> Result<Step> {
        let target = target.into();
        let key = self
            .resolve_kind(target, NodeKind::Step)
            .ok_or_else(|| WorkflowModelError::NotFound(describe_ref(target)))?;

        let ports: Vec<NodeKey> = self.step(key).map(|s| s.ports().collect()).unwrap_or_default();
        let mut removed = Vec::with_capacity(ports.len() + 1);
        let mut connections = 0;
        for port in ports {
            if let Some((_, edges)) = self.graph.remove_node(port) {
                connections += edges.len();
                removed.push(port);
            }
        }

        let step = match self.graph.remove_node(key) {
            Some((Node::Step(step), edges)) => {
                connections += edges.len();
                step
            }
            _ => return Err(WorkflowModelError::NotFound(describe_ref(target))),
        };
        removed.push(key);
        self.scrub(&removed);

        log::debug!(
            "Removed step '{}' ({} nodes, {} connections)",
            step.id,
            removed.len(),
            connections
        );
        Ok(step)
    }

    /// Rename a step; references to its ports follow the new id
    pub fn change_step_id<'a>(&mut self, target: impl Into<NodeRef<'a>>, new_id: &str) -> Result<()> {
        let target = target.into();
        let key = self
            .resolve_kind(target, NodeKind::Step)
            .ok_or_else(|| WorkflowModelError::NotFound(describe_ref(target)))?;
        self.rename(key, new_id)
    }

    // ---------------------------------------------------------------------
    // Top-level parameters
    // ---------------------------------------------------------------------

    /// Create a top-level input bound to an input port
    pub fn create_input_from_port(&mut self, port: NodeKey) -> Result<NodeKey> {
        let (id, ty) = self.parameter_seed(port, PortDirection::Input, "input Port")?;
        let id = self.unique_id(&id);
        let input = self
            .graph
            .add_node_with(|key| Node::Input(InputParameter::new(key, id, ty)));
        self.link(input, port)?;
        log::debug!("Created input {} for port {}", self.describe(input), self.describe(port));
        Ok(input)
    }

    /// Create a top-level output bound to an output port
    pub fn create_output_from_port(&mut self, port: NodeKey) -> Result<NodeKey> {
        let (id, ty) = self.parameter_seed(port, PortDirection::Output, "output Port")?;
        let id = self.unique_id(&id);
        let output = self
            .graph
            .add_node_with(|key| Node::Output(OutputParameter::new(key, id, ty)));
        self.link(port, output)?;
        log::debug!("Created output {} for port {}", self.describe(output), self.describe(port));
        Ok(output)
    }

    /// Remove a top-level input, scrubbing references to it
    pub fn remove_input<'a>(&mut self, target: impl Into<NodeRef<'a>>) -> Result<InputParameter> {
        let target = target.into();
        let key = self
            .resolve_kind(target, NodeKind::InputParameter)
            .ok_or_else(|| WorkflowModelError::NotFound(describe_ref(target)))?;
        match self.remove_parameter(key) {
            Some(Node::Input(input)) => Ok(input),
            _ => Err(WorkflowModelError::NotFound(describe_ref(target))),
        }
    }

    /// Remove a top-level output
    pub fn remove_output<'a>(&mut self, target: impl Into<NodeRef<'a>>) -> Result<OutputParameter> {
        let target = target.into();
        let key = self
            .resolve_kind(target, NodeKind::OutputParameter)
            .ok_or_else(|| WorkflowModelError::NotFound(describe_ref(target)))?;
        match self.remove_parameter(key) {
            Some(Node::Output(output)) => Ok(output),
            _ => Err(WorkflowModelError::NotFound(describe_ref(target))),
        }
    }

    /// Rename a top-level input or output
    pub fn change_io_node_id<'a>(
        &mut self,
        target: impl Into<NodeRef<'a>>,
        new_id: &str,
    ) -> Result<()> {
        let target = target.into();
        let key = self
            .resolve_kind(target, NodeKind::InputParameter)
            .or_else(|| self.resolve_kind(target, NodeKind::OutputParameter))
            .ok_or_else(|| WorkflowModelError::NotFound(describe_ref(target)))?;
        self.rename(key, new_id)
    }

    // ---------------------------------------------------------------------
    // Connections
    // ---------------------------------------------------------------------

    /// Connect a supplier to a consumer
    ///
    /// `source` must be an output port or input parameter present in the
    /// graph, `destination` an input port or output parameter. Connection
    /// ids are not accepted; resolve them first. Repeated calls add
    /// repeated connections.
    pub fn connect<'a, 'b>(
        &mut self,
        source: impl Into<NodeRef<'a>>,
        destination: impl Into<NodeRef<'b>>,
    ) -> Result<()> {
        let source = match source.into() {
            NodeRef::Key(key) if self.is_supplier(key) => key,
            _ => {
                return Err(WorkflowModelError::invalid_argument(
                    "source",
                    "Port or InputParameter",
                ))
            }
        };
        let destination = match destination.into() {
            NodeRef::Key(key) if self.is_consumer(key) => key,
            _ => {
                return Err(WorkflowModelError::invalid_argument(
                    "destination",
                    "Port or OutputParameter",
                ))
            }
        };

        self.link(source, destination)?;
        log::debug!(
            "Connected {} -> {}",
            self.describe(source),
            self.describe(destination)
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn require_port(&self, key: NodeKey) -> Result<&Port> {
        self.port(key)
            .ok_or_else(|| WorkflowModelError::invalid_argument("port", "Port"))
    }

    fn transition(&mut self, key: NodeKey, transition: PortTransition) {
        if let Some(Node::Port(port)) = self.graph.node_mut(key) {
            port.transition(transition);
        }
    }

    fn resolve_kind(&self, target: NodeRef<'_>, kind: NodeKind) -> Option<NodeKey> {
        self.resolve(target)
            .filter(|key| self.graph.node(*key).map(Node::kind) == Some(kind))
    }

    fn is_parameter(&self, key: NodeKey) -> bool {
        matches!(self.graph.node(key), Some(Node::Input(_) | Node::Output(_)))
    }

    fn is_supplier(&self, key: NodeKey) -> bool {
        match self.graph.node(key) {
            Some(Node::Port(port)) => port.direction == PortDirection::Output,
            Some(Node::Input(_)) => true,
            _ => false,
        }
    }

    fn is_consumer(&self, key: NodeKey) -> bool {
        match self.graph.node(key) {
            Some(Node::Port(port)) => port.direction == PortDirection::Input,
            Some(Node::Output(_)) => true,
            _ => false,
        }
    }

    /// Id and type for a parameter created from `port`
    fn parameter_seed(
        &self,
        port: NodeKey,
        direction: PortDirection,
        expected: &'static str,
    ) -> Result<(String, serde_json::Value)> {
        let p = self
            .port(port)
            .filter(|p| p.direction == direction)
            .ok_or_else(|| WorkflowModelError::invalid_argument("port", expected))?;
        let step = self
            .step(p.step)
            .ok_or_else(|| WorkflowModelError::NotFound(p.step.to_string()))?;
        let sep = self.config.id_suffix_separator;
        Ok((format!("{}{}{}", step.id, sep, p.id), p.ty.clone()))
    }

    /// Add a connection and record the supplier on the consumer
    pub(crate) fn link(&mut self, source: NodeKey, destination: NodeKey) -> Result<()> {
        self.graph.add_edge(source, destination)?;
        if let Some(list) = self.graph.node_mut(destination).and_then(Node::source_mut) {
            list.push(source);
        }
        Ok(())
    }

    /// Remove one connection and one matching supplier entry
    fn unlink(&mut self, edge: Edge) {
        if !self.graph.remove_edge(edge) {
            return;
        }
        if let Some(list) = self.graph.node_mut(edge.destination).and_then(Node::source_mut) {
            if let Some(pos) = list.iter().position(|k| *k == edge.source) {
                list.remove(pos);
            }
        }
    }

    /// Unlink `edges` around `port`, then drop parameters they orphaned
    fn unlink_all(&mut self, port: NodeKey, edges: &[Edge]) {
        for edge in edges {
            self.unlink(*edge);
        }
        for edge in edges {
            if let Some(other) = edge.other(port) {
                self.remove_if_orphan(other);
            }
        }
    }

    /// Unbind the parameter backing `port`, removing it if orphaned
    fn release_backing_parameter(&mut self, port: NodeKey) {
        let Some(parameter) = self.bound_parameter(port) else {
            return;
        };
        let bound: Vec<Edge> = self
            .graph
            .edges_touching(port)
            .into_iter()
            .filter(|e| e.other(port) == Some(parameter))
            .collect();
        self.unlink_all(port, &bound);
    }

    /// The parameter backing `port`: one wired to it whose id is the port id,
    /// possibly with a numeric suffix
    fn bound_parameter(&self, port: NodeKey) -> Option<NodeKey> {
        let p = self.port(port)?;
        match p.direction {
            PortDirection::Input => self
                .graph
                .incoming(port)
                .map(|e| e.source)
                .find(|k| self.input(*k).is_some_and(|i| self.derives_from(&i.id, &p.id))),
            PortDirection::Output => self
                .graph
                .outgoing(port)
                .map(|e| e.destination)
                .find(|k| self.output(*k).is_some_and(|o| self.derives_from(&o.id, &p.id))),
        }
    }

    /// Whether `id` is `base` or `base` plus a `unique_id` suffix
    fn derives_from(&self, id: &str, base: &str) -> bool {
        match id.strip_prefix(base) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix(self.config.id_suffix_separator)
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())),
            None => false,
        }
    }

    fn remove_if_orphan(&mut self, key: NodeKey) {
        if self.is_parameter(key) && self.graph.edges_touching(key).is_empty() {
            log::trace!("Removing orphaned parameter {}", self.describe(key));
            self.remove_parameter(key);
        }
    }

    fn remove_parameter(&mut self, key: NodeKey) -> Option<Node> {
        let (node, edges) = self.graph.remove_node(key)?;
        self.scrub(&[key]);
        log::debug!(
            "Removed {} '{}' ({} connections)",
            node.kind(),
            node.id(),
            edges.len()
        );
        Some(node)
    }

    /// Remove every supplier entry naming one of `removed`
    ///
    /// Shared by every removal path.
    fn scrub(&mut self, removed: &[NodeKey]) {
        for (_, node) in self.graph.nodes_mut() {
            if let Some(list) = node.source_mut() {
                list.retain(|k| !removed.contains(k));
            }
        }
    }

    fn rename(&mut self, key: NodeKey, new_id: &str) -> Result<()> {
        validation::validate_identifier(new_id, |id| self.id_taken(id, Some(key)))
            .map_err(|reason| WorkflowModelError::identifier(new_id, reason))?;

        let node = self
            .graph
            .node_mut(key)
            .ok_or_else(|| WorkflowModelError::NotFound(key.to_string()))?;
        let old = match node {
            Node::Step(step) => std::mem::replace(&mut step.id, new_id.to_string()),
            Node::Input(input) => std::mem::replace(&mut input.id, new_id.to_string()),
            Node::Output(output) => std::mem::replace(&mut output.id, new_id.to_string()),
            Node::Port(_) => return Err(WorkflowModelError::invalid_argument("node", "Step")),
        };
        log::debug!("Renamed '{}' to '{}'", old, new_id);
        Ok(())
    }

    /// Whether a step or parameter other than `except` uses `id`
    pub(crate) fn id_taken(&self, id: &str, except: Option<NodeKey>) -> bool {
        self.graph
            .nodes()
            .any(|(key, node)| Some(key) != except && node.has_global_id() && node.id() == id)
    }

    /// `base`, or `base_1`, `base_2`, ... whichever is free first
    pub(crate) fn unique_id(&self, base: &str) -> String {
        if !self.id_taken(base, None) {
            return base.to_string();
        }
        let sep = self.config.id_suffix_separator;
        (1..)
            .map(|n| format!("{base}{sep}{n}"))
            .find(|candidate| !self.id_taken(candidate, None))
            .unwrap_or_else(|| base.to_string())
    }

    /// Turn a process id into a usable step id
    fn sanitize_id(&self, raw: &str) -> String {
        let trimmed = raw.trim_start_matches('#');
        // Process ids are often paths or URLs; keep the last segment.
        let last = trimmed.rsplit(['/', '#']).next().unwrap_or(trimmed);
        let sanitized: String = last
            .chars()
            .map(|c| if validation::is_identifier_char(c) { c } else { '_' })
            .collect();
        if sanitized.trim_matches('_').is_empty() {
            self.config.default_step_id.clone()
        } else {
            sanitized
        }
    }

    fn describe(&self, key: NodeKey) -> String {
        self.connection_id(key).unwrap_or_else(|| key.to_string())
    }
}

fn describe_ref(target: NodeRef<'_>) -> String {
    match target {
        NodeRef::Key(key) => key.to_string(),
        NodeRef::ConnectionId(id) => id.to_string(),
    }
}
