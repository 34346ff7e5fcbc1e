//! Serializable document form of a workflow model
//!
//! The document carries materialized reference strings (`#id`,
//! `#step.port`) in its `source` lists. [`WorkflowModel::from_document`]
//! is the load path: it resolves every reference back to a node and adds
//! one connection per reference, so the loaded model is consistent before
//! the first edit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{Result, WorkflowModelError};
use crate::graph::NodeKey;
use crate::node::Node;
use crate::parameter::{InputParameter, OutputParameter};
use crate::port::{PortDirection, PortStatus};
use crate::reference::Reference;
use crate::step::{Process, ProcessParameter, Step};
use crate::validation;
use crate::workflow::WorkflowModel;

/// A complete pipeline document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub inputs: Vec<InputDocument>,
    #[serde(default)]
    pub outputs: Vec<OutputDocument>,
    #[serde(default)]
    pub steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    pub id: String,
    #[serde(rename = "type", default)]
    pub ty: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub id: String,
    #[serde(rename = "type", default)]
    pub ty: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDocument {
    pub id: String,
    #[serde(default)]
    pub run: Process,
    #[serde(rename = "in", default)]
    pub inputs: Vec<PortDocument>,
    #[serde(rename = "out", default)]
    pub outputs: Vec<PortDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDocument {
    pub id: String,
    #[serde(rename = "type", default)]
    pub ty: serde_json::Value,
    #[serde(default)]
    pub status: PortStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
}

impl PortDocument {
    /// An editable port with no sources
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ty: serde_json::Value::Null,
            status: PortStatus::Editable,
            source: Vec::new(),
        }
    }
}

impl WorkflowModel {
    /// Load a model from a document
    pub fn from_document(document: WorkflowDocument) -> Result<Self> {
        Self::from_document_with_config(document, ModelConfig::default())
    }

    /// Load a model from a document with explicit configuration
    pub fn from_document_with_config(
        document: WorkflowDocument,
        config: ModelConfig,
    ) -> Result<Self> {
        let mut model = WorkflowModel::with_config(config);
        model.id = document.id;
        model.label = document.label;

        for input in document.inputs {
            model.check_loaded_id(&input.id)?;
            let (id, ty) = (input.id, input.ty);
            model
                .graph
                .add_node_with(|key| Node::Input(InputParameter::new(key, id, ty)));
        }

        // Sources are resolved once every supplier exists.
        let mut pending: Vec<(NodeKey, Vec<String>)> = Vec::new();

        for step in document.steps {
            model.check_loaded_id(&step.id)?;
            let (id, run) = (step.id, step.run);
            let key = model
                .graph
                .add_node_with(|key| Node::Step(Step::new(key, id, run)));

            let inputs = model.load_ports(key, PortDirection::Input, step.inputs, &mut pending)?;
            let outputs = model.load_ports(key, PortDirection::Output, step.outputs, &mut pending)?;
            if let Some(Node::Step(s)) = model.graph.node_mut(key) {
                s.inputs = inputs;
                s.outputs = outputs;
            }
        }

        for output in document.outputs {
            model.check_loaded_id(&output.id)?;
            let (id, ty) = (output.id, output.ty);
            let key = model
                .graph
                .add_node_with(|key| Node::Output(OutputParameter::new(key, id, ty)));
            pending.push((key, output.source));
        }

        for (destination, references) in pending {
            for reference in references {
                let source = model.resolve_reference(&reference)?;
                model.link(source, destination)?;
            }
        }

        for error in model.validate() {
            log::warn!("Loaded workflow '{}': {}", model.id, error);
        }
        log::debug!(
            "Loaded workflow '{}' ({} nodes, {} connections)",
            model.id,
            model.graph.node_count(),
            model.graph.edge_count()
        );
        Ok(model)
    }

    /// Load a model from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let document: WorkflowDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Snapshot the current state as a document
    pub fn to_document(&self) -> WorkflowDocument {
        let port_document = |key: &NodeKey| {
            self.port(*key).map(|port| PortDocument {
                id: port.id().to_string(),
                ty: port.ty().clone(),
                status: port.status(),
                source: self.source_refs(*key),
            })
        };

        WorkflowDocument {
            id: self.id.clone(),
            label: self.label.clone(),
            inputs: self
                .inputs()
                .into_iter()
                .map(|input| InputDocument {
                    id: input.id().to_string(),
                    ty: input.ty().clone(),
                })
                .collect(),
            outputs: self
                .outputs()
                .into_iter()
                .map(|output| OutputDocument {
                    id: output.id().to_string(),
                    ty: output.ty().clone(),
                    source: self.source_refs(output.key()),
                })
                .collect(),
            steps: self
                .steps()
                .into_iter()
                .map(|step| StepDocument {
                    id: step.id().to_string(),
                    run: step.run().clone(),
                    inputs: step.inputs().iter().filter_map(port_document).collect(),
                    outputs: step.outputs().iter().filter_map(port_document).collect(),
                })
                .collect(),
        }
    }

    /// Serialize the current state as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    fn check_loaded_id(&self, id: &str) -> Result<()> {
        validation::validate_identifier(id, |id| self.id_taken(id, None))
            .map_err(|reason| WorkflowModelError::identifier(id, reason))
    }

    fn load_ports(
        &mut self,
        step: NodeKey,
        direction: PortDirection,
        ports: Vec<PortDocument>,
        pending: &mut Vec<(NodeKey, Vec<String>)>,
    ) -> Result<Vec<NodeKey>> {
        {
            let mut seen: HashSet<&str> = HashSet::new();
            for port in &ports {
                validation::validate_identifier(&port.id, |id| seen.contains(id))
                    .map_err(|reason| WorkflowModelError::identifier(&port.id, reason))?;
                seen.insert(&port.id);
            }
        }

        let parameters: Vec<ProcessParameter> = ports
            .iter()
            .map(|port| ProcessParameter::new(port.id.clone(), port.ty.clone()))
            .collect();
        let keys = self.add_ports(step, direction, parameters);

        for (key, port) in keys.iter().zip(ports) {
            if let Some(Node::Port(p)) = self.graph.node_mut(*key) {
                p.status = port.status;
            }
            match direction {
                PortDirection::Input => pending.push((*key, port.source)),
                PortDirection::Output if !port.source.is_empty() => {
                    log::warn!("Ignoring source on output port '{}'", port.id);
                }
                PortDirection::Output => {}
            }
        }
        Ok(keys)
    }

    fn resolve_reference(&self, value: &str) -> Result<NodeKey> {
        let unresolved = || WorkflowModelError::UnresolvedReference(value.to_string());
        match Reference::parse(value)? {
            Reference::Parameter(id) => self.input_by_id(&id).map(|i| i.key()).ok_or_else(unresolved),
            Reference::StepPort { step, port } => {
                let step = self.step_by_id(&step).ok_or_else(unresolved)?.key();
                self.step_port(step, PortDirection::Output, &port)
                    .map(|p| p.key())
                    .ok_or_else(unresolved)
            }
        }
    }
}
