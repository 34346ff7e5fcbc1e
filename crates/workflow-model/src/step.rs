//! Steps and the process definitions they wrap

use serde::{Deserialize, Serialize};

use crate::graph::NodeKey;

/// A declared input or output of a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessParameter {
    pub id: String,
    /// Parameter type, opaque to the engine
    #[serde(rename = "type", default)]
    pub ty: serde_json::Value,
}

impl ProcessParameter {
    pub fn new(id: impl Into<String>, ty: serde_json::Value) -> Self {
        Self { id: id.into(), ty }
    }
}

/// Definition of a tool or nested pipeline that a step runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub inputs: Vec<ProcessParameter>,
    #[serde(default)]
    pub outputs: Vec<ProcessParameter>,
}

impl Process {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Declare an input parameter
    pub fn with_input(mut self, id: impl Into<String>, ty: serde_json::Value) -> Self {
        self.inputs.push(ProcessParameter::new(id, ty));
        self
    }

    /// Declare an output parameter
    pub fn with_output(mut self, id: impl Into<String>, ty: serde_json::Value) -> Self {
        self.outputs.push(ProcessParameter::new(id, ty));
        self
    }
}

/// A processing node in the pipeline
///
/// A step owns its ports: they are created and destroyed with it.
#[derive(Debug, Clone)]
pub struct Step {
    pub(crate) key: NodeKey,
    pub(crate) id: String,
    pub(crate) run: Process,
    pub(crate) inputs: Vec<NodeKey>,
    pub(crate) outputs: Vec<NodeKey>,
}

impl Step {
    pub(crate) fn new(key: NodeKey, id: impl Into<String>, run: Process) -> Self {
        Self {
            key,
            id: id.into(),
            run,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The wrapped process definition
    pub fn run(&self) -> &Process {
        &self.run
    }

    /// Input port keys in declaration order
    pub fn inputs(&self) -> &[NodeKey] {
        &self.inputs
    }

    /// Output port keys in declaration order
    pub fn outputs(&self) -> &[NodeKey] {
        &self.outputs
    }

    /// All port keys, inputs first
    pub fn ports(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }
}
