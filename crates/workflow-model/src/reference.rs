//! Canonical reference strings and connection ids
//!
//! References are the textual identities used in `source` fields:
//!
//! - `#<id>` names a top-level input parameter
//! - `#<stepId>.<portId>` names a step output port
//!
//! Connection ids are the graph-unique identities of every node kind.

use std::fmt;

use crate::error::{Result, WorkflowModelError};

const REFERENCE_PREFIX: char = '#';
const PORT_SEPARATOR: char = '.';

/// A parsed reference string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `#id`
    Parameter(String),
    /// `#step.port`
    StepPort { step: String, port: String },
}

impl Reference {
    /// Parse a reference string.
    ///
    /// The leading `#` is optional, as some documents omit it. The first `.`
    /// separates the step id from the port id.
    pub fn parse(value: &str) -> Result<Self> {
        let body = value.strip_prefix(REFERENCE_PREFIX).unwrap_or(value);
        if body.is_empty() {
            return Err(WorkflowModelError::UnresolvedReference(value.to_string()));
        }

        match body.split_once(PORT_SEPARATOR) {
            Some((step, port)) if !step.is_empty() && !port.is_empty() => Ok(Self::StepPort {
                step: step.to_string(),
                port: port.to_string(),
            }),
            Some(_) => Err(WorkflowModelError::UnresolvedReference(value.to_string())),
            None => Ok(Self::Parameter(body.to_string())),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(id) => f.write_str(&parameter_reference(id)),
            Self::StepPort { step, port } => f.write_str(&port_reference(step, port)),
        }
    }
}

/// `#<id>`
pub fn parameter_reference(id: &str) -> String {
    format!("{REFERENCE_PREFIX}{id}")
}

/// `#<step>.<port>`
pub fn port_reference(step: &str, port: &str) -> String {
    format!("{REFERENCE_PREFIX}{step}{PORT_SEPARATOR}{port}")
}

/// Connection id of a step input port
pub fn input_port_connection_id(step: &str, port: &str) -> String {
    format!("in/{step}/{port}")
}

/// Connection id of a step output port
pub fn output_port_connection_id(step: &str, port: &str) -> String {
    format!("out/{step}/{port}")
}

/// Connection id of a top-level input parameter (it is an output of the pipeline boundary)
pub fn input_parameter_connection_id(id: &str) -> String {
    format!("out/{id}/{id}")
}

/// Connection id of a top-level output parameter
pub fn output_parameter_connection_id(id: &str) -> String {
    format!("in/{id}/{id}")
}
