//! Identifier rules and whole-model integrity checks
//!
//! [`validate_identifier`] guards renames. [`validate_model`] walks the
//! whole graph and reports every broken invariant (not just the first);
//! the editing operations never produce any, so a non-empty result points
//! at a bad document or a bug.

use std::collections::{HashMap, HashSet};

use crate::error::IdentifierError;
use crate::graph::NodeKey;
use crate::node::Node;
use crate::workflow::WorkflowModel;

/// Characters allowed in step and parameter identifiers
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Check a proposed identifier
///
/// `is_taken` reports whether another node already uses the id.
pub fn validate_identifier(
    id: &str,
    is_taken: impl Fn(&str) -> bool,
) -> std::result::Result<(), IdentifierError> {
    if id.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if !id.chars().all(is_identifier_char) {
        return Err(IdentifierError::IllegalCharacters);
    }
    if is_taken(id) {
        return Err(IdentifierError::Duplicate);
    }
    Ok(())
}

/// An integrity violation found in a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two nodes share a connection id
    DuplicateConnectionId { connection_id: String },
    /// Two steps or parameters share an id
    DuplicateIdentifier { id: String },
    /// A connection endpoint is not in the graph
    DanglingConnection { node: String },
    /// A `source` entry names a node that is not in the graph
    DanglingReference { node: String, reference: String },
    /// A `source` entry names a node that cannot supply data
    InvalidSupplier { node: String, supplier: String },
    /// `source` entries and incoming connections disagree
    SourceMismatch { node: String },
    /// A port whose step is missing or does not list it
    UnownedPort { port: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateConnectionId { connection_id } => {
                write!(f, "Connection id '{}' is used by more than one node", connection_id)
            }
            Self::DuplicateIdentifier { id } => {
                write!(f, "ID '{}' is used by more than one node", id)
            }
            Self::DanglingConnection { node } => {
                write!(f, "Connection references unknown node '{}'", node)
            }
            Self::DanglingReference { node, reference } => {
                write!(f, "Source of '{}' references unknown node '{}'", node, reference)
            }
            Self::InvalidSupplier { node, supplier } => {
                write!(f, "Source of '{}' names '{}', which cannot supply data", node, supplier)
            }
            Self::SourceMismatch { node } => {
                write!(f, "Source of '{}' does not match its incoming connections", node)
            }
            Self::UnownedPort { port } => write!(f, "Port '{}' has no owning step", port),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate every invariant of a model
pub fn validate_model(model: &WorkflowModel) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_identities(model, &mut errors);
    validate_port_ownership(model, &mut errors);
    validate_connections(model, &mut errors);
    validate_sources(model, &mut errors);

    errors
}

fn label(model: &WorkflowModel, key: NodeKey) -> String {
    model.connection_id(key).unwrap_or_else(|| key.to_string())
}

/// Connection ids and global ids are unique
fn validate_identities(model: &WorkflowModel, errors: &mut Vec<ValidationError>) {
    let mut connection_ids = HashSet::new();
    let mut ids = HashSet::new();

    for (key, node) in model.graph.nodes() {
        if let Some(connection_id) = model.connection_id(key) {
            if !connection_ids.insert(connection_id.clone()) {
                errors.push(ValidationError::DuplicateConnectionId { connection_id });
            }
        }
        if node.has_global_id() && !ids.insert(node.id()) {
            errors.push(ValidationError::DuplicateIdentifier {
                id: node.id().to_string(),
            });
        }
    }
}

/// Every port belongs to a present step that lists it
fn validate_port_ownership(model: &WorkflowModel, errors: &mut Vec<ValidationError>) {
    for (key, node) in model.graph.nodes() {
        if let Node::Port(port) = node {
            let owned = model
                .step(port.step())
                .is_some_and(|step| step.ports().any(|k| k == key));
            if !owned {
                errors.push(ValidationError::UnownedPort {
                    port: label(model, key),
                });
            }
        }
    }
}

/// Every connection joins present nodes
fn validate_connections(model: &WorkflowModel, errors: &mut Vec<ValidationError>) {
    for edge in model.graph.edges() {
        for key in [edge.source, edge.destination] {
            if !model.graph.contains(key) {
                errors.push(ValidationError::DanglingConnection {
                    node: key.to_string(),
                });
            }
        }
    }
}

/// Every `source` entry names a present supplier and has one matching connection
fn validate_sources(model: &WorkflowModel, errors: &mut Vec<ValidationError>) {
    let mut incoming: HashMap<NodeKey, HashMap<NodeKey, usize>> = HashMap::new();
    for edge in model.graph.edges() {
        *incoming
            .entry(edge.destination)
            .or_default()
            .entry(edge.source)
            .or_insert(0) += 1;
    }

    for (key, node) in model.graph.nodes() {
        let Some(source) = node.source() else {
            continue;
        };

        let mut listed: HashMap<NodeKey, usize> = HashMap::new();
        for supplier in source {
            *listed.entry(*supplier).or_insert(0) += 1;
            if !model.graph.contains(*supplier) {
                errors.push(ValidationError::DanglingReference {
                    node: label(model, key),
                    reference: supplier.to_string(),
                });
            } else if model.source_id(*supplier).is_none() {
                errors.push(ValidationError::InvalidSupplier {
                    node: label(model, key),
                    supplier: label(model, *supplier),
                });
            }
        }

        let connected = incoming.remove(&key).unwrap_or_default();
        if listed != connected {
            errors.push(ValidationError::SourceMismatch {
                node: label(model, key),
            });
        }
    }

    // Connections into nodes that keep no source list
    for destination in incoming.keys() {
        if model.graph.contains(*destination) {
            errors.push(ValidationError::SourceMismatch {
                node: label(model, *destination),
            });
        }
    }
}
