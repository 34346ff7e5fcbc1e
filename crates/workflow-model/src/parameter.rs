//! Top-level pipeline parameters

use crate::graph::NodeKey;

/// A pipeline-level input
///
/// Other nodes name it as a supplier with the reference `#<id>`.
#[derive(Debug, Clone)]
pub struct InputParameter {
    pub(crate) key: NodeKey,
    pub(crate) id: String,
    pub(crate) ty: serde_json::Value,
}

impl InputParameter {
    pub(crate) fn new(key: NodeKey, id: impl Into<String>, ty: serde_json::Value) -> Self {
        Self {
            key,
            id: id.into(),
            ty,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &serde_json::Value {
        &self.ty
    }
}

/// A pipeline-level output
#[derive(Debug, Clone)]
pub struct OutputParameter {
    pub(crate) key: NodeKey,
    pub(crate) id: String,
    pub(crate) ty: serde_json::Value,
    pub(crate) source: Vec<NodeKey>,
}

impl OutputParameter {
    pub(crate) fn new(key: NodeKey, id: impl Into<String>, ty: serde_json::Value) -> Self {
        Self {
            key,
            id: id.into(),
            ty,
            source: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &serde_json::Value {
        &self.ty
    }

    /// Keys of the nodes supplying this output, in connection order
    pub fn source(&self) -> &[NodeKey] {
        &self.source
    }
}
