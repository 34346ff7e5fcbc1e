//! Workflow Model - consistency-preserving pipeline graph editing
//!
//! This crate holds an in-memory pipeline definition (steps, their ports,
//! and pipeline-level inputs and outputs) and the editing operations a
//! pipeline editor needs:
//!
//! - Promote, wire or inline a step parameter (`expose_port`,
//!   `include_port`, `clear_port`)
//! - Add and remove steps and top-level parameters
//! - Rename steps and parameters
//! - Connect suppliers to consumers
//!
//! Every operation leaves the graph, the `steps`/`inputs`/`outputs` views
//! and every `source` reference mutually consistent.
//!
//! # Architecture
//!
//! - `Graph`: node and edge store keyed by stable `NodeKey`s
//! - `WorkflowModel`: the aggregate implementing every operation
//! - `WorkflowDocument`: serde form with `#id` / `#step.port` references
//!
//! # Example
//!
//! ```
//! use workflow_model::{Process, WorkflowModel};
//!
//! # fn main() -> workflow_model::Result<()> {
//! let mut model = WorkflowModel::new();
//! let step = model.add_step_from_process(
//!     Process::new("bwa_mem").with_input("reads", serde_json::json!("File")),
//! );
//! let reads = model.step(step).unwrap().inputs()[0];
//! model.expose_port(reads)?;
//! assert_eq!(model.inputs()[0].id(), "reads");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod node;
pub mod parameter;
pub mod port;
pub mod reference;
pub mod step;
pub mod validation;
pub mod workflow;

// Re-export key types
pub use config::ModelConfig;
pub use document::{InputDocument, OutputDocument, PortDocument, StepDocument, WorkflowDocument};
pub use error::{IdentifierError, Result, WorkflowModelError};
pub use graph::{Edge, Graph, NodeKey};
pub use node::{Node, NodeKind, NodeRef};
pub use parameter::{InputParameter, OutputParameter};
pub use port::{Port, PortDirection, PortStatus, PortTransition};
pub use reference::Reference;
pub use step::{Process, ProcessParameter, Step};
pub use validation::ValidationError;
pub use workflow::{Connection, WorkflowModel};
