//! Canonical data model for the diffusion workflow graph translator.
//!
//! Defines the shapes every other crate in this workspace shares: the raw
//! workflow document, the parsed node/link/graph types, and the class
//! registries that drive categorization and pattern detection.

pub mod graph;
pub mod node;
pub mod registry;

pub use graph::{WorkflowDocument, WorkflowGraph};
pub use node::{Connection, Link, Node, NodeId, NodeInput};
pub use registry::{categorize, NodeCategory};
