pub mod config;
pub mod diagnostic;
pub mod error;
pub mod graph;
pub mod ir;
pub mod span;
pub mod translate;

// Re-exports for the CLI and integration tests
pub use error::{status_message, ErrorKind, TranslateError};
pub use graph::{Graph, GraphHash, GraphOp, GraphSink, NodeId};
pub use ir::parse::{parse_function, parse_module};
pub use ir::{Builder, Function, Module};
pub use translate::{translate, translate_to_graph, TranslationContext};
