//! Data model for RDF Loom: terms, statements, and selection templates.

mod blank_node;
mod error;
mod literal;
mod named_node;
mod statement;
mod term;
mod variable;
pub mod vocab;

pub use blank_node::BlankNode;
pub use error::ModelError;
pub use literal::Literal;
pub use named_node::NamedNode;
pub use statement::{Statement, StatementTemplate};
pub use term::{Entity, Resource};
pub use variable::Variable;

// Re-export the IRI types callers need for `NamedNode::new` error handling.
pub use oxiri::{Iri, IriParseError};
