//! The graph-pattern join engine.
//!
//! A [`Query`] is an ordered list of parts, each a single statement pattern
//! or a multi-pattern subgraph. Parts are resolved against
//! [`SelectableSource`]s through the selection protocol and folded,
//! strictly in caller order, into one running table of variable bindings.
//! The final table is paginated and streamed to a [`BindingSink`].
//!
//! [`SelectableSource`]: rdf_loom_store::SelectableSource

mod binding;
mod error;
mod query;

pub use binding::{BindingCollector, Bindings};
pub use error::QueryError;
pub use query::{Query, QueryPart};

// The sink trait is part of the selection protocol so queryable sources can
// push rows through it; re-exported here as the result-facing surface.
pub use rdf_loom_store::BindingSink;
