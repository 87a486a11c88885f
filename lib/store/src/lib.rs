//! Statement stores and the selection protocol shared by every source.
//!
//! The protocol is a small capability hierarchy: [`StatementSource`] can
//! stream everything it holds, [`SelectableSource`] can evaluate templates
//! and [`SelectFilter`]s, and [`QueryableSource`] can evaluate whole
//! subgraphs itself. [`MemoryStore`] is the in-memory implementation that
//! backs most graphs.

mod error;
mod filter;
mod memory;
mod source;
mod union;

pub use error::StoreError;
pub use filter::{CompareOp, LiteralFilter, SelectFilter};
pub use memory::MemoryStore;
pub use source::{
    AnyMatch, BindingSink, MetaQueryResult, ModifiableSource, QueryOptions,
    QueryableSource, SelectableSource, StatementSink, StatementSource,
};
pub use union::UnionSource;
