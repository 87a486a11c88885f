#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod model {
    pub use rdf_loom_model::*;
}

pub mod store {
    pub use rdf_loom_store::*;
}

pub mod engine {
    pub use rdf_loom_engine::*;
}

pub use rdf_loom_engine::{BindingCollector, BindingSink, Query, QueryError, QueryPart};
pub use rdf_loom_store::MemoryStore;
