use crate::blank_node::next_node_id;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A placeholder usable only inside query patterns.
///
/// Variables follow the same reference-identity discipline as blank nodes:
/// the name labels result columns and nothing else. Two separately built
/// variables named `?x` never bind to each other.
#[derive(Clone, Debug)]
pub struct Variable {
    id: u64,
    name: Arc<str>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_node_id(),
            name: Arc::from(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}
