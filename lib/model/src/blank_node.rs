use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_node_id() -> u64 {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// An anonymous graph node.
///
/// Blank nodes have reference-identity semantics: a node is equal only to
/// clones of itself. The optional label is used for output and never
/// participates in equality, so two blank nodes carrying the same label stay
/// distinct. External stores that persist blank nodes across sessions can
/// attach a stable GUID.
#[derive(Clone, Debug)]
pub struct BlankNode {
    id: u64,
    label: Option<Arc<str>>,
    guid: Option<Uuid>,
}

impl BlankNode {
    pub fn new() -> Self {
        Self {
            id: next_node_id(),
            label: None,
            guid: None,
        }
    }

    /// Builds a fresh blank node carrying a display label.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            id: next_node_id(),
            label: Some(Arc::from(label.into())),
            guid: None,
        }
    }

    /// Attaches a stable GUID for cross-session persistence.
    #[must_use]
    pub fn with_guid(mut self, guid: Uuid) -> Self {
        self.guid = Some(guid);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn guid(&self) -> Option<Uuid> {
        self.guid
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BlankNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BlankNode {}

impl Hash for BlankNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "_:{label}"),
            None => write!(f, "_:b{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_stays_distinct() {
        let a = BlankNode::with_label("x");
        let b = BlankNode::with_label("x");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn guid_does_not_affect_identity() {
        let a = BlankNode::new();
        let tagged = a.clone().with_guid(Uuid::new_v4());
        assert_eq!(a, tagged);
        assert!(tagged.guid().is_some());
    }
}
