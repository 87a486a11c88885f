use oxiri::{Iri, IriParseError};
use std::fmt;
use std::sync::Arc;

/// An IRI-identified node.
///
/// Equality and hashing use the IRI string value, so named nodes are
/// comparable across stores.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NamedNode {
    iri: Arc<str>,
}

impl NamedNode {
    /// Builds a named node, validating the IRI.
    pub fn new(iri: impl Into<String>) -> Result<Self, IriParseError> {
        let iri = Iri::parse(iri.into())?;
        Ok(Self {
            iri: Arc::from(iri.into_inner()),
        })
    }

    /// Builds a named node without checking that the IRI is valid.
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self {
            iri: Arc::from(iri.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_iri_value() {
        let a = NamedNode::new("http://example.com/a").unwrap();
        let b = NamedNode::new_unchecked("http://example.com/a");
        assert_eq!(a, b);
        assert_ne!(a, NamedNode::new_unchecked("http://example.com/b"));
    }

    #[test]
    fn invalid_iri_is_rejected() {
        assert!(NamedNode::new("not an iri").is_err());
    }
}
