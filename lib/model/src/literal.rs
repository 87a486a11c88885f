use crate::NamedNode;
use std::fmt;
use std::sync::Arc;

/// An immutable literal value with an optional language tag or datatype.
///
/// Two literals are equal iff value, language, and datatype all agree.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Literal {
    value: Arc<str>,
    language: Option<Arc<str>>,
    datatype: Option<NamedNode>,
}

impl Literal {
    /// Builds a plain literal without language or datatype.
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: Arc::from(value.into()),
            language: None,
            datatype: None,
        }
    }

    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            value: Arc::from(value.into()),
            language: Some(Arc::from(language.into())),
            datatype: None,
        }
    }

    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: Arc::from(value.into()),
            language: None,
            datatype: Some(datatype),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&NamedNode> {
        self.datatype.as_ref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
        }
        if let Some(datatype) = &self.datatype {
            write!(f, "^^{datatype}")?;
        }
        Ok(())
    }
}
