use crate::{Entity, NamedNode, Resource, Variable, vocab};
use std::fmt;
use std::sync::OnceLock;

static DEFAULT_CONTEXT: OnceLock<NamedNode> = OnceLock::new();

/// An edge of the graph: subject, predicate, object plus a context entity.
///
/// Statements are immutable once built. Derived equality includes the
/// context; [`Statement::matches_ignoring_context`] compares the triple only.
/// Slots holding [`Variable`]s are legal in query patterns but rejected by
/// stores on insertion.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Statement {
    subject: Entity,
    predicate: Entity,
    object: Resource,
    context: Entity,
}

impl Statement {
    /// Builds a statement in the default context.
    pub fn new(
        subject: impl Into<Entity>,
        predicate: impl Into<Entity>,
        object: impl Into<Resource>,
    ) -> Self {
        Self::with_context(subject, predicate, object, Self::default_context())
    }

    pub fn with_context(
        subject: impl Into<Entity>,
        predicate: impl Into<Entity>,
        object: impl Into<Resource>,
        context: impl Into<Entity>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            context: context.into(),
        }
    }

    /// The reserved context used when a statement is created without one.
    ///
    /// This is a concrete sentinel entity, not "unset": templates express
    /// "any context" with a wildcard instead.
    pub fn default_context() -> Entity {
        Entity::NamedNode(
            DEFAULT_CONTEXT
                .get_or_init(|| NamedNode::new_unchecked(vocab::DEFAULT_CONTEXT))
                .clone(),
        )
    }

    pub fn subject(&self) -> &Entity {
        &self.subject
    }

    pub fn predicate(&self) -> &Entity {
        &self.predicate
    }

    pub fn object(&self) -> &Resource {
        &self.object
    }

    pub fn context(&self) -> &Entity {
        &self.context
    }

    /// Compares subject, predicate, and object only.
    pub fn matches_ignoring_context(&self, other: &Statement) -> bool {
        self.subject == other.subject
            && self.predicate == other.predicate
            && self.object == other.object
    }

    /// True if any slot holds a query variable.
    pub fn has_variables(&self) -> bool {
        self.subject.is_variable()
            || self.predicate.is_variable()
            || self.object.is_variable()
            || self.context.is_variable()
    }

    /// The variables of this pattern in slot order, repeats included.
    pub fn variables(&self) -> Vec<&Variable> {
        [
            self.subject.as_variable(),
            self.predicate.as_variable(),
            self.object.as_variable(),
            self.context.as_variable(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.subject, self.predicate, self.object, self.context
        )
    }
}

/// A selection template; `None` slots match anything.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct StatementTemplate {
    pub subject: Option<Entity>,
    pub predicate: Option<Entity>,
    pub object: Option<Resource>,
    pub context: Option<Entity>,
}

impl StatementTemplate {
    /// Builds a template matching any context.
    pub fn new(
        subject: Option<Entity>,
        predicate: Option<Entity>,
        object: Option<Resource>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            context: None,
        }
    }

    #[must_use]
    pub fn in_context(mut self, context: Entity) -> Self {
        self.context = Some(context);
        self
    }

    /// Derives a template from a query pattern, turning variables into
    /// wildcards.
    pub fn from_pattern(pattern: &Statement) -> Self {
        fn entity_slot(entity: &Entity) -> Option<Entity> {
            if entity.is_variable() {
                None
            } else {
                Some(entity.clone())
            }
        }
        let object = if pattern.object().is_variable() {
            None
        } else {
            Some(pattern.object().clone())
        };
        Self {
            subject: entity_slot(pattern.subject()),
            predicate: entity_slot(pattern.predicate()),
            object,
            context: entity_slot(pattern.context()),
        }
    }

    /// True if no slot is a wildcard.
    pub fn is_concrete(&self) -> bool {
        self.subject.is_some()
            && self.predicate.is_some()
            && self.object.is_some()
            && self.context.is_some()
    }

    /// True if every slot is a wildcard.
    pub fn is_unconstrained(&self) -> bool {
        self.subject.is_none()
            && self.predicate.is_none()
            && self.object.is_none()
            && self.context.is_none()
    }

    pub fn matches(&self, statement: &Statement) -> bool {
        self.subject
            .as_ref()
            .map_or(true, |subject| subject == statement.subject())
            && self
                .predicate
                .as_ref()
                .map_or(true, |predicate| predicate == statement.predicate())
            && self
                .object
                .as_ref()
                .map_or(true, |object| object == statement.object())
            && self
                .context
                .as_ref()
                .map_or(true, |context| context == statement.context())
    }
}

impl From<&Statement> for StatementTemplate {
    /// An exact-match template with all four slots bound.
    fn from(statement: &Statement) -> Self {
        Self {
            subject: Some(statement.subject().clone()),
            predicate: Some(statement.predicate().clone()),
            object: Some(statement.object().clone()),
            context: Some(statement.context().clone()),
        }
    }
}

impl fmt::Display for StatementTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{subject} ")?,
            None => write!(f, "* ")?,
        }
        match &self.predicate {
            Some(predicate) => write!(f, "{predicate} ")?,
            None => write!(f, "* ")?,
        }
        match &self.object {
            Some(object) => write!(f, "{object} ")?,
            None => write!(f, "* ")?,
        }
        match &self.context {
            Some(context) => write!(f, "{context}"),
            None => write!(f, "*"),
        }
    }
}
