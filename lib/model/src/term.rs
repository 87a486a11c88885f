use crate::{BlankNode, Literal, ModelError, NamedNode, Variable};
use std::fmt;

/// A term usable in subject, predicate, and context positions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Entity {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable),
}

impl Entity {
    pub fn is_variable(&self) -> bool {
        matches!(self, Entity::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Entity::Variable(variable) => Some(variable),
            _ => None,
        }
    }
}

impl From<NamedNode> for Entity {
    fn from(node: NamedNode) -> Self {
        Entity::NamedNode(node)
    }
}

impl From<BlankNode> for Entity {
    fn from(node: BlankNode) -> Self {
        Entity::BlankNode(node)
    }
}

impl From<Variable> for Entity {
    fn from(variable: Variable) -> Self {
        Entity::Variable(variable)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::NamedNode(node) => node.fmt(f),
            Entity::BlankNode(node) => node.fmt(f),
            Entity::Variable(variable) => variable.fmt(f),
        }
    }
}

/// Any term that can occupy a statement slot; only objects may be literals.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Resource {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable),
    Literal(Literal),
}

impl Resource {
    pub fn is_variable(&self) -> bool {
        matches!(self, Resource::Variable(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Resource::Literal(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Resource::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Resource::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<NamedNode> for Resource {
    fn from(node: NamedNode) -> Self {
        Resource::NamedNode(node)
    }
}

impl From<BlankNode> for Resource {
    fn from(node: BlankNode) -> Self {
        Resource::BlankNode(node)
    }
}

impl From<Variable> for Resource {
    fn from(variable: Variable) -> Self {
        Resource::Variable(variable)
    }
}

impl From<Literal> for Resource {
    fn from(literal: Literal) -> Self {
        Resource::Literal(literal)
    }
}

impl From<Entity> for Resource {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::NamedNode(node) => Resource::NamedNode(node),
            Entity::BlankNode(node) => Resource::BlankNode(node),
            Entity::Variable(variable) => Resource::Variable(variable),
        }
    }
}

impl TryFrom<Resource> for Entity {
    type Error = ModelError;

    fn try_from(resource: Resource) -> Result<Self, Self::Error> {
        match resource {
            Resource::NamedNode(node) => Ok(Entity::NamedNode(node)),
            Resource::BlankNode(node) => Ok(Entity::BlankNode(node)),
            Resource::Variable(variable) => Ok(Entity::Variable(variable)),
            Resource::Literal(_) => Err(ModelError::LiteralInEntitySlot),
        }
    }
}

impl PartialEq<Entity> for Resource {
    fn eq(&self, other: &Entity) -> bool {
        match (self, other) {
            (Resource::NamedNode(a), Entity::NamedNode(b)) => a == b,
            (Resource::BlankNode(a), Entity::BlankNode(b)) => a == b,
            (Resource::Variable(a), Entity::Variable(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<Resource> for Entity {
    fn eq(&self, other: &Resource) -> bool {
        other == self
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::NamedNode(node) => node.fmt(f),
            Resource::BlankNode(node) => node.fmt(f),
            Resource::Variable(variable) => variable.fmt(f),
            Resource::Literal(literal) => literal.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_never_converts_to_entity() {
        let literal = Resource::Literal(Literal::new_simple_literal("v"));
        assert!(Entity::try_from(literal).is_err());

        let node = Resource::NamedNode(NamedNode::new_unchecked("http://example.com/a"));
        assert!(Entity::try_from(node).is_ok());
    }
}
