use rdf_loom_model::{Entity, Literal, Resource, Statement, StatementTemplate};
use std::cmp::Ordering;

/// How a [`LiteralFilter`] relates the observed value to its operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A value predicate evaluated against object literals only.
///
/// Comparisons are numeric when both sides parse as numbers and
/// lexicographic over the literal value otherwise.
#[derive(Clone, Debug)]
pub enum LiteralFilter {
    Compare(CompareOp, Literal),
    HasPrefix(String),
}

impl LiteralFilter {
    pub fn matches(&self, literal: &Literal) -> bool {
        match self {
            LiteralFilter::HasPrefix(prefix) => literal.value().starts_with(prefix.as_str()),
            LiteralFilter::Compare(op, operand) => {
                let ordering = compare_values(literal.value(), operand.value());
                match ordering {
                    Some(ordering) => match op {
                        CompareOp::Eq => ordering == Ordering::Equal,
                        CompareOp::Ne => ordering != Ordering::Equal,
                        CompareOp::Lt => ordering == Ordering::Less,
                        CompareOp::Le => ordering != Ordering::Greater,
                        CompareOp::Gt => ordering == Ordering::Greater,
                        CompareOp::Ge => ordering != Ordering::Less,
                    },
                    None => false,
                }
            }
        }
    }
}

fn compare_values(observed: &str, operand: &str) -> Option<Ordering> {
    match (observed.parse::<f64>(), operand.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(observed.cmp(operand)),
    }
}

/// A template generalized so each slot may hold zero or more candidates.
///
/// `None` is a wildcard; `Some` with an empty list is provably empty and
/// yields no results without touching the backing store.
#[derive(Clone, Debug, Default)]
pub struct SelectFilter {
    pub subjects: Option<Vec<Entity>>,
    pub predicates: Option<Vec<Entity>>,
    pub objects: Option<Vec<Resource>>,
    pub contexts: Option<Vec<Entity>>,
    /// All filters must hold for an object literal to be emitted; when any
    /// filter is present, non-literal objects never match.
    pub literal_filters: Vec<LiteralFilter>,
    /// Stop after this many matches; 0 means unlimited.
    pub limit: usize,
}

impl SelectFilter {
    pub fn from_template(template: &StatementTemplate) -> Self {
        Self {
            subjects: template.subject.clone().map(|subject| vec![subject]),
            predicates: template.predicate.clone().map(|predicate| vec![predicate]),
            objects: template.object.clone().map(|object| vec![object]),
            contexts: template.context.clone().map(|context| vec![context]),
            literal_filters: Vec::new(),
            limit: 0,
        }
    }

    /// True if some slot has an empty candidate list.
    pub fn is_provably_empty(&self) -> bool {
        self.subjects.as_ref().is_some_and(Vec::is_empty)
            || self.predicates.as_ref().is_some_and(Vec::is_empty)
            || self.objects.as_ref().is_some_and(Vec::is_empty)
            || self.contexts.as_ref().is_some_and(Vec::is_empty)
    }

    /// Full verification of one statement against slot candidates and
    /// literal filters.
    pub fn matches(&self, statement: &Statement) -> bool {
        self.subjects
            .as_ref()
            .map_or(true, |subjects| subjects.contains(statement.subject()))
            && self
                .predicates
                .as_ref()
                .map_or(true, |predicates| predicates.contains(statement.predicate()))
            && self
                .objects
                .as_ref()
                .map_or(true, |objects| objects.contains(statement.object()))
            && self
                .contexts
                .as_ref()
                .map_or(true, |contexts| contexts.contains(statement.context()))
            && self.literal_filters_match(statement)
    }

    pub(crate) fn literal_filters_match(&self, statement: &Statement) -> bool {
        if self.literal_filters.is_empty() {
            return true;
        }
        match statement.object().as_literal() {
            Some(literal) => self
                .literal_filters
                .iter()
                .all(|filter| filter.matches(literal)),
            None => false,
        }
    }

    /// Expands the filter into the disjoint single-value templates it
    /// covers. Candidate values within one slot are distinct, so no
    /// statement is produced by two combinations.
    pub fn combinations(&self) -> Vec<StatementTemplate> {
        fn slots<T: Clone>(values: &Option<Vec<T>>) -> Vec<Option<T>> {
            match values {
                None => vec![None],
                Some(values) => values.iter().cloned().map(Some).collect(),
            }
        }

        let mut templates = Vec::new();
        for subject in slots(&self.subjects) {
            for predicate in slots(&self.predicates) {
                for object in slots(&self.objects) {
                    for context in slots(&self.contexts) {
                        let mut template = StatementTemplate::new(
                            subject.clone(),
                            predicate.clone(),
                            object.clone(),
                        );
                        template.context = context;
                        templates.push(template);
                    }
                }
            }
        }
        templates
    }
}
