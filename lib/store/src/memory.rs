use crate::error::StoreError;
use crate::filter::SelectFilter;
use crate::source::{
    ModifiableSource, SelectableSource, StatementSink, StatementSource,
};
use rdf_loom_model::{Entity, Resource, Statement, StatementTemplate};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use tracing::debug;

/// In-memory statement store with lazily built subject and object indexes.
///
/// Indexes are not built eagerly: the first `select` builds both from the
/// backing collection, and every later mutation maintains them
/// incrementally. A store that is only written to never pays the indexing
/// cost. The index cache lives in a `RefCell`, so the store is deliberately
/// not `Sync`; a single logical owner mutates, reads interleave on the same
/// thread.
pub struct MemoryStore {
    statements: Vec<Statement>,
    indexes: RefCell<Option<StatementIndexes>>,
    check_duplicates: bool,
    indexing_enabled: bool,
}

#[derive(Default)]
struct StatementIndexes {
    by_subject: FxHashMap<Entity, Vec<Statement>>,
    by_object: FxHashMap<Resource, Vec<Statement>>,
}

impl StatementIndexes {
    fn build(statements: &[Statement]) -> Self {
        let mut indexes = Self::default();
        for statement in statements {
            indexes.insert(statement);
        }
        indexes
    }

    fn insert(&mut self, statement: &Statement) {
        self.by_subject
            .entry(statement.subject().clone())
            .or_default()
            .push(statement.clone());
        self.by_object
            .entry(statement.object().clone())
            .or_default()
            .push(statement.clone());
    }

    fn remove(&mut self, statement: &Statement) {
        if let Some(list) = self.by_subject.get_mut(statement.subject()) {
            if let Some(pos) = list.iter().position(|s| s == statement) {
                list.remove(pos);
            }
        }
        if let Some(list) = self.by_object.get_mut(statement.object()) {
            if let Some(pos) = list.iter().position(|s| s == statement) {
                list.remove(pos);
            }
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
            indexes: RefCell::new(None),
            check_duplicates: false,
            indexing_enabled: true,
        }
    }

    /// A store that refuses duplicate statements and advertises
    /// `distinct`.
    pub fn new_distinct() -> Self {
        Self {
            check_duplicates: true,
            ..Self::new()
        }
    }

    /// A scratch store that never indexes and always full-scans. Useful for
    /// short-lived temporary graphs where index construction would be
    /// wasted work; this is a policy switch, not an error path.
    pub fn without_indexing() -> Self {
        Self {
            indexing_enabled: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether the lazy indexes have been built. Exposed for tests.
    pub fn is_indexed(&self) -> bool {
        self.indexes.borrow().is_some()
    }

    /// Runs `f` over the indexes, building them first if this store indexes
    /// at all. Candidate lists are cloned out so no cache borrow is held
    /// while the sink runs.
    fn with_indexes<R>(&self, f: impl FnOnce(&StatementIndexes) -> R) -> Option<R> {
        if !self.indexing_enabled {
            return None;
        }
        let mut cache = self.indexes.borrow_mut();
        let indexes = cache.get_or_insert_with(|| {
            debug!(statements = self.statements.len(), "building statement indexes");
            StatementIndexes::build(&self.statements)
        });
        Some(f(indexes))
    }

    /// The candidate set for a subject/object pair: the subject index list,
    /// the object index list, or the shorter of the two when both slots are
    /// bound. `None` means the caller must scan the full collection.
    fn candidates(
        &self,
        subject: Option<&Entity>,
        object: Option<&Resource>,
    ) -> Option<Vec<Statement>> {
        if subject.is_none() && object.is_none() {
            return None;
        }
        self.with_indexes(|indexes| {
            let by_subject =
                subject.map(|subject| indexes.by_subject.get(subject).map_or(&[][..], Vec::as_slice));
            let by_object =
                object.map(|object| indexes.by_object.get(object).map_or(&[][..], Vec::as_slice));
            match (by_subject, by_object) {
                (Some(s), Some(o)) => {
                    if s.len() <= o.len() {
                        s.to_vec()
                    } else {
                        o.to_vec()
                    }
                }
                (Some(s), None) => s.to_vec(),
                (None, Some(o)) => o.to_vec(),
                // Guarded above: at least one slot is bound.
                (None, None) => Vec::new(),
            }
        })
    }

    /// Candidate set for multi-value slots: the union of per-value index
    /// lists, picking whichever of the subject or object dimension covers
    /// fewer statements.
    fn filter_candidates(&self, filter: &SelectFilter) -> Option<Vec<Statement>> {
        if filter.subjects.is_none() && filter.objects.is_none() {
            return None;
        }
        self.with_indexes(|indexes| {
            let by_subject = filter.subjects.as_ref().map(|subjects| {
                subjects
                    .iter()
                    .filter_map(|subject| indexes.by_subject.get(subject))
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
            });
            let by_object = filter.objects.as_ref().map(|objects| {
                objects
                    .iter()
                    .filter_map(|object| indexes.by_object.get(object))
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
            });
            match (by_subject, by_object) {
                (Some(s), Some(o)) => {
                    if s.len() <= o.len() {
                        s
                    } else {
                        o
                    }
                }
                (Some(s), None) => s,
                (None, Some(o)) => o,
                // Guarded above: at least one slot is bound.
                (None, None) => Vec::new(),
            }
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSource for MemoryStore {
    fn distinct(&self) -> bool {
        self.check_duplicates
    }

    fn select_all(&self, sink: &mut dyn StatementSink) -> Result<(), StoreError> {
        for statement in &self.statements {
            if !sink.add(statement.clone()) {
                break;
            }
        }
        Ok(())
    }
}

impl SelectableSource for MemoryStore {
    fn select(
        &self,
        template: &StatementTemplate,
        sink: &mut dyn StatementSink,
    ) -> Result<(), StoreError> {
        // Candidates are keyed on value identity only, so every one is
        // re-verified against the full template before emission.
        match self.candidates(template.subject.as_ref(), template.object.as_ref()) {
            Some(candidates) => {
                for statement in candidates {
                    if template.matches(&statement) && !sink.add(statement) {
                        break;
                    }
                }
            }
            None => {
                for statement in &self.statements {
                    if template.matches(statement) && !sink.add(statement.clone()) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn select_filter(
        &self,
        filter: &SelectFilter,
        sink: &mut dyn StatementSink,
    ) -> Result<(), StoreError> {
        if filter.is_provably_empty() {
            return Ok(());
        }
        fn stream<'a>(
            statements: impl Iterator<Item = &'a Statement>,
            filter: &SelectFilter,
            sink: &mut dyn StatementSink,
        ) {
            let mut emitted = 0usize;
            for statement in statements {
                if !filter.matches(statement) {
                    continue;
                }
                if !sink.add(statement.clone()) {
                    return;
                }
                emitted += 1;
                if filter.limit != 0 && emitted >= filter.limit {
                    return;
                }
            }
        }
        match self.filter_candidates(filter) {
            Some(candidates) => stream(candidates.iter(), filter, sink),
            None => stream(self.statements.iter(), filter, sink),
        }
        Ok(())
    }
}

impl ModifiableSource for MemoryStore {
    fn add(&mut self, statement: Statement) -> Result<(), StoreError> {
        if statement.has_variables() {
            return Err(StoreError::invalid_argument(format!(
                "cannot store a statement with unbound slots: {statement}"
            )));
        }
        if self.check_duplicates && self.contains(&StatementTemplate::from(&statement))? {
            return Ok(());
        }
        if let Some(indexes) = self.indexes.get_mut().as_mut() {
            indexes.insert(&statement);
        }
        self.statements.push(statement);
        Ok(())
    }

    fn remove(&mut self, template: &StatementTemplate) -> Result<usize, StoreError> {
        let mut removed = Vec::new();
        if template.is_concrete() {
            if let Some(pos) = self.statements.iter().position(|s| template.matches(s)) {
                removed.push(self.statements.remove(pos));
            }
        } else {
            let mut kept = Vec::with_capacity(self.statements.len());
            for statement in self.statements.drain(..) {
                if template.matches(&statement) {
                    removed.push(statement);
                } else {
                    kept.push(statement);
                }
            }
            self.statements = kept;
        }
        if let Some(indexes) = self.indexes.get_mut().as_mut() {
            for statement in &removed {
                indexes.remove(statement);
            }
        }
        Ok(removed.len())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.statements.clear();
        *self.indexes.get_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_loom_model::NamedNode;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{iri}"))
    }

    fn statement(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(node(s), node(p), node(o))
    }

    fn select_to_vec(store: &MemoryStore, template: &StatementTemplate) -> Vec<Statement> {
        let mut out = Vec::new();
        store.select(template, &mut out).unwrap();
        out
    }

    #[test]
    fn indexes_are_built_on_first_select_only() {
        let mut store = MemoryStore::new();
        store.add(statement("s", "p", "o")).unwrap();
        assert!(!store.is_indexed());

        let template = StatementTemplate::new(Some(node("s").into()), None, None);
        assert_eq!(select_to_vec(&store, &template).len(), 1);
        assert!(store.is_indexed());
    }

    #[test]
    fn indexes_survive_mutation() {
        let mut store = MemoryStore::new();
        store.add(statement("s", "p", "o1")).unwrap();

        let by_subject = StatementTemplate::new(Some(node("s").into()), None, None);
        assert_eq!(select_to_vec(&store, &by_subject).len(), 1);

        store.add(statement("s", "p", "o2")).unwrap();
        assert_eq!(select_to_vec(&store, &by_subject).len(), 2);

        let one = StatementTemplate::new(None, None, Some(node("o1").into()));
        assert_eq!(store.remove(&one).unwrap(), 1);
        assert_eq!(select_to_vec(&store, &by_subject).len(), 1);
    }

    #[test]
    fn unindexed_store_matches_indexed_store() {
        let mut indexed = MemoryStore::new();
        let mut scans = MemoryStore::without_indexing();
        for (s, p, o) in [("a", "p", "b"), ("a", "q", "c"), ("b", "p", "b")] {
            indexed.add(statement(s, p, o)).unwrap();
            scans.add(statement(s, p, o)).unwrap();
        }

        for template in [
            StatementTemplate::new(Some(node("a").into()), None, None),
            StatementTemplate::new(None, None, Some(node("b").into())),
            StatementTemplate::new(Some(node("a").into()), None, Some(node("b").into())),
            StatementTemplate::new(None, Some(node("p").into()), None),
            StatementTemplate::new(None, None, None),
        ] {
            let mut a = select_to_vec(&indexed, &template);
            let mut b = select_to_vec(&scans, &template);
            a.sort_by_key(|s| s.to_string());
            b.sort_by_key(|s| s.to_string());
            assert_eq!(a, b, "template {template}");
        }
        assert!(!scans.is_indexed());
    }

    #[test]
    fn concrete_remove_takes_one_wildcard_remove_takes_all() {
        let mut store = MemoryStore::new();
        store.add(statement("s", "p", "o")).unwrap();
        store.add(statement("s", "p", "o")).unwrap();
        store.add(statement("s", "q", "o")).unwrap();

        let exact = StatementTemplate::from(&statement("s", "p", "o"));
        assert_eq!(store.remove(&exact).unwrap(), 1);
        assert_eq!(store.len(), 2);

        let wild = StatementTemplate::new(Some(node("s").into()), None, None);
        assert_eq!(store.remove(&wild).unwrap(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_unbound_slots() {
        let mut store = MemoryStore::new();
        let pattern = Statement::new(
            rdf_loom_model::Variable::new("x"),
            node("p"),
            node("o"),
        );
        assert!(matches!(
            store.add(pattern),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn distinct_store_drops_duplicates() {
        let mut store = MemoryStore::new_distinct();
        assert!(store.distinct());
        store.add(statement("s", "p", "o")).unwrap();
        store.add(statement("s", "p", "o")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn select_stops_when_the_sink_gives_up() {
        let mut store = MemoryStore::new();
        for o in ["o1", "o2", "o3"] {
            store.add(statement("s", "p", o)).unwrap();
        }
        let mut probe = AnyMatchCounter::default();
        store
            .select(&StatementTemplate::new(None, None, None), &mut probe)
            .unwrap();
        assert_eq!(probe.delivered, 1);
    }

    #[derive(Default)]
    struct AnyMatchCounter {
        delivered: usize,
    }

    impl StatementSink for AnyMatchCounter {
        fn add(&mut self, _statement: Statement) -> bool {
            self.delivered += 1;
            false
        }
    }
}
