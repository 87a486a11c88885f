use crate::error::StoreError;
use crate::filter::SelectFilter;
use crate::source::{
    FilteringSink, SelectableSource, StatementSink, StatementSource,
};
use rdf_loom_model::{Statement, StatementTemplate};

/// A read-only union of several selectable sources.
///
/// Inference layers and remote adapters are stacked over a base store this
/// way: the composition is itself a [`SelectableSource`], so callers never
/// special-case it. Duplicates across members cannot be ruled out, so the
/// union never advertises `distinct`.
#[derive(Default)]
pub struct UnionSource {
    sources: Vec<Box<dyn SelectableSource>>,
}

impl UnionSource {
    pub fn new(sources: Vec<Box<dyn SelectableSource>>) -> Self {
        Self { sources }
    }

    pub fn push(&mut self, source: Box<dyn SelectableSource>) {
        self.sources.push(source);
    }
}

/// Keeps forwarding until the downstream sink stops, and remembers that it
/// did so the outer loop over sources can halt too.
struct FusedSink<'a> {
    inner: &'a mut dyn StatementSink,
    stopped: bool,
}

impl StatementSink for FusedSink<'_> {
    fn add(&mut self, statement: Statement) -> bool {
        if self.stopped {
            return false;
        }
        if !self.inner.add(statement) {
            self.stopped = true;
        }
        !self.stopped
    }
}

impl StatementSource for UnionSource {
    fn distinct(&self) -> bool {
        false
    }

    fn select_all(&self, sink: &mut dyn StatementSink) -> Result<(), StoreError> {
        let mut fused = FusedSink {
            inner: sink,
            stopped: false,
        };
        for source in &self.sources {
            source.select_all(&mut fused)?;
            if fused.stopped {
                break;
            }
        }
        Ok(())
    }
}

impl SelectableSource for UnionSource {
    fn select(
        &self,
        template: &StatementTemplate,
        sink: &mut dyn StatementSink,
    ) -> Result<(), StoreError> {
        let mut fused = FusedSink {
            inner: sink,
            stopped: false,
        };
        for source in &self.sources {
            source.select(template, &mut fused)?;
            if fused.stopped {
                break;
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
        // The limit must hold across members, so members run unlimited and
        // the shared sink enforces it.
        let unlimited = SelectFilter {
            limit: 0,
            literal_filters: Vec::new(),
            ..filter.clone()
        };
        let mut shared = FilteringSink::new(sink, &filter.literal_filters, filter.limit);
        for source in &self.sources {
            source.select_filter(&unlimited, &mut shared)?;
            if shared.stopped() {
                break;
            }
        }
        Ok(())
    }

    fn contains(&self, template: &StatementTemplate) -> Result<bool, StoreError> {
        for source in &self.sources {
            if source.contains(template)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::source::ModifiableSource;
    use rdf_loom_model::NamedNode;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{iri}"))
    }

    #[test]
    fn union_sees_statements_of_every_member() {
        let mut a = MemoryStore::new();
        a.add(Statement::new(node("s"), node("p"), node("o1"))).unwrap();
        let mut b = MemoryStore::new();
        b.add(Statement::new(node("s"), node("p"), node("o2"))).unwrap();

        let union = UnionSource::new(vec![Box::new(a), Box::new(b)]);
        assert!(!union.distinct());

        let mut out = Vec::new();
        union
            .select(
                &StatementTemplate::new(Some(node("s").into()), None, None),
                &mut out,
            )
            .unwrap();
        assert_eq!(out.len(), 2);

        assert!(union
            .contains(&StatementTemplate::new(None, None, Some(node("o2").into())))
            .unwrap());
    }

    #[test]
    fn filter_limit_spans_members() {
        let mut a = MemoryStore::new();
        a.add(Statement::new(node("s"), node("p"), node("o1"))).unwrap();
        a.add(Statement::new(node("s"), node("p"), node("o2"))).unwrap();
        let mut b = MemoryStore::new();
        b.add(Statement::new(node("s"), node("p"), node("o3"))).unwrap();

        let union = UnionSource::new(vec![Box::new(a), Box::new(b)]);
        let filter = SelectFilter {
            subjects: Some(vec![node("s").into()]),
            limit: 2,
            ..SelectFilter::default()
        };
        let mut out = Vec::new();
        union.select_filter(&filter, &mut out).unwrap();
        assert_eq!(out.len(), 2);
    }
}
