use crate::filter::{LiteralFilter, SelectFilter};
use crate::error::StoreError;
use rdf_loom_model::{Resource, Statement, StatementTemplate, Variable};
use rustc_hash::FxHashMap;

/// A push consumer of statements.
///
/// Returning `false` from [`StatementSink::add`] requests early termination;
/// it is a cancellation signal, never an error.
pub trait StatementSink {
    fn add(&mut self, statement: Statement) -> bool;
}

impl StatementSink for Vec<Statement> {
    fn add(&mut self, statement: Statement) -> bool {
        self.push(statement);
        true
    }
}

/// Records whether anything arrived and stops the stream on the first hit.
#[derive(Default)]
pub struct AnyMatch {
    found: bool,
}

impl AnyMatch {
    pub fn found(&self) -> bool {
        self.found
    }
}

impl StatementSink for AnyMatch {
    fn add(&mut self, _statement: Statement) -> bool {
        self.found = true;
        false
    }
}

/// The weakest capability tier: a source that can stream all of its
/// statements once.
pub trait StatementSource {
    /// True if duplicate statements are structurally impossible. The join
    /// engine trusts this flag to decide whether to de-duplicate
    /// defensively.
    fn distinct(&self) -> bool;

    /// Streams every statement to `sink`, stopping early the first time
    /// `sink.add` returns `false`.
    fn select_all(&self, sink: &mut dyn StatementSink) -> Result<(), StoreError>;
}

/// A source that can evaluate templates and [`SelectFilter`]s.
pub trait SelectableSource: StatementSource {
    /// Streams every statement matching `template` to `sink`, stopping
    /// early when `sink.add` returns `false`.
    fn select(
        &self,
        template: &StatementTemplate,
        sink: &mut dyn StatementSink,
    ) -> Result<(), StoreError>;

    /// Evaluates a multi-value filter.
    ///
    /// The default decomposes the filter into its disjoint single-value
    /// templates and runs [`SelectableSource::select`] for each; stores with
    /// their own indexes usually override this.
    fn select_filter(
        &self,
        filter: &SelectFilter,
        sink: &mut dyn StatementSink,
    ) -> Result<(), StoreError> {
        if filter.is_provably_empty() {
            return Ok(());
        }
        let mut filtered = FilteringSink::new(sink, &filter.literal_filters, filter.limit);
        for template in filter.combinations() {
            self.select(&template, &mut filtered)?;
            if filtered.stopped() {
                break;
            }
        }
        Ok(())
    }

    /// True if at least one stored statement matches `template`.
    fn contains(&self, template: &StatementTemplate) -> Result<bool, StoreError> {
        let mut probe = AnyMatch::default();
        self.select(template, &mut probe)?;
        Ok(probe.found())
    }

    /// Capability probe: the queryable view of this source, if it has one.
    fn as_queryable(&self) -> Option<&dyn QueryableSource> {
        None
    }
}

/// A push consumer of variable-binding rows.
pub trait BindingSink {
    /// Announces the output schema once, before any row.
    fn init(&mut self, variables: &[Variable]);

    /// Receives one row aligned to the announced schema; returning `false`
    /// requests early termination (a `LIMIT`-style cutoff, not an error).
    fn add(&mut self, row: &[Resource]) -> bool;

    /// Signals the end of the stream.
    fn finished(&mut self) {}

    /// Diagnostic channel; not part of the data contract.
    fn add_comments(&mut self, _text: &str) {}
}

/// Per-variable constraints accompanying a query or push-down request.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// Externally known value domains per variable.
    pub known_values: FxHashMap<Variable, Vec<Resource>>,
    /// Literal filters applied when the variable occupies an object slot.
    pub literal_filters: FxHashMap<Variable, Vec<LiteralFilter>>,
    /// Stop after this many rows; 0 means unlimited.
    pub limit: usize,
}

/// Answer to a cheap push-down capability probe.
#[derive(Clone, Debug)]
pub struct MetaQueryResult {
    /// Whether the source can evaluate the subgraph itself.
    pub supported: bool,
    /// The pattern variables whose bindings the source reports. A
    /// push-down that distinguishes none of them is useless to the caller.
    pub distinguished_variables: Vec<Variable>,
}

/// The strongest capability tier: a source that can evaluate an entire
/// ordered subgraph itself and return bound rows directly.
pub trait QueryableSource: SelectableSource {
    /// Cheap probe asking whether `query` on these patterns is supported,
    /// before committing to the push-down.
    fn meta_query(&self, patterns: &[Statement], options: &QueryOptions) -> MetaQueryResult;

    /// Evaluates the subgraph join and streams bound rows to `sink`.
    fn query(
        &self,
        patterns: &[Statement],
        options: &QueryOptions,
        sink: &mut dyn BindingSink,
    ) -> Result<(), StoreError>;
}

/// A source that supports mutation.
pub trait ModifiableSource: SelectableSource {
    /// Adds a concrete statement. Fails with
    /// [`StoreError::InvalidArgument`] if any slot holds a variable.
    fn add(&mut self, statement: Statement) -> Result<(), StoreError>;

    /// Removes matching statements: a concrete template removes at most one
    /// exact match, a wildcarded one removes every match. Returns the
    /// number of statements removed.
    fn remove(&mut self, template: &StatementTemplate) -> Result<usize, StoreError>;

    /// Removes all statements.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Removes everything matching `template` and adds `replacement`.
    fn replace(
        &mut self,
        template: &StatementTemplate,
        replacement: Statement,
    ) -> Result<(), StoreError> {
        self.remove(template)?;
        self.add(replacement)
    }

    /// Bulk import from another source.
    fn import(&mut self, source: &dyn StatementSource) -> Result<(), StoreError> {
        let mut statements = Vec::new();
        source.select_all(&mut statements)?;
        for statement in statements {
            self.add(statement)?;
        }
        Ok(())
    }
}

/// Applies literal filters and a shared result limit across several
/// `select` calls, remembering whether the downstream sink gave up.
pub(crate) struct FilteringSink<'a> {
    inner: &'a mut dyn StatementSink,
    filters: &'a [LiteralFilter],
    remaining: usize,
    limited: bool,
    stopped: bool,
}

impl<'a> FilteringSink<'a> {
    pub(crate) fn new(
        inner: &'a mut dyn StatementSink,
        filters: &'a [LiteralFilter],
        limit: usize,
    ) -> Self {
        Self {
            inner,
            filters,
            remaining: limit,
            limited: limit != 0,
            stopped: false,
        }
    }

    pub(crate) fn stopped(&self) -> bool {
        self.stopped
    }
}

impl StatementSink for FilteringSink<'_> {
    fn add(&mut self, statement: Statement) -> bool {
        if self.stopped {
            return false;
        }
        if !self.filters.is_empty() {
            let passes = statement
                .object()
                .as_literal()
                .is_some_and(|literal| self.filters.iter().all(|filter| filter.matches(literal)));
            if !passes {
                return true;
            }
        }
        if !self.inner.add(statement) {
            self.stopped = true;
            return false;
        }
        if self.limited {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.stopped = true;
                return false;
            }
        }
        true
    }
}
