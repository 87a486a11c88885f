use crate::binding::Bindings;
use crate::error::QueryError;
use itertools::Itertools;
use rdf_loom_model::{Entity, Resource, Statement, Variable};
use rdf_loom_store::{
    BindingSink, LiteralFilter, QueryOptions, SelectFilter, SelectableSource,
    StatementSink,
};
use rustc_hash::FxHashSet;
use tracing::debug;

/// One step of a query.
#[derive(Clone, Debug)]
pub enum QueryPart {
    /// A single pattern resolved against every supplied source.
    Pattern(Statement),
    /// A subgraph offered as one push-down to a source that can evaluate
    /// joins itself; decomposed into its patterns when it cannot.
    Graph(Vec<Statement>),
}

/// An ordered multi-pattern query over one or more selectable sources.
///
/// Parts are evaluated strictly in the order given and their matches are
/// folded incrementally into a single binding table. There is no cost-based
/// reordering; left-to-right evaluation is part of the contract.
#[derive(Clone, Debug, Default)]
pub struct Query {
    parts: Vec<QueryPart>,
    options: QueryOptions,
    return_start: usize,
    return_limit: usize,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single-pattern part. Slots holding [`Variable`]s are
    /// resolved against the sources; everything else must match exactly.
    #[must_use]
    pub fn pattern(mut self, pattern: Statement) -> Self {
        self.parts.push(QueryPart::Pattern(pattern));
        self
    }

    /// Appends a subgraph part, offered to a queryable source in one piece.
    #[must_use]
    pub fn graph(mut self, patterns: Vec<Statement>) -> Self {
        self.parts.push(QueryPart::Graph(patterns));
        self
    }

    /// Constrains `variable` to an externally known value domain.
    #[must_use]
    pub fn known_values(mut self, variable: Variable, values: Vec<Resource>) -> Self {
        self.options.known_values.insert(variable, values);
        self
    }

    /// Registers a literal filter applied whenever `variable` occupies an
    /// object slot.
    #[must_use]
    pub fn literal_filter(mut self, variable: Variable, filter: LiteralFilter) -> Self {
        self.options
            .literal_filters
            .entry(variable)
            .or_default()
            .push(filter);
        self
    }

    /// Skips this many rows of the final table.
    #[must_use]
    pub fn return_start(mut self, start: usize) -> Self {
        self.return_start = start;
        self
    }

    /// Stops after this many emitted rows; 0 means unlimited.
    #[must_use]
    pub fn return_limit(mut self, limit: usize) -> Self {
        self.return_limit = limit;
        self
    }

    /// Evaluates the query and streams the final binding table to `sink`.
    pub fn execute(
        &self,
        sources: &[&dyn SelectableSource],
        sink: &mut dyn BindingSink,
    ) -> Result<(), QueryError> {
        let mut bindings = Bindings::initial();
        for part in &self.parts {
            let alive = match part {
                QueryPart::Pattern(pattern) => {
                    self.evaluate_pattern(pattern, sources, &mut bindings)?
                }
                QueryPart::Graph(patterns) => {
                    self.evaluate_graph(patterns, sources, &mut bindings)?
                }
            };
            if !alive {
                bindings.clear_rows();
                break;
            }
            if bindings.is_exhausted() {
                break;
            }
        }
        self.emit(&bindings, sink);
        Ok(())
    }

    /// Resolves one pattern against the sources and joins its matches into
    /// the running table. Returns `false` when a variable's candidate
    /// domain is provably empty and the whole query yields zero rows.
    fn evaluate_pattern(
        &self,
        pattern: &Statement,
        sources: &[&dyn SelectableSource],
        bindings: &mut Bindings,
    ) -> Result<bool, QueryError> {
        let part_variables: Vec<Variable> = pattern
            .variables()
            .into_iter()
            .unique()
            .cloned()
            .collect();

        let subjects = match self.entity_slot_candidates(pattern.subject(), bindings) {
            SlotCandidates::Empty => return Ok(false),
            SlotCandidates::Open => None,
            SlotCandidates::Values(values) => Some(values),
        };
        let predicates = match self.entity_slot_candidates(pattern.predicate(), bindings) {
            SlotCandidates::Empty => return Ok(false),
            SlotCandidates::Open => None,
            SlotCandidates::Values(values) => Some(values),
        };
        let contexts = match self.entity_slot_candidates(pattern.context(), bindings) {
            SlotCandidates::Empty => return Ok(false),
            SlotCandidates::Open => None,
            SlotCandidates::Values(values) => Some(values),
        };
        let objects = match pattern.object() {
            Resource::Variable(variable) => match self.variable_domain(bindings, variable) {
                Domain::Open => None,
                Domain::Values(values) if values.is_empty() => return Ok(false),
                Domain::Values(values) => Some(values),
            },
            object => Some(vec![object.clone()]),
        };

        let literal_filters = pattern
            .object()
            .as_variable()
            .and_then(|variable| self.options.literal_filters.get(variable))
            .cloned()
            .unwrap_or_default();

        let filter = SelectFilter {
            subjects,
            predicates,
            objects,
            contexts,
            literal_filters,
            limit: 0,
        };
        if filter.subjects.is_none()
            && filter.predicates.is_none()
            && filter.objects.is_none()
            && filter.contexts.is_none()
        {
            return Err(QueryError::UnconstrainedPattern);
        }

        let mut matcher = PatternMatcher {
            pattern,
            variables: &part_variables,
            rows: Vec::new(),
        };
        for source in sources {
            source.select_filter(&filter, &mut matcher)?;
        }
        let mut rows = matcher.rows;
        // A single source that enforces uniqueness is trusted; everything
        // else gets de-duplicated defensively.
        let trusted = sources.len() == 1 && sources[0].distinct();
        if !trusted {
            rows = rows.into_iter().unique().collect();
        }
        debug!(pattern = %pattern, matches = rows.len(), "evaluated pattern part");

        bindings.join(&part_variables, rows);
        Ok(true)
    }

    /// Resolves a subgraph part, pushing it down whole when the single
    /// source probes as capable and falling back to per-pattern evaluation
    /// otherwise. A declined push-down is never dropped.
    fn evaluate_graph(
        &self,
        patterns: &[Statement],
        sources: &[&dyn SelectableSource],
        bindings: &mut Bindings,
    ) -> Result<bool, QueryError> {
        if let [source] = sources {
            if let Some(queryable) = source.as_queryable() {
                let graph_variables: Vec<&Variable> = patterns
                    .iter()
                    .flat_map(Statement::variables)
                    .unique()
                    .collect();
                let Some(options) = self.push_down_options(&graph_variables, bindings) else {
                    return Ok(false);
                };
                let meta = queryable.meta_query(patterns, &options);
                let distinguishes = meta
                    .distinguished_variables
                    .iter()
                    .any(|variable| graph_variables.contains(&variable));
                if meta.supported && distinguishes {
                    let mut collected = RowCollector::default();
                    queryable.query(patterns, &options, &mut collected)?;
                    debug!(rows = collected.rows.len(), "joined push-down subgraph");
                    bindings.join(&collected.variables, collected.rows);
                    return Ok(true);
                }
                debug!("push-down declined, decomposing subgraph into patterns");
            }
        }
        for pattern in patterns {
            if !self.evaluate_pattern(pattern, sources, bindings)? {
                return Ok(false);
            }
            if bindings.is_exhausted() {
                break;
            }
        }
        Ok(true)
    }

    /// Candidate values for a subject, predicate, or context slot. Literals
    /// in a variable's domain can never occupy an entity slot and are
    /// dropped; a domain left empty by that yields zero rows like any other
    /// empty intersection.
    fn entity_slot_candidates(&self, slot: &Entity, bindings: &Bindings) -> SlotCandidates {
        match slot {
            Entity::Variable(variable) => match self.variable_domain(bindings, variable) {
                Domain::Open => SlotCandidates::Open,
                Domain::Values(values) => {
                    let entities: Vec<Entity> = values
                        .into_iter()
                        .filter_map(|value| Entity::try_from(value).ok())
                        .collect();
                    if entities.is_empty() {
                        SlotCandidates::Empty
                    } else {
                        SlotCandidates::Values(entities)
                    }
                }
            },
            entity => SlotCandidates::Values(vec![entity.clone()]),
        }
    }

    /// The candidate domain for a variable: the intersection of values the
    /// table already binds and any externally supplied domain.
    fn variable_domain(&self, bindings: &Bindings, variable: &Variable) -> Domain {
        let bound = bindings.known_values(variable);
        let external = self.options.known_values.get(variable);
        match (bound, external) {
            (None, None) => Domain::Open,
            (Some(bound), None) => Domain::Values(bound),
            (None, Some(external)) => {
                Domain::Values(external.iter().cloned().unique().collect())
            }
            (Some(bound), Some(external)) => {
                let allowed: FxHashSet<&Resource> = external.iter().collect();
                Domain::Values(
                    bound
                        .into_iter()
                        .filter(|value| allowed.contains(value))
                        .collect(),
                )
            }
        }
    }

    /// Options for a push-down request; `None` when some variable's domain
    /// is provably empty.
    fn push_down_options(
        &self,
        graph_variables: &[&Variable],
        bindings: &Bindings,
    ) -> Option<QueryOptions> {
        let mut options = QueryOptions::default();
        for &variable in graph_variables {
            match self.variable_domain(bindings, variable) {
                Domain::Open => {}
                Domain::Values(values) => {
                    if values.is_empty() {
                        return None;
                    }
                    options.known_values.insert(variable.clone(), values);
                }
            }
            if let Some(filters) = self.options.literal_filters.get(variable) {
                options
                    .literal_filters
                    .insert(variable.clone(), filters.clone());
            }
        }
        Some(options)
    }

    /// Streams the final table, applying pagination. Rows handed to the
    /// sink are owned copies; a `false` from the sink stops immediately.
    fn emit(&self, bindings: &Bindings, sink: &mut dyn BindingSink) {
        sink.init(bindings.variables());
        let mut emitted = 0usize;
        for row in bindings.rows().iter().skip(self.return_start) {
            if self.return_limit != 0 && emitted >= self.return_limit {
                break;
            }
            if !sink.add(row) {
                break;
            }
            emitted += 1;
        }
        sink.finished();
    }
}

enum Domain {
    Open,
    Values(Vec<Resource>),
}

enum SlotCandidates {
    Open,
    Empty,
    Values(Vec<Entity>),
}

/// Turns raw statement matches into binding rows aligned to the part's
/// variable order.
struct PatternMatcher<'a> {
    pattern: &'a Statement,
    variables: &'a [Variable],
    rows: Vec<Vec<Resource>>,
}

impl StatementSink for PatternMatcher<'_> {
    fn add(&mut self, statement: Statement) -> bool {
        if let Some(row) = bind_row(self.pattern, self.variables, &statement) {
            self.rows.push(row);
        }
        true
    }
}

/// Extracts one match's bindings, discarding the match when a variable
/// repeated across slots binds to disagreeing values. The filter vocabulary
/// cannot express "these two slots must be equal", so this check has to
/// happen after retrieval.
fn bind_row(
    pattern: &Statement,
    variables: &[Variable],
    statement: &Statement,
) -> Option<Vec<Resource>> {
    let slots: [(Option<&Variable>, Resource); 4] = [
        (
            pattern.subject().as_variable(),
            statement.subject().clone().into(),
        ),
        (
            pattern.predicate().as_variable(),
            statement.predicate().clone().into(),
        ),
        (pattern.object().as_variable(), statement.object().clone()),
        (
            pattern.context().as_variable(),
            statement.context().clone().into(),
        ),
    ];
    let mut row: Vec<Option<Resource>> = vec![None; variables.len()];
    for (variable, value) in slots {
        let Some(variable) = variable else {
            continue;
        };
        let position = variables.iter().position(|v| v == variable)?;
        match &row[position] {
            Some(existing) if *existing != value => return None,
            Some(_) => {}
            None => row[position] = Some(value),
        }
    }
    row.into_iter().collect()
}

/// Collects push-down rows for the subsequent join.
#[derive(Default)]
struct RowCollector {
    variables: Vec<Variable>,
    rows: Vec<Vec<Resource>>,
}

impl BindingSink for RowCollector {
    fn init(&mut self, variables: &[Variable]) {
        self.variables = variables.to_vec();
    }

    fn add(&mut self, row: &[Resource]) -> bool {
        self.rows.push(row.to_vec());
        true
    }
}
