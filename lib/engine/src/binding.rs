use rdf_loom_model::{Resource, Variable};
use rdf_loom_store::BindingSink;
use rustc_hash::{FxHashMap, FxHashSet};

/// The running table of variable bindings built up part by part.
///
/// The initial table holds one empty row, the identity element of the join:
/// the first part's matches become the table unchanged.
#[derive(Clone, Debug)]
pub struct Bindings {
    variables: Vec<Variable>,
    rows: Vec<Vec<Resource>>,
}

impl Bindings {
    pub(crate) fn initial() -> Self {
        Self {
            variables: Vec::new(),
            rows: vec![Vec::new()],
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[Vec<Resource>] {
        &self.rows
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn position(&self, variable: &Variable) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }

    /// The distinct values the table already binds for `variable`, in first
    /// occurrence order, or `None` if the variable is not a column yet.
    pub(crate) fn known_values(&self, variable: &Variable) -> Option<Vec<Resource>> {
        let column = self.position(variable)?;
        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for row in &self.rows {
            if seen.insert(row[column].clone()) {
                values.push(row[column].clone());
            }
        }
        Some(values)
    }

    /// Joins a part's raw matches into this table.
    ///
    /// With no common variables this degenerates to an unconditional
    /// cartesian product. That is a known cliff when both sides are large,
    /// but callers depend on the documented left-to-right part order, so no
    /// reordering is attempted here.
    pub(crate) fn join(&mut self, part_variables: &[Variable], matches: Vec<Vec<Resource>>) {
        // (outer column, match column) pairs for the shared variables, in
        // outer column order.
        let common: Vec<(usize, usize)> = self
            .variables
            .iter()
            .enumerate()
            .filter_map(|(outer, variable)| {
                part_variables
                    .iter()
                    .position(|v| v == variable)
                    .map(|inner| (outer, inner))
            })
            .collect();

        let fresh: Vec<usize> = part_variables
            .iter()
            .enumerate()
            .filter(|(_, variable)| !self.variables.contains(variable))
            .map(|(position, _)| position)
            .collect();

        let mut joined = Vec::new();
        if common.is_empty() {
            for row in &self.rows {
                for matched in &matches {
                    let mut next = row.clone();
                    next.extend(fresh.iter().map(|&position| matched[position].clone()));
                    joined.push(next);
                }
            }
        } else {
            let key_positions: Vec<usize> =
                common.iter().map(|&(_, inner)| inner).collect();
            let outer_positions: Vec<usize> =
                common.iter().map(|&(outer, _)| outer).collect();
            let index = JoinIndex::build(&matches, (0..matches.len()).collect(), &key_positions);

            for row in &self.rows {
                let Some(matched_ids) = index.probe(&outer_positions, row) else {
                    continue;
                };
                for &id in matched_ids {
                    let mut next = row.clone();
                    next.extend(fresh.iter().map(|&position| matches[id][position].clone()));
                    joined.push(next);
                }
            }
        }

        for &position in &fresh {
            self.variables.push(part_variables[position].clone());
        }
        self.rows = joined;
    }
}

/// A tree of hash maps, one level per common variable; leaves hold the
/// match rows agreeing with every key on the path.
enum JoinIndex {
    Node(FxHashMap<Resource, JoinIndex>),
    Leaf(Vec<usize>),
}

impl JoinIndex {
    fn build(matches: &[Vec<Resource>], row_ids: Vec<usize>, key_positions: &[usize]) -> Self {
        let Some((&position, rest)) = key_positions.split_first() else {
            return JoinIndex::Leaf(row_ids);
        };
        let mut groups: FxHashMap<Resource, Vec<usize>> = FxHashMap::default();
        for id in row_ids {
            groups
                .entry(matches[id][position].clone())
                .or_default()
                .push(id);
        }
        JoinIndex::Node(
            groups
                .into_iter()
                .map(|(value, ids)| (value, JoinIndex::build(matches, ids, rest)))
                .collect(),
        )
    }

    /// Walks the tree with the outer row's values for the common columns.
    /// A miss at any level means the row joins with nothing.
    fn probe(&self, outer_positions: &[usize], row: &[Resource]) -> Option<&Vec<usize>> {
        let mut node = self;
        for &position in outer_positions {
            match node {
                JoinIndex::Node(children) => {
                    node = children.get(&row[position])?;
                }
                JoinIndex::Leaf(_) => break,
            }
        }
        match node {
            JoinIndex::Leaf(ids) => Some(ids),
            JoinIndex::Node(_) => None,
        }
    }
}

/// A [`BindingSink`] that keeps everything it receives. The workhorse of
/// tests and of callers that want the whole table at once.
#[derive(Default, Debug)]
pub struct BindingCollector {
    variables: Vec<Variable>,
    rows: Vec<Vec<Resource>>,
    comments: Vec<String>,
}

impl BindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[Vec<Resource>] {
        &self.rows
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The values bound to `variable`, one per row.
    pub fn column(&self, variable: &Variable) -> Option<Vec<&Resource>> {
        let position = self.variables.iter().position(|v| v == variable)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }
}

impl BindingSink for BindingCollector {
    fn init(&mut self, variables: &[Variable]) {
        self.variables = variables.to_vec();
    }

    fn add(&mut self, row: &[Resource]) -> bool {
        self.rows.push(row.to_vec());
        true
    }

    fn add_comments(&mut self, text: &str) {
        self.comments.push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_loom_model::NamedNode;

    fn value(local: &str) -> Resource {
        NamedNode::new_unchecked(format!("http://example.com/{local}")).into()
    }

    #[test]
    fn initial_table_is_the_join_identity() {
        let mut bindings = Bindings::initial();
        let x = Variable::new("x");
        bindings.join(
            std::slice::from_ref(&x),
            vec![vec![value("a")], vec![value("b")]],
        );
        assert_eq!(bindings.variables(), &[x]);
        assert_eq!(bindings.rows().len(), 2);
    }

    #[test]
    fn join_on_common_variable_filters_rows() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let mut bindings = Bindings::initial();
        bindings.join(
            std::slice::from_ref(&x),
            vec![vec![value("a")], vec![value("b")]],
        );
        bindings.join(
            &[x.clone(), y.clone()],
            vec![vec![value("a"), value("1")], vec![value("c"), value("2")]],
        );
        assert_eq!(bindings.variables(), &[x, y]);
        assert_eq!(bindings.rows(), &[vec![value("a"), value("1")]]);
    }

    #[test]
    fn join_without_common_variables_is_a_cross_product() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let mut bindings = Bindings::initial();
        bindings.join(
            std::slice::from_ref(&x),
            vec![vec![value("a")], vec![value("b")]],
        );
        bindings.join(
            std::slice::from_ref(&y),
            vec![vec![value("1")], vec![value("2")]],
        );
        assert_eq!(bindings.rows().len(), 4);
        // Outer row order is preserved; inner matches follow within.
        assert_eq!(bindings.rows()[0], vec![value("a"), value("1")]);
        assert_eq!(bindings.rows()[1], vec![value("a"), value("2")]);
        assert_eq!(bindings.rows()[2], vec![value("b"), value("1")]);
    }

    #[test]
    fn known_values_projects_a_set() {
        let x = Variable::new("x");
        let mut bindings = Bindings::initial();
        bindings.join(
            std::slice::from_ref(&x),
            vec![vec![value("a")], vec![value("a")], vec![value("b")]],
        );
        assert_eq!(
            bindings.known_values(&x),
            Some(vec![value("a"), value("b")])
        );
        assert_eq!(bindings.known_values(&Variable::new("other")), None);
    }
}
