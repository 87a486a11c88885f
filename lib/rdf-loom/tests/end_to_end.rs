use anyhow::Result;
use rdf_loom::model::{Literal, NamedNode, Resource, Statement, StatementTemplate, Variable};
use rdf_loom::store::{
    CompareOp, LiteralFilter, MemoryStore, ModifiableSource, SelectableSource, UnionSource,
};
use rdf_loom::{BindingCollector, Query};

fn node(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{local}"))
}

#[test]
fn store_and_query_round_trip() -> Result<()> {
    let mut store = MemoryStore::new();
    let age = node("age");
    for (person, years) in [("alice", "42"), ("bob", "17")] {
        store.add(Statement::new(
            node(person),
            age.clone(),
            Literal::new_simple_literal(years),
        ))?;
    }

    let person = Variable::new("person");
    let years = Variable::new("years");
    let query = Query::new()
        .pattern(Statement::new(person.clone(), age, years.clone()))
        .literal_filter(
            years,
            LiteralFilter::Compare(CompareOp::Ge, Literal::new_simple_literal("18")),
        );

    let mut results = BindingCollector::new();
    query.execute(&[&store], &mut results)?;

    assert_eq!(
        results.column(&person).unwrap(),
        vec![&Resource::from(node("alice"))]
    );
    Ok(())
}

#[test]
fn union_of_stores_behaves_like_one_source() -> Result<()> {
    let mut facts = MemoryStore::new();
    facts.add(Statement::new(node("alice"), node("knows"), node("bob")))?;
    let mut more_facts = MemoryStore::new();
    more_facts.add(Statement::new(node("bob"), node("knows"), node("carol")))?;

    let union = UnionSource::new(vec![Box::new(facts), Box::new(more_facts)]);

    let x = Variable::new("x");
    let z = Variable::new("z");
    let y = Variable::new("y");
    let query = Query::new()
        .pattern(Statement::new(x.clone(), node("knows"), y.clone()))
        .pattern(Statement::new(y, node("knows"), z.clone()));

    let mut results = BindingCollector::new();
    query.execute(&[&union], &mut results)?;

    assert_eq!(results.rows().len(), 1);
    assert_eq!(results.column(&x).unwrap(), vec![&Resource::from(node("alice"))]);
    assert_eq!(results.column(&z).unwrap(), vec![&Resource::from(node("carol"))]);
    Ok(())
}

#[test]
fn mutation_is_visible_to_later_queries() -> Result<()> {
    let mut store = MemoryStore::new();
    store.add(Statement::new(node("alice"), node("knows"), node("bob")))?;
    store.remove(&StatementTemplate::new(
        Some(node("alice").into()),
        None,
        None,
    ))?;
    store.add(Statement::new(node("alice"), node("knows"), node("carol")))?;

    let who = Variable::new("who");
    let query = Query::new().pattern(Statement::new(node("alice"), node("knows"), who.clone()));

    let mut results = BindingCollector::new();
    query.execute(&[&store], &mut results)?;

    assert_eq!(results.column(&who).unwrap(), vec![&Resource::from(node("carol"))]);
    assert!(!store.contains(&StatementTemplate::new(
        None,
        None,
        Some(node("bob").into()),
    ))?);
    Ok(())
}
