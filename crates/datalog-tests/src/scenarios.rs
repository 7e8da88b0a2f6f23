//! End-to-end scenarios
//!
//! Worked examples driven through the public APIs: term text is parsed,
//! unified and resolved; Datalog programs are built either through the
//! database API or from program text, inferred and queried.

use datalog_core::unify;
use datalog_eval::{Database, DatabaseError, EvaluationError, InferenceOptions};
use datalog_parser::{parse_program, parse_query, parse_term, sym, SrcId, Term};
use datalog_safety::check_program_safety;

fn term(text: &str) -> Term {
    parse_term(text, SrcId::empty()).unwrap()
}

fn con(name: &str) -> Term {
    Term::constant(name)
}

// ===== Unification =====

#[test]
fn test_unify_nested_terms_resolve_identically() {
    let lhs = term("f(X,h(X),Y,g(Y))");
    let rhs = term("f(g(Z),W,Z,X)");

    let subst = unify(&lhs, &rhs).expect("terms should unify");
    let resolved = subst.apply(&lhs);
    assert_eq!(resolved, subst.apply(&rhs));
    assert!(resolved.variables().len() <= 1);
}

#[test]
fn test_unify_variable_with_variable() {
    let (x, y) = (Term::var("X"), Term::var("Y"));
    let subst = unify(&x, &y).unwrap();
    assert_eq!(subst.len(), 1);
    assert_eq!(subst.apply(&x), subst.apply(&y));
}

#[test]
fn test_unify_binds_in_argument_order() {
    let subst = unify(&term("f(X, b)"), &term("f(a, Y)")).unwrap();
    assert_eq!(subst.to_string(), "{X = a, Y = b}");
}

#[test]
fn test_unify_failures() {
    // arity mismatch under the same functor
    assert!(unify(&term("f(a)"), &term("f(a, b)")).is_none());
    // clashing functors
    assert!(unify(&term("f(X)"), &term("g(X)")).is_none());
    // clashing constants
    assert!(unify(&term("a"), &term("b")).is_none());
    // zero-arity application is not a constant
    assert!(unify(&term("f()"), &term("f")).is_none());
    // occurs check
    assert!(unify(&term("X"), &term("f(X)")).is_none());
    // X is bound to a, so g(X) cannot become g(b)
    assert!(unify(&term("p(X, g(X))"), &term("p(a, g(b))")).is_none());
}

// ===== Datalog =====

#[test]
fn test_ancestor_query() {
    let mut db = Database::new();
    let parent = db.predicate("parent", 2).unwrap();
    let ancestor = db.predicate("ancestor", 2).unwrap();
    let x = db.variable("X").unwrap();
    let y = db.variable("Y").unwrap();
    let z = db.variable("Z").unwrap();

    db.add_fact(parent.atom(vec![con("alice"), con("bob")]))
        .unwrap();
    db.add_fact(parent.atom(vec![con("bob"), con("carol")]))
        .unwrap();
    db.add_rule(
        ancestor.atom(vec![x.clone(), y.clone()]),
        vec![parent.atom(vec![x.clone(), y.clone()])],
    )
    .unwrap();
    db.add_rule(
        ancestor.atom(vec![x.clone(), y.clone()]),
        vec![
            parent.atom(vec![x.clone(), z.clone()]),
            ancestor.atom(vec![z, y]),
        ],
    )
    .unwrap();

    db.infer().unwrap();

    let mut ancestors: Vec<String> = db
        .query(&[ancestor.atom(vec![x.clone(), con("carol")])])
        .unwrap()
        .map(|answer| answer.apply(&x).to_string())
        .collect();
    ancestors.sort();
    assert_eq!(ancestors, vec!["alice", "bob"]);
}

#[test]
fn test_query_before_infer_sees_only_asserted_facts() {
    let program = parse_program(
        "edge(a, b). edge(b, c).
         path(X, Y) :- edge(X, Y).
         path(X, Z) :- path(X, Y), edge(Y, Z).",
        SrcId::empty(),
    )
    .unwrap();
    let mut db = Database::new();
    db.load_program(&program).unwrap();

    let goal = parse_query("?- path(a, X).", SrcId::empty()).unwrap();
    assert_eq!(db.query(&goal.body).unwrap().count(), 0);

    db.infer().unwrap();
    assert_eq!(db.query(&goal.body).unwrap().count(), 2);
}

#[test]
fn test_program_text_with_queries() {
    let program = parse_program(
        "% family tree
         parent(john, mary).
         parent(mary, jane).
         grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
         ?- grandparent(john, Who).
         ?- grandparent(jane, Who).",
        SrcId::named("family.dl"),
    )
    .unwrap();

    let mut db = Database::new();
    let queries = db.load_program(&program).unwrap();
    db.infer().unwrap();

    let answers: Vec<Vec<_>> = queries
        .iter()
        .map(|query| db.query(&query.body).unwrap().collect())
        .collect();
    assert_eq!(answers[0].len(), 1);
    assert_eq!(answers[0][0].apply(&Term::var("Who")), con("jane"));
    assert!(answers[1].is_empty());
}

#[test]
fn test_escape_room() {
    let mut db = Database::new();
    let has = db.predicate("has", 2).unwrap();
    let inside = db.predicate("inside", 2).unwrap();
    let can_open = db.predicate("can_open", 2).unwrap();
    let reachable = db.predicate("reachable", 1).unwrap();
    let on = db.predicate("on", 2).unwrap();
    let stack = db.predicate("stack", 1).unwrap();
    let player = con("player");

    db.add_fact(has.atom(vec![player.clone(), con("box")])).unwrap();
    db.add_fact(inside.atom(vec![con("chest"), con("crowbar")])).unwrap();
    db.add_fact(inside.atom(vec![con("tile"), con("key")])).unwrap();
    db.add_fact(on.atom(vec![con("shelf"), con("screwdriver")])).unwrap();
    db.add_fact(stack.atom(vec![con("box")])).unwrap();

    let rules = vec![
        (
            can_open.atom(vec![player.clone(), con("chest")]),
            vec![has.atom(vec![player.clone(), con("key")])],
        ),
        (
            has.atom(vec![player.clone(), con("crowbar")]),
            vec![
                can_open.atom(vec![player.clone(), con("chest")]),
                inside.atom(vec![con("chest"), con("crowbar")]),
            ],
        ),
        (
            can_open.atom(vec![player.clone(), con("tile")]),
            vec![has.atom(vec![player.clone(), con("screwdriver")])],
        ),
        (
            has.atom(vec![player.clone(), con("key")]),
            vec![
                can_open.atom(vec![player.clone(), con("tile")]),
                inside.atom(vec![con("tile"), con("key")]),
            ],
        ),
        (
            reachable.atom(vec![con("screwdriver")]),
            vec![
                has.atom(vec![player.clone(), con("box")]),
                stack.atom(vec![con("box")]),
                on.atom(vec![con("shelf"), con("screwdriver")]),
            ],
        ),
        (
            has.atom(vec![player.clone(), con("screwdriver")]),
            vec![reachable.atom(vec![con("screwdriver")])],
        ),
        (
            can_open.atom(vec![player.clone(), con("door")]),
            vec![has.atom(vec![player.clone(), con("crowbar")])],
        ),
    ];
    for (head, body) in rules {
        db.add_rule(head, body).unwrap();
    }

    let stats = db.infer().unwrap();
    // one link of the chain per pass, plus the confirming pass
    assert_eq!(stats.facts_derived, 7);
    assert_eq!(stats.iterations, 8);

    let answers: Vec<_> = db
        .query(&[can_open.atom(vec![player, con("door")])])
        .unwrap()
        .collect();
    assert_eq!(answers.len(), 1);
    assert!(answers[0].is_empty());
}

#[test]
fn test_errors_surface_through_evaluation() {
    let mut db = Database::new();
    let edge = db.predicate("edge", 2).unwrap();

    assert!(matches!(
        db.add_fact(edge.atom(vec![con("a")])),
        Err(DatabaseError::ArityMismatch { expected: 2, found: 1, .. })
    ));
    assert_eq!(
        db.query(&[edge.atom(vec![con("a")])]).err(),
        Some(DatabaseError::ArityMismatch {
            predicate: sym("edge"),
            expected: 2,
            found: 1,
        })
    );

    let error: EvaluationError = DatabaseError::UndefinedPredicate(sym("ghost")).into();
    assert_eq!(error.to_string(), "undefined predicate `ghost`");
}

#[test]
fn test_unsafe_program_is_reported_and_rejected_at_inference() {
    let program = parse_program(
        "person(alice).
         likes(X, Y) :- person(X).",
        SrcId::empty(),
    )
    .unwrap();
    let violations = check_program_safety(program.rules());
    assert_eq!(violations.len(), 1);

    let mut db = Database::new();
    db.load_program(&program).unwrap();
    assert!(matches!(
        db.infer_with(&InferenceOptions::with_max_iterations(5)),
        Err(EvaluationError::NonGroundDerivation { .. })
    ));
}

#[test]
fn test_function_symbols_with_iteration_guard() {
    let program = parse_program(
        "num(z).
         num(s(X)) :- num(X).",
        SrcId::empty(),
    )
    .unwrap();
    let mut db = Database::new();
    db.load_program(&program).unwrap();

    assert_eq!(
        db.infer_with(&InferenceOptions::with_max_iterations(4)),
        Err(EvaluationError::IterationLimit { limit: 4 })
    );
    assert!(db.get("num").unwrap().contains(&[term("s(s(s(s(z))))")]));
}

// ===== Bundled programs =====

fn load(text: &str) -> (Database, Vec<datalog_parser::Query>) {
    let program = parse_program(text, SrcId::named("demo")).unwrap();
    let mut db = Database::new();
    let queries = db.load_program(&program).unwrap();
    (db, queries)
}

#[test]
fn test_bundled_ancestor_program() {
    let (mut db, queries) = load(include_str!("../../../demos/ancestor.dl"));
    db.infer().unwrap();

    let counts: Vec<usize> = queries
        .iter()
        .map(|query| db.query(&query.body).unwrap().count())
        .collect();
    assert_eq!(counts, vec![2, 2, 0]);
}

#[test]
fn test_bundled_escape_room_program() {
    let (mut db, queries) = load(include_str!("../../../demos/escape_room.dl"));
    assert!(db.check_safety().is_empty());
    db.infer().unwrap();

    assert_eq!(db.query(&queries[0].body).unwrap().count(), 1);
    let mut items: Vec<String> = db
        .query(&queries[1].body)
        .unwrap()
        .map(|answer| answer.apply(&Term::var("Item")).to_string())
        .collect();
    items.sort();
    assert_eq!(items, vec!["box", "crowbar", "key", "screwdriver"]);
}

#[test]
fn test_bundled_peano_program_needs_a_guard() {
    let (mut db, queries) = load(include_str!("../../../demos/peano.dl"));
    assert!(matches!(
        db.infer_with(&InferenceOptions::with_max_iterations(5)),
        Err(EvaluationError::IterationLimit { limit: 5 })
    ));
    assert_eq!(db.query(&queries[0].body).unwrap().count(), 1);
}
