//! Built-in example programs, assembled through the database API

use anyhow::Result;
use datalog_eval::Database;
use datalog_parser::{Atom, Term};

fn con(name: &str) -> Term {
    Term::constant(name)
}

/// Two-generation family tree with a recursive `ancestor` rule.
/// Returns the database and the goal `ancestor(X, carol)`.
fn ancestor_program() -> Result<(Database, Atom)> {
    let mut db = Database::new();
    let parent = db.predicate("parent", 2)?;
    let ancestor = db.predicate("ancestor", 2)?;
    let x = db.variable("X")?;
    let y = db.variable("Y")?;
    let z = db.variable("Z")?;

    db.add_fact(parent.atom(vec![con("alice"), con("bob")]))?;
    db.add_fact(parent.atom(vec![con("bob"), con("carol")]))?;

    db.add_rule(
        ancestor.atom(vec![x.clone(), y.clone()]),
        vec![parent.atom(vec![x.clone(), y.clone()])],
    )?;
    db.add_rule(
        ancestor.atom(vec![x.clone(), y.clone()]),
        vec![
            parent.atom(vec![x.clone(), z.clone()]),
            ancestor.atom(vec![z, y]),
        ],
    )?;

    Ok((db, ancestor.atom(vec![x, con("carol")])))
}

/// Escape-the-room puzzle: stack the box, reach the screwdriver, pry up the
/// tile, take the key, open the chest, take the crowbar, open the door.
/// Returns the database and the goal `can_open(player, door)`.
fn escape_room_program() -> Result<(Database, Atom)> {
    let mut db = Database::new();
    let has = db.predicate("has", 2)?;
    let inside = db.predicate("inside", 2)?;
    let can_open = db.predicate("can_open", 2)?;
    let reachable = db.predicate("reachable", 1)?;
    let on = db.predicate("on", 2)?;
    let stack = db.predicate("stack", 1)?;
    let player = con("player");

    db.add_fact(has.atom(vec![player.clone(), con("box")]))?;
    db.add_fact(inside.atom(vec![con("chest"), con("crowbar")]))?;
    db.add_fact(inside.atom(vec![con("tile"), con("key")]))?;
    db.add_fact(on.atom(vec![con("shelf"), con("screwdriver")]))?;
    db.add_fact(stack.atom(vec![con("box")]))?;

    let holds = |item: &str| has.atom(vec![player.clone(), con(item)]);
    let opens = |thing: &str| can_open.atom(vec![player.clone(), con(thing)]);

    db.add_rule(opens("chest"), vec![holds("key")])?;
    db.add_rule(
        holds("crowbar"),
        vec![
            opens("chest"),
            inside.atom(vec![con("chest"), con("crowbar")]),
        ],
    )?;
    db.add_rule(opens("tile"), vec![holds("screwdriver")])?;
    db.add_rule(
        holds("key"),
        vec![opens("tile"), inside.atom(vec![con("tile"), con("key")])],
    )?;
    db.add_rule(
        reachable.atom(vec![con("screwdriver")]),
        vec![
            holds("box"),
            stack.atom(vec![con("box")]),
            on.atom(vec![con("shelf"), con("screwdriver")]),
        ],
    )?;
    db.add_rule(
        holds("screwdriver"),
        vec![reachable.atom(vec![con("screwdriver")])],
    )?;
    db.add_rule(opens("door"), vec![holds("crowbar")])?;

    Ok((db, opens("door")))
}

pub fn ancestor() -> Result<()> {
    let (mut db, goal) = ancestor_program()?;
    db.infer()?;

    println!("?- {}.", goal);
    for answer in db.query(&[goal])? {
        println!("{}", answer);
    }
    Ok(())
}

pub fn escape_room() -> Result<()> {
    let (mut db, goal) = escape_room_program()?;
    let stats = db.infer()?;
    println!(
        "derived {} facts in {} passes",
        stats.facts_derived, stats.iterations
    );

    let answers = db.query(&[goal])?.count();
    println!("Can open door? {}", if answers > 0 { "Yes" } else { "No" });
    Ok(())
}
