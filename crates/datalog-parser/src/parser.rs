//! Recursive-descent parser for terms and Datalog programs.
//!
//! Supports parsing:
//! - Terms: `a`, `X`, `f(X, g(Y), a)`, `f()`
//! - Atoms: `parent(alice, bob)`, `done`
//! - Facts: `parent(alice, bob).`
//! - Rules: `ancestor(X, Y) :- parent(X, Y).`
//! - Queries: `?- ancestor(X, carol).`

use chumsky::prelude::*;
use chumsky::error::SimpleReason;
use chumsky::stream::Stream;
use internment::Intern;
use std::fmt;
use std::hash::Hash;

use crate::ast::*;
use crate::token::{lexer, LexError, SpannedToken, Token};
use crate::span::spanned_chars;
use crate::{Span, SrcId};

type ParserError = Simple<Token, Span>;

/// Malformed input. Parsing never returns a partial term.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("{}", describe(.0))]
    Lex(LexError),
    #[error("{}", describe(.0))]
    Parse(ParserError),
}

impl ParseError {
    /// Where in the source the error was detected
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Parse(e) => e.span(),
        }
    }
}

fn describe<T: fmt::Display + Hash + Eq>(error: &Simple<T, Span>) -> String {
    match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed delimiter `{}`", delimiter),
        SimpleReason::Unexpected => {
            let found = match error.found() {
                Some(found) => format!("`{}`", found),
                None => "end of input".to_string(),
            };
            let mut expected: Vec<String> = error
                .expected()
                .map(|e| match e {
                    Some(e) => format!("`{}`", e),
                    None => "end of input".to_string(),
                })
                .collect();
            expected.sort();
            let context = match error.label() {
                Some(label) => format!(" while parsing {}", label),
                None => String::new(),
            };
            if expected.is_empty() {
                format!("unexpected {}{}", found, context)
            } else {
                format!(
                    "unexpected {}{}, expected {}",
                    found,
                    context,
                    expected.join(" or ")
                )
            }
        }
    }
}

fn ident_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! {
        Token::Ident(ident) => ident,
    }
    .labelled("identifier")
}

fn variable_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! {
        Token::Variable(ident) => ident,
    }
    .labelled("variable")
}

fn token(kind: Token) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    just(kind)
}

fn lex_with_src(input: &str, src: SrcId) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    let stream = Stream::from_iter(Span::end_of(src, input), spanned_chars(input, src));
    lexer()
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Lex).collect())
}

#[cfg(test)]
fn lex(input: &str) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    lex_with_src(input, SrcId::empty())
}

fn parse_with<T>(
    parser: impl Parser<Token, T, Error = ParserError>,
    input: &str,
    src: SrcId,
) -> Result<T, Vec<ParseError>> {
    let tokens = lex_with_src(input, src)?;
    let stream = Stream::from_iter(Span::end_of(src, input), tokens.into_iter());
    parser
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Parse).collect())
}

/// Parse a term: variable, constant, or application
fn term() -> impl Parser<Token, Term, Error = ParserError> + Clone {
    recursive(|term| {
        let args = term
            .separated_by(token(Token::Comma))
            .delimited_by(token(Token::LParen), token(Token::RParen));

        let variable = variable_token()
            .then(args.clone().or_not())
            .try_map(|(name, args), span| match args {
                Some(_) => Err(ParserError::custom(
                    span,
                    format!(
                        "functor `{}` must start with a lowercase letter or digit",
                        name
                    ),
                )),
                None => Ok(Term::Variable(Intern::new(name))),
            });

        let application_or_constant =
            ident_token()
                .then(args.or_not())
                .map(|(name, args)| match args {
                    Some(args) => Term::Application(Intern::new(name), args),
                    None => Term::Constant(Intern::new(name)),
                });

        choice((variable, application_or_constant))
    })
    .labelled("term")
}

/// Parse an atom: `pred` or `pred(t1, ..., tn)`
fn atom() -> impl Parser<Token, Atom, Error = ParserError> + Clone {
    ident_token()
        .then(
            term()
                .separated_by(token(Token::Comma))
                .delimited_by(token(Token::LParen), token(Token::RParen))
                .or_not(),
        )
        .map(|(predicate, terms)| Atom {
            predicate: Intern::new(predicate),
            terms: terms.unwrap_or_default(),
        })
        .labelled("atom")
}

fn conjunction() -> impl Parser<Token, Vec<Atom>, Error = ParserError> + Clone {
    atom().separated_by(token(Token::Comma)).at_least(1)
}

/// Parse a fact: atom.
fn fact() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    atom()
        .then_ignore(token(Token::Dot))
        .map(Statement::Fact)
        .labelled("fact")
}

/// Parse a rule: head :- body.
fn rule() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    atom()
        .then_ignore(token(Token::RuleSep))
        .then(conjunction())
        .then_ignore(token(Token::Dot))
        .map(|(head, body)| Statement::Rule(Rule { head, body }))
        .labelled("rule")
}

fn query_body() -> impl Parser<Token, Query, Error = ParserError> + Clone {
    token(Token::QuerySep)
        .ignore_then(conjunction())
        .then_ignore(token(Token::Dot))
        .map(|body| Query { body })
        .labelled("query")
}

/// Parse a statement
fn statement() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    choice((query_body().map(Statement::Query), rule(), fact())).labelled("statement")
}

/// Parse a single term from text, e.g. `f(X,g(Y),a)`
pub fn parse_term(input: &str, src: SrcId) -> Result<Term, Vec<ParseError>> {
    parse_with(term().then_ignore(end()), input, src)
}

/// Parse a single atom from text, e.g. `ancestor(X, carol)`
pub fn parse_atom(input: &str, src: SrcId) -> Result<Atom, Vec<ParseError>> {
    parse_with(atom().then_ignore(end()), input, src)
}

/// Parse a Datalog program from text
pub fn parse_program(input: &str, src: SrcId) -> Result<Program, Vec<ParseError>> {
    let program = statement()
        .repeated()
        .map(|statements| Program { statements })
        .then_ignore(end())
        .labelled("program");

    parse_with(program, input, src)
}

/// Parse a Datalog query from text: `?- a(X), b(X).`
pub fn parse_query(input: &str, src: SrcId) -> Result<Query, Vec<ParseError>> {
    parse_with(query_body().then_ignore(end()), input, src)
}
