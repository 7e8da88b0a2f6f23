use chumsky::prelude::*;
use std::fmt;

use crate::Span;

pub type SpannedToken = (Token, Span);
pub type LexError = Simple<char, Span>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Lowercase- or digit-leading name: constants, functors, predicates
    Ident(String),
    /// Uppercase-leading name
    Variable(String),
    RuleSep,
    QuerySep,
    LParen,
    RParen,
    Comma,
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(text) => write!(f, "{}", text),
            Token::Variable(text) => write!(f, "{}", text),
            Token::RuleSep => write!(f, ":-"),
            Token::QuerySep => write!(f, "?-"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
        }
    }
}

fn name() -> impl Parser<char, Token, Error = LexError> + Clone {
    filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|name: String, span| match name.chars().next() {
            Some(first) if first.is_ascii_uppercase() => Ok(Token::Variable(name)),
            Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {
                Ok(Token::Ident(name))
            }
            _ => Err(LexError::custom(
                span,
                format!("`{}` must start with a letter or digit", name),
            )),
        })
        .labelled("name")
}

fn line_comment() -> impl Parser<char, (), Error = LexError> + Clone {
    just('%')
        .then(filter(|c| *c != '\n').repeated())
        .ignored()
        .labelled("comment")
}

fn spacing() -> impl Parser<char, (), Error = LexError> + Clone {
    line_comment()
        .or(text::whitespace().at_least(1).ignored())
        .repeated()
        .ignored()
}

pub fn lexer() -> impl Parser<char, Vec<SpannedToken>, Error = LexError> + Clone {
    let punct = choice((
        just(":-").to(Token::RuleSep),
        just("?-").to(Token::QuerySep),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just('.').to(Token::Dot),
    ));

    let token = choice((name(), punct))
        .map_with_span(|token, span| (token, span))
        .padded_by(spacing());

    spacing()
        .ignore_then(token.repeated())
        .then_ignore(end())
}
