//! Errors raised by the engine.
//!
//! Only malformed input and malformed configuration are errors. A submission
//! which is missing structure or breaks a token policy is an expected outcome
//! and is reported through the result types in [`report`](crate::report).

use crate::report::Position;
use std::fmt;
use thiserror::Error;

/// Which list of a policy a configuration problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ListKind::Whitelist => f.write_str("whitelist"),
            ListKind::Blacklist => f.write_str("blacklist"),
        }
    }
}

/// The source text could not be parsed into a syntax tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to parse source{}: {message}", at(.position))]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

/// The source text could not be split into lexical tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to tokenize source{}: {message}", at(.position))]
pub struct TokenizeError {
    pub message: String,
    pub position: Option<Position>,
}

/// A token policy which cannot be compiled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown token kind '{kind}' in {list}{}", did_you_mean(.suggestion))]
    UnknownKind {
        list: ListKind,
        kind: String,
        suggestion: Option<String>,
    },
    #[error("empty value for token kind '{kind}' in {list}")]
    EmptyValue { list: ListKind, kind: String },
    #[error("value '{value}' for token kind '{kind}' in {list} has surrounding whitespace")]
    PaddedValue {
        list: ListKind,
        kind: String,
        value: String,
    },
    #[error("'{value}' ({kind}) is both required by the whitelist and forbidden by the blacklist")]
    Contradiction { kind: String, value: String },
}

/// Any error produced while assessing a submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn at(position: &Option<Position>) -> String {
    position.map_or_else(String::new, |pos| format!(" at {}", pos))
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map_or_else(String::new, |s| format!(". did you mean '{}'?", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_position() {
        let err = ParseError {
            message: "expected an expression".into(),
            position: Some(Position::new(3, 4)),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse source at line 3, column 4: expected an expression"
        );
    }

    #[test]
    fn unknown_kind_display_suggests() {
        let err = ConfigError::UnknownKind {
            list: ListKind::Blacklist,
            kind: "Keywrd".into(),
            suggestion: Some("Keyword".into()),
        };
        assert_eq!(
            err.to_string(),
            "unknown token kind 'Keywrd' in blacklist. did you mean 'Keyword'?"
        );

        let err = ConfigError::UnknownKind {
            list: ListKind::Whitelist,
            kind: "Banana".into(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown token kind 'Banana' in whitelist");
    }
}
