//! The seam between the engine and a language's syntax analysis.
//!
//! The engine never parses or lexes text itself. A [`Language`] turns source text into
//! two views: a [`RawNode`] tree carrying node kinds, lines and comments, and a flat list of
//! [`LexToken`]s carrying a token class, the literal value and a source range.

mod ecmascript;

pub use self::ecmascript::{EcmaScript, Goal};

use crate::report::Range;
use crate::template::ElideSet;
use crate::{ParseError, TokenizeError};
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

/// A producer of syntax trees and token streams for one language.
///
/// Languages must be [`Send`] and [`Sync`], compiled templates and policies hold one
/// and may be verified from several threads at once.
pub trait Language: Debug + DynClone + Send + Sync {
    /// A short, lowercase name for the language.
    fn name(&self) -> &'static str;

    /// Parse source text into a raw syntax tree.
    ///
    /// Any syntax error fails the whole parse, error recovery results are never returned.
    fn parse(&self, text: &str) -> Result<RawNode, ParseError>;

    /// Split source text into lexical tokens, excluding whitespace and comments.
    fn tokenize(&self, text: &str) -> Result<Vec<LexToken>, TokenizeError>;

    /// The node kinds which should not appear in template paths by default.
    fn default_elided(&self) -> ElideSet;
}

dyn_clone::clone_trait_object!(Language);

/// A node of the tree handed to the simplifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    /// A node with a kind label, starting at `line`.
    Node {
        kind: String,
        line: usize,
        children: Vec<RawNode>,
    },
    /// A comment, which annotates the line following `end_line`.
    Comment { text: String, end_line: usize },
    /// An auxiliary wrapper without a kind label.
    Opaque { children: Vec<RawNode> },
}

impl RawNode {
    pub fn node(kind: impl Into<String>, line: usize, children: Vec<RawNode>) -> Self {
        RawNode::Node {
            kind: kind.into(),
            line,
            children,
        }
    }

    pub fn leaf(kind: impl Into<String>, line: usize) -> Self {
        Self::node(kind, line, vec![])
    }

    pub fn comment(text: impl Into<String>, end_line: usize) -> Self {
        RawNode::Comment {
            text: text.into(),
            end_line,
        }
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken {
    pub class: TokenClass,
    pub value: String,
    pub range: Range,
}

/// The token kinds a policy can refer to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenClass {
    Boolean,
    Identifier,
    Keyword,
    Null,
    Numeric,
    Punctuator,
    String,
    RegularExpression,
    Template,
}

impl TokenClass {
    pub const ALL: [TokenClass; 9] = [
        TokenClass::Boolean,
        TokenClass::Identifier,
        TokenClass::Keyword,
        TokenClass::Null,
        TokenClass::Numeric,
        TokenClass::Punctuator,
        TokenClass::String,
        TokenClass::RegularExpression,
        TokenClass::Template,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Boolean => "Boolean",
            TokenClass::Identifier => "Identifier",
            TokenClass::Keyword => "Keyword",
            TokenClass::Null => "Null",
            TokenClass::Numeric => "Numeric",
            TokenClass::Punctuator => "Punctuator",
            TokenClass::String => "String",
            TokenClass::RegularExpression => "RegularExpression",
            TokenClass::Template => "Template",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_class_names_round_trip() {
        for class in TokenClass::ALL.iter() {
            assert_eq!(class.as_str().parse::<TokenClass>(), Ok(*class));
        }
        assert!("keyword".parse::<TokenClass>().is_err());
    }
}
