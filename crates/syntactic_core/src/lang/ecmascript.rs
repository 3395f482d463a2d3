//! ECMAScript support backed by the rslint parser and lexer.
//!
//! Node kinds are the names of rslint's `SyntaxKind`s, for example `FOR_STMT`, `IF_STMT`
//! or `CALL_EXPR`. The rslint tree is lossless, so comments are found as `COMMENT` tokens
//! and whitespace has to be skipped when computing the line a node starts on.

use super::{Language, LexToken, RawNode, TokenClass};
use crate::report::{Position, Range};
use crate::source::SourceMap;
use crate::template::ElideSet;
use crate::{ParseError, TokenizeError};
use rslint_lexer::{Lexer, Token, T};
use rslint_parser::{parse_module, parse_text, NodeOrToken, ParserError, SyntaxKind, SyntaxNode};
use serde::{Deserialize, Serialize};

/// Wrapper kinds which only hold a single construct and carry no structure of their own.
const DEFAULT_ELIDED: [&str; 9] = [
    "BLOCK_STMT",
    "EXPR_STMT",
    "DECLARATOR",
    "NAME",
    "NAME_REF",
    "LITERAL",
    "CONDITION",
    "ARG_LIST",
    "GROUPING_EXPR",
];

/// Reserved words which the lexer treats as identifiers but policies know as keywords.
const CONTEXTUAL_KEYWORDS: [&str; 3] = ["let", "yield", "enum"];

/// How source text is parsed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Script,
    Module,
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Script
    }
}

/// JavaScript, parsed as either a script or a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EcmaScript {
    pub goal: Goal,
}

impl EcmaScript {
    pub fn script() -> Self {
        Self { goal: Goal::Script }
    }

    pub fn module() -> Self {
        Self { goal: Goal::Module }
    }
}

impl Language for EcmaScript {
    fn name(&self) -> &'static str {
        "ecmascript"
    }

    fn parse(&self, text: &str) -> Result<RawNode, ParseError> {
        let (root, errors) = match self.goal {
            Goal::Script => {
                let parse = parse_text(text, 0);
                (parse.syntax(), parse.errors().to_vec())
            }
            Goal::Module => {
                let parse = parse_module(text, 0);
                (parse.syntax(), parse.errors().to_vec())
            }
        };

        let map = SourceMap::new(text);
        if let Some(err) = errors.first() {
            let (message, position) = describe(err, &map);
            return Err(ParseError { message, position });
        }
        Ok(lower(&root, &map))
    }

    fn tokenize(&self, text: &str) -> Result<Vec<LexToken>, TokenizeError> {
        let map = SourceMap::new(text);
        let mut tokens = vec![];
        let mut offset = 0;

        for (Token { kind, len }, err) in Lexer::from_str(text, 0) {
            if let Some(err) = err {
                let (message, position) = describe(&err, &map);
                return Err(TokenizeError { message, position });
            }
            let start = offset;
            offset += len;

            let value = text.get(start..offset).unwrap_or_default();
            if let Some(class) = classify(kind, value) {
                tokens.push(LexToken {
                    class,
                    value: value.to_string(),
                    range: Range::new(map.position(start), map.position(offset)),
                });
            }
        }
        Ok(tokens)
    }

    fn default_elided(&self) -> ElideSet {
        DEFAULT_ELIDED.iter().copied().collect()
    }
}

fn kind_name(kind: SyntaxKind) -> String {
    format!("{:?}", kind)
}

/// The token class of a lexer token, `None` for trivia, shebangs and the end of file.
fn classify(kind: SyntaxKind, text: &str) -> Option<TokenClass> {
    if kind.is_trivia() || kind == SyntaxKind::SHEBANG || kind == SyntaxKind::EOF {
        return None;
    }

    let class = match kind {
        T![true] | T![false] => TokenClass::Boolean,
        T![null] => TokenClass::Null,
        T![ident] if CONTEXTUAL_KEYWORDS.contains(&text) => TokenClass::Keyword,
        T![ident] => TokenClass::Identifier,
        SyntaxKind::NUMBER => TokenClass::Numeric,
        SyntaxKind::STRING => TokenClass::String,
        SyntaxKind::REGEX => TokenClass::RegularExpression,
        SyntaxKind::BACKTICK | SyntaxKind::TEMPLATE_CHUNK | SyntaxKind::DOLLARCURLY => {
            TokenClass::Template
        }
        k if k.is_keyword() => TokenClass::Keyword,
        k if k.is_punct() => TokenClass::Punctuator,
        _ => return None,
    };
    Some(class)
}

fn describe(err: &ParserError, map: &SourceMap) -> (String, Option<Position>) {
    let position = err
        .primary
        .as_ref()
        .map(|label| map.position(label.span.range.start));
    (err.title.to_string(), position)
}

/// The line of the first non-trivia token of a node, rslint attaches leading
/// comments and whitespace to some nodes.
fn start_line(node: &SyntaxNode, map: &SourceMap) -> usize {
    let offset = node
        .descendants_with_tokens()
        .filter_map(|elem| elem.into_token())
        .find(|tok| !tok.kind().is_trivia())
        .map_or_else(
            || usize::from(node.text_range().start()),
            |tok| usize::from(tok.text_range().start()),
        );
    map.line(offset)
}

fn comment_body(raw: &str) -> String {
    raw.strip_prefix("//")
        .or_else(|| {
            raw.strip_prefix("/*")
                .map(|body| body.strip_suffix("*/").unwrap_or(body))
        })
        .unwrap_or(raw)
        .trim()
        .to_string()
}

fn lower(node: &SyntaxNode, map: &SourceMap) -> RawNode {
    let children = node
        .children_with_tokens()
        .filter_map(|elem| match elem {
            NodeOrToken::Node(child) => Some(lower(&child, map)),
            NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::COMMENT => {
                let end = usize::from(tok.text_range().end());
                Some(RawNode::comment(comment_body(&tok.text().to_string()), map.line(end)))
            }
            NodeOrToken::Token(_) => None,
        })
        .collect();

    RawNode::Node {
        kind: kind_name(node.kind()),
        line: start_line(node, map),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &RawNode, out: &mut Vec<String>) {
        match node {
            RawNode::Node { kind, children, .. } => {
                out.push(kind.clone());
                children.iter().for_each(|child| kinds(child, out));
            }
            RawNode::Comment { .. } => {}
            RawNode::Opaque { children } => children.iter().for_each(|child| kinds(child, out)),
        }
    }

    fn comments(node: &RawNode, out: &mut Vec<(String, usize)>) {
        match node {
            RawNode::Comment { text, end_line } => out.push((text.clone(), *end_line)),
            RawNode::Node { children, .. } | RawNode::Opaque { children } => {
                children.iter().for_each(|child| comments(child, out))
            }
        }
    }

    #[test]
    fn comment_bodies_lose_delimiters() {
        assert_eq!(comment_body("// add an if"), "add an if");
        assert_eq!(comment_body("/* a loop */"), "a loop");
        assert_eq!(comment_body("/**/"), "");
        assert_eq!(comment_body("//"), "");
    }

    #[test]
    fn parses_statement_kinds() {
        let tree = EcmaScript::script()
            .parse("for (var i = 0; i < 3; i++) {\n  if (i) {\n    foo(i);\n  }\n}\n")
            .unwrap();
        let mut found = vec![];
        kinds(&tree, &mut found);
        for kind in &["FOR_STMT", "IF_STMT", "CALL_EXPR"] {
            assert!(found.iter().any(|k| k == kind), "missing {} in {:?}", kind, found);
        }
    }

    #[test]
    fn node_lines_skip_leading_comments() {
        let tree = EcmaScript::script()
            .parse("\n// note\nwhile (x) {}\n")
            .unwrap();

        fn find_line(node: &RawNode, wanted: &str) -> Option<usize> {
            match node {
                RawNode::Node {
                    kind,
                    line,
                    children,
                } => {
                    if kind == wanted {
                        return Some(*line);
                    }
                    children.iter().find_map(|child| find_line(child, wanted))
                }
                RawNode::Opaque { children } => {
                    children.iter().find_map(|child| find_line(child, wanted))
                }
                RawNode::Comment { .. } => None,
            }
        }
        assert_eq!(find_line(&tree, "WHILE_STMT"), Some(3));

        let mut found = vec![];
        comments(&tree, &mut found);
        assert_eq!(found, vec![("note".to_string(), 2)]);
    }

    #[test]
    fn syntax_errors_fail_the_parse() {
        let err = EcmaScript::script().parse("for (;;").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn tokens_are_classified() {
        let tokens = EcmaScript::script()
            .tokenize("var ok = true; // while\nif (x == null) f('s', 2);")
            .unwrap();
        let pairs = tokens
            .iter()
            .map(|tok| (tok.class, tok.value.as_str()))
            .collect::<Vec<_>>();

        assert!(pairs.contains(&(TokenClass::Keyword, "var")));
        assert!(pairs.contains(&(TokenClass::Keyword, "if")));
        assert!(pairs.contains(&(TokenClass::Identifier, "ok")));
        assert!(pairs.contains(&(TokenClass::Boolean, "true")));
        assert!(pairs.contains(&(TokenClass::Null, "null")));
        assert!(pairs.contains(&(TokenClass::Numeric, "2")));
        assert!(pairs.contains(&(TokenClass::String, "'s'")));
        assert!(pairs.contains(&(TokenClass::Punctuator, ";")));
        assert!(!pairs.iter().any(|(_, value)| value.contains("while")));
    }

    #[test]
    fn token_ranges_are_located() {
        let tokens = EcmaScript::script().tokenize("a;\n  while(b){}").unwrap();
        let kw = tokens.iter().find(|tok| tok.value == "while").unwrap();
        assert_eq!(kw.range, Range::new(Position::new(2, 2), Position::new(2, 7)));
    }

    fn classes_of(text: &str) -> Vec<(TokenClass, String)> {
        EcmaScript::script()
            .tokenize(text)
            .unwrap()
            .into_iter()
            .map(|tok| (tok.class, tok.value))
            .collect()
    }

    #[test]
    fn reserved_words_lexed_as_identifiers_are_keywords() {
        let pairs = classes_of("let type = require('fs');");
        assert_eq!(pairs[0], (TokenClass::Keyword, "let".to_string()));
        assert!(pairs.contains(&(TokenClass::Identifier, "type".to_string())));
        assert!(pairs.contains(&(TokenClass::Identifier, "require".to_string())));
    }

    #[test]
    fn shebangs_are_not_tokens() {
        let pairs = classes_of("#!/usr/bin/env node
var a = 1;");
        assert_eq!(pairs[0], (TokenClass::Keyword, "var".to_string()));
        assert!(!pairs.iter().any(|(_, value)| value.starts_with("#!")));
    }

    #[test]
    fn template_literals_are_split_into_parts() {
        let pairs = classes_of("`a${b}c`");
        assert!(pairs.contains(&(TokenClass::Template, "`".to_string())));
        assert!(pairs.contains(&(TokenClass::Template, "${".to_string())));
        assert!(pairs.contains(&(TokenClass::Identifier, "b".to_string())));
    }
}
