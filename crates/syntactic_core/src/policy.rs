//! Token policies: values which must appear (whitelist) and values which must not (blacklist).
//!
//! Matching is done on lexical tokens, never on raw text, so a keyword inside a comment or a
//! string literal is not an occurrence of that keyword.

use crate::error::{ConfigError, ListKind};
use crate::lang::{Language, LexToken, TokenClass};
use crate::report::{Flags, PolicyResult, Range};
use crate::util::find_best_match_for_name;
use crate::TokenizeError;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every occurrence of every token value, grouped by token class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenIndex {
    classes: BTreeMap<TokenClass, BTreeMap<String, Vec<Range>>>,
}

impl TokenIndex {
    /// Index a token stream, occurrences are kept in stream order.
    pub fn build(tokens: impl IntoIterator<Item = LexToken>) -> Self {
        let mut index = Self::default();
        for token in tokens {
            index
                .classes
                .entry(token.class)
                .or_default()
                .entry(token.value)
                .or_default()
                .push(token.range);
        }
        index
    }

    pub fn tokenize(language: &dyn Language, text: &str) -> Result<Self, TokenizeError> {
        Ok(Self::build(language.tokenize(text)?))
    }

    /// All occurrences of a value, empty if it never occurs.
    pub fn get(&self, class: TokenClass, value: &str) -> &[Range] {
        self.classes
            .get(&class)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, class: TokenClass, value: &str) -> bool {
        !self.get(class, value).is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = (TokenClass, &BTreeMap<String, Vec<Range>>)> {
        self.classes.iter().map(|(class, values)| (*class, values))
    }
}

/// An uncompiled policy as written by an instructor, token kinds are still plain names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<BTreeMap<String, Vec<String>>>,
}

type TokenList = BTreeMap<TokenClass, BTreeSet<String>>;

/// A validated policy which can verify any number of submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    whitelist: TokenList,
    blacklist: TokenList,
}

impl Policy {
    /// Validate a spec. Every problem with it is reported here and never during verification.
    pub fn compile(spec: PolicySpec) -> Result<Self, ConfigError> {
        let whitelist = compile_list(spec.whitelist, ListKind::Whitelist)?;
        let blacklist = compile_list(spec.blacklist, ListKind::Blacklist)?;

        for (class, values) in &whitelist {
            if let Some(value) = blacklist
                .get(class)
                .and_then(|forbidden| values.intersection(forbidden).next())
            {
                return Err(ConfigError::Contradiction {
                    kind: class.to_string(),
                    value: value.clone(),
                });
            }
        }

        debug!(
            "compiled policy with {} required and {} forbidden values",
            whitelist.values().map(BTreeSet::len).sum::<usize>(),
            blacklist.values().map(BTreeSet::len).sum::<usize>()
        );
        Ok(Self {
            whitelist,
            blacklist,
        })
    }

    pub fn whitelist(&self) -> impl Iterator<Item = (TokenClass, &str)> {
        pairs(&self.whitelist)
    }

    pub fn blacklist(&self) -> impl Iterator<Item = (TokenClass, &str)> {
        pairs(&self.blacklist)
    }

    /// Tokenize `text` and check it against both lists.
    pub fn verify(&self, language: &dyn Language, text: &str) -> Result<PolicyResult, TokenizeError> {
        let index = TokenIndex::tokenize(language, text)?;
        Ok(self.check(&index))
    }

    /// Check an existing token index against both lists.
    pub fn check(&self, index: &TokenIndex) -> PolicyResult {
        let mut flags = Flags::default();

        for (class, value) in self.whitelist() {
            if !index.contains(class, value) {
                flags.flag_missing(class, value);
            }
        }
        for (class, value) in self.blacklist() {
            let occurrences = index.get(class, value);
            if !occurrences.is_empty() {
                flags.flag_forbidden(class, value, occurrences);
            }
        }

        trace!(
            "policy verification: {} missing kinds, {} forbidden kinds",
            flags.whitelist.len(),
            flags.blacklist.len()
        );
        PolicyResult::from_flags(flags)
    }
}

fn pairs(list: &TokenList) -> impl Iterator<Item = (TokenClass, &str)> {
    list.iter()
        .flat_map(|(class, values)| values.iter().map(move |value| (*class, value.as_str())))
}

fn compile_list(
    list: Option<BTreeMap<String, Vec<String>>>,
    kind: ListKind,
) -> Result<TokenList, ConfigError> {
    let mut compiled = TokenList::new();

    for (name, values) in list.unwrap_or_default() {
        let class = name.parse::<TokenClass>().map_err(|_| ConfigError::UnknownKind {
            list: kind,
            suggestion: find_best_match_for_name(
                TokenClass::ALL.iter().map(|class| class.as_str()),
                &name,
            )
            .map(ToString::to_string),
            kind: name.clone(),
        })?;

        let entry = compiled.entry(class).or_default();
        for value in values {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue {
                    list: kind,
                    kind: name,
                });
            }
            if value.trim() != value {
                return Err(ConfigError::PaddedValue {
                    list: kind,
                    kind: name,
                    value,
                });
            }
            entry.insert(value);
        }
    }
    Ok(compiled)
}
