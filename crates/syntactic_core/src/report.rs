//! Result shapes returned to the caller by template and policy verification.

use crate::lang::TokenClass;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A location in source text. Lines are 1-based, columns are 0-based and counted in chars.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The source range of a single token occurrence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// The outcome of verifying a submission against a structural template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateResult {
    /// Whether every path of the template was found in the submission.
    pub status: bool,
    /// Template paths the submission does not contain.
    pub missing: Vec<String>,
    /// Hints taken from template comments, keyed by template line.
    pub hints: BTreeMap<usize, String>,
}

/// Whitelist omissions and blacklist hits of a policy verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// Required values which never occur. These carry no location.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub whitelist: BTreeMap<TokenClass, BTreeSet<String>>,
    /// Forbidden values which occur, with every occurrence.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub blacklist: BTreeMap<TokenClass, BTreeMap<String, Vec<Range>>>,
}

impl Flags {
    pub fn is_empty(&self) -> bool {
        self.whitelist.is_empty() && self.blacklist.is_empty()
    }

    pub(crate) fn flag_missing(&mut self, class: TokenClass, value: &str) {
        self.whitelist
            .entry(class)
            .or_default()
            .insert(value.to_string());
    }

    pub(crate) fn flag_forbidden(&mut self, class: TokenClass, value: &str, ranges: &[Range]) {
        self.blacklist
            .entry(class)
            .or_default()
            .insert(value.to_string(), ranges.to_vec());
    }
}

/// The outcome of verifying a submission against a token policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyResult {
    pub status: bool,
    pub flags: Flags,
}

impl PolicyResult {
    pub(crate) fn from_flags(flags: Flags) -> Self {
        Self {
            status: flags.is_empty(),
            flags,
        }
    }
}

/// The merged outcome of every check run on one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub passing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyResult>,
}

impl Report {
    /// Merge the results of the two independent checks.
    pub fn merge(template: Option<TemplateResult>, policy: Option<PolicyResult>) -> Self {
        let passing = template.as_ref().map_or(true, |res| res.status)
            && policy.as_ref().map_or(true, |res| res.status);
        Self {
            passing,
            template,
            policy,
        }
    }

    /// Itemized feedback for this report.
    ///
    /// Template hints come first in line order, then blacklist violations,
    /// then whitelist omissions.
    pub fn feedback(&self) -> Vec<Feedback> {
        let mut items = vec![];

        if let Some(template) = &self.template {
            items.extend(template.hints.iter().map(|(line, hint)| Feedback {
                kind: FeedbackKind::Hint,
                line: Some(*line),
                message: hint.clone(),
            }));
        }

        if let Some(policy) = &self.policy {
            for (class, values) in &policy.flags.blacklist {
                for (value, ranges) in values {
                    items.push(Feedback {
                        kind: FeedbackKind::Forbidden,
                        line: ranges.first().map(|range| range.start.line),
                        message: format!("don't use ({}) `{}`", class, value),
                    });
                }
            }
            for (class, values) in &policy.flags.whitelist {
                for value in values {
                    items.push(Feedback {
                        kind: FeedbackKind::Required,
                        line: None,
                        message: format!("be sure to use ({}) `{}`", class, value),
                    });
                }
            }
        }
        items
    }
}

/// The category of a feedback item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum FeedbackKind {
    /// Structure from the template is missing, the message is the instructor's hint.
    Hint,
    /// A blacklisted token was used.
    Forbidden,
    /// A whitelisted token was never used.
    Required,
}

/// A single line-referenced piece of feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} [line: {}]", self.message, line),
            None => f.write_str(&self.message),
        }
    }
}
