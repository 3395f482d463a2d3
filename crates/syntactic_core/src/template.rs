//! Structural templates.
//!
//! A template is an example solution flattened into an [`Outline`]: every leaf of its
//! fingerprint becomes a dotted path of the kinds above it. A submission matches the template
//! when its own outline contains every path of the template's outline. Paths are compared by
//! string equality only, line numbers never take part in matching, and extra structure in
//! the submission is allowed.

use crate::lang::Language;
use crate::report::TemplateResult;
use crate::simplify::{simplify, CommentMap, KindMap, TreeNode};
use crate::ParseError;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};
use std::iter::FromIterator;

/// Node kinds which are traversed but never appear as a path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElideSet {
    kinds: BTreeSet<String>,
}

impl ElideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    pub fn insert(&mut self, kind: impl Into<String>) -> bool {
        self.kinds.insert(kind.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ElideSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Hints recorded for one path, keyed by the line of the leaf.
pub type LineHints = BTreeMap<usize, Option<String>>;

/// A flattened fingerprint: leaf paths mapped to the lines they were seen on and the comment
/// annotating each of those lines, if any.
pub type Outline = BTreeMap<String, LineHints>;

/// Flatten a fingerprint into an outline.
pub fn serialize(tree: &KindMap, comments: &CommentMap, elide: &ElideSet) -> Outline {
    let mut outline = Outline::new();
    serialize_into(tree, "", comments, elide, &mut outline);
    outline
}

fn serialize_into(
    tree: &KindMap,
    path: &str,
    comments: &CommentMap,
    elide: &ElideSet,
    outline: &mut Outline,
) {
    for (kind, node) in tree {
        let next_path = if elide.contains(kind) {
            path.to_string()
        } else if path.is_empty() {
            kind.clone()
        } else {
            format!("{}.{}", path, kind)
        };

        match node {
            TreeNode::Leaf { line } => {
                outline
                    .entry(next_path)
                    .or_default()
                    .insert(*line, comments.get(line).cloned());
            }
            TreeNode::Branch { children, .. } => {
                serialize_into(children, &next_path, comments, elide, outline);
            }
        }
    }
}

/// Build the outline of `text` using `language` to parse it.
pub fn outline(language: &dyn Language, text: &str, elide: &ElideSet) -> Result<Outline, ParseError> {
    let (tree, comments) = simplify(language, text)?;
    Ok(serialize(&tree.kinds, &comments, elide))
}

/// A compiled structural template.
#[derive(Debug, Clone)]
pub struct Template {
    language: Box<dyn Language>,
    elide: ElideSet,
    outline: Outline,
}

impl Template {
    /// Compile a template with the language's default elided kinds.
    pub fn new(language: Box<dyn Language>, text: &str) -> Result<Self, ParseError> {
        let elide = language.default_elided();
        Self::compile(language, text, elide)
    }

    /// Compile a template, `elide` is also used for every submission verified against it.
    pub fn compile(
        language: Box<dyn Language>,
        text: &str,
        elide: ElideSet,
    ) -> Result<Self, ParseError> {
        let outline = outline(&*language, text, &elide)?;
        debug!(
            "compiled {} template with {} paths ({} elided kinds)",
            language.name(),
            outline.len(),
            elide.len()
        );
        Ok(Self {
            language,
            elide,
            outline,
        })
    }

    /// Rebuild the outline from edited template text.
    ///
    /// The previous outline is kept if the new text does not parse.
    pub fn recompile(&mut self, text: &str) -> Result<(), ParseError> {
        self.outline = outline(&*self.language, text, &self.elide)?;
        debug!("recompiled template with {} paths", self.outline.len());
        Ok(())
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn elided(&self) -> &ElideSet {
        &self.elide
    }

    pub fn language(&self) -> &dyn Language {
        &*self.language
    }

    /// Check that `submission` contains every path of this template.
    pub fn verify(&self, submission: &str) -> Result<TemplateResult, ParseError> {
        let theirs = outline(&*self.language, submission, &self.elide)?;
        let mut res = TemplateResult {
            status: true,
            ..Default::default()
        };

        for (path, lines) in &self.outline {
            if theirs.contains_key(path) {
                continue;
            }
            res.status = false;
            res.missing.push(path.clone());
            for (line, hint) in lines {
                if let Some(hint) = hint.as_ref().filter(|hint| !hint.trim().is_empty()) {
                    res.hints.insert(*line, hint.clone());
                }
            }
        }

        trace!(
            "template verification: {} of {} paths missing",
            res.missing.len(),
            self.outline.len()
        );
        Ok(res)
    }
}
