//! Reduction of a syntax tree to a kind-nesting fingerprint.
//!
//! The fingerprint keeps only which kinds are nested under which kinds. All children of a
//! node write into one shared map, and inserting a kind overwrites any entry of that kind
//! which an earlier sibling subtree left behind. Child order and the number of nodes of a
//! kind are therefore lost, so "a loop containing a conditional containing a call" is all
//! that survives of a tree.

use crate::lang::{Language, RawNode};
use crate::ParseError;
use std::collections::BTreeMap;

/// Children of a fingerprint node, keyed by node kind.
pub type KindMap = BTreeMap<String, TreeNode>;

/// Comment text keyed by the line the comment annotates.
pub type CommentMap = BTreeMap<usize, String>;

/// A node of the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A kind with no kinds nested under it.
    Leaf { line: usize },
    /// A kind with at least one kind nested under it.
    Branch { line: usize, children: KindMap },
}

impl TreeNode {
    fn new(line: usize, children: KindMap) -> Self {
        if children.is_empty() {
            TreeNode::Leaf { line }
        } else {
            TreeNode::Branch { line, children }
        }
    }

    /// The most recently seen line of this kind at this position.
    pub fn line(&self) -> usize {
        match self {
            TreeNode::Leaf { line } | TreeNode::Branch { line, .. } => *line,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn children(&self) -> Option<&KindMap> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Branch { children, .. } => Some(children),
        }
    }
}

/// The fingerprint of a whole syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifiedTree {
    pub kinds: KindMap,
}

/// Parse `text` with `language` and simplify the resulting tree.
pub fn simplify(
    language: &dyn Language,
    text: &str,
) -> Result<(SimplifiedTree, CommentMap), ParseError> {
    let root = language.parse(text)?;
    Ok(simplify_tree(&root))
}

/// Simplify an already parsed tree.
pub fn simplify_tree(root: &RawNode) -> (SimplifiedTree, CommentMap) {
    let mut tree = SimplifiedTree::default();
    let mut comments = CommentMap::new();
    walk(root, &mut tree.kinds, &mut comments);
    (tree, comments)
}

fn walk(node: &RawNode, current: &mut KindMap, comments: &mut CommentMap) {
    match node {
        RawNode::Comment { text, end_line } => {
            comments.insert(end_line + 1, text.clone());
        }
        RawNode::Opaque { children } => {
            for child in children {
                walk(child, current, comments);
            }
        }
        RawNode::Node {
            kind,
            line,
            children,
        } => {
            // the entry is rebuilt from scratch, so the subtree of an earlier
            // sibling with the same kind is dropped rather than merged.
            let mut nested = KindMap::new();
            for child in children {
                walk(child, &mut nested, comments);
            }
            current.insert(kind.clone(), TreeNode::new(*line, nested));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::EcmaScript;

    fn leaf(line: usize) -> TreeNode {
        TreeNode::Leaf { line }
    }

    fn branch(line: usize, children: Vec<(&str, TreeNode)>) -> TreeNode {
        TreeNode::Branch {
            line,
            children: children
                .into_iter()
                .map(|(kind, node)| (kind.to_string(), node))
                .collect(),
        }
    }

    #[test]
    fn nests_kinds_under_kinds() {
        let root = RawNode::node(
            "Program",
            1,
            vec![RawNode::node(
                "ForStatement",
                1,
                vec![RawNode::node(
                    "IfStatement",
                    2,
                    vec![RawNode::leaf("CallExpression", 3)],
                )],
            )],
        );
        let (tree, comments) = simplify_tree(&root);

        let expected = branch(
            1,
            vec![(
                "ForStatement",
                branch(1, vec![("IfStatement", branch(2, vec![("CallExpression", leaf(3))]))]),
            )],
        );
        assert_eq!(tree.kinds.get("Program"), Some(&expected));
        assert!(comments.is_empty());
    }

    #[test]
    fn same_kind_siblings_overwrite() {
        let root = RawNode::node(
            "Block",
            1,
            vec![
                RawNode::node("Stmt", 2, vec![RawNode::leaf("Call", 2)]),
                RawNode::node("Stmt", 3, vec![RawNode::leaf("Assign", 3)]),
                RawNode::leaf("Return", 4),
            ],
        );
        let (tree, _) = simplify_tree(&root);
        let block = tree.kinds["Block"].children().unwrap();

        // the second statement replaced the first one including its subtree
        assert_eq!(block["Stmt"], branch(3, vec![("Assign", leaf(3))]));
        assert_eq!(block["Return"], leaf(4));
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn different_kind_siblings_share_one_map() {
        let root = RawNode::node(
            "Block",
            1,
            vec![
                RawNode::node("If", 2, vec![RawNode::leaf("Call", 3)]),
                RawNode::node("While", 5, vec![RawNode::leaf("Assign", 6)]),
            ],
        );
        let (tree, _) = simplify_tree(&root);
        let block = tree.kinds["Block"].children().unwrap();
        assert!(block.contains_key("If"));
        assert!(block.contains_key("While"));
    }

    #[test]
    fn comments_annotate_the_next_line_without_nesting() {
        let root = RawNode::node(
            "Program",
            1,
            vec![
                RawNode::comment("first", 1),
                RawNode::comment("second", 1),
                RawNode::node("If", 2, vec![RawNode::comment("inner", 3)]),
            ],
        );
        let (tree, comments) = simplify_tree(&root);

        assert_eq!(comments.get(&2).map(String::as_str), Some("second"));
        assert_eq!(comments.get(&4).map(String::as_str), Some("inner"));
        assert!(tree.kinds["Program"].children().unwrap()["If"].is_leaf());
    }

    #[test]
    fn opaque_nodes_are_transparent_to_nesting() {
        let root = RawNode::node(
            "Program",
            1,
            vec![RawNode::Opaque {
                children: vec![RawNode::leaf("If", 2), RawNode::leaf("While", 3)],
            }],
        );
        let (tree, _) = simplify_tree(&root);
        let program = tree.kinds["Program"].children().unwrap();
        assert_eq!(program["If"], leaf(2));
        assert_eq!(program["While"], leaf(3));
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(simplify(&EcmaScript::script(), "if (").is_err());
    }
}
