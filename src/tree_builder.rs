//! Turn the flat, parent-pointer list of nodes into the nested tree that the
//! D3 tree diagram consumes.
//!
//! The tree is built in two passes over the flat records: the first indexes
//! every record by name, the second links each record under its parent.  Both
//! passes go through the index, so when names are duplicated the last record
//! with a given name is the one that ends up in the tree, and when several
//! records have an empty parent the last one becomes the root.  Records whose
//! parent isn't in the index are orphans and are quietly left out.  None of
//! these are errors; `FlatStore::anomalies` is where they get reported.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::file_format::flat_nodes::FlatNode;

/// A flat node plus its children.  `children` is `None` rather than an empty
/// list for leaves so that the serialized JSON omits the field entirely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub description: String,
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    fn from_flat(node: &FlatNode, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: node.name.clone(),
            description: node.description.clone(),
            parent: node.parent.clone(),
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first, pre-order search by name.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::node_count).sum::<usize>()
    }
}

/// How the records hang together: the name index, which record is the root,
/// and each record's children as record indices, in input order.
pub(crate) struct Links<'a> {
    pub by_name: HashMap<&'a str, usize>,
    pub root: Option<usize>,
    pub children: Vec<Vec<usize>>,
}

/// What a walk from the root sees without building any nodes.
pub(crate) struct Survey {
    /// Levels in the deepest branch, counting the root; 0 without a root.
    pub depth: usize,
    /// Indexed by record; true if that record's node is in the tree.  Only
    /// the record that owns a duplicated name can be reached.
    pub reached: Vec<bool>,
}

pub(crate) fn link(flat: &[FlatNode]) -> Links<'_> {
    let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(flat.len());
    for (idx, node) in flat.iter().enumerate() {
        by_name.insert(node.name.as_str(), idx);
    }

    let mut root = None;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    for node in flat {
        let owner = by_name[node.name.as_str()];
        if node.is_root() {
            root = Some(owner);
        } else if let Some(&parent) = by_name.get(node.parent.as_str()) {
            children[parent].push(owner);
        }
    }

    Links {
        by_name,
        root,
        children,
    }
}

impl Links<'_> {
    /// Walk the links the same way `materialize` does, but with an explicit
    /// stack so arbitrarily deep data can be measured before we recurse into
    /// it.
    pub(crate) fn survey(&self) -> Survey {
        let mut survey = Survey {
            depth: 0,
            reached: vec![false; self.children.len()],
        };
        let root = match self.root {
            Some(root) => root,
            None => return survey,
        };

        let mut on_path = vec![false; self.children.len()];
        // (record, depth, next child to visit)
        let mut stack = vec![(root, 1, 0)];
        on_path[root] = true;
        survey.reached[root] = true;

        while let Some(top) = stack.last_mut() {
            let (idx, depth, next) = *top;
            survey.depth = survey.depth.max(depth);
            match self.children[idx].get(next) {
                Some(&child) => {
                    top.2 += 1;
                    if !on_path[child] {
                        on_path[child] = true;
                        survey.reached[child] = true;
                        stack.push((child, depth + 1, 0));
                    }
                }
                None => {
                    on_path[idx] = false;
                    stack.pop();
                }
            }
        }

        survey
    }
}

/// Build the tree for `flat`, returning `None` if no record has an empty
/// parent.
///
/// This recurses once per level; callers handing it untrusted records should
/// bound the depth with `Links::survey` first, as `FlatStore::try_new` does.
pub fn build_tree(flat: &[FlatNode]) -> Option<TreeNode> {
    let links = link(flat);
    let root = links.root?;
    let mut on_path = vec![false; flat.len()];
    Some(materialize(flat, &links.children, root, &mut on_path))
}

/// Duplicate names can link a record under one of its own descendants, so we
/// refuse to descend into anything already on the current ancestor path.
fn materialize(
    flat: &[FlatNode],
    children: &[Vec<usize>],
    idx: usize,
    on_path: &mut [bool],
) -> TreeNode {
    on_path[idx] = true;
    let mut kids = Vec::with_capacity(children[idx].len());
    for &child in &children[idx] {
        if on_path[child] {
            trace!(name = %flat[child].name, "skipping cyclic child");
            continue;
        }
        kids.push(materialize(flat, children, child, on_path));
    }
    on_path[idx] = false;

    TreeNode::from_flat(&flat[idx], kids)
}
