use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::file_format::flat_nodes::{read_flat_nodes, FlatNode};
use crate::graph_server::{ErrorDetails, ErrorLayer, Result, ServerError};
use crate::tree_builder::{build_tree, link, TreeNode};

/// Deepest tree we are willing to build.  Building, serializing and dropping a
/// `TreeNode` all recurse once per level, so anything much deeper than this
/// risks overflowing a worker thread's stack.
pub const MAX_TREE_DEPTH: usize = 512;

/// (name, parent) pairs for the dataset we serve when no data file is given.
const BUILTIN_GRAPH_DATA: &[(&str, &str)] = &[
    ("A", ""),
    ("B", "A"),
    ("C", "A"),
    ("D", "A"),
    ("B-1", "B"),
    ("B-2", "B"),
    ("B-3", "B"),
];

lazy_static! {
    static ref BUILTIN_STORE: FlatStore = FlatStore::new(
        BUILTIN_GRAPH_DATA
            .iter()
            .map(|(name, parent)| {
                FlatNode::new(name, &format!("This is a description of {}", name), parent)
            })
            .collect()
    );
}

/// The read-only list of flat node records the server hands out trees for.
/// Nothing mutates it after construction; share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatStore {
    nodes: Vec<FlatNode>,
}

/// Something about the flat records that the tree builder will silently
/// paper over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anomaly {
    /// No record has an empty parent, so every tree request will fail.
    NoRoot,
    /// A root after the first one; it replaces the earlier root.
    ExtraRoot { name: String },
    /// A name used more than once; only the last record with it survives.
    DuplicateName { name: String },
    /// The parent isn't any record's name, so this record is dropped.
    Orphan { name: String, parent: String },
    /// The parent exists, but there is no path from the root down to this
    /// record: it hangs off an orphan, sits in a parent cycle, or belongs to a
    /// root that a later root replaced.
    Unreachable { name: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NoRoot => write!(f, "no node has an empty parent"),
            Anomaly::ExtraRoot { name } => write!(f, "{} replaces an earlier root", name),
            Anomaly::DuplicateName { name } => write!(f, "{} is defined more than once", name),
            Anomaly::Orphan { name, parent } => {
                write!(f, "{} names missing parent {}", name, parent)
            }
            Anomaly::Unreachable { name } => write!(f, "{} is not reachable from the root", name),
        }
    }
}

impl FlatStore {
    pub fn new(nodes: Vec<FlatNode>) -> Self {
        FlatStore { nodes }
    }

    /// The dataset the server ships with.
    pub fn builtin() -> &'static FlatStore {
        &BUILTIN_STORE
    }

    /// Like `new`, but refuses records whose tree would be deeper than
    /// `MAX_TREE_DEPTH`.  Use this for anything that didn't ship with us.
    pub fn try_new(nodes: Vec<FlatNode>) -> Result<Self> {
        let depth = link(&nodes).survey().depth;
        if depth > MAX_TREE_DEPTH {
            return Err(ServerError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::DataLayer,
                message: format!(
                    "tree would be {} levels deep, more than the {} allowed",
                    depth, MAX_TREE_DEPTH
                ),
            }));
        }
        Ok(FlatStore::new(nodes))
    }

    pub fn load(path: &Path) -> Result<Self> {
        FlatStore::try_new(read_flat_nodes(path)?)
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn build_tree(&self) -> Result<TreeNode> {
        build_tree(&self.nodes).ok_or(ServerError::NoRoot)
    }

    /// Everything `build_tree` will quietly absorb, in record order.
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let links = link(&self.nodes);
        let reached = links.survey().reached;
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut saw_root = false;
        let mut anomalies = Vec::new();

        for node in &self.nodes {
            let count = seen.entry(node.name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                anomalies.push(Anomaly::DuplicateName {
                    name: node.name.clone(),
                });
            }

            let owner = links.by_name[node.name.as_str()];
            if node.is_root() {
                if saw_root {
                    anomalies.push(Anomaly::ExtraRoot {
                        name: node.name.clone(),
                    });
                }
                saw_root = true;
            } else if !links.by_name.contains_key(node.parent.as_str()) {
                anomalies.push(Anomaly::Orphan {
                    name: node.name.clone(),
                    parent: node.parent.clone(),
                });
                continue;
            }

            if !reached[owner] {
                anomalies.push(Anomaly::Unreachable {
                    name: node.name.clone(),
                });
            }
        }

        if !saw_root {
            anomalies.push(Anomaly::NoRoot);
        }
        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_store_is_clean() {
        let store = FlatStore::builtin();
        assert_eq!(store.nodes().len(), 7);
        assert!(store.anomalies().is_empty());
        assert_eq!(store.nodes()[4], FlatNode::new("B-1", "This is a description of B-1", "B"));
    }

    #[test]
    fn builtin_tree_shape() {
        let tree = FlatStore::builtin().build_tree().unwrap();
        let top: Vec<&str> = tree.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["B", "C", "D"]);
        assert_eq!(tree.find("B").unwrap().children().len(), 3);
        assert!(tree.find("D").unwrap().children.is_none());
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn empty_store_has_no_root() {
        let store = FlatStore::new(vec![]);
        assert!(matches!(store.build_tree(), Err(ServerError::NoRoot)));
        assert_eq!(store.anomalies(), vec![Anomaly::NoRoot]);
    }

    #[test]
    fn anomalies_in_record_order() {
        let store = FlatStore::new(vec![
            FlatNode::new("A", "", ""),
            FlatNode::new("X", "", "Z"),
            FlatNode::new("B", "", ""),
            FlatNode::new("A", "", "B"),
            FlatNode::new("A", "", "B"),
        ]);
        assert_eq!(
            store.anomalies(),
            vec![
                Anomaly::Orphan {
                    name: "X".to_string(),
                    parent: "Z".to_string()
                },
                Anomaly::ExtraRoot {
                    name: "B".to_string()
                },
                Anomaly::DuplicateName {
                    name: "A".to_string()
                },
            ]
        );
        assert_eq!(store.anomalies()[0].to_string(), "X names missing parent Z");
    }

    #[test]
    fn records_cut_off_from_the_root_are_reported() {
        let store = FlatStore::new(vec![
            FlatNode::new("A", "", ""),
            FlatNode::new("X", "", "Z"),
            FlatNode::new("Y", "", "X"),
            FlatNode::new("P", "", "Q"),
            FlatNode::new("Q", "", "P"),
        ]);
        assert_eq!(store.build_tree().unwrap().node_count(), 1);
        assert_eq!(
            store.anomalies(),
            vec![
                Anomaly::Orphan {
                    name: "X".to_string(),
                    parent: "Z".to_string()
                },
                Anomaly::Unreachable {
                    name: "Y".to_string()
                },
                Anomaly::Unreachable {
                    name: "P".to_string()
                },
                Anomaly::Unreachable {
                    name: "Q".to_string()
                },
            ]
        );
    }

    #[test]
    fn replaced_root_is_unreachable() {
        let store = FlatStore::new(vec![
            FlatNode::new("old", "", ""),
            FlatNode::new("kid", "", "old"),
            FlatNode::new("new", "", ""),
        ]);
        assert_eq!(
            store.anomalies(),
            vec![
                Anomaly::Unreachable {
                    name: "old".to_string()
                },
                Anomaly::Unreachable {
                    name: "kid".to_string()
                },
                Anomaly::ExtraRoot {
                    name: "new".to_string()
                },
            ]
        );
    }

    fn chain(len: usize) -> Vec<FlatNode> {
        (0..len)
            .map(|i| {
                let parent = if i == 0 {
                    String::new()
                } else {
                    format!("n{}", i - 1)
                };
                FlatNode::new(&format!("n{}", i), "", &parent)
            })
            .collect()
    }

    #[test]
    fn deepest_allowed_chain_loads() {
        let store = FlatStore::try_new(chain(MAX_TREE_DEPTH)).unwrap();
        assert_eq!(store.build_tree().unwrap().node_count(), MAX_TREE_DEPTH);
    }

    #[test]
    fn too_deep_data_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &chain(200_000)).unwrap();

        match FlatStore::load(file.path()) {
            Err(ServerError::StickyProblem(details)) => {
                assert!(matches!(details.layer, ErrorLayer::DataLayer));
                assert_eq!(
                    details.message,
                    format!(
                        "tree would be 200000 levels deep, more than the {} allowed",
                        MAX_TREE_DEPTH
                    )
                );
            }
            other => panic!("expected a data problem, got {:?}", other.map(|s| s.nodes().len())),
        }
    }
}
