use serde::{Deserialize, Serialize};
use serde_json::from_reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::graph_server::Result;

/// One record of the flat dataset.  `parent` names the parent record, and the
/// empty string marks the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parent: String,
}

impl FlatNode {
    pub fn new(name: &str, description: &str, parent: &str) -> Self {
        FlatNode {
            name: name.to_string(),
            description: description.to_string(),
            parent: parent.to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Read a JSON array of flat node records, keeping the file's order.
///
/// Unlike the optional lookup files elsewhere, a data file the user asked for
/// that can't be read is an error rather than an empty result; serving an
/// empty tree would only show up later as a confusing 500.
pub fn read_flat_nodes(filename: &Path) -> Result<Vec<FlatNode>> {
    let file = match File::open(filename) {
        Ok(f) => f,
        Err(err) => {
            info!("Error trying to open flat node file [{}]", filename.display());
            return Err(err.into());
        }
    };

    let nodes: Vec<FlatNode> = match from_reader(BufReader::new(file)) {
        Ok(result) => result,
        Err(err) => {
            info!("Error trying to read flat node file [{}]", filename.display());
            return Err(err.into());
        }
    };

    Ok(nodes)
}
