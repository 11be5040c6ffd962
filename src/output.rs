use clap::ValueEnum;
use serde_json::{to_string, to_string_pretty};

use crate::graph_server::Result;
use crate::tree_builder::TreeNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line of JSON.
    Concise,
    /// Indented JSON.
    Pretty,
}

pub fn render_tree(tree: &TreeNode, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Concise => to_string(tree)?,
        OutputFormat::Pretty => to_string_pretty(tree)?,
    })
}
