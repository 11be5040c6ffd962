use std::path::PathBuf;

use clap::Parser;
use tree_viewer::{
    flat_store::FlatStore,
    output::{render_tree, OutputFormat},
};

/// Print the tree the server would return for a set of flat node records.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct BuildTree {
    /// JSON array of flat node records; the built-in dataset if omitted.
    #[clap(long, value_parser)]
    data: Option<PathBuf>,

    #[clap(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Also list anything odd about the records on stderr.
    #[clap(long)]
    lint: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = BuildTree::parse();

    let store = match &args.data {
        Some(path) => FlatStore::load(path)?,
        None => FlatStore::builtin().clone(),
    };

    if args.lint {
        for anomaly in store.anomalies() {
            eprintln!("warning: {}", anomaly);
        }
    }

    let tree = match store.build_tree() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    println!("{}", render_tree(&tree, args.format)?);

    Ok(())
}
