extern crate serde;
extern crate serde_json;

extern crate clap;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;
extern crate uuid;

pub mod config;
pub mod file_format;
pub mod flat_store;
pub mod graph_server;
pub mod logging;
pub mod output;
pub mod tree_builder;
