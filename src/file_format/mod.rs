pub mod flat_nodes;
