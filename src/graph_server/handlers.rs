use std::sync::Arc;

use axum::{Extension, Json};
use axum_macros::debug_handler;
use uuid::Uuid;

use super::Result;
use crate::flat_store::FlatStore;
use crate::tree_builder::TreeNode;

/// Build a fresh tree from the store for every request; nothing is cached.
#[debug_handler]
pub async fn handle_graph_data(store: Extension<Arc<FlatStore>>) -> Result<Json<TreeNode>> {
    let span = info_span!("graph_data", request = %Uuid::new_v4());
    span.in_scope(|| match store.build_tree() {
        Ok(tree) => {
            debug!(root = %tree.name, nodes = tree.node_count(), "built tree");
            Ok(Json(tree))
        }
        Err(err) => {
            warn!(records = store.nodes().len(), "{}", err);
            Err(err)
        }
    })
}
