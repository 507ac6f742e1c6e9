//! Document-tree primitives for CodeBench.
//! CodeBench 文件樹核心模組。

mod node;
mod tree;

pub use node::{DocumentNode, NodeDraft, NodeId, NodeKind};
pub use tree::{DocumentTree, TreeDiff, TreeError};
