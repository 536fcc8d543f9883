//! Lossless concrete syntax tree for Smithy IDL sources.
//!
//! Every node and every captured token of one parse lives in a single
//! [`TokenTree`] arena. Nodes are addressed by stable [`NodeId`]s and read
//! through the copyable [`TreeNode`] handle.

mod arena;
mod token;
mod token_set;
mod tree;
mod tree_kind;

/// Index-addressed storage backing the tree.
pub use arena::{Arena, Key};
/// Captured lexical tokens and their decoded literals.
pub use token::{CapturedToken, Literal, Number, Position, TokenKind};
/// Compact set for grouping `TokenKind` values.
pub use token_set::TokenSet;
/// Tree storage and the read-only node handle.
pub use tree::{NodeData, NodeId, TokenId, TokenTree, TreeNode};
/// Grammar labels of interior nodes.
pub use tree_kind::TreeKind;
