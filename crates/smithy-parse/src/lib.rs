//! Error-tolerant parser producing a lossless concrete syntax tree for Smithy IDL.
//!
//! Parsing never fails: malformed input shows up as `ERROR` nodes inside the
//! returned tree, and every byte of the source remains reachable from the root.

mod buffer;
mod error;
mod grammar;
mod interner;
#[cfg(test)]
mod tests;

pub use error::SyntaxError;
use smithy_errors::Diagnostic;
use smithy_tree::{TokenTree, TreeNode};
use text_size::TextRange;

use crate::buffer::TokenBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of open nodes before a scope fails.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: Self::DEFAULT_MAX_DEPTH }
    }
}

/// The tree of one parsed file.
#[derive(Debug)]
pub struct Parse {
    filename: String,
    tree: TokenTree,
}

impl Parse {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn tree(&self) -> &TokenTree {
        &self.tree
    }

    pub fn root(&self) -> TreeNode<'_> {
        self.tree.root()
    }

    pub fn into_tree(self) -> TokenTree {
        self.tree
    }

    pub fn has_errors(&self) -> bool {
        self.root().has_errors()
    }

    /// One error per ERROR node, in source order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.root()
            .errors()
            .into_iter()
            .map(|node| SyntaxError {
                message: node.error().unwrap_or_default().to_owned(),
                filename: self.filename.clone(),
                line: node.start_line(),
                column: node.start_column(),
                range: error_range(node),
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors().into_iter().map(|error| Diagnostic::error(error.message, error.range)).collect()
    }
}

/// The offending token of an ERROR node, or an empty range where something was missing.
fn error_range(node: TreeNode<'_>) -> TextRange {
    match node.tokens().next() {
        Some(token) => token.range,
        None => node.range(),
    }
}

pub fn parse(filename: &str, text: &str) -> Parse {
    parse_with(filename, text, &ParseOptions::default())
}

pub fn parse_with(filename: &str, text: &str, options: &ParseOptions) -> Parse {
    let _span = tracing::debug_span!("parse", filename).entered();

    let mut p = TokenBuffer::new(filename, text, options);
    grammar::idl(&mut p);
    Parse { filename: filename.to_owned(), tree: p.finish() }
}
