use std::cell::OnceCell;
use std::fmt;

use text_size::{TextRange, TextSize};

use crate::{Arena, CapturedToken, Key, Position, TreeKind};

pub type NodeId = Key<NodeData>;
pub type TokenId = Key<CapturedToken>;

#[derive(Debug)]
struct ErrorData {
    message: Box<str>,
    offset: TextSize,
    position: Position,
}

/// Storage of one node. Read it through [`TreeNode`].
#[derive(Debug)]
pub struct NodeData {
    kind: TreeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    token: Option<TokenId>,
    error: Option<Box<ErrorData>>,
    tokens: OnceCell<Box<[TokenId]>>,
}

impl NodeData {
    fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            token: None,
            error: None,
            tokens: OnceCell::new(),
        }
    }
}

/// Arena owning every node and captured token of one parse.
#[derive(Debug)]
pub struct TokenTree {
    nodes: Arena<NodeData>,
    tokens: Arena<CapturedToken>,
    root: NodeId,
}

impl TokenTree {
    pub fn new(root: TreeKind, tokens: impl IntoIterator<Item = CapturedToken>) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(NodeData::new(root));
        Self { nodes, tokens: tokens.into_iter().collect(), root }
    }

    pub fn root(&self) -> TreeNode<'_> {
        self.node(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> TreeNode<'_> {
        TreeNode { tree: self, id }
    }

    pub fn token(&self, id: TokenId) -> &CapturedToken {
        &self.tokens[id]
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn alloc_leaf(&mut self, token: TokenId) -> NodeId {
        let mut data = NodeData::new(TreeKind::TOKEN);
        data.token = Some(token);
        self.nodes.alloc(data)
    }

    pub fn alloc_node(&mut self, kind: TreeKind) -> NodeId {
        self.nodes.alloc(NodeData::new(kind))
    }

    pub fn alloc_node_with_tokens(&mut self, kind: TreeKind, tokens: &[TokenId]) -> NodeId {
        let node = self.alloc_node(kind);
        for &token in tokens {
            let leaf = self.alloc_leaf(token);
            self.append_child(node, leaf);
        }
        node
    }

    pub fn alloc_error(
        &mut self,
        message: impl Into<Box<str>>,
        offset: TextSize,
        position: Position,
    ) -> NodeId {
        let mut data = NodeData::new(TreeKind::ERROR);
        data.error = Some(Box::new(ErrorData { message: message.into(), offset, position }));
        self.nodes.alloc(data)
    }

    /// Links a detached `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.nodes[parent].token.is_none(), "cannot append a child to a leaf");
        assert!(self.nodes[child].parent.is_none(), "node is already attached to a parent");
        debug_assert!(
            parent != child && self.node(parent).ancestors().all(|ancestor| ancestor.id != child),
            "appending a node below itself"
        );

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.invalidate(parent);
    }

    /// Detaches `child` from `parent`, returning `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent].children;
        let Some(index) = children.iter().position(|&it| it == child) else {
            return false;
        };

        children.remove(index);
        self.nodes[child].parent = None;
        self.invalidate(parent);
        true
    }

    fn invalidate(&mut self, mut node: NodeId) {
        loop {
            let data = &mut self.nodes[node];
            data.tokens.take();
            match data.parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }

    fn flatten(&self, id: NodeId) -> &[TokenId] {
        self.nodes[id].tokens.get_or_init(|| {
            let mut tokens = Vec::new();
            let mut stack = vec![id];

            while let Some(node) = stack.pop() {
                let data = &self.nodes[node];
                if let Some(token) = data.token {
                    tokens.push(token);
                } else if let Some(cached) = data.tokens.get() {
                    tokens.extend_from_slice(cached);
                } else {
                    stack.extend(data.children.iter().rev());
                }
            }

            tokens.into_boxed_slice()
        })
    }
}

impl fmt::Display for TokenTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

/// Copyable read-only handle to a node of a [`TokenTree`].
#[derive(Clone, Copy)]
pub struct TreeNode<'a> {
    tree: &'a TokenTree,
    id: NodeId,
}

impl PartialEq for TreeNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for TreeNode<'_> {}

impl fmt::Debug for TreeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}-{}", self.kind(), self.start(), self.end())
    }
}

impl<'a> TreeNode<'a> {
    fn data(self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }

    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn kind(self) -> TreeKind {
        self.data().kind
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        self.data().token.is_some()
    }

    /// The wrapped token of a leaf.
    pub fn token(self) -> Option<&'a CapturedToken> {
        self.data().token.map(|token| self.tree.token(token))
    }

    /// The message of an `ERROR` node.
    pub fn error(self) -> Option<&'a str> {
        self.data().error.as_ref().map(|error| &*error.message)
    }

    pub fn parent(self) -> Option<TreeNode<'a>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Parents of this node, innermost first.
    pub fn ancestors(self) -> impl Iterator<Item = TreeNode<'a>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = TreeNode<'a>> + ExactSizeIterator {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    pub fn children_of(self, kind: TreeKind) -> impl Iterator<Item = TreeNode<'a>> {
        self.children().filter(move |child| child.kind() == kind)
    }

    pub fn first_child(self, kind: TreeKind) -> Option<TreeNode<'a>> {
        self.children().find(|child| child.kind() == kind)
    }

    pub fn last_child(self, kind: TreeKind) -> Option<TreeNode<'a>> {
        self.children().rev().find(|child| child.kind() == kind)
    }

    /// All nodes of `kind` below this one, in source order.
    pub fn find_descendants(self, kind: TreeKind) -> Vec<TreeNode<'a>> {
        let mut found = Vec::new();
        let mut stack: Vec<_> = self.children().rev().collect();

        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                found.push(node);
            }
            stack.extend(node.children().rev());
        }

        found
    }

    /// Flattened tokens in source order. Cached until the subtree changes.
    pub fn tokens(self) -> impl DoubleEndedIterator<Item = &'a CapturedToken> + ExactSizeIterator {
        let tree = self.tree;
        tree.flatten(self.id).iter().map(move |&token| tree.token(token))
    }

    /// Concatenated lexemes of every token below this node.
    pub fn text(self) -> String {
        self.tokens().map(CapturedToken::lexeme).collect()
    }

    pub fn range(self) -> TextRange {
        let mut tokens = self.tokens();
        match (tokens.next(), tokens.next_back()) {
            (Some(first), Some(last)) => first.range.cover(last.range),
            (Some(only), None) => only.range,
            _ => self.data().error.as_ref().map_or_else(TextRange::default, |error| {
                TextRange::empty(error.offset)
            }),
        }
    }

    pub fn start(self) -> Position {
        match self.tokens().next() {
            Some(token) => token.start,
            None => self.empty_position(),
        }
    }

    pub fn end(self) -> Position {
        match self.tokens().next_back() {
            Some(token) => token.end,
            None => self.empty_position(),
        }
    }

    fn empty_position(self) -> Position {
        self.data().error.as_ref().map(|error| error.position).unwrap_or_default()
    }

    pub fn start_line(self) -> u32 {
        self.start().line
    }

    pub fn start_column(self) -> u32 {
        self.start().column
    }

    pub fn end_line(self) -> u32 {
        self.end().line
    }

    pub fn end_column(self) -> u32 {
        self.end().column
    }

    /// Every `ERROR` node in this subtree, this node included, in source order.
    pub fn errors(self) -> Vec<TreeNode<'a>> {
        let mut errors = self.find_descendants(TreeKind::ERROR);
        if self.kind() == TreeKind::ERROR {
            errors.insert(0, self);
        }
        errors
    }

    pub fn has_errors(self) -> bool {
        self.kind() == TreeKind::ERROR || !self.find_descendants(TreeKind::ERROR).is_empty()
    }

    /// Narrowest node whose span contains the 1-based `line` and `column`.
    pub fn find_at(self, line: u32, column: u32) -> TreeNode<'a> {
        let mut current = self;

        'descend: loop {
            for child in current.children() {
                if child.contains(line, column) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    fn contains(self, line: u32, column: u32) -> bool {
        let (start, end) = (self.start(), self.end());

        if start.line == end.line {
            line == start.line && column >= start.column && column < end.column
        } else {
            (line == start.line && column >= start.column)
                || (line == end.line && column <= end.column)
                || (line > start.line && line < end.line)
        }
    }

    fn write_indented(self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = depth * 4;

        if let Some(token) = self.token() {
            return writeln!(f, "{:indent$}{}", "", token.debug());
        }

        write!(f, "{:indent$}{:?}", "", self.kind())?;
        if let Some(message) = self.error() {
            write!(f, " {message:?}")?;
        }
        write!(f, " {} - {}", self.start(), self.end())?;

        if self.data().children.is_empty() {
            return writeln!(f, " {{}}");
        }

        writeln!(f, " {{")?;
        for child in self.children() {
            child.write_indented(f, depth + 1)?;
        }
        writeln!(f, "{:indent$}}}", "")
    }
}

impl fmt::Display for TreeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
