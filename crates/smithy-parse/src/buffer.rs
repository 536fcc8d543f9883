use std::rc::Rc;

use drop_bomb::DropBomb;
use smithy_tokenizer::Tokenizer;
use smithy_tree::TokenKind::{self, *};
use smithy_tree::{CapturedToken, NodeId, Position, TokenId, TokenSet, TokenTree, TreeKind};

use crate::ParseOptions;
use crate::error::{PResult, SyntaxError};
use crate::interner::StringTable;

/// Kinds that may start a top-level construct when they sit at column 1.
const STATEMENT_START: TokenSet = TokenSet::new([IDENTIFIER, DOLLAR, AT, RBRACE]);

/// Cursor over the captured tokens of one file, building the tree as it goes.
pub(crate) struct TokenBuffer<'a> {
    filename: &'a str,
    tree: TokenTree,
    cursor: usize,
    eof: usize,
    open: Vec<NodeId>,
    strings: StringTable,
    max_depth: usize,
    errors: usize,
}

/// Result of a closed scope: the node it built and the body's value, if it succeeded.
pub(crate) struct Closed<T> {
    pub(crate) node: NodeId,
    pub(crate) value: Option<T>,
}

/// Documentation comments parsed after one statement, waiting to be moved into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DocComments(NodeId);

impl DocComments {
    pub(crate) fn new(node: NodeId) -> Self {
        Self(node)
    }
}

struct Scope {
    node: NodeId,
    bomb: DropBomb,
}

impl<'a> TokenBuffer<'a> {
    pub(crate) fn new(filename: &'a str, text: &str, options: &ParseOptions) -> Self {
        let mut position = Position::new(1, 1);
        let tokens = Tokenizer::new(text).map(|token| {
            let lexeme = &text[token.range];
            let start = position;
            position = advance_position(position, lexeme);
            CapturedToken {
                kind: token.kind,
                range: token.range,
                start,
                end: position,
                lexeme: lexeme.into(),
                literal: token.literal,
                error: token.error,
            }
        });

        let tree = TokenTree::new(TreeKind::IDL, tokens);
        let root = tree.root_id();

        Self {
            filename,
            eof: tree.token_count() - 1,
            tree,
            cursor: 0,
            open: vec![root],
            strings: StringTable::new(),
            max_depth: options.max_depth,
            errors: 0,
        }
    }

    pub(crate) fn current(&self) -> &CapturedToken {
        self.peek(0)
    }

    /// Token `k` positions ahead of the cursor, clamped to EOF.
    pub(crate) fn peek(&self, k: usize) -> &CapturedToken {
        let index = (self.cursor + k).min(self.eof);
        self.tree.token(TokenId::new(index as u32))
    }

    pub(crate) fn peek_while(
        &self,
        k: usize,
        predicate: impl Fn(TokenKind) -> bool,
    ) -> &CapturedToken {
        let mut k = k;
        loop {
            let token = self.peek(k);
            if token.kind == EOF || !predicate(token.kind) {
                return token;
            }
            k += 1;
        }
    }

    pub(crate) fn peek_past_spaces(&self, k: usize) -> &CapturedToken {
        self.peek_while(k, |kind| kind == SPACE)
    }

    pub(crate) fn peek_past_whitespace(&self, k: usize) -> &CapturedToken {
        self.peek_while(k, TokenKind::is_whitespace)
    }

    pub(crate) fn peek_past_trivia(&self, k: usize) -> &CapturedToken {
        self.peek_while(k, TokenKind::is_trivia)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.current().is_identifier(keyword)
    }

    pub(crate) fn has_next(&self) -> bool {
        self.cursor < self.eof
    }

    /// Appends the current token to the innermost open node.
    pub(crate) fn advance(&mut self) -> PResult<TokenKind> {
        if !self.has_next() {
            return Err(self.syntax_error("Unexpected end of file"));
        }
        let kind = self.current().kind;
        self.bump();
        Ok(kind)
    }

    pub(crate) fn advance_while(&mut self, predicate: impl Fn(TokenKind) -> bool) {
        while self.has_next() && predicate(self.current().kind) {
            self.bump();
        }
    }

    fn bump(&mut self) {
        debug_assert!(self.has_next());
        let leaf = self.tree.alloc_leaf(TokenId::new(self.cursor as u32));
        self.tree.append_child(self.innermost(), leaf);
        self.cursor += 1;
    }

    /// Checks the current token against `kinds` without consuming it.
    pub(crate) fn expect(&self, kinds: impl Into<TokenSet>) -> PResult<TokenKind> {
        let kinds = kinds.into();
        let current = self.current();
        if kinds.contains(current.kind) {
            return Ok(current.kind);
        }

        let message = match &current.error {
            Some(message) => message.to_string(),
            None if kinds.len() == 1 => {
                let expected = kinds.iter().map(|kind| kind.to_string()).collect::<String>();
                format!("Expected {expected} but found {}", current.debug())
            }
            None => {
                let expected = kinds.iter().map(|kind| kind.to_string()).collect::<Vec<_>>();
                format!("Expected one of {}; but found {}", expected.join(", "), current.debug())
            }
        };
        Err(self.syntax_error(message))
    }

    /// An error located at the current token.
    pub(crate) fn syntax_error(&self, message: impl Into<String>) -> SyntaxError {
        let current = self.current();
        SyntaxError {
            message: message.into(),
            filename: self.filename.to_owned(),
            line: current.start.line,
            column: current.start.column,
            range: current.range,
        }
    }

    pub(crate) fn intern_at(&mut self, k: usize) -> Rc<str> {
        let index = (self.cursor + k).min(self.eof);
        let token = self.tree.token(TokenId::new(index as u32));
        self.strings.intern(token.lexeme())
    }

    pub(crate) fn error_count(&self) -> usize {
        self.errors
    }

    pub(crate) fn with_scope<T>(
        &mut self,
        kind: TreeKind,
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> Closed<T> {
        self.with_scope_recovering(kind, Self::recover_to_statement, body)
    }

    /// Runs `body` inside a new node of `kind`. A failing body leaves an ERROR node
    /// behind, and `recovery` decides how many further tokens that node swallows.
    pub(crate) fn with_scope_recovering<T>(
        &mut self,
        kind: TreeKind,
        recovery: fn(&mut Self),
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> Closed<T> {
        let scope = self.open(kind);

        let result = if self.open.len() > self.max_depth {
            Err(self.syntax_error("Maximum nesting depth exceeded"))
        } else {
            body(self)
        };

        let value = match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(error, recovery);
                None
            }
        };

        Closed { node: self.close(scope), value }
    }

    fn open(&mut self, kind: TreeKind) -> Scope {
        let node = self.tree.alloc_node(kind);
        self.tree.append_child(self.innermost(), node);
        self.open.push(node);
        Scope { node, bomb: DropBomb::new("Scope must be closed") }
    }

    fn close(&mut self, mut scope: Scope) -> NodeId {
        scope.bomb.defuse();
        let closed = self.open.pop();
        debug_assert_eq!(closed, Some(scope.node), "scopes must close innermost first");
        scope.node
    }

    fn innermost(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.tree.root_id())
    }

    /// Records `error` as an ERROR node, moves past the offending token and runs `recovery`.
    pub(crate) fn report(&mut self, error: SyntaxError, recovery: fn(&mut Self)) {
        tracing::trace!(
            message = %error.message,
            line = error.line,
            column = error.column,
            "recovering from syntax error"
        );

        self.errors += 1;
        let position = Position::new(error.line, error.column);
        let node = self.tree.alloc_error(error.message, error.range.start(), position);
        self.tree.append_child(self.innermost(), node);

        if self.has_next() {
            self.open.push(node);
            self.bump();
            recovery(self);
            self.open.pop();
        }
    }

    /// Appends an empty ERROR node at the current token without consuming anything.
    pub(crate) fn error_here(&mut self, message: impl Into<String>) {
        let error = self.syntax_error(message);
        tracing::trace!(
            message = %error.message,
            line = error.line,
            column = error.column,
            "missing construct"
        );

        self.errors += 1;
        let position = Position::new(error.line, error.column);
        let node = self.tree.alloc_error(error.message, error.range.start(), position);
        self.tree.append_child(self.innermost(), node);
    }

    /// Wraps an already parsed, detached node in a new ERROR node at the current position.
    pub(crate) fn wrap_in_error(&mut self, node: NodeId, message: impl Into<String>) {
        let start = self.tree.node(node).start();
        let offset = self.tree.node(node).range().start();
        let message: String = message.into();
        tracing::trace!(%message, line = start.line, column = start.column, "wrapping in error");
        self.errors += 1;

        let error = self.tree.alloc_error(message, offset, start);
        self.tree.append_child(self.innermost(), error);
        self.tree.append_child(error, node);
    }

    /// Skips to the next token at column 1 that can begin a statement or close a block.
    pub(crate) fn recover_to_statement(&mut self) {
        while self.has_next() {
            let token = self.current();
            if token.start.column == 1 && STATEMENT_START.contains(token.kind) {
                return;
            }
            self.bump();
        }
    }

    pub(crate) fn recover_to_eof(&mut self) {
        self.advance_while(|_| true);
    }

    /// Unlinks `node` from its parent so it can be re-attached elsewhere.
    pub(crate) fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.tree.node(node).parent().map(|parent| parent.id()) {
            self.tree.remove_child(parent, node);
        }
    }

    /// Appends a detached `node` to the innermost open node.
    pub(crate) fn attach(&mut self, node: NodeId) {
        self.tree.append_child(self.innermost(), node);
    }

    /// Makes pending doc comments the first child of the innermost open node.
    pub(crate) fn move_doc_comments_here(&mut self, docs: Option<DocComments>) {
        let Some(DocComments(node)) = docs else {
            return;
        };
        debug_assert_eq!(self.tree.node(self.innermost()).children().len(), 0);

        self.detach(node);
        self.attach(node);
    }

    pub(crate) fn finish(self) -> TokenTree {
        debug_assert_eq!(self.open.len(), 1, "unclosed scopes at the end of the parse");
        tracing::debug!(tokens = self.tree.token_count(), errors = self.errors, "finished parse");
        self.tree
    }
}

/// Moves `position` past `text`. `\n`, `\r\n` and a lone `\r` each end a line, as they do
/// for the lexer; columns count bytes.
fn advance_position(mut position: Position, text: &str) -> Position {
    let mut bytes = text.bytes().peekable();
    while let Some(byte) = bytes.next() {
        match byte {
            b'\r' if bytes.peek() == Some(&b'\n') => {}
            b'\n' | b'\r' => position = Position::new(position.line + 1, 1),
            _ => position.column += 1,
        }
    }
    position
}
