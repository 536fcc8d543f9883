use smithy_tree::TokenKind::{self, *};
use smithy_tree::{TokenSet, TreeKind};

use crate::buffer::{DocComments, TokenBuffer};
use crate::error::PResult;

pub(crate) fn skip_spaces(p: &mut TokenBuffer<'_>) {
    if p.at(SPACE) {
        p.with_scope(TreeKind::SPACES, |p| {
            p.advance_while(|kind| kind == SPACE);
            Ok(())
        });
    }
}

pub(crate) fn expect_and_skip_spaces(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(SPACE)?;
    skip_spaces(p);
    Ok(())
}

/// Skips any whitespace, comments and doc comments.
pub(crate) fn skip_ws(p: &mut TokenBuffer<'_>) {
    if p.current().kind.is_trivia() {
        p.with_scope(TreeKind::WHITESPACE, |p| {
            p.advance_while(TokenKind::is_trivia);
            Ok(())
        });
    }
}

pub(crate) fn expect_and_skip_ws(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(TokenSet::TRIVIA)?;
    skip_ws(p);
    Ok(())
}

/// Skips whitespace after a member, keeping the doc comments that follow for the next one.
pub(crate) fn skip_ws_keeping_docs(p: &mut TokenBuffer<'_>) -> Option<DocComments> {
    if p.current().kind.is_whitespace() {
        p.with_scope(TreeKind::WHITESPACE, |p| {
            p.advance_while(TokenKind::is_whitespace);
            Ok(())
        });
    }
    doc_comments(p)
}

/// Consumes a line break. Returns the doc comments that start the next line, if any.
pub(crate) fn expect_and_skip_br(p: &mut TokenBuffer<'_>) -> PResult<Option<DocComments>> {
    skip_spaces(p);

    let current = p.current();
    match current.kind {
        NEWLINE | COMMENT | DOC_COMMENT => {}
        EOF => return Ok(None),
        _ if current.start.column == 1 => return Ok(None),
        _ => {
            let message = format!("Expected a line break but found {}", current.debug());
            return Err(p.syntax_error(message));
        }
    }

    let br = p.with_scope(TreeKind::BR, |p| {
        p.advance()?;
        p.advance_while(TokenKind::is_whitespace);
        Ok(doc_comments(p))
    });
    Ok(br.value.flatten())
}

fn doc_comments(p: &mut TokenBuffer<'_>) -> Option<DocComments> {
    if !p.at(DOC_COMMENT) {
        return None;
    }

    let docs = p.with_scope(TreeKind::WHITESPACE, |p| {
        p.advance_while(TokenKind::is_trivia);
        Ok(())
    });
    Some(DocComments::new(docs.node))
}
