use smithy_tree::TokenKind::*;
use smithy_tree::{NodeId, TreeKind};

use super::trivia::{
    expect_and_skip_br, expect_and_skip_spaces, expect_and_skip_ws, skip_ws, skip_ws_keeping_docs,
};
use super::{ids, keyword, shapes, traits};
use crate::buffer::{DocComments, TokenBuffer};
use crate::error::PResult;

pub(crate) fn shape_statements(p: &mut TokenBuffer<'_>, docs: Option<DocComments>) {
    p.with_scope(TreeKind::SHAPE_STATEMENTS, |p| {
        let mut docs = docs;
        while p.has_next() {
            docs = shape_or_apply_statement(p, docs);
        }
        Ok(())
    });
}

/// Parses one statement and its line break, returning the doc comments for the next one.
fn shape_or_apply_statement(
    p: &mut TokenBuffer<'_>,
    docs: Option<DocComments>,
) -> Option<DocComments> {
    if p.current().kind.is_trivia() {
        return skip_ws_keeping_docs(p);
    }

    let traits = traits::trait_statements(p);
    if let Some(traits) = traits {
        p.detach(traits);
    }

    if p.at_keyword("apply") {
        if let Some(traits) = traits {
            p.wrap_in_error(traits, "Traits applied to apply statement");
        }
        p.with_scope(TreeKind::SHAPE_OR_APPLY_STATEMENT, apply_statement);
    } else if p.at(IDENTIFIER) {
        p.with_scope(TreeKind::SHAPE_OR_APPLY_STATEMENT, |p| {
            shape_statement(p, docs, traits);
            Ok(())
        });
    } else if let Some(traits) = traits {
        p.wrap_in_error(traits, "Found traits attached to nothing");
        return None;
    } else {
        p.with_scope(TreeKind::SHAPE_OR_APPLY_STATEMENT, |p| -> PResult<()> {
            let message =
                format!("Expected a shape or apply statement but found {}", p.current().debug());
            Err(p.syntax_error(message))
        });
        return None;
    }

    match expect_and_skip_br(p) {
        Ok(docs) => docs,
        Err(error) => {
            p.report(error, TokenBuffer::recover_to_statement);
            None
        }
    }
}

fn shape_statement(p: &mut TokenBuffer<'_>, docs: Option<DocComments>, traits: Option<NodeId>) {
    p.with_scope(TreeKind::SHAPE_STATEMENT, |p| {
        p.move_doc_comments_here(docs);
        if let Some(traits) = traits {
            p.attach(traits);
        }
        p.with_scope(TreeKind::SHAPE_BODY, shapes::shape_body);
        Ok(())
    });
}

/// `apply` followed by a single trait or a braced block of traits.
fn apply_statement(p: &mut TokenBuffer<'_>) -> PResult<()> {
    let block = p.peek_while(1, |kind| !matches!(kind, AT | LBRACE)).kind == LBRACE;
    let kind = if block {
        TreeKind::APPLY_STATEMENT_BLOCK
    } else {
        TreeKind::APPLY_STATEMENT_SINGULAR
    };

    p.with_scope(TreeKind::APPLY_STATEMENT, |p| {
        p.with_scope(kind, |p| {
            keyword(p);
            expect_and_skip_spaces(p)?;
            ids::shape_id(p, true)?;
            expect_and_skip_ws(p)?;

            if block {
                p.expect(LBRACE)?;
                p.advance()?;
                skip_ws(p);
                traits::trait_statements(p);
                skip_ws(p);
                p.expect(RBRACE)?;
                p.advance()?;
            } else {
                traits::trait_statement(p)?;
            }
            Ok(())
        });
        Ok(())
    });
    Ok(())
}
