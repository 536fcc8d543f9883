use smithy_tree::TokenKind::*;
use smithy_tree::{NodeId, TreeKind};

use super::trivia::skip_ws;
use super::{ids, values};
use crate::buffer::TokenBuffer;
use crate::error::PResult;

/// Parses a run of traits, returning the TRAIT_STATEMENTS node when there was one.
pub(crate) fn trait_statements(p: &mut TokenBuffer<'_>) -> Option<NodeId> {
    if !p.at(AT) {
        return None;
    }

    let traits = p.with_scope(TreeKind::TRAIT_STATEMENTS, |p| {
        while p.at(AT) {
            trait_statement(p)?;
            skip_ws(p);
        }
        Ok(())
    });
    Some(traits.node)
}

/// `"@" ShapeId [TraitBody]`
pub(crate) fn trait_statement(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(AT)?;
    p.with_scope(TreeKind::TRAIT, |p| {
        p.advance()?;
        ids::shape_id(p, false)?;
        if p.at(LPAREN) {
            trait_body(p);
        }
        Ok(())
    });
    Ok(())
}

fn trait_body(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::TRAIT_BODY, |p| {
        p.advance()?;
        skip_ws(p);

        if !p.at(RPAREN) {
            let errors = p.error_count();
            if at_trait_structure(p) {
                trait_structure(p);
            } else {
                p.with_scope(TreeKind::TRAIT_BODY_VALUE, |p| {
                    values::node_value(p);
                    Ok(())
                });
            }
            if p.error_count() > errors {
                return Ok(());
            }
            skip_ws(p);
        }

        p.expect(RPAREN)?;
        p.advance()?;
        Ok(())
    });
}

/// A key followed by `:` starts a structure; anything else is a single node value.
fn at_trait_structure(p: &TokenBuffer<'_>) -> bool {
    matches!(p.current().kind, IDENTIFIER | STRING) && p.peek_past_trivia(1).kind == COLON
}

fn trait_structure(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::TRAIT_STRUCTURE, |p| {
        while p.has_next() && !p.at(RPAREN) {
            let errors = p.error_count();
            p.with_scope(TreeKind::TRAIT_STRUCTURE_KVP, values::key_value_pair);
            if p.error_count() > errors {
                break;
            }
            skip_ws(p);
        }
        Ok(())
    });
}
