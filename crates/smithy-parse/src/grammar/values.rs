use smithy_tree::TokenKind::*;
use smithy_tree::{TokenSet, TreeKind};

use super::trivia::skip_ws;
use super::{ids, keyword};
use crate::buffer::TokenBuffer;
use crate::error::PResult;

const VALUE_START: TokenSet =
    TokenSet::new([LBRACKET, LBRACE, STRING, TEXT_BLOCK, NUMBER, IDENTIFIER]);

pub(crate) fn node_value(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::NODE_VALUE, |p| {
        match p.expect(VALUE_START)? {
            LBRACKET => node_array(p),
            LBRACE => node_object(p),
            IDENTIFIER if matches!(p.current().lexeme(), "true" | "false" | "null") => keyword(p),
            IDENTIFIER => ids::shape_id(p, true)?,
            _ => {
                p.advance()?;
            }
        }
        Ok(())
    });
}

fn node_array(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::NODE_ARRAY, |p| {
        p.advance()?;
        skip_ws(p);

        while p.has_next() && !p.at(RBRACKET) {
            let errors = p.error_count();
            node_value(p);
            if p.error_count() > errors {
                return Ok(());
            }
            skip_ws(p);
        }

        p.expect(RBRACKET)?;
        p.advance()?;
        Ok(())
    });
}

pub(crate) fn node_object(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::NODE_OBJECT, |p| {
        p.advance()?;
        skip_ws(p);

        while p.has_next() && !p.at(RBRACE) {
            let errors = p.error_count();
            p.with_scope(TreeKind::NODE_OBJECT_KVP, key_value_pair);
            if p.error_count() > errors {
                return Ok(());
            }
            skip_ws(p);
        }

        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
}

/// `NodeObjectKey [WS] ":" [WS] NodeValue`
pub(crate) fn key_value_pair(p: &mut TokenBuffer<'_>) -> PResult<()> {
    node_object_key(p)?;
    skip_ws(p);
    p.expect(COLON)?;
    p.advance()?;
    skip_ws(p);
    node_value(p);
    Ok(())
}

pub(crate) fn node_object_key(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(TokenSet::new([STRING, IDENTIFIER]))?;
    p.with_scope(TreeKind::NODE_OBJECT_KEY, |p| {
        p.advance()?;
        Ok(())
    });
    Ok(())
}
