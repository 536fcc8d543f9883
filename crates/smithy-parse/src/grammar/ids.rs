use smithy_tree::TokenKind::*;
use smithy_tree::TreeKind;

use crate::buffer::TokenBuffer;
use crate::error::PResult;

/// `Identifier *("." Identifier)`
pub(crate) fn namespace(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(IDENTIFIER)?;
    p.with_scope(TreeKind::NAMESPACE, |p| {
        p.advance()?;
        while p.at(DOT) {
            p.advance()?;
            p.expect(IDENTIFIER)?;
            p.advance()?;
        }
        Ok(())
    });
    Ok(())
}

/// A relative or absolute shape id. A `$member` suffix is only accepted where
/// `allow_member` is set.
pub(crate) fn shape_id(p: &mut TokenBuffer<'_>, allow_member: bool) -> PResult<()> {
    p.expect(IDENTIFIER)?;
    let absolute = p.peek_while(0, |kind| matches!(kind, IDENTIFIER | DOT)).kind == POUND;

    p.with_scope(TreeKind::SHAPE_ID, |p| {
        if absolute {
            namespace(p)?;
            p.expect(POUND)?;
            p.advance()?;
            p.expect(IDENTIFIER)?;
        }
        p.advance()?;

        if allow_member && p.at(DOLLAR) {
            p.advance()?;
            p.expect(IDENTIFIER)?;
            p.with_scope(TreeKind::SHAPE_ID_MEMBER, |p| {
                p.advance()?;
                Ok(())
            });
        }
        Ok(())
    });
    Ok(())
}

pub(crate) fn absolute_shape_id(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(IDENTIFIER)?;
    if p.peek_while(0, |kind| matches!(kind, IDENTIFIER | DOT)).kind != POUND {
        let message =
            format!("Expected an absolute shape ID but found {}", p.current().debug());
        return Err(p.syntax_error(message));
    }
    shape_id(p, false)
}
