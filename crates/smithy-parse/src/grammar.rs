use smithy_tree::TreeKind;

use crate::buffer::TokenBuffer;

mod ids;
mod members;
mod sections;
mod shapes;
mod statements;
mod traits;
mod trivia;
mod values;

/// Parses a whole model file into the root node.
pub(crate) fn idl(p: &mut TokenBuffer<'_>) {
    trivia::skip_ws(p);
    sections::control_section(p);
    sections::metadata_section(p);
    sections::shape_section(p);

    // A section whose own scope failed stops recovering at the next statement start.
    if p.has_next() {
        let error =
            p.syntax_error(format!("Expected the end of the file but found {}", p.current().debug()));
        p.report(error, TokenBuffer::recover_to_eof);
    }
}

/// Wraps the current identifier in a KEYWORD node.
fn keyword(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::KEYWORD, |p| {
        p.advance()?;
        Ok(())
    });
}
