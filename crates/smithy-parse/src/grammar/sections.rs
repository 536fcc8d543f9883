use smithy_tree::TokenKind::*;
use smithy_tree::TreeKind;

use super::trivia::{expect_and_skip_br, expect_and_skip_spaces, skip_spaces};
use super::{ids, keyword, statements, values};
use crate::buffer::{DocComments, TokenBuffer};

pub(crate) fn control_section(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::CONTROL_SECTION, |p| {
        while p.at(DOLLAR) {
            p.with_scope(TreeKind::CONTROL_STATEMENT, |p| {
                p.advance()?;
                values::node_object_key(p)?;
                skip_spaces(p);
                p.expect(COLON)?;
                p.advance()?;
                skip_spaces(p);
                values::node_value(p);
                expect_and_skip_br(p)
            });
        }
        Ok(())
    });
}

pub(crate) fn metadata_section(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::METADATA_SECTION, |p| {
        while p.at_keyword("metadata") {
            p.with_scope(TreeKind::METADATA_STATEMENT, |p| {
                keyword(p);
                expect_and_skip_spaces(p)?;
                values::node_object_key(p)?;
                skip_spaces(p);
                p.expect(EQUAL)?;
                p.advance()?;
                skip_spaces(p);
                values::node_value(p);
                expect_and_skip_br(p)
            });
        }
        Ok(())
    });
}

/// Namespace, use statements and every shape or apply statement of the file.
pub(crate) fn shape_section(p: &mut TokenBuffer<'_>) {
    if !p.has_next() {
        return;
    }

    p.with_scope(TreeKind::SHAPE_SECTION, |p| {
        let docs = if p.at_keyword("namespace") {
            namespace_statement(p)
        } else {
            let message =
                format!("Expected a namespace definition but found {}", p.current().debug());
            p.error_here(message);
            None
        };

        let docs = use_section(p, docs);
        statements::shape_statements(p, docs);
        Ok(())
    });
}

fn namespace_statement(p: &mut TokenBuffer<'_>) -> Option<DocComments> {
    p.with_scope(TreeKind::NAMESPACE_STATEMENT, |p| {
        keyword(p);
        expect_and_skip_spaces(p)?;
        ids::namespace(p)?;
        expect_and_skip_br(p)
    })
    .value
    .flatten()
}

fn use_section(p: &mut TokenBuffer<'_>, docs: Option<DocComments>) -> Option<DocComments> {
    p.with_scope(TreeKind::USE_SECTION, |p| {
        let mut docs = docs;
        while p.at_keyword("use") {
            docs = p
                .with_scope(TreeKind::USE_STATEMENT, |p| {
                    keyword(p);
                    expect_and_skip_spaces(p)?;
                    ids::absolute_shape_id(p)?;
                    expect_and_skip_br(p)
                })
                .value
                .flatten();
        }
        Ok(docs)
    })
    .value
    .flatten()
}
