use std::rc::Rc;

use smithy_tree::TokenKind::*;
use smithy_tree::{TokenSet, TreeKind};

use super::trivia::{expect_and_skip_br, skip_spaces, skip_ws_keeping_docs};
use super::{ids, traits, values};
use crate::buffer::{DocComments, TokenBuffer};
use crate::error::PResult;

/// Where a member appears, which decides the names it may take and its node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberPosition {
    List,
    MapFirst,
    MapValue,
    Structure,
    Union,
}

impl MemberPosition {
    fn allows_assignment(self) -> bool {
        self == Self::Structure
    }

    fn classify(self, p: &TokenBuffer<'_>, name: &str, elided: bool) -> PResult<TreeKind> {
        let (explicit, implicit) = match self {
            Self::List if name == "member" => {
                (TreeKind::EXPLICIT_LIST_MEMBER, TreeKind::ELIDED_LIST_MEMBER)
            }
            Self::List => {
                return Err(p.syntax_error(format!(
                    "Expected a member named 'member', but found '{name}'"
                )));
            }
            Self::MapFirst if name == "key" => {
                (TreeKind::EXPLICIT_MAP_KEY, TreeKind::ELIDED_MAP_KEY)
            }
            Self::MapFirst | Self::MapValue if name == "value" => {
                (TreeKind::EXPLICIT_MAP_VALUE, TreeKind::ELIDED_MAP_VALUE)
            }
            Self::MapFirst => {
                return Err(p.syntax_error(format!(
                    "Invalid map member. Expected 'key' or 'value', found '{name}'"
                )));
            }
            Self::MapValue => {
                return Err(p.syntax_error(format!(
                    "Expected a member named 'value', but found '{name}'"
                )));
            }
            Self::Structure | Self::Union => {
                (TreeKind::EXPLICIT_STRUCTURE_MEMBER, TreeKind::ELIDED_STRUCTURE_MEMBER)
            }
        };
        Ok(if elided { implicit } else { explicit })
    }
}

/// A parsed member: its resolved name and the doc comments trailing it.
pub(crate) struct Member {
    pub(crate) name: Rc<str>,
    pub(crate) docs: Option<DocComments>,
}

/// Parses an explicit (`name: Target`) or elided (`$name`) member inside a SHAPE_MEMBER node.
pub(crate) fn shape_member(
    p: &mut TokenBuffer<'_>,
    position: MemberPosition,
    docs: Option<DocComments>,
) -> Option<Member> {
    p.with_scope(TreeKind::SHAPE_MEMBER, |p| {
        p.move_doc_comments_here(docs);
        if !member_traits(p) {
            return Ok(None);
        }

        let elided = p.expect(TokenSet::new([IDENTIFIER, DOLLAR]))? == DOLLAR;
        let name_offset = usize::from(elided);
        let name_token = p.peek(name_offset);
        if name_token.kind != IDENTIFIER {
            let message = format!("Expected a member name but found {}", name_token.debug());
            return Err(p.syntax_error(message));
        }

        let name = p.intern_at(name_offset);
        let kind = position.classify(p, &name, elided)?;

        p.with_scope(kind, |p| {
            if elided {
                p.advance()?;
            }
            member_name(p);
            if !elided {
                skip_spaces(p);
                p.expect(COLON)?;
                p.advance()?;
                skip_spaces(p);
                ids::shape_id(p, false)?;
            }
            Ok(())
        });

        let docs = trailing(p, position.allows_assignment());
        Ok(Some(Member { name, docs }))
    })
    .value
    .flatten()
}

/// An enum member: traits, a name and an optional value assignment.
pub(crate) fn enum_member(
    p: &mut TokenBuffer<'_>,
    docs: Option<DocComments>,
) -> PResult<Option<DocComments>> {
    p.move_doc_comments_here(docs);
    if !member_traits(p) {
        return Ok(None);
    }
    p.expect(IDENTIFIER)?;
    member_name(p);
    Ok(trailing(p, true))
}

/// Parses the member's traits, returning false when one of them failed and recovered.
fn member_traits(p: &mut TokenBuffer<'_>) -> bool {
    let errors = p.error_count();
    traits::trait_statements(p);
    p.error_count() == errors
}

fn member_name(p: &mut TokenBuffer<'_>) {
    p.with_scope(TreeKind::SHAPE_MEMBER_NAME, |p| {
        p.advance()?;
        Ok(())
    });
}

fn trailing(p: &mut TokenBuffer<'_>, allows_assignment: bool) -> Option<DocComments> {
    if allows_assignment && p.peek_past_spaces(0).kind == EQUAL {
        return p.with_scope(TreeKind::VALUE_ASSIGNMENT, value_assignment).value.flatten();
    }
    skip_ws_keeping_docs(p)
}

/// `[SP] "=" [SP] NodeValue [SP] [","] BR`
fn value_assignment(p: &mut TokenBuffer<'_>) -> PResult<Option<DocComments>> {
    skip_spaces(p);
    p.expect(EQUAL)?;
    p.advance()?;
    skip_spaces(p);
    values::node_value(p);
    skip_spaces(p);
    if p.at(COMMA) {
        p.advance()?;
    }
    expect_and_skip_br(p)
}
