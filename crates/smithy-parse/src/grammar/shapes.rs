use smithy_tree::TokenKind::*;
use smithy_tree::{TokenSet, TreeKind};

use super::members::{self, MemberPosition};
use super::trivia::{expect_and_skip_spaces, skip_spaces, skip_ws};
use super::{ids, keyword, traits, values};
use crate::buffer::TokenBuffer;
use crate::error::PResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeType {
    Blob,
    Boolean,
    Document,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
    Enum,
    IntEnum,
    List,
    Set,
    Map,
    Structure,
    Union,
    Service,
    Resource,
    Operation,
}

impl ShapeType {
    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "blob" => Self::Blob,
            "boolean" => Self::Boolean,
            "document" => Self::Document,
            "string" => Self::String,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "bigInteger" => Self::BigInteger,
            "bigDecimal" => Self::BigDecimal,
            "timestamp" => Self::Timestamp,
            "enum" => Self::Enum,
            "intEnum" => Self::IntEnum,
            "list" => Self::List,
            "set" => Self::Set,
            "map" => Self::Map,
            "structure" => Self::Structure,
            "union" => Self::Union,
            "service" => Self::Service,
            "resource" => Self::Resource,
            "operation" => Self::Operation,
            _ => return None,
        })
    }

    fn statement(self) -> TreeKind {
        match self {
            Self::Enum | Self::IntEnum => TreeKind::ENUM_STATEMENT,
            Self::List | Self::Set => TreeKind::LIST_STATEMENT,
            Self::Map => TreeKind::MAP_STATEMENT,
            Self::Structure => TreeKind::STRUCTURE_STATEMENT,
            Self::Union => TreeKind::UNION_STATEMENT,
            Self::Service => TreeKind::SERVICE_STATEMENT,
            Self::Resource => TreeKind::RESOURCE_STATEMENT,
            Self::Operation => TreeKind::OPERATION_STATEMENT,
            _ => TreeKind::SIMPLE_SHAPE_STATEMENT,
        }
    }
}

/// Dispatches on the shape type keyword.
pub(crate) fn shape_body(p: &mut TokenBuffer<'_>) -> PResult<()> {
    let keyword = p.intern_at(0);
    let Some(shape_type) = ShapeType::from_keyword(&keyword) else {
        return Err(p.syntax_error(format!("Expected a valid shape type but found '{keyword}'")));
    };

    let body: fn(&mut TokenBuffer<'_>) -> PResult<()> = match shape_type {
        ShapeType::Enum | ShapeType::IntEnum => enum_shape,
        ShapeType::List | ShapeType::Set => list_shape,
        ShapeType::Map => map_shape,
        ShapeType::Structure => structure_shape,
        ShapeType::Union => union_shape,
        ShapeType::Service | ShapeType::Resource => entity_shape,
        ShapeType::Operation => operation_shape,
        _ => simple_shape,
    };
    p.with_scope(shape_type.statement(), body);
    Ok(())
}

/// Shape keyword, the shape name and the spaces after it.
fn type_and_name(p: &mut TokenBuffer<'_>) -> PResult<()> {
    keyword(p);
    expect_and_skip_spaces(p)?;
    p.expect(IDENTIFIER)?;
    p.advance()?;
    skip_spaces(p);
    Ok(())
}

fn mixins(p: &mut TokenBuffer<'_>) -> PResult<()> {
    if !p.at_keyword("with") {
        return Ok(());
    }

    p.with_scope(TreeKind::SHAPE_MIXINS, |p| {
        keyword(p);
        skip_ws(p);
        p.expect(LBRACKET)?;
        p.advance()?;
        skip_ws(p);
        loop {
            ids::shape_id(p, false)?;
            skip_ws(p);
            if p.expect(TokenSet::new([IDENTIFIER, RBRACKET]))? == RBRACKET {
                break;
            }
        }
        p.advance()?;
        Ok(())
    });
    Ok(())
}

fn simple_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)
}

fn enum_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    p.expect(LBRACE)?;

    p.with_scope(TreeKind::ENUM_MEMBERS, |p| {
        p.advance()?;
        skip_ws(p);

        let mut docs = None;
        while p.has_next() && !p.at(RBRACE) {
            let pending = docs;
            docs = p
                .with_scope(TreeKind::ENUM_MEMBER, move |p| members::enum_member(p, pending))
                .value
                .flatten();
        }

        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
    Ok(())
}

fn list_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    p.expect(LBRACE)?;

    p.with_scope(TreeKind::LIST_MEMBERS, |p| {
        p.advance()?;
        skip_ws(p);

        if p.has_next() && !p.at(RBRACE) {
            p.with_scope(TreeKind::LIST_MEMBER, |p| {
                members::shape_member(p, MemberPosition::List, None);
                Ok(())
            });
        }

        skip_ws(p);
        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
    Ok(())
}

fn map_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    p.expect(LBRACE)?;

    p.with_scope(TreeKind::MAP_MEMBERS, |p| {
        p.advance()?;
        skip_ws(p);

        if p.has_next() && !p.at(RBRACE) {
            let first = members::shape_member(p, MemberPosition::MapFirst, None);
            if let Some(first) = first {
                if p.has_next() && !p.at(RBRACE) {
                    if &*first.name == "value" {
                        return Err(p.syntax_error("Expected '}' after the map value member"));
                    }
                    members::shape_member(p, MemberPosition::MapValue, first.docs);
                }
            }
        }

        skip_ws(p);
        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
    Ok(())
}

fn structure_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    if p.at_keyword("for") {
        structure_resource(p)?;
        skip_spaces(p);
    }
    mixins(p)?;
    skip_ws(p);
    aggregate_members(
        p,
        TreeKind::STRUCTURE_MEMBERS,
        TreeKind::STRUCTURE_MEMBER,
        MemberPosition::Structure,
    )
}

fn union_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    aggregate_members(p, TreeKind::UNION_MEMBERS, TreeKind::UNION_MEMBER, MemberPosition::Union)
}

/// `"for" SP ShapeId`
fn structure_resource(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.with_scope(TreeKind::STRUCTURE_RESOURCE, |p| {
        keyword(p);
        expect_and_skip_spaces(p)?;
        ids::shape_id(p, false)
    });
    Ok(())
}

fn aggregate_members(
    p: &mut TokenBuffer<'_>,
    container: TreeKind,
    wrapper: TreeKind,
    position: MemberPosition,
) -> PResult<()> {
    p.expect(LBRACE)?;

    p.with_scope(container, |p| {
        p.advance()?;
        skip_ws(p);

        let mut docs = None;
        while p.has_next() && !p.at(RBRACE) {
            let pending = docs;
            docs = p
                .with_scope(wrapper, move |p| {
                    Ok(members::shape_member(p, position, pending).and_then(|member| member.docs))
                })
                .value
                .flatten();
        }

        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
    Ok(())
}

/// Services and resources carry their properties as a node object.
fn entity_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    p.expect(LBRACE)?;
    values::node_object(p);
    Ok(())
}

fn operation_shape(p: &mut TokenBuffer<'_>) -> PResult<()> {
    type_and_name(p)?;
    mixins(p)?;
    skip_ws(p);
    p.expect(LBRACE)?;

    p.with_scope(TreeKind::OPERATION_BODY, |p| {
        p.advance()?;
        skip_ws(p);

        let mut seen = Vec::new();
        while p.has_next() && !p.at(RBRACE) {
            p.expect(IDENTIFIER)?;
            let name = p.intern_at(0);
            if seen.contains(&name) {
                return Err(p.syntax_error(format!("Duplicate operation property '{name}'")));
            }

            let kind = match &*name {
                "input" => TreeKind::OPERATION_INPUT,
                "output" => TreeKind::OPERATION_OUTPUT,
                "errors" => TreeKind::OPERATION_ERRORS,
                _ => {
                    return Err(p.syntax_error(format!(
                        "Expected 'input', 'output', or 'errors' but found '{name}'"
                    )));
                }
            };
            seen.push(name);

            if kind == TreeKind::OPERATION_ERRORS {
                p.with_scope(kind, operation_errors);
            } else {
                p.with_scope(kind, operation_io);
            }
            skip_ws(p);
        }

        p.expect(RBRACE)?;
        p.advance()?;
        Ok(())
    });
    Ok(())
}

/// `input`/`output`, either targeting a shape or defining one inline with `:=`.
fn operation_io(p: &mut TokenBuffer<'_>) -> PResult<()> {
    let inline = p.peek_past_whitespace(1).kind == WALRUS;
    keyword(p);
    skip_ws(p);

    if inline {
        return inline_structure(p);
    }

    p.expect(COLON)?;
    p.advance()?;
    skip_ws(p);
    ids::shape_id(p, false)
}

fn inline_structure(p: &mut TokenBuffer<'_>) -> PResult<()> {
    p.expect(WALRUS)?;
    p.with_scope(TreeKind::INLINE_STRUCTURE, |p| {
        p.advance()?;
        skip_ws(p);
        traits::trait_statements(p);
        if p.at_keyword("for") {
            structure_resource(p)?;
            skip_spaces(p);
        }
        mixins(p)?;
        skip_ws(p);
        aggregate_members(
            p,
            TreeKind::STRUCTURE_MEMBERS,
            TreeKind::STRUCTURE_MEMBER,
            MemberPosition::Structure,
        )
    });
    Ok(())
}

fn operation_errors(p: &mut TokenBuffer<'_>) -> PResult<()> {
    keyword(p);
    skip_ws(p);
    p.expect(COLON)?;
    p.advance()?;
    skip_ws(p);
    p.expect(LBRACKET)?;
    p.advance()?;
    skip_ws(p);

    while p.has_next() && !p.at(RBRACKET) {
        ids::shape_id(p, false)?;
        skip_ws(p);
    }

    p.expect(RBRACKET)?;
    p.advance()?;
    Ok(())
}
