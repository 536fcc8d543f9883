/// Grammar label of a tree node. Leaves are labeled [`TreeKind::TOKEN`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TreeKind {
    IDL,

    CONTROL_SECTION,
    CONTROL_STATEMENT,

    METADATA_SECTION,
    METADATA_STATEMENT,

    SHAPE_SECTION,
    NAMESPACE_STATEMENT,
    USE_SECTION,
    USE_STATEMENT,

    SHAPE_STATEMENTS,
    SHAPE_OR_APPLY_STATEMENT,
    SHAPE_STATEMENT,
    SHAPE_BODY,

    SIMPLE_SHAPE_STATEMENT,

    ENUM_STATEMENT,
    ENUM_MEMBERS,
    ENUM_MEMBER,

    LIST_STATEMENT,
    LIST_MEMBERS,
    LIST_MEMBER,
    ELIDED_LIST_MEMBER,
    EXPLICIT_LIST_MEMBER,

    MAP_STATEMENT,
    MAP_MEMBERS,
    ELIDED_MAP_KEY,
    EXPLICIT_MAP_KEY,
    ELIDED_MAP_VALUE,
    EXPLICIT_MAP_VALUE,

    STRUCTURE_STATEMENT,
    STRUCTURE_MEMBERS,
    STRUCTURE_MEMBER,
    EXPLICIT_STRUCTURE_MEMBER,
    ELIDED_STRUCTURE_MEMBER,

    UNION_STATEMENT,
    UNION_MEMBERS,
    UNION_MEMBER,

    SERVICE_STATEMENT,
    RESOURCE_STATEMENT,

    OPERATION_STATEMENT,
    OPERATION_BODY,
    OPERATION_INPUT,
    OPERATION_OUTPUT,
    OPERATION_ERRORS,
    INLINE_STRUCTURE,

    SHAPE_MIXINS,
    SHAPE_MEMBER,
    SHAPE_MEMBER_NAME,
    STRUCTURE_RESOURCE,
    VALUE_ASSIGNMENT,

    TRAIT_STATEMENTS,
    TRAIT,
    TRAIT_BODY,
    TRAIT_BODY_VALUE,
    TRAIT_STRUCTURE,
    TRAIT_STRUCTURE_KVP,

    APPLY_STATEMENT,
    APPLY_STATEMENT_SINGULAR,
    APPLY_STATEMENT_BLOCK,

    NODE_VALUE,
    NODE_ARRAY,
    NODE_OBJECT,
    NODE_OBJECT_KVP,
    NODE_OBJECT_KEY,

    SHAPE_ID,
    SHAPE_ID_MEMBER,
    NAMESPACE,

    SPACES,
    WHITESPACE,
    BR,
    KEYWORD,

    ERROR,
    TOKEN,
}

impl TreeKind {
    pub fn is_explicit_member(self) -> bool {
        matches!(
            self,
            Self::EXPLICIT_LIST_MEMBER
                | Self::EXPLICIT_MAP_KEY
                | Self::EXPLICIT_MAP_VALUE
                | Self::EXPLICIT_STRUCTURE_MEMBER
        )
    }

    pub fn is_elided_member(self) -> bool {
        matches!(
            self,
            Self::ELIDED_LIST_MEMBER
                | Self::ELIDED_MAP_KEY
                | Self::ELIDED_MAP_VALUE
                | Self::ELIDED_STRUCTURE_MEMBER
        )
    }
}
