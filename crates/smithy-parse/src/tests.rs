use expect_test::expect;
use smithy_tree::TokenKind::*;
use smithy_tree::{Number, Position, TreeKind, TreeNode};

use crate::buffer::TokenBuffer;
use crate::error::PResult;
use crate::{Parse, ParseOptions, parse, parse_with};

const MODEL: &str = r#"$version: "2.0"

metadata foo = ["a", "b"]

namespace smithy.example

use smithy.api#Foo

/// Documentation
@tags(["a"])
@length(min: 1, max: 10)
string MyString

@mixin
structure Base {
    id: String
}

structure Person with [Base] {
    /// The name
    @required
    name: String = "anonymous"

    age: Integer
    $id
}

list Names {
    member: String
}

map Index {
    key: String
    value: Integer
}

union Choice {
    a: String
    b: Integer
}

enum Suit {
    CLUB
    @deprecated
    DIAMOND = "diamond"
}

intEnum Level {
    LOW = 1
    HIGH = 2
}

operation GetPerson {
    input := {
        @required
        id: String
    }
    output: Person
    errors: [NotFound, smithy.example#Conflict]
}

service Directory {
    version: "2024-01-01"
    operations: [GetPerson]
}

resource City {
    identifiers: { cityId: CityId }
}

apply Person$name @documentation("Name")

apply Person {
    @sensitive
    @since("1.0")
}
"#;

fn check(text: &str) -> Parse {
    let parse = parse("test.smithy", text);
    assert_eq!(parse.root().text(), text, "tree is not lossless");
    parse
}

fn check_valid(text: &str) -> Parse {
    let parse = check(text);
    assert!(!parse.has_errors(), "unexpected errors {:?} in\n{}", messages(&parse), parse.tree());
    parse
}

fn messages(parse: &Parse) -> Vec<String> {
    parse.errors().into_iter().map(|error| error.message).collect()
}

fn count(parse: &Parse, kind: TreeKind) -> usize {
    parse.root().find_descendants(kind).len()
}

#[test]
fn debug_dump() {
    let parse = check_valid("namespace a\nstring B\n");
    expect![[r#"
        IDL (1, 1) - (3, 1) {
            CONTROL_SECTION (0, 0) - (0, 0) {}
            METADATA_SECTION (0, 0) - (0, 0) {}
            SHAPE_SECTION (1, 1) - (3, 1) {
                NAMESPACE_STATEMENT (1, 1) - (2, 1) {
                    KEYWORD (1, 1) - (1, 10) {
                        IDENTIFIER('namespace')
                    }
                    SPACES (1, 10) - (1, 11) {
                        SPACE(' ')
                    }
                    NAMESPACE (1, 11) - (1, 12) {
                        IDENTIFIER('a')
                    }
                    BR (1, 12) - (2, 1) {
                        NEWLINE('\n')
                    }
                }
                USE_SECTION (0, 0) - (0, 0) {}
                SHAPE_STATEMENTS (2, 1) - (3, 1) {
                    SHAPE_OR_APPLY_STATEMENT (2, 1) - (2, 9) {
                        SHAPE_STATEMENT (2, 1) - (2, 9) {
                            SHAPE_BODY (2, 1) - (2, 9) {
                                SIMPLE_SHAPE_STATEMENT (2, 1) - (2, 9) {
                                    KEYWORD (2, 1) - (2, 7) {
                                        IDENTIFIER('string')
                                    }
                                    SPACES (2, 7) - (2, 8) {
                                        SPACE(' ')
                                    }
                                    IDENTIFIER('B')
                                }
                            }
                        }
                    }
                    BR (2, 9) - (3, 1) {
                        NEWLINE('\n')
                    }
                }
            }
        }
    "#]]
    .assert_eq(&parse.tree().to_string());
}

#[test]
fn full_model() {
    let parse = check_valid(MODEL);

    assert_eq!(count(&parse, TreeKind::CONTROL_STATEMENT), 1);
    assert_eq!(count(&parse, TreeKind::METADATA_STATEMENT), 1);
    assert_eq!(count(&parse, TreeKind::USE_STATEMENT), 1);
    assert_eq!(count(&parse, TreeKind::SHAPE_OR_APPLY_STATEMENT), 13);
    assert_eq!(count(&parse, TreeKind::APPLY_STATEMENT_SINGULAR), 1);
    assert_eq!(count(&parse, TreeKind::APPLY_STATEMENT_BLOCK), 1);
    assert_eq!(count(&parse, TreeKind::ELIDED_STRUCTURE_MEMBER), 1);
    assert_eq!(count(&parse, TreeKind::EXPLICIT_LIST_MEMBER), 1);
    assert_eq!(count(&parse, TreeKind::EXPLICIT_MAP_KEY), 1);
    assert_eq!(count(&parse, TreeKind::EXPLICIT_MAP_VALUE), 1);
    assert_eq!(count(&parse, TreeKind::ENUM_MEMBER), 4);
    assert_eq!(count(&parse, TreeKind::VALUE_ASSIGNMENT), 4);
    assert_eq!(count(&parse, TreeKind::INLINE_STRUCTURE), 1);
    assert_eq!(count(&parse, TreeKind::OPERATION_ERRORS), 1);
    assert_eq!(count(&parse, TreeKind::SHAPE_ID_MEMBER), 1);
    assert_eq!(count(&parse, TreeKind::SHAPE_MIXINS), 1);
    assert_eq!(count(&parse, TreeKind::TRAIT_STRUCTURE_KVP), 2);
}

#[test]
fn statements_alternate_with_line_breaks() {
    let parse = check_valid(MODEL);
    let statements = parse.root().find_descendants(TreeKind::SHAPE_STATEMENTS)[0];

    for (index, child) in statements.children().enumerate() {
        let expected = if index % 2 == 0 { TreeKind::SHAPE_OR_APPLY_STATEMENT } else { TreeKind::BR };
        assert_eq!(child.kind(), expected, "child {index}");
    }
}

#[test]
fn doc_comments_move_to_the_next_statement() {
    let parse = check_valid("namespace a\n\n/// Docs\nstring A\n");

    let namespace = parse.root().find_descendants(TreeKind::NAMESPACE_STATEMENT)[0];
    let br = namespace.last_child(TreeKind::BR).unwrap();
    assert_eq!(br.text(), "\n\n");

    let statement = parse.root().find_descendants(TreeKind::SHAPE_STATEMENT)[0];
    let docs = statement.children().next().unwrap();
    assert_eq!(docs.kind(), TreeKind::WHITESPACE);
    assert_eq!(docs.text(), "/// Docs\n");
}

#[test]
fn doc_comments_move_between_shape_statements() {
    let parse = check_valid("namespace a\nstring A\n\n/// Docs\nstring B\n");

    let statements = parse.root().find_descendants(TreeKind::SHAPE_STATEMENT);
    assert_eq!(statements[0].text(), "string A");
    for br in parse.root().find_descendants(TreeKind::BR) {
        assert!(!br.text().contains("/// Docs"), "docs left in {br:?}");
    }

    let docs = statements[1].children().next().unwrap();
    assert_eq!(docs.kind(), TreeKind::WHITESPACE);
    assert_eq!(docs.text(), "/// Docs\n");
}

#[test]
fn doc_comments_precede_traits() {
    let parse = check_valid(MODEL);
    let statement = parse.root().find_descendants(TreeKind::SHAPE_STATEMENT)[0];
    let kinds = statement.children().map(TreeNode::kind).collect::<Vec<_>>();

    assert_eq!(
        kinds,
        [TreeKind::WHITESPACE, TreeKind::TRAIT_STATEMENTS, TreeKind::SHAPE_BODY]
    );
    assert!(statement.children().next().unwrap().text().starts_with("/// Documentation"));
}

#[test]
fn doc_comments_move_to_the_next_member() {
    let text = "namespace a\nstructure S {\n    a: String\n    /// Docs for b\n    b: String\n}\n";
    let parse = check_valid(text);

    let members = parse.root().find_descendants(TreeKind::SHAPE_MEMBER);
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].text(), "a: String\n    ");

    let docs = members[1].children().next().unwrap();
    assert_eq!(docs.kind(), TreeKind::WHITESPACE);
    assert_eq!(docs.text(), "/// Docs for b\n    ");
}

#[test]
fn missing_namespace() {
    let parse = check("string Foo\n");

    assert_eq!(messages(&parse), ["Expected a namespace definition but found IDENTIFIER('string')"]);
    assert_eq!(count(&parse, TreeKind::SIMPLE_SHAPE_STATEMENT), 1);

    let error = &parse.errors()[0];
    assert_eq!((error.line, error.column), (1, 1));
    assert!(error.range.is_empty());
}

#[test]
fn invalid_shape_type() {
    let parse = check("namespace a\nfoo Bar\nstring Baz\n");

    assert_eq!(messages(&parse), ["Expected a valid shape type but found 'foo'"]);
    assert_eq!(count(&parse, TreeKind::SIMPLE_SHAPE_STATEMENT), 1);

    let error = parse.root().errors()[0];
    assert_eq!(error.parent().map(TreeNode::kind), Some(TreeKind::SHAPE_BODY));
    assert_eq!(error.text(), "foo Bar\n");
}

#[test]
fn syntax_error_display() {
    let parse = check("namespace a\nfoo Bar\n");
    let error = &parse.errors()[0];

    assert_eq!(
        error.to_string(),
        "Syntax error at test.smithy [2, 1]: Expected a valid shape type but found 'foo'"
    );
    assert_eq!(error.range, text_size::TextRange::new(12.into(), 15.into()));
}

#[test]
fn diagnostics_mirror_errors() {
    let parse = check("namespace a\nfoo Bar\n}\n");
    let errors = parse.errors();
    let diagnostics = parse.diagnostics();

    assert_eq!(errors.len(), diagnostics.len());
    for (error, diagnostic) in errors.iter().zip(&diagnostics) {
        assert_eq!(error.message, diagnostic.message());
        assert_eq!(error.range, diagnostic.range());
    }
}

#[test]
fn missing_line_break() {
    let parse = check("namespace a\nstring A string B\n");
    assert_eq!(messages(&parse), ["Expected a line break but found IDENTIFIER('string')"]);
}

#[test]
fn expectation_messages() {
    let parse = check("namespace a\nstructure S {\n    a String\n}\n");
    assert_eq!(messages(&parse), ["Expected COLON(':') but found IDENTIFIER('String')"]);

    let parse = check("namespace a\nstring S with [A B\n");
    assert_eq!(messages(&parse), ["Expected one of IDENTIFIER, RBRACKET(']'); but found EOF"]);
}

#[test]
fn lexer_errors_surface_their_own_message() {
    let parse = check("namespace a\nstring A\n@foo(\"abc)\n");

    assert_eq!(messages(&parse), ["Found traits attached to nothing", "Unclosed quoted string"]);
    let token = parse.root().find_at(3, 6).token().unwrap();
    assert_eq!(token.kind, ERROR);
    assert_eq!(token.error.as_deref(), Some("Unclosed quoted string"));
}

#[test]
fn unexpected_statement_start() {
    let parse = check("namespace a\n}\nstring A\n");

    assert_eq!(messages(&parse), ["Expected a shape or apply statement but found RBRACE('}')"]);
    assert_eq!(count(&parse, TreeKind::SIMPLE_SHAPE_STATEMENT), 1);
}

#[test]
fn map_members() {
    check_valid("namespace a\nmap M { $key, $value }\n");
    check_valid("namespace a\nmap M {\n    value: Integer\n}\n");

    let parse = check("namespace a\nmap M {\n    $foo\n}\n");
    assert_eq!(messages(&parse), ["Invalid map member. Expected 'key' or 'value', found 'foo'"]);

    let parse = check("namespace a\nmap M {\n    $key\n    $foo\n}\n");
    assert_eq!(messages(&parse), ["Expected a member named 'value', but found 'foo'"]);

    let parse = check("namespace a\nmap M { $value, $key }\n");
    assert_eq!(messages(&parse), ["Expected '}' after the map value member"]);
}

#[test]
fn map_elided_members() {
    let parse = check_valid("namespace a\nmap M { $key, $value }\n");
    assert_eq!(count(&parse, TreeKind::ELIDED_MAP_KEY), 1);
    assert_eq!(count(&parse, TreeKind::ELIDED_MAP_VALUE), 1);
}

#[test]
fn structure_members_and_values() {
    let parse = check_valid(
        "namespace a\nstructure S {\n    a: String = \"x\"\n    $b\n    c: Integer = 3\n}\n",
    );

    let kinds = parse
        .root()
        .find_descendants(TreeKind::SHAPE_MEMBER)
        .into_iter()
        .flat_map(TreeNode::children)
        .map(TreeNode::kind)
        .filter(|kind| kind.is_explicit_member() || kind.is_elided_member())
        .collect::<Vec<_>>();
    assert_eq!(kinds, [
        TreeKind::EXPLICIT_STRUCTURE_MEMBER,
        TreeKind::ELIDED_STRUCTURE_MEMBER,
        TreeKind::EXPLICIT_STRUCTURE_MEMBER,
    ]);

    let values = parse.root().find_descendants(TreeKind::VALUE_ASSIGNMENT);
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].tokens().find_map(|token| token.string_value()), Some("x"));
    assert_eq!(values[1].tokens().find_map(|token| token.number_value()), Some(Number::Int(3)));
}

#[test]
fn failed_member_trait_keeps_the_closing_brace() {
    let parse = check("namespace a\nstring A\nstructure S {\n  @foo(a: [1, }\n  b: String\n}\nstring C\n");
    assert_eq!(parse.errors().len(), 1, "{:?}", messages(&parse));
    assert_eq!(count(&parse, TreeKind::STRUCTURE_STATEMENT), 1);
    assert_eq!(count(&parse, TreeKind::SIMPLE_SHAPE_STATEMENT), 2);

    let parse = check("namespace a\nstring A\nenum E {\n  @tags([1, }\n  B\n}\nstring C\n");
    assert_eq!(parse.errors().len(), 1, "{:?}", messages(&parse));
    assert_eq!(count(&parse, TreeKind::SIMPLE_SHAPE_STATEMENT), 2);
}

#[test]
fn list_member_name() {
    let parse = check_valid("namespace a\nset S {\n    $member\n}\n");
    assert_eq!(count(&parse, TreeKind::LIST_STATEMENT), 1);
    assert_eq!(count(&parse, TreeKind::ELIDED_LIST_MEMBER), 1);

    let parse = check("namespace a\nlist L {\n    foo: String\n}\n");
    assert_eq!(messages(&parse), ["Expected a member named 'member', but found 'foo'"]);
}

#[test]
fn operation_properties() {
    let parse = check("namespace a\noperation Op {\n    input: A\n    input: B\n}\n");
    assert_eq!(messages(&parse)[0], "Duplicate operation property 'input'");

    let parse = check("namespace a\noperation Op {\n    foo: A\n}\n");
    assert_eq!(messages(&parse)[0], "Expected 'input', 'output', or 'errors' but found 'foo'");
}

#[test]
fn traits_applied_to_apply_statement() {
    let parse = check("namespace a\n@foo\napply A @bar\n");

    assert_eq!(messages(&parse), ["Traits applied to apply statement"]);
    assert_eq!(count(&parse, TreeKind::APPLY_STATEMENT_SINGULAR), 1);

    let error = parse.root().errors()[0];
    assert_eq!(error.children().next().map(TreeNode::kind), Some(TreeKind::TRAIT_STATEMENTS));
}

#[test]
fn dangling_traits() {
    let parse = check("namespace a\nstring A\n@foo\n");
    assert_eq!(messages(&parse), ["Found traits attached to nothing"]);

    let parse = check("@deprecated");
    assert_eq!(
        messages(&parse),
        [
            "Expected a namespace definition but found AT('@')",
            "Found traits attached to nothing",
        ]
    );
}

#[test]
fn nesting_limit() {
    let deep = format!("$x: {}1{}\n", "[".repeat(8), "]".repeat(8));
    check_valid(&deep);

    let options = ParseOptions { max_depth: 8 };
    let parse = parse_with("test.smithy", &deep, &options);
    assert_eq!(parse.root().text(), deep);
    assert_eq!(messages(&parse), ["Maximum nesting depth exceeded"]);
}

#[test]
fn deeply_nested_input_terminates() {
    let text = format!("$x: {}\n", "[".repeat(10_000));
    let parse = check(&text);
    assert_eq!(messages(&parse), ["Maximum nesting depth exceeded"]);
}

#[test]
fn find_at_returns_the_narrowest_node() {
    let parse = check_valid("namespace a\nstring Foo\n");
    let node = parse.root().find_at(2, 8);

    assert_eq!(node.token().map(|token| token.lexeme()), Some("Foo"));
    assert_eq!(node.parent().map(TreeNode::kind), Some(TreeKind::SIMPLE_SHAPE_STATEMENT));
}

#[test]
fn every_line_break_starts_a_new_line() {
    for (text, line) in [
        ("namespace a\rstring A\r", 2),
        ("namespace a\r\nstring A\r\n", 2),
        ("namespace a\r\n\rstring A\n", 3),
    ] {
        let parse = check_valid(text);
        let shape = parse.root().find_descendants(TreeKind::SIMPLE_SHAPE_STATEMENT)[0];
        assert_eq!(shape.start(), Position::new(line, 1), "{text:?}");
        assert_eq!(shape.end(), Position::new(line, 9), "{text:?}");

        let node = parse.root().find_at(line, 8);
        assert_eq!(node.token().map(|token| token.lexeme()), Some("A"), "{text:?}");
    }
}

#[test]
fn leftover_tokens_after_a_failed_section() {
    let text = "namespace a\nstring A\nstring B\nstring C\n";
    let parse = parse_with("test.smithy", text, &ParseOptions { max_depth: 1 });

    assert_eq!(parse.root().text(), text);
    assert_eq!(messages(&parse), [
        "Maximum nesting depth exceeded",
        "Maximum nesting depth exceeded",
        "Maximum nesting depth exceeded",
        "Expected the end of the file but found IDENTIFIER('string')",
    ]);
    assert_eq!(parse.errors()[3].line, 4);
}

#[test]
fn empty_input() {
    let parse = check_valid("");
    assert_eq!(parse.root().children().len(), 2);

    check_valid("// just a comment\n");
}

#[test]
fn buffer_lookahead() {
    let options = ParseOptions::default();
    let p = TokenBuffer::new("test.smithy", "apply Foo @bar", &options);

    assert!(p.at_keyword("apply"));
    assert_eq!(p.peek(1).kind, SPACE);
    assert_eq!(p.peek_past_spaces(1).lexeme(), "Foo");
    assert_eq!(p.peek_past_whitespace(3).kind, AT);
    assert_eq!(p.peek_while(1, |kind| kind != AT).kind, AT);
    assert_eq!(p.peek(100).kind, EOF);
}

#[test]
fn advance_at_eof_fails() {
    let options = ParseOptions::default();
    let mut p = TokenBuffer::new("test.smithy", "", &options);

    let error = p.advance().unwrap_err();
    assert_eq!(error.message, "Unexpected end of file");
}

#[test]
fn failed_scope_recovers_to_column_one() {
    let options = ParseOptions::default();
    let mut p = TokenBuffer::new("test.smithy", "a b\nc", &options);

    let closed = p.with_scope(TreeKind::SHAPE_STATEMENT, |p| -> PResult<()> {
        p.advance()?;
        Err(p.syntax_error("boom"))
    });
    assert!(closed.value.is_none());
    assert!(p.at_keyword("c"));
    assert_eq!(p.error_count(), 1);

    let tree = p.finish();
    let statement = tree.root().first_child(TreeKind::SHAPE_STATEMENT).unwrap();
    assert_eq!(statement.text(), "a b\n");

    let error = statement.first_child(TreeKind::ERROR).unwrap();
    assert_eq!(error.error(), Some("boom"));
    assert_eq!(error.text(), " b\n");
    assert_eq!((error.start_line(), error.start_column()), (1, 2));
}

mod proptest_tests {
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;
    use smithy_tree::TreeNode;

    const FRAGMENTS: &[&str] = &[
        "namespace a.b\n",
        "use a#B\n",
        "$version: \"2\"\n",
        "metadata m = 1\n",
        "structure S ",
        "map M ",
        "list L ",
        "enum E ",
        "operation O ",
        "apply S ",
        "input := ",
        "errors: ",
        "with [A]",
        "{",
        "}",
        "[",
        "]",
        "(",
        ")",
        "@t",
        "a: String",
        "$m",
        "= 1",
        " ",
        "\n",
        ",",
        "/// doc\n",
        "// c\n",
        "\"str\"",
        "\"\"\"\nblock\n\"\"\"",
        "1.5",
        "-",
        "#",
        ":",
    ];

    fn check_tree(text: &str) -> Result<(), TestCaseError> {
        let parse = crate::parse("prop.smithy", text);
        prop_assert_eq!(parse.root().text(), text);
        check_spans(parse.root())?;

        for error in parse.errors() {
            prop_assert!(usize::from(error.range.end()) <= text.len());
        }
        Ok(())
    }

    fn check_spans(node: TreeNode<'_>) -> Result<(), TestCaseError> {
        let range = node.range();
        let mut previous = None;
        for child in node.children() {
            if child.tokens().len() > 0 {
                prop_assert!(range.contains_range(child.range()));
                prop_assert!(node.start() <= child.start());
                if let Some(end) = previous {
                    prop_assert!(end <= child.range().start(), "siblings overlap in {:?}", node);
                }
                previous = Some(child.range().end());
            }
            check_spans(child)?;
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn fragments_parse_losslessly(
            parts in prop::collection::vec(prop::sample::select(FRAGMENTS), 0..48)
        ) {
            check_tree(&parts.concat())?;
        }

        #[test]
        fn arbitrary_text_parses_losslessly(text in "\\PC{0,96}") {
            check_tree(&text)?;
        }
    }
}
