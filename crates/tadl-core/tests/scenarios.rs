//! Concrete scenarios and boundary cases that pin down the grammar, each
//! drawn from a specific documented example rather than arbitrary input.

use tadl_core::{parse, BlockType, NodeShape, ParseError};

#[test]
fn text_and_element() {
    let tree = parse("#hello{world}").unwrap();
    let root = tree.root();
    assert_eq!(root.name(), Some("root"));
    assert_eq!(root.block_type(), Some(BlockType::Normal));
    let hello = &root.children()[0];
    assert_eq!(hello.name(), Some("hello"));
    assert_eq!(hello.block_type(), Some(BlockType::Normal));
    assert_eq!(hello.children()[0].text_content(), Some("world"));
}

#[test]
fn attribute_carry() {
    let tree = parse(r#"#!{ @@id="1" item2, item3 @key="value" }"#).unwrap();
    let root = tree.root();
    let item2 = &root.children()[0];
    let item3 = &root.children()[1];
    assert_eq!(item2.name(), Some("item2"));
    assert_eq!(item2.attribute("id"), Some("1"));
    assert_eq!(item3.name(), Some("item3"));
    assert_eq!(item3.attribute("key"), Some("value"));
    assert_eq!(item3.attribute("id"), None);
}

#[test]
fn implicit_nesting_and_comma() {
    let tree = parse(r#"#!{ A B, C }"#).unwrap();
    let root = tree.root();
    assert_eq!(root.children().len(), 2);
    let a = &root.children()[0];
    assert_eq!(a.name(), Some("A"));
    assert_eq!(a.children()[0].name(), Some("B"));
    assert_eq!(root.children()[1].name(), Some("C"));
}

#[test]
fn arrow_rewrite() {
    let tree = parse(r#"#!{ f(x) -> (int) }"#).unwrap();
    let f = &tree.root().children()[0];
    assert_eq!(f.name(), Some("f"));
    assert_eq!(f.block_type(), Some(BlockType::Group));
    assert_eq!(f.children()[0].name(), Some("x"));
    let ret = &f.children()[1];
    assert_eq!(ret.name(), Some("ret"));
    assert_eq!(ret.block_type(), Some(BlockType::Group));
    assert_eq!(ret.children()[0].name(), Some("int"));
}

#[test]
fn forwarding_g1_line_in_g2() {
    let tree = parse("#!{ ## doc comment\n type T }").unwrap();
    let ty = &tree.root().children()[0];
    assert_eq!(ty.name(), Some("type"));
    let doc = &ty.children()[0];
    assert_eq!(doc.name(), Some("doc"));
    assert_eq!(doc.children()[0].text_content(), Some("comment"));
    assert_eq!(ty.children()[1].name(), Some("T"));
}

#[test]
fn empty_input_is_bare_root() {
    let tree = parse("").unwrap();
    assert_eq!(tree.root().name(), Some("root"));
    assert_eq!(tree.root().block_type(), Some(BlockType::Normal));
    assert!(tree.root().children().is_empty());
}

#[test]
fn unclosed_block_errors_at_eof() {
    let err = parse("#hello{world").unwrap_err();
    assert!(matches!(err, ParseError::UnmatchedBracket { .. }));
}

#[test]
fn dangling_forward_element_errors_at_its_own_position() {
    let err = parse("##x").unwrap_err();
    match err {
        ParseError::DanglingForwardingBuffer { range } => assert_eq!(range.start.column, 0),
        other => panic!("expected DanglingForwardingBuffer, got {other:?}"),
    }
}

#[test]
fn duplicate_attribute_errors_at_second_occurrence() {
    let err = parse(r#"#!{ item @key="a" @key="b" }"#).unwrap_err();
    assert!(matches!(err, ParseError::DuplicateAttribute { ref key, .. } if key == "key"));
}

#[test]
fn g2_document_without_enclosing_block_errors() {
    let err = parse("#!hello").unwrap_err();
    assert!(matches!(err, ParseError::RootNotEnclosed { .. }));
}

#[test]
fn comment_terminates_at_eof_without_trailing_whitespace() {
    let tree = parse("#? trailing note   ").unwrap();
    let comment = &tree.root().children()[0];
    assert_eq!(comment.shape(), NodeShape::Comment);
}

#[test]
fn quoted_string_stops_implicit_nesting() {
    let tree = parse(r#"#!{ A "text" }"#).unwrap();
    let root = tree.root();
    assert_eq!(root.children().len(), 1);
    let a = &root.children()[0];
    assert_eq!(a.name(), Some("A"));
    assert_eq!(a.children()[0].text_content(), Some("text"));
}
