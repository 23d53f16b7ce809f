//! End-to-end behavior of the bracket grammar.
mod common;

use common::{Brackets, Kind, compile, init};
use scankit::{Constraints, Error, Grammar, NodeKind, NodeTree, Parser};

#[test]
fn test_literal_tag_literal_is_three_siblings() {
    init();
    let grammar = Brackets::new();
    let tree = NodeTree::parse(&grammar, "a<<b>>c").unwrap();
    let root = tree.root();
    assert!(root.is_composed());

    let children: Vec<_> = root
        .nodes()
        .map(|node| (node.kind(), node.content()))
        .collect();
    assert_eq!(
        children,
        [(Kind::Text, "a"), (Kind::Tag, "b"), (Kind::Text, "c")]
    );
    assert_eq!(tree.tokens().text(root.id()), "a<<b>>c");
}

#[test]
fn test_nested_tag_splits_outer_content() {
    init();
    let grammar = Brackets::new();
    let tree = NodeTree::parse(&grammar, "<<a<<b>>c>>").unwrap();
    let outer = tree.root();
    assert!(!outer.is_composed());
    assert_eq!(outer.kind(), Kind::Tag);

    let children: Vec<_> = outer
        .nodes()
        .map(|node| (node.kind(), node.content()))
        .collect();
    assert_eq!(
        children,
        [(Kind::Text, "a"), (Kind::Tag, "b"), (Kind::Text, "c")]
    );
    assert!(outer.nodes().all(|node| node.parent_node() == Some(outer)));
}

#[test_case::test_case("<<a", "<<", ">>", 0; "unterminated tag")]
#[test_case::test_case("x [[y", "[[", "]]", 2; "unterminated after literal")]
#[test_case::test_case("((a<<b>>c", "((", "))", 0; "nested tag closes but outer does not")]
fn test_unclosed_input(source: &str, open: &str, expected: &str, offset: usize) {
    init();
    let grammar = Brackets::new();
    let err = NodeTree::parse(&grammar, source).unwrap_err();
    assert_eq!(
        err,
        Error::UnclosedToken {
            open: open.into(),
            expected: Some(expected.into()),
            offset,
        }
    );
}

#[test]
fn test_missing_mandatory_kind() {
    let grammar = Brackets::new().strict(
        Kind::Quote,
        Constraints::new().with_mandatory(Kind::Required),
    );
    let err = compile(&grammar, "((a<<b>>c))").unwrap_err();
    match err {
        Error::MissingMandatoryChild { node, missing } => {
            assert_eq!(node.kind, "Quote");
            assert_eq!(missing, [Kind::Required.name()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_disallowed_child_kind() {
    let grammar = Brackets::new().strict(
        Kind::Quote,
        Constraints::new()
            .with_disallowed(Kind::Node)
            .with_allowed(Kind::Text),
    );
    let tree = NodeTree::parse(&grammar, "((a{{b}}c))").unwrap();
    let other = tree.root().first_child_node(Kind::Other).unwrap();

    let err = compile(&grammar, "((a{{b}}c))").unwrap_err();
    assert_eq!(
        err,
        Error::DisallowedChild {
            child: other.info(),
            container: tree.root().info(),
        }
    );
    assert_eq!(
        err.to_string(),
        format!("the node Other{} is not allowed in a Quote#0 node", other.id())
    );
}

#[test]
fn test_strict_node_accepts_allowed_subtree() {
    let grammar = Brackets::new().strict(
        Kind::Quote,
        Constraints::new()
            .with_disallowed(Kind::Node)
            .with_allowed(Kind::Text)
            .with_mandatory(Kind::Tag),
    );
    let linker = compile(&grammar, "((a[[b]]c))").unwrap();
    assert_eq!(linker.flatten().len(), 4);
}

#[test]
fn test_strict_node_stops_checking_once_satisfied() {
    let grammar = Brackets::new().strict(
        Kind::Quote,
        Constraints::new()
            .with_disallowed(Kind::Node)
            .with_allowed(Kind::Text)
            .with_mandatory(Kind::Text),
    );
    let linker = compile(&grammar, "((a{{b}}c))").unwrap();
    assert_eq!(linker.walk().filter(|(depth, _)| *depth == 1).count(), 3);
}

#[test]
fn test_parser_exposes_token_tree() {
    init();
    let grammar = Brackets::new();
    let tree = Parser::new(grammar.lexer(), "x{{y}}").parse().unwrap();
    let root = &tree[tree.root()];
    assert_eq!(root.children().len(), 2);
    assert_eq!(tree.processed_text(root.children()[1]), "y");
}
