//! End-to-end rendering of stencil templates.

use scankit::{Error, NodeKind};
use stencil::{Filter, Kind, Piece, Stencil, StencilError};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stencil() -> Stencil {
    init();
    Stencil::new().unwrap()
}

#[test_case::test_case("plain text", &[], "plain text"; "no tags")]
#[test_case::test_case("Hello {{name}}!", &[("name", "world")], "Hello world!"; "variable")]
#[test_case::test_case("{{ name }}", &[("name", "x")], "x"; "variable name is trimmed")]
#[test_case::test_case("{#upper hi#}", &[], "HI"; "filter over text")]
#[test_case::test_case("{#lower A{{x}}B#}", &[("x", "Y")], "ayb"; "filter over variable")]
#[test_case::test_case("[{#trim   padded  #}]", &[], "[padded]"; "trim")]
#[test_case::test_case("a{?-{{x}}-?}b", &[("x", "1")], "a-1-b"; "optional with value")]
#[test_case::test_case("a{?-{{x}}-?}b", &[], "ab"; "optional without value")]
#[test_case::test_case("é{{ü}}ñ", &[("ü", "ß")], "éßñ"; "multibyte")]
fn test_render(source: &str, args: &[(&str, &str)], expected: &str) {
    let out = stencil().render(source, args.iter().copied()).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn test_greeting() {
    let stencil = stencil();
    let source = "Hello {#upper {{name}}#}{?, {{title}}?}!";

    let out = stencil.render(source, [("name", "ada")]).unwrap();
    insta::assert_snapshot!(out, @"Hello ADA!");

    let out = stencil
        .render(source, [("name", "ada"), ("title", "countess")])
        .unwrap();
    insta::assert_snapshot!(out, @"Hello ADA, countess!");
}

#[test]
fn test_filter_contents_are_scoped() {
    let linker = stencil().compile("a{#upper b{{x}}#}", [("x", "y")]).unwrap();
    let pieces: Vec<_> = linker
        .walk()
        .filter(|(_, piece)| !matches!(piece, Piece::Text(text) if text.is_empty()))
        .collect();
    assert_eq!(
        pieces,
        [
            (0, &Piece::Text("a".into())),
            (
                0,
                &Piece::Filter {
                    filter: Filter::Upper,
                    body: "b{{x}}".into(),
                }
            ),
            (1, &Piece::Text("b".into())),
            (
                1,
                &Piece::Value {
                    name: "x".into(),
                    value: Some("y".into()),
                }
            ),
        ]
    );
}

#[test]
fn test_missing_argument() {
    let err = stencil()
        .render("Hi {{who}}", std::iter::empty::<(&str, &str)>())
        .unwrap_err();
    assert_eq!(err, StencilError::MissingArgument("who".into()));
    insta::assert_snapshot!(err, @"missing argument `who`");
}

#[test]
fn test_unclosed_variable() {
    let err = stencil().render("Hi {{who", [("who", "me")]).unwrap_err();
    assert_eq!(
        err,
        StencilError::Engine(Error::UnclosedToken {
            open: "{{".into(),
            expected: Some("}}".into()),
            offset: 3,
        })
    );
    insta::assert_snapshot!(err, @"unclosed {{ token at byte 3 expects a closing }} tag");
}

#[test]
fn test_optional_requires_a_variable() {
    let err = stencil().render("a{?plain?}b", [("x", "1")]).unwrap_err();
    match err {
        StencilError::Engine(Error::MissingMandatoryChild { node, missing }) => {
            assert_eq!(node.kind, Kind::Optional.name());
            assert_eq!(missing, ["Var"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_filter_inside_optional() {
    let err = stencil().render("{?{#upper {{x}}#}?}", [("x", "1")]).unwrap_err();
    match err {
        StencilError::Engine(Error::DisallowedChild { child, container }) => {
            assert_eq!(child.kind, Kind::Filter.name());
            assert_eq!(container.kind, Kind::Optional.name());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test_case::test_case("{#title abc#}", Kind::Filter; "unknown filter")]
#[test_case::test_case("{{a{{b}}}}", Kind::Var; "variable inside variable")]
fn test_refused_root(source: &str, kind: Kind) {
    let err = stencil().render(source, [("x", "1")]).unwrap_err();
    assert!(matches!(
        err,
        StencilError::Engine(Error::NotAllowed { node, parent: None }) if node.kind == kind.name()
    ));
}
