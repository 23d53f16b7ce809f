#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scankit::rules::LiteralPair;
use scankit::{Compiler, Grammar, Lexer, Linker, NodeKind, NodeTree, ParseConfig, Parser, ProcessedData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
enum Kind {
    #[kind(base)]
    Node,
    Document,
    Text,
    Angle,
    Square,
    #[kind(extends = Square)]
    Curly,
}

struct Brackets {
    lexer: Lexer<Kind>,
}

impl Grammar for Brackets {
    type Kind = Kind;
    type Item = ProcessedData<Kind>;

    fn lexer(&self) -> &Lexer<Kind> {
        &self.lexer
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    config: ParseConfig,
    source: String,
}

fuzz_target!(|input: Input| {
    let Ok(lexer) = Lexer::new(Kind::Text, Kind::Document)
        .with_rule(LiteralPair::new(Kind::Angle, "<<", ">>"))
        .and_then(|lexer| lexer.with_rule(LiteralPair::new(Kind::Square, "[", "]")))
        .and_then(|lexer| lexer.with_rule(LiteralPair::new(Kind::Curly, "{", "}")))
    else {
        return;
    };
    let grammar = Brackets { lexer };

    // Cap nesting so the fuzzer explores inputs rather than stack limits
    let config = ParseConfig {
        max_recursion_depth: input.config.max_recursion_depth.min(256),
        ..input.config
    };
    let source = input.source.as_str();

    let Ok(tree) = Parser::new(grammar.lexer(), source).with_config(config).parse() else {
        return;
    };
    assert_eq!(tree.text(tree.root()), source);
    for (id, token) in tree.iter() {
        assert!(token.is_closed());
        assert_eq!(tree.reconstruct(id), tree.text(id));
    }

    let nodes = NodeTree::new(&grammar, tree);
    let descendants = nodes.root().descendants().count();
    if let Ok(linker) = Compiler::new(nodes, Linker::new()).compile() {
        assert!(linker.walk().count() <= descendants + 1);
    }
});
