//! A bracket grammar shared by the integration tests.
//!
//! `<<…>>` tags, `[[…]]` required tags (extending tags), `{{…}}` and `((…))`
//! blocks, literal text everywhere else.
#![allow(dead_code)]

use std::collections::BTreeMap;

use scankit::rules::LiteralPair;
use scankit::{
    Arguments, Compiler, Constraints, Error, Grammar, Lexer, Linker, NodeKind, NodeRef,
    NodeTree, ProcessedData,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
pub enum Kind {
    #[kind(base)]
    Node,
    Document,
    Text,
    Tag,
    #[kind(extends = Tag)]
    Required,
    Other,
    Quote,
}

/// What the bracket grammar emits: the node's text and the depth it was
/// emitted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub kind: Kind,
    pub text: String,
    pub depth: Option<usize>,
}

impl From<ProcessedData<Kind>> for Emitted {
    fn from(data: ProcessedData<Kind>) -> Self {
        Self {
            kind: data.kind,
            text: data.content,
            depth: None,
        }
    }
}

#[derive(Debug)]
pub struct Brackets {
    lexer: Lexer<Kind>,
    strict: BTreeMap<Kind, Constraints<Kind>>,
}

impl Brackets {
    pub fn new() -> Self {
        let lexer = Lexer::new(Kind::Text, Kind::Document)
            .with_rule(LiteralPair::new(Kind::Tag, "<<", ">>"))
            .and_then(|lexer| lexer.with_rule(LiteralPair::new(Kind::Required, "[[", "]]")))
            .and_then(|lexer| lexer.with_rule(LiteralPair::new(Kind::Other, "{{", "}}")))
            .and_then(|lexer| lexer.with_rule(LiteralPair::new(Kind::Quote, "((", "))")))
            .unwrap();
        Self {
            lexer,
            strict: BTreeMap::new(),
        }
    }

    pub fn strict(mut self, kind: Kind, constraints: Constraints<Kind>) -> Self {
        self.strict.insert(kind, constraints);
        self
    }
}

impl Grammar for Brackets {
    type Kind = Kind;
    type Item = Emitted;

    fn lexer(&self) -> &Lexer<Kind> {
        &self.lexer
    }

    fn constraints(&self, kind: Kind) -> Option<Constraints<Kind>> {
        self.strict.get(&kind).cloned()
    }

    fn make(
        &self,
        node: NodeRef<'_, '_, Self>,
        _args: &Arguments,
        linker: &mut Linker<Emitted>,
    ) -> Result<(), Error> {
        linker.append(Emitted {
            kind: node.kind(),
            text: node.text().to_string(),
            depth: Some(node.depth()),
        });
        Ok(())
    }
}

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn compile(grammar: &Brackets, source: &str) -> Result<Linker<Emitted>, Error> {
    init();
    Compiler::new(NodeTree::parse(grammar, source)?, Linker::new()).compile()
}
