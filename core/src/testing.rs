//! A small grammar shared by the unit tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::rules::LiteralPair;
use crate::{Constraints, Error, Grammar, Lexer, NodeKind, NodeRef, ProcessedData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Kind {
    Node,
    Document,
    Text,
    Tag,
    Block,
}

impl NodeKind for Kind {
    const ALL: &'static [Self] = &[Kind::Node, Kind::Document, Kind::Text, Kind::Tag, Kind::Block];
    const BASE: Option<Self> = Some(Kind::Node);

    fn name(self) -> &'static str {
        match self {
            Kind::Node => "Node",
            Kind::Document => "Document",
            Kind::Text => "Text",
            Kind::Tag => "Tag",
            Kind::Block => "Block",
        }
    }

    fn extends(self) -> Option<Self> {
        match self {
            Kind::Node => None,
            Kind::Block => Some(Kind::Tag),
            _ => Some(Kind::Node),
        }
    }
}

/// `<<` / `>>` tags over literal text.
pub(crate) fn lexer() -> Lexer<Kind> {
    let mut lexer = Lexer::new(Kind::Text, Kind::Document);
    let _ = lexer.add_rule(LiteralPair::new(Kind::Tag, "<<", ">>"));
    lexer
}

#[derive(Debug)]
pub(crate) struct Plain {
    lexer: Lexer<Kind>,
    strict: BTreeMap<Kind, Constraints<Kind>>,
    refused: BTreeSet<Kind>,
}

impl Plain {
    pub(crate) fn new() -> Self {
        Self {
            lexer: lexer(),
            strict: BTreeMap::new(),
            refused: BTreeSet::new(),
        }
    }

    pub(crate) fn with_constraints(mut self, kind: Kind, constraints: Constraints<Kind>) -> Self {
        self.strict.insert(kind, constraints);
        self
    }

    pub(crate) fn refusing(mut self, kind: Kind) -> Self {
        self.refused.insert(kind);
        self
    }
}

impl Grammar for Plain {
    type Kind = Kind;
    type Item = ProcessedData<Kind>;

    fn lexer(&self) -> &Lexer<Kind> {
        &self.lexer
    }

    fn constraints(&self, kind: Kind) -> Option<Constraints<Kind>> {
        self.strict.get(&kind).cloned()
    }

    fn is_allowed(&self, node: NodeRef<'_, '_, Self>) -> Result<bool, Error> {
        if self.refused.contains(&node.kind()) {
            return Ok(false);
        }
        node.check_constraints().map(|()| true)
    }
}
