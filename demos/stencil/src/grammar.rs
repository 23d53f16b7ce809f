//! The stencil grammar: node kinds, strict nodes and emission.

use log::debug;
use scankit::{
    Arguments, Constraints, Error, Grammar, Lexer, Linker, NodeKind, NodeRef, ProcessedData,
};

use crate::delimiters::{Delimited, FILTER_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
pub enum Kind {
    #[kind(base)]
    Node,
    Document,
    Text,
    Var,
    Block,
    #[kind(extends = Block)]
    Filter,
    #[kind(extends = Block)]
    Optional,
}

/// Text transformations selectable with `{#name ... #}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Upper,
    Lower,
    Trim,
}

impl Filter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "upper" => Some(Self::Upper),
            "lower" => Some(Self::Lower),
            "trim" => Some(Self::Trim),
            _ => None,
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Trim => text.trim().to_string(),
        }
    }
}

/// What a stencil node emits into the linker.
///
/// A [`Piece::Filter`] or [`Piece::Optional`] whose content held nested tags
/// is followed by a child linker with those tags' pieces; `body` is only
/// used when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Value { name: String, value: Option<String> },
    Filter { filter: Filter, body: String },
    Optional { body: String },
    Raw(ProcessedData<Kind>),
}

impl From<ProcessedData<Kind>> for Piece {
    fn from(data: ProcessedData<Kind>) -> Self {
        Self::Raw(data)
    }
}

/// The stencil mini-language.
#[derive(Debug)]
pub struct Stencil {
    lexer: Lexer<Kind>,
}

impl Stencil {
    pub fn new() -> Result<Self, Error> {
        let lexer = Lexer::new(Kind::Text, Kind::Document)
            .with_rule(Delimited::VAR)?
            .with_rule(Delimited::FILTER)?
            .with_rule(Delimited::OPTIONAL)?;
        Ok(Self { lexer })
    }
}

fn filter_of(node: NodeRef<'_, '_, Stencil>) -> Option<Filter> {
    node.token()
        .extra()
        .and_then(|extra| extra.get(FILTER_KEY))
        .and_then(|name| Filter::from_name(name))
}

impl Grammar for Stencil {
    type Kind = Kind;
    type Item = Piece;

    fn lexer(&self) -> &Lexer<Kind> {
        &self.lexer
    }

    fn constraints(&self, kind: Kind) -> Option<Constraints<Kind>> {
        match kind {
            Kind::Optional => Some(
                Constraints::new()
                    .with_disallowed(Kind::Node)
                    .with_allowed(Kind::Text)
                    .with_allowed(Kind::Var)
                    .with_mandatory(Kind::Var),
            ),
            _ => None,
        }
    }

    fn is_allowed(&self, node: NodeRef<'_, '_, Self>) -> Result<bool, Error> {
        node.check_constraints()?;
        match node.kind() {
            // a variable name is plain text
            Kind::Var if node.has_children() => {
                debug!("nested tag in variable {:?}", node.text());
                Ok(false)
            }
            Kind::Filter if filter_of(node).is_none() => {
                debug!("unknown filter in {:?}", node.text());
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    fn make(
        &self,
        node: NodeRef<'_, '_, Self>,
        args: &Arguments,
        linker: &mut Linker<Piece>,
    ) -> Result<(), Error> {
        let piece = match node.kind() {
            Kind::Text => Piece::Text(node.text().to_string()),
            Kind::Var => {
                let name = node.content().trim();
                Piece::Value {
                    name: name.to_string(),
                    value: args.get(name).map(str::to_string),
                }
            }
            Kind::Filter => match filter_of(node) {
                Some(filter) => Piece::Filter {
                    filter,
                    body: node.content().to_string(),
                },
                None => Piece::Raw(node.processed_data()),
            },
            Kind::Optional => Piece::Optional {
                body: node.content().to_string(),
            },
            _ => node.processed_data().into(),
        };
        linker.append(piece);
        Ok(())
    }
}
