//! The tag registry of one grammar.

use log::warn;

use crate::{Error, NodeKind, TagRule};

/// What starts at the head of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Rule `rule` recognized an open delimiter `open` bytes long.
    Tag { rule: usize, open: usize },
    /// No rule matched; the stream starts with literal content.
    Data,
}

impl Candidate {
    #[inline]
    pub fn is_data(self) -> bool {
        matches!(self, Candidate::Data)
    }
}

/// An ordered registry of tag rules plus the grammar's data and composed
/// kinds.
///
/// Rules are tried in registration order and the first one whose open
/// delimiter matches wins, so more specific rules belong first.
///
/// ```ignore
/// let lexer = Lexer::new(Kind::Text, Kind::Document)
///     .with_rule(LiteralPair::new(Kind::Var, "{{", "}}"))?
///     .with_rule(LiteralPair::new(Kind::Block, "{", "}"))?;
///
/// assert!(matches!(lexer.tokenize("{{x}}"), Candidate::Tag { rule: 0, open: 2 }));
/// assert!(lexer.tokenize("plain").is_data());
/// ```
#[derive(Debug)]
pub struct Lexer<K> {
    data_kind: K,
    composed_kind: K,
    rules: Vec<Box<dyn TagRule<K>>>,
}

impl<K: NodeKind> Lexer<K> {
    pub fn new(data_kind: K, composed_kind: K) -> Self {
        Self {
            data_kind,
            composed_kind,
            rules: Vec::new(),
        }
    }

    /// Kind of literal tokens.
    pub fn data_kind(&self) -> K {
        self.data_kind
    }

    /// Kind of the tokens that group the siblings of one level.
    pub fn composed_kind(&self) -> K {
        self.composed_kind
    }

    /// Registers `rule`, or replaces the rule already registered for its
    /// kind in place, keeping that rule's priority.
    pub fn add_rule(&mut self, rule: impl TagRule<K> + 'static) -> Result<&mut Self, Error> {
        let kind = rule.kind();
        if kind == self.data_kind || kind == self.composed_kind {
            return Err(Error::invalid_argument(
                "rule",
                format!(
                    "`{}` is reserved for untagged tokens and cannot have a tag rule",
                    kind.name()
                ),
            ));
        }
        match self.rules.iter().position(|existing| existing.kind() == kind) {
            Some(index) => {
                warn!("replacing the tag rule for {}", kind.name());
                self.rules[index] = Box::new(rule);
            }
            None => self.rules.push(Box::new(rule)),
        }
        Ok(self)
    }

    /// Builder form of [`add_rule`](Lexer::add_rule).
    pub fn with_rule(mut self, rule: impl TagRule<K> + 'static) -> Result<Self, Error> {
        self.add_rule(rule)?;
        Ok(self)
    }

    pub fn rule(&self, index: usize) -> Option<&dyn TagRule<K>> {
        self.rules.get(index).map(|rule| rule.as_ref())
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn TagRule<K>> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Decides which token starts at the head of `stream`.
    pub fn tokenize(&self, stream: &str) -> Candidate {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(rule, candidate)| match candidate.open_tag(stream) {
                Some(open) if open > 0 => Some(Candidate::Tag { rule, open }),
                _ => None,
            })
            .unwrap_or(Candidate::Data)
    }

    /// Whether a literal run in `stream` must stop at byte `pos`: at the end
    /// of the slice, or where some tag opens.
    pub fn is_boundary(&self, stream: &str, pos: usize) -> bool {
        pos >= stream.len() || !self.tokenize(&stream[pos..]).is_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::LiteralPair;
    use crate::testing::Kind;

    fn lexer() -> Lexer<Kind> {
        Lexer::new(Kind::Text, Kind::Document)
            .with_rule(LiteralPair::new(Kind::Tag, "<<", ">>"))
            .unwrap()
            .with_rule(LiteralPair::new(Kind::Block, "<", ">"))
            .unwrap()
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let lexer = lexer();
        assert_eq!(lexer.tokenize("<<a>>"), Candidate::Tag { rule: 0, open: 2 });
        assert_eq!(lexer.tokenize("<a>"), Candidate::Tag { rule: 1, open: 1 });
        assert_eq!(lexer.tokenize("a<<"), Candidate::Data);
    }

    #[test]
    fn test_reserved_kinds_rejected() {
        let mut lexer = lexer();
        let err = lexer
            .add_rule(LiteralPair::new(Kind::Text, "[", "]"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { argument: "rule", .. }));
        assert!(lexer.add_rule(LiteralPair::new(Kind::Document, "[", "]")).is_err());
    }

    #[test]
    fn test_replacing_keeps_priority() {
        let mut lexer = lexer();
        lexer.add_rule(LiteralPair::new(Kind::Tag, "[[", "]]")).unwrap();
        assert_eq!(lexer.rules().count(), 2);
        assert_eq!(lexer.tokenize("[[a]]"), Candidate::Tag { rule: 0, open: 2 });
        assert_eq!(lexer.tokenize("<<a>>"), Candidate::Tag { rule: 1, open: 1 });
    }

    #[test]
    fn test_zero_length_open_is_data() {
        #[derive(Debug)]
        struct Empty;
        impl TagRule<Kind> for Empty {
            fn kind(&self) -> Kind {
                Kind::Tag
            }
            fn open_tag(&self, _stream: &str) -> Option<usize> {
                Some(0)
            }
            fn close_tag(&self, _open: &str, _stream: &str) -> Option<usize> {
                None
            }
        }
        let lexer = Lexer::new(Kind::Text, Kind::Document).with_rule(Empty).unwrap();
        assert!(lexer.tokenize("anything").is_data());
    }

    #[test]
    fn test_boundary() {
        let lexer = lexer();
        let stream = "ab<c>";
        assert!(!lexer.is_boundary(stream, 0));
        assert!(lexer.is_boundary(stream, 2));
        assert!(lexer.is_boundary(stream, stream.len()));
        assert_eq!(lexer.is_boundary(stream, 2), lexer.is_boundary(stream, 2));
    }
}
