//! One scanning pass over a source text.
//!
//! The parser asks the [`Lexer`] which token starts at the head of the
//! stream, scans it, and keeps dispatching on whatever the token left
//! behind. When a level ends up holding more than one token they are grouped
//! under a composed token.
//!
//! # Delegation
//!
//! A tag token that meets another tag inside its content does not handle the
//! nesting itself. It hands everything from that point to a nested [`Level`]
//! seeded with the literal text it already scanned, and closes where that
//! level ends:
//!
//! ```text
//! <<a<<b>>c>>
//! ^^          outer open
//!   a         seed literal of the nested level
//!    <<b>>    nested tag
//!         c   literal that yields to the outer close
//!          >> outer close, swallowed by the literal
//! ```
//!
//! The nested level of `<<a<<b>>c>>` therefore holds `[a, <<b>>, c]`, and the
//! outer token's processed content is `a<<b>>c`.

use log::{debug, trace};

use crate::config::{ParseConfig, RecursionGuard};
use crate::error::Violation;
use crate::lexer::{Candidate, Lexer};
use crate::token::{Token, TokenId, TokenTree, Variant};
use crate::{Error, NodeKind, Span};

/// The assembled result of one parser level.
///
/// A top-level parse has one level covering the whole source. Every token
/// that delegated its content owns the level it delegated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    stream: Span,
    token: Option<TokenId>,
    swallowed: Option<Span>,
}

impl Level {
    /// A fresh level over `stream`, nothing assembled yet.
    pub fn new(stream: Span) -> Self {
        Self {
            stream,
            token: None,
            swallowed: None,
        }
    }

    /// The stream this level was asked to parse.
    pub fn stream(&self) -> Span {
        self.stream
    }

    /// The token this level assembled into: the only token on the level, or
    /// the composed token grouping all of them.
    pub fn token(&self) -> Option<TokenId> {
        self.token
    }

    /// The enclosing token's close delimiter, when the level's last token
    /// ended by running into it.
    pub fn swallowed(&self) -> Option<Span> {
        self.swallowed
    }
}

/// Outcome of one iteration of a token's scan loop.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Nothing happened at this position.
    Continue,
    /// The token ends here; `tag` is its close delimiter, `None` for a
    /// literal stopping at a boundary.
    Close { tag: Option<Span> },
    /// A literal ends here because its parent's close delimiter starts here.
    Yield { parent_close: Span },
    /// A nested token starts here. `level` holds everything up to the
    /// parent close it swallowed; the token resumes `consumed` bytes into
    /// its content and closes on `close`.
    Delegate {
        level: Level,
        consumed: usize,
        close: Span,
    },
}

/// Scans a source text into a [`TokenTree`].
///
/// ```ignore
/// let lexer = Lexer::new(Kind::Text, Kind::Document)
///     .with_rule(LiteralPair::new(Kind::Tag, "<<", ">>"))?;
///
/// let tree = Parser::new(&lexer, "a<<b>>c").parse()?;
/// assert_eq!(tree[tree.root()].children().len(), 3);
/// ```
#[derive(Debug)]
pub struct Parser<'l, 's, K> {
    lexer: &'l Lexer<K>,
    source: &'s str,
    config: ParseConfig,
    tokens: Vec<Token<K>>,
    guard: RecursionGuard,
}

impl<'l, 's, K: NodeKind> Parser<'l, 's, K> {
    pub fn new(lexer: &'l Lexer<K>, source: &'s str) -> Self {
        Self {
            lexer,
            source,
            config: ParseConfig::DEFAULT,
            tokens: Vec::new(),
            guard: RecursionGuard::new(),
        }
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn lexer(&self) -> &'l Lexer<K> {
        self.lexer
    }

    /// Runs the pass. Any error leaves nothing usable behind.
    pub fn parse(mut self) -> Result<TokenTree<'s, K>, Error> {
        debug!("parsing {} bytes", self.source.len());
        let mut level = Level::new(Span::new(0, self.source.len()));
        let root = self.parse_level(&mut level, None)?;
        debug!("parsed {} tokens, root {}", self.tokens.len(), root);
        Ok(TokenTree::new(self.source, self.tokens, root))
    }

    /// Assembles one level.
    ///
    /// `nested` is the token a delegating parent already dispatched, with the
    /// literal the parent scanned before it.
    fn parse_level(
        &mut self,
        level: &mut Level,
        nested: Option<(TokenId, Span)>,
    ) -> Result<TokenId, Error> {
        let (mut current, mut last) = match nested {
            None => {
                let first = self.dispatch(level.stream, None)?;
                self.process(first)?;
                (first, first)
            }
            Some((token, preceding)) => {
                let parent = self.token(token).parent();
                let seed = self.admit(Token::data(self.lexer.data_kind(), preceding).with_parent(parent))?;
                self.token_mut(seed).auto_close()?;
                let stream = Span::new(preceding.start, level.stream.end);
                let composed = self.admit(Token::composed(self.lexer.composed_kind(), stream, parent))?;
                self.append(composed, seed);
                self.process(token)?;
                self.append(composed, token);
                (composed, token)
            }
        };

        while let Some(rest) = self.token(last).remaining().filter(|rest| !rest.is_empty()) {
            let parent = self.token(current).parent();
            let next = self.dispatch(rest, parent)?;
            self.process(next)?;
            if !self.token(current).is_composed() {
                let stream = Span::new(self.token(current).stream().start, level.stream.end);
                let composed = self.admit(Token::composed(self.lexer.composed_kind(), stream, parent))?;
                self.append(composed, current);
                current = composed;
            }
            self.append(current, next);
            last = next;
        }

        level.token = Some(current);
        level.swallowed = self.token(last).swallowed();
        debug!(
            "assembled level {}..{} into {} {}",
            level.stream.start,
            level.stream.end,
            self.token(current).kind().name(),
            current
        );
        Ok(current)
    }

    /// Admits the token the lexer picks for the head of `stream`.
    fn dispatch(&mut self, stream: Span, parent: Option<TokenId>) -> Result<TokenId, Error> {
        let token = match self.lexer.tokenize(stream.slice(self.source)) {
            Candidate::Tag { rule, open } => {
                let kind = self.rule(rule)?.kind();
                Token::tag(kind, rule, stream, stream.prefix(open))
            }
            Candidate::Data => Token::data(self.lexer.data_kind(), stream),
        };
        self.admit(token.with_parent(parent))
    }

    fn admit(&mut self, token: Token<K>) -> Result<TokenId, Error> {
        self.config.admit_token(self.tokens.len())?;
        let id = TokenId::new(self.tokens.len());
        self.tokens.push(token);
        Ok(id)
    }

    fn append(&mut self, composed: TokenId, child: TokenId) {
        let token = self.token(child);
        let empty_data = token.is_data() && token.processed().is_none_or(|span| span.is_empty());
        let span = token.span().unwrap_or_default();
        self.token_mut(composed).push_child(child, span, empty_data);
    }

    /// Opens `id` and runs its scan loop until it closes.
    fn process(&mut self, id: TokenId) -> Result<(), Error> {
        self.token_mut(id).open()?;
        let Some(body) = self.token(id).body() else {
            return Err(Error::protocol(self.token(id).kind().name(), Violation::NotOpened));
        };
        trace!("opened {} {} at byte {}", self.token(id).kind().name(), id, body.start);

        let source = self.source;
        let mut pos = 0;
        loop {
            self.token_mut(id).set_cursor(pos);
            match self.step(id, body, pos)? {
                Step::Continue => {}
                Step::Close { tag } => {
                    self.token_mut(id).close(tag, tag.is_none())?;
                    self.closed(id);
                    return Ok(());
                }
                Step::Yield { parent_close } => {
                    self.token_mut(id).yield_to_parent(parent_close)?;
                    self.closed(id);
                    return Ok(());
                }
                Step::Delegate {
                    level,
                    consumed,
                    close,
                } => {
                    let token = self.token_mut(id);
                    token.set_cursor(consumed);
                    token.set_subparser(level);
                    token.close(Some(close), true)?;
                    self.closed(id);
                    return Ok(());
                }
            }
            match body.skip(pos).slice(source).chars().next() {
                Some(next) => pos += next.len_utf8(),
                None => break,
            }
        }
        Err(self.unclosed(id))
    }

    fn step(&mut self, id: TokenId, body: Span, pos: usize) -> Result<Step, Error> {
        let source = self.source;
        let probe = body.skip(pos);
        let token = self.token(id);
        match *token.variant() {
            Variant::Tag { rule } => {
                let open = self.slice(token.open_tag());
                if let Some(len) = self.rule(rule)?.close_tag(open, probe.slice(source)) {
                    return Ok(Step::Close {
                        tag: Some(probe.prefix(len)),
                    });
                }
                if self.lexer.tokenize(probe.slice(source)).is_data() {
                    return Ok(Step::Continue);
                }
                self.delegate(id, body, pos)
            }
            Variant::Data { .. } => {
                if let Some(parent_close) = self.parent_close(token.parent(), probe)? {
                    Ok(Step::Yield { parent_close })
                } else if self.lexer.is_boundary(body.slice(source), pos) {
                    Ok(Step::Close { tag: None })
                } else {
                    Ok(Step::Continue)
                }
            }
            Variant::Composed { .. } => Err(Error::protocol(
                token.kind().name(),
                Violation::AlreadyClosed,
            )),
        }
    }

    /// The parent's close delimiter, if it starts at the head of `probe`.
    fn parent_close(&self, parent: Option<TokenId>, probe: Span) -> Result<Option<Span>, Error> {
        let Some(parent) = parent.map(|parent| self.token(parent)) else {
            return Ok(None);
        };
        let Variant::Tag { rule } = *parent.variant() else {
            return Ok(None);
        };
        let open = self.slice(parent.open_tag());
        Ok(self
            .rule(rule)?
            .close_tag(open, probe.slice(self.source))
            .map(|len| probe.prefix(len)))
    }

    fn delegate(&mut self, id: TokenId, body: Span, pos: usize) -> Result<Step, Error> {
        self.guard.enter(self.config.max_recursion_depth)?;
        trace!(
            "{} delegates at byte {}, depth {}",
            id,
            body.start + pos,
            self.guard.depth()
        );
        let result = self.delegate_level(id, body, pos);
        self.guard.exit();
        result
    }

    fn delegate_level(&mut self, id: TokenId, body: Span, pos: usize) -> Result<Step, Error> {
        let probe = body.skip(pos);
        let nested = self.dispatch(probe, Some(id))?;
        let mut level = Level::new(probe);
        let composed = self.parse_level(&mut level, Some((nested, body.prefix(pos))))?;
        let end = self
            .token(composed)
            .span()
            .map_or(probe.start, |span| span.end);
        let consumed = end.saturating_sub(body.start);
        match level.swallowed {
            Some(close) => Ok(Step::Delegate {
                level,
                consumed,
                close,
            }),
            None => Err(self.unclosed(id)),
        }
    }

    /// Bookkeeping once `id` closed: grammar extras and a trace record.
    fn closed(&mut self, id: TokenId) {
        let token = self.token(id);
        if let Variant::Tag { rule } = *token.variant() {
            let open = self.slice(token.open_tag());
            let content = self.slice(token.processed());
            let extra = self.lexer.rule(rule).and_then(|rule| rule.extra_data(open, content));
            self.token_mut(id).set_extra(extra);
        }
        let token = self.token(id);
        trace!(
            "closed {} {}: {:?}",
            token.kind().name(),
            id,
            self.slice(token.processed())
        );
    }

    fn unclosed(&self, id: TokenId) -> Error {
        let token = self.token(id);
        let open_text = self.slice(token.open_tag());
        let expected = match *token.variant() {
            Variant::Tag { rule } => self
                .lexer
                .rule(rule)
                .and_then(|rule| rule.guess_close_tag(open_text)),
            _ => None,
        };
        let open = if open_text.is_empty() {
            token.kind().name().to_string()
        } else {
            open_text.to_string()
        };
        Error::UnclosedToken {
            open,
            expected,
            offset: token.stream().start,
        }
    }

    fn rule(&self, index: usize) -> Result<&'l dyn crate::TagRule<K>, Error> {
        let lexer = self.lexer;
        lexer
            .rule(index)
            .ok_or_else(|| Error::invalid_argument("rule", format!("no tag rule at index {index}")))
    }

    fn slice(&self, span: Option<Span>) -> &'s str {
        span.map_or("", |span| span.slice(self.source))
    }

    fn token(&self, id: TokenId) -> &Token<K> {
        &self.tokens[id.index()]
    }

    fn token_mut(&mut self, id: TokenId) -> &mut Token<K> {
        &mut self.tokens[id.index()]
    }
}
