//! Tokens and the token tree produced by a scanning pass.
//!
//! A token is a one-shot state machine:
//!
//! ```text
//! Unopened ──open()──▶ Opened ──close()──▶ Closed
//! ```
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/token_state.mmd"))]
//!
//! Every slice a token records is a [`Span`] into the parsed source. For a
//! closed token `open + processed + close` is contiguous, which is what makes
//! [`TokenTree::text`] a plain slice.

use core::fmt;
use std::collections::BTreeMap;

use crate::error::Violation;
use crate::parser::Level;
use crate::{Error, NodeKind, Span};

/// Grammar-specific fields attached to a token when it closes.
pub type ExtraData = BTreeMap<String, String>;

/// Index of a token (and of its node) inside one [`TokenTree`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(usize);

impl TokenId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a token is in its `unopened → opened → closed` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unopened,
    Opened,
    Closed,
}

/// The three token shapes the engine knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// Opened by the lexer rule at this registration index.
    Tag { rule: usize },
    /// Literal content. `swallowed` is the parent's close delimiter when
    /// this token ended by yielding to its parent.
    Data { swallowed: Option<Span> },
    /// An ordered run of sibling tokens occupying one level.
    Composed { children: Vec<TokenId> },
}

/// One scanned unit of input.
#[derive(Debug, Clone)]
pub struct Token<K> {
    kind: K,
    variant: Variant,
    stream: Span,
    open: Option<Span>,
    body: Option<Span>,
    processed: Option<Span>,
    close: Option<Span>,
    remaining: Option<Span>,
    cursor: usize,
    state: State,
    parent: Option<TokenId>,
    subparser: Option<Level>,
    extra: Option<ExtraData>,
}

impl<K: NodeKind> Token<K> {
    /// A token opened by lexer rule `rule`, whose open delimiter is `open`.
    pub(crate) fn tag(kind: K, rule: usize, stream: Span, open: Span) -> Self {
        Self::unopened(kind, Variant::Tag { rule }, stream, Some(open))
    }

    /// A literal token; its open delimiter is always empty.
    pub(crate) fn data(kind: K, stream: Span) -> Self {
        let open = Span::empty(stream.start);
        Self::unopened(kind, Variant::Data { swallowed: None }, stream, Some(open))
    }

    /// An empty composition starting where `stream` starts. It is closed
    /// from the moment it exists.
    pub(crate) fn composed(kind: K, stream: Span, parent: Option<TokenId>) -> Self {
        let at = Span::empty(stream.start);
        Self {
            kind,
            variant: Variant::Composed {
                children: Vec::new(),
            },
            stream,
            open: Some(at),
            body: Some(at),
            processed: Some(at),
            close: Some(at),
            remaining: Some(at),
            cursor: 0,
            state: State::Closed,
            parent,
            subparser: None,
            extra: None,
        }
    }

    fn unopened(kind: K, variant: Variant, stream: Span, open: Option<Span>) -> Self {
        Self {
            kind,
            variant,
            stream,
            open,
            body: None,
            processed: None,
            close: None,
            remaining: None,
            cursor: 0,
            state: State::Unopened,
            parent: None,
            subparser: None,
            extra: None,
        }
    }

    pub(crate) fn with_parent(mut self, parent: Option<TokenId>) -> Self {
        self.parent = parent;
        self
    }

    /// Strips the open delimiter: the content after it becomes the slice the
    /// scan loop walks.
    pub(crate) fn open(&mut self) -> Result<(), Error> {
        match self.state {
            State::Opened => return Err(self.violation(Violation::AlreadyOpened)),
            State::Closed => return Err(self.violation(Violation::AlreadyClosed)),
            State::Unopened => {}
        }
        let open = self
            .open
            .ok_or_else(|| self.violation(Violation::OpenTagNotIdentified))?;
        self.body = Some(Span::new(open.end, self.stream.end));
        self.cursor = 0;
        self.state = State::Opened;
        Ok(())
    }

    /// Closes at the cursor.
    ///
    /// `tag` is the detected close delimiter; without one the close must be
    /// forced, and an empty delimiter at the cursor is recorded instead.
    pub(crate) fn close(&mut self, tag: Option<Span>, force: bool) -> Result<(), Error> {
        let body = self.ensure_closable()?;
        if tag.is_none() && !force {
            return Err(self.violation(Violation::CloseTagNotIdentified));
        }
        let at = body.start + self.cursor;
        let tag = tag.unwrap_or(Span::empty(at));
        self.finish(Span::new(body.start, at), tag, Span::new(tag.end, self.stream.end));
        Ok(())
    }

    /// Force-closes a data token at the cursor because its parent's close
    /// delimiter `parent_close` starts there. Nothing remains for the level.
    pub(crate) fn yield_to_parent(&mut self, parent_close: Span) -> Result<(), Error> {
        let body = self.ensure_closable()?;
        let at = body.start + self.cursor;
        self.finish(
            Span::new(body.start, at),
            Span::empty(at),
            Span::empty(self.stream.end),
        );
        if let Variant::Data { swallowed } = &mut self.variant {
            *swallowed = Some(parent_close);
        }
        Ok(())
    }

    /// Treats the whole stream as processed content without scanning it.
    pub(crate) fn auto_close(&mut self) -> Result<(), Error> {
        if self.state == State::Closed {
            return Err(self.violation(Violation::AlreadyClosed));
        }
        let stream = self.stream;
        self.body = Some(stream);
        self.cursor = stream.len();
        self.finish(stream, Span::empty(stream.end), Span::empty(stream.end));
        Ok(())
    }

    fn ensure_closable(&self) -> Result<Span, Error> {
        match (self.state, self.body) {
            (State::Closed, _) => Err(self.violation(Violation::AlreadyClosed)),
            (State::Opened, Some(body)) => Ok(body),
            _ => Err(self.violation(Violation::NotOpened)),
        }
    }

    fn finish(&mut self, processed: Span, close: Span, remaining: Span) {
        self.processed = Some(processed);
        self.close = Some(close);
        self.remaining = Some(remaining);
        self.state = State::Closed;
    }

    fn violation(&self, violation: Violation) -> Error {
        Error::protocol(self.kind.name(), violation)
    }

    /// Content after the open delimiter up to the end of the stream, once
    /// opened.
    pub(crate) fn body(&self) -> Option<Span> {
        self.body
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(cursor >= self.cursor || self.state == State::Unopened);
        self.cursor = cursor;
    }

    pub(crate) fn set_subparser(&mut self, level: Level) {
        self.subparser = Some(level);
    }

    pub(crate) fn set_extra(&mut self, extra: Option<ExtraData>) {
        self.extra = extra;
    }

    /// Appends `child` (spanning `span`) to a composition, skipping empty
    /// literals.
    pub(crate) fn push_child(&mut self, child: TokenId, span: Span, empty_data: bool) {
        if empty_data {
            return;
        }
        if let Variant::Composed { children } = &mut self.variant {
            let processed = match (children.is_empty(), self.processed) {
                (false, Some(processed)) => processed.join(&span),
                _ => span,
            };
            children.push(child);
            self.processed = Some(processed);
            self.close = Some(Span::empty(processed.end));
            self.remaining = Some(Span::empty(processed.end));
            self.open = Some(Span::empty(processed.start));
        }
    }
}

impl<K: Copy> Token<K> {
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    pub fn is_data(&self) -> bool {
        matches!(self.variant, Variant::Data { .. })
    }

    pub fn is_composed(&self) -> bool {
        matches!(self.variant, Variant::Composed { .. })
    }

    /// The original slice this token was created against.
    pub fn stream(&self) -> Span {
        self.stream
    }

    /// The detected open delimiter (empty for data and composed tokens).
    pub fn open_tag(&self) -> Option<Span> {
        self.open
    }

    /// The detected close delimiter, once closed.
    pub fn close_tag(&self) -> Option<Span> {
        self.close
    }

    /// Content between the delimiters, once closed.
    pub fn processed(&self) -> Option<Span> {
        self.processed
    }

    /// The slice after this token's close delimiter, once closed.
    pub fn remaining(&self) -> Option<Span> {
        self.remaining
    }

    /// Scan offset into the content after the open delimiter.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn parent(&self) -> Option<TokenId> {
        self.parent
    }

    /// The nested parse this token delegated its content to, if any.
    pub fn subparser(&self) -> Option<&Level> {
        self.subparser.as_ref()
    }

    /// Child tokens of a composition; empty for other variants.
    pub fn children(&self) -> &[TokenId] {
        match &self.variant {
            Variant::Composed { children } => children,
            _ => &[],
        }
    }

    /// The parent close delimiter a data token swallowed while closing.
    pub fn swallowed(&self) -> Option<Span> {
        match self.variant {
            Variant::Data { swallowed } => swallowed,
            _ => None,
        }
    }

    pub fn extra(&self) -> Option<&ExtraData> {
        self.extra.as_ref()
    }

    /// The consumed span `open + processed + close`, once closed.
    pub fn span(&self) -> Option<Span> {
        match (self.open, self.close, self.state) {
            (Some(open), Some(close), State::Closed) => Some(Span::new(open.start, close.end)),
            _ => None,
        }
    }

    /// How far the enclosing level advances past this token: its span plus
    /// any parent close delimiter it swallowed.
    pub fn length(&self) -> usize {
        let own = self.span().map_or(0, |span| span.len());
        own + self.swallowed().map_or(0, |span| span.len())
    }
}

/// A closed token's content bundle, as appended to a linker by default.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedData<K> {
    pub kind: K,
    /// The reconstructed text `open + processed + close`.
    pub content: String,
    /// Grammar-specific fields from [`TagRule::extra_data`](crate::TagRule::extra_data).
    pub extra: ExtraData,
    /// Ordered child tokens of a composition.
    pub composition: Vec<TokenId>,
}

/// All tokens admitted by one [`Parser`](crate::Parser) run, rooted at the
/// top-level token.
#[derive(Debug, Clone)]
pub struct TokenTree<'s, K> {
    source: &'s str,
    tokens: Vec<Token<K>>,
    root: TokenId,
}

impl<'s, K: NodeKind> TokenTree<'s, K> {
    pub(crate) fn new(source: &'s str, tokens: Vec<Token<K>>, root: TokenId) -> Self {
        Self {
            source,
            tokens,
            root,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn root(&self) -> TokenId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token<K>> {
        self.tokens.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &Token<K>)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| (TokenId::new(index), token))
    }

    /// The consumed text of a token.
    pub fn text(&self, id: TokenId) -> &'s str {
        self.slice(self[id].span())
    }

    pub fn open_text(&self, id: TokenId) -> &'s str {
        self.slice(self[id].open_tag())
    }

    pub fn processed_text(&self, id: TokenId) -> &'s str {
        self.slice(self[id].processed())
    }

    pub fn close_text(&self, id: TokenId) -> &'s str {
        self.slice(self[id].close_tag())
    }

    pub fn remaining_text(&self, id: TokenId) -> &'s str {
        self.slice(self[id].remaining())
    }

    /// `open + processed + close`, assembled piecewise.
    pub fn reconstruct(&self, id: TokenId) -> String {
        [
            self.open_text(id),
            self.processed_text(id),
            self.close_text(id),
        ]
        .concat()
    }

    pub fn processed_data(&self, id: TokenId) -> ProcessedData<K> {
        let token = &self[id];
        ProcessedData {
            kind: token.kind(),
            content: self.text(id).to_string(),
            extra: token.extra().cloned().unwrap_or_default(),
            composition: token.children().to_vec(),
        }
    }

    fn slice(&self, span: Option<Span>) -> &'s str {
        span.map_or("", |span| span.slice(self.source))
    }
}

impl<K> core::ops::Index<TokenId> for TokenTree<'_, K> {
    type Output = Token<K>;

    fn index(&self, id: TokenId) -> &Self::Output {
        &self.tokens[id.index()]
    }
}
