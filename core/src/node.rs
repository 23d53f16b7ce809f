//! The semantic tree projected over a [`TokenTree`].
//!
//! Nodes are created lazily, at most once per token, and compute their
//! children on first access. The token tree is frozen by then: a
//! [`NodeTree`] owns it and never hands out mutable tokens.
//!
//! Walking the tree never recurses. [`Descendants`] keeps an explicit stack
//! of `(siblings, index)` frames, so depth is bounded by memory rather than
//! by the call stack.

use core::cell::OnceCell;
use core::fmt;

use crate::error::NodeInfo;
use crate::parser::{Level, Parser};
use crate::token::{ProcessedData, Token, TokenId, TokenTree};
use crate::{Arguments, Constraints, Error, Grammar, Linker, NodeKind, ParseConfig};

/// A node's memoized children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Computed: the node has no children.
    Leaf,
    /// Computed: the child tokens, in order.
    Branch(Vec<TokenId>),
}

impl Children {
    pub fn as_slice(&self) -> &[TokenId] {
        match self {
            Children::Leaf => &[],
            Children::Branch(children) => children,
        }
    }
}

/// The compile-time wrapper of one token.
#[derive(Debug, Clone)]
pub struct Node<K> {
    token: TokenId,
    kind: K,
    children: OnceCell<Children>,
    constraints: Option<Constraints<K>>,
}

impl<K: NodeKind> Node<K> {
    fn new(token: TokenId, kind: K, constraints: Option<Constraints<K>>) -> Self {
        Self {
            token,
            kind,
            children: OnceCell::new(),
            constraints,
        }
    }

    pub fn token(&self) -> TokenId {
        self.token
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    /// `None` until the children were first asked for.
    pub fn computed_children(&self) -> Option<&Children> {
        self.children.get()
    }

    /// A node with constraints is strict: it validates its descendants
    /// before it is emitted.
    pub fn is_strict(&self) -> bool {
        self.constraints.is_some()
    }

    pub fn constraints(&self) -> Option<&Constraints<K>> {
        self.constraints.as_ref()
    }

    pub fn constraints_mut(&mut self) -> Option<&mut Constraints<K>> {
        self.constraints.as_mut()
    }

    pub fn set_constraints(&mut self, constraints: Option<Constraints<K>>) {
        self.constraints = constraints;
    }
}

/// Lazily projected nodes over a parsed token tree.
pub struct NodeTree<'a, G: Grammar> {
    grammar: &'a G,
    tokens: TokenTree<'a, G::Kind>,
    nodes: Vec<OnceCell<Node<G::Kind>>>,
}

impl<'a, G: Grammar> NodeTree<'a, G> {
    pub fn new(grammar: &'a G, tokens: TokenTree<'a, G::Kind>) -> Self {
        let nodes = (0..tokens.len()).map(|_| OnceCell::new()).collect();
        Self {
            grammar,
            tokens,
            nodes,
        }
    }

    /// Parses `source` with the grammar's lexer and default limits.
    pub fn parse(grammar: &'a G, source: &'a str) -> Result<Self, Error> {
        Self::parse_with_config(grammar, source, ParseConfig::DEFAULT)
    }

    pub fn parse_with_config(
        grammar: &'a G,
        source: &'a str,
        config: ParseConfig,
    ) -> Result<Self, Error> {
        let tokens = Parser::new(grammar.lexer(), source)
            .with_config(config)
            .parse()?;
        Ok(Self::new(grammar, tokens))
    }

    pub fn grammar(&self) -> &'a G {
        self.grammar
    }

    pub fn tokens(&self) -> &TokenTree<'a, G::Kind> {
        &self.tokens
    }

    pub fn root(&self) -> NodeRef<'_, 'a, G> {
        NodeRef {
            tree: self,
            id: self.tokens.root(),
        }
    }

    pub fn get(&self, id: TokenId) -> Option<NodeRef<'_, 'a, G>> {
        self.tokens.get(id).map(|_| NodeRef { tree: self, id })
    }

    /// The node of token `id`, created on first access.
    pub fn node(&self, id: TokenId) -> &Node<G::Kind> {
        self.nodes[id.index()].get_or_init(|| self.create(id))
    }

    /// Mutable access to one node, for configuring a single strict node
    /// before compilation.
    pub fn node_mut(&mut self, id: TokenId) -> Option<&mut Node<G::Kind>> {
        if self.nodes.get(id.index())?.get().is_none() {
            let node = self.create(id);
            let _ = self.nodes[id.index()].set(node);
        }
        self.nodes.get_mut(id.index())?.get_mut()
    }

    fn create(&self, id: TokenId) -> Node<G::Kind> {
        let kind = self.tokens[id].kind();
        Node::new(id, kind, self.grammar.constraints(kind))
    }

    fn children(&self, id: TokenId) -> &[TokenId] {
        self.node(id)
            .children
            .get_or_init(|| self.compute_children(id))
            .as_slice()
    }

    /// Children come from whichever token carries the composition: the
    /// level this token delegated to, or the token itself when composed.
    fn compute_children(&self, id: TokenId) -> Children {
        let token = &self.tokens[id];
        let target = match token.subparser().and_then(Level::token) {
            Some(target) => target,
            None if token.is_composed() => id,
            None => return Children::Leaf,
        };
        let target_token = &self.tokens[target];
        if !target_token.is_composed() {
            Children::Branch(vec![target])
        } else if target_token.children().is_empty() {
            Children::Leaf
        } else {
            Children::Branch(target_token.children().to_vec())
        }
    }
}

impl<G: Grammar> fmt::Debug for NodeTree<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("tokens", &self.tokens)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

/// A handle on one node of a [`NodeTree`].
pub struct NodeRef<'t, 'a, G: Grammar> {
    tree: &'t NodeTree<'a, G>,
    id: TokenId,
}

impl<G: Grammar> Clone for NodeRef<'_, '_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Grammar> Copy for NodeRef<'_, '_, G> {}

impl<G: Grammar> PartialEq for NodeRef<'_, '_, G> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<G: Grammar> fmt::Debug for NodeRef<'_, '_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info())
    }
}

impl<'t, 'a, G: Grammar> NodeRef<'t, 'a, G> {
    pub fn id(self) -> TokenId {
        self.id
    }

    pub fn kind(self) -> G::Kind {
        self.node().kind()
    }

    pub fn tree(self) -> &'t NodeTree<'a, G> {
        self.tree
    }

    pub fn node(self) -> &'t Node<G::Kind> {
        self.tree.node(self.id)
    }

    pub fn token(self) -> &'t Token<G::Kind> {
        &self.tree.tokens[self.id]
    }

    /// The token's consumed text, delimiters included.
    pub fn text(self) -> &'a str {
        self.tree.tokens.text(self.id)
    }

    /// The token's content between its delimiters.
    pub fn content(self) -> &'a str {
        self.tree.tokens.processed_text(self.id)
    }

    pub fn info(self) -> NodeInfo {
        NodeInfo {
            id: self.id,
            kind: self.kind().name(),
        }
    }

    pub fn processed_data(self) -> ProcessedData<G::Kind> {
        self.tree.tokens.processed_data(self.id)
    }

    pub fn is_composed(self) -> bool {
        self.token().is_composed()
    }

    pub fn children(self) -> &'t [TokenId] {
        self.tree.children(self.id)
    }

    pub fn has_children(self) -> bool {
        !self.children().is_empty()
    }

    /// Child nodes in order.
    pub fn nodes(self) -> impl Iterator<Item = NodeRef<'t, 'a, G>> {
        let tree = self.tree;
        self.children().iter().map(move |&id| NodeRef { tree, id })
    }

    /// The node of the nearest enclosing token; `None` at the top level.
    pub fn parent_node(self) -> Option<Self> {
        self.token().parent().map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Enclosing nodes, nearest first.
    pub fn ancestors(self) -> Ancestors<'t, 'a, G> {
        Ancestors {
            tree: self.tree,
            next: self.token().parent(),
        }
    }

    pub fn depth(self) -> usize {
        self.ancestors().count()
    }

    /// Every node below this one in pre-order, self excluded.
    pub fn descendants(self) -> Descendants<'t, 'a, G> {
        Descendants {
            tree: self.tree,
            stack: vec![(self.children(), 0)],
        }
    }

    /// The first ancestor matching `matcher`, skipping the `start_level`
    /// nearest ones.
    pub fn first_parent_node(self, matcher: impl Into<Matcher<G::Kind>>, start_level: usize) -> Option<Self> {
        let matcher = matcher.into();
        self.find_parent_node(|node| matcher.matches(node.kind()), start_level)
    }

    pub fn find_parent_node(
        self,
        predicate: impl FnMut(&NodeRef<'t, 'a, G>) -> bool,
        start_level: usize,
    ) -> Option<Self> {
        self.ancestors().skip(start_level).find(predicate)
    }

    /// This node or the first descendant matching `matcher`, in pre-order.
    pub fn first_child_node(self, matcher: impl Into<Matcher<G::Kind>>) -> Option<Self> {
        let matcher = matcher.into();
        self.find_child_node(|node| matcher.matches(node.kind()))
    }

    pub fn find_child_node(self, mut predicate: impl FnMut(&NodeRef<'t, 'a, G>) -> bool) -> Option<Self> {
        if predicate(&self) {
            return Some(self);
        }
        self.descendants().find(predicate)
    }

    /// Runs the node's strict constraints, if it has any.
    pub fn check_constraints(self) -> Result<(), Error> {
        match self.node().constraints() {
            Some(constraints) => constraints.check(self),
            None => Ok(()),
        }
    }

    /// Checks the node against its grammar and emits it into `linker`.
    pub fn make(self, args: &Arguments, linker: &mut Linker<G::Item>) -> Result<(), Error> {
        let grammar = self.tree.grammar;
        if !grammar.is_allowed(self)? {
            return Err(Error::NotAllowed {
                node: self.info(),
                parent: self.parent_node().map(NodeRef::info),
            });
        }
        grammar.make(self, args, linker)
    }
}

/// Iterator over a node's ancestors. See [`NodeRef::ancestors`].
pub struct Ancestors<'t, 'a, G: Grammar> {
    tree: &'t NodeTree<'a, G>,
    next: Option<TokenId>,
}

impl<'t, 'a, G: Grammar> Iterator for Ancestors<'t, 'a, G> {
    type Item = NodeRef<'t, 'a, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.tokens[id].parent();
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}

/// Pre-order iterator over a node's descendants. See
/// [`NodeRef::descendants`].
pub struct Descendants<'t, 'a, G: Grammar> {
    tree: &'t NodeTree<'a, G>,
    stack: Vec<(&'t [TokenId], usize)>,
}

impl<'t, 'a, G: Grammar> Iterator for Descendants<'t, 'a, G> {
    type Item = NodeRef<'t, 'a, G>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (siblings, index) = self.stack.last_mut()?;
            let Some(&id) = siblings.get(*index) else {
                self.stack.pop();
                continue;
            };
            *index += 1;
            let children = self.tree.children(id);
            if !children.is_empty() {
                self.stack.push((children, 0));
            }
            return Some(NodeRef {
                tree: self.tree,
                id,
            });
        }
    }
}

/// Selects nodes by kind, through the kind hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher<K> {
    /// The kind or any kind extending it.
    Kind(K),
    /// Any of these kinds or kinds extending them.
    AnyOf(Vec<K>),
}

impl<K: NodeKind> Matcher<K> {
    /// Matches the kind called `name`.
    pub fn named(name: &str) -> Result<Self, Error> {
        K::resolve(name).map(Matcher::Kind)
    }

    pub fn any_named(names: &[&str]) -> Result<Self, Error> {
        names
            .iter()
            .map(|name| K::resolve(name))
            .collect::<Result<_, _>>()
            .map(Matcher::AnyOf)
    }

    pub fn matches(&self, kind: K) -> bool {
        match self {
            Matcher::Kind(expected) => kind.is_a(*expected),
            Matcher::AnyOf(expected) => expected.iter().any(|&expected| kind.is_a(expected)),
        }
    }
}

impl<K: NodeKind> From<K> for Matcher<K> {
    fn from(kind: K) -> Self {
        Matcher::Kind(kind)
    }
}

impl<K: NodeKind> From<Vec<K>> for Matcher<K> {
    fn from(kinds: Vec<K>) -> Self {
        Matcher::AnyOf(kinds)
    }
}

impl<K: NodeKind> From<&[K]> for Matcher<K> {
    fn from(kinds: &[K]) -> Self {
        Matcher::AnyOf(kinds.to_vec())
    }
}
