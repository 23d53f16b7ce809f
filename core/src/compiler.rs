//! Compilation of a node tree into a linker tree.
//!
//! The walk mirrors recursive descent with an explicit frame stack: every
//! node emits into the linker scope matching its depth, siblings share a
//! scope and children get a fresh nested one.
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/compile.mmd"))]

use log::debug;

use crate::linker::Scopes;
use crate::{Arguments, Error, Grammar, Linker, NodeTree};

/// One level of the walk: the siblings still to emit.
struct Frame<I> {
    siblings: I,
    scoped: bool,
}

/// Drives one compilation of a node tree.
///
/// ```ignore
/// let nodes = NodeTree::parse(&grammar, "Hello {{name}}!")?;
/// let mut compiler = Compiler::new(nodes, Linker::new());
/// compiler.set_arguments([("name", "world")]);
/// let linker = compiler.compile()?;
/// ```
pub struct Compiler<'a, G: Grammar> {
    nodes: NodeTree<'a, G>,
    linker: Linker<G::Item>,
    args: Arguments,
}

impl<'a, G: Grammar> Compiler<'a, G> {
    pub fn new(nodes: NodeTree<'a, G>, linker: Linker<G::Item>) -> Self {
        Self {
            nodes,
            linker,
            args: Arguments::new(),
        }
    }

    pub fn nodes(&self) -> &NodeTree<'a, G> {
        &self.nodes
    }

    /// Mutable node access, e.g. to configure one strict node.
    pub fn nodes_mut(&mut self) -> &mut NodeTree<'a, G> {
        &mut self.nodes
    }

    /// Merges `values` into the argument bag.
    pub fn set_arguments<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.args.set(values);
        self
    }

    pub fn remove_arguments<S: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = S>) -> &mut Self {
        self.args.remove(keys);
        self
    }

    pub fn arguments(&self) -> &Arguments {
        &self.args
    }

    /// The listed arguments that are set.
    pub fn get_arguments<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Arguments {
        self.args.select(keys)
    }

    /// Walks the tree once and returns the filled linker.
    pub fn compile(self) -> Result<Linker<G::Item>, Error> {
        let Self {
            nodes,
            linker,
            args,
        } = self;
        let root = nodes.root();
        debug!("compiling from root {:?}", root);

        let mut scopes = Scopes::new(linker);
        let mut stack = Vec::new();
        if root.is_composed() {
            stack.push(Frame {
                siblings: root.nodes(),
                scoped: false,
            });
        } else {
            root.make(&args, scopes.current())?;
            if root.has_children() {
                scopes.enter();
                stack.push(Frame {
                    siblings: root.nodes(),
                    scoped: true,
                });
            }
        }

        while let Some(frame) = stack.last_mut() {
            let Some(node) = frame.siblings.next() else {
                if frame.scoped {
                    scopes.leave();
                }
                stack.pop();
                continue;
            };
            node.make(&args, scopes.current())?;
            if node.has_children() {
                scopes.enter();
                stack.push(Frame {
                    siblings: node.nodes(),
                    scoped: true,
                });
            }
        }

        let linker = scopes.finish();
        debug!("compiled {} top-level linker entries", linker.len());
        Ok(linker)
    }
}
