#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! A small text template language built on scankit.
//!
//! - `{{ name }}` substitutes an argument
//! - `{#upper ... #}` applies a filter (`upper`, `lower`, `trim`) to its content
//! - `{? ... ?}` renders only when every variable inside it is set
//!
//! ```ignore
//! let stencil = Stencil::new()?;
//! let text = stencil.render("Hello {#upper {{name}}#}{?, {{title}}?}!", [("name", "ada")])?;
//! assert_eq!(text, "Hello ADA!");
//! ```

use scankit::{Compiler, Link, Linker, NodeTree};
use thiserror::Error;

pub mod delimiters;
mod grammar;
mod render;

pub use grammar::{Filter, Kind, Piece, Stencil};
pub use render::Render;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StencilError {
    #[error(transparent)]
    Engine(#[from] scankit::Error),

    #[error("missing argument `{0}`")]
    MissingArgument(String),
}

impl Stencil {
    /// Parses and compiles `source` with `args` bound.
    pub fn compile<K, V>(
        &self,
        source: &str,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Linker<Piece>, StencilError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let nodes = NodeTree::parse(self, source)?;
        let mut compiler = Compiler::new(nodes, Linker::new());
        compiler.set_arguments(args);
        Ok(compiler.compile()?)
    }

    /// Parses, compiles and renders `source` in one go.
    pub fn render<K, V>(
        &self,
        source: &str,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String, StencilError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Render.link(&self.compile(source, args)?)
    }
}
