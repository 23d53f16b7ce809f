//! Core engine for building custom mini-languages.
//!
//! A grammar supplies tag rules and per-node emission; the engine scans
//! source text into a tree of delimited tokens, projects it lazily into
//! nodes, and compiles those nodes into a nested [`Linker`] tree that the
//! grammar finally assembles with [`Link`].
//!
//! ```text
//! source ─▶ Lexer ─▶ Parser ─▶ TokenTree ─▶ NodeTree ─▶ Compiler ─▶ Linker ─▶ Link
//! ```
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/pipeline.mmd"))]
//!
//! Most users depend on the `scankit` facade crate, which also re-exports
//! `#[derive(NodeKind)]`.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![deny(unsafe_code, clippy::todo, clippy::unimplemented, clippy::dbg_macro)]

mod arguments;
mod compiler;
pub mod config;
mod error;
mod lexer;
mod linker;
mod node;
mod parser;
pub mod rules;
mod span;
mod strict;
mod token;
pub mod traits;

#[cfg(test)]
mod testing;

pub use arguments::Arguments;
pub use compiler::Compiler;
pub use config::ParseConfig;
pub use error::{Error, NodeInfo, Violation};
pub use lexer::{Candidate, Lexer};
pub use linker::{Entry, Linker, Walk};
pub use node::{Ancestors, Children, Descendants, Matcher, Node, NodeRef, NodeTree};
pub use parser::{Level, Parser};
pub use span::Span;
pub use strict::Constraints;
pub use token::{ExtraData, ProcessedData, State, Token, TokenId, TokenTree, Variant};
pub use traits::{Grammar, Link, NodeKind, TagRule};
