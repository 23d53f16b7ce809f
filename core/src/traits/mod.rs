//! Plug-in traits for concrete mini-languages.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Grammar (one per mini-language)
//!     ├── Kind: NodeKind (closed kind enumeration)
//!     ├── lexer() -> Lexer<Kind>
//!     │       └── TagRule<Kind> (one per delimited token kind)
//!     └── make() -> Linker<Item>
//!                     └── Link<Item> (final assembly)
//! ```

mod grammar;
mod kind;
mod link;
mod rule;

pub use grammar::Grammar;
pub use kind::NodeKind;
pub use link::Link;
pub use rule::TagRule;
