#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Procedural macros for the scankit mini-language engine.
//!
//! - [`NodeKind`](derive@NodeKind): implements `scankit::NodeKind` for a
//!   grammar's closed kind enumeration
//!
//! # Quick Start
//!
//! ```ignore
//! use scankit::NodeKind;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
//! enum Kind {
//!     #[kind(base)]
//!     Node,
//!     Document,
//!     Text,
//!     Block,
//!     #[kind(extends = Block)]
//!     Filter,
//! }
//! ```
use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod node_kind;

/// Derives `scankit::NodeKind` for a fieldless enum.
///
/// Kinds form a single-inheritance hierarchy. Every variant extends the
/// variant marked `#[kind(base)]` unless it names another parent.
///
/// # Attributes
///
/// - `#[kind(base)]`: the root of the hierarchy (at most one)
/// - `#[kind(extends = Variant)]`: the direct parent kind
/// - `#[kind(rename = "name")]`: the name used in errors and lookups,
///   defaulting to the variant name
///
/// # Generated Code
///
/// - `ALL`: every variant in declaration order
/// - `BASE`: the base variant, if any
/// - `name()` and `extends()`
///
/// # Errors
///
/// Fails to compile for non-enums, generic enums, variants with fields,
/// more than one base, unknown or cyclic parents and duplicate names.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
/// enum Kind {
///     #[kind(base)]
///     Node,
///     Text,
///     #[kind(rename = "var")]
///     Var,
///     #[kind(extends = Var)]
///     OptionalVar,
/// }
///
/// assert_eq!(Kind::Var.name(), "var");
/// assert!(Kind::OptionalVar.is_a(Kind::Node));
/// assert_eq!(Kind::from_name("Text"), Some(Kind::Text));
/// ```
#[proc_macro_derive(NodeKind, attributes(kind))]
pub fn derive_node_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    node_kind::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
