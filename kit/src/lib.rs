#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
//! Build delimiter-driven mini-languages: scan text into tokens, project
//! them into a lazy node tree, and compile nodes into scoped output.
//!
//! See [`scankit_core`] for the engine and [`scankit_macros`] for
//! `#[derive(NodeKind)]`.
pub use scankit_core::*;
pub use scankit_macros::*;
