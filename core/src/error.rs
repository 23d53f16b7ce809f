//! Core error types for scankit.
//!
//! Every failure of [`Parser::parse`](crate::Parser::parse) and
//! [`Compiler::compile`](crate::Compiler::compile) is reported as an
//! [`Error`]. None of them are recovered internally: the token or node tree
//! that produced one must be discarded.
//!
//! Grammar crates that add their own failure modes (usually in the final
//! [`Link`](crate::Link) step) should wrap this type:
//!
//! ```ignore
//! use thiserror::Error;
//!
//! #[derive(Error, Debug)]
//! pub enum RenderError {
//!     #[error(transparent)]
//!     Compile(#[from] scankit::Error),
//!
//!     #[error("missing argument `{0}`")]
//!     MissingArgument(String),
//! }
//! ```

use core::fmt;

use thiserror::Error;

use crate::token::TokenId;

/// Identity of a node inside an error, detached from the tree it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeInfo {
    /// The token the node wraps.
    pub id: TokenId,
    /// The node kind's name.
    pub kind: &'static str,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

/// The ways a token's `unopened → opened → closed` state machine can be
/// misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `open` without a detected open delimiter.
    OpenTagNotIdentified,
    /// `open` on a token that was already opened.
    AlreadyOpened,
    /// `close` on a token that was never opened.
    NotOpened,
    /// Unforced `close` without a detected close delimiter.
    CloseTagNotIdentified,
    /// `open` or `close` on a token that is already closed.
    AlreadyClosed,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Violation::OpenTagNotIdentified => "opening tag not identified, token cannot be opened",
            Violation::AlreadyOpened => "token is opened already",
            Violation::NotOpened => "token was never opened",
            Violation::CloseTagNotIdentified => {
                "closing tag not identified, token cannot be closed"
            }
            Violation::AlreadyClosed => "token is closed already",
        })
    }
}

/// Core scankit error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A token's open/close state machine was violated.
    ///
    /// This is a bug in a grammar or in the caller, never a property of the
    /// input text.
    #[error("protocol violation on {kind} token: {violation}")]
    Protocol {
        kind: &'static str,
        violation: Violation,
    },

    /// The stream ended while a token still expected its close delimiter.
    #[error(
        "unclosed {open} token at byte {offset} expects a closing {}tag",
        expected_tag(.expected)
    )]
    UnclosedToken {
        /// The detected open delimiter, or the token kind when it has none.
        open: String,
        /// The close delimiter the grammar guessed, if any.
        expected: Option<String>,
        /// Byte offset of the token in the source.
        offset: usize,
    },

    /// A node's own `is_allowed` check refused it.
    #[error("the node {node} is not allowed {}", placement(.parent))]
    NotAllowed {
        node: NodeInfo,
        parent: Option<NodeInfo>,
    },

    /// A strict node found a descendant whose kind it does not allow.
    #[error("the node {child} is not allowed in a {container} node")]
    DisallowedChild {
        child: NodeInfo,
        container: NodeInfo,
    },

    /// A strict node's mandatory kinds were not all present among its
    /// descendants.
    #[error(
        "the node {node} has mandatory constraints which are not met: {}",
        .missing.join(", ")
    )]
    MissingMandatoryChild {
        node: NodeInfo,
        missing: Vec<&'static str>,
    },

    /// A caller passed a malformed configuration value.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// Nested delegation went deeper than
    /// [`ParseConfig::max_recursion_depth`](crate::ParseConfig::max_recursion_depth).
    #[error("recursion limit exceeded: depth {depth} > limit {limit}")]
    RecursionLimitExceeded { depth: usize, limit: usize },

    /// More tokens were admitted than
    /// [`ParseConfig::max_tokens`](crate::ParseConfig::max_tokens).
    #[error("token limit exceeded: consumed {consumed} > limit {limit}")]
    TokenLimitExceeded { consumed: usize, limit: usize },
}

impl Error {
    pub(crate) fn protocol(kind: &'static str, violation: Violation) -> Self {
        Self::Protocol { kind, violation }
    }

    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

fn expected_tag(expected: &Option<String>) -> String {
    expected
        .as_deref()
        .map(|tag| format!("{tag} "))
        .unwrap_or_default()
}

fn placement(parent: &Option<NodeInfo>) -> String {
    match parent {
        Some(parent) => format!("in a {parent} node"),
        None => "as the root node".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: usize, kind: &'static str) -> NodeInfo {
        NodeInfo {
            id: TokenId::new(id),
            kind,
        }
    }

    #[test]
    fn test_unclosed_message_with_guess() {
        let err = Error::UnclosedToken {
            open: "<<".into(),
            expected: Some(">>".into()),
            offset: 0,
        };
        assert_eq!(
            err.to_string(),
            "unclosed << token at byte 0 expects a closing >> tag"
        );
    }

    #[test]
    fn test_unclosed_message_without_guess() {
        let err = Error::UnclosedToken {
            open: "Tag".into(),
            expected: None,
            offset: 4,
        };
        assert_eq!(
            err.to_string(),
            "unclosed Tag token at byte 4 expects a closing tag"
        );
    }

    #[test]
    fn test_not_allowed_names_root() {
        let err = Error::NotAllowed {
            node: info(0, "Tag"),
            parent: None,
        };
        assert_eq!(err.to_string(), "the node Tag#0 is not allowed as the root node");

        let err = Error::NotAllowed {
            node: info(3, "Tag"),
            parent: Some(info(1, "Block")),
        };
        assert_eq!(
            err.to_string(),
            "the node Tag#3 is not allowed in a Block#1 node"
        );
    }

    #[test]
    fn test_missing_mandatory_lists_kinds() {
        let err = Error::MissingMandatoryChild {
            node: info(2, "Section"),
            missing: vec!["Title", "Body"],
        };
        assert_eq!(
            err.to_string(),
            "the node Section#2 has mandatory constraints which are not met: Title, Body"
        );
    }
}
