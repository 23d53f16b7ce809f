//! Scanner configuration for resource limits.
//!
//! This module provides [`ParseConfig`] for bounding a scanning pass.
//!
//! # Recursion Limits
//!
//! Node search and compilation walk trees with an explicit stack and never
//! consume call stack per level. Scanning is different: when a token meets a
//! nested token inside its content it delegates to a sub-parser, and that
//! delegation recurses once per nesting level. Input like
//! `<<<<<<<<...>>>>>>>>` would otherwise be able to overflow the stack, so
//! the default limit of 128 mirrors the one `serde_json` uses.
//!
//! # Example
//!
//! ```ignore
//! use scankit_core::config::ParseConfig;
//!
//! // Use default limits (nesting depth: 128)
//! let config = ParseConfig::default();
//!
//! // Allow deeper nesting and cap the token count
//! let config = ParseConfig::new()
//!     .with_max_recursion_depth(512)
//!     .with_max_tokens(100_000);
//!
//! let tree = Parser::new(&lexer, source).with_config(config).parse()?;
//! ```

use crate::Error;

/// Configuration for scanner resource limits.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `max_recursion_depth` | 128 | Matches serde_json default |
/// | `max_tokens` | `usize::MAX` | No limit by default |
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum nesting depth of delegated sub-parses.
    ///
    /// Each token that delegates its content to a sub-parser enters one
    /// level. Exceeding the limit fails with
    /// [`Error::RecursionLimitExceeded`].
    ///
    /// Default: 128 (matching serde_json)
    pub max_recursion_depth: usize,

    /// Maximum number of tokens admitted to the token tree.
    ///
    /// Trial tokens built only to answer "what starts here?" are not
    /// counted. Exceeding the limit fails with
    /// [`Error::TokenLimitExceeded`].
    ///
    /// Default: `usize::MAX` (no limit)
    pub max_tokens: usize,
}

impl Default for ParseConfig {
    /// Returns the default configuration.
    ///
    /// - `max_recursion_depth`: 128
    /// - `max_tokens`: `usize::MAX`
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParseConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        max_recursion_depth: 128,
        max_tokens: usize::MAX,
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the maximum nesting depth.
    ///
    /// # Arguments
    ///
    /// * `depth` - Maximum nesting level. Use `usize::MAX` to disable the limit.
    #[inline]
    pub const fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Sets the maximum token count.
    ///
    /// # Arguments
    ///
    /// * `count` - Maximum tokens to admit. Use `usize::MAX` to disable.
    #[inline]
    pub const fn with_max_tokens(mut self, count: usize) -> Self {
        self.max_tokens = count;
        self
    }

    /// Disables the recursion limit.
    ///
    /// # Warning
    ///
    /// Only use this when scanning trusted input! Untrusted deeply-nested
    /// input can cause stack overflow.
    #[inline]
    pub const fn disable_recursion_limit(self) -> Self {
        self.with_max_recursion_depth(usize::MAX)
    }

    /// Fails with [`Error::TokenLimitExceeded`] when admitting one more token
    /// to a tree already holding `admitted` tokens would exceed the limit.
    #[inline]
    pub fn admit_token(&self, admitted: usize) -> Result<(), Error> {
        let consumed = admitted.saturating_add(1);
        if consumed > self.max_tokens {
            Err(Error::TokenLimitExceeded {
                consumed,
                limit: self.max_tokens,
            })
        } else {
            Ok(())
        }
    }
}

/// Tracks delegation depth while scanning.
///
/// The [`Parser`](crate::Parser) enters the guard before handing a nested
/// region to a sub-parser and exits it afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RecursionGuard {
    /// Current recursion depth.
    depth: usize,
}

impl RecursionGuard {
    /// Creates a new guard with depth 0.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self { depth: 0 }
    }

    /// Current recursion depth.
    #[inline]
    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    /// Enter a nested context, incrementing depth.
    ///
    /// Returns `Err(Error::RecursionLimitExceeded)` if the new depth would
    /// exceed the limit. The depth is still incremented, so every `enter`
    /// must be paired with an `exit`.
    #[inline]
    pub(crate) fn enter(&mut self, limit: usize) -> Result<(), Error> {
        self.depth = self.depth.saturating_add(1);
        if self.depth > limit {
            Err(Error::RecursionLimitExceeded {
                depth: self.depth,
                limit,
            })
        } else {
            Ok(())
        }
    }

    /// Exit a nested context, decrementing depth.
    ///
    /// Uses saturating subtraction so extra `exit()` calls don't underflow.
    #[inline]
    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.max_recursion_depth, 128);
        assert_eq!(config.max_tokens, usize::MAX);
    }

    #[test]
    fn test_parse_config_builder() {
        let config = ParseConfig::new()
            .with_max_recursion_depth(256)
            .with_max_tokens(10000);

        assert_eq!(config.max_recursion_depth, 256);
        assert_eq!(config.max_tokens, 10000);
    }

    #[test]
    fn test_parse_config_disable_recursion() {
        let config = ParseConfig::new().disable_recursion_limit();
        assert_eq!(config.max_recursion_depth, usize::MAX);
    }

    #[test]
    fn test_admit_token_at_limit() {
        let config = ParseConfig::new().with_max_tokens(2);
        assert!(config.admit_token(0).is_ok());
        assert!(config.admit_token(1).is_ok());
        assert_eq!(
            config.admit_token(2),
            Err(Error::TokenLimitExceeded {
                consumed: 3,
                limit: 2
            })
        );
    }

    #[test]
    fn test_admit_token_unlimited_saturates() {
        assert!(ParseConfig::new().admit_token(usize::MAX).is_ok());
    }
}
