use crate::token::ExtraData;

/// Recognizes one delimited token kind of a grammar.
///
/// A rule is consulted in two situations: by the [`Lexer`](crate::Lexer)
/// when asking "which token starts here?", and by the scanner while a token
/// of this rule is open, to find its close delimiter. Both checks only look
/// at the start of the given stream and must be pure: the same input always
/// yields the same answer.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct Comment;
///
/// impl TagRule<Kind> for Comment {
///     fn kind(&self) -> Kind {
///         Kind::Comment
///     }
///
///     fn open_tag(&self, stream: &str) -> Option<usize> {
///         stream.starts_with("/*").then_some(2)
///     }
///
///     fn close_tag(&self, _open: &str, stream: &str) -> Option<usize> {
///         stream.starts_with("*/").then_some(2)
///     }
///
///     fn guess_close_tag(&self, _open: &str) -> Option<String> {
///         Some("*/".into())
///     }
/// }
/// ```
pub trait TagRule<K>: core::fmt::Debug {
    /// Kind given to tokens (and their nodes) opened by this rule.
    fn kind(&self) -> K;

    /// Byte length of the open delimiter at the start of `stream`, if one
    /// starts there.
    ///
    /// Zero-length matches are treated as no match.
    fn open_tag(&self, stream: &str) -> Option<usize>;

    /// Byte length of the close delimiter at the start of `stream`, for a
    /// token opened with `open`.
    ///
    /// `stream` is empty when the scanner reached the end of its slice; a
    /// rule whose tokens may end with the input can match there.
    fn close_tag(&self, open: &str, stream: &str) -> Option<usize>;

    /// The close delimiter expected for `open`, used in
    /// [`Error::UnclosedToken`](crate::Error::UnclosedToken).
    fn guess_close_tag(&self, open: &str) -> Option<String> {
        let _ = open;
        None
    }

    /// Grammar-specific fields added to the token's
    /// [`ProcessedData`](crate::ProcessedData), computed once when the token
    /// closes.
    fn extra_data(&self, open: &str, content: &str) -> Option<ExtraData> {
        let _ = (open, content);
        None
    }
}
