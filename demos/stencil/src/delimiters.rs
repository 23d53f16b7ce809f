//! Delimiter recognition for stencil tags.

use logos::Logos;
use scankit::{ExtraData, TagRule};

use crate::Kind;

/// Every delimiter stencil knows about.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    #[token("{{")]
    VarOpen,
    #[token("}}")]
    VarClose,

    // `{#upper ` carries the filter name
    #[regex(r"\{#[a-z]+[ \t]*")]
    FilterOpen,
    #[token("#}")]
    FilterClose,

    #[token("{?")]
    OptionalOpen,
    #[token("?}")]
    OptionalClose,
}

impl Delimiter {
    /// The delimiter starting at byte 0 of `stream` and its length.
    pub fn at_start(stream: &str) -> Option<(Self, usize)> {
        let mut lexer = Self::lexer(stream);
        match lexer.next() {
            Some(Ok(delimiter)) if lexer.span().start == 0 => Some((delimiter, lexer.span().end)),
            _ => None,
        }
    }
}

/// A tag opened by one delimiter and closed by another.
#[derive(Debug, Clone, Copy)]
pub struct Delimited {
    kind: Kind,
    open: Delimiter,
    close: Delimiter,
    close_text: &'static str,
}

impl Delimited {
    pub const VAR: Self = Self::new(Kind::Var, Delimiter::VarOpen, Delimiter::VarClose, "}}");
    pub const FILTER: Self = Self::new(
        Kind::Filter,
        Delimiter::FilterOpen,
        Delimiter::FilterClose,
        "#}",
    );
    pub const OPTIONAL: Self = Self::new(
        Kind::Optional,
        Delimiter::OptionalOpen,
        Delimiter::OptionalClose,
        "?}",
    );

    const fn new(kind: Kind, open: Delimiter, close: Delimiter, close_text: &'static str) -> Self {
        Self {
            kind,
            open,
            close,
            close_text,
        }
    }

    fn matching(delimiter: Delimiter, stream: &str) -> Option<usize> {
        Delimiter::at_start(stream)
            .filter(|(found, _)| *found == delimiter)
            .map(|(_, len)| len)
    }
}

impl TagRule<Kind> for Delimited {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn open_tag(&self, stream: &str) -> Option<usize> {
        Self::matching(self.open, stream)
    }

    fn close_tag(&self, _open: &str, stream: &str) -> Option<usize> {
        Self::matching(self.close, stream)
    }

    fn guess_close_tag(&self, _open: &str) -> Option<String> {
        Some(self.close_text.to_string())
    }

    fn extra_data(&self, open: &str, _content: &str) -> Option<ExtraData> {
        if self.open != Delimiter::FilterOpen {
            return None;
        }
        let name = open.trim_start_matches("{#").trim_end();
        Some(ExtraData::from([(FILTER_KEY.to_string(), name.to_string())]))
    }
}

/// The [`ExtraData`] key holding a filter tag's name.
pub const FILTER_KEY: &str = "filter";

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case::test_case("{{x}}", Some((Delimiter::VarOpen, 2)); "var")]
    #[test_case::test_case("{#upper x#}", Some((Delimiter::FilterOpen, 8)); "filter with space")]
    #[test_case::test_case("{#lower}", Some((Delimiter::FilterOpen, 7)); "filter without space")]
    #[test_case::test_case("?}", Some((Delimiter::OptionalClose, 2)); "optional close")]
    #[test_case::test_case("x{{", None; "not at start")]
    #[test_case::test_case("", None; "empty")]
    fn test_at_start(stream: &str, expected: Option<(Delimiter, usize)>) {
        assert_eq!(Delimiter::at_start(stream), expected);
    }

    #[test]
    fn test_rule_only_matches_its_delimiters() {
        assert_eq!(Delimited::VAR.open_tag("{{a}}"), Some(2));
        assert_eq!(Delimited::VAR.open_tag("{?a?}"), None);
        assert_eq!(Delimited::OPTIONAL.close_tag("{?", "?} rest"), Some(2));
        assert_eq!(Delimited::FILTER.close_tag("{#upper ", "}}"), None);
    }

    #[test]
    fn test_filter_name_is_extra_data() {
        let extra = Delimited::FILTER.extra_data("{#upper  ", "abc").unwrap();
        assert_eq!(extra.get(FILTER_KEY).map(String::as_str), Some("upper"));
        assert_eq!(Delimited::VAR.extra_data("{{", "abc"), None);
    }
}
