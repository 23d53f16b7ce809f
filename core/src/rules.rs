//! Ready-made [`TagRule`] implementations.

use crate::TagRule;

/// A tag delimited by two fixed strings, such as `{{ ... }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralPair<K> {
    kind: K,
    open: &'static str,
    close: &'static str,
}

impl<K> LiteralPair<K> {
    pub const fn new(kind: K, open: &'static str, close: &'static str) -> Self {
        Self { kind, open, close }
    }
}

impl<K: Copy + core::fmt::Debug> TagRule<K> for LiteralPair<K> {
    fn kind(&self) -> K {
        self.kind
    }

    fn open_tag(&self, stream: &str) -> Option<usize> {
        stream.starts_with(self.open).then_some(self.open.len())
    }

    fn close_tag(&self, _open: &str, stream: &str) -> Option<usize> {
        (!self.close.is_empty() && stream.starts_with(self.close)).then_some(self.close.len())
    }

    fn guess_close_tag(&self, _open: &str) -> Option<String> {
        Some(self.close.to_string())
    }
}
