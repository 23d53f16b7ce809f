use core::fmt;
use core::hash::Hash;

use crate::Error;

/// A closed enumeration of the node kinds one grammar produces.
///
/// Kinds form a single-inheritance hierarchy through [`extends`]: a kind
/// matches itself and every kind it (transitively) extends, which is what
/// allow-lists and node searches test against. The usual way to implement
/// this trait is `#[derive(NodeKind)]` from `scankit-macros`:
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, NodeKind)]
/// enum Kind {
///     #[kind(base)]
///     Node,
///     Text,
///     Block,
///     #[kind(extends = Block)]
///     Filter,
/// }
///
/// assert!(Kind::Filter.is_a(Kind::Block));
/// assert!(Kind::Filter.is_a(Kind::Node));
/// assert!(!Kind::Text.is_a(Kind::Block));
/// ```
///
/// [`extends`]: NodeKind::extends
pub trait NodeKind: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Every kind, in declaration order.
    const ALL: &'static [Self];

    /// The root of the hierarchy, if the grammar declares one.
    ///
    /// Strict nodes allow the base kind by default, and so allow everything.
    const BASE: Option<Self>;

    /// Stable name used in errors and by-name lookups.
    fn name(self) -> &'static str;

    /// The kind this one directly extends.
    fn extends(self) -> Option<Self>;

    /// Returns `true` if `self` is `ancestor` or extends it.
    fn is_a(self, ancestor: Self) -> bool {
        let mut kind = Some(self);
        while let Some(current) = kind {
            if current == ancestor {
                return true;
            }
            kind = current.extends();
        }
        false
    }

    /// Looks a kind up by its [`name`](NodeKind::name).
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Like [`from_name`](NodeKind::from_name), failing with
    /// [`Error::InvalidArgument`] for unknown names.
    fn resolve(name: &str) -> Result<Self, Error> {
        Self::from_name(name).ok_or_else(|| Error::InvalidArgument {
            argument: "kind",
            reason: format!("`{name}` is not a known node kind"),
        })
    }
}
