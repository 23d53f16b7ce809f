use super::kind::NodeKind;
use crate::{Arguments, Constraints, Error, Lexer, Linker, NodeRef, ProcessedData};

/// Everything a concrete mini-language plugs into the engine.
///
/// A grammar owns its [`Lexer`] (tag rules in priority order plus the data
/// and composed kinds), decides which node kinds are strict, and emits
/// linker entries for each node during compilation.
///
/// # Required Items
///
/// - `Kind`: the grammar's closed node kind enumeration
/// - `Item`: what nodes append to the [`Linker`]
/// - `lexer()`: the grammar's registry of tag rules
///
/// # Provided Methods
///
/// - `constraints(kind)`: strict-node configuration for freshly created nodes
/// - `is_allowed(node)`: the per-node grammar check run before emission
/// - `make(node, args, linker)`: emission; defaults to appending the node's
///   [`ProcessedData`]
///
/// # Example
///
/// ```ignore
/// impl Grammar for Markup {
///     type Kind = Kind;
///     type Item = Piece;
///
///     fn lexer(&self) -> &Lexer<Kind> {
///         &self.lexer
///     }
///
///     fn make(
///         &self,
///         node: NodeRef<'_, '_, Self>,
///         args: &Arguments,
///         linker: &mut Linker<Piece>,
///     ) -> Result<(), Error> {
///         match node.kind() {
///             Kind::Text => linker.append(Piece::Text(node.text().into())),
///             Kind::Var => linker.append(Piece::Value(args.get(node.content()).map(Into::into))),
///             _ => linker.append(node.processed_data().into()),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Grammar: Sized {
    /// The grammar's node kinds.
    type Kind: NodeKind;

    /// Entries appended to the linker during compilation.
    type Item: From<ProcessedData<Self::Kind>>;

    /// The grammar's tag registry.
    fn lexer(&self) -> &Lexer<Self::Kind>;

    /// Child-kind constraints given to each new node of `kind`.
    ///
    /// Returning `Some` makes the node strict; see [`Constraints`].
    fn constraints(&self, kind: Self::Kind) -> Option<Constraints<Self::Kind>> {
        let _ = kind;
        None
    }

    /// Checks whether `node` may be emitted at all.
    ///
    /// `Ok(false)` fails compilation with [`Error::NotAllowed`]. The default
    /// runs the node's strict constraints, which report their own errors.
    fn is_allowed(&self, node: NodeRef<'_, '_, Self>) -> Result<bool, Error> {
        node.check_constraints().map(|()| true)
    }

    /// Emits `node` into the linker scope matching its depth.
    fn make(
        &self,
        node: NodeRef<'_, '_, Self>,
        args: &Arguments,
        linker: &mut Linker<Self::Item>,
    ) -> Result<(), Error> {
        let _ = args;
        linker.append(node.processed_data().into());
        Ok(())
    }
}
