use crate::Linker;

/// The grammar-specific assembly step run over a compiled [`Linker`] tree.
///
/// Compilation only accumulates; what the accumulated entries mean (a
/// string, an AST, bytecode) is decided here.
///
/// # Example
///
/// ```ignore
/// struct Concat;
///
/// impl Link<String> for Concat {
///     type Output = String;
///     type Error = core::convert::Infallible;
///
///     fn link(&self, linker: &Linker<String>) -> Result<String, Self::Error> {
///         Ok(linker.flatten().into_iter().cloned().collect())
///     }
/// }
/// ```
pub trait Link<T> {
    /// The final artifact.
    type Output;
    /// Failure of the assembly step.
    type Error;

    /// Assemble `linker` into the final artifact.
    fn link(&self, linker: &Linker<T>) -> Result<Self::Output, Self::Error>;
}
