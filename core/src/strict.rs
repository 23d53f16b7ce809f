//! Declarative child-kind constraints for strict nodes.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Error, Grammar, NodeKind, NodeRef};

/// Which kinds may and must appear below a strict node.
///
/// A descendant is allowed when its kind is, or extends, some kind marked
/// allowed. The base kind starts out allowed, so a fresh set accepts
/// everything; to accept only `A`, disallow the base kind and allow `A`.
/// Disallowing a kind only takes it off the allow-list, it never rejects
/// kinds extending another allowed kind.
///
/// ```ignore
/// let only_text_and_vars = Constraints::new()
///     .with_disallowed(Kind::Node)
///     .with_allowed(Kind::Text)
///     .with_mandatory(Kind::Var);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints<K> {
    allowed: BTreeMap<K, bool>,
    mandatory: BTreeSet<K>,
}

impl<K: NodeKind> Default for Constraints<K> {
    fn default() -> Self {
        Self {
            allowed: K::BASE.map(|base| (base, true)).into_iter().collect(),
            mandatory: BTreeSet::new(),
        }
    }
}

impl<K: NodeKind> Constraints<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_node_class(&mut self, kind: K) -> &mut Self {
        self.allowed.insert(kind, true);
        self
    }

    /// Takes `kind` off the allow-list; it stops being mandatory as well.
    pub fn disallow_node_class(&mut self, kind: K) -> &mut Self {
        self.allowed.insert(kind, false);
        self.mandatory.remove(&kind);
        self
    }

    /// Requires at least one descendant of `kind`, allowing it first.
    pub fn node_class_is_mandatory(&mut self, kind: K) -> &mut Self {
        self.allow_node_class(kind);
        self.mandatory.insert(kind);
        self
    }

    /// Drops the requirement, keeping `kind` allowed.
    pub fn node_class_is_optional(&mut self, kind: K) -> &mut Self {
        self.mandatory.remove(&kind);
        self
    }

    pub fn allow_node_class_named(&mut self, name: &str) -> Result<&mut Self, Error> {
        Ok(self.allow_node_class(K::resolve(name)?))
    }

    pub fn disallow_node_class_named(&mut self, name: &str) -> Result<&mut Self, Error> {
        Ok(self.disallow_node_class(K::resolve(name)?))
    }

    pub fn node_class_is_mandatory_named(&mut self, name: &str) -> Result<&mut Self, Error> {
        Ok(self.node_class_is_mandatory(K::resolve(name)?))
    }

    pub fn node_class_is_optional_named(&mut self, name: &str) -> Result<&mut Self, Error> {
        Ok(self.node_class_is_optional(K::resolve(name)?))
    }

    pub fn with_allowed(mut self, kind: K) -> Self {
        self.allow_node_class(kind);
        self
    }

    pub fn with_disallowed(mut self, kind: K) -> Self {
        self.disallow_node_class(kind);
        self
    }

    pub fn with_mandatory(mut self, kind: K) -> Self {
        self.node_class_is_mandatory(kind);
        self
    }

    pub fn with_optional(mut self, kind: K) -> Self {
        self.node_class_is_optional(kind);
        self
    }

    pub fn allows(&self, kind: K) -> bool {
        self.allowed
            .iter()
            .any(|(&allowed, &on)| on && kind.is_a(allowed))
    }

    pub fn is_mandatory(&self, kind: K) -> bool {
        self.mandatory.contains(&kind)
    }

    pub fn allowed(&self) -> impl Iterator<Item = K> + '_ {
        self.allowed
            .iter()
            .filter_map(|(&kind, &on)| on.then_some(kind))
    }

    pub fn mandatory(&self) -> impl Iterator<Item = K> + '_ {
        self.mandatory.iter().copied()
    }

    /// Validates the descendants of `node` in pre-order.
    ///
    /// Fails with [`Error::DisallowedChild`] on the first descendant whose
    /// kind is not allowed. Each descendant satisfies at most one mandatory
    /// kind, and the walk stops with success once all of them are met, so
    /// descendants after that point are not checked. Without mandatory kinds
    /// every descendant is checked. A walk that ends with
    /// kinds still unmet fails with [`Error::MissingMandatoryChild`].
    pub fn check<G>(&self, node: NodeRef<'_, '_, G>) -> Result<(), Error>
    where
        G: Grammar<Kind = K>,
    {
        let mut unmet = self.mandatory.clone();
        for child in node.descendants() {
            let kind = child.kind();
            if !self.allows(kind) {
                return Err(Error::DisallowedChild {
                    child: child.info(),
                    container: node.info(),
                });
            }
            if let Some(&met) = unmet.iter().find(|&&required| kind.is_a(required)) {
                unmet.remove(&met);
            }
            if !self.mandatory.is_empty() && unmet.is_empty() {
                return Ok(());
            }
        }
        if unmet.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingMandatoryChild {
                node: node.info(),
                missing: unmet.into_iter().map(K::name).collect(),
            })
        }
    }
}
