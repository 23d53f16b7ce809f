//! Hierarchical, append-only output accumulators.

use log::trace;

/// One position in a [`Linker`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<T> {
    Item(T),
    Child(Linker<T>),
}

/// A sequence of emitted items and nested child sequences.
///
/// Compilation appends each node to the linker scope matching its depth, so
/// the shape of a compiled linker mirrors the node tree. What the entries
/// mean is decided by a [`Link`](crate::Link) implementation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linker<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Linker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Linker<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, item: T) -> &mut Self {
        self.entries.push(Entry::Item(item));
        self
    }

    pub fn append_child(&mut self, child: Linker<T>) -> &mut Self {
        self.entries.push(Entry::Child(child));
        self
    }

    /// Fills a fresh child linker with `build`, then appends it.
    pub fn with_child(&mut self, build: impl FnOnce(&mut Linker<T>)) -> &mut Self {
        let mut child = Linker::new();
        build(&mut child);
        self.append_child(child)
    }

    /// Replaces the last entry with `item`, appending when empty.
    pub fn set_last(&mut self, item: T) -> &mut Self {
        match self.entries.last_mut() {
            Some(last) => *last = Entry::Item(item),
            None => {
                self.entries.push(Entry::Item(item));
            }
        }
        self
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn last_mut(&mut self) -> Option<&mut Entry<T>> {
        self.entries.last_mut()
    }

    pub fn into_entries(self) -> Vec<Entry<T>> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct items, skipping child linkers.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Item(item) => Some(item),
            Entry::Child(_) => None,
        })
    }

    /// Direct child linkers.
    pub fn children(&self) -> impl Iterator<Item = &Linker<T>> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Child(child) => Some(child),
            Entry::Item(_) => None,
        })
    }

    /// Every item in document order, with the nesting depth of the linker
    /// holding it.
    pub fn walk(&self) -> Walk<'_, T> {
        Walk {
            stack: vec![self.entries.as_slice()],
        }
    }

    /// Every item in document order.
    pub fn flatten(&self) -> Vec<&T> {
        self.walk().map(|(_, item)| item).collect()
    }

    /// How many levels of child linkers lie below this one.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((linker, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(linker.children().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

/// Iterator returned by [`Linker::walk`].
#[derive(Debug)]
pub struct Walk<'l, T> {
    stack: Vec<&'l [Entry<T>]>,
}

impl<'l, T> Iterator for Walk<'l, T> {
    type Item = (usize, &'l T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let entries = self.stack.pop()?;
            let Some((first, rest)) = entries.split_first() else {
                continue;
            };
            self.stack.push(rest);
            match first {
                Entry::Item(item) => return Some((depth, item)),
                Entry::Child(child) => self.stack.push(child.entries()),
            }
        }
    }
}

/// The stack of open linker scopes during one compilation.
///
/// Entering a scope opens a fresh child linker; leaving attaches it to the
/// scope below. Nothing is appended to a scope while a child of it is open,
/// so attaching on leave keeps document order.
#[derive(Debug)]
pub(crate) struct Scopes<T> {
    root: Linker<T>,
    open: Vec<Linker<T>>,
}

impl<T> Scopes<T> {
    pub(crate) fn new(root: Linker<T>) -> Self {
        Self {
            root,
            open: Vec::new(),
        }
    }

    pub(crate) fn current(&mut self) -> &mut Linker<T> {
        match self.open.last_mut() {
            Some(scope) => scope,
            None => &mut self.root,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn enter(&mut self) {
        self.open.push(Linker::new());
        trace!("entered linker scope {}", self.depth());
    }

    pub(crate) fn leave(&mut self) {
        if let Some(scope) = self.open.pop() {
            trace!("left linker scope {}", self.depth() + 1);
            self.current().append_child(scope);
        }
    }

    /// Closes every open scope and returns the root.
    pub(crate) fn finish(mut self) -> Linker<T> {
        while !self.open.is_empty() {
            self.leave();
        }
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Linker<&'static str> {
        let mut root = Linker::new();
        root.append("a")
            .with_child(|child| {
                child.append("b").with_child(|child| {
                    child.append("c");
                });
            })
            .append("d");
        root
    }

    #[test]
    fn test_walk_reports_depth() {
        let root = sample();
        let walked: Vec<_> = root.walk().collect();
        assert_eq!(walked, [(0, &"a"), (1, &"b"), (2, &"c"), (0, &"d")]);
        assert_eq!(root.flatten(), [&"a", &"b", &"c", &"d"]);
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_items_and_children() {
        let root = sample();
        assert_eq!(root.len(), 3);
        assert_eq!(root.items().collect::<Vec<_>>(), [&"a", &"d"]);
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    fn test_set_last() {
        let mut linker = Linker::new();
        linker.set_last("x");
        assert_eq!(linker.entries(), &[Entry::Item("x")]);
        linker.append("y").set_last("z");
        assert_eq!(linker.entries(), &[Entry::Item("x"), Entry::Item("z")]);
    }

    #[test]
    fn test_append_existing_child() {
        let mut child = Linker::new();
        child.append(1);
        let mut root = Linker::new();
        root.append_child(child).append(2);
        assert_eq!(root.flatten(), [&1, &2]);
        assert!(matches!(&root.entries()[0], Entry::Child(child) if child.len() == 1));
    }

    #[test]
    fn test_with_child_appends_after_items() {
        let mut root = Linker::new();
        root.append(1).with_child(|_| {}).append(2);
        assert_eq!(root.len(), 3);
        assert_eq!(root.entries()[1], Entry::Child(Linker::new()));
        assert_eq!(root.flatten(), [&1, &2]);
    }

    #[test]
    fn test_scopes_attach_in_order() {
        let mut scopes = Scopes::new(Linker::new());
        scopes.current().append("a");
        scopes.enter();
        scopes.current().append("b");
        scopes.enter();
        scopes.current().append("c");
        assert_eq!(scopes.depth(), 2);
        scopes.leave();
        scopes.current().append("d");
        let root = scopes.finish();
        let walked: Vec<_> = root.walk().collect();
        assert_eq!(walked, [(0, &"a"), (1, &"b"), (2, &"c"), (1, &"d")]);
    }
}
