//! Cyclic step patterns

/// A fixed-length table of step entries that repeats forever
///
/// Entry `i` is played on every step `s` with `s mod len == i`.
#[derive(Debug, Clone)]
pub struct Pattern<T> {
    entries: Vec<T>,
}

impl<T> Pattern<T> {
    /// Build a pattern; an empty table is a programming error
    pub fn new(entries: Vec<T>) -> Self {
        assert!(!entries.is_empty(), "pattern must have at least one step");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index into the table for step `step`
    pub fn index(&self, step: u64) -> usize {
        (step % self.entries.len() as u64) as usize
    }

    /// Entry played on step `step`
    pub fn at(&self, step: u64) -> &T {
        &self.entries[self.index(step)]
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

impl<T> From<Vec<T>> for Pattern<T> {
    fn from(entries: Vec<T>) -> Self {
        Self::new(entries)
    }
}
