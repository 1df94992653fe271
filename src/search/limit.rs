//! Result-count ceiling over a lazy stream.

/// Accumulates items from a lazy producer up to a fixed cap. The driving loop
/// stops pulling the stream the moment [`ResultLimiter::push`] reports the
/// accumulator is full; the stream itself is dropped, not drained.
///
/// The cap bounds the number of files, not the matches within a file (that is
/// enforced by the engine invocation).
#[derive(Debug)]
pub struct ResultLimiter<T> {
    max: usize,
    items: Vec<T>,
}

impl<T> ResultLimiter<T> {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            items: Vec::new(),
        }
    }

    /// Append an item; returns `true` once the cap has been reached.
    pub fn push(&mut self, item: T) -> bool {
        self.items.push(item);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}
