use std::sync::atomic::{AtomicUsize, Ordering};

/// Opaque viewport position captured before a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollToken(pub usize);

/// A scrollable view whose position survives a post-mutation refresh.
pub trait ScrollAnchor: Send + Sync {
    fn capture(&self) -> ScrollToken;
    fn restore(&self, token: ScrollToken);
}

/// For views that do not scroll (plain terminal output).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScroll;

impl ScrollAnchor for NoScroll {
    fn capture(&self) -> ScrollToken {
        ScrollToken::default()
    }

    fn restore(&self, _token: ScrollToken) {}
}

/// A row offset, e.g. the first visible row of a pager.
#[derive(Debug, Default)]
pub struct ScrollOffset {
    offset: AtomicUsize,
    restores: AtomicUsize,
}

impl ScrollOffset {
    pub fn new(offset: usize) -> Self {
        Self {
            offset: AtomicUsize::new(offset),
            restores: AtomicUsize::new(0),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset.load(Ordering::SeqCst)
    }

    pub fn set(&self, offset: usize) {
        self.offset.store(offset, Ordering::SeqCst);
    }

    /// How many times a token has been restored.
    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

impl ScrollAnchor for ScrollOffset {
    fn capture(&self) -> ScrollToken {
        ScrollToken(self.offset())
    }

    fn restore(&self, token: ScrollToken) {
        self.set(token.0);
        self.restores.fetch_add(1, Ordering::SeqCst);
    }
}
