//! Skip/max sliding window shared by every paged listing.
//!
//! A window is fed one eligible entry at a time. The first `skip` entries
//! are skipped, the next `max` are taken, and any entry after that only
//! flips `has_more_items`. Every admitted entry counts towards
//! `num_items`, so the total reflects all eligible entries visited rather
//! than the page size.

/// Outcome of offering one eligible entry to a [`PageWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Entry falls before the window.
    Skip,
    /// Entry belongs to the page.
    Take,
    /// Entry falls after a full window.
    Overflow,
}

#[derive(Clone, Debug)]
pub struct PageWindow {
    skip_remaining: usize,
    max: usize,
    taken: usize,
    visited: usize,
    has_more: bool,
}

impl PageWindow {
    /// Build a window from client-supplied paging arguments.
    ///
    /// A negative skip is treated as zero. An absent or negative max means
    /// "unbounded".
    pub fn new(max_items: Option<i64>, skip_count: Option<i64>) -> Self {
        let skip = skip_count
            .filter(|s| *s > 0)
            .map_or(0, |s| usize::try_from(s).unwrap_or(usize::MAX));
        let max = match max_items {
            Some(m) if m >= 0 => usize::try_from(m).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };
        Self {
            skip_remaining: skip,
            max,
            taken: 0,
            visited: 0,
            has_more: false,
        }
    }

    /// A window that takes everything.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Offer the next eligible entry.
    pub fn admit(&mut self) -> Admission {
        self.visited += 1;
        if self.skip_remaining > 0 {
            self.skip_remaining -= 1;
            return Admission::Skip;
        }
        if self.taken >= self.max {
            self.has_more = true;
            return Admission::Overflow;
        }
        self.taken += 1;
        Admission::Take
    }

    /// Run `items` through the window, keeping only the page.
    pub fn collect<I: IntoIterator>(&mut self, items: I) -> Vec<I::Item> {
        items
            .into_iter()
            .filter(|_| self.admit() == Admission::Take)
            .collect()
    }

    /// Whether eligible entries exist beyond the page.
    pub fn has_more_items(&self) -> bool {
        self.has_more
    }

    /// Total eligible entries offered so far.
    pub fn num_items(&self) -> usize {
        self.visited
    }

    /// Entries taken into the page so far.
    pub fn taken(&self) -> usize {
        self.taken
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
