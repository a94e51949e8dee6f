//! Result of checking membership in a possibly-large remote collection.

use serde::{Deserialize, Serialize};

/// Outcome of a cursor-following scan over a remote collection (a following
/// list, a cast's reactions, a user timeline).
///
/// `Inconclusive` is deliberately distinct from `NotFound`: hitting the scan
/// cap with pages still remaining means the action may exist beyond the
/// window, and callers must not report that as "the user didn't do it".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    /// The claimed item was found within the scanned window.
    Confirmed,
    /// The collection was fully scanned and the item is not in it.
    NotFound,
    /// The scan cap was reached with more pages remaining.
    Inconclusive {
        /// Number of entries examined before giving up.
        scanned: usize,
    },
}

impl ScanOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ScanOutcome::Confirmed)
    }
}

/// Bookkeeping for a capped, cursor-following scan.
///
/// Adapters feed each fetched page through [`ScanWindow::consume`]; the
/// window tracks how many entries have been examined and decides when the
/// scan terminates, so every adapter shares identical cap semantics.
#[derive(Clone, Debug)]
pub struct ScanWindow {
    cap: usize,
    scanned: usize,
}

impl ScanWindow {
    pub fn new(cap: usize) -> Self {
        Self { cap, scanned: 0 }
    }

    /// Entries examined so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Examine one page of `items` (at most the remaining allowance).
    ///
    /// Returns `Some(outcome)` when the scan is over:
    /// - a matching item inside the window → `Confirmed`;
    /// - allowance exhausted with entries or pages remaining → `Inconclusive`;
    /// - no further page (`next_cursor` is `None`) → `NotFound`.
    ///
    /// Returns `None` when the caller should fetch the next page.
    pub fn consume<T>(
        &mut self,
        items: &[T],
        matches: impl Fn(&T) -> bool,
        next_cursor: Option<&str>,
    ) -> Option<ScanOutcome> {
        let allowance = self.cap.saturating_sub(self.scanned);
        let examined = items.len().min(allowance);

        if items.iter().take(examined).any(matches) {
            return Some(ScanOutcome::Confirmed);
        }
        self.scanned += examined;

        let truncated_page = examined < items.len();
        let more_pages = next_cursor.is_some_and(|c| !c.is_empty());
        if self.scanned >= self.cap && (truncated_page || more_pages) {
            return Some(ScanOutcome::Inconclusive {
                scanned: self.scanned,
            });
        }
        if !more_pages {
            return Some(ScanOutcome::NotFound);
        }
        None
    }
}
