//! Suppression of change handling while the field edits its own buffer.

use std::cell::Cell;
use std::rc::Rc;

/// Tracks whether incoming edits should run through the chip pipeline.
///
/// Mutations the field makes itself (chipifying, restoring chips, fixing
/// text) are wrapped in an [`UnwatchedChange`] so they are not handled a
/// second time as user edits.
#[derive(Debug, Clone, Default)]
pub struct ChangeWatcher {
    suppressed: Rc<Cell<bool>>,
}

impl ChangeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self) -> bool {
        !self.suppressed.get()
    }

    /// Stop handling edits until the returned guard is dropped
    pub fn unwatched(&self) -> UnwatchedChange {
        let previous = self.suppressed.replace(true);
        UnwatchedChange {
            suppressed: Rc::clone(&self.suppressed),
            previous,
        }
    }
}

/// Scope guard returned by [`ChangeWatcher::unwatched`].
///
/// Restores the previous state on drop, so nested scopes and early returns
/// (including unwinding) leave the watcher as they found it.
#[must_use = "edits are only unwatched while the guard is alive"]
#[derive(Debug)]
pub struct UnwatchedChange {
    suppressed: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for UnwatchedChange {
    fn drop(&mut self) {
        self.suppressed.set(self.previous);
    }
}
