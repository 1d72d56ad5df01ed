//! Pager double that records every request.

use std::cell::{Cell, RefCell};

use glance_viewer::{PagerError, PagerHost};

/// [`PagerHost`] that logs calls and can be told to reject scrolls.
#[derive(Debug, Default)]
pub struct RecordingPager {
    scrolls: RefCell<Vec<(usize, bool)>>,
    scroll_enabled: RefCell<Vec<bool>>,
    failure: Cell<Option<PagerError>>,
}

impl RecordingPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `scroll_to_index` fail with `error`.
    pub fn fail_with(&self, error: PagerError) {
        self.failure.set(Some(error));
    }

    pub fn recover(&self) {
        self.failure.set(None);
    }

    /// Successful `(index, animated)` scroll requests, oldest first.
    pub fn scrolls(&self) -> Vec<(usize, bool)> {
        self.scrolls.borrow().clone()
    }

    pub fn last_scroll(&self) -> Option<(usize, bool)> {
        self.scrolls.borrow().last().copied()
    }

    /// Every value passed to `set_scroll_enabled`, oldest first.
    pub fn scroll_enabled_calls(&self) -> Vec<bool> {
        self.scroll_enabled.borrow().clone()
    }

    /// Paging state as last set by the viewer; enabled until told otherwise.
    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled.borrow().last().copied().unwrap_or(true)
    }
}

impl PagerHost for RecordingPager {
    fn scroll_to_index(&self, index: usize, animated: bool) -> Result<(), PagerError> {
        if let Some(error) = self.failure.get() {
            log::debug!("recording pager rejects scroll to {index}");
            return Err(error);
        }
        self.scrolls.borrow_mut().push((index, animated));
        Ok(())
    }

    fn set_scroll_enabled(&self, enabled: bool) {
        self.scroll_enabled.borrow_mut().push(enabled);
    }
}
