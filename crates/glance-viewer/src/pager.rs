use crate::PagerError;

/// The horizontal paging container hosting one surface per image.
///
/// Implemented by the host. The viewer only asks it to move and to lock.
pub trait PagerHost {
    fn scroll_to_index(&self, index: usize, animated: bool) -> Result<(), PagerError>;

    /// Enables or disables user paging. Disabled while any page is zoomed.
    fn set_scroll_enabled(&self, enabled: bool);
}

/// When the viewer commits a new current index from pager scroll positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexCommitMode {
    /// Only once scroll momentum has settled.
    #[default]
    OnSettle,
    /// On every scroll position, including mid-drag.
    Continuous,
}

/// Page index for a horizontal scroll offset, rounded to the nearest page.
///
/// Returns `None` while the page width is unknown or the list is empty.
pub fn index_for_offset(offset_x: f32, page_width: f32, len: usize) -> Option<usize> {
    if len == 0 || !page_width.is_finite() || page_width <= 0.0 || !offset_x.is_finite() {
        return None;
    }
    let index = (offset_x / page_width).round().max(0.0) as usize;
    Some(index.min(len - 1))
}
