//! Full-screen image gallery viewer.
//!
//! An [`ImageViewer`] owns one [`ImagePage`] per image. Each page runs its
//! own gesture interpreter and reports zoom, tap and close signals upward;
//! the viewer reconciles them with the horizontal pager (through the
//! [`PagerHost`] seam), the header/footer bars and its open/close lifecycle.

mod bars;
mod error;
mod page;
mod pager;
mod props;
mod size_cache;
mod source;
mod viewer;

pub use bars::{Bars, BAR_HIDDEN_OFFSET};
pub use error::{PagerError, ViewerDiagnostic};
pub use page::{ImagePage, PageEvents};
pub use pager::{index_for_offset, IndexCommitMode, PagerHost};
pub use props::{
    AnimationType, KeyExtractor, PresentationStyle, ViewerProps, ViewerTimings,
    DEFAULT_BACKGROUND_COLOR,
};
pub use size_cache::{ImageSizeCache, IMAGE_SIZE_CACHE_CAPACITY};
pub use source::ImageSource;
pub use viewer::{ImageViewer, OverlayState, ViewerPhase};

pub mod prelude {
    pub use crate::{
        ImageSource, ImageViewer, IndexCommitMode, OverlayState, PagerHost, ViewerPhase,
        ViewerProps,
    };
    pub use glance_gestures::{GestureCapabilities, GestureConfig, TouchEvent, TouchPhase};
}
