use std::fmt;
use std::rc::Rc;

use glance_gestures::gesture_constants::LONG_PRESS_DELAY_MILLIS;
use glance_gestures::{GestureCapabilities, GestureConfig};

use crate::{ImageSource, IndexCommitMode, ViewerDiagnostic};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationType {
    None,
    Slide,
    #[default]
    Fade,
}

/// How the host presents the viewer surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationStyle {
    #[default]
    FullScreen,
    PageSheet,
    FormSheet,
    /// Presented over the current content with a transparent backdrop.
    OverFullScreen,
}

impl PresentationStyle {
    pub fn is_transparent(&self) -> bool {
        matches!(self, PresentationStyle::OverFullScreen)
    }
}

/// Durations of the viewer's own animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerTimings {
    pub close_fade_millis: u64,
    pub bars_animation_millis: u64,
    /// Delay before re-centring the pager after a viewport change.
    pub orientation_settle_millis: u64,
}

impl Default for ViewerTimings {
    fn default() -> Self {
        Self {
            close_fade_millis: 100,
            bars_animation_millis: 200,
            orientation_settle_millis: 100,
        }
    }
}

pub type KeyExtractor = Rc<dyn Fn(&ImageSource, usize) -> String>;

/// Construction input of an [`ImageViewer`](crate::ImageViewer).
#[derive(Clone)]
pub struct ViewerProps {
    pub images: Vec<ImageSource>,
    pub image_index: usize,
    pub visible: bool,
    pub on_request_close: Rc<dyn Fn()>,
    pub on_image_index_change: Option<Rc<dyn Fn(usize)>>,
    pub on_long_press: Option<Rc<dyn Fn(&ImageSource)>>,
    pub on_diagnostic: Option<Rc<dyn Fn(&ViewerDiagnostic)>>,
    pub swipe_to_close_enabled: bool,
    pub double_tap_to_zoom_enabled: bool,
    pub delay_long_press: u64,
    pub background_color: String,
    pub animation_type: AnimationType,
    pub presentation_style: PresentationStyle,
    pub key_extractor: Option<KeyExtractor>,
    pub index_commit_mode: IndexCommitMode,
    pub capabilities: GestureCapabilities,
    /// Overrides the preset chosen from `capabilities`.
    pub gesture_config: Option<GestureConfig>,
    pub timings: ViewerTimings,
}

impl ViewerProps {
    pub fn new(images: Vec<ImageSource>, on_request_close: impl Fn() + 'static) -> Self {
        Self {
            images,
            image_index: 0,
            visible: true,
            on_request_close: Rc::new(on_request_close),
            on_image_index_change: None,
            on_long_press: None,
            on_diagnostic: None,
            swipe_to_close_enabled: true,
            double_tap_to_zoom_enabled: true,
            delay_long_press: LONG_PRESS_DELAY_MILLIS,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            animation_type: AnimationType::default(),
            presentation_style: PresentationStyle::default(),
            key_extractor: None,
            index_commit_mode: IndexCommitMode::default(),
            capabilities: GestureCapabilities::default(),
            gesture_config: None,
            timings: ViewerTimings::default(),
        }
    }

    pub fn image_index(mut self, index: usize) -> Self {
        self.image_index = index;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn on_image_index_change(mut self, callback: impl Fn(usize) + 'static) -> Self {
        self.on_image_index_change = Some(Rc::new(callback));
        self
    }

    pub fn on_long_press(mut self, callback: impl Fn(&ImageSource) + 'static) -> Self {
        self.on_long_press = Some(Rc::new(callback));
        self
    }

    pub fn on_diagnostic(mut self, callback: impl Fn(&ViewerDiagnostic) + 'static) -> Self {
        self.on_diagnostic = Some(Rc::new(callback));
        self
    }

    pub fn swipe_to_close_enabled(mut self, enabled: bool) -> Self {
        self.swipe_to_close_enabled = enabled;
        self
    }

    pub fn double_tap_to_zoom_enabled(mut self, enabled: bool) -> Self {
        self.double_tap_to_zoom_enabled = enabled;
        self
    }

    pub fn delay_long_press(mut self, delay_millis: u64) -> Self {
        self.delay_long_press = delay_millis;
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn animation_type(mut self, animation_type: AnimationType) -> Self {
        self.animation_type = animation_type;
        self
    }

    pub fn presentation_style(mut self, style: PresentationStyle) -> Self {
        self.presentation_style = style;
        self
    }

    pub fn key_extractor(mut self, extractor: impl Fn(&ImageSource, usize) -> String + 'static) -> Self {
        self.key_extractor = Some(Rc::new(extractor));
        self
    }

    pub fn index_commit_mode(mut self, mode: IndexCommitMode) -> Self {
        self.index_commit_mode = mode;
        self
    }

    pub fn capabilities(mut self, capabilities: GestureCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn gesture_config(mut self, config: GestureConfig) -> Self {
        self.gesture_config = Some(config);
        self
    }

    pub fn timings(mut self, timings: ViewerTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Gesture configuration handed to every page, with the viewer-level
    /// switches applied on top.
    pub fn page_gesture_config(&self) -> GestureConfig {
        self.gesture_config
            .clone()
            .unwrap_or_else(|| GestureConfig::for_capabilities(self.capabilities))
            .with_swipe_to_close(self.swipe_to_close_enabled)
            .with_double_tap_to_zoom(self.double_tap_to_zoom_enabled)
            .with_long_press_delay(self.delay_long_press)
    }
}

impl fmt::Debug for ViewerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerProps")
            .field("images", &self.images.len())
            .field("image_index", &self.image_index)
            .field("visible", &self.visible)
            .field("animation_type", &self.animation_type)
            .field("presentation_style", &self.presentation_style)
            .field("index_commit_mode", &self.index_commit_mode)
            .finish_non_exhaustive()
    }
}
