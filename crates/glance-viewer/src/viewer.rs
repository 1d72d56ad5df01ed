use std::cell::RefCell;
use std::rc::Rc;

use glance_animation::{Animatable, AnimationSpec};
use glance_geometry::{Size, Viewport};
use glance_gestures::{GestureConfig, TouchEvent};
use glance_runtime::{MutableState, RuntimeHandle, State, TimerRegistration};
use rustc_hash::FxHashSet;

use crate::{
    index_for_offset, Bars, ImagePage, ImageSizeCache, ImageSource, IndexCommitMode, PageEvents,
    PagerHost, ViewerDiagnostic, ViewerProps,
};

/// Lifecycle of the viewer surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerPhase {
    Closed,
    /// Visible, waiting for the host to finish presenting.
    Opening,
    Open,
    /// Fading out before `on_request_close` runs.
    Closing,
}

impl ViewerPhase {
    pub fn is_visible(&self) -> bool {
        !matches!(self, ViewerPhase::Closed)
    }
}

/// What header and footer components render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayState {
    pub image_index: usize,
    pub visible: bool,
    pub header_offset: f32,
    pub footer_offset: f32,
}

struct ViewerInner {
    props: ViewerProps,
    runtime: RuntimeHandle,
    config: GestureConfig,
    phase: MutableState<ViewerPhase>,
    current_index: MutableState<usize>,
    announced_index: Option<usize>,
    pages: Vec<ImagePage>,
    zoomed_pages: FxHashSet<usize>,
    paging_enabled: bool,
    pager: Option<Rc<dyn PagerHost>>,
    bars: Bars,
    opacity: Animatable<f32>,
    viewport: Viewport,
    sizes: ImageSizeCache,
    recentre: Option<TimerRegistration>,
}

/// Full-screen gallery. Cloning yields another handle to the same viewer.
///
/// No borrow of the viewer is held while pages, the pager or host callbacks
/// run, so all of them may call back into the viewer.
#[derive(Clone)]
pub struct ImageViewer {
    inner: Rc<RefCell<ViewerInner>>,
}

impl ImageViewer {
    pub fn new(props: ViewerProps, viewport: Viewport, runtime: RuntimeHandle) -> Self {
        let index = clamp_index(props.image_index, props.images.len());
        if index != props.image_index {
            log::warn!(
                "initial index {} out of range for {} images",
                props.image_index,
                props.images.len()
            );
        }
        let config = props.page_gesture_config();
        let visible = props.visible;
        let inner = ViewerInner {
            bars: Bars::new(runtime.clone(), props.timings.bars_animation_millis),
            opacity: Animatable::new(0.0, runtime.clone()),
            props,
            runtime,
            config,
            phase: MutableState::new(ViewerPhase::Closed),
            current_index: MutableState::new(index),
            announced_index: None,
            pages: Vec::new(),
            zoomed_pages: FxHashSet::default(),
            paging_enabled: true,
            pager: None,
            viewport,
            sizes: ImageSizeCache::default(),
            recentre: None,
        };
        let viewer = Self {
            inner: Rc::new(RefCell::new(inner)),
        };
        viewer.rebuild_pages();
        if visible {
            viewer.open();
        }
        viewer
    }

    /// Connects the horizontal pager and brings it in line with the viewer.
    pub fn attach_pager(&self, pager: Rc<dyn PagerHost>) {
        let (enabled, index, visible) = {
            let mut inner = self.inner.borrow_mut();
            inner.pager = Some(pager.clone());
            (
                inner.paging_enabled,
                inner.current_index.get(),
                inner.phase.get().is_visible(),
            )
        };
        pager.set_scroll_enabled(enabled);
        if visible {
            self.scroll_pager(index, false);
        }
    }

    pub fn detach_pager(&self) {
        self.inner.borrow_mut().pager = None;
    }

    pub fn phase(&self) -> ViewerPhase {
        self.inner.borrow().phase.get()
    }

    pub fn phase_state(&self) -> State<ViewerPhase> {
        self.inner.borrow().phase.as_state()
    }

    pub fn current_index(&self) -> usize {
        self.inner.borrow().current_index.get()
    }

    pub fn current_index_state(&self) -> State<usize> {
        self.inner.borrow().current_index.as_state()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn page(&self, index: usize) -> Option<ImagePage> {
        self.inner.borrow().pages.get(index).cloned()
    }

    pub fn current_page(&self) -> Option<ImagePage> {
        self.page(self.current_index())
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.inner.borrow().paging_enabled
    }

    pub fn bars(&self) -> Bars {
        self.inner.borrow().bars.clone()
    }

    pub fn opacity(&self) -> f32 {
        self.inner.borrow().opacity.value()
    }

    pub fn opacity_state(&self) -> State<f32> {
        self.inner.borrow().opacity.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    pub fn background_color(&self) -> String {
        self.inner.borrow().props.background_color.clone()
    }

    /// Whether the host should present over its content with a clear backdrop.
    pub fn is_transparent(&self) -> bool {
        self.inner.borrow().props.presentation_style.is_transparent()
    }

    pub fn overlay_state(&self) -> OverlayState {
        let inner = self.inner.borrow();
        OverlayState {
            image_index: inner.current_index.get(),
            visible: inner.bars.is_visible(),
            header_offset: inner.bars.header_offset(),
            footer_offset: inner.bars.footer_offset(),
        }
    }

    /// Stable list key for the page at `index`.
    pub fn key_for(&self, index: usize) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .props
            .images
            .get(index)
            .map(|source| key_of(&inner.props, source, index))
    }

    pub fn open(&self) {
        let (phase, opacity, bars, index) = {
            let mut inner = self.inner.borrow_mut();
            inner.props.visible = true;
            if inner.phase.get() != ViewerPhase::Closed {
                return;
            }
            (
                inner.phase.clone(),
                inner.opacity.clone(),
                inner.bars.clone(),
                inner.current_index.get(),
            )
        };
        log::debug!("opening viewer at index {index}");
        phase.set(ViewerPhase::Opening);
        opacity.snap_to(1.0);
        bars.snap_visible(true);
        self.inner.borrow_mut().announced_index = None;
        if !self.is_empty() {
            self.commit_index(index);
        }
    }

    /// The host finished presenting the surface.
    pub fn on_presented(&self) {
        let (phase, index) = {
            let inner = self.inner.borrow();
            (inner.phase.clone(), inner.current_index.get())
        };
        if phase.get() != ViewerPhase::Opening {
            return;
        }
        phase.set(ViewerPhase::Open);
        self.scroll_pager(index, false);
    }

    /// Host-driven visibility. Hiding skips the fade and `on_request_close`.
    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.open();
            return;
        }
        let (phase, opacity) = {
            let mut inner = self.inner.borrow_mut();
            inner.props.visible = false;
            (inner.phase.clone(), inner.opacity.clone())
        };
        if phase.get() == ViewerPhase::Closed {
            return;
        }
        opacity.snap_to(0.0);
        phase.set(ViewerPhase::Closed);
        self.reset_pages();
    }

    /// Fades the viewer out and then calls `on_request_close` exactly once.
    pub fn request_close(&self) {
        let (phase, opacity, fade_millis) = {
            let inner = self.inner.borrow();
            (
                inner.phase.clone(),
                inner.opacity.clone(),
                inner.props.timings.close_fade_millis,
            )
        };
        match phase.get() {
            ViewerPhase::Opening | ViewerPhase::Open => {}
            ViewerPhase::Closing | ViewerPhase::Closed => {
                log::debug!("ignoring close request while {:?}", phase.get());
                return;
            }
        }
        phase.set(ViewerPhase::Closing);
        let weak = Rc::downgrade(&self.inner);
        opacity.animate_to_then(0.0, AnimationSpec::linear(fade_millis), move || {
            if let Some(inner) = weak.upgrade() {
                ImageViewer { inner }.finish_close();
            }
        });
    }

    /// Back button or gesture.
    pub fn on_back(&self) {
        self.request_close();
    }

    fn finish_close(&self) {
        let (phase, on_request_close) = {
            let inner = self.inner.borrow();
            (inner.phase.clone(), inner.props.on_request_close.clone())
        };
        if phase.get() != ViewerPhase::Closing {
            return;
        }
        phase.set(ViewerPhase::Closed);
        self.reset_pages();
        log::debug!("viewer closed");
        on_request_close();
    }

    /// Routes a touch to the current page while the viewer is visible.
    pub fn on_touch(&self, event: &TouchEvent) {
        if !self.phase().is_visible() {
            return;
        }
        if let Some(page) = self.current_page() {
            page.on_touch(event);
        }
    }

    /// Horizontal pager position.
    pub fn on_pager_scroll(&self, offset_x: f32) {
        let (mode, index) = self.index_at(offset_x);
        match (mode, index) {
            (IndexCommitMode::Continuous, Some(index)) => self.move_to(index),
            _ => log::trace!("pager scrolled to {offset_x}"),
        }
    }

    /// Pager momentum settled at `offset_x`.
    pub fn on_pager_momentum_end(&self, offset_x: f32) {
        if let (_, Some(index)) = self.index_at(offset_x) {
            self.move_to(index);
        }
    }

    /// Moves to `index` on behalf of the host. Out-of-range values are clamped.
    pub fn set_image_index(&self, index: usize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let clamped = clamp_index(index, len);
        if clamped != index {
            log::warn!("set_image_index({index}) clamped to {clamped}");
        }
        if !self.phase().is_visible() {
            // Announced by `open`.
            let state = self.inner.borrow().current_index.clone();
            state.set(clamped);
            return;
        }
        let changed = clamped != self.current_index();
        self.move_to(clamped);
        if changed {
            self.scroll_pager(clamped, false);
        }
    }

    fn index_at(&self, offset_x: f32) -> (IndexCommitMode, Option<usize>) {
        let inner = self.inner.borrow();
        (
            inner.props.index_commit_mode,
            index_for_offset(offset_x, inner.viewport.width, inner.pages.len()),
        )
    }

    fn move_to(&self, index: usize) {
        let previous = {
            let inner = self.inner.borrow();
            let current = inner.current_index.get();
            (current != index)
                .then(|| inner.pages.get(current).cloned())
                .flatten()
        };
        if let Some(page) = previous.filter(ImagePage::is_zoomed) {
            page.reset();
        }
        self.commit_index(index);
    }

    fn commit_index(&self, index: usize) {
        let (state, callback) = {
            let mut inner = self.inner.borrow_mut();
            if inner.announced_index == Some(index) && inner.current_index.get() == index {
                return;
            }
            inner.announced_index = Some(index);
            (
                inner.current_index.clone(),
                inner.props.on_image_index_change.clone(),
            )
        };
        state.set(index);
        log::debug!("image index {index}");
        if let Some(callback) = callback {
            callback(index);
        }
    }

    fn scroll_pager(&self, index: usize, animated: bool) {
        let (pager, on_diagnostic) = {
            let inner = self.inner.borrow();
            (inner.pager.clone(), inner.props.on_diagnostic.clone())
        };
        let Some(pager) = pager else {
            return;
        };
        if let Err(error) = pager.scroll_to_index(index, animated) {
            let diagnostic = ViewerDiagnostic::ScrollToIndexFailed { index, error };
            log::warn!("{diagnostic}");
            if let Some(on_diagnostic) = on_diagnostic {
                on_diagnostic(&diagnostic);
            }
        }
    }

    /// New surface size. Every page is hard-reset and the pager re-centres on
    /// the current image once the size settles.
    pub fn on_viewport_change(&self, viewport: Viewport) {
        let (pages, runtime, settle_millis) = {
            let mut inner = self.inner.borrow_mut();
            if inner.viewport == viewport {
                return;
            }
            inner.viewport = viewport;
            inner.recentre = None;
            (
                inner.pages.clone(),
                inner.runtime.clone(),
                inner.props.timings.orientation_settle_millis,
            )
        };
        log::debug!("viewport changed to {viewport:?}");
        for page in &pages {
            page.set_viewport(viewport);
        }
        let weak = Rc::downgrade(&self.inner);
        let registration = runtime.schedule_after(settle_millis, move |_| {
            if let Some(inner) = weak.upgrade() {
                ImageViewer { inner }.recentre_pager();
            }
        });
        self.inner.borrow_mut().recentre = Some(registration);
    }

    fn recentre_pager(&self) {
        let (index, visible) = {
            let mut inner = self.inner.borrow_mut();
            inner.recentre = None;
            (inner.current_index.get(), inner.phase.get().is_visible())
        };
        if visible {
            self.scroll_pager(index, false);
        }
    }

    /// Replaces the image list. Pages are rebuilt and the index clamped.
    pub fn set_images(&self, images: Vec<ImageSource>) {
        let index = {
            let mut inner = self.inner.borrow_mut();
            inner.props.images = images;
            clamp_index(inner.current_index.get(), inner.props.images.len())
        };
        self.rebuild_pages();
        self.update_paging();
        if self.is_empty() {
            return;
        }
        if self.phase().is_visible() {
            self.commit_index(index);
        } else {
            let state = self.inner.borrow().current_index.clone();
            state.set(index);
        }
    }

    pub fn on_image_size_resolved(&self, index: usize, size: Size) {
        let page = {
            let mut inner = self.inner.borrow_mut();
            let Some(source) = inner.props.images.get(index) else {
                log::debug!("size for unknown page {index}");
                return;
            };
            let key = key_of(&inner.props, source, index);
            inner.sizes.insert(key, size);
            inner.pages.get(index).cloned()
        };
        if let Some(page) = page {
            page.on_image_size_resolved(size);
        }
    }

    pub fn on_image_loaded(&self, index: usize) {
        if let Some(page) = self.page(index) {
            page.on_load_complete();
        }
    }

    /// Cached natural size for `key`, if it was resolved before.
    pub fn cached_size(&self, key: &str) -> Option<Size> {
        self.inner.borrow().sizes.get(key)
    }

    fn rebuild_pages(&self) {
        let pages = {
            let inner = self.inner.borrow();
            inner
                .props
                .images
                .iter()
                .enumerate()
                .map(|(index, source)| {
                    let key = key_of(&inner.props, source, index);
                    let page = ImagePage::new(
                        source.clone(),
                        inner.viewport,
                        inner.sizes.get(&key),
                        inner.config.clone(),
                        inner.props.capabilities,
                        inner.runtime.clone(),
                    );
                    page.set_events(self.page_events(index));
                    page
                })
                .collect::<Vec<_>>()
        };
        let mut inner = self.inner.borrow_mut();
        inner.pages = pages;
        inner.zoomed_pages.clear();
    }

    fn page_events(&self, index: usize) -> PageEvents {
        let on_zoom: Rc<dyn Fn(bool)> = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move |zoomed: bool| {
                if let Some(inner) = weak.upgrade() {
                    ImageViewer { inner }.on_page_zoom(index, zoomed);
                }
            })
        };
        let on_single_tap: Rc<dyn Fn()> = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    ImageViewer { inner }.bars().toggle();
                }
            })
        };
        let on_long_press: Rc<dyn Fn(&ImageSource)> = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move |source: &ImageSource| {
                let callback = weak
                    .upgrade()
                    .and_then(|inner| inner.borrow().props.on_long_press.clone());
                if let Some(callback) = callback {
                    callback(source);
                }
            })
        };
        let on_request_close: Rc<dyn Fn()> = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    ImageViewer { inner }.request_close();
                }
            })
        };
        PageEvents {
            on_zoom: Some(on_zoom),
            on_single_tap: Some(on_single_tap),
            on_long_press: Some(on_long_press),
            on_request_close: Some(on_request_close),
        }
    }

    fn on_page_zoom(&self, index: usize, zoomed: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if zoomed {
                inner.zoomed_pages.insert(index);
            } else {
                inner.zoomed_pages.remove(&index);
            }
        }
        log::debug!("page {index} zoomed: {zoomed}");
        self.update_paging();
    }

    /// Paging and bars are enabled exactly when no page is zoomed.
    fn update_paging(&self) {
        let (pager, bars, enabled) = {
            let mut inner = self.inner.borrow_mut();
            let enabled = inner.zoomed_pages.is_empty();
            if enabled == inner.paging_enabled {
                return;
            }
            inner.paging_enabled = enabled;
            (inner.pager.clone(), inner.bars.clone(), enabled)
        };
        if let Some(pager) = pager {
            pager.set_scroll_enabled(enabled);
        }
        bars.set_visible(enabled);
    }

    fn reset_pages(&self) {
        let pages = self.inner.borrow().pages.clone();
        for page in &pages {
            page.reset();
        }
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

fn key_of(props: &ViewerProps, source: &ImageSource, index: usize) -> String {
    match &props.key_extractor {
        Some(extractor) => extractor(source, index),
        None => source.default_key(),
    }
}

#[cfg(test)]
#[path = "tests/viewer_tests.rs"]
mod tests;
