use glance_animation::{Animatable, AnimationSpec, Easing};
use glance_runtime::{MutableState, RuntimeHandle, State};

/// Distance the header (upwards) and footer (downwards) slide when hidden.
pub const BAR_HIDDEN_OFFSET: f32 = 300.0;

/// Header/footer overlay visibility and their animated offsets.
#[derive(Clone)]
pub struct Bars {
    visible: MutableState<bool>,
    header_offset: Animatable<f32>,
    footer_offset: Animatable<f32>,
    animation_millis: u64,
}

impl Bars {
    pub fn new(runtime: RuntimeHandle, animation_millis: u64) -> Self {
        Self {
            visible: MutableState::new(true),
            header_offset: Animatable::new(0.0, runtime.clone()),
            footer_offset: Animatable::new(0.0, runtime),
            animation_millis,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn visible(&self) -> State<bool> {
        self.visible.as_state()
    }

    pub fn header_offset(&self) -> f32 {
        self.header_offset.value()
    }

    pub fn footer_offset(&self) -> f32 {
        self.footer_offset.value()
    }

    pub fn header_offset_state(&self) -> State<f32> {
        self.header_offset.state()
    }

    pub fn footer_offset_state(&self) -> State<f32> {
        self.footer_offset.state()
    }

    pub fn toggle(&self) {
        self.set_visible(!self.is_visible());
    }

    /// Shows or hides both bars, animating their offsets. Last write wins.
    pub fn set_visible(&self, visible: bool) {
        if !self.visible.set(visible) {
            return;
        }
        log::debug!("bars visible: {visible}");
        let spec = AnimationSpec::tween(self.animation_millis, Easing::EaseInOut);
        let (header, footer) = if visible {
            (0.0, 0.0)
        } else {
            (-BAR_HIDDEN_OFFSET, BAR_HIDDEN_OFFSET)
        };
        self.header_offset.animate_to(header, spec);
        self.footer_offset.animate_to(footer, spec);
    }

    /// Jumps to `visible` without animating.
    pub fn snap_visible(&self, visible: bool) {
        self.visible.set(visible);
        let (header, footer) = if visible {
            (0.0, 0.0)
        } else {
            (-BAR_HIDDEN_OFFSET, BAR_HIDDEN_OFFSET)
        };
        self.header_offset.snap_to(header);
        self.footer_offset.snap_to(footer);
    }
}
