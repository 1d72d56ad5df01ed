use std::rc::Rc;
use std::thread;
use std::time::Duration;

use glance_geometry::{Point, Size};
use glance_gestures::{TouchEvent, TouchPhase, TouchPoint};
use glance_runtime::{MonotonicClock, Runtime, FRAME_INTERVAL_MILLIS};
use glance_viewer::{ImageSource, ImageViewer, PagerError, PagerHost, ViewerProps};

const PHONE: Size = Size::new(390.0, 844.0);

/// Pager stand-in that prints what a real host would do.
struct ConsolePager {
    len: usize,
}

impl PagerHost for ConsolePager {
    fn scroll_to_index(&self, index: usize, animated: bool) -> Result<(), PagerError> {
        if index >= self.len {
            return Err(PagerError::IndexOutOfRange {
                requested: index,
                len: self.len,
            });
        }
        println!("  pager -> page {index} (animated: {animated})");
        Ok(())
    }

    fn set_scroll_enabled(&self, enabled: bool) {
        println!("  pager paging enabled: {enabled}");
    }
}

/// Feeds touches to the viewer at runtime time, advancing the clock between them.
struct Script<'a> {
    runtime: &'a Runtime,
    viewer: &'a ImageViewer,
}

impl Script<'_> {
    fn wait(&self, millis: u64) {
        self.runtime.advance_by(millis);
    }

    fn send(&self, phase: TouchPhase, changed: TouchPoint, touches: &[TouchPoint]) {
        let event = TouchEvent::new(
            phase,
            self.runtime.now_millis(),
            changed,
            touches.iter().copied(),
        );
        self.viewer.on_touch(&event);
    }

    fn tap(&self, at: Point) {
        let finger = TouchPoint::new(1, at);
        self.send(TouchPhase::Down, finger, &[finger]);
        self.wait(40);
        self.send(TouchPhase::Up, finger, &[]);
    }

    fn pinch(&self, center: Point, from: f32, to: f32) {
        let pair = |distance: f32| {
            [
                TouchPoint::new(1, Point::new(center.x - distance / 2.0, center.y)),
                TouchPoint::new(2, Point::new(center.x + distance / 2.0, center.y)),
            ]
        };
        let [a, b] = pair(from);
        self.send(TouchPhase::Down, a, &[a]);
        self.send(TouchPhase::Down, b, &[a, b]);
        let mut last = [a, b];
        for step in 1..=8 {
            self.wait(16);
            last = pair(from + (to - from) * step as f32 / 8.0);
            self.send(TouchPhase::Move, last[1], &last);
        }
        self.send(TouchPhase::Up, last[1], &[last[0]]);
        self.send(TouchPhase::Up, last[0], &[]);
    }

    fn swipe_down(&self, from: Point, distance: f32) {
        let start = TouchPoint::new(1, from);
        self.send(TouchPhase::Down, start, &[start]);
        let mut last = start;
        for step in 1..=6 {
            self.wait(10);
            last = TouchPoint::new(1, Point::new(from.x, from.y + distance * step as f32 / 6.0));
            self.send(TouchPhase::Move, last, &[last]);
        }
        self.wait(10);
        self.send(TouchPhase::Up, last, &[]);
    }
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Glance Image Viewer Demo ===");
    println!("Scripted session: pinch, double tap, paging, bars, rotation, swipe to close");
    println!();

    let images: Vec<ImageSource> = (1..=4)
        .map(|n| ImageSource::uri(format!("https://picsum.photos/id/{n}/1200/800")))
        .collect();
    let len = images.len();

    let runtime = Runtime::new();
    let props = ViewerProps::new(images, || println!("  host: on_request_close"))
        .image_index(1)
        .on_image_index_change(|index| println!("  host: image index -> {index}"))
        .on_long_press(|source| println!("  host: long press on {source}"))
        .on_diagnostic(|diagnostic| println!("  host: diagnostic: {diagnostic}"));
    let viewer = ImageViewer::new(props, PHONE, runtime.handle());
    viewer.attach_pager(Rc::new(ConsolePager { len }));
    viewer.on_presented();
    for index in 0..len {
        viewer.on_image_size_resolved(index, Size::new(1_200.0, 800.0));
        viewer.on_image_loaded(index);
    }

    let script = Script {
        runtime: &runtime,
        viewer: &viewer,
    };
    let center = PHONE.center();
    let report = |label: &str| {
        let transform = viewer
            .current_page()
            .map(|page| page.current_transform())
            .unwrap_or_default();
        let overlay = viewer.overlay_state();
        println!(
            "[{:>5} ms] {label}: page {} scale {:.2} translate ({:.1}, {:.1}) bars {}",
            runtime.now_millis(),
            overlay.image_index,
            transform.scale,
            transform.translate.x,
            transform.translate.y,
            if overlay.visible { "shown" } else { "hidden" },
        );
    };

    report("opened");

    println!("\n-- pinch to zoom");
    script.pinch(center, 120.0, 300.0);
    script.wait(300);
    report("after pinch");

    println!("\n-- double tap to zoom out");
    script.tap(center);
    script.wait(60);
    script.tap(center);
    script.wait(400);
    report("after double tap");

    println!("\n-- page to the next image");
    viewer.on_pager_scroll(PHONE.width * 1.6);
    viewer.on_pager_momentum_end(PHONE.width * 2.0);
    report("after paging");

    println!("\n-- single tap toggles the bars");
    script.tap(center);
    script.wait(600);
    report("after tap");

    println!("\n-- long press");
    let finger = TouchPoint::new(1, center);
    script.send(TouchPhase::Down, finger, &[finger]);
    script.wait(900);
    script.send(TouchPhase::Up, finger, &[]);

    println!("\n-- rotate to landscape");
    viewer.on_viewport_change(Size::new(PHONE.height, PHONE.width));
    script.wait(200);
    report("after rotation");

    println!("\n-- out of range index request");
    viewer.set_image_index(99);
    report("after set_image_index(99)");

    println!("\n-- swipe down to close");
    script.swipe_down(center, 240.0);
    println!("viewer phase: {:?}", viewer.phase());

    // Let the close fade play out in real time, one frame per vsync.
    let clock = MonotonicClock::starting_at(runtime.now_millis());
    while runtime.advance_to_clock(&clock) {
        thread::sleep(Duration::from_millis(FRAME_INTERVAL_MILLIS));
    }
    println!(
        "[{:>5} ms] viewer phase: {:?}, opacity {:.2}",
        runtime.now_millis(),
        viewer.phase(),
        viewer.opacity()
    );
}
