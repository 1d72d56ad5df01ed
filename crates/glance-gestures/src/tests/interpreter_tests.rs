use super::*;
use crate::TouchPoint;
use glance_geometry::Size;

const VIEWPORT: Size = Size::new(400.0, 800.0);
const CENTER: Point = Point::new(200.0, 400.0);

fn interpreter() -> GestureInterpreter {
    let mut interpreter =
        GestureInterpreter::new(GestureConfig::touch_zoom(), GestureCapabilities::TOUCH);
    interpreter.set_viewport(VIEWPORT);
    interpreter
}

fn touch(id: u64, x: f32, y: f32) -> TouchPoint {
    TouchPoint::new(id, Point::new(x, y))
}

fn event(phase: TouchPhase, uptime: u64, changed: TouchPoint, touches: &[TouchPoint]) -> TouchEvent {
    TouchEvent::new(phase, uptime, changed, touches.iter().copied())
}

fn tap(interpreter: &mut GestureInterpreter, at: u64, x: f32, y: f32) -> Vec<GestureSignal> {
    let finger = touch(1, x, y);
    let mut signals: Vec<_> = interpreter
        .on_touch(&event(TouchPhase::Down, at, finger, &[finger]))
        .into_iter()
        .collect();
    signals.extend(interpreter.on_touch(&event(TouchPhase::Up, at + 40, finger, &[])));
    signals
}

fn fingers(center: Point, distance: f32) -> [TouchPoint; 2] {
    [
        touch(1, center.x - distance / 2.0, center.y),
        touch(2, center.x + distance / 2.0, center.y),
    ]
}

/// Lands two fingers `distances[0]` apart and spreads them through the rest.
fn pinch(
    interpreter: &mut GestureInterpreter,
    at: u64,
    center: Point,
    distances: &[f32],
) -> Vec<GestureSignal> {
    let [a, b] = fingers(center, distances[0]);
    let mut signals: Vec<_> = interpreter
        .on_touch(&event(TouchPhase::Down, at, a, &[a]))
        .into_iter()
        .collect();
    signals.extend(interpreter.on_touch(&event(TouchPhase::Down, at + 1, b, &[a, b])));
    for (step, distance) in distances.iter().enumerate().skip(1) {
        let [a, b] = fingers(center, *distance);
        signals.extend(interpreter.on_touch(&event(
            TouchPhase::Move,
            at + 1 + step as u64,
            b,
            &[a, b],
        )));
    }
    signals
}

fn release(
    interpreter: &mut GestureInterpreter,
    at: u64,
    center: Point,
    distance: f32,
) -> Vec<GestureSignal> {
    let [a, b] = fingers(center, distance);
    let mut signals: Vec<_> = interpreter
        .on_touch(&event(TouchPhase::Up, at, b, &[a]))
        .into_iter()
        .collect();
    signals.extend(interpreter.on_touch(&event(TouchPhase::Up, at + 1, a, &[])));
    signals
}

fn zoom_signals(signals: &[GestureSignal]) -> Vec<bool> {
    signals
        .iter()
        .filter_map(|signal| match signal {
            GestureSignal::ZoomChanged(zoomed) => Some(*zoomed),
            _ => None,
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn pinch_scales_by_distance_ratio() {
    let mut interpreter = interpreter();
    let signals = pinch(&mut interpreter, 0, CENTER, &[100.0, 150.0, 200.0]);

    assert_eq!(interpreter.phase(), GesturePhase::Pinching);
    assert!(approx(interpreter.transform().scale, 2.0));
    assert!(approx(interpreter.transform().translate.x, 0.0));
    assert_eq!(zoom_signals(&signals), vec![true]);
    assert!(interpreter.is_zoomed());
    assert_eq!(interpreter.active_touch_count(), 2);
}

#[test]
fn pinch_scale_stays_within_bounds() {
    let mut interpreter = interpreter();
    let distances = [100.0, 20.0, 5.0, 90.0, 250.0, 900.0, 4000.0, 130.0, 1.0];
    let [a, b] = fingers(CENTER, distances[0]);
    interpreter.on_touch(&event(TouchPhase::Down, 0, a, &[a]));
    interpreter.on_touch(&event(TouchPhase::Down, 1, b, &[a, b]));

    for (step, distance) in distances.iter().enumerate() {
        let [a, b] = fingers(CENTER, *distance);
        interpreter.on_touch(&event(TouchPhase::Move, 2 + step as u64, b, &[a, b]));
        let transform = interpreter.transform();
        assert!(transform.is_finite());
        assert!(transform.scale >= 1.0 && transform.scale <= 3.0, "{transform:?}");
    }

    let [a, b] = fingers(CENTER, 5000.0);
    interpreter.on_touch(&event(TouchPhase::Move, 50, b, &[a, b]));
    assert_eq!(interpreter.transform().scale, 3.0);
}

#[test]
fn zoom_edge_fires_once_per_crossing() {
    let mut interpreter = interpreter();
    let signals = pinch(
        &mut interpreter,
        0,
        CENTER,
        &[100.0, 104.0, 106.0, 107.0, 104.0, 103.0, 106.0],
    );
    assert_eq!(zoom_signals(&signals), vec![true, false, true]);
}

#[test]
fn pinch_keeps_content_under_the_fingers() {
    let mut interpreter = interpreter();
    let center = Point::new(300.0, 400.0);
    pinch(&mut interpreter, 0, center, &[100.0, 200.0]);

    let transform = interpreter.transform();
    assert!(approx(transform.translate.x, -50.0));
    // content that started under the midpoint is still there
    let content = Point::new(100.0, 0.0);
    let screen = transform.map_point(content);
    assert!(approx(screen.x, 100.0));
    assert!(approx(screen.y, 0.0));
}

#[test]
fn release_below_threshold_tweens_back_to_identity() {
    let mut interpreter = interpreter();
    let mut signals = pinch(&mut interpreter, 0, CENTER, &[100.0, 103.0]);
    signals.extend(release(&mut interpreter, 10, CENTER, 103.0));

    assert!(zoom_signals(&signals).is_empty());
    assert_eq!(interpreter.phase(), GesturePhase::Settling);
    assert!(interpreter.is_settling());

    interpreter.on_frame(60);
    assert!(interpreter.transform().scale < 1.03);
    let last = interpreter.on_frame(11 + 200);
    assert_eq!(
        last.last(),
        Some(&GestureSignal::TransformChanged(Transform::IDENTITY))
    );
    assert_eq!(interpreter.phase(), GesturePhase::Idle);
}

#[test]
fn release_above_threshold_becomes_baseline() {
    let mut interpreter = interpreter();
    pinch(&mut interpreter, 0, CENTER, &[100.0, 180.0]);
    let signals = release(&mut interpreter, 10, CENTER, 180.0);

    assert!(zoom_signals(&signals).is_empty());
    assert!(!interpreter.is_settling());
    assert_eq!(interpreter.phase(), GesturePhase::Idle);
    assert!(approx(interpreter.transform().scale, 1.8));
    assert!(interpreter.is_zoomed());
}

#[test]
fn double_tap_toggles_zoom_around_tap_point() {
    let mut interpreter = interpreter();
    let mut signals = tap(&mut interpreter, 0, 300.0, 400.0);
    signals.extend(tap(&mut interpreter, 100, 300.0, 400.0));

    assert!(signals.contains(&GestureSignal::DoubleTap(Point::new(300.0, 400.0))));
    assert_eq!(zoom_signals(&signals), vec![true]);
    assert!(!signals
        .iter()
        .any(|signal| matches!(signal, GestureSignal::SingleTap(_))));

    interpreter.on_frame(140 + 200);
    let transform = interpreter.transform();
    assert_eq!(transform.scale, 2.0);
    assert!(approx(transform.translate.x, -100.0));
    // the tapped content is now centred
    let centred = transform.map_point(Point::new(100.0, 0.0));
    assert!(approx(centred.x, 0.0) && approx(centred.y, 0.0));

    let mut signals = tap(&mut interpreter, 1_000, 210.0, 380.0);
    signals.extend(tap(&mut interpreter, 1_100, 215.0, 390.0));
    assert_eq!(zoom_signals(&signals), vec![false]);
    interpreter.on_frame(1_140 + 200);
    assert_eq!(interpreter.transform(), Transform::IDENTITY);
    assert_eq!(interpreter.next_deadline(), None);
}

#[test]
fn third_tap_starts_a_new_sequence() {
    let mut interpreter = interpreter();
    tap(&mut interpreter, 0, 200.0, 400.0);
    tap(&mut interpreter, 100, 200.0, 400.0);
    let third = tap(&mut interpreter, 200, 200.0, 400.0);

    assert!(!third
        .iter()
        .any(|signal| matches!(signal, GestureSignal::DoubleTap(_))));
    assert_eq!(interpreter.next_deadline(), Some(240 + 300));
    assert_eq!(
        interpreter.fire_due(540).as_slice(),
        &[GestureSignal::SingleTap(Point::new(200.0, 400.0))]
    );
}

#[test]
fn single_tap_is_confirmed_after_the_delay() {
    let mut interpreter = interpreter();
    let signals = tap(&mut interpreter, 0, 120.0, 300.0);
    assert!(signals.is_empty());
    assert_eq!(interpreter.next_deadline(), Some(340));
    assert!(interpreter.fire_due(339).is_empty());
    assert_eq!(
        interpreter.fire_due(340).as_slice(),
        &[GestureSignal::SingleTap(Point::new(120.0, 300.0))]
    );
    assert_eq!(interpreter.next_deadline(), None);
}

#[test]
fn distant_taps_are_two_single_taps() {
    let mut interpreter = interpreter();
    tap(&mut interpreter, 0, 100.0, 100.0);
    let second = tap(&mut interpreter, 100, 100.0, 150.0);
    assert_eq!(second, vec![GestureSignal::SingleTap(Point::new(100.0, 100.0))]);
    assert_eq!(
        interpreter.fire_due(1_000).as_slice(),
        &[GestureSignal::SingleTap(Point::new(100.0, 150.0))]
    );
}

#[test]
fn late_second_tap_flushes_the_first() {
    let mut interpreter = interpreter();
    tap(&mut interpreter, 0, 100.0, 100.0);
    // the pending tap expires at 340, before this press lands
    let signals = tap(&mut interpreter, 400, 100.0, 100.0);
    assert_eq!(signals, vec![GestureSignal::SingleTap(Point::new(100.0, 100.0))]);
}

#[test]
fn tap_without_double_tap_zoom_fires_immediately() {
    let config = GestureConfig::touch_zoom().with_double_tap_to_zoom(false);
    let mut interpreter = GestureInterpreter::new(config, GestureCapabilities::TOUCH);
    interpreter.set_viewport(VIEWPORT);
    let first = tap(&mut interpreter, 0, 50.0, 50.0);
    let second = tap(&mut interpreter, 100, 50.0, 50.0);
    assert_eq!(first, vec![GestureSignal::SingleTap(Point::new(50.0, 50.0))]);
    assert_eq!(second, vec![GestureSignal::SingleTap(Point::new(50.0, 50.0))]);
    assert!(!interpreter.is_zoomed());
}

#[test]
fn long_press_suppresses_the_tap() {
    let mut interpreter = interpreter();
    let finger = touch(1, 200.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Down, 0, finger, &[finger]));
    assert_eq!(interpreter.next_deadline(), Some(800));
    assert!(interpreter.fire_due(799).is_empty());
    assert_eq!(
        interpreter.fire_due(800).as_slice(),
        &[GestureSignal::LongPress(Point::new(200.0, 400.0))]
    );

    let signals = interpreter.on_touch(&event(TouchPhase::Up, 900, finger, &[]));
    assert!(signals.is_empty());
    assert!(interpreter.fire_due(5_000).is_empty());
}

#[test]
fn moving_past_slop_cancels_long_press() {
    let mut interpreter = interpreter();
    let finger = touch(1, 200.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Down, 0, finger, &[finger]));
    let jitter = touch(1, 204.0, 403.0);
    interpreter.on_touch(&event(TouchPhase::Move, 50, jitter, &[jitter]));
    assert_eq!(interpreter.next_deadline(), Some(800));

    let moved = touch(1, 200.0, 420.0);
    interpreter.on_touch(&event(TouchPhase::Move, 100, moved, &[moved]));
    assert_eq!(interpreter.next_deadline(), None);
    assert!(interpreter.fire_due(900).is_empty());
    assert_eq!(interpreter.phase(), GesturePhase::SwipingVertical);
}

#[test]
fn zoomed_single_finger_pans_by_delta_over_scale() {
    let mut interpreter = interpreter();
    pinch(&mut interpreter, 0, CENTER, &[100.0, 200.0]);
    release(&mut interpreter, 10, CENTER, 200.0);

    let start = touch(1, 200.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Down, 1_000, start, &[start]));
    let small = touch(1, 205.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Move, 1_010, small, &[small]));
    assert!(approx(interpreter.transform().translate.x, 0.0));

    let far = touch(1, 260.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Move, 1_020, far, &[far]));
    assert_eq!(interpreter.phase(), GesturePhase::Panning);
    assert!(approx(interpreter.transform().translate.x, 30.0));

    let further = touch(1, 260.0, 340.0);
    interpreter.on_touch(&event(TouchPhase::Move, 1_030, further, &[further]));
    assert!(approx(interpreter.transform().translate.y, -30.0));

    interpreter.on_touch(&event(TouchPhase::Up, 1_040, further, &[]));
    assert!(approx(interpreter.transform().scale, 2.0));
    assert!(!interpreter.is_settling());
}

#[test]
fn unzoomed_drag_reports_swipe() {
    let mut interpreter = interpreter();
    let mut signals = Vec::new();
    let start = touch(1, 200.0, 400.0);
    signals.extend(interpreter.on_touch(&event(TouchPhase::Down, 0, start, &[start])));
    for step in 1..=4u64 {
        let finger = touch(1, 200.0, 400.0 + step as f32 * 30.0);
        signals.extend(interpreter.on_touch(&event(
            TouchPhase::Move,
            step * 10,
            finger,
            &[finger],
        )));
    }
    let end = touch(1, 200.0, 550.0);
    signals.extend(interpreter.on_touch(&event(TouchPhase::Up, 50, end, &[])));

    assert_eq!(signals.first(), Some(&GestureSignal::SwipeMoved { offset: 30.0 }));
    match signals.last() {
        Some(GestureSignal::SwipeReleased { offset, velocity }) => {
            assert_eq!(*offset, 150.0);
            assert!((velocity - 3.0).abs() < 0.3, "velocity {velocity}");
        }
        other => panic!("expected swipe release, got {other:?}"),
    }
    assert!(!signals
        .iter()
        .any(|signal| matches!(signal, GestureSignal::TransformChanged(_))));
    assert_eq!(interpreter.transform(), Transform::IDENTITY);
}

#[test]
fn cancel_restores_session_baseline() {
    let mut interpreter = interpreter();
    pinch(&mut interpreter, 0, CENTER, &[100.0, 200.0]);
    release(&mut interpreter, 10, CENTER, 200.0);
    let baseline = interpreter.transform();

    pinch(&mut interpreter, 1_000, CENTER, &[100.0, 150.0]);
    assert!(approx(interpreter.transform().scale, 3.0));

    let [a, _] = fingers(CENTER, 150.0);
    let signals = interpreter.on_touch(&event(TouchPhase::Cancel, 1_100, a, &[]));
    assert_eq!(interpreter.transform(), baseline);
    assert!(signals.contains(&GestureSignal::TransformChanged(baseline)));
    assert!(zoom_signals(&signals).is_empty());
    assert!(interpreter.is_zoomed());
    assert_eq!(interpreter.phase(), GesturePhase::Idle);
}

#[test]
fn cancel_keeps_the_pending_tap() {
    let mut interpreter = interpreter();
    tap(&mut interpreter, 0, 50.0, 60.0);
    let finger = touch(1, 50.0, 60.0);
    interpreter.on_touch(&event(TouchPhase::Down, 100, finger, &[finger]));
    interpreter.on_touch(&event(TouchPhase::Cancel, 120, finger, &[]));
    assert_eq!(
        interpreter.fire_due(340).as_slice(),
        &[GestureSignal::SingleTap(Point::new(50.0, 60.0))]
    );
}

#[test]
fn malformed_events_are_ignored() {
    let mut interpreter = interpreter();
    let blind = TouchPoint::without_position(1);
    let signals = interpreter.on_touch(&event(TouchPhase::Down, 0, blind, &[blind]));
    assert!(signals.is_empty());
    assert_eq!(interpreter.phase(), GesturePhase::Idle);

    let signals = interpreter.on_touch(&event(TouchPhase::Up, 10, blind, &[]));
    assert!(signals.is_empty());
    assert_eq!(interpreter.transform(), Transform::IDENTITY);
}

#[test]
fn degenerate_pinch_anchors_on_the_next_move() {
    let mut interpreter = interpreter();
    let a = touch(1, 200.0, 400.0);
    let b = touch(2, 200.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Down, 0, a, &[a]));
    interpreter.on_touch(&event(TouchPhase::Down, 1, b, &[a, b]));
    assert_eq!(interpreter.phase(), GesturePhase::Active);

    let [a, b] = fingers(CENTER, 100.0);
    let missing = TouchPoint::without_position(2);
    interpreter.on_touch(&event(TouchPhase::Move, 2, missing, &[a, missing]));
    assert_eq!(interpreter.phase(), GesturePhase::Active);

    interpreter.on_touch(&event(TouchPhase::Move, 3, b, &[a, b]));
    assert_eq!(interpreter.phase(), GesturePhase::Pinching);

    let [a, b] = fingers(CENTER, 200.0);
    interpreter.on_touch(&event(TouchPhase::Move, 4, b, &[a, b]));
    assert!(approx(interpreter.transform().scale, 2.0));
}

#[test]
fn native_pinch_surface_follows_reported_zoom() {
    let mut interpreter =
        GestureInterpreter::new(GestureConfig::native_zoom(), GestureCapabilities::NATIVE);
    interpreter.set_viewport(VIEWPORT);

    let signals = pinch(&mut interpreter, 0, CENTER, &[100.0, 200.0]);
    assert!(signals.is_empty());
    assert_eq!(interpreter.transform(), Transform::IDENTITY);

    let signals = interpreter.on_native_zoom(2.0);
    assert_eq!(zoom_signals(&signals), vec![true]);
    assert_eq!(interpreter.transform().scale, 2.0);

    assert_eq!(zoom_signals(&interpreter.on_native_zoom(1.02)), Vec::<bool>::new());
    assert_eq!(zoom_signals(&interpreter.on_native_zoom(1.005)), vec![false]);
    assert_eq!(interpreter.on_native_zoom(9.0).len(), 2);
    assert_eq!(interpreter.transform().scale, 3.0);
}

#[test]
fn new_press_freezes_running_tween() {
    let mut interpreter = interpreter();
    pinch(&mut interpreter, 0, CENTER, &[100.0, 104.0]);
    release(&mut interpreter, 10, CENTER, 104.0);
    assert!(interpreter.is_settling());

    let finger = touch(1, 200.0, 400.0);
    interpreter.on_touch(&event(TouchPhase::Down, 111, finger, &[finger]));
    assert!(!interpreter.is_settling());
    assert_eq!(interpreter.phase(), GesturePhase::Active);
    let scale = interpreter.transform().scale;
    assert!(scale > 1.0 && scale < 1.04, "scale {scale}");
}

#[test]
fn reset_returns_to_identity_and_unzooms() {
    let mut interpreter = interpreter();
    pinch(&mut interpreter, 0, Point::new(260.0, 390.0), &[100.0, 250.0]);
    assert!(interpreter.is_zoomed());

    let signals = interpreter.reset();
    assert_eq!(
        signals.as_slice(),
        &[
            GestureSignal::TransformChanged(Transform::IDENTITY),
            GestureSignal::ZoomChanged(false),
        ]
    );
    assert_eq!(interpreter.phase(), GesturePhase::Idle);
    assert_eq!(interpreter.next_deadline(), None);
    assert!(interpreter.reset().is_empty());
}

fn drag_then_second_finger(capabilities: GestureCapabilities) -> Vec<GestureSignal> {
    let config = GestureConfig::for_capabilities(capabilities);
    let mut interpreter = GestureInterpreter::new(config, capabilities);
    interpreter.set_viewport(VIEWPORT);

    let first = touch(1, 200.0, 400.0);
    let moved = touch(1, 200.0, 500.0);
    let second = touch(2, 260.0, 500.0);
    let mut signals: Vec<_> = interpreter
        .on_touch(&event(TouchPhase::Down, 0, first, &[first]))
        .into_iter()
        .collect();
    signals.extend(interpreter.on_touch(&event(TouchPhase::Move, 20, moved, &[moved])));
    assert_eq!(interpreter.phase(), GesturePhase::SwipingVertical);
    signals.extend(interpreter.on_touch(&event(TouchPhase::Down, 30, second, &[moved, second])));
    assert_eq!(interpreter.phase(), GesturePhase::Pinching);
    signals.extend(interpreter.on_touch(&event(TouchPhase::Up, 40, second, &[moved])));
    signals.extend(interpreter.on_touch(&event(TouchPhase::Up, 45, moved, &[])));
    assert_eq!(interpreter.phase(), GesturePhase::Idle);
    signals
}

#[test]
fn second_finger_cancels_swipe_on_every_surface() {
    for capabilities in [GestureCapabilities::TOUCH, GestureCapabilities::NATIVE] {
        let signals = drag_then_second_finger(capabilities);
        assert!(
            signals.contains(&GestureSignal::SwipeCancelled),
            "{capabilities:?}: {signals:?}"
        );
        assert!(
            !signals
                .iter()
                .any(|signal| matches!(signal, GestureSignal::SwipeReleased { .. })),
            "{capabilities:?}: {signals:?}"
        );
    }
}
