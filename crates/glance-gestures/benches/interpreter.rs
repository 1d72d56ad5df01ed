use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glance_geometry::{Point, Size};
use glance_gestures::{
    GestureCapabilities, GestureConfig, GestureInterpreter, TouchEvent, TouchPhase, TouchPoint,
};

const VIEWPORT: Size = Size::new(1080.0, 1920.0);
const PINCH_STEP_SAMPLES: &[usize] = &[16, 128];

fn pinch_session(steps: usize) -> Vec<TouchEvent> {
    let center = Point::new(540.0, 960.0);
    let finger = |id: u64, distance: f32| {
        let side = if id == 1 { -0.5 } else { 0.5 };
        TouchPoint::new(id, Point::new(center.x + distance * side, center.y))
    };
    let mut events = Vec::with_capacity(steps + 4);
    let a = finger(1, 100.0);
    let b = finger(2, 100.0);
    events.push(TouchEvent::new(TouchPhase::Down, 0, a, [a]));
    events.push(TouchEvent::new(TouchPhase::Down, 1, b, [a, b]));
    for step in 0..steps {
        let distance = 100.0 + 400.0 * step as f32 / steps as f32;
        let a = finger(1, distance);
        let b = finger(2, distance);
        events.push(TouchEvent::new(TouchPhase::Move, 2 + step as u64, b, [a, b]));
    }
    let a = finger(1, 500.0);
    let b = finger(2, 500.0);
    let end = 2 + steps as u64;
    events.push(TouchEvent::new(TouchPhase::Up, end, b, [a]));
    events.push(TouchEvent::new(TouchPhase::Up, end + 1, a, []));
    events
}

fn bench_pinch(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpreter_pinch");
    for &steps in PINCH_STEP_SAMPLES {
        let events = pinch_session(steps);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &events, |b, events| {
            b.iter(|| {
                let mut interpreter = GestureInterpreter::new(
                    GestureConfig::touch_zoom(),
                    GestureCapabilities::TOUCH,
                );
                interpreter.set_viewport(VIEWPORT);
                let mut emitted = 0usize;
                for event in events {
                    emitted += interpreter.on_touch(black_box(event)).len();
                }
                black_box(emitted)
            });
        });
    }
    group.finish();
}

fn bench_taps(c: &mut Criterion) {
    c.bench_function("interpreter_double_tap", |b| {
        b.iter(|| {
            let mut interpreter =
                GestureInterpreter::new(GestureConfig::touch_zoom(), GestureCapabilities::TOUCH);
            interpreter.set_viewport(VIEWPORT);
            let finger = TouchPoint::new(1, Point::new(300.0, 700.0));
            for start in [0u64, 120] {
                interpreter.on_touch(&TouchEvent::new(TouchPhase::Down, start, finger, [finger]));
                interpreter.on_touch(&TouchEvent::new(TouchPhase::Up, start + 40, finger, []));
            }
            black_box(interpreter.on_frame(black_box(500)))
        });
    });
}

criterion_group!(benches, bench_pinch, bench_taps);
criterion_main!(benches);
