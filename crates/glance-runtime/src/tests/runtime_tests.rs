use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn timers_fire_in_deadline_order() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let fired = Rc::new(RefCell::new(Vec::new()));

    let late = {
        let fired = fired.clone();
        handle.schedule_at(300, move |time| fired.borrow_mut().push(("late", time)))
    };
    let early = {
        let fired = fired.clone();
        handle.schedule_at(100, move |time| fired.borrow_mut().push(("early", time)))
    };

    runtime.advance_to(250);
    assert_eq!(fired.borrow().as_slice(), &[("early", 100)]);
    assert_eq!(runtime.now_millis(), 250);

    runtime.advance_to(300);
    assert_eq!(fired.borrow().as_slice(), &[("early", 100), ("late", 300)]);
    drop((late, early));
    assert!(runtime.is_idle());
}

#[test]
fn dropping_registration_cancels_timer() {
    let runtime = Runtime::new();
    let fired = Rc::new(RefCell::new(false));
    let registration = {
        let fired = fired.clone();
        runtime
            .handle()
            .schedule_after(50, move |_| *fired.borrow_mut() = true)
    };
    drop(registration);
    runtime.advance_by(100);
    assert!(!*fired.borrow());
}

#[test]
fn timer_scheduled_from_callback_fires_in_same_advance() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let keep = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let handle = handle.clone();
        let fired = fired.clone();
        let keep = keep.clone();
        handle.clone().schedule_at(10, move |time| {
            fired.borrow_mut().push(time);
            let fired = fired.clone();
            let next = handle.schedule_after(5, move |time| fired.borrow_mut().push(time));
            keep.borrow_mut().push(next);
        })
    };

    runtime.advance_to(40);
    assert_eq!(fired.borrow().as_slice(), &[10, 15]);
    drop(first);
}

#[test]
fn frame_callbacks_run_once_per_frame() {
    let runtime = Runtime::new();
    let clock = runtime.frame_clock();
    let frames = Rc::new(RefCell::new(Vec::new()));

    let registration = {
        let frames = frames.clone();
        clock.with_frame_millis(move |millis| frames.borrow_mut().push(millis))
    };
    assert!(runtime.needs_frame());

    runtime.advance_by(48);
    assert_eq!(frames.borrow().as_slice(), &[16]);
    assert!(!runtime.needs_frame());
    drop(registration);
}

#[test]
fn handle_outliving_runtime_is_inactive() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    drop(runtime);

    assert!(!handle.is_attached());
    let registration = handle.schedule_after(10, |_| {});
    assert!(!registration.is_active());
    let frame = handle.frame_clock().with_frame_nanos(|_| {});
    assert!(!frame.is_active());
}

#[test]
fn wall_clock_drives_pending_timers() {
    let runtime = Runtime::starting_at(1_000);
    let fired = Rc::new(RefCell::new(None));
    let _registration = {
        let fired = fired.clone();
        runtime
            .handle()
            .schedule_at(2_000, move |time| *fired.borrow_mut() = Some(time))
    };

    let behind = MonotonicClock::starting_at(0);
    assert!(runtime.advance_to_clock(&behind));
    assert_eq!(runtime.now_millis(), 1_000);
    assert_eq!(*fired.borrow(), None);

    let ahead = MonotonicClock::starting_at(5_000);
    assert!(!runtime.advance_to_clock(&ahead));
    assert!(runtime.now_millis() >= 5_000);
    assert_eq!(*fired.borrow(), Some(2_000));
}
