use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn set_notifies_only_on_change() {
    let state = MutableState::new(false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _subscription = {
        let seen = seen.clone();
        state.subscribe(move |value| seen.borrow_mut().push(*value))
    };

    assert!(state.set(true));
    assert!(!state.set(true));
    assert!(state.set(false));
    assert_eq!(seen.borrow().as_slice(), &[true, false]);
}

#[test]
fn dropping_subscription_unsubscribes() {
    let state = MutableState::new(0);
    let count = Rc::new(RefCell::new(0));
    let subscription = {
        let count = count.clone();
        state.subscribe(move |_| *count.borrow_mut() += 1)
    };

    state.set(1);
    drop(subscription);
    state.set(2);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn subscriber_may_write_other_state() {
    let source = MutableState::new(1);
    let mirror = MutableState::new(0);
    let _subscription = {
        let mirror = mirror.clone();
        source.subscribe(move |value| {
            mirror.set(*value * 10);
        })
    };

    source.set(4);
    assert_eq!(mirror.get(), 40);
    assert_eq!(source.as_state().get(), 4);
}

#[test]
fn update_notifies_once() {
    let state = MutableState::new(vec![1]);
    let count = Rc::new(RefCell::new(0));
    let _subscription = {
        let count = count.clone();
        state.subscribe(move |_| *count.borrow_mut() += 1)
    };
    state.update(|values| {
        values.push(2);
        values.push(3);
    });
    assert_eq!(state.get(), vec![1, 2, 3]);
    assert_eq!(*count.borrow(), 1);
}
