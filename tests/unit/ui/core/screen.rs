use super::*;
use crate::ui::backend::test::HeadlessBackend;
use std::thread;

#[test]
fn inspect_reaches_the_concrete_backend() {
    let screen = Screen::new(HeadlessBackend::new(4, 2));
    screen.with(|b| b.bell());
    assert_eq!(screen.inspect(|h: &HeadlessBackend| h.bells()), Some(1));
}

#[test]
fn clones_share_one_backend() {
    let screen = Screen::new(HeadlessBackend::new(4, 2));
    let other = screen.clone();
    let handle = thread::spawn(move || other.with(|b| b.compose().is_ok()));
    assert!(handle.join().unwrap());
    assert_eq!(screen.inspect(|h: &HeadlessBackend| h.composes()), Some(1));
}

#[test]
fn poisoned_lock_is_recovered() {
    let screen = Screen::new(HeadlessBackend::new(1, 1));
    let other = screen.clone();
    let _ = thread::spawn(move || {
        let _guard = other.lock();
        panic!("drawing thread died");
    })
    .join();
    screen.with(|b| b.bell());
    assert_eq!(screen.inspect(|h: &HeadlessBackend| h.bells()), Some(1));
}

#[test]
fn refresh_signal_is_taken_once() {
    let signal = RefreshSignal::new();
    let remote = signal.clone();
    assert!(!signal.take());
    remote.raise();
    assert!(signal.is_raised());
    assert!(signal.take());
    assert!(!signal.take());
}
