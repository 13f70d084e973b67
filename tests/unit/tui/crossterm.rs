use super::*;
use crossterm::event::{
    Event, KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind as CtKeyEventKind,
    KeyEventState, KeyModifiers as CtKeyModifiers,
};

fn press(code: CtKeyCode, modifiers: CtKeyModifiers) -> Option<Key> {
    into_key(CtKeyEvent::new(code, modifiers))
}

#[test]
fn ctrl_space_normalizes_from_null() {
    let key = press(CtKeyCode::Null, CtKeyModifiers::NONE).unwrap();
    assert_eq!(key.code, KeyCode::Char(' '));
    assert!(key.modifiers.contains(KeyModifiers::CONTROL));
}

#[test]
fn ctrl_c_becomes_an_interrupt_key() {
    let key = press(CtKeyCode::Char('c'), CtKeyModifiers::CONTROL).unwrap();
    assert!(key.is_interrupt());
}

#[test]
fn shifted_characters_match_plain_bindings() {
    assert_eq!(
        press(CtKeyCode::Char('A'), CtKeyModifiers::SHIFT),
        Some(Key::char('A'))
    );
    assert_eq!(
        press(CtKeyCode::BackTab, CtKeyModifiers::SHIFT),
        Some(Key::simple(KeyCode::BackTab))
    );
    assert_eq!(
        press(CtKeyCode::Up, CtKeyModifiers::SHIFT),
        Some(Key::shift(KeyCode::Up))
    );
}

#[test]
fn key_releases_are_dropped() {
    let release = CtKeyEvent {
        code: CtKeyCode::Enter,
        modifiers: CtKeyModifiers::NONE,
        kind: CtKeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert_eq!(into_input_event(Event::Key(release)), None);
}

#[test]
fn mouse_and_resize_pass_through() {
    let mouse = crossterm::event::MouseEvent {
        kind: crossterm::event::MouseEventKind::Drag(crossterm::event::MouseButton::Left),
        column: 7,
        row: 3,
        modifiers: CtKeyModifiers::NONE,
    };
    assert_eq!(
        into_input_event(Event::Mouse(mouse)),
        Some(InputEvent::Mouse(MouseEvent::new(
            MouseEventKind::Drag(MouseButton::Left),
            7,
            3
        )))
    );
    assert_eq!(
        into_input_event(Event::Resize(80, 24)),
        Some(InputEvent::Resize(80, 24))
    );
}
