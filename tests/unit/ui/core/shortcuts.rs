use super::*;
use crate::config::DesktopConfig;
use crate::ui::backend::test::HeadlessBackend;

fn stay(_desk: &mut Desktop, _id: NodeId, _key: Key) -> Outcome {
    Outcome::Continue
}

fn desktop() -> Desktop {
    Desktop::new(HeadlessBackend::new(10, 5), DesktopConfig::default()).unwrap()
}

fn run(table: &ShortcutTable, key: Key) -> Option<Outcome> {
    let mut desk = desktop();
    let root = desk.root();
    table.lookup(&key).map(|h| h(&mut desk, root, key))
}

#[test]
fn lookup_returns_registered_handler() {
    let mut table = ShortcutTable::new();
    assert!(table.insert(Key::char('q'), exit_prev));
    assert_eq!(run(&table, Key::char('q')), Some(Outcome::ExitPrev));
    assert_eq!(run(&table, Key::char('w')), None);
}

#[test]
fn reregistering_overwrites_in_place() {
    let mut table = ShortcutTable::new();
    table.insert(Key::simple(KeyCode::Tab), exit_next);
    table.insert(Key::simple(KeyCode::Enter), exit_next);
    table.insert(Key::simple(KeyCode::Tab), stay);

    assert_eq!(table.len(), 2);
    let keys: Vec<_> = table.keys().collect();
    assert_eq!(
        keys,
        vec![Key::simple(KeyCode::Tab), Key::simple(KeyCode::Enter)]
    );
    assert_eq!(
        run(&table, Key::simple(KeyCode::Tab)),
        Some(Outcome::Continue)
    );
}

#[test]
fn thirty_third_binding_is_dropped() {
    let mut table = ShortcutTable::new();
    let bindings: Vec<(Key, ShortcutHandler)> = (0..33u8)
        .map(|i| (Key::char(char::from(b'A' + i)), exit_next as ShortcutHandler))
        .collect();

    let dropped = table.extend(&bindings);
    assert_eq!(dropped, 1);
    assert_eq!(table.len(), MAX_SHORTCUTS);
    assert!(table.is_full());
    assert!(table.contains(&bindings[31].0));
    assert!(!table.contains(&bindings[32].0));
    assert_eq!(table.keys().next(), Some(bindings[0].0));
}

#[test]
fn full_table_still_accepts_overwrites() {
    let mut table = ShortcutTable::new();
    for i in 0..MAX_SHORTCUTS as u8 {
        table.insert(Key::char(char::from(b'a' + i)), stay);
    }
    assert!(!table.insert(Key::char('~'), stay));
    assert!(table.insert(Key::char('a'), exit_next));
    assert_eq!(run(&table, Key::char('a')), Some(Outcome::ExitNext));
}

#[test]
fn default_navigation_covers_tab_and_arrows() {
    let mut table = ShortcutTable::new();
    assert_eq!(table.extend(&DEFAULT_NAVIGATION), 0);
    for key in [KeyCode::Tab, KeyCode::Enter, KeyCode::Down, KeyCode::Right] {
        assert_eq!(run(&table, Key::simple(key)), Some(Outcome::ExitNext));
    }
    for key in [KeyCode::BackTab, KeyCode::Left, KeyCode::Up] {
        assert_eq!(run(&table, Key::simple(key)), Some(Outcome::ExitPrev));
    }
}
