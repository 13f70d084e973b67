use super::*;
use crate::ui::backend::test::HeadlessBackend;
use crate::ui::core::behavior::{Container, Hideable, MousePressable, Movable, Outcome};
use crate::error::WidgetError;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

struct Probe {
    name: &'static str,
    log: Log,
    fail_pre_destroy: bool,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            fail_pre_destroy: false,
        }
    }
}

impl Widget for Probe {
    fn as_movable(&mut self) -> Option<&mut dyn Movable> {
        Some(self)
    }

    fn as_hideable(&mut self) -> Option<&mut dyn Hideable> {
        Some(self)
    }

    fn pre_destroy(&mut self, _desk: &mut Desktop, _id: NodeId) -> std::result::Result<(), WidgetError> {
        self.log.borrow_mut().push(format!("pre:{}", self.name));
        if self.fail_pre_destroy {
            return Err(WidgetError::new("refused"));
        }
        Ok(())
    }

    fn destroy(self: Box<Self>, _desk: &mut Desktop, _id: NodeId) -> std::result::Result<(), WidgetError> {
        self.log.borrow_mut().push(format!("destroy:{}", self.name));
        Ok(())
    }
}

impl Movable for Probe {
    fn on_move(&mut self, _desk: &mut Desktop, _id: NodeId, d_row: i32, d_col: i32) {
        self.log
            .borrow_mut()
            .push(format!("move:{}:{d_row}:{d_col}", self.name));
    }
}

impl Hideable for Probe {
    fn on_hide(&mut self, _desk: &mut Desktop, _id: NodeId, hidden: bool) {
        self.log.borrow_mut().push(format!("hide:{}:{hidden}", self.name));
    }
}

fn desktop() -> Desktop {
    Desktop::new(HeadlessBackend::new(80, 24), DesktopConfig::default()).unwrap()
}

fn composes(desk: &Desktop) -> usize {
    desk.screen().inspect(|h: &HeadlessBackend| h.composes()).unwrap()
}

#[test]
fn new_desktop_focuses_root_and_shows_root_tip() {
    let desk = desktop();
    assert_eq!(desk.focus(), desk.root());
    assert!(desk.node(desk.root()).unwrap().is_editing());
    let status = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().status().to_string())
        .unwrap();
    assert_eq!(status, desk.config().root_tip);
}

#[test]
fn create_places_relative_to_parent_and_inherits_background() {
    let mut desk = desktop();
    let root = desk.root();
    let style = Style::new().bg(crate::ui::core::style::Color::Blue);
    let form = desk
        .create_styled(Some(root), Rect::new(10, 5, 30, 10), style, Container)
        .unwrap();
    let field = desk.create(Some(form), Rect::new(2, 1, 8, 1), Container).unwrap();

    let node = desk.node(field).unwrap();
    assert_eq!(node.rect, Rect::new(12, 6, 8, 1));
    assert_eq!(node.bkg, style);
    assert!(node.is_tab_stop());
    assert!(node.focus_time > desk.node(form).unwrap().focus_time);
    assert_eq!(desk.tree().parent(field), Some(form));
}

#[test]
fn create_defaults_to_focus_as_parent() {
    let mut desk = desktop();
    let form = desk.create(None, Rect::new(0, 0, 10, 5), Container).unwrap();
    desk.focus_on(form);
    let child = desk.create(None, Rect::new(1, 1, 2, 1), Container).unwrap();
    assert_eq!(desk.tree().parent(child), Some(form));
}

#[test]
fn surface_failure_leaves_no_linkage() {
    let mut desk = desktop();
    let root = desk.root();
    desk.screen()
        .inspect_mut(|h: &mut HeadlessBackend| h.fail_next_create())
        .unwrap();
    let before = desk.tree().len();
    let err = desk.create(Some(root), Rect::new(0, 0, 4, 4), Container);
    assert!(matches!(err, Err(DesktopError::Backend(_))));
    assert_eq!(desk.tree().len(), before);
    assert_eq!(desk.tree().children(root).count(), 0);
}

#[test]
fn create_under_stale_parent_is_an_error() {
    let mut desk = desktop();
    let root = desk.root();
    let gone = desk.create(Some(root), Rect::new(0, 0, 1, 1), Container).unwrap();
    assert!(desk.delete(gone));
    assert!(matches!(
        desk.create(Some(gone), Rect::new(0, 0, 1, 1), Container),
        Err(DesktopError::UnknownNode(_))
    ));
}

#[test]
fn delete_runs_callbacks_children_first() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(0, 0, 20, 10), Probe::new("form", &log)).unwrap();
    let a = desk.create(Some(form), Rect::new(0, 0, 5, 1), Probe::new("a", &log)).unwrap();
    desk.create(Some(a), Rect::new(0, 0, 1, 1), Probe::new("a1", &log)).unwrap();
    desk.create(Some(form), Rect::new(0, 2, 5, 1), Probe::new("b", &log)).unwrap();

    assert!(desk.delete(form));
    assert_eq!(
        *log.borrow(),
        vec![
            "pre:a1", "destroy:a1", "pre:a", "destroy:a", "pre:b", "destroy:b", "pre:form",
            "destroy:form",
        ]
    );
    assert_eq!(desk.tree().len(), 1);
    assert!(!desk.delete(form));
}

/// Deletes its parent when pressed.
struct CloseButton {
    log: Log,
}

impl Widget for CloseButton {
    fn as_mouse_pressable(&mut self) -> Option<&mut dyn MousePressable> {
        Some(self)
    }

    fn pre_destroy(&mut self, _desk: &mut Desktop, _id: NodeId) -> std::result::Result<(), WidgetError> {
        self.log.borrow_mut().push("pre:close".into());
        Ok(())
    }

    fn destroy(self: Box<Self>, _desk: &mut Desktop, _id: NodeId) -> std::result::Result<(), WidgetError> {
        self.log.borrow_mut().push("destroy:close".into());
        Ok(())
    }
}

impl MousePressable for CloseButton {
    fn mouse_press(&mut self, desk: &mut Desktop, id: NodeId, _pos: Pos) -> Outcome {
        if let Some(form) = desk.tree().parent(id) {
            desk.delete(form);
        }
        Outcome::Continue
    }
}

#[test]
fn widget_deleting_its_ancestor_is_still_destroyed_first() {
    use crate::core::event::{InputEvent, MouseButton, MouseEvent, MouseEventKind};

    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(0, 0, 20, 5), Probe::new("form", &log)).unwrap();
    desk.create(Some(form), Rect::new(2, 1, 3, 1), CloseButton { log: Rc::clone(&log) })
        .unwrap();
    desk.create(Some(form), Rect::new(2, 3, 3, 1), Probe::new("other", &log)).unwrap();

    let click = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 2, 1);
    desk.handle_input(InputEvent::Mouse(click));
    assert_eq!(
        *log.borrow(),
        vec![
            "pre:other", "destroy:other", "pre:close", "destroy:close", "pre:form",
            "destroy:form",
        ]
    );
    assert_eq!(desk.tree().len(), 1);
    assert_eq!(desk.focus(), root);
}

#[test]
fn failing_pre_destroy_does_not_stop_teardown() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let mut stubborn = Probe::new("stubborn", &log);
    stubborn.fail_pre_destroy = true;
    let form = desk.create(Some(root), Rect::new(0, 0, 5, 5), Probe::new("form", &log)).unwrap();
    desk.create(Some(form), Rect::new(0, 0, 1, 1), stubborn).unwrap();

    assert!(desk.delete(form));
    assert_eq!(
        *log.borrow(),
        vec!["pre:stubborn", "destroy:stubborn", "pre:form", "destroy:form"]
    );
}

#[test]
fn deleting_focused_subtree_moves_focus_to_parent() {
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(0, 0, 20, 10), Container).unwrap();
    let field = desk.create(Some(form), Rect::new(0, 0, 5, 1), Container).unwrap();
    let inner = desk.create(Some(field), Rect::new(0, 0, 1, 1), Container).unwrap();
    desk.focus_on(inner);

    assert!(desk.delete(field));
    assert_eq!(desk.focus(), form);
    assert!(desk.node(form).unwrap().is_editing());
}

#[test]
fn root_cannot_be_deleted() {
    let mut desk = desktop();
    let root = desk.root();
    assert!(!desk.delete(root));
}

#[test]
fn teardown_destroys_everything_once() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    desk.set_root_widget(Probe::new("root", &log));
    let form = desk.create(Some(root), Rect::new(0, 0, 5, 5), Probe::new("form", &log)).unwrap();
    desk.create(Some(form), Rect::new(0, 0, 1, 1), Probe::new("leaf", &log)).unwrap();

    desk.teardown();
    desk.teardown();
    assert_eq!(
        *log.borrow(),
        vec![
            "pre:leaf", "destroy:leaf", "pre:form", "destroy:form", "pre:root", "destroy:root",
        ]
    );
    assert!(desk.is_closed());
    let surfaces = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().len())
        .unwrap();
    assert_eq!(surfaces, 0);
}

#[test]
fn move_by_notifies_and_shifts_subtree() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(5, 5, 10, 5), Probe::new("form", &log)).unwrap();
    let child = desk.create(Some(form), Rect::new(1, 1, 2, 1), Probe::new("child", &log)).unwrap();

    assert!(desk.move_by(form, 2, -3));
    assert_eq!(*log.borrow(), vec!["move:form:2:-3", "move:child:2:-3"]);
    assert_eq!(desk.node(form).unwrap().rect, Rect::new(2, 7, 10, 5));
    assert_eq!(desk.node(child).unwrap().rect, Rect::new(3, 8, 2, 1));
    let moved = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().rect(child))
        .unwrap();
    assert_eq!(moved, Some(Rect::new(3, 8, 2, 1)));
}

#[test]
fn move_clamped_at_the_edge_keeps_the_subtree_layout() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(2, 1, 10, 5), Probe::new("form", &log)).unwrap();
    let child = desk.create(Some(form), Rect::new(3, 1, 2, 1), Probe::new("child", &log)).unwrap();

    assert!(desk.move_by(form, -4, -5));
    assert_eq!(*log.borrow(), vec!["move:form:-1:-2", "move:child:-1:-2"]);
    assert_eq!(desk.node(form).unwrap().rect, Rect::new(0, 0, 10, 5));
    assert_eq!(desk.node(child).unwrap().rect, Rect::new(3, 1, 2, 1));

    log.borrow_mut().clear();
    assert!(desk.move_by(form, -1, -1));
    assert!(log.borrow().is_empty());
}

#[test]
fn set_hidden_notifies_widget_and_backend() {
    let log = Log::default();
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(0, 0, 4, 4), Probe::new("form", &log)).unwrap();

    assert!(desk.set_hidden(form, true));
    assert!(desk.node(form).unwrap().is_hidden());
    assert_eq!(*log.borrow(), vec!["hide:form:true"]);
    let hidden = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().is_effectively_hidden(form))
        .unwrap();
    assert!(hidden);
}

#[test]
fn tips_resolve_to_nearest_on_focus_path() {
    let mut desk = desktop();
    let root = desk.root();
    let form = desk.create(Some(root), Rect::new(0, 0, 20, 10), Container).unwrap();
    let field = desk.create(Some(form), Rect::new(0, 0, 5, 1), Container).unwrap();
    desk.set_tip(form, Some("form help".to_string()));
    desk.focus_on(field);

    assert_eq!(desk.resolve_tip(field), Some("form help"));
    let status = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().status().to_string())
        .unwrap();
    assert_eq!(status, "form help");

    desk.set_tip(field, Some("field help".to_string()));
    let status = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.compositor().status().to_string())
        .unwrap();
    assert_eq!(status, "field help");
}

#[test]
fn widget_mut_downcasts_to_the_concrete_type() {
    struct Counter(u32);
    impl Widget for Counter {}

    let mut desk = desktop();
    let root = desk.root();
    let id = desk.create(Some(root), Rect::new(0, 0, 1, 1), Counter(1)).unwrap();
    desk.widget_mut::<Counter>(id).unwrap().0 += 1;
    assert!(desk.widget_mut::<Container>(id).is_none());

    let seen = desk.with_widget(id, |c: &mut Counter, d| {
        c.0 += 1;
        d.focus()
    });
    assert_eq!(seen, Some(root));
    assert_eq!(desk.widget_mut::<Counter>(id).unwrap().0, 3);
}

#[test]
fn draw_writes_into_the_node_surface() {
    let mut desk = desktop();
    let root = desk.root();
    let id = desk.create(Some(root), Rect::new(3, 2, 5, 1), Container).unwrap();
    let before = composes(&desk);

    desk.draw(id, |c| c.put_str(Pos::new(0, 0), "hello", Style::new()))
        .unwrap();
    assert!(desk.flush().unwrap());
    assert_eq!(composes(&desk), before + 1);
    let row = desk
        .screen()
        .inspect(|h: &HeadlessBackend| h.frame().row_text(2))
        .unwrap();
    assert_eq!(&row[3..8], "hello");
}

#[test]
fn register_shortcuts_reports_dropped_bindings() {
    fn noop(_d: &mut Desktop, _id: NodeId, _k: Key) -> crate::ui::core::behavior::Outcome {
        crate::ui::core::behavior::Outcome::Continue
    }

    let mut desk = desktop();
    let root = desk.root();
    let id = desk.create(Some(root), Rect::new(0, 0, 1, 1), Container).unwrap();
    // Seven default bindings are already present.
    let bindings: Vec<(Key, ShortcutHandler)> = (0..26u8)
        .map(|i| (Key::char(char::from(b'a' + i)), noop as ShortcutHandler))
        .collect();
    assert_eq!(desk.register_shortcuts(id, &bindings), 1);
    assert!(desk.node(id).unwrap().shortcuts.is_full());
}
