//! Input routing.
//!
//! One input event is handled to completion before the next: the focused
//! node's shortcut table gets the first look, then its `Editable` widget.
//! Exit outcomes then move focus along the tab order or to the node under the
//! pointer.

use crate::core::event::{InputEvent, Key, KeyCode, KeyModifiers, MouseEvent, MouseEventKind};

use super::behavior::Outcome;
use super::desktop::Desktop;
use super::geom::Pos;
use super::id::NodeId;
use super::node::NodeFlags;

/// Whether the loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Desktop {
    pub fn handle_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Interrupt => return Flow::Quit,
            InputEvent::Key(key) if key.is_interrupt() => return Flow::Quit,
            InputEvent::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                if let Err(err) = self.screen.with(|b| b.resize(width, height)) {
                    tracing::warn!(error = %err, "resize failed");
                }
                self.request_refresh();
            }
            InputEvent::Key(key) => self.dispatch_key(key),
            InputEvent::Mouse(mouse) => self.dispatch_mouse(mouse),
            InputEvent::Paste(text) => {
                for ch in text.chars() {
                    self.dispatch_key(Key::char(ch));
                }
            }
            InputEvent::FocusGained | InputEvent::FocusLost => {}
        }
        if self.quit_requested() {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// Deliver one key to the focus and act on the outcome.
    pub fn dispatch_key(&mut self, key: Key) {
        if key.is_function_key() {
            self.route_function_key(key);
        }
        let outcome = self.deliver_key(self.focus, key);
        self.settle(outcome);
    }

    /// Function keys go to the nearest node on the focus path (root excluded)
    /// whose table has the key; that node takes focus first. Unclaimed keys
    /// send focus to the root.
    fn route_function_key(&mut self, key: Key) {
        let root = self.root();
        let claimant = self
            .tree
            .ancestors_inclusive(self.focus)
            .take_while(|&n| n != root)
            .find(|&n| self.tree.get(n).is_some_and(|node| node.shortcuts.contains(&key)));
        tracing::trace!(?key, claimant = ?claimant, "function key");
        self.focus_on(claimant.unwrap_or(root));
    }

    /// Shortcut table first, then the widget's edit handler.
    fn deliver_key(&mut self, id: NodeId, key: Key) -> Outcome {
        let Some(node) = self.tree.get(id) else {
            return Outcome::Continue;
        };
        if let Some(handler) = node.shortcuts.lookup(&key) {
            return handler(self, id, key);
        }
        self.with_checked_out(id, |w, desk| {
            w.as_editable().map(|e| e.edit(desk, id, key))
        })
        .flatten()
        .unwrap_or(Outcome::Continue)
    }

    fn mouse_press(&mut self, id: NodeId, pos: Pos) -> Outcome {
        self.with_checked_out(id, |w, desk| {
            w.as_mouse_pressable().map(|m| m.mouse_press(desk, id, pos))
        })
        .flatten()
        .unwrap_or(Outcome::Continue)
    }

    /// After a handler ran: leave the focus if it asked to or stopped editing.
    fn settle(&mut self, outcome: Outcome) {
        let focus = self.focus;
        let editing = self.tree.get(focus).is_some_and(|n| n.is_editing());
        if outcome.is_exit() || !editing {
            self.exit(focus, outcome);
        }
    }

    fn exit(&mut self, current: NodeId, outcome: Outcome) {
        let target = match outcome {
            Outcome::ExitMouse => self
                .pointer
                .and_then(|pos| self.tree.hit_test(self.root(), pos)),
            Outcome::ExitPrev => Some(self.prev_stop(current)),
            Outcome::ExitNext | Outcome::Continue => Some(self.next_stop(current)),
        };

        match target {
            Some(target) if target != current => {
                self.focus_on(target);
                if outcome == Outcome::ExitMouse {
                    if let Some(pos) = self.pointer {
                        let result = self.mouse_press(target, pos);
                        tracing::trace!(node = ?target, ?result, "mouse press after exit");
                    }
                }
            }
            _ => {
                if let Some(node) = self.tree.get_mut(current) {
                    node.flags.set(NodeFlags::EDITING, true);
                }
                self.alert();
            }
        }
    }

    pub fn dispatch_mouse(&mut self, mouse: MouseEvent) {
        let pos = Pos::new(mouse.column, mouse.row);
        let prev = self.pointer.replace(pos);
        match mouse.kind {
            MouseEventKind::ScrollUp => self.dispatch_key(Key::simple(KeyCode::Up)),
            MouseEventKind::ScrollDown => self.dispatch_key(Key::simple(KeyCode::Down)),
            MouseEventKind::Drag(_) => {
                if !self.config.mouse_drag_keys {
                    return;
                }
                let Some(prev) = prev else {
                    return;
                };
                for key in drag_keys(prev, pos) {
                    self.dispatch_key(key);
                }
            }
            MouseEventKind::Down(_) => self.click(pos),
            MouseEventKind::Up(_)
            | MouseEventKind::Moved
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => {}
        }
    }

    /// Resolve a click inside the focus subtree; outside it, the click is an
    /// exit to whatever lies under the pointer.
    fn click(&mut self, pos: Pos) {
        let outcome = match self.tree.hit_test(self.focus, pos) {
            None => Outcome::ExitMouse,
            Some(hit) => {
                if hit != self.focus {
                    self.focus_on(hit);
                }
                self.mouse_press(hit, pos)
            }
        };
        self.settle(outcome);
    }

    /// Hit test from the root.
    pub fn node_at(&self, pos: Pos) -> Option<NodeId> {
        self.tree.hit_test(self.root(), pos)
    }
}

/// Ctrl+arrow keys for a pointer drag: horizontal first, then vertical.
fn drag_keys(prev: Pos, pos: Pos) -> Vec<Key> {
    let mut keys = Vec::with_capacity(2);
    if prev.x != pos.x {
        let code = if prev.x > pos.x { KeyCode::Left } else { KeyCode::Right };
        keys.push(Key::new(code, KeyModifiers::CONTROL));
    }
    if prev.y != pos.y {
        let code = if prev.y > pos.y { KeyCode::Up } else { KeyCode::Down };
        keys.push(Key::new(code, KeyModifiers::CONTROL));
    }
    keys
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/dispatch.rs"]
mod tests;
