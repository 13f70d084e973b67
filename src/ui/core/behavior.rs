//! Widget capabilities.
//!
//! A node may carry one boxed [`Widget`]. The widget opts into each capability
//! by returning `Some(self)` from the matching accessor; everything else is a
//! no-op default, so a plain container is just `impl Widget for Panel {}`.
//!
//! Every callback receives the desktop and the node's own id. The widget is
//! checked out of its node for the duration of the call, so a callback can
//! freely mutate the tree, including deleting its own node.

use std::any::Any;

use super::desktop::Desktop;
use super::geom::Pos;
use super::id::NodeId;
use crate::core::event::Key;
use crate::error::WidgetError;

/// What a handler wants the dispatcher to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// Keep editing the current node.
    #[default]
    Continue,
    /// Leave the node; focus the next tab stop.
    ExitNext,
    /// Leave the node; focus the previous tab stop.
    ExitPrev,
    /// Leave the node; focus whatever is under the pointer.
    ExitMouse,
}

impl Outcome {
    pub fn is_exit(self) -> bool {
        self != Outcome::Continue
    }
}

pub trait Focusable {
    fn on_focus(&mut self, _desk: &mut Desktop, _id: NodeId) {}

    fn on_blur(&mut self, _desk: &mut Desktop, _id: NodeId) {}
}

pub trait Movable {
    /// Called before the node's rectangle is shifted by the delta.
    fn on_move(&mut self, desk: &mut Desktop, id: NodeId, d_row: i32, d_col: i32);
}

pub trait Hideable {
    fn on_hide(&mut self, desk: &mut Desktop, id: NodeId, hidden: bool);
}

/// Receives keys that no shortcut claimed.
pub trait Editable {
    fn edit(&mut self, desk: &mut Desktop, id: NodeId, key: Key) -> Outcome;
}

pub trait MousePressable {
    fn mouse_press(&mut self, desk: &mut Desktop, id: NodeId, pos: Pos) -> Outcome;
}

pub trait Widget: Any {
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    fn as_movable(&mut self) -> Option<&mut dyn Movable> {
        None
    }

    fn as_hideable(&mut self) -> Option<&mut dyn Hideable> {
        None
    }

    fn as_editable(&mut self) -> Option<&mut dyn Editable> {
        None
    }

    fn as_mouse_pressable(&mut self) -> Option<&mut dyn MousePressable> {
        None
    }

    /// Runs after the batched flush when [`Desktop::request_redraw`] was called
    /// for this node.
    fn redraw(&mut self, _desk: &mut Desktop, _id: NodeId) {}

    /// Last notice before teardown; children are already gone.
    fn pre_destroy(&mut self, _desk: &mut Desktop, _id: NodeId) -> Result<(), WidgetError> {
        Ok(())
    }

    /// The node is unlinked and its surface released. Consumes the widget.
    fn destroy(self: Box<Self>, _desk: &mut Desktop, _id: NodeId) -> Result<(), WidgetError> {
        Ok(())
    }
}

/// A widget with no behavior of its own, for plain containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container;

impl Widget for Container {}

pub(crate) fn downcast_mut<T: Widget>(widget: &mut dyn Widget) -> Option<&mut T> {
    let any: &mut dyn Any = widget;
    any.downcast_mut::<T>()
}
