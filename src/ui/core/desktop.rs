//! The desktop: root node plus all process-wide toolkit state.
//!
//! There is no ambient state. Every operation goes through a `&mut Desktop`,
//! which the event loop owns. Focus, tab order, dispatch and the refresh
//! coordinator are further `impl Desktop` blocks in sibling modules.

use crate::config::DesktopConfig;
use crate::core::event::{Key, KeyCode};
use crate::core::input::InputSource;
use crate::error::{DesktopError, Result};
use crate::ui::backend::{Backend, Canvas};

use super::behavior::{downcast_mut, Widget};
use super::dispatch::Flow;
use super::geom::{Pos, Rect};
use super::id::NodeId;
use super::node::{Node, NodeFlags};
use super::refresh::REFRESH_BASELINE;
use super::screen::{RefreshSignal, Screen};
use super::shortcuts::{exit_prev, ShortcutHandler, DEFAULT_NAVIGATION};
use super::style::Style;
use super::tree::WidgetTree;

pub struct Desktop {
    pub(crate) tree: WidgetTree,
    pub(crate) focus: NodeId,
    pub(crate) focus_clock: u64,
    pub(crate) dirty: u32,
    pub(crate) redraw_requested: u32,
    pub(crate) screen: Screen,
    pub(crate) refresh_signal: RefreshSignal,
    pub(crate) config: DesktopConfig,
    /// Last reported pointer position, for drag deltas and mouse exits.
    pub(crate) pointer: Option<Pos>,
    /// Nodes whose widget is currently out for one of its own callbacks.
    checked_out: Vec<NodeId>,
    /// Focus notifications owed to checked-out widgets, in order.
    owed_focus: Vec<(NodeId, FocusNote)>,
    /// Teardowns held back until checked-out descendants are back.
    postponed: Vec<Postponed>,
    quit_requested: bool,
    closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusNote {
    Blur,
    Focus,
}

struct Postponed {
    id: NodeId,
    widget: Box<dyn Widget>,
    waiting_on: Vec<NodeId>,
}

impl Desktop {
    pub fn new<B: Backend + Send>(backend: B, config: DesktopConfig) -> Result<Self> {
        Self::with_screen(Screen::new(backend), config)
    }

    /// Build on an existing screen handle, so other threads can share it.
    pub fn with_screen(screen: Screen, config: DesktopConfig) -> Result<Self> {
        let area = screen.with(|b| b.size());
        let mut tree = WidgetTree::new(area);
        let root = tree.root();
        if let Some(node) = tree.get_mut(root) {
            node.flags = NodeFlags::EDITING;
            node.tip = Some(config.root_tip.clone());
            node.shortcuts.extend(&DEFAULT_NAVIGATION);
        }

        screen.with(|b| {
            b.create_surface(root, None, area, Style::new())?;
            b.set_status(&config.root_tip);
            Ok::<_, DesktopError>(())
        })?;
        tracing::debug!(?area, "desktop created");

        Ok(Self {
            tree,
            focus: root,
            focus_clock: 0,
            dirty: REFRESH_BASELINE,
            redraw_requested: 0,
            screen,
            refresh_signal: RefreshSignal::new(),
            config,
            pointer: None,
            checked_out: Vec::new(),
            owed_focus: Vec::new(),
            postponed: Vec::new(),
            quit_requested: false,
            closed: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The focused leaf. Never stale: deleting it moves focus to its parent.
    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// A handle other threads can raise to request a repaint.
    pub fn refresh_signal(&self) -> RefreshSignal {
        self.refresh_signal.clone()
    }

    pub fn focus_clock(&self) -> u64 {
        self.focus_clock
    }

    pub fn pointer(&self) -> Option<Pos> {
        self.pointer
    }

    /// Create a node under `parent` (default: the current focus).
    ///
    /// `rect` is relative to the parent's origin. The node starts out as a tab
    /// stop with the default navigation shortcuts and the parent's background.
    pub fn create<W: Widget>(
        &mut self,
        parent: Option<NodeId>,
        rect: Rect,
        widget: W,
    ) -> Result<NodeId> {
        self.create_styled(parent, rect, Style::new(), widget)
    }

    /// Like [`Desktop::create`], with `style` layered over the inherited
    /// background.
    pub fn create_styled<W: Widget>(
        &mut self,
        parent: Option<NodeId>,
        rect: Rect,
        style: Style,
        widget: W,
    ) -> Result<NodeId> {
        let parent = parent.unwrap_or(self.focus);
        let origin = self
            .tree
            .get(parent)
            .ok_or(DesktopError::UnknownNode(parent))?
            .rect
            .origin();

        let mut node = Node::new(rect.offset_by(origin));
        node.flags = NodeFlags::TAB_STOP;
        node.bkg = style;
        node.shortcuts.extend(&DEFAULT_NAVIGATION);
        node.widget = Some(Box::new(widget));
        self.attach(Some(parent), node)
    }

    /// Link a prepared node (absolute geometry) as the last child of `parent`
    /// and allocate its surface. On failure nothing stays linked.
    pub fn attach(&mut self, parent: Option<NodeId>, mut node: Node) -> Result<NodeId> {
        let parent = parent.unwrap_or(self.focus);
        let inherited = self
            .tree
            .get(parent)
            .ok_or(DesktopError::UnknownNode(parent))?
            .bkg;
        node.bkg = inherited.patch(node.bkg);
        self.focus_clock += 1;
        node.focus_time = self.focus_clock;
        let (rect, style) = (node.rect, node.bkg);

        let id = self
            .tree
            .insert(parent, node)
            .ok_or(DesktopError::UnknownNode(parent))?;
        if let Err(err) = self
            .screen
            .with(|b| b.create_surface(id, Some(parent), rect, style))
        {
            tracing::warn!(node = ?id, ?rect, error = %err, "surface allocation failed");
            self.tree.remove(id);
            return Err(err.into());
        }

        self.dirty += 1;
        tracing::trace!(node = ?id, parent = ?parent, ?rect, "node attached");
        Ok(id)
    }

    /// Open a transient node under the current focus and focus it. It goes
    /// away as soon as focus leaves; Enter leaves it backwards.
    pub fn popup<W: Widget>(&mut self, rect: Rect, widget: W) -> Result<NodeId> {
        let id = self.create(None, rect, widget)?;
        if let Some(node) = self.tree.get_mut(id) {
            node.flags.set(NodeFlags::DELETE_ON_BLUR, true);
            node.shortcuts.insert(Key::simple(KeyCode::Enter), exit_prev);
        }
        self.focus_on(id);
        Ok(id)
    }

    /// Delete `id` and its subtree. Returns `false` for the root or a handle
    /// that is already gone.
    pub fn delete(&mut self, id: NodeId) -> bool {
        if id == self.root() || !self.tree.contains(id) {
            return false;
        }
        let parent = self.tree.parent(id).unwrap_or(self.root());
        if self.tree.is_ancestor_of(id, self.focus) {
            self.set_focus_pointer(parent);
        }
        self.tree.detach(id);
        self.destroy_subtree(id, parent);
        self.dirty += 1;
        tracing::debug!(node = ?id, "node deleted");
        true
    }

    /// Destroy a detached subtree, children strictly before parents. Callback
    /// errors are logged and do not stop the teardown.
    ///
    /// A node whose widget is checked out gets its callbacks when the widget
    /// comes back; its ancestors in the subtree wait for that.
    fn destroy_subtree(&mut self, top: NodeId, fallback: NodeId) {
        let order = self.tree.postorder(top);
        let busy: Vec<NodeId> = order
            .iter()
            .copied()
            .filter(|id| self.checked_out.contains(id))
            .collect();
        let waits: Vec<Vec<NodeId>> = order
            .iter()
            .map(|&id| {
                busy.iter()
                    .copied()
                    .filter(|&b| b != id && self.tree.is_ancestor_of(id, b))
                    .collect()
            })
            .collect();

        for (id, waiting_on) in order.into_iter().zip(waits) {
            if !self.tree.contains(id) {
                continue;
            }
            let mut widget = self.tree.get_mut(id).and_then(|n| n.widget.take());
            let postpone = !waiting_on.is_empty();
            if !postpone {
                if let Some(w) = widget.as_mut() {
                    if let Err(err) = w.pre_destroy(self, id) {
                        tracing::warn!(node = ?id, error = %err, "pre-destroy failed");
                    }
                }
            }

            // Children a callback attached after the walk started.
            let late: Vec<NodeId> = self.tree.children(id).collect();
            for child in late {
                self.tree.detach(child);
                self.destroy_subtree(child, fallback);
            }

            if self.tree.is_ancestor_of(id, self.focus) {
                self.set_focus_pointer(fallback);
            }
            self.tree.remove(id);
            if let Err(err) = self.screen.with(|b| b.destroy_surface(id)) {
                tracing::debug!(node = ?id, error = %err, "surface already gone");
            }

            match widget {
                Some(widget) if postpone => {
                    tracing::debug!(node = ?id, waiting_on = ?waiting_on, "teardown postponed");
                    self.postponed.push(Postponed {
                        id,
                        widget,
                        waiting_on,
                    });
                }
                Some(w) => {
                    if let Err(err) = w.destroy(self, id) {
                        tracing::warn!(node = ?id, error = %err, "destroy failed");
                    }
                }
                None => {}
            }
        }
    }

    /// `pre_destroy` then `destroy` for a widget whose node is already gone.
    fn finish_widget(&mut self, id: NodeId, mut widget: Box<dyn Widget>) {
        if let Err(err) = widget.pre_destroy(self, id) {
            tracing::warn!(node = ?id, error = %err, "pre-destroy failed");
        }
        if let Err(err) = widget.destroy(self, id) {
            tracing::warn!(node = ?id, error = %err, "destroy failed");
        }
    }

    /// `returned` finished its teardown; run every postponed teardown that
    /// was only waiting on it, in queue order.
    fn release_postponed(&mut self, returned: NodeId) {
        for p in &mut self.postponed {
            p.waiting_on.retain(|&n| n != returned);
        }
        while let Some(pos) = self.postponed.iter().position(|p| p.waiting_on.is_empty()) {
            let Postponed { id, widget, .. } = self.postponed.remove(pos);
            self.finish_widget(id, widget);
        }
    }

    /// Tear the whole tree down from the root. Best effort; never fails.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        let root = self.root();
        self.set_focus_pointer(root);
        let children: Vec<NodeId> = self.tree.children(root).collect();
        for child in children {
            self.tree.detach(child);
            self.destroy_subtree(child, root);
        }

        let widget = self.tree.get_mut(root).and_then(|n| n.widget.take());
        if let Some(w) = widget {
            self.finish_widget(root, w);
        }
        if let Err(err) = self.screen.with(|b| b.destroy_surface(root)) {
            tracing::debug!(error = %err, "root surface already gone");
        }
        self.closed = true;
        tracing::info!("desktop torn down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Give the root a widget of its own, replacing any previous one.
    pub fn set_root_widget<W: Widget>(&mut self, widget: W) {
        let root = self.root();
        if let Some(node) = self.tree.get_mut(root) {
            node.widget = Some(Box::new(widget));
        }
    }

    /// Shift `id` and its subtree. Each `Movable` widget hears about it
    /// before its own rectangle changes.
    ///
    /// The delta is clamped once for the whole subtree so every node stays
    /// on screen coordinates and the layout inside the subtree is kept; the
    /// widgets hear the clamped delta.
    pub fn move_by(&mut self, id: NodeId, d_row: i32, d_col: i32) -> bool {
        if !self.tree.contains(id) {
            return false;
        }
        let subtree = self.tree.preorder(id);
        let (d_row, d_col) = self.clamp_shift(&subtree, d_row, d_col);
        if (d_row, d_col) == (0, 0) {
            return true;
        }
        for n in subtree {
            self.with_checked_out(n, |w, desk| {
                if let Some(m) = w.as_movable() {
                    m.on_move(desk, n, d_row, d_col);
                }
            });
            let Some(node) = self.tree.get_mut(n) else {
                continue;
            };
            node.rect = node.rect.translate(d_row, d_col);
            let rect = node.rect;
            if let Err(err) = self.screen.with(|b| b.move_surface(n, rect)) {
                tracing::warn!(node = ?n, error = %err, "move failed");
            }
        }
        self.dirty += 1;
        true
    }

    fn clamp_shift(&self, nodes: &[NodeId], d_row: i32, d_col: i32) -> (i32, i32) {
        let max = i32::from(u16::MAX);
        let (mut lo_x, mut hi_x, mut lo_y, mut hi_y) = (max, 0, max, 0);
        for rect in nodes.iter().filter_map(|&n| self.tree.get(n)).map(|n| n.rect) {
            lo_x = lo_x.min(i32::from(rect.x));
            hi_x = hi_x.max(i32::from(rect.x));
            lo_y = lo_y.min(i32::from(rect.y));
            hi_y = hi_y.max(i32::from(rect.y));
        }
        (d_row.clamp(-lo_y, max - hi_y), d_col.clamp(-lo_x, max - hi_x))
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        node.flags.set(NodeFlags::HIDDEN, hidden);
        if let Err(err) = self.screen.with(|b| b.set_hidden(id, hidden)) {
            tracing::warn!(node = ?id, error = %err, "hide failed");
        }
        self.with_checked_out(id, |w, desk| {
            if let Some(h) = w.as_hideable() {
                h.on_hide(desk, id, hidden);
            }
        });
        self.dirty += 1;
        true
    }

    pub fn set_tab_stop(&mut self, id: NodeId, on: bool) -> bool {
        self.set_flag(id, NodeFlags::TAB_STOP, on)
    }

    /// Make `id` a modal boundary for tab navigation.
    pub fn set_always_top(&mut self, id: NodeId, on: bool) -> bool {
        self.set_flag(id, NodeFlags::ALWAYS_TOP, on)
    }

    pub fn set_delete_on_blur(&mut self, id: NodeId, on: bool) -> bool {
        self.set_flag(id, NodeFlags::DELETE_ON_BLUR, on)
    }

    fn set_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool) -> bool {
        match self.tree.get_mut(id) {
            Some(node) => {
                node.flags.set(flag, on);
                true
            }
            None => false,
        }
    }

    /// Set the status line text shown while `id` or a descendant is focused.
    pub fn set_tip(&mut self, id: NodeId, tip: Option<String>) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        node.tip = tip;
        if self.tree.is_ancestor_of(id, self.focus) {
            self.refresh_status();
        }
        true
    }

    /// Register shortcuts on `id`. Returns how many were dropped because the
    /// table was full.
    pub fn register_shortcuts(&mut self, id: NodeId, bindings: &[(Key, ShortcutHandler)]) -> usize {
        let Some(node) = self.tree.get_mut(id) else {
            return bindings.len();
        };
        let dropped = node.shortcuts.extend(bindings);
        if dropped > 0 {
            tracing::warn!(node = ?id, dropped, "shortcut table full");
        }
        dropped
    }

    /// Typed access to a node's widget. `None` while the widget is inside one
    /// of its own callbacks.
    pub fn widget_mut<T: Widget>(&mut self, id: NodeId) -> Option<&mut T> {
        let widget = self.tree.get_mut(id)?.widget.as_deref_mut()?;
        downcast_mut::<T>(widget)
    }

    /// Run `f` with the node's widget checked out, so `f` may also use the
    /// desktop.
    pub fn with_widget<T: Widget, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T, &mut Desktop) -> R,
    ) -> Option<R> {
        self.with_checked_out(id, |w, desk| downcast_mut::<T>(w).map(|t| f(t, desk)))
            .flatten()
    }

    /// Draw into the node's surface under the screen lock.
    pub fn draw<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Canvas) -> R) -> Option<R> {
        let out = self.screen.with(|b| b.canvas(id).map(f));
        if out.is_some() {
            self.dirty += 1;
        }
        out
    }

    /// Declare that `id` no longer wants input. If it holds focus, the
    /// dispatcher moves on as for exit-next once the current handler returns.
    pub fn end_editing(&mut self, id: NodeId) {
        self.set_flag(id, NodeFlags::EDITING, false);
    }

    /// End the input loop after the current event.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Drive the desktop until the source interrupts or a handler asks to
    /// quit, then tear the tree down.
    pub fn run(&mut self, source: &mut dyn InputSource) -> Result<()> {
        tracing::info!(nodes = self.tree.len(), "desktop loop started");
        let result = self.event_loop(source);
        self.teardown();
        result
    }

    fn event_loop(&mut self, source: &mut dyn InputSource) -> Result<()> {
        self.screen.with(|b| b.compose())?;
        self.dirty = REFRESH_BASELINE;
        loop {
            let event = source.poll(self.config.refresh_delay())?;
            if let Some(event) = event {
                if self.handle_input(event) == Flow::Quit {
                    return Ok(());
                }
            }
            if let Err(err) = self.flush() {
                tracing::error!(error = %err, "repaint failed");
            }
        }
    }

    /// Point focus at `id` without running any callbacks and refresh the
    /// status line.
    pub(crate) fn set_focus_pointer(&mut self, id: NodeId) {
        self.focus = id;
        self.refresh_status();
    }

    /// Nearest tip on the path from `id` to the root.
    pub fn resolve_tip(&self, id: NodeId) -> Option<&str> {
        self.tree
            .ancestors_inclusive(id)
            .find_map(|n| self.tree.get(n).and_then(|node| node.tip.as_deref()))
    }

    pub(crate) fn refresh_status(&mut self) {
        let tip = self.resolve_tip(self.focus).unwrap_or_default().to_string();
        self.screen.with(|b| b.set_status(&tip));
        self.dirty += 1;
    }

    pub(crate) fn alert(&mut self) {
        tracing::debug!(focus = ?self.focus, "alert");
        if self.config.bell {
            self.screen.with(|b| b.bell());
        }
    }

    /// Deliver a blur or focus notification to `id`. A widget that is out
    /// for one of its own callbacks hears about it once it is back.
    pub(crate) fn notify_focus(&mut self, id: NodeId, note: FocusNote) {
        if self.checked_out.contains(&id) {
            tracing::trace!(node = ?id, ?note, "focus notification owed");
            self.owed_focus.push((id, note));
            return;
        }
        self.with_checked_out(id, |w, desk| {
            if let Some(f) = w.as_focusable() {
                match note {
                    FocusNote::Blur => f.on_blur(desk, id),
                    FocusNote::Focus => f.on_focus(desk, id),
                }
            }
        });
    }

    /// Take the widget out of `id`, run `f`, and put it back.
    ///
    /// Focus notifications owed meanwhile are replayed once the widget is
    /// back. If the node was deleted while its widget was out, the widget's
    /// teardown callbacks run here instead, followed by any ancestor
    /// teardowns that were waiting on it.
    pub(crate) fn with_checked_out<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Desktop) -> R,
    ) -> Option<R> {
        let mut widget = self.tree.get_mut(id)?.widget.take()?;
        self.checked_out.push(id);
        let out = f(widget.as_mut(), self);
        if let Some(pos) = self.checked_out.iter().rposition(|&n| n == id) {
            self.checked_out.remove(pos);
        }
        match self.tree.get_mut(id) {
            Some(node) => {
                node.widget = Some(widget);
                let owed: Vec<FocusNote> = self
                    .owed_focus
                    .iter()
                    .filter(|(n, _)| *n == id)
                    .map(|&(_, note)| note)
                    .collect();
                self.owed_focus.retain(|(n, _)| *n != id);
                for note in owed {
                    self.notify_focus(id, note);
                }
            }
            None => {
                self.owed_focus.retain(|(n, _)| *n != id);
                self.finish_widget(id, widget);
                self.release_postponed(id);
            }
        }
        Some(out)
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("nodes", &self.tree.len())
            .field("focus", &self.focus)
            .field("focus_clock", &self.focus_clock)
            .field("dirty", &self.dirty)
            .field("redraw_requested", &self.redraw_requested)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/desktop.rs"]
mod tests;
