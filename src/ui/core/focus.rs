//! Focus transfer and tab order.
//!
//! Tab order is a pre-order walk over visible tab stops. A walk never climbs
//! out of an always-top node and never wraps past the root; when there is
//! nothing further the starting node comes back, and the dispatcher decides
//! whether to wrap or alert.

use super::desktop::{Desktop, FocusNote};
use super::id::NodeId;
use super::node::NodeFlags;
use super::tree::WidgetTree;

impl Desktop {
    pub fn lca(&self, a: NodeId, b: NodeId) -> NodeId {
        self.tree.lca(a, b)
    }

    /// Move focus to `target`.
    ///
    /// The losing path (old focus up to the common ancestor, exclusive) is
    /// blurred leaf first, deleting delete-on-blur nodes on the way. Then the
    /// gaining path is focused from the ancestor outward: each node gets a
    /// fresh focus time, its surface raised and its editing flag set.
    ///
    /// Returns `false` if `target` is not attached to the tree.
    pub fn focus_on(&mut self, target: NodeId) -> bool {
        if !self.tree.is_attached(target) {
            return false;
        }
        let old = self.focus;
        let ancestor = self.tree.lca(target, old);

        for id in self.tree.path_up(old, ancestor) {
            let Some(node) = self.tree.get_mut(id) else {
                continue;
            };
            node.flags.set(NodeFlags::EDITING, false);
            tracing::trace!(node = ?id, "blur");
            self.notify_focus(id, FocusNote::Blur);
            if self.tree.get(id).is_some_and(|n| n.is_delete_on_blur()) {
                self.delete(id);
            }
        }

        // A blur callback may have removed the target or the ancestor.
        let ancestor = if self.tree.is_attached(ancestor) {
            ancestor
        } else {
            self.root()
        };
        let target = if self.tree.is_attached(target) {
            target
        } else {
            tracing::debug!(node = ?target, "focus target vanished during blur");
            ancestor
        };

        self.set_focus_pointer(target);

        let mut gain = self.tree.path_up(target, ancestor);
        gain.reverse();
        for id in gain {
            self.focus_clock += 1;
            let stamp = self.focus_clock;
            let Some(node) = self.tree.get_mut(id) else {
                continue;
            };
            node.focus_time = stamp;
            node.flags.set(NodeFlags::EDITING, true);
            if let Err(err) = self.screen.with(|b| b.raise(id)) {
                tracing::warn!(node = ?id, error = %err, "raise failed");
            }
            self.dirty += 1;
            tracing::trace!(node = ?id, focus_time = stamp, "focus");
            self.notify_focus(id, FocusNote::Focus);
        }
        tracing::debug!(from = ?old, to = ?self.focus, "focus moved");
        true
    }

    /// Next tab stop after `id`, or `id` itself if there is none.
    pub fn tab_next(&self, id: NodeId) -> NodeId {
        tab_next(&self.tree, id)
    }

    /// Previous tab stop before `id`, or `id` itself if there is none.
    pub fn tab_prev(&self, id: NodeId) -> NodeId {
        tab_prev(&self.tree, id)
    }

    /// Like [`Desktop::tab_next`], wrapping to the first stop of the
    /// enclosing boundary when configured to.
    pub(crate) fn next_stop(&self, id: NodeId) -> NodeId {
        let next = tab_next(&self.tree, id);
        if next != id || !self.config.wrap_tab_order {
            return next;
        }
        first_stop_below(&self.tree, boundary_of(&self.tree, id)).unwrap_or(id)
    }

    pub(crate) fn prev_stop(&self, id: NodeId) -> NodeId {
        let prev = tab_prev(&self.tree, id);
        if prev != id || !self.config.wrap_tab_order {
            return prev;
        }
        last_stop_below(&self.tree, boundary_of(&self.tree, id)).unwrap_or(id)
    }
}

fn is_stop(tree: &WidgetTree, id: NodeId) -> bool {
    tree.get(id)
        .is_some_and(|n| n.is_tab_stop() && !n.is_hidden())
}

fn is_hidden(tree: &WidgetTree, id: NodeId) -> bool {
    tree.get(id).map_or(true, |n| n.is_hidden())
}

/// First visible tab stop strictly below `id`, in pre-order.
pub fn first_stop_below(tree: &WidgetTree, id: NodeId) -> Option<NodeId> {
    for child in tree.children(id) {
        if is_hidden(tree, child) {
            continue;
        }
        if is_stop(tree, child) {
            return Some(child);
        }
        if let Some(found) = first_stop_below(tree, child) {
            return Some(found);
        }
    }
    None
}

/// Last visible tab stop in the subtree of `id`, `id` included. Deeper
/// stops win over their ancestors.
pub fn last_stop_in(tree: &WidgetTree, id: NodeId) -> Option<NodeId> {
    if is_hidden(tree, id) {
        return None;
    }
    last_stop_below(tree, id).or_else(|| is_stop(tree, id).then_some(id))
}

/// Last visible tab stop strictly below `id`.
pub fn last_stop_below(tree: &WidgetTree, id: NodeId) -> Option<NodeId> {
    let children: Vec<NodeId> = tree.children(id).collect();
    children
        .into_iter()
        .rev()
        .find_map(|child| last_stop_in(tree, child))
}

pub fn tab_next(tree: &WidgetTree, id: NodeId) -> NodeId {
    if let Some(found) = first_stop_below(tree, id) {
        return found;
    }
    let mut cur = id;
    loop {
        let Some(node) = tree.get(cur) else {
            return id;
        };
        if cur == tree.root() || node.is_always_top() {
            return id;
        }
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if !is_hidden(tree, s) {
                if is_stop(tree, s) {
                    return s;
                }
                if let Some(found) = first_stop_below(tree, s) {
                    return found;
                }
            }
            sibling = tree.get(s).and_then(|n| n.next_sibling());
        }
        match tree.parent(cur) {
            Some(parent) => cur = parent,
            None => return id,
        }
    }
}

pub fn tab_prev(tree: &WidgetTree, id: NodeId) -> NodeId {
    let mut cur = id;
    loop {
        let Some(node) = tree.get(cur) else {
            return id;
        };
        if cur == tree.root() || node.is_always_top() {
            return id;
        }
        let mut sibling = node.prev_sibling();
        while let Some(s) = sibling {
            if let Some(found) = last_stop_in(tree, s) {
                return found;
            }
            sibling = tree.get(s).and_then(|n| n.prev_sibling());
        }
        let Some(parent) = tree.parent(cur) else {
            return id;
        };
        if parent != tree.root() && is_stop(tree, parent) {
            return parent;
        }
        cur = parent;
    }
}

/// The always-top node enclosing `id` (itself included), or the root.
fn boundary_of(tree: &WidgetTree, id: NodeId) -> NodeId {
    tree.ancestors_inclusive(id)
        .find(|&n| tree.get(n).is_some_and(|node| node.is_always_top()))
        .unwrap_or_else(|| tree.root())
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/focus.rs"]
mod tests;
