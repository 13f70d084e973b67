//! Batched repaint.
//!
//! Mutations only bump the dirty counter. After each input event the loop
//! calls [`Desktop::flush`], which runs pending per-node redraws (parents
//! before children) and then composes the screen at most once.

use super::desktop::Desktop;
use super::id::NodeId;
use super::node::NodeFlags;
use crate::error::Result;

/// Dirty level that owes no repaint.
pub const REFRESH_BASELINE: u32 = 1;

impl Desktop {
    /// Note that something visible changed.
    pub fn request_refresh(&mut self) {
        self.dirty = self.dirty.saturating_add(1);
    }

    /// Ask for `id`'s redraw callback to run before the next repaint.
    pub fn request_redraw(&mut self, id: NodeId) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        node.flags.set(NodeFlags::REDRAW, true);
        self.redraw_requested = self.redraw_requested.saturating_add(1);
        self.request_refresh();
        true
    }

    pub fn dirty(&self) -> u32 {
        self.dirty
    }

    pub fn needs_flush(&self) -> bool {
        self.dirty > REFRESH_BASELINE
            || self.redraw_requested > 0
            || self.refresh_signal.is_raised()
    }

    /// Run pending redraws and compose once if anything is owed. Returns
    /// whether a repaint happened.
    pub fn flush(&mut self) -> Result<bool> {
        let mut redrawn = false;
        if self.redraw_requested > 0 {
            self.redraw_requested = 0;
            for id in self.tree.preorder(self.root()) {
                let flagged = match self.tree.get_mut(id) {
                    Some(node) if node.has(NodeFlags::REDRAW) => {
                        node.flags.set(NodeFlags::REDRAW, false);
                        true
                    }
                    _ => false,
                };
                if flagged {
                    self.with_checked_out(id, |w, desk| w.redraw(desk, id));
                    redrawn = true;
                }
            }
        }

        let signalled = self.refresh_signal.take();
        if self.dirty <= REFRESH_BASELINE && !redrawn && !signalled {
            return Ok(false);
        }
        self.dirty = REFRESH_BASELINE;
        self.screen.with(|b| b.compose())?;
        tracing::trace!(redrawn, signalled, "screen composed");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/refresh.rs"]
mod tests;
