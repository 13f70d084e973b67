use std::ops::{BitOr, BitOrAssign};

use super::behavior::Widget;
use super::geom::Rect;
use super::id::NodeId;
use super::shortcuts::ShortcutTable;
use super::style::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    /// Reachable by tab navigation.
    pub const TAB_STOP: Self = Self(1 << 0);
    pub const HIDDEN: Self = Self(1 << 1);
    /// Currently receiving input.
    pub const EDITING: Self = Self(1 << 2);
    /// Removed as soon as focus leaves it.
    pub const DELETE_ON_BLUR: Self = Self(1 << 3);
    /// Tab navigation does not climb out of this subtree.
    pub const ALWAYS_TOP: Self = Self(1 << 4);
    pub const REDRAW: Self = Self(1 << 5);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn set(&mut self, flag: Self, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for NodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NodeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One element of the widget tree.
///
/// Tree links are arena handles. A node whose `parent` is itself is either the
/// root or a subtree that has been detached.
pub struct Node {
    pub(crate) parent: NodeId,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,

    /// Absolute screen rectangle.
    pub rect: Rect,
    pub flags: NodeFlags,
    pub focus_time: u64,
    pub tip: Option<String>,
    pub shortcuts: ShortcutTable,
    pub bkg: Style,
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl Node {
    pub fn new(rect: Rect) -> Self {
        Self {
            parent: NodeId::default(),
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            rect,
            flags: NodeFlags::NONE,
            focus_time: 0,
            tip: None,
            shortcuts: ShortcutTable::new(),
            bkg: Style::new(),
            widget: None,
        }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn has(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_hidden(&self) -> bool {
        self.has(NodeFlags::HIDDEN)
    }

    pub fn is_editing(&self) -> bool {
        self.has(NodeFlags::EDITING)
    }

    pub fn is_tab_stop(&self) -> bool {
        self.has(NodeFlags::TAB_STOP)
    }

    pub fn is_always_top(&self) -> bool {
        self.has(NodeFlags::ALWAYS_TOP)
    }

    pub fn is_delete_on_blur(&self) -> bool {
        self.has(NodeFlags::DELETE_ON_BLUR)
    }

    /// False while the widget is checked out for a callback.
    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("parent", &self.parent)
            .field("rect", &self.rect)
            .field("flags", &self.flags)
            .field("focus_time", &self.focus_time)
            .field("tip", &self.tip)
            .field("shortcuts", &self.shortcuts)
            .finish_non_exhaustive()
    }
}
