//! The widget core: tree, focus, dispatch and repaint coordination.

pub mod behavior;
pub mod desktop;
pub mod dispatch;
pub mod focus;
pub mod geom;
pub mod id;
pub mod node;
pub mod refresh;
pub mod screen;
pub mod shortcuts;
pub mod style;
pub mod tree;

pub use behavior::{Container, Editable, Focusable, Hideable, MousePressable, Movable, Outcome, Widget};
pub use desktop::Desktop;
pub use dispatch::Flow;
pub use geom::{Pos, Rect};
pub use id::NodeId;
pub use node::{Node, NodeFlags};
pub use screen::{RefreshSignal, Screen};
pub use shortcuts::{exit_next, exit_prev, ShortcutHandler, ShortcutTable, MAX_SHORTCUTS};
pub use style::{Color, Mod, Style};
pub use tree::WidgetTree;
