//! tdesk - a retained-mode widget core for character-cell terminals.
//!
//! Modules:
//! - core: input vocabulary (keys, mouse, events) and input sources
//! - ui::core: widget tree, focus, dispatch, batched repaint
//! - ui::backend: compositor, headless and terminal backends
//! - tui: crossterm/ratatui integration (feature `tui`)

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
#[cfg(feature = "tui")]
pub mod tui;
pub mod ui;

pub use config::DesktopConfig;
pub use error::{BackendError, ConfigError, DesktopError, WidgetError};
pub use ui::core::{Desktop, NodeId, Outcome, Widget};
