//! Terminal integration (crossterm + ratatui).
//!
//! Kept apart from `ui::core` so the widget core builds and tests without a
//! terminal.

pub mod crossterm;
pub mod source;
pub mod terminal_guard;

pub use source::CrosstermSource;
pub use terminal_guard::{TerminalGuard, TerminationSignal};
