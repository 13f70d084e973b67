//! UI layer: the retained widget core and the backends that put it on screen.
//!
//! `ui::core` never names a terminal crate; `ratatui` stays behind
//! `ui::backend::terminal`.

pub mod backend;
pub mod core;
