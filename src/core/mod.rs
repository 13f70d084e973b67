//! Input vocabulary and input sources shared by every frontend.

pub mod event;
pub mod input;

pub use event::{InputEvent, Key, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
pub use input::{ByteSource, InputSource, ScriptedSource};
