//! Rendering backends.
//!
//! The desktop only talks to [`Backend`]; surface stacking and the composed
//! frame live in the shared [`Compositor`], so a backend mostly decides where
//! a finished frame goes.

pub mod canvas;
pub mod compositor;
#[cfg(feature = "tui")]
pub mod terminal;

pub use canvas::{Canvas, Cell};
pub use compositor::Compositor;

use std::any::Any;

use crate::error::BackendError;
use crate::ui::core::geom::Rect;
use crate::ui::core::id::NodeId;
use crate::ui::core::style::Style;

pub trait Backend: Any {
    fn compositor(&self) -> &Compositor;

    fn compositor_mut(&mut self) -> &mut Compositor;

    /// Push the freshly composed frame to its destination.
    fn present(&mut self) -> Result<(), BackendError>;

    /// Audible alert.
    fn bell(&mut self);

    fn size(&self) -> Rect {
        self.compositor().area()
    }

    /// Adopt a new screen size. Surfaces keep their geometry.
    fn resize(&mut self, width: u16, height: u16) -> Result<(), BackendError> {
        self.compositor_mut().resize(width, height);
        Ok(())
    }

    fn create_surface(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        rect: Rect,
        style: Style,
    ) -> Result<(), BackendError> {
        self.compositor_mut().create(id, parent, rect, style)
    }

    fn destroy_surface(&mut self, id: NodeId) -> Result<(), BackendError> {
        self.compositor_mut().destroy(id)
    }

    fn move_surface(&mut self, id: NodeId, rect: Rect) -> Result<(), BackendError> {
        self.compositor_mut().move_to(id, rect)
    }

    fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<(), BackendError> {
        self.compositor_mut().set_hidden(id, hidden)
    }

    fn raise(&mut self, id: NodeId) -> Result<(), BackendError> {
        self.compositor_mut().raise(id)
    }

    fn canvas(&mut self, id: NodeId) -> Option<&mut Canvas> {
        self.compositor_mut().canvas_mut(id)
    }

    fn set_status(&mut self, text: &str) {
        self.compositor_mut().set_status(text);
    }

    /// Flatten the surfaces and show the result.
    fn compose(&mut self) -> Result<(), BackendError> {
        self.compositor_mut().compose();
        self.present()
    }
}
