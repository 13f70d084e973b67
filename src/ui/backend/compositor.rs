//! Surface bookkeeping shared by every backend.
//!
//! Each node owns one surface: an absolute rectangle with its own canvas.
//! Surfaces are stacked bottom to top; raising a surface lifts its surface
//! descendants with it, keeping their relative order. A hidden surface hides
//! everything under it.

use rustc_hash::FxHashMap;

use super::canvas::Canvas;
use crate::error::BackendError;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::NodeId;
use crate::ui::core::style::{Mod, Style};

#[derive(Debug)]
struct Surface {
    parent: Option<NodeId>,
    rect: Rect,
    hidden: bool,
    canvas: Canvas,
}

#[derive(Debug)]
pub struct Compositor {
    area: Rect,
    surfaces: FxHashMap<NodeId, Surface>,
    /// Bottom to top.
    stack: Vec<NodeId>,
    status: String,
    frame: Canvas,
}

impl Compositor {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            area: Rect::new(0, 0, width, height),
            surfaces: FxHashMap::default(),
            stack: Vec::new(),
            status: String::new(),
            frame: Canvas::new(width, height, Style::default()),
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        self.frame = Canvas::new(width, height, Style::default());
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn create(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        rect: Rect,
        style: Style,
    ) -> Result<(), BackendError> {
        if self.surfaces.contains_key(&id) {
            return Err(BackendError::SurfaceAlloc { rect });
        }
        if let Some(parent) = parent {
            if !self.surfaces.contains_key(&parent) {
                return Err(BackendError::UnknownSurface(parent));
            }
        }
        self.surfaces.insert(
            id,
            Surface {
                parent,
                rect,
                hidden: false,
                canvas: Canvas::new(rect.w, rect.h, style),
            },
        );
        self.stack.push(id);
        Ok(())
    }

    pub fn destroy(&mut self, id: NodeId) -> Result<(), BackendError> {
        if self.surfaces.remove(&id).is_none() {
            return Err(BackendError::UnknownSurface(id));
        }
        self.stack.retain(|&s| s != id);
        for surface in self.surfaces.values_mut() {
            if surface.parent == Some(id) {
                surface.parent = None;
            }
        }
        Ok(())
    }

    /// Reposition a surface. Its contents survive unless the size changes.
    pub fn move_to(&mut self, id: NodeId, rect: Rect) -> Result<(), BackendError> {
        let surface = self.surface_mut(id)?;
        if surface.rect.w != rect.w || surface.rect.h != rect.h {
            surface.canvas = Canvas::new(rect.w, rect.h, surface.canvas.base_style());
        }
        surface.rect = rect;
        Ok(())
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<(), BackendError> {
        self.surface_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Move `id` and its surface descendants to the top of the stack.
    pub fn raise(&mut self, id: NodeId) -> Result<(), BackendError> {
        if !self.surfaces.contains_key(&id) {
            return Err(BackendError::UnknownSurface(id));
        }
        let (lifted, rest): (Vec<NodeId>, Vec<NodeId>) = self
            .stack
            .iter()
            .partition(|&&s| self.descends_from(s, id));
        self.stack = rest;
        self.stack.extend(lifted);
        Ok(())
    }

    pub fn canvas_mut(&mut self, id: NodeId) -> Option<&mut Canvas> {
        self.surfaces.get_mut(&id).map(|s| &mut s.canvas)
    }

    pub fn canvas(&self, id: NodeId) -> Option<&Canvas> {
        self.surfaces.get(&id).map(|s| &s.canvas)
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.surfaces.get(&id).map(|s| s.rect)
    }

    pub fn set_status(&mut self, text: &str) {
        self.status.clear();
        self.status.push_str(text);
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Stacking order, bottom to top.
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    /// Hidden itself or through a hidden ancestor surface.
    pub fn is_effectively_hidden(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(s) = cur.and_then(|c| self.surfaces.get(&c)) {
            if s.hidden {
                return true;
            }
            cur = s.parent;
        }
        false
    }

    /// Flatten all visible surfaces into the frame; the status line goes on
    /// the bottom row.
    pub fn compose(&mut self) -> &Canvas {
        self.frame.clear();
        for &id in &self.stack {
            if self.is_effectively_hidden(id) {
                continue;
            }
            if let Some(surface) = self.surfaces.get(&id) {
                self.frame.blit(&surface.canvas, surface.rect.origin());
            }
        }
        if !self.status.is_empty() && self.area.h > 0 {
            let row = self.area.h - 1;
            let style = Style::new().add_mod(Mod::REVERSE);
            self.frame.fill(Rect::new(0, row, self.area.w, 1), style);
            self.frame.put_str(Pos::new(0, row), &self.status, style);
        }
        &self.frame
    }

    pub fn frame(&self) -> &Canvas {
        &self.frame
    }

    fn surface_mut(&mut self, id: NodeId) -> Result<&mut Surface, BackendError> {
        self.surfaces
            .get_mut(&id)
            .ok_or(BackendError::UnknownSurface(id))
    }

    fn descends_from(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.surfaces.get(&c).and_then(|s| s.parent);
        }
        false
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/backend/compositor.rs"]
mod tests;
