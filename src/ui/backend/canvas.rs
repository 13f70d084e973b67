//! Cell grids: one per surface, plus the composed frame.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::style::Style;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: String,
    pub style: Style,
}

impl Cell {
    fn blank(style: Style) -> Self {
        Self {
            symbol: " ".to_string(),
            style,
        }
    }
}

/// A grid of cells addressed from its own top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    base: Style,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, base: Style) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            base,
            cells: std::iter::repeat_with(|| Cell::blank(base)).take(len).collect(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn base_style(&self) -> Style {
        self.base
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        let idx = self.idx(x, y)?;
        self.cells.get(idx)
    }

    pub fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        let idx = self.idx(x, y)?;
        self.cells.get_mut(idx)
    }

    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Reset every cell to a blank in the base style.
    pub fn clear(&mut self) {
        let base = self.base;
        for cell in &mut self.cells {
            *cell = Cell::blank(base);
        }
    }

    pub fn fill(&mut self, rect: Rect, style: Style) {
        let clip = rect.intersect(self.area());
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                if let Some(cell) = self.cell_mut(x, y) {
                    *cell = Cell::blank(style);
                }
            }
        }
    }

    /// Write `text` starting at `pos`, one grapheme per cell. Wide glyphs that
    /// would straddle the right edge are not drawn. Returns the column after
    /// the last written cell.
    pub fn put_str(&mut self, pos: Pos, text: &str, style: Style) -> u16 {
        let mut x = pos.x;
        let y = pos.y;
        if y >= self.height {
            return x;
        }
        for g in text.graphemes(true) {
            let w = UnicodeWidthStr::width(g) as u16;
            if w == 0 {
                continue;
            }
            if x >= self.width || (w > 1 && x.saturating_add(w) > self.width) {
                break;
            }
            if let Some(cell) = self.cell_mut(x, y) {
                cell.symbol = g.to_string();
                cell.style = style;
            }
            for dx in 1..w {
                if let Some(cell) = self.cell_mut(x + dx, y) {
                    *cell = Cell::blank(style);
                }
            }
            x = x.saturating_add(w);
        }
        x
    }

    /// Copy `src` so that its top-left lands on `at`, clipped to this grid.
    pub fn blit(&mut self, src: &Canvas, at: Pos) {
        for sy in 0..src.height {
            let y = at.y.saturating_add(sy);
            if y >= self.height {
                break;
            }
            for sx in 0..src.width {
                let x = at.x.saturating_add(sx);
                if x >= self.width {
                    break;
                }
                if let (Some(from), Some(to)) = (src.cell(sx, sy), self.idx(x, y)) {
                    self.cells[to] = from.clone();
                }
            }
        }
    }

    /// The symbols of one row, concatenated.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.symbol.as_str())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/backend/canvas.rs"]
mod tests;
