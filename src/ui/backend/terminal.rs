use std::io::{self, Write};

use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color as RColor, Modifier as RModifier, Style as RStyle};
use ratatui::Terminal;

use crate::error::BackendError;
use crate::ui::backend::{Backend, Canvas, Compositor};
use crate::ui::core::style::{Color, Mod, Style};

/// Presents composed frames on the real terminal through ratatui.
///
/// Terminal mode (raw mode, alternate screen, mouse capture) is owned by
/// [`crate::tui::TerminalGuard`], not by this type.
pub struct TerminalBackend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    compositor: Compositor,
}

impl TerminalBackend {
    pub fn new(stdout: io::Stdout) -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            compositor: Compositor::new(width, height),
        })
    }
}

impl Backend for TerminalBackend {
    fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    fn present(&mut self) -> Result<(), BackendError> {
        let frame = self.compositor.frame();
        self.terminal.draw(|f| copy_frame(frame, f.buffer_mut()))?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<(), BackendError> {
        self.compositor.resize(width, height);
        self.terminal.resize(ratatui::layout::Rect::new(0, 0, width, height))?;
        Ok(())
    }

    fn bell(&mut self) {
        let mut out = io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            tracing::debug!(error = %err, "bell failed");
        }
    }
}

fn copy_frame(frame: &Canvas, buf: &mut ratatui::buffer::Buffer) {
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let (Some(src), Some(dst)) = (frame.cell(x, y), buf.cell_mut((x, y))) else {
                continue;
            };
            dst.set_symbol(&src.symbol).set_style(to_ratatui_style(src.style));
        }
    }
}

fn to_ratatui_style(s: Style) -> RStyle {
    let mut out = RStyle::default();
    if let Some(fg) = s.fg {
        out = out.fg(to_ratatui_color(fg));
    }
    if let Some(bg) = s.bg {
        out = out.bg(to_ratatui_color(bg));
    }
    out.add_modifier(to_ratatui_mods(s.mods))
}

fn to_ratatui_color(c: Color) -> RColor {
    match c {
        Color::Reset => RColor::Reset,
        Color::Black => RColor::Black,
        Color::Red => RColor::Red,
        Color::Green => RColor::Green,
        Color::Yellow => RColor::Yellow,
        Color::Blue => RColor::Blue,
        Color::Magenta => RColor::Magenta,
        Color::Cyan => RColor::Cyan,
        Color::White => RColor::White,
        Color::Indexed(i) => RColor::Indexed(i),
        Color::Rgb(r, g, b) => RColor::Rgb(r, g, b),
    }
}

fn to_ratatui_mods(m: Mod) -> RModifier {
    let mut out = RModifier::empty();
    if m.contains(Mod::BOLD) {
        out |= RModifier::BOLD;
    }
    if m.contains(Mod::DIM) {
        out |= RModifier::DIM;
    }
    if m.contains(Mod::UNDERLINE) {
        out |= RModifier::UNDERLINED;
    }
    if m.contains(Mod::REVERSE) {
        out |= RModifier::REVERSED;
    }
    out
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/backend/terminal.rs"]
mod tests;
