//! Demo desktop: two forms, a popup and a clock fed from another thread.
//!
//! Tab/arrows move between fields, F2 opens the popup, F10 or Ctrl+C quits.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tdesk::core::event::{Key, KeyCode};
use tdesk::tui::{CrosstermSource, TerminalGuard};
use tdesk::ui::backend::terminal::TerminalBackend;
use tdesk::ui::core::{
    Color, Editable, Focusable, Mod, MousePressable, Pos, Rect, ShortcutHandler, Style,
};
use tdesk::{Desktop, DesktopConfig, NodeId, Outcome, Widget};

fn main() -> io::Result<()> {
    let _logging = tdesk::logging::init(&tdesk::logging::default_log_dir());

    let config = match config_path() {
        Some(path) => DesktopConfig::load_or_default(&path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default config");
            DesktopConfig::default()
        }),
        None => DesktopConfig::default(),
    };

    let guard = TerminalGuard::new()?;
    guard.install_panic_restore();
    let (tx, rx) = mpsc::channel();
    #[cfg(unix)]
    tdesk::tui::terminal_guard::install_termination_signals(guard.restorer(), tx)?;
    #[cfg(not(unix))]
    drop(tx);

    let backend = TerminalBackend::new(io::stdout())?;
    let mut desk = Desktop::new(backend, config).map_err(io::Error::other)?;
    build(&mut desk).map_err(io::Error::other)?;

    let mut source = CrosstermSource::with_signals(rx);
    let result = desk.run(&mut source).map_err(io::Error::other);
    drop(guard);
    result
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}

fn build(desk: &mut Desktop) -> tdesk::error::Result<()> {
    let root = desk.root();
    desk.register_shortcuts(
        root,
        &[
            (Key::simple(KeyCode::F(2)), open_popup as ShortcutHandler),
            (Key::simple(KeyCode::F(10)), quit as ShortcutHandler),
        ],
    );

    let frame = Style::new().bg(Color::Blue).fg(Color::White);
    let form_a = desk.create_styled(Some(root), Rect::new(2, 1, 32, 8), frame, Label::new(" Account "))?;
    desk.set_tip(form_a, Some("Account | <TAB> next field, F2 popup, F10 quit".into()));
    let name = desk.create(Some(form_a), Rect::new(2, 2, 28, 1), Field::new("name"))?;
    desk.create(Some(form_a), Rect::new(2, 3, 28, 1), Field::new("email"))?;
    let save = button(desk, form_a, Rect::new(2, 5, 8, 1), Button::new("Save", save_clicked))?;
    desk.set_tip(save, Some("Save | <Enter> or click".into()));
    desk.set_tab_stop(form_a, false);

    let panel = Style::new().bg(Color::Cyan).fg(Color::Black);
    let form_b = desk.create_styled(Some(root), Rect::new(38, 1, 30, 8), panel, Label::new(" Tools "))?;
    desk.set_tab_stop(form_b, false);
    button(desk, form_b, Rect::new(2, 2, 10, 1), Button::new("Popup", |desk, id| {
        open_popup(desk, id, Key::simple(KeyCode::F(2)));
    }))?;
    button(desk, form_b, Rect::new(2, 4, 10, 1), Button::new("Quit", |desk, _| {
        desk.request_quit();
    }))?;
    let clock = desk.create(Some(form_b), Rect::new(2, 6, 26, 1), Label::new(""))?;
    desk.set_tab_stop(clock, false);

    for id in desk.tree().preorder(root) {
        desk.request_redraw(id);
    }
    spawn_clock(desk, clock);
    desk.focus_on(name);
    Ok(())
}

/// A button node; Enter presses it instead of moving on.
fn button(desk: &mut Desktop, parent: NodeId, rect: Rect, widget: Button) -> tdesk::error::Result<NodeId> {
    let id = desk.create(Some(parent), rect, widget)?;
    desk.register_shortcuts(id, &[(Key::simple(KeyCode::Enter), press as ShortcutHandler)]);
    Ok(id)
}

fn press(desk: &mut Desktop, id: NodeId, _key: Key) -> Outcome {
    desk.with_widget::<Button, _>(id, |b, desk| (b.action)(desk, id));
    Outcome::Continue
}

/// Draws straight into the clock's surface under the screen lock and asks the
/// input loop for a repaint.
fn spawn_clock(desk: &Desktop, clock: NodeId) {
    let screen = desk.screen().clone();
    let signal = desk.refresh_signal();
    std::thread::spawn(move || loop {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let text = format!("UTC {:02}:{:02}:{:02}", secs / 3600 % 24, secs / 60 % 60, secs % 60);
        let drawn = screen.with(|b| {
            b.canvas(clock).map(|canvas| {
                canvas.clear();
                canvas.put_str(Pos::new(0, 0), &text, Style::new());
            })
        });
        if drawn.is_none() {
            return;
        }
        signal.raise();
        std::thread::sleep(Duration::from_secs(1));
    });
}

fn quit(desk: &mut Desktop, _id: NodeId, _key: Key) -> Outcome {
    desk.request_quit();
    Outcome::Continue
}

fn open_popup(desk: &mut Desktop, _id: NodeId, _key: Key) -> Outcome {
    let style = Style::new().bg(Color::Red).fg(Color::White).add_mod(Mod::BOLD);
    match desk.popup(Rect::new(20, 10, 30, 3), Label::new("")) {
        Ok(id) => {
            desk.set_tip(id, Some("Popup | <Enter> closes".into()));
            desk.draw(id, |canvas| {
                canvas.fill(canvas.area(), style);
                canvas.put_str(Pos::new(2, 1), "Hello from a popup", style);
            });
        }
        Err(err) => tracing::warn!(error = %err, "popup failed"),
    }
    Outcome::Continue
}

fn save_clicked(desk: &mut Desktop, id: NodeId) {
    let root = desk.root();
    let form = desk.tree().parent(id).unwrap_or(root);
    let siblings: Vec<NodeId> = desk.tree().children(form).collect();
    let values: Vec<String> = siblings
        .into_iter()
        .filter_map(|n| desk.widget_mut::<Field>(n).map(|f| format!("{}={}", f.name, f.value)))
        .collect();
    tracing::info!(fields = ?values, "form saved");
    desk.set_tip(root, Some(format!("saved {}", values.join(", "))));
}

/// Static text on the first row.
struct Label {
    text: String,
}

impl Label {
    fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

impl Widget for Label {
    fn redraw(&mut self, desk: &mut Desktop, id: NodeId) {
        desk.draw(id, |canvas| {
            canvas.clear();
            canvas.put_str(Pos::new(0, 0), &self.text, canvas.base_style().add_mod(Mod::BOLD));
        });
    }
}

/// One-line text input.
struct Field {
    name: &'static str,
    value: String,
}

impl Field {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            value: String::new(),
        }
    }
}

impl Widget for Field {
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }

    fn as_editable(&mut self) -> Option<&mut dyn Editable> {
        Some(self)
    }

    fn redraw(&mut self, desk: &mut Desktop, id: NodeId) {
        let editing = desk.node(id).is_some_and(|n| n.is_editing());
        let line = format!("{:>6}: {}", self.name, self.value);
        desk.draw(id, |canvas| {
            let mut style = Style::new().bg(Color::Black).fg(Color::White);
            if editing {
                style = style.add_mod(Mod::UNDERLINE);
            }
            canvas.fill(canvas.area(), style);
            canvas.put_str(Pos::new(0, 0), &line, style);
        });
    }
}

impl Focusable for Field {
    fn on_focus(&mut self, desk: &mut Desktop, id: NodeId) {
        desk.request_redraw(id);
    }

    fn on_blur(&mut self, desk: &mut Desktop, id: NodeId) {
        desk.request_redraw(id);
    }
}

impl Editable for Field {
    fn edit(&mut self, desk: &mut Desktop, id: NodeId, key: Key) -> Outcome {
        match key.code {
            KeyCode::Char(ch) if key.modifiers.is_empty() => self.value.push(ch),
            KeyCode::Backspace => {
                self.value.pop();
            }
            KeyCode::Esc => return Outcome::ExitPrev,
            _ => return Outcome::Continue,
        }
        desk.request_redraw(id);
        Outcome::Continue
    }
}

/// Runs its action on Enter or a click.
struct Button {
    label: &'static str,
    action: fn(&mut Desktop, NodeId),
}

impl Button {
    fn new(label: &'static str, action: fn(&mut Desktop, NodeId)) -> Self {
        Self { label, action }
    }
}

impl Widget for Button {
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }

    fn as_mouse_pressable(&mut self) -> Option<&mut dyn MousePressable> {
        Some(self)
    }

    fn redraw(&mut self, desk: &mut Desktop, id: NodeId) {
        let editing = desk.node(id).is_some_and(|n| n.is_editing());
        let label = format!("[{}]", self.label);
        desk.draw(id, |canvas| {
            let mut style = canvas.base_style();
            if editing {
                style = style.add_mod(Mod::REVERSE);
            }
            canvas.clear();
            canvas.put_str(Pos::new(0, 0), &label, style);
        });
    }
}

impl Focusable for Button {
    fn on_focus(&mut self, desk: &mut Desktop, id: NodeId) {
        desk.request_redraw(id);
    }

    fn on_blur(&mut self, desk: &mut Desktop, id: NodeId) {
        desk.request_redraw(id);
    }
}

impl MousePressable for Button {
    fn mouse_press(&mut self, desk: &mut Desktop, id: NodeId, _pos: Pos) -> Outcome {
        (self.action)(desk, id);
        Outcome::Continue
    }
}
