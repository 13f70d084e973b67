use super::*;
use crate::ui::core::geom::{Pos, Rect};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RRect;

#[test]
fn style_conversion_keeps_colors_and_modifiers() {
    let style = Style::new()
        .fg(Color::Yellow)
        .bg(Color::Indexed(17))
        .add_mod(Mod::BOLD | Mod::REVERSE);
    let converted = to_ratatui_style(style);
    assert_eq!(converted.fg, Some(RColor::Yellow));
    assert_eq!(converted.bg, Some(RColor::Indexed(17)));
    assert!(converted.add_modifier.contains(RModifier::BOLD));
    assert!(converted.add_modifier.contains(RModifier::REVERSED));
    assert!(!converted.add_modifier.contains(RModifier::DIM));
}

#[test]
fn unset_colors_stay_unset() {
    let converted = to_ratatui_style(Style::new());
    assert_eq!(converted.fg, None);
    assert_eq!(converted.bg, None);
}

#[test]
fn frame_copy_is_clipped_to_buffer() {
    let mut frame = Canvas::new(4, 2, Style::new());
    frame.put_str(Pos::new(0, 0), "abcd", Style::new().fg(Color::Red));
    let mut buf = Buffer::empty(RRect::new(0, 0, 3, 1));
    copy_frame(&frame, &mut buf);

    assert_eq!(buf[(0, 0)].symbol(), "a");
    assert_eq!(buf[(2, 0)].symbol(), "c");
    assert_eq!(buf[(1, 0)].fg, RColor::Red);
    assert_eq!(frame.area(), Rect::new(0, 0, 4, 2));
}
