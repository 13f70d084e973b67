use super::*;
use slotmap::SlotMap;

fn ids(n: usize) -> Vec<NodeId> {
    let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
    (0..n).map(|_| map.insert(())).collect()
}

#[test]
fn raise_lifts_descendants_in_relative_order() {
    let ids = ids(4);
    let (root, form, button, other) = (ids[0], ids[1], ids[2], ids[3]);
    let mut comp = Compositor::new(20, 10);
    comp.create(root, None, Rect::new(0, 0, 20, 10), Style::default()).unwrap();
    comp.create(form, Some(root), Rect::new(0, 0, 5, 5), Style::default()).unwrap();
    comp.create(button, Some(form), Rect::new(1, 1, 2, 1), Style::default()).unwrap();
    comp.create(other, Some(root), Rect::new(2, 2, 5, 5), Style::default()).unwrap();

    comp.raise(form).unwrap();
    assert_eq!(comp.stack(), &[root, other, form, button]);
}

#[test]
fn hidden_parent_hides_children_in_frame() {
    let ids = ids(2);
    let mut comp = Compositor::new(4, 1);
    comp.create(ids[0], None, Rect::new(0, 0, 4, 1), Style::default()).unwrap();
    comp.create(ids[1], Some(ids[0]), Rect::new(1, 0, 2, 1), Style::default()).unwrap();
    comp.canvas_mut(ids[1]).unwrap().put_str(Pos::new(0, 0), "ok", Style::default());

    assert_eq!(comp.compose().row_text(0), " ok ");
    comp.set_hidden(ids[0], true).unwrap();
    assert!(comp.is_effectively_hidden(ids[1]));
    assert_eq!(comp.compose().row_text(0), "    ");
}

#[test]
fn later_surfaces_cover_earlier_ones() {
    let ids = ids(2);
    let mut comp = Compositor::new(3, 1);
    comp.create(ids[0], None, Rect::new(0, 0, 3, 1), Style::default()).unwrap();
    comp.create(ids[1], None, Rect::new(1, 0, 1, 1), Style::default()).unwrap();
    comp.canvas_mut(ids[0]).unwrap().put_str(Pos::new(0, 0), "abc", Style::default());
    comp.canvas_mut(ids[1]).unwrap().put_str(Pos::new(0, 0), "X", Style::default());

    assert_eq!(comp.compose().row_text(0), "aXc");
    comp.raise(ids[0]).unwrap();
    assert_eq!(comp.compose().row_text(0), "abc");
}

#[test]
fn status_line_occupies_bottom_row() {
    let ids = ids(1);
    let mut comp = Compositor::new(6, 2);
    comp.create(ids[0], None, Rect::new(0, 0, 6, 2), Style::default()).unwrap();
    comp.set_status("tip");
    let frame = comp.compose();
    assert_eq!(frame.row_text(1), "tip   ");
    assert!(frame.cell(0, 1).unwrap().style.mods.contains(Mod::REVERSE));
}

#[test]
fn unknown_and_duplicate_surfaces_are_errors() {
    let ids = ids(2);
    let mut comp = Compositor::new(4, 4);
    assert!(matches!(
        comp.create(ids[0], Some(ids[1]), Rect::new(0, 0, 1, 1), Style::default()),
        Err(BackendError::UnknownSurface(_))
    ));
    comp.create(ids[0], None, Rect::new(0, 0, 1, 1), Style::default()).unwrap();
    assert!(comp.create(ids[0], None, Rect::new(0, 0, 1, 1), Style::default()).is_err());
    assert!(comp.destroy(ids[1]).is_err());
    comp.destroy(ids[0]).unwrap();
    assert!(comp.is_empty());
}

#[test]
fn move_keeps_contents_when_size_is_unchanged() {
    let ids = ids(1);
    let mut comp = Compositor::new(8, 1);
    comp.create(ids[0], None, Rect::new(0, 0, 2, 1), Style::default()).unwrap();
    comp.canvas_mut(ids[0]).unwrap().put_str(Pos::new(0, 0), "hi", Style::default());
    comp.move_to(ids[0], Rect::new(4, 0, 2, 1)).unwrap();
    assert_eq!(comp.compose().row_text(0), "    hi  ");
}
