use super::*;

fn unit_cell(origin: Point) -> Cell {
    Cell {
        corners: Cell::square(origin, 1.0),
        fill: Rgba::BLUE,
        stroke: Rgba::WHITE,
        stroke_width: 1.0,
        value: 0.0,
        index: [0, 0, 0, 0],
    }
}

#[test]
fn group_bounds_cover_all_items() {
    let mut g = Group::new();
    assert!(g.bounds().is_none());
    g.push(unit_cell(Point::new(0.0, 0.0)));
    g.push(unit_cell(Point::new(3.0, 1.0)));
    assert_eq!(g.bounds(), Some(Rect::new(0.0, 0.0, 4.0, 2.0)));
    assert_eq!(g.cell_count(), 2);
    assert_eq!(g.text_count(), 0);
}

#[test]
fn move_to_centers_on_target() {
    let mut g = Group::new();
    g.push(unit_cell(Point::new(5.0, 5.0)));
    g.move_to(Point::ORIGIN);
    assert_eq!(g.center(), Point::ORIGIN);
}

#[test]
fn scale_to_fit_width_is_uniform() {
    let mut g = Group::new();
    g.push(VectorPath::rect(Rect::new(0.0, 0.0, 4.0, 2.0), None, None));
    g.scale_to_fit_width(2.0);
    assert!((g.width() - 2.0).abs() < 1e-9);
    assert!((g.height() - 1.0).abs() < 1e-9);
    assert!((g.center().x - 2.0).abs() < 1e-9);
}

#[test]
fn next_to_places_beyond_the_edge() {
    let anchor = Rect::new(0.0, 0.0, 2.0, 2.0);
    let mut label = TextLabel::new("ab", 0.5, Rgba::WHITE);
    label.next_to(anchor, Edge::Down, 0.1);
    let b = label.bounds().unwrap();
    assert!((b.y1 - (-0.1)).abs() < 1e-12);
    assert!((b.center().x - 1.0).abs() < 1e-12);

    label.next_to(anchor, Edge::Right, 0.2);
    let b = label.bounds().unwrap();
    assert!((b.x0 - 2.2).abs() < 1e-12);
}

#[test]
fn text_width_follows_glyph_aspect() {
    let label = TextLabel::new("abcd", 2.0, Rgba::WHITE);
    assert!((label.width - 4.0 * GLYPH_ASPECT * 2.0).abs() < 1e-12);
    let fitted = TextLabel::fit_width("abcd", 3.0, Rgba::WHITE);
    assert!((fitted.width - 3.0).abs() < 1e-12);
    assert!((fitted.height - 3.0 / (4.0 * GLYPH_ASPECT)).abs() < 1e-12);
}

#[test]
fn align_helpers_match_edges() {
    let mut label = TextLabel::new("x", 1.0, Rgba::WHITE);
    label.align_left_to(-3.0);
    assert!((label.bounds().unwrap().x0 + 3.0).abs() < 1e-12);
    label.align_right_to(3.0);
    assert!((label.bounds().unwrap().x1 - 3.0).abs() < 1e-12);
}

#[test]
fn arrow_tip_points_at_the_tip() {
    let tip = ArrowTip {
        tip: Point::new(1.0, 0.0),
        from: Point::new(0.0, 0.0),
        length: 0.2,
    };
    let b = kurbo::Shape::bounding_box(&tip.to_path());
    assert!((b.x1 - 1.0).abs() < 1e-12);
    assert!((b.x0 - 0.8).abs() < 1e-12);
}
