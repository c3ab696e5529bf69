use super::*;

#[test]
fn one_marker_per_label_with_only_the_selected_named() {
    let strip = LabelStrip::build(&["A", "B", "C"], 1).unwrap();
    assert_eq!(strip.markers.len(), 3);
    assert_eq!(strip.selected, 1);
    assert!(strip.markers[0].text.is_none());
    assert!(strip.markers[2].text.is_none());
    assert_eq!(strip.selected_marker().text.as_ref().unwrap().text, "B");
    assert_eq!(strip.selected_marker().rect.fill, Some(Rgba::BLUE));
    assert_eq!(strip.markers[0].rect.fill, Some(Rgba::WHITE));
}

#[test]
fn markers_run_left_to_right_with_scaled_spacing() {
    let opts = LabelStripOpts::default();
    let strip = LabelStrip::build(&["A", "B", "C"], 0).unwrap();
    let b: Vec<_> = strip.markers.iter().map(|m| m.bounds().unwrap()).collect();
    for w in b.windows(2) {
        let gap = w[1].x0 - w[0].x1;
        assert!((gap - opts.spacing * opts.scale).abs() < 1e-9);
    }
    // unselected markers keep their size, scaled
    assert!((b[1].width() - opts.marker_width * opts.scale).abs() < 1e-9);
    assert!((b[1].height() - opts.marker_height * opts.scale).abs() < 1e-9);
    // all markers share a vertical center
    assert!(b.iter().all(|r| (r.center().y - b[0].center().y).abs() < 1e-9));
}

#[test]
fn selected_marker_is_sized_to_its_text() {
    let opts = LabelStripOpts::default();
    let strip = LabelStrip::build(&["short", "a much longer label"], 1).unwrap();
    let m = strip.selected_marker();
    let text = m.text.as_ref().unwrap();
    let rect = m.rect.bounds().unwrap();
    assert!((rect.width() - text.width).abs() < 1e-9);
    assert!((rect.height() - opts.selected_height * opts.scale).abs() < 1e-9);
    assert!((rect.center() - text.center).length_squared() < 1e-18);
}

#[test]
fn strip_is_centered_on_the_origin() {
    let strip = LabelStrip::build(&["x", "y", "z", "w"], 3).unwrap();
    let c = strip.center();
    assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9);
}

#[test]
fn out_of_range_selection_is_a_shape_error() {
    assert!(matches!(
        LabelStrip::build(&["A", "B"], 2),
        Err(TensorSpecError::Shape(_))
    ));
    let empty: [&str; 0] = [];
    assert!(LabelStrip::build(&empty, 0).is_err());
}

#[test]
fn to_group_includes_the_single_text() {
    let g = LabelStrip::build(&["A", "B", "C"], 2).unwrap().to_group();
    assert_eq!(g.len(), 4);
    assert_eq!(g.text_count(), 1);
}

#[test]
fn opts_validation() {
    let bad = LabelStripOpts {
        scale: 0.0,
        ..LabelStripOpts::default()
    };
    assert!(LabelStrip::build_with(&["A"], 0, &bad).is_err());
    let bad = LabelStripOpts {
        spacing: -0.1,
        ..LabelStripOpts::default()
    };
    assert!(bad.validate().is_err());
}
