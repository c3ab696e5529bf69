use super::*;
use crate::foundation::core::Point;
use crate::geometry::shape::{ArrowTip, Cell, Polyline, VectorPath};

fn cell() -> Cell {
    Cell {
        corners: Cell::square(Point::new(0.0, 0.0), 1.0),
        fill: Rgba::rgba(1.0, 0.0, 0.0, 0.5),
        stroke: Rgba::WHITE,
        stroke_width: 0.02,
        value: 1.0,
        index: [0; 4],
    }
}

fn opts(frame: Rect) -> SvgExportOpts {
    SvgExportOpts {
        px_per_unit: 10.0,
        frame: Some(frame),
        background: None,
        ..SvgExportOpts::default()
    }
}

#[test]
fn y_axis_is_flipped_into_document_space() {
    let mut g = Group::new();
    g.push(Primitive::Cell(cell()));
    let svg = to_svg_document(&g, &opts(Rect::new(0.0, 0.0, 2.0, 2.0))).unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="20" height="20""#));
    assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.500""##));
    assert!(svg.contains(r#"stroke-width="0.200""#));
    assert!(!svg.contains("<rect"));

    // The cell sits in the bottom-left quadrant of the scene, so it lands bottom-left in the image.
    let img = crate::render::preview::rasterize(&svg, 1.0).unwrap();
    assert!(img.get_pixel(5, 15).0[0] >= 250);
    assert!(img.get_pixel(5, 15).0[3] > 100);
    assert_eq!(img.get_pixel(5, 5).0[3], 0);
    assert_eq!(img.get_pixel(15, 15).0[3], 0);
}

#[test]
fn fitted_frame_pads_the_bounds_and_paints_the_background() {
    let mut g = Group::new();
    g.push(Primitive::Cell(cell()));
    let svg = to_svg_document(&g, &SvgExportOpts::default()).unwrap();
    assert!(svg.contains(r#"width="150" height="150""#));
    assert!(svg.contains(r##"<rect width="100%" height="100%" fill="#000000""##));
}

#[test]
fn text_is_escaped_and_sized_by_its_box() {
    let mut g = Group::new();
    let mut label = TextLabel::new("a<b & c", 0.5, Rgba::WHITE);
    label.move_to(Point::new(1.0, 1.0));
    let width = label.width;
    g.push(Primitive::Text(label));
    let svg = to_svg_document(&g, &opts(Rect::new(0.0, 0.0, 2.0, 2.0))).unwrap();
    assert!(svg.contains("a&lt;b &amp; c"));
    assert!(svg.contains(r#"x="10.000" y="10.000""#));
    assert!(svg.contains(r#"font-size="5.000""#));
    assert!(svg.contains(&format!(r#"textLength="{:.3}""#, width * 10.0)));
}

#[test]
fn polylines_are_unfilled_and_tips_are_filled() {
    let mut g = Group::new();
    g.push(Primitive::Polyline(Polyline {
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        stroke: Rgba::WHITE,
        stroke_width: 0.04,
        arrow_tip: Some(ArrowTip {
            tip: Point::new(1.0, 0.0),
            from: Point::new(0.0, 0.0),
            length: 0.2,
        }),
    }));
    g.push(Primitive::Path(VectorPath {
        path: BezPath::new(),
        fill: Some(Rgba::RED),
        stroke: None,
    }));
    let svg = to_svg_document(&g, &opts(Rect::new(-1.0, -1.0, 2.0, 1.0))).unwrap();
    assert_eq!(svg.matches("<path").count(), 2);
    assert_eq!(svg.matches(r#"fill="none""#).count(), 1);
    assert_eq!(svg.matches(r##"fill="#ffffff""##).count(), 1);
}

#[test]
fn empty_group_needs_an_explicit_frame() {
    let g = Group::new();
    assert!(matches!(
        to_svg_document(&g, &SvgExportOpts::default()),
        Err(TensorSpecError::Degenerate(_))
    ));
    assert!(to_svg_document(&g, &opts(Rect::new(0.0, 0.0, 1.0, 1.0))).is_ok());
}

#[test]
fn options_are_validated() {
    let g = Group::new();
    let bad = SvgExportOpts {
        px_per_unit: 0.0,
        ..opts(Rect::new(0.0, 0.0, 1.0, 1.0))
    };
    assert!(matches!(
        to_svg_document(&g, &bad),
        Err(TensorSpecError::Validation(_))
    ));
    assert!(opts(Rect::new(0.0, 0.0, 0.0, 1.0)).validate().is_err());
}
