use super::*;
use crate::geometry::shape::VectorPath;

fn rect(w: f64, h: f64) -> VectorPath {
    VectorPath::rect(Rect::new(0.0, 0.0, w, h), None, None)
}

#[test]
fn both_accessor_shapes_resolve_identically() {
    let a = FrameCamera {
        frame_width: 14.0,
        frame_height: 8.0,
    }
    .viewport_size();
    let b = ShapeCamera {
        frame_shape: (14.0, 8.0),
    }
    .viewport_size();
    assert_eq!((a.width(), a.height()), (14.0, 8.0));
    assert_eq!((b.width(), b.height()), (14.0, 8.0));
}

#[test]
fn default_is_sixteen_by_nine() {
    let v = ViewportSize::default();
    assert!((v.width() / v.height() - 16.0 / 9.0).abs() < 1e-12);
    assert!(v.validate().is_ok());
}

#[test]
fn validation_rejects_non_positive_sides() {
    assert!(matches!(
        ViewportSize::Shape((0.0, 8.0)).validate(),
        Err(TensorSpecError::Validation(_))
    ));
    assert!(
        ViewportSize::Dimensions {
            width: 1.0,
            height: f64::NAN
        }
        .validate()
        .is_err()
    );
}

#[test]
fn wide_shapes_fit_the_width_share() {
    let v = ViewportSize::Shape((10.0, 8.0));
    let mut r = rect(4.0, 1.0);
    v.fit(&mut r, 0.36, 0.8);
    assert!((r.width() - 3.6).abs() < 1e-9);
    assert!((r.height() - 0.9).abs() < 1e-9);
}

#[test]
fn tall_shapes_fit_the_height_share() {
    let v = ViewportSize::Shape((10.0, 8.0));
    let mut r = rect(1.0, 2.0);
    v.fit(&mut r, 0.36, 0.8);
    assert!((r.height() - 6.4).abs() < 1e-9);
    assert!((r.width() - 3.2).abs() < 1e-9);
}

#[test]
fn serializes_with_snake_case_tags() {
    let json = serde_json::to_value(ViewportSize::Shape((2.0, 1.0))).unwrap();
    assert_eq!(json, serde_json::json!({ "shape": [2.0, 1.0] }));
}

#[test]
fn rect_is_centered_on_the_origin() {
    let r = ViewportSize::Shape((4.0, 2.0)).rect();
    assert_eq!(r, Rect::new(-2.0, -1.0, 2.0, 1.0));
}
