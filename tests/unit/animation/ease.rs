use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::Smooth,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::Linear.apply(2.0), 1.0);
}

#[test]
fn smooth_is_symmetric_and_default() {
    assert_eq!(Ease::default(), Ease::Smooth);
    assert!((Ease::Smooth.apply(0.5) - 0.5).abs() < 1e-12);
    let lo = Ease::Smooth.apply(0.2);
    let hi = Ease::Smooth.apply(0.8);
    assert!((lo + hi - 1.0).abs() < 1e-12);
}

#[test]
fn names_are_snake_case() {
    let json = serde_json::to_string(&Ease::InOutCubic).unwrap();
    assert_eq!(json, "\"in_out_cubic\"");
    let back: Ease = serde_json::from_str("\"smooth\"").unwrap();
    assert_eq!(back, Ease::Smooth);
}
