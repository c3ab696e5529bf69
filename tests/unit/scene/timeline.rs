use super::*;
use crate::matrix::geometric::GeometricMatrixBuilder;

fn tensor(shape: [usize; 4]) -> Tensor {
    let mut i = 0.0;
    Tensor::from_fn(shape, |_| {
        i += 0.5;
        i
    })
    .unwrap()
}

fn orchestrator() -> SceneOrchestrator {
    SceneOrchestrator::new(
        Box::new(GeometricMatrixBuilder::default()),
        &ViewportSize::default(),
    )
    .unwrap()
}

fn three() -> Vec<Tensor> {
    vec![
        tensor([1, 3, 4, 4]),
        tensor([2, 5, 5, 5]),
        tensor([1, 4, 3, 3]),
    ]
}

#[test]
fn one_frame_per_tensor_and_one_transition_between_each() {
    let timeline = orchestrator().build(&three(), &["A", "B", "C"]).unwrap();
    assert_eq!(timeline.frames.len(), 3);
    assert_eq!(timeline.transition_count(), 2);
    assert_eq!(timeline.frames[1].label, "B");
    assert_eq!(timeline.frames[1].visual_matrix.label, "B");
    assert_eq!(timeline.frames[1].label_strip.selected, 1);
}

#[test]
fn directives_add_then_transform_wait_pairs_then_hold() {
    let timeline = orchestrator().build(&three(), &["A", "B", "C"]).unwrap();
    let d = &timeline.directives;
    assert_eq!(d.len(), 6);
    assert_eq!(d[0], Directive::Add { frame: 0 });
    for (k, pair) in d[1..5].chunks(2).enumerate() {
        let Directive::Transform {
            from,
            to,
            duration,
            ease,
            tracks,
        } = &pair[0]
        else {
            panic!("expected a transform, got {:?}", pair[0]);
        };
        assert_eq!((*from, *to), (k, k + 1));
        assert_eq!(*duration, 0.8);
        assert_eq!(*ease, Ease::Smooth);
        assert_eq!(tracks.len(), 3);
        assert_eq!(pair[1], Directive::Wait { duration: 1.0 });
    }
    assert_eq!(d[5], Directive::Wait { duration: 1.0 });
    assert!((timeline.total_duration() - (2.0 * 1.8 + 1.0)).abs() < 1e-12);
}

#[test]
fn state_at_walks_the_directives() {
    let timeline = orchestrator().build(&three(), &["A", "B", "C"]).unwrap();
    assert_eq!(
        timeline.state_at(0.4),
        TimelineState::Morph {
            from: 0,
            to: 1,
            progress: Ease::Smooth.apply(0.5)
        }
    );
    assert_eq!(timeline.state_at(1.0), TimelineState::Hold { frame: 1 });
    let TimelineState::Morph { from, to, .. } = timeline.state_at(2.0) else {
        panic!("expected the second transition");
    };
    assert_eq!((from, to), (1, 2));
    assert_eq!(timeline.state_at(4.0), TimelineState::Hold { frame: 2 });
    assert_eq!(timeline.state_at(100.0), TimelineState::Hold { frame: 2 });
}

#[test]
fn single_tensor_is_shown_then_held() {
    let timeline = orchestrator().build(&[tensor([1, 2, 2, 2])], &["only"]).unwrap();
    assert_eq!(timeline.transition_count(), 0);
    assert_eq!(
        timeline.directives,
        vec![Directive::Add { frame: 0 }, Directive::Wait { duration: 1.0 }]
    );
    assert_eq!(timeline.state_at(0.5), TimelineState::Hold { frame: 0 });
}

#[test]
fn matrix_left_plot_right_strip_on_top() {
    let vp = ViewportSize::default();
    let timeline = orchestrator().build(&three(), &["A", "B", "C"]).unwrap();
    for frame in &timeline.frames {
        let m = frame.visual_matrix.center();
        let p = frame.distribution_plot.center();
        assert!((m.x + vp.width() * 0.25).abs() < 1e-9);
        assert!((p.x - vp.width() * 0.25).abs() < 1e-9);
        assert!(m.y.abs() < 1e-9 && p.y.abs() < 1e-9);

        let strip = frame.label_strip.bounds().unwrap();
        assert!((strip.y1 - (vp.height() / 2.0 - 0.1)).abs() < 1e-9);
    }
}

#[test]
fn shapes_are_fitted_along_their_larger_side() {
    let vp = ViewportSize::default();
    let timeline = orchestrator().build(&three(), &["A", "B", "C"]).unwrap();
    for frame in &timeline.frames {
        for (w, h) in [
            (frame.visual_matrix.width(), frame.visual_matrix.height()),
            (
                frame.distribution_plot.width(),
                frame.distribution_plot.height(),
            ),
        ] {
            if w > h {
                assert!((w - vp.width() * 0.36).abs() < 1e-9);
            } else {
                assert!((h - vp.height() * 0.8).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn both_viewport_accessors_give_the_same_layout() {
    use crate::scene::viewport::{FrameCamera, ShapeCamera};
    let frame = FrameCamera {
        frame_width: 12.0,
        frame_height: 9.0,
    };
    let shape = ShapeCamera {
        frame_shape: (12.0, 9.0),
    };
    let a = SceneOrchestrator::new(Box::new(GeometricMatrixBuilder::default()), &frame)
        .unwrap()
        .build(&three(), &["A", "B", "C"])
        .unwrap();
    let b = SceneOrchestrator::new(Box::new(GeometricMatrixBuilder::default()), &shape)
        .unwrap()
        .build(&three(), &["A", "B", "C"])
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn mismatched_lengths_fail_before_building() {
    let err = orchestrator().build(&three(), &["A", "B"]).unwrap_err();
    assert!(matches!(err, TensorSpecError::Shape(_)));

    let none: [&str; 0] = [];
    assert!(matches!(
        orchestrator().build(&[], &none),
        Err(TensorSpecError::Shape(_))
    ));
}

#[test]
fn a_failing_frame_aborts_the_timeline() {
    let tensors = vec![tensor([1, 2, 2, 2]), Tensor::filled([2, 2, 2], 1.0).unwrap()];
    assert!(matches!(
        orchestrator().build(&tensors, &["A", "B"]),
        Err(TensorSpecError::Shape(_))
    ));
}

#[test]
fn build_timeline_parses_the_engine_name() {
    let vp = ViewportSize::default();
    let timeline =
        build_timeline(&three(), &["A", "B", "C"], 0.5, 0.25, "native", &vp).unwrap();
    assert!(
        timeline
            .frames
            .iter()
            .all(|f| f.visual_matrix.engine == MatrixEngine::Geometric)
    );
    assert!((timeline.total_duration() - (2.0 * 0.75 + 1.0)).abs() < 1e-12);

    assert!(matches!(
        build_timeline(&three(), &["A", "B", "C"], 0.5, 0.25, "opengl", &vp),
        Err(TensorSpecError::Validation(_))
    ));
}

#[test]
fn options_are_validated() {
    let bad = TimelineOpts {
        duration_each: 0.0,
        ..TimelineOpts::default()
    };
    assert!(orchestrator().with_timeline_opts(bad).is_err());
    let bad = TimelineOpts {
        height_ratio: 0.0,
        ..TimelineOpts::default()
    };
    assert!(bad.validate().is_err());
    assert!(TimelineOpts::default().validate().is_ok());
}

#[test]
fn frame_group_and_json_export() {
    let timeline = orchestrator()
        .build(&[tensor([1, 2, 2, 2])], &["only"])
        .unwrap();
    let group = timeline.frames[0].to_group();
    assert_eq!(group.cell_count(), 8);

    let json: serde_json::Value = serde_json::from_str(&timeline.to_json().unwrap()).unwrap();
    assert_eq!(json["directives"][0]["op"], "add");
    assert_eq!(json["directives"][1]["op"], "wait");
    assert_eq!(json["frames"][0]["label"], "only");
    assert_eq!(json["frames"][0]["visual_matrix"]["engine"], "geometric");
}
