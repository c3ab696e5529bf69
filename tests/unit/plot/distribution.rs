use super::*;

fn linear(shape: &[usize]) -> Tensor {
    let mut i = -1.0;
    Tensor::from_fn(shape.to_vec(), |_| {
        i += 1.0;
        i
    })
    .unwrap()
}

#[test]
fn one_panel_per_batch_with_every_value_counted() {
    let t = linear(&[3, 2, 4, 4]);
    let plot = DistributionPlot::build(&t, &DistributionOpts::default()).unwrap();
    assert_eq!(plot.len(), 3);
    for (i, panel) in plot.panels.iter().enumerate() {
        assert_eq!(panel.batch, i);
        assert_eq!(panel.histogram.bins(), 100);
        assert_eq!(panel.histogram.total(), 32);
        assert_eq!(panel.histogram.edges.len(), 101);
    }
}

#[test]
fn rank_one_is_a_single_panel() {
    let t = Tensor::new([5], vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
    let plot = DistributionPlot::build(&t, &DistributionOpts::default()).unwrap();
    assert_eq!(plot.len(), 1);
    assert_eq!(plot.panels[0].histogram.total(), 5);
}

#[test]
fn labels_show_raw_extremes() {
    let t = Tensor::new([1, 3], vec![-1.5, 0.25, 3.14159]).unwrap();
    let plot = DistributionPlot::build(&t, &DistributionOpts::default()).unwrap();
    let p = &plot.panels[0];
    assert_eq!(p.min_label.text, "Min: -1.50");
    assert_eq!(p.max_label.text, "Max: 3.14");
}

#[test]
fn labels_anchor_to_bottom_corners() {
    let opts = DistributionOpts::default();
    let t = linear(&[1, 50]);
    let plot = DistributionPlot::build(&t, &opts).unwrap();
    let p = &plot.panels[0];
    let x_axis = p.axes[0].bounds().unwrap();
    let min = p.min_label.bounds().unwrap();
    let max = p.max_label.bounds().unwrap();
    assert!((min.x0 - x_axis.x0).abs() < 1e-9);
    assert!((max.x1 - x_axis.x1).abs() < 1e-9);
    assert!((x_axis.y0 - opts.label_buff - min.y1).abs() < 1e-9);
    assert!((x_axis.y0 - opts.label_buff - max.y1).abs() < 1e-9);
}

#[test]
fn density_peak_matches_tallest_bar() {
    let opts = DistributionOpts::default();
    let t = Tensor::new([1, 6], vec![0.0, 0.1, 0.1, 0.1, 0.5, 1.0]).unwrap();
    let plot = DistributionPlot::build(&t, &opts).unwrap();
    let p = &plot.panels[0];
    let bar_top = p
        .bars
        .iter()
        .map(|b| b.bounds().unwrap().y1)
        .fold(f64::MIN, f64::max);
    let curve_top = p
        .density_curve
        .points
        .iter()
        .map(|pt| pt.y)
        .fold(f64::MIN, f64::max);
    assert!((bar_top - curve_top).abs() < 1e-9);
    assert_eq!(p.density_curve.points.len(), 1000);
}

#[test]
fn chart_spans_configured_size() {
    let opts = DistributionOpts::default();
    let plot = DistributionPlot::build(&linear(&[1, 20]), &opts).unwrap();
    let p = &plot.panels[0];
    let x_axis = p.axes[0].bounds().unwrap();
    let y_axis = p.axes[1].bounds().unwrap();
    assert!((x_axis.width() - 6.0).abs() < 1e-9);
    assert!((y_axis.height() - 4.0).abs() < 1e-9);
}

#[test]
fn panels_stack_upwards() {
    let opts = DistributionOpts::default();
    let plot = DistributionPlot::build(&linear(&[3, 10]), &opts).unwrap();
    for (i, p) in plot.panels.iter().enumerate() {
        let c = p.center();
        assert!(c.x.abs() < 1e-9);
        assert!((c.y - i as f64 * 5.0).abs() < 1e-9);
    }
}

#[test]
fn constant_tensor_uses_the_fallback_policy() {
    let t = Tensor::filled([1, 2, 3, 3], 7.0).unwrap();
    let plot = DistributionPlot::build(&t, &DistributionOpts::default()).unwrap();
    let p = &plot.panels[0];
    // every value normalizes to 0.5
    assert_eq!(p.histogram.counts[50], 18);
    assert_eq!(p.min_label.text, "Min: 7.00");
    assert!(p.density_curve.points.iter().all(|pt| pt.y.is_finite()));
}

#[test]
fn non_finite_values_are_degenerate() {
    let t = Tensor::new([1, 2], vec![0.0, f64::NAN]).unwrap();
    assert!(matches!(
        DistributionPlot::build(&t, &DistributionOpts::default()),
        Err(TensorSpecError::Degenerate(_))
    ));
}

#[test]
fn to_group_holds_every_primitive() {
    let plot = DistributionPlot::build(&linear(&[2, 10]), &DistributionOpts::default()).unwrap();
    let g = plot.to_group();
    let expected: usize = plot.panels.iter().map(|p| p.bars.len() + 5).sum();
    assert_eq!(g.len(), expected);
    assert_eq!(g.text_count(), 4);
}

#[test]
fn opts_validation() {
    let bad = DistributionOpts {
        num_bins: 0,
        ..DistributionOpts::default()
    };
    assert!(matches!(bad.validate(), Err(TensorSpecError::Validation(_))));
    let bad = DistributionOpts {
        bar_width_ratio: 1.5,
        ..DistributionOpts::default()
    };
    assert!(bad.validate().is_err());
    let bad = DistributionOpts {
        width: -1.0,
        ..DistributionOpts::default()
    };
    assert!(bad.validate().is_err());
    assert!(DistributionOpts::default().validate().is_ok());
}
