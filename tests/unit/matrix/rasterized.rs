use std::path::Path;

use super::*;

fn opts(root: &Path) -> RasterizedOpts {
    RasterizedOpts {
        scratch_dir: Some(root.to_path_buf()),
        seed: Some(11),
        ..RasterizedOpts::default()
    }
}

fn ramp_tensor(shape: [usize; 4]) -> Tensor {
    let mut i = 0.0;
    Tensor::from_fn(shape, |_| {
        i += 1.0;
        i
    })
    .unwrap()
}

fn build_dirs(root: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

struct FailingPlotter;

impl VoxelPlotter for FailingPlotter {
    fn plot(&self, _field: &VoxelField) -> TensorSpecResult<String> {
        Err(TensorSpecError::resource("renderer unavailable"))
    }
}

#[test]
fn one_vector_layer_and_annotation_per_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(opts(tmp.path())).unwrap();
    let m = builder.build(&ramp_tensor([3, 2, 3, 3]), "x").unwrap();

    assert_eq!(builder.engine(), MatrixEngine::Rasterized);
    assert_eq!(m.engine, MatrixEngine::Rasterized);
    assert_eq!(m.label, "x");
    assert_eq!(m.layers.len(), 3);
    assert_eq!(m.annotation_count(), 3);
    assert_eq!(m.cell_count(), 0);
    for (b, layer) in m.layers.iter().enumerate() {
        assert_eq!(layer.batch, b);
        assert_eq!(layer.channel, None);
        let LayerContent::Vector { asset } = &layer.content else {
            panic!("expected a vector layer");
        };
        assert!(!asset.paths.is_empty());
        assert!(asset.id.starts_with(ASSET_STEM));
    }
    assert!(m.annotations.iter().all(|a| a.text == "(2, 3, 3)"));
}

#[test]
fn plots_are_scaled_to_asset_height_and_labelled_beneath() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(opts(tmp.path())).unwrap();
    let m = builder.build(&ramp_tensor([1, 3, 4, 4]), "x").unwrap();

    let plot = m.layers[0].bounds().unwrap();
    assert!((plot.height() - 2.0).abs() < 1e-6);
    let note = m.annotations[0].bounds().unwrap();
    assert!((plot.y0 - 0.1 - note.y1).abs() < 1e-6);
    assert!((note.width() - plot.width()).abs() < 1e-6);
}

#[test]
fn batches_stack_downwards_with_the_shared_gap() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(opts(tmp.path())).unwrap();
    let m = builder.build(&ramp_tensor([2, 2, 2, 2]), "x").unwrap();

    let first_note = m.annotations[0].bounds().unwrap();
    let second_plot = m.layers[1].bounds().unwrap();
    assert!((first_note.y0 - 0.2 - second_plot.y1).abs() < 1e-6);
    assert!((m.layers[0].bounds().unwrap().x0 - second_plot.x0).abs() < 1e-6);
}

#[test]
fn scratch_is_emptied_after_a_default_build() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(opts(tmp.path())).unwrap();
    builder.build(&ramp_tensor([2, 2, 2, 2]), "x").unwrap();
    assert!(build_dirs(tmp.path()).is_empty());
    assert!(builder.cache().retained().is_none());
}

#[test]
fn retained_build_holds_one_asset_per_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(RasterizedOpts {
        retain_assets: true,
        ..opts(tmp.path())
    })
    .unwrap();
    builder.build(&ramp_tensor([3, 2, 2, 2]), "x").unwrap();

    let dirs = build_dirs(tmp.path());
    assert_eq!(dirs.len(), 1);
    let assets = build_dirs(&dirs[0]);
    assert_eq!(assets.len(), 3);
    assert!(assets.iter().all(|p| p.extension().is_some_and(|e| e == "svg")));
}

#[test]
fn rank_mismatch_is_a_shape_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = RasterizedMatrixBuilder::new(opts(tmp.path())).unwrap();
    let t = Tensor::filled([2, 2, 2], 1.0).unwrap();
    assert!(matches!(builder.build(&t, "x"), Err(TensorSpecError::Shape(_))));
}

#[test]
fn plotter_failure_propagates_and_leaves_nothing_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder =
        RasterizedMatrixBuilder::with_plotter(opts(tmp.path()), FailingPlotter).unwrap();
    let err = builder.build(&ramp_tensor([1, 1, 2, 2]), "x").unwrap_err();
    assert!(matches!(err, TensorSpecError::Resource(_)));
    assert!(build_dirs(tmp.path()).is_empty());
}

#[test]
fn opts_validation() {
    let bad = RasterizedOpts {
        asset_height: 0.0,
        ..RasterizedOpts::default()
    };
    assert!(matches!(bad.validate(), Err(TensorSpecError::Validation(_))));
    let bad = RasterizedOpts {
        batch_gap: -1.0,
        ..RasterizedOpts::default()
    };
    assert!(bad.validate().is_err());
}
