use super::*;

#[test]
fn parses_filled_paths_and_flips_y() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <path d="M 0 0 L 4 0 L 4 2 Z" fill="#ff0000" fill-opacity="0.5"/>
</svg>"##;
    let asset = parse_svg(svg, "a").unwrap();
    assert_eq!(asset.id, "a");
    assert_eq!(asset.paths.len(), 1);
    let p = &asset.paths[0];
    let fill = p.fill.unwrap();
    assert_eq!(fill.r, 1.0);
    assert!((fill.a - 0.5).abs() < 1e-6);
    assert!(p.stroke.is_none());

    let b = asset.bounds().unwrap();
    assert!((b.x0 - 0.0).abs() < 1e-6 && (b.x1 - 4.0).abs() < 1e-6);
    assert!((b.y0 + 2.0).abs() < 1e-6 && b.y1.abs() < 1e-6);
}

#[test]
fn bakes_group_transforms() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
  <g transform="translate(5 0)">
    <path d="M 0 0 L 1 0 L 1 1 Z" fill="none" stroke="#000000" stroke-width="0.25"/>
  </g>
</svg>"##;
    let asset = parse_svg(svg, "g").unwrap();
    assert_eq!(asset.paths.len(), 1);
    let (color, width) = asset.paths[0].stroke.unwrap();
    assert_eq!(color.r, 0.0);
    assert!((width - 0.25).abs() < 1e-6);
    assert!((asset.bounds().unwrap().x0 - 5.0).abs() < 1e-6);
}

#[test]
fn invalid_svg_is_an_error() {
    assert!(parse_svg(b"<svg", "bad").is_err());
}

#[test]
fn load_svg_uses_file_stem_as_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("3d_plot_abc.svg");
    std::fs::write(
        &path,
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><rect width="1" height="1" fill="#00ff00"/></svg>"##,
    )
    .unwrap();
    let asset = load_svg(&path).unwrap();
    assert_eq!(asset.id, "3d_plot_abc");
    assert_eq!(asset.paths.len(), 1);

    assert!(load_svg(&dir.path().join("missing.svg")).is_err());
}

#[test]
fn missing_files_are_resource_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_svg(&dir.path().join("absent.svg")),
        Err(TensorSpecError::Resource(_))
    ));
}
