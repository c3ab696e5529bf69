use super::*;
use image::Rgba;

fn canvas(w: u32, h: u32, bg: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(bg))
}

#[test]
fn rasterize_scales_the_document() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">
        <rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
    </svg>"##;
    let img = rasterize(svg, 2.0).unwrap();
    assert_eq!(img.dimensions(), (20, 40));
    assert_eq!(img.get_pixel(5, 5).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 30).0[3], 0);
}

#[test]
fn rasterize_rejects_bad_input() {
    assert!(matches!(
        rasterize("<svg/>", 0.0),
        Err(TensorSpecError::Validation(_))
    ));
    assert!(rasterize("not svg", 1.0).is_err());
}

#[test]
fn background_is_the_corner_median() {
    let mut img = canvas(4, 4, [10, 10, 10, 255]);
    img.put_pixel(0, 0, Rgba([250, 250, 250, 255]));
    assert_eq!(corner_background(&img), [10.0, 10.0, 10.0, 255.0]);
}

#[test]
fn trim_keeps_a_margin_around_content() {
    let mut img = canvas(100, 80, [0, 0, 0, 255]);
    for x in 40..50 {
        for y in 30..35 {
            img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let trimmed = trim_margins(&img, TRIM_MARGIN, TRIM_THRESHOLD);
    assert_eq!(trimmed.dimensions(), (10 + 20, 5 + 20));
    assert_eq!(trimmed.get_pixel(10, 10).0, [255, 255, 255, 255]);
}

#[test]
fn trim_clamps_at_the_image_edge_and_ignores_faint_pixels() {
    let mut img = canvas(50, 50, [0, 0, 0, 255]);
    img.put_pixel(2, 48, Rgba([255, 0, 0, 255]));
    img.put_pixel(30, 30, Rgba([10, 10, 10, 255]));
    let trimmed = trim_margins(&img, TRIM_MARGIN, TRIM_THRESHOLD);
    assert_eq!(trimmed.dimensions(), (13, 12));
}

#[test]
fn blank_images_are_returned_unchanged() {
    let img = canvas(8, 8, [7, 7, 7, 255]);
    assert_eq!(trim_margins(&img, TRIM_MARGIN, TRIM_THRESHOLD), img);
}

#[test]
fn png_round_trip_through_trim_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    let mut img = canvas(60, 60, [255, 255, 255, 255]);
    img.put_pixel(30, 30, Rgba([0, 0, 0, 255]));
    save_png(&img, &input).unwrap();
    trim_png(&input, &output).unwrap();
    let back = image::open(&output).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (21, 21));
}

#[test]
fn missing_inputs_are_resource_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = trim_png(&dir.path().join("absent.png"), &dir.path().join("out.png"));
    assert!(matches!(err, Err(TensorSpecError::Resource(_))));
}
