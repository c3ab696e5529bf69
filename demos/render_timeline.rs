use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tensorspec::{
    Edge, EngineConfig, Group, Point, SceneOrchestrator, SvgExportOpts, TRIM_MARGIN,
    TRIM_THRESHOLD, Tensor, Transformable, ViewportSize, rasterize, save_png, to_svg_document,
    trim_margins,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/tensorspec-demo"));
    std::fs::create_dir_all(&out_dir)?;

    let config = match std::env::var("TENSORSPEC_CONFIG") {
        Ok(path) => EngineConfig::from_path(path)?,
        Err(_) => EngineConfig::default(),
    };

    let mut rng = StdRng::seed_from_u64(0);
    let tensors = vec![
        Tensor::random([1, 3, 8, 8], &mut rng)?,
        Tensor::random([1, 16, 4, 4], &mut rng)?,
        Tensor::random([1, 64, 2, 2], &mut rng)?,
    ];
    let labels = ["input", "encoder", "bottleneck"];

    let viewport = ViewportSize::default();
    let mut orchestrator = SceneOrchestrator::from_config(&config, &viewport)?;
    let timeline = orchestrator.build(&tensors, &labels)?;
    std::fs::write(out_dir.join("timeline.json"), timeline.to_json()?)?;

    let opts = SvgExportOpts {
        frame: Some(viewport.rect()),
        ..SvgExportOpts::default()
    };
    for (i, frame) in timeline.frames.iter().enumerate() {
        let svg = to_svg_document(&frame.to_group(), &opts)?;
        let img = trim_margins(&rasterize(&svg, 1.0)?, TRIM_MARGIN, TRIM_THRESHOLD);
        let path = out_dir.join(format!("frame_{i:02}_{}.png", frame.label));
        save_png(&img, &path)?;
        println!("frame {i}: {}x{} -> {}", img.width(), img.height(), path.display());
    }
    let overview = architecture(&config, &tensors, &labels)?;
    let svg = to_svg_document(&overview, &SvgExportOpts::default())?;
    let path = out_dir.join("architecture.png");
    save_png(
        &trim_margins(&rasterize(&svg, 1.0)?, TRIM_MARGIN, TRIM_THRESHOLD),
        &path,
    )?;
    println!("architecture -> {}", path.display());

    println!(
        "{} transitions, {:.1}s total",
        timeline.transition_count(),
        timeline.total_duration()
    );

    Ok(())
}

/// Flat blocks stepping down to the right, chained by connectors and framed as one model.
fn architecture(
    config: &EngineConfig,
    tensors: &[Tensor],
    labels: &[&str],
) -> anyhow::Result<Group> {
    let mut blocks = Vec::with_capacity(tensors.len());
    let mut x = 0.0;
    for (i, (tensor, label)) in tensors.iter().zip(labels).enumerate() {
        let mut block = config.flat_matrix(&tensor.shape()[1..], label)?;
        block.scale_to_fit_height(2.0);
        block.move_to(Point::new(0.0, -3.0 * i as f64));
        block.align_left_to(x);
        x += block.width() + 1.5;
        blocks.push(block);
    }

    let mut group = Group::new();
    for block in &blocks {
        group.append(block.to_group());
    }
    for pair in blocks.windows(2) {
        group.push(config.connect(&pair[0], Edge::Down, &pair[1], Edge::Left)?);
    }
    group.move_to(Point::ORIGIN);
    let frame = config.bound_box(&group, "model")?;
    group.append(frame.to_group());
    Ok(group)
}
