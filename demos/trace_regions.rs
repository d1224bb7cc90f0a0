use boxtrace::{BoundaryTracer, BrightnessCutoff, WarmColor};
use image::ImageReader;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path> [min_size]", args[0]);
        std::process::exit(1);
    }

    let min_size: u32 = match args.get(2) {
        Some(s) => s.parse()?,
        None => 600,
    };

    let img = ImageReader::open(&args[1])?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
        .to_rgb8();

    println!("Loaded image: {}x{}", img.width(), img.height());

    let cutoff = BrightnessCutoff::from_image(&img, false);
    println!("Brightness cutoff: red < {}", cutoff.threshold);

    let frames = BoundaryTracer::new(&img, cutoff, min_size).find_regions(false);
    println!("\n=== Frames ===");
    println!("Total frames: {}", frames.len());

    for (i, frame) in frames.iter().enumerate() {
        let (x0, y0, x1, y1) = frame.bounds();
        let view = frame.crop();
        let specimen = BoundaryTracer::new(&*view, WarmColor::default(), 30).find_regions(true);
        println!("  {}: ({}, {})-({}, {}) {}x{} specimen={}",
                i + 1, x0, y0, x1, y1, frame.width(), frame.height(), !specimen.is_empty());
    }

    Ok(())
}
