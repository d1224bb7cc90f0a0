use clap::Parser;
use image::{ImageReader, Rgb};
use std::path::PathBuf;
use std::sync::Arc;

use boxtrace::detection::code::{CodeReader, QrCodeReader, StaticCodeReader};
use boxtrace::detection::overlay::draw_regions;
use boxtrace::{DetectionParams, OutputWriter, SpecimenLabel, build_standard_pipeline};

#[derive(Parser)]
#[command(name = "boxtrace")]
#[command(about = "Extract labelled specimen frames from photos")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Root directory for extracted frames
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Number of labelled specimens expected in the photo
    #[arg(value_name = "EXPECTED")]
    expected: usize,

    /// Frames are lighter than the backdrop
    #[arg(long)]
    inverted: bool,

    /// Minimum frame width and height in pixels
    #[arg(long, default_value_t = 600)]
    frame_min_size: u32,

    /// Minimum specimen blob width and height in pixels
    #[arg(long, default_value_t = 30)]
    blob_min_size: u32,

    /// How many pixels of missing edge the tracer will jump
    #[arg(long, default_value_t = 20)]
    gap_width: u32,

    /// Use this label for every frame instead of decoding QR codes
    #[arg(long, value_name = "TEXT")]
    label: Option<String>,

    /// Save the input with detected frames outlined
    #[arg(long, value_name = "PNG")]
    overlay: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    log::debug!("Loading image: {:?}", args.image_path);
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    log::debug!("Image loaded: {}x{}", img.width(), img.height());

    let params = DetectionParams::new()
        .with_inverted(args.inverted)
        .with_frame_min_size(args.frame_min_size)
        .with_blob_min_size(args.blob_min_size)
        .with_gap_width(args.gap_width);

    let reader: Arc<dyn CodeReader> = match args.label {
        Some(text) => Arc::new(StaticCodeReader(Some(text))),
        None => Arc::new(QrCodeReader),
    };

    let mut pipeline = build_standard_pipeline(&params, reader);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let results = pipeline.run(img.clone())?;

    if let Some(overlay_path) = &args.overlay {
        let boxes: Vec<_> = results.iter().filter_map(|item| item.bbox).collect();
        draw_regions(&img, &boxes, Rgb([255, 0, 0]), 5)
            .save(overlay_path)
            .map_err(|e| anyhow::anyhow!("Failed to save overlay: {}", e))?;
    }

    let mut writer = OutputWriter::new(&args.output_dir);
    for item in results {
        let Some(text) = item.get_string("code_text") else {
            continue;
        };
        match SpecimenLabel::parse(text) {
            Some(label) => {
                writer.plan(&label, item.image);
            }
            None => log::warn!("Ignoring frame {:?} with unrecognised label '{}'", item.bbox, text),
        }
    }

    let written = writer.write_expected(args.expected)?;

    println!("\n=== Specimen Extraction Results ===");
    println!("Processed {}: wrote {} frames", args.image_path.display(), written.len());
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}
