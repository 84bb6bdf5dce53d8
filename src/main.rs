use clap::Parser;
use log::info;
use std::path::PathBuf;

use brick_cv::utils::ImageUtils;
use brick_cv::{DetectionConfig, ShapeDetector};

mod console;

#[derive(Parser)]
#[command(name = "brickscan")]
#[command(about = "Detect and classify coloured bricks in an image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON configuration (defaults are used for missing fields)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Template directory, replaces the configured search path
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Write the annotated frame to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the detection result as JSON to this path
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Use the whole frame instead of its centre square
    #[arg(long)]
    no_crop: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => DetectionConfig::load(path)?,
        None => DetectionConfig::default(),
    };
    if let Some(dir) = args.templates {
        config = config.with_template_dirs(vec![dir]);
    }

    let detector = ShapeDetector::new(config)?;

    let frame = ImageUtils::load_mat_color(&args.image_path)?;
    let frame = if args.no_crop {
        frame
    } else {
        ImageUtils::center_square(&frame)?
    };

    let result = detector.detect(&frame)?;
    print!("{}", console::format_listing(&result.shapes, &console::timestamp()));

    for event in result.report.iter() {
        info!("{}", event);
    }

    if let Some(path) = &args.output {
        let annotated = detector.annotate(&frame, &result)?;
        ImageUtils::save_image(&annotated, path)?;
        println!("Annotated frame saved: {:?}", path);
    }

    if let Some(path) = &args.json {
        detector.export_json(&result, path)?;
        println!("Detection result saved: {:?}", path);
    }

    Ok(())
}
