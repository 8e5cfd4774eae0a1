mod config;
mod processing;
mod stats;

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use crate::config::Config;
use crate::processing::Processor;

#[derive(Parser)]
#[command(name = "receipt-splitter")]
#[command(about = "Split a photo of several receipts into one image per receipt")]
#[command(version = "0.1")]
struct Args {
    /// Photo holding the receipts
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for receipt_<n>.jpg
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the cleaned binary mask
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Also write the source image with the kept boxes outlined
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Configuration file path (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Adaptive threshold window side, odd
    #[arg(long)]
    block_size: Option<u32>,

    /// Adaptive threshold offset
    #[arg(long)]
    threshold_c: Option<f32>,

    /// Closing element side in pixels
    #[arg(long)]
    kernel_size: Option<u32>,

    /// Closing passes
    #[arg(long)]
    close_iterations: Option<u32>,

    /// Minimum receipt width/height as a fraction of the image
    #[arg(long)]
    min_fraction: Option<f64>,

    /// Maximum receipt width as a fraction of the image width
    #[arg(long)]
    max_width_fraction: Option<f64>,

    /// JPEG quality of written files (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle config generation
    if args.generate_config {
        let config_path = args.config.unwrap_or_else(|| PathBuf::from("splitter_config.json"));
        Config::save_default(&config_path)?;
        return Ok(());
    }

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Override config with command line arguments
    if let Some(input) = args.input {
        config.input.input = input;
    }
    if let Some(output) = args.output {
        config.output.output_folder = output;
    }
    if let Some(mask) = args.mask {
        config.output.debug_mask = mask;
    }
    if args.overlay.is_some() {
        config.output.overlay = args.overlay;
    }
    if let Some(block_size) = args.block_size {
        config.processing.block_size = block_size;
    }
    if let Some(threshold_c) = args.threshold_c {
        config.processing.threshold_c = threshold_c;
    }
    if let Some(kernel_size) = args.kernel_size {
        config.processing.kernel_size = kernel_size;
    }
    if let Some(close_iterations) = args.close_iterations {
        config.processing.close_iterations = close_iterations;
    }
    if let Some(min_fraction) = args.min_fraction {
        config.processing.min_fraction = min_fraction;
    }
    if let Some(max_width_fraction) = args.max_width_fraction {
        config.processing.max_width_fraction = max_width_fraction;
    }
    if let Some(jpeg_quality) = args.jpeg_quality {
        config.output.jpeg_quality = jpeg_quality;
    }
    if args.verbose {
        config.processing.verbose = true;
    }

    let default_filter = if config.processing.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let processor = Processor::new(config.clone())?;
    let report = match processor.process() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if config.processing.verbose {
        stats::print_details(&report);
    }
    stats::print_summary(&report, &config.output.output_folder);

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
