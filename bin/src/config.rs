use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use receipt_splitter::{SizeFilter, SplitterParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Input setting
    #[serde(default)]
    pub input: InputConfig,
    /// Segmentation parameters
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InputConfig {
    /// Photo holding the receipts
    pub input: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("rs.jpg"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ProcessingConfig {
    /// Adaptive threshold window side (odd)
    pub block_size: u32,
    /// Adaptive threshold offset
    pub threshold_c: f32,
    /// Closing element side
    pub kernel_size: u32,
    /// Closing passes
    pub close_iterations: u32,
    /// Minimum receipt width and height, as a fraction of the image size
    pub min_fraction: f64,
    /// Maximum receipt width, as a fraction of the image width
    pub max_width_fraction: f64,
    /// Enable verbose output
    pub verbose: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let params = SplitterParams::default();
        Self {
            block_size: params.block_size,
            threshold_c: params.threshold_c,
            kernel_size: params.kernel_size,
            close_iterations: params.close_iterations,
            min_fraction: params.size_filter.min_fraction,
            max_width_fraction: params.size_filter.max_width_fraction,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    /// Folder receiving receipt_<n>.jpg
    pub output_folder: PathBuf,
    /// Cleaned binary mask, always written
    pub debug_mask: PathBuf,
    /// Source image with the kept boxes drawn on it
    pub overlay: Option<PathBuf>,
    /// JPEG quality for every written file
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::from("extracted_receipts"),
            debug_mask: PathBuf::from("debug_mask.jpg"),
            overlay: None,
            jpeg_quality: SplitterParams::default().jpeg_quality,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> anyhow::Result<Config> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: Config = match config_path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&config_str)?,
            Some("toml") => toml::from_str(&config_str)?,
            _ => bail!("Unsupported config file format. Use .json or .toml"),
        };
        Ok(config)
    }

    pub fn save_default(config_path: &Path) -> anyhow::Result<()> {
        let config = Config::default();
        let config_str = match config_path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&config)?,
            _ => serde_json::to_string_pretty(&config)?, // Default to JSON
        };

        let mut file = File::create(config_path)
            .with_context(|| format!("Failed to create {}", config_path.display()))?;
        file.write_all(config_str.as_bytes())?;
        println!("Generated default configuration file: {}", config_path.display());
        Ok(())
    }

    pub fn splitter_params(&self) -> SplitterParams {
        SplitterParams {
            block_size: self.processing.block_size,
            threshold_c: self.processing.threshold_c,
            kernel_size: self.processing.kernel_size,
            close_iterations: self.processing.close_iterations,
            size_filter: SizeFilter {
                min_fraction: self.processing.min_fraction,
                max_width_fraction: self.processing.max_width_fraction,
            },
            jpeg_quality: self.output.jpeg_quality,
        }
    }
}
