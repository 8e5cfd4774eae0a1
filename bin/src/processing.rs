use anyhow::Context;
use receipt_splitter::{OutputPaths, ReceiptSplitter, SplitReport};

use crate::config::Config;

pub(crate) struct Processor {
    config: Config,
    splitter: ReceiptSplitter,
}

impl Processor {
    pub(crate) fn new(config: Config) -> anyhow::Result<Self> {
        let splitter = ReceiptSplitter::new(config.splitter_params())
            .context("Invalid segmentation parameters")?;
        Ok(Processor { config, splitter })
    }

    pub(crate) fn process(&self) -> anyhow::Result<SplitReport> {
        let input = &self.config.input.input;
        let output = &self.config.output;

        let mut outputs = OutputPaths::new(&output.output_folder, &output.debug_mask);
        if let Some(overlay) = &output.overlay {
            outputs = outputs.with_overlay(overlay);
        }

        if self.config.processing.verbose {
            println!("Processing: {}", input.display());
            println!("Parameters: {:?}", self.splitter.params());
        }
        println!("Detecting pieces...");

        let report = self
            .splitter
            .split_with(input, &outputs, |detection| {
                println!("Saved receipt {}", detection.index)
            })
            .with_context(|| format!("Failed to split {}", input.display()))?;

        Ok(report)
    }
}
