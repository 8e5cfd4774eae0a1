use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};

use crate::contour::find_external_contours;
use crate::draw::draw_detections;
use crate::crop::{BoundingBox, SizeFilter, filter_and_crop};
use crate::error::Result;
use crate::io::{DEFAULT_JPEG_QUALITY, ensure_directory, load_image, write_image};
use crate::morphology::{SquareElement, close};
use crate::threshold::{adaptive_binarize, to_grayscale};

/// Tuning knobs of the segmentation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterParams {
    /// Side of the adaptive threshold window, odd.
    pub block_size: u32,
    /// How much darker than its neighbourhood a pixel must be.
    pub threshold_c: f32,
    /// Side of the square closing element.
    pub kernel_size: u32,
    /// Closing passes. Two bridge wider gaps but also fuse receipts that touch.
    pub close_iterations: u32,
    pub size_filter: SizeFilter,
    pub jpeg_quality: u8,
}

impl Default for SplitterParams {
    fn default() -> Self {
        Self {
            block_size: 21,
            threshold_c: 10.0,
            kernel_size: 10,
            close_iterations: 2,
            size_filter: SizeFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// A region that passed the size filter and was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 1-based, matches the file name.
    pub index: usize,
    pub bbox: BoundingBox,
    pub path: PathBuf,
}

/// A region that passed the size filter but whose crop could not be written.
/// Its index is not reused.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedWrite {
    pub index: usize,
    pub bbox: BoundingBox,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub image_width: u32,
    pub image_height: u32,
    /// External contours before size filtering.
    pub contours_found: usize,
    pub detections: Vec<Detection>,
    pub failed_writes: Vec<FailedWrite>,
    pub mask_path: PathBuf,
    pub overlay_path: Option<PathBuf>,
}

impl SplitReport {
    /// Receipts found, whether or not their crop was written.
    #[inline]
    pub fn count(&self) -> usize {
        self.detections.len() + self.failed_writes.len()
    }

    #[inline]
    pub fn has_failures(&self) -> bool {
        !self.failed_writes.is_empty()
    }

    /// Fewer than two receipts usually means the mask merged or lost them.
    #[inline]
    pub fn is_low_yield(&self) -> bool {
        self.count() <= 1
    }

    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.detections.iter().map(|d| d.bbox).collect()
    }
}

/// Output locations for one run.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub output_dir: PathBuf,
    pub mask_path: PathBuf,
    pub overlay_path: Option<PathBuf>,
}

impl OutputPaths {
    pub fn new(output_dir: impl Into<PathBuf>, mask_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            mask_path: mask_path.into(),
            overlay_path: None,
        }
    }

    pub fn with_overlay(mut self, overlay_path: impl Into<PathBuf>) -> Self {
        self.overlay_path = Some(overlay_path.into());
        self
    }

    pub fn receipt_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("receipt_{}.jpg", index))
    }
}

pub struct ReceiptSplitter {
    params: SplitterParams,
    element: SquareElement,
}

impl ReceiptSplitter {
    pub fn new(params: SplitterParams) -> Result<Self> {
        let element = SquareElement::new(params.kernel_size)?;
        Ok(Self { params, element })
    }

    #[inline]
    pub fn params(&self) -> &SplitterParams {
        &self.params
    }

    /// Grayscale, adaptive threshold and closing: the mask regions are read from.
    ///
    /// Dark paper on a lighter surface is outlined from the inside, so boxes
    /// match the paper. Light paper on a darker surface is outlined from the
    /// outside, and each side of the box then grows by up to half a
    /// threshold window.
    pub fn segment(&self, image: &RgbImage) -> Result<GrayImage> {
        let gray = to_grayscale(image);
        let binary = adaptive_binarize(&gray, self.params.block_size, self.params.threshold_c)?;
        Ok(close(&binary, &self.element, self.params.close_iterations))
    }

    /// Bounding boxes of every external region of `mask`, in the order the
    /// contours were found. Size filtering happens when cropping.
    pub fn candidate_boxes(&self, mask: &GrayImage) -> Vec<BoundingBox> {
        find_external_contours(mask)
            .iter()
            .filter_map(|c| c.bounding_box())
            .collect()
    }

    /// Run the whole pipeline on the image at `input`.
    ///
    /// Nothing is written if the input cannot be loaded. A crop that cannot be
    /// written is recorded in the report and the run carries on; the debug
    /// mask is written last, whatever the count.
    pub fn split(&self, input: &Path, outputs: &OutputPaths) -> Result<SplitReport> {
        self.split_with(input, outputs, |_| {})
    }

    /// Same as [`split`](Self::split), calling `on_saved` right after each
    /// crop is written.
    pub fn split_with<F>(
        &self,
        input: &Path,
        outputs: &OutputPaths,
        mut on_saved: F,
    ) -> Result<SplitReport>
    where
        F: FnMut(&Detection),
    {
        let image = load_image(input)?;
        let (width, height) = image.dimensions();

        let mask = self.segment(&image)?;
        let boxes = self.candidate_boxes(&mask);
        let contours_found = boxes.len();

        ensure_directory(&outputs.output_dir)?;

        let mut detections = Vec::new();
        let mut failed_writes = Vec::new();
        for bbox in boxes {
            let Some(crop) = filter_and_crop(&image, &bbox, &self.params.size_filter) else {
                continue;
            };
            let index = detections.len() + failed_writes.len() + 1;
            let path = outputs.receipt_path(index);
            match write_image(&path, &DynamicImage::ImageRgb8(crop), self.params.jpeg_quality) {
                Ok(()) => {
                    log::info!("Saved receipt {} ({:?}) to {}", index, bbox, path.display());
                    let detection = Detection { index, bbox, path };
                    on_saved(&detection);
                    detections.push(detection);
                }
                Err(e) => {
                    log::warn!("Could not save receipt {}: {}", index, e);
                    failed_writes.push(FailedWrite {
                        index,
                        bbox,
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        log::debug!(
            "{} of {} regions pass the size filter",
            detections.len() + failed_writes.len(),
            contours_found
        );

        if let Some(parent) = outputs.mask_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent)?;
        }
        write_image(
            &outputs.mask_path,
            &DynamicImage::ImageLuma8(mask),
            self.params.jpeg_quality,
        )?;

        let report = SplitReport {
            image_width: width,
            image_height: height,
            contours_found,
            detections,
            failed_writes,
            mask_path: outputs.mask_path.clone(),
            overlay_path: outputs.overlay_path.clone(),
        };

        if let Some(overlay_path) = &report.overlay_path {
            let overlay = draw_detections(&image, &report.boxes());
            write_image(overlay_path, &DynamicImage::ImageRgb8(overlay), self.params.jpeg_quality)?;
        }

        if report.is_low_yield() {
            log::info!(
                "Only {} receipt(s) found in {}, inspect {}",
                report.count(),
                input.display(),
                report.mask_path.display()
            );
        }

        Ok(report)
    }
}
