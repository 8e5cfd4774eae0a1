use std::path::Path;

use receipt_splitter::SplitReport;

pub(crate) fn print_summary(report: &SplitReport, output_folder: &Path) {
    for failed in &report.failed_writes {
        eprintln!(
            "Could not save receipt {} to {}: {}",
            failed.index,
            failed.path.display(),
            failed.reason
        );
    }

    if report.is_low_yield() {
        println!("\n[!] Warning: Only found {} receipt(s).", report.count());
        println!(
            "Check '{}'. If it's all white, the threshold sensitivity needs adjusting (try a larger --block-size).",
            report.mask_path.display()
        );
    } else {
        println!(
            "\nSuccess! Found {} receipts in the '{}' folder.",
            report.count(),
            output_folder.display()
        );
    }
}

pub(crate) fn print_details(report: &SplitReport) {
    println!(
        "Image: {}x{} pixels, {} external regions, {} kept",
        report.image_width,
        report.image_height,
        report.contours_found,
        report.count()
    );
    for detection in &report.detections {
        let b = detection.bbox;
        println!(
            "  #{}: x={} y={} w={} h={} -> {}",
            detection.index,
            b.x,
            b.y,
            b.width,
            b.height,
            detection.path.display()
        );
    }
    if let Some(overlay) = &report.overlay_path {
        println!("Overlay written to {}", overlay.display());
    }
}
