mod common;

use std::fs;
use std::path::Path;

use common::synthetic_image::{paper_on_dark_table, receipts_on_table, save_png};
use image::RgbImage;
use receipt_splitter::error::Error;
use receipt_splitter::{BoundingBox, OutputPaths, ReceiptSplitter, SplitReport, SplitterParams};

const TOLERANCE: i64 = 2;

fn run(dir: &Path, width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> SplitReport {
    run_on(dir, &receipts_on_table(width, height, rects))
}

fn run_on(dir: &Path, image: &RgbImage) -> SplitReport {
    let input = dir.join("rs.png");
    save_png(image, &input);

    let outputs = OutputPaths::new(dir.join("extracted_receipts"), dir.join("debug_mask.jpg"));
    let splitter = ReceiptSplitter::new(SplitterParams::default()).unwrap();
    splitter.split(&input, &outputs).unwrap()
}

fn sorted_boxes(report: &SplitReport) -> Vec<BoundingBox> {
    let mut boxes = report.boxes();
    boxes.sort_by_key(|b| (b.x, b.y));
    boxes
}

fn assert_close(actual: &BoundingBox, expected: (u32, u32, u32, u32)) {
    let diffs = [
        actual.x as i64 - expected.0 as i64,
        actual.y as i64 - expected.1 as i64,
        actual.width as i64 - expected.2 as i64,
        actual.height as i64 - expected.3 as i64,
    ];
    assert!(
        diffs.iter().all(|d| d.abs() <= TOLERANCE),
        "box {:?} too far from {:?}",
        actual,
        expected
    );
}

fn receipt_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn separated_receipts_are_cropped_individually() {
    let dir = tempfile::tempdir().unwrap();
    // At least 20 px from every edge, so closing cannot stretch a receipt to the border.
    let rects = [(20, 30, 80, 200), (150, 40, 90, 180), (280, 20, 100, 250)];
    let report = run(dir.path(), 400, 300, &rects);

    assert_eq!(report.count(), 3);
    assert!(!report.is_low_yield());
    for (actual, expected) in sorted_boxes(&report).iter().zip(rects) {
        assert_close(actual, expected);
    }

    for detection in &report.detections {
        let crop = image::open(&detection.path).unwrap();
        assert_eq!(
            (crop.width(), crop.height()),
            (detection.bbox.width, detection.bbox.height)
        );
    }
    assert_eq!(
        receipt_files(&dir.path().join("extracted_receipts")),
        vec!["receipt_1.jpg", "receipt_2.jpg", "receipt_3.jpg"]
    );
    assert!(dir.path().join("debug_mask.jpg").is_file());
}

#[test]
fn blank_table_yields_nothing_but_still_writes_mask() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(dir.path(), 320, 240, &[]);

    assert_eq!(report.count(), 0);
    assert!(report.is_low_yield());
    assert!(report.mask_path.is_file());

    let mask = image::open(&report.mask_path).unwrap().to_luma8();
    assert_eq!(mask.dimensions(), (320, 240));
    assert!(receipt_files(&dir.path().join("extracted_receipts")).is_empty());
}

#[test]
fn single_receipt_is_low_yield() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(dir.path(), 300, 200, &[(100, 40, 80, 120)]);
    assert_eq!(report.count(), 1);
    assert!(report.is_low_yield());
}

#[test]
fn receipt_exactly_ten_percent_wide_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    // 40 px is 10% of 400 and is dropped, 60 px is kept.
    let report = run(dir.path(), 400, 300, &[(50, 50, 40, 150), (200, 50, 60, 150)]);

    let boxes = sorted_boxes(&report);
    assert_eq!(boxes.len(), 1, "{:?}", boxes);
    assert_close(&boxes[0], (200, 50, 60, 150));
}

#[test]
fn receipt_exactly_ninety_percent_wide_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(dir.path(), 400, 300, &[(20, 40, 360, 100), (100, 190, 150, 80)]);

    let boxes = sorted_boxes(&report);
    assert_eq!(boxes.len(), 1, "{:?}", boxes);
    assert_close(&boxes[0], (100, 190, 150, 80));
}

#[test]
fn tall_receipt_spanning_the_height_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    // 290 of 300 rows: far above 90% of the height, still accepted.
    let report = run(dir.path(), 400, 300, &[(60, 5, 100, 290), (250, 50, 100, 150)]);
    assert_eq!(report.count(), 2);
    assert!(report.boxes().iter().any(|b| b.height >= 290));
}

#[test]
fn rerun_overwrites_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let rects = [(30, 30, 100, 200), (220, 40, 120, 180)];

    let first = run(dir.path(), 400, 300, &rects);
    let second = run(dir.path(), 400, 300, &rects);

    assert_eq!(first, second);
    assert_eq!(
        receipt_files(&dir.path().join("extracted_receipts")),
        vec!["receipt_1.jpg", "receipt_2.jpg"]
    );
}

#[test]
fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = OutputPaths::new(dir.path().join("out"), dir.path().join("debug_mask.jpg"));
    let splitter = ReceiptSplitter::new(SplitterParams::default()).unwrap();

    let err = splitter.split(&dir.path().join("rs.jpg"), &outputs).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }), "{}", err);
    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("debug_mask.jpg").exists());
}

#[test]
fn overlay_is_written_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rs.png");
    save_png(&receipts_on_table(300, 200, &[(40, 30, 80, 140), (180, 30, 80, 140)]), &input);

    let outputs = OutputPaths::new(dir.path().join("crops"), dir.path().join("mask.jpg"))
        .with_overlay(dir.path().join("overlay.jpg"));
    let splitter = ReceiptSplitter::new(SplitterParams::default()).unwrap();
    let report = splitter.split(&input, &outputs).unwrap();

    assert_eq!(report.count(), 2);
    let overlay = image::open(dir.path().join("overlay.jpg")).unwrap();
    assert_eq!((overlay.width(), overlay.height()), (300, 200));
}

#[test]
fn light_paper_on_dark_table_is_outlined_from_outside() {
    let dir = tempfile::tempdir().unwrap();
    let rects = [(20, 30, 80, 200), (150, 40, 90, 180)];
    let report = run_on(dir.path(), &paper_on_dark_table(400, 300, &rects));

    assert_eq!(report.count(), 2);
    // The box holds the whole sheet and grows by at most half a threshold window per side.
    let slack = SplitterParams::default().block_size / 2;
    for (actual, (x, y, w, h)) in sorted_boxes(&report).iter().zip(rects) {
        assert!(actual.x <= x && actual.y <= y, "{:?}", actual);
        assert!(actual.right() >= x + w && actual.bottom() >= y + h, "{:?}", actual);
        assert!(x - actual.x <= slack && y - actual.y <= slack, "{:?}", actual);
        assert!(
            actual.right() - (x + w) <= slack && actual.bottom() - (y + h) <= slack,
            "{:?}",
            actual
        );
    }
}

#[test]
fn failed_crop_write_keeps_going_and_still_writes_mask() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rs.png");
    save_png(&receipts_on_table(400, 300, &[(30, 30, 100, 200), (220, 40, 120, 180)]), &input);

    let out = dir.path().join("extracted_receipts");
    fs::create_dir_all(out.join("receipt_1.jpg")).unwrap();

    let outputs = OutputPaths::new(&out, dir.path().join("debug_mask.jpg"));
    let splitter = ReceiptSplitter::new(SplitterParams::default()).unwrap();
    let report = splitter.split(&input, &outputs).unwrap();

    assert_eq!(report.count(), 2);
    assert!(report.has_failures());
    assert_eq!(report.failed_writes.len(), 1);
    assert_eq!(report.failed_writes[0].index, 1);
    assert_eq!(report.detections.len(), 1);
    assert_eq!(report.detections[0].index, 2);
    assert!(out.join("receipt_2.jpg").is_file());
    assert!(dir.path().join("debug_mask.jpg").is_file());
}

#[test]
fn saved_crops_are_reported_as_they_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rs.png");
    save_png(
        &receipts_on_table(400, 300, &[(20, 30, 80, 200), (150, 40, 90, 180), (280, 20, 100, 250)]),
        &input,
    );

    let outputs = OutputPaths::new(dir.path().join("out"), dir.path().join("debug_mask.jpg"));
    let splitter = ReceiptSplitter::new(SplitterParams::default()).unwrap();
    let mut seen = Vec::new();
    let report = splitter
        .split_with(&input, &outputs, |detection| {
            assert!(detection.path.is_file());
            seen.push(detection.index);
        })
        .unwrap();

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(report.count(), 3);
}
