mod contour;
mod crop;
mod morphology;
mod splitter;
pub mod draw;
pub mod error;
pub mod io;
pub mod threshold;

pub use crate::contour::{Contour, find_external_contours};
pub use crate::crop::{BoundingBox, SizeFilter, filter_and_crop};
pub use crate::morphology::{SquareElement, close};
pub use crate::splitter::{Detection, FailedWrite, OutputPaths, ReceiptSplitter, SplitReport, SplitterParams};
