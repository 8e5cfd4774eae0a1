use geo::{BoundingRect, Coord, LineString};
use image::GrayImage;
use imageproc::contours::{self, BorderType};
use imageproc::point::Point;

use crate::crop::BoundingBox;

/// Outer boundary of one connected foreground region, reduced to the points
/// where the boundary changes direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    ring: LineString<i32>,
}

impl Contour {
    pub fn new(points: &[Point<i32>]) -> Self {
        let ring = compress_chain(points)
            .into_iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect::<Vec<_>>();
        Self {
            ring: LineString::new(ring),
        }
    }

    #[inline]
    #[must_use]
    pub fn ring(&self) -> &LineString<i32> {
        &self.ring
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.0.is_empty()
    }

    /// Smallest axis-aligned box holding every boundary pixel.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let rect = self.ring.bounding_rect()?;
        let (min, max) = (rect.min(), rect.max());
        Some(BoundingBox {
            x: min.x as u32,
            y: min.y as u32,
            width: (max.x - min.x + 1) as u32,
            height: (max.y - min.y + 1) as u32,
        })
    }
}

/// Outer borders of the top-level foreground regions of `mask`.
///
/// Holes, and anything found inside a hole, are skipped.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    let raw = contours::find_contours::<i32>(mask);
    let total = raw.len();

    let external: Vec<Contour> = raw
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(&c.points))
        .collect();

    log::debug!("Found {} borders, {} external", total, external.len());
    external
}

/// Drop every point lying in the middle of a straight run, keeping only the
/// end points of horizontal, vertical and diagonal segments.
fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut points = points.to_vec();
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let n = points.len();
    if n < 3 {
        return points;
    }

    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect()
}
