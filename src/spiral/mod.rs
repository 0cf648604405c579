pub mod extent;
pub mod generator;
pub mod sequence;

pub use extent::{BoundingExtent, ScreenMapping, ScreenRect, Viewport};
pub use generator::spiral_points;

use crate::geometry::Point2D;

/// Everything a spiral build produces before it is mapped to the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralOutput {
    pub points: Vec<Point2D>,
    // None when there are no points
    pub extent: Option<BoundingExtent>,
}

impl SpiralOutput {
    /// Builds the spiral from `samples`, skipping the first `first_index`.
    pub fn from_samples(samples: &[i32], first_index: usize) -> Self {
        let points = spiral_points(samples.get(first_index..).unwrap_or(&[]));
        let extent = BoundingExtent::from_points(&points);
        Self { points, extent }
    }

    pub fn screen_rects(&self, viewport: Viewport) -> Vec<ScreenRect> {
        match &self.extent {
            Some(extent) => ScreenMapping::new(extent, viewport).rects(&self.points),
            None => Vec::new(),
        }
    }
}
