use crate::geometry::Point2D;

/// World-space bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingExtent {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
}

impl BoundingExtent {
    /// `None` for an empty slice.
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let seed = BoundingExtent {
            xmin: first.x,
            xmax: first.x,
            ymin: first.y,
            ymax: first.y,
        };
        Some(points.iter().skip(1).fold(seed, |acc, p| BoundingExtent {
            xmin: acc.xmin.min(p.x),
            xmax: acc.xmax.max(p.x),
            ymin: acc.ymin.min(p.y),
            ymax: acc.ymax.max(p.y),
        }))
    }

    pub fn width(&self) -> f32 {
        (self.xmax - self.xmin).abs()
    }

    pub fn height(&self) -> f32 {
        (self.ymax - self.ymin).abs()
    }
}

/// Size of the drawing area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in screen space; `min` is the upper-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Point2D,
    pub max: Point2D,
}

impl ScreenRect {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Maps world coordinates (y up) onto a viewport (y down), stretching the
/// extent to fill it on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    xmin: f32,
    ymax: f32,
    xscale: f32,
    yscale: f32,
}

impl ScreenMapping {
    pub fn new(extent: &BoundingExtent, viewport: Viewport) -> Self {
        Self {
            xmin: extent.xmin,
            ymax: extent.ymax,
            xscale: axis_scale(viewport.width, extent.width()),
            yscale: axis_scale(viewport.height, extent.height()),
        }
    }

    /// World point that lands on the viewport's upper-left corner.
    pub fn origin(&self) -> Point2D {
        Point2D::new(self.xmin, self.ymax)
    }

    /// Pixels per world unit along x and y.
    pub fn scale(&self) -> (f32, f32) {
        (self.xscale, self.yscale)
    }

    pub fn map_point(&self, p: Point2D) -> Point2D {
        Point2D::new(
            (p.x - self.xmin) * self.xscale,
            (self.ymax - p.y) * self.yscale,
        )
    }

    /// Box with `a` and `b` on opposite corners.
    pub fn map_box(&self, a: Point2D, b: Point2D) -> ScreenRect {
        let upper_left = Point2D::new(a.x.min(b.x), a.y.max(b.y));
        let lower_right = Point2D::new(a.x.max(b.x), a.y.min(b.y));
        ScreenRect {
            min: self.map_point(upper_left),
            max: self.map_point(lower_right),
        }
    }

    /// One box per neighbouring pair of spiral vertices.
    pub fn rects(&self, points: &[Point2D]) -> Vec<ScreenRect> {
        points
            .windows(2)
            .map(|pair| self.map_box(pair[0], pair[1]))
            .collect()
    }
}

// A flat extent would divide by zero; draw it unscaled instead.
fn axis_scale(screen: f32, world: f32) -> f32 {
    if world > f32::EPSILON && world.is_finite() {
        screen / world
    } else {
        1.0
    }
}
