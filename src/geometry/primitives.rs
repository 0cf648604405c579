use std::ops::{Add, Sub};

// Packed so a point slice can be handed to wgpu as a vertex buffer as-is
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point2D {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A directed segment from `anchor` to `tip`.
///
/// Operators act on the segment through [`Vector2D::relative_to_anchor`]:
/// the displacement `tip - anchor` is transformed, never the absolute tip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub anchor: Point2D,
    pub tip: Point2D,
}

impl Vector2D {
    #[inline]
    pub const fn new(anchor: Point2D, tip: Point2D) -> Self {
        Self { anchor, tip }
    }

    #[inline]
    pub fn displacement(&self) -> Point2D {
        self.tip - self.anchor
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.displacement().length()
    }

    /// Moves the segment to the origin, applies `map`, and moves it back.
    ///
    /// The anchor is shifted by `map(ORIGIN)`, so a purely linear map keeps it
    /// in place while a map carrying a translation moves it.
    pub fn relative_to_anchor<F>(&self, map: F) -> Vector2D
    where
        F: Fn(Point2D) -> Point2D,
    {
        let anchor = self.anchor + map(Point2D::ORIGIN);
        let tip = self.anchor + map(self.displacement());
        Vector2D::new(anchor, tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_keeps_segment() {
        let v = Vector2D::new(Point2D::new(2.0, 3.0), Point2D::new(5.0, -1.0));
        assert_eq!(v.relative_to_anchor(|p| p), v);
    }

    #[test]
    fn map_sees_displacement_not_absolute_tip() {
        let v = Vector2D::new(Point2D::new(10.0, 10.0), Point2D::new(11.0, 10.0));
        let doubled = v.relative_to_anchor(|p| Point2D::new(p.x * 2.0, p.y * 2.0));
        assert_eq!(doubled.anchor, Point2D::new(10.0, 10.0));
        assert_eq!(doubled.tip, Point2D::new(12.0, 10.0));
    }

    #[test]
    fn translating_map_moves_anchor() {
        let v = Vector2D::new(Point2D::new(1.0, 1.0), Point2D::new(2.0, 1.0));
        let shifted = v.relative_to_anchor(|p| p + Point2D::new(0.5, -0.5));
        assert_eq!(shifted.anchor, Point2D::new(1.5, 0.5));
        assert_eq!(shifted.tip, Point2D::new(2.5, 0.5));
    }
}
