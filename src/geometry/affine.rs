//! Fixed-shape affine operators for the spiral: a 2x2 rotation and a 2x3
//! scale+translate matrix, both stored row-major in single precision.
//!
//! Either operator can be applied to a [`Point2D`] or to a [`Vector2D`]; the
//! vector form always goes through [`Vector2D::relative_to_anchor`].

use super::primitives::{Point2D, Vector2D};
use std::ops::{Index, IndexMut, Mul};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatrixIndexError {
    #[error("Index ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Cell ({row}, {col}) is fixed at zero")]
    FixedCell { row: usize, col: usize },
}

#[inline]
fn check_bounds(
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Result<usize, MatrixIndexError> {
    if row >= rows || col >= cols {
        return Err(MatrixIndexError::OutOfRange {
            row,
            col,
            rows,
            cols,
        });
    }
    Ok(row * cols + col)
}

/// Anything that maps points of the plane.
pub trait AffineMap {
    fn apply_point(&self, point: Point2D) -> Point2D;

    fn apply_vector(&self, vector: &Vector2D) -> Vector2D {
        vector.relative_to_anchor(|p| self.apply_point(p))
    }
}

/// Counterclockwise-positive rotation about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    storage: [f32; 4],
}

/// Quarter turn, the only rotation the spiral needs.
pub const ROTATE_90: RotationMatrix = RotationMatrix {
    storage: [0.0, -1.0, 1.0, 0.0],
};

impl RotationMatrix {
    pub const ROWS: usize = 2;
    pub const COLS: usize = 2;

    pub const IDENTITY: RotationMatrix = RotationMatrix {
        storage: [1.0, 0.0, 0.0, 1.0],
    };

    /// Builds the rotation for `angle` degrees. The conversion to radians
    /// happens once here.
    pub fn from_degrees(angle: f32) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            storage: [cos, -sin, sin, cos],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f32, MatrixIndexError> {
        check_bounds(row, col, Self::ROWS, Self::COLS).map(|i| self.storage[i])
    }

    /// Standard 2x2 product `self * other`: `other` is applied first.
    pub fn compose(&self, other: &RotationMatrix) -> RotationMatrix {
        let a = &self.storage;
        let b = &other.storage;
        RotationMatrix {
            storage: [
                a[0] * b[0] + a[1] * b[2],
                a[0] * b[1] + a[1] * b[3],
                a[2] * b[0] + a[3] * b[2],
                a[2] * b[1] + a[3] * b[3],
            ],
        }
    }

    pub fn transpose(&self) -> RotationMatrix {
        let s = &self.storage;
        RotationMatrix {
            storage: [s[0], s[2], s[1], s[3]],
        }
    }

    pub fn determinant(&self) -> f32 {
        let s = &self.storage;
        s[0] * s[3] - s[1] * s[2]
    }
}

impl AffineMap for RotationMatrix {
    #[inline]
    fn apply_point(&self, point: Point2D) -> Point2D {
        let s = &self.storage;
        Point2D::new(
            s[0] * point.x + s[1] * point.y,
            s[2] * point.x + s[3] * point.y,
        )
    }
}

impl Index<(usize, usize)> for RotationMatrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        match check_bounds(row, col, Self::ROWS, Self::COLS) {
            Ok(i) => &self.storage[i],
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul for RotationMatrix {
    type Output = RotationMatrix;
    fn mul(self, rhs: RotationMatrix) -> RotationMatrix {
        self.compose(&rhs)
    }
}

impl Mul<Point2D> for RotationMatrix {
    type Output = Point2D;
    fn mul(self, rhs: Point2D) -> Point2D {
        self.apply_point(rhs)
    }
}

impl Mul<Vector2D> for RotationMatrix {
    type Output = Vector2D;
    fn mul(self, rhs: Vector2D) -> Vector2D {
        self.apply_vector(&rhs)
    }
}

/// `[[kx, 0, tx], [0, ky, ty]]`. The off-diagonal scale cells stay zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTranslateMatrix {
    storage: [f32; 6],
}

impl Default for ScaleTranslateMatrix {
    fn default() -> Self {
        Self {
            storage: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }
}

impl ScaleTranslateMatrix {
    pub const ROWS: usize = 2;
    pub const COLS: usize = 3;

    pub fn new(kx: f32, ky: f32, tx: f32, ty: f32) -> Self {
        Self {
            storage: [kx, 0.0, tx, 0.0, ky, ty],
        }
    }

    pub fn from_scale(kx: f32, ky: f32) -> Self {
        Self::new(kx, ky, 0.0, 0.0)
    }

    pub fn scale_x(&self) -> f32 {
        self.storage[0]
    }

    pub fn scale_y(&self) -> f32 {
        self.storage[Self::COLS + 1]
    }

    pub fn translate_x(&self) -> f32 {
        self.storage[Self::COLS - 1]
    }

    pub fn translate_y(&self) -> f32 {
        self.storage[Self::COLS * Self::ROWS - 1]
    }

    pub fn set_scale_x(&mut self, kx: f32) {
        self.storage[0] = kx;
    }

    pub fn set_scale_y(&mut self, ky: f32) {
        self.storage[Self::COLS + 1] = ky;
    }

    pub fn set_translate_x(&mut self, tx: f32) {
        self.storage[Self::COLS - 1] = tx;
    }

    pub fn set_translate_y(&mut self, ty: f32) {
        self.storage[Self::COLS * Self::ROWS - 1] = ty;
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f32, MatrixIndexError> {
        check_bounds(row, col, Self::ROWS, Self::COLS).map(|i| self.storage[i])
    }

    /// Checked write. Rejects the shear cells `(0, 1)` and `(1, 0)`.
    pub fn try_set(
        &mut self,
        row: usize,
        col: usize,
        value: f32,
    ) -> Result<(), MatrixIndexError> {
        let i = self.writable_cell(row, col)?;
        self.storage[i] = value;
        Ok(())
    }

    fn writable_cell(&self, row: usize, col: usize) -> Result<usize, MatrixIndexError> {
        let i = check_bounds(row, col, Self::ROWS, Self::COLS)?;
        if col < Self::ROWS && row != col {
            return Err(MatrixIndexError::FixedCell { row, col });
        }
        Ok(i)
    }
}

impl AffineMap for ScaleTranslateMatrix {
    #[inline]
    fn apply_point(&self, point: Point2D) -> Point2D {
        Point2D::new(
            self.scale_x() * point.x + self.translate_x(),
            self.scale_y() * point.y + self.translate_y(),
        )
    }
}

impl Index<(usize, usize)> for ScaleTranslateMatrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        match check_bounds(row, col, Self::ROWS, Self::COLS) {
            Ok(i) => &self.storage[i],
            Err(e) => panic!("{e}"),
        }
    }
}

// Out-of-range and shear-cell writes are contract violations and panic.
impl IndexMut<(usize, usize)> for ScaleTranslateMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        match self.writable_cell(row, col) {
            Ok(i) => &mut self.storage[i],
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<Point2D> for ScaleTranslateMatrix {
    type Output = Point2D;
    fn mul(self, rhs: Point2D) -> Point2D {
        self.apply_point(rhs)
    }
}

impl Mul<Vector2D> for ScaleTranslateMatrix {
    type Output = Vector2D;
    fn mul(self, rhs: Vector2D) -> Vector2D {
        self.apply_vector(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Point2D, b: Point2D) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn rotation_preserves_length() {
        let points = [
            Point2D::new(1.0, 0.0),
            Point2D::new(-3.5, 2.25),
            Point2D::new(0.001, -7.0),
        ];
        for angle in [0.0, 15.0, 45.0, 90.0, 133.7, 180.0, 270.0, -60.0] {
            let r = RotationMatrix::from_degrees(angle);
            for p in points {
                let rotated = r * p;
                assert!(
                    (rotated.length() - p.length()).abs() < EPS * p.length().max(1.0),
                    "angle {angle} changed length of {p:?}"
                );
            }
        }
    }

    #[test]
    fn rotation_is_orthonormal() {
        for angle in [0.0, 30.0, 90.0, 200.0] {
            let r = RotationMatrix::from_degrees(angle);
            assert!((r.determinant() - 1.0).abs() < EPS);
            let product = r * r.transpose();
            for row in 0..2 {
                for col in 0..2 {
                    let expected = if row == col { 1.0 } else { 0.0 };
                    assert!((product[(row, col)] - expected).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn rotation_is_counterclockwise() {
        let p = RotationMatrix::from_degrees(90.0) * Point2D::new(1.0, 0.0);
        assert!(close(p, Point2D::new(0.0, 1.0)));
        assert_eq!(ROTATE_90 * Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0));
    }

    #[test]
    fn quarter_turn_constant_matches_general_form() {
        let general = RotationMatrix::from_degrees(90.0);
        for row in 0..2 {
            for col in 0..2 {
                assert!((general[(row, col)] - ROTATE_90[(row, col)]).abs() < EPS);
            }
        }
    }

    #[test]
    fn composed_quarter_turns_equal_half_turn() {
        let composed = ROTATE_90 * ROTATE_90;
        let direct = RotationMatrix::from_degrees(180.0);
        for row in 0..2 {
            for col in 0..2 {
                assert!((composed[(row, col)] - direct[(row, col)]).abs() < EPS);
            }
        }
        assert_eq!(composed.compose(&RotationMatrix::IDENTITY), composed);
    }

    #[test]
    fn rotation_of_vector_keeps_anchor() {
        let v = Vector2D::new(Point2D::new(3.0, 4.0), Point2D::new(5.0, 4.0));
        let rotated = ROTATE_90 * v;
        assert_eq!(rotated.anchor, v.anchor);
        assert!(close(rotated.tip, Point2D::new(3.0, 6.0)));
    }

    #[test]
    fn scale_translate_point() {
        let m = ScaleTranslateMatrix::new(2.0, 3.0, -1.0, 0.5);
        assert_eq!(m * Point2D::new(1.0, 1.0), Point2D::new(1.0, 3.5));
        assert_eq!(m.scale_x(), 2.0);
        assert_eq!(m.scale_y(), 3.0);
        assert_eq!(m.translate_x(), -1.0);
        assert_eq!(m.translate_y(), 0.5);
    }

    #[test]
    fn setters_write_the_named_cells() {
        let mut m = ScaleTranslateMatrix::from_scale(2.0, 3.0);
        assert_eq!(m, ScaleTranslateMatrix::new(2.0, 3.0, 0.0, 0.0));

        m.set_scale_x(4.0);
        m.set_scale_y(-1.0);
        m.set_translate_x(5.0);
        m.set_translate_y(6.0);
        assert_eq!(m, ScaleTranslateMatrix::new(4.0, -1.0, 5.0, 6.0));
        assert_eq!(m.get(0, 0), Ok(4.0));
        assert_eq!(m.get(1, 1), Ok(-1.0));
        assert_eq!(m.get(0, 2), Ok(5.0));
        assert_eq!(m.get(1, 2), Ok(6.0));
        assert_eq!(m.get(0, 1), Ok(0.0));
        assert_eq!(m * Point2D::new(1.0, 1.0), Point2D::new(9.0, 5.0));
    }

    #[test]
    fn scale_translate_moves_anchor_and_tip() {
        let m = ScaleTranslateMatrix::new(2.0, 1.0, 1.0, 0.0);
        let v = Vector2D::new(Point2D::new(1.0, 1.0), Point2D::new(2.0, 1.0));
        let out = m * v;
        assert_eq!(out.anchor, Point2D::new(2.0, 1.0));
        assert_eq!(out.tip, Point2D::new(4.0, 1.0));
    }

    #[test]
    fn scale_translate_of_degenerate_segment_only_translates() {
        let m = ScaleTranslateMatrix::new(5.0, -2.0, 3.0, 7.0);
        let anchor = Point2D::new(-1.0, 2.0);
        let out = m * Vector2D::new(anchor, anchor);
        assert_eq!(out.length(), 0.0);
        assert_eq!(out.anchor, Point2D::new(2.0, 9.0));
        assert_eq!(out.tip, out.anchor);
    }

    #[test]
    fn checked_access_rejects_out_of_range() {
        let r = ROTATE_90;
        assert_eq!(r.get(1, 0), Ok(1.0));
        assert_eq!(
            r.get(2, 0),
            Err(MatrixIndexError::OutOfRange {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            })
        );
        let m = ScaleTranslateMatrix::default();
        assert_eq!(m.get(1, 2), Ok(0.0));
        assert!(m.get(0, 3).is_err());
    }

    #[test]
    fn shear_cells_stay_zero() {
        let mut m = ScaleTranslateMatrix::default();
        assert_eq!(
            m.try_set(0, 1, 4.0),
            Err(MatrixIndexError::FixedCell { row: 0, col: 1 })
        );
        assert!(m.try_set(1, 0, 4.0).is_err());
        m.try_set(1, 2, 4.0).unwrap();
        assert_eq!(m.translate_y(), 4.0);
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(1, 0)], 0.0);
    }

    #[test]
    #[should_panic]
    fn indexing_past_the_last_row_panics() {
        let _ = ROTATE_90[(2, 1)];
    }

    #[test]
    #[should_panic]
    fn writing_a_shear_cell_panics() {
        let mut m = ScaleTranslateMatrix::default();
        m[(1, 0)] = 1.0;
    }
}
