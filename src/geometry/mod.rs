pub mod affine;
pub mod cursor;
pub mod primitives;

pub use affine::{AffineMap, MatrixIndexError, RotationMatrix, ScaleTranslateMatrix, ROTATE_90};
pub use cursor::CircularScaleCursor;
pub use primitives::{Point2D, Vector2D};
