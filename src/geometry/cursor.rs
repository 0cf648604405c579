use super::affine::ScaleTranslateMatrix;

// (scale row, scale col, sign, translate row, translate col) per quarter turn
type Placement = (usize, usize, f32, usize, usize);

const PLACEMENTS: [Placement; 4] = [
    (0, 0, -1.0, 0, 2),
    (1, 1, -1.0, 1, 2),
    (0, 0, 1.0, 0, 2),
    (1, 1, 1.0, 1, 2),
];

/// Walks the four placements of a spiral arm, wrapping around forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircularScaleCursor {
    position: usize,
}

impl CircularScaleCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn advance(&mut self) {
        self.position = (self.position + 1) % PLACEMENTS.len();
    }

    /// Cursor `n` states ahead, leaving `self` untouched.
    pub fn offset(&self, n: usize) -> Self {
        Self {
            position: (self.position + n) % PLACEMENTS.len(),
        }
    }

    /// Identity matrix with `scale` and `sign * distance` written into the
    /// cells the current placement names.
    pub fn build(&self, scale: f32, distance: f32) -> ScaleTranslateMatrix {
        let (sr, sc, sign, tr, tc) = PLACEMENTS[self.position];
        let mut matrix = ScaleTranslateMatrix::default();
        matrix[(sr, sc)] = scale;
        matrix[(tr, tc)] = sign * distance;
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placements_follow_the_fixed_table() {
        let mut cursor = CircularScaleCursor::new();

        assert_eq!(cursor.build(2.0, 3.0), ScaleTranslateMatrix::new(2.0, 1.0, -3.0, 0.0));
        cursor.advance();
        assert_eq!(cursor.build(2.0, 3.0), ScaleTranslateMatrix::new(1.0, 2.0, 0.0, -3.0));
        cursor.advance();
        assert_eq!(cursor.build(2.0, 3.0), ScaleTranslateMatrix::new(2.0, 1.0, 3.0, 0.0));
        cursor.advance();
        assert_eq!(cursor.build(2.0, 3.0), ScaleTranslateMatrix::new(1.0, 2.0, 0.0, 3.0));
    }

    #[test]
    fn four_advances_return_to_start() {
        let mut cursor = CircularScaleCursor::new();
        let before = cursor.build(1.5, 8.0);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(cursor.position());
            cursor.advance();
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.build(1.5, 8.0), before);
    }

    #[test]
    fn offset_wraps_without_mutating() {
        let cursor = CircularScaleCursor::new().offset(3);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.offset(2).position(), 1);
        assert_eq!(cursor.position(), 3);
    }
}
