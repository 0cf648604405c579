use crate::geometry::{CircularScaleCursor, Point2D, Vector2D, ROTATE_90};

/// Growth factor and signed step between two neighbouring samples.
///
/// A zero `prev` cannot be divided by, so it yields the neutral `(1, 0)`.
pub fn scale_offset(prev: i32, next: i32) -> (f32, f32) {
    if prev == 0 {
        return (1.0, 0.0);
    }
    let scale = next as f32 / prev as f32;
    let distance = (i64::from(next) - i64::from(prev)) as f32;
    (scale, distance)
}

pub fn scale_offset_pairs(samples: &[i32]) -> impl Iterator<Item = (f32, f32)> + '_ {
    samples.windows(2).map(|pair| scale_offset(pair[0], pair[1]))
}

/// Vertices of the spiral polyline, one per neighbouring sample pair.
///
/// Starting from the unit segment `(0,0) -> (1,0)`, each step scales and
/// translates the running segment with the cursor's current placement and
/// then turns it a quarter. The tip is recorded *before* the step's
/// transform is applied, so the first vertex is always `(1, 0)`.
pub fn spiral_points(samples: &[i32]) -> Vec<Point2D> {
    let mut points = Vec::with_capacity(samples.len().saturating_sub(1));
    let mut cursor = CircularScaleCursor::new();
    let mut segment = Vector2D::new(Point2D::ORIGIN, Point2D::new(1.0, 0.0));

    for (scale, distance) in scale_offset_pairs(samples) {
        let scale_translate = cursor.build(scale, distance);
        cursor.advance();

        let next = ROTATE_90 * (scale_translate * segment);
        points.push(segment.tip);
        segment = next;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn zero_prev_is_neutral() {
        assert_eq!(scale_offset(0, 1), (1.0, 0.0));
        assert_eq!(scale_offset(0, 0), (1.0, 0.0));
        assert_eq!(scale_offset(2, 3), (1.5, 1.0));
        assert_eq!(scale_offset(5, 3), (0.6, -2.0));
    }

    #[test]
    fn one_point_per_sample_pair() {
        assert!(spiral_points(&[]).is_empty());
        assert!(spiral_points(&[7]).is_empty());
        assert_eq!(spiral_points(&[0, 1]).len(), 1);
        assert_eq!(spiral_points(&[0, 1, 1, 2, 3, 5, 8, 13, 21, 34]).len(), 9);
    }

    #[test]
    fn standard_sequence_traces_expected_vertices() {
        let points = spiral_points(&[0, 1, 1, 2, 3, 5, 8]);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Point2D::new(1.0, 0.0));

        let expected = [
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(-1.0, 0.0),
            Point2D::new(1.0, -2.0),
            Point2D::new(4.0, 1.0),
            Point2D::new(-1.0, 6.0),
        ];
        for (got, want) in points.iter().zip(expected.iter()) {
            assert!(
                (got.x - want.x).abs() < EPS && (got.y - want.y).abs() < EPS,
                "got {got:?}, want {want:?}"
            );
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let samples = crate::spiral::sequence::generate(30);
        let first = spiral_points(&samples);
        let second = spiral_points(&samples);
        assert_eq!(
            bytemuck::cast_slice::<Point2D, u8>(&first),
            bytemuck::cast_slice::<Point2D, u8>(&second)
        );
    }
}
