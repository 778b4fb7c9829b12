use pulp::{Arch, Simd, WithSimd};

/// SQUARED EUCLIDEAN DISTANCE
///
/// Comparison-only distance: the sum of squared per-dimension differences,
/// without the final square root. Ordering relative to true Euclidean
/// distance is preserved, so it is safe for nearest-neighbor comparisons,
/// but the value itself must never be surfaced as a metric - no sqrt is
/// ever applied here, on purpose.
struct SquaredEuclidean<'a> {
    first: &'a [f32],
    second: &'a [f32],
}

impl WithSimd for SquaredEuclidean<'_> {
    type Output = f32;

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let (first_head, first_tail) = S::as_simd_f32s(self.first);
        let (second_head, second_tail) = S::as_simd_f32s(self.second);

        let mut sum_of_squares = simd.splat_f32s(0.0);

        for (&cord_first, &cord_second) in first_head.iter().zip(second_head) {
            let diff = simd.sub_f32s(cord_first, cord_second);
            sum_of_squares = simd.mul_add_f32s(diff, diff, sum_of_squares);
        }

        let mut total = simd.reduce_sum_f32s(sum_of_squares);

        total += first_tail
            .iter()
            .zip(second_tail)
            .map(|(&x, &y)| {
                let diff = x - y;
                diff * diff
            })
            .sum::<f32>();

        total
    }
}

/// Squared Euclidean distance between two equal-length slices.
///
/// Symmetric, non-negative, `distance(a, a) == 0.0`. Used exclusively to
/// order candidates during construction; D is fixed at build time
/// (`crate::DIMENSIONS`) but this function works over any equal-length pair.
#[tracing::instrument(skip_all)]
pub fn squared_euclidean_distance(first: &[f32], second: &[f32]) -> f32 {
    debug_assert_eq!(
        first.len(),
        second.len(),
        "vectors must have the same dimension"
    );

    let arch = Arch::new();
    arch.dispatch(SquaredEuclidean { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_distance_to_self() {
        let v = vec![0.3_f32; 100];
        assert_eq!(squared_euclidean_distance(&v, &v), 0.0);
    }

    #[test]
    fn symmetric() {
        let a: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let b: Vec<f32> = (0..100).map(|i| (i as f32) * 1.5).collect();
        assert_eq!(
            squared_euclidean_distance(&a, &b),
            squared_euclidean_distance(&b, &a)
        );
    }

    #[test]
    fn known_value() {
        let a = [0.0_f32, 0.0];
        let b = [3.0_f32, 4.0];
        assert_eq!(squared_euclidean_distance(&a, &b), 25.0);
    }

    #[test]
    fn handles_non_simd_aligned_tail() {
        // 5 dims won't divide evenly into most SIMD widths; exercises the
        // scalar tail path.
        let a = [1.0_f32, 2.0, 3.0, 4.0, 5.0];
        let b = [1.0_f32, 2.0, 3.0, 4.0, 6.0];
        assert_eq!(squared_euclidean_distance(&a, &b), 1.0);
    }
}
