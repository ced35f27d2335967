use log::info;

/// Point budget applied when the caller does not configure one.
pub const DEFAULT_MAX_POINTS: usize = 50_000;

/// Step that brings `count` points within `max_points`: `ceil(count / max_points)`.
pub fn stride_for(count: usize, max_points: usize) -> usize {
    assert!(max_points > 0, "max_points must be > 0");
    count.div_ceil(max_points).max(1)
}

/// Keeps every `step`-th point, starting at index 0, when `points` exceeds
/// `max_points`; otherwise returns the input untouched.
///
/// Uniform and order-preserving: the output has `ceil(len / step)` points,
/// never more than `max_points`, and always begins with the first input.
pub fn stride_downsample<T>(points: Vec<T>, max_points: usize) -> Vec<T> {
    assert!(max_points > 0, "max_points must be > 0");

    let count = points.len();
    if count <= max_points {
        return points;
    }

    let step = stride_for(count, max_points);
    let out: Vec<T> = points.into_iter().step_by(step).collect();
    info!(
        "downsampled {} points to {} (every {}th point)",
        count,
        out.len(),
        step
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{stride_downsample, stride_for};
    use pcdview_core::Point;
    use proptest::prelude::*;

    #[test]
    fn below_threshold_is_untouched() {
        let pts: Vec<u32> = (0..10).collect();
        assert_eq!(stride_downsample(pts.clone(), 10), pts);
        assert_eq!(stride_downsample(pts.clone(), 50_000), pts);
    }

    #[test]
    fn hundred_thousand_to_fifty_thousand() {
        let pts: Vec<Point> = (0..100_000)
            .map(|i| Point::new(i as f32, 0.0, 0.0))
            .collect();
        let first = pts[0];
        let step = stride_for(pts.len(), 50_000);
        assert_eq!(step, 2);

        let out = stride_downsample(pts, 50_000);
        assert!(out.len() <= 50_000);
        assert_eq!(out.len(), 100_000usize.div_ceil(step));
        assert_eq!(out[0], first);
        assert_eq!(out[1].x, 2.0);
    }

    #[test]
    fn uneven_division_keeps_tail_start() {
        let pts: Vec<u32> = (0..7).collect();
        assert_eq!(stride_downsample(pts, 3), vec![0, 3, 6]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(stride_downsample(Vec::<u8>::new(), 5).is_empty());
    }

    #[test]
    #[should_panic]
    fn zero_threshold_panics() {
        let _ = stride_downsample(vec![1, 2, 3], 0);
    }

    proptest! {
        #[test]
        fn output_bounds_hold(count in 1usize..20_000, max_points in 1usize..5_000) {
            let pts: Vec<usize> = (0..count).collect();
            let step = stride_for(count, max_points);
            let out = stride_downsample(pts, max_points);

            prop_assert!(!out.is_empty());
            prop_assert!(out.len() <= max_points);
            prop_assert_eq!(out[0], 0);
            if count > max_points {
                prop_assert_eq!(out.len(), count.div_ceil(step));
                prop_assert!(out.windows(2).all(|w| w[1] - w[0] == step));
            } else {
                prop_assert_eq!(out.len(), count);
            }
        }
    }
}
