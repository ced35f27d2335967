use crate::Point;
use serde::Serialize;

/// Axis-aligned bounding box.
///
/// Always well formed: `min[axis] <= max[axis]` on every axis. A box built
/// from no finite points is the unit cube `[-1, 1]^3`, never an inverted
/// `[+inf, -inf]` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub const UNIT: Aabb = Aabb {
        min: [-1.0; 3],
        max: [1.0; 3],
    };

    /// Single pass over `points`; non-finite positions are skipped.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        Self::from_positions(points.into_iter().map(Point::position))
    }

    pub fn from_positions(positions: impl IntoIterator<Item = [f32; 3]>) -> Self {
        let mut acc = BoundsAccumulator::default();
        for p in positions {
            acc.expand_with_point(p);
        }
        acc.finish()
    }

    pub fn contains(&self, point: &[f32; 3]) -> bool {
        if !point.iter().all(|v| v.is_finite()) {
            return false;
        }

        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::UNIT
    }
}

#[derive(Debug, Default)]
struct BoundsAccumulator {
    bounds: Option<([f32; 3], [f32; 3])>,
}

impl BoundsAccumulator {
    fn expand_with_point(&mut self, point: [f32; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        match &mut self.bounds {
            None => self.bounds = Some((point, point)),
            Some((min, max)) => {
                for (axis, &val) in point.iter().enumerate() {
                    min[axis] = min[axis].min(val);
                    max[axis] = max[axis].max(val);
                }
            }
        }
    }

    fn finish(self) -> Aabb {
        match self.bounds {
            Some((min, max)) => Aabb { min, max },
            None => Aabb::UNIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb;
    use crate::Point;
    use proptest::prelude::*;

    #[test]
    fn pyramid_bounds() {
        let pts = [
            Point::new(-2.0, -2.0, 0.0),
            Point::new(2.0, -2.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            Point::new(-2.0, 2.0, 0.0),
            Point::new(0.0, 0.0, 3.0),
        ];
        let aabb = Aabb::from_points(&pts);
        assert_eq!(aabb.min, [-2.0, -2.0, 0.0]);
        assert_eq!(aabb.max, [2.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_input_is_unit_cube() {
        let aabb = Aabb::from_points(&Vec::<Point>::new());
        assert_eq!(aabb, Aabb::UNIT);
        assert_eq!(aabb.min, [-1.0; 3]);
        assert_eq!(aabb.max, [1.0; 3]);
    }

    #[test]
    fn all_nan_input_is_unit_cube() {
        let pts = [Point::new(f32::NAN, 0.0, 0.0), Point::new(1.0, f32::INFINITY, 0.0)];
        assert_eq!(Aabb::from_points(&pts), Aabb::UNIT);
    }

    #[test]
    fn single_point_is_degenerate_not_inverted() {
        let aabb = Aabb::from_positions([[3.0, -4.0, 5.0]]);
        assert_eq!(aabb.min, [3.0, -4.0, 5.0]);
        assert_eq!(aabb.max, [3.0, -4.0, 5.0]);
        assert_eq!(aabb.extent(), [0.0; 3]);
    }

    #[test]
    fn center_and_extent() {
        let aabb = Aabb::from_positions([[0.0, 0.0, 0.0], [4.0, 2.0, -2.0]]);
        assert_eq!(aabb.center(), [2.0, 1.0, -1.0]);
        assert_eq!(aabb.extent(), [4.0, 2.0, 2.0]);
    }

    proptest! {
        #[test]
        fn bounds_contain_every_finite_point(
            pts in prop::collection::vec((-1000.0f32..1000.0f32, -1000.0f32..1000.0f32, -1000.0f32..1000.0f32), 1..500)
        ) {
            let aabb = Aabb::from_positions(pts.iter().map(|&(x, y, z)| [x, y, z]));
            for axis in 0..3 {
                prop_assert!(aabb.min[axis] <= aabb.max[axis]);
            }
            for &(x, y, z) in &pts {
                prop_assert!(aabb.contains(&[x, y, z]));
            }
        }
    }
}
