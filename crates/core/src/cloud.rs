use crate::{Aabb, Point, Rgb};
use serde::Serialize;

/// Decoded point set handed to a renderer.
///
/// Built once per decode and not mutated afterwards; `bounds` always
/// describes exactly `points`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCloud {
    points: Vec<Point>,
    bounds: Aabb,
}

impl PointCloud {
    pub fn from_points(points: Vec<Point>) -> Self {
        let bounds = Aabb::from_points(&points);
        Self { points, bounds }
    }

    /// Fixed five-point pyramid substituted by the opt-in fallback policy.
    pub fn placeholder() -> Self {
        Self::from_points(vec![
            Point::new(-2.0, -2.0, 0.0),
            Point::new(2.0, -2.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            Point::new(-2.0, 2.0, 0.0),
            Point::new(0.0, 0.0, 3.0),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn has_colors(&self) -> bool {
        self.points.iter().any(|p| p.color.is_some())
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.points.iter().map(Point::position)
    }

    /// Interleaved `x y z` buffer.
    pub fn positions(&self) -> Vec<f32> {
        self.iter_positions().flatten().collect()
    }

    /// Interleaved `r g b` buffer parallel to [`positions`](Self::positions).
    ///
    /// `None` when no point carries a color. Otherwise points without one
    /// are filled with white.
    pub fn colors(&self) -> Option<Vec<f32>> {
        if !self.has_colors() {
            return None;
        }

        let mut out = Vec::with_capacity(self.points.len() * 3);
        for p in &self.points {
            out.extend_from_slice(&p.color.unwrap_or(Rgb::WHITE).to_array());
        }
        Some(out)
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::from_points(Vec::new())
    }
}

impl From<Vec<Point>> for PointCloud {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}
