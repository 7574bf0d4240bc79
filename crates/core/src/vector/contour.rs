//! Iso-value polylines and their arc length

use super::Point;
use geo::{Euclidean, Length, LineString};

/// An ordered polyline traced at one iso-value.
///
/// The arc length is computed when the contour is built; the points cannot
/// be changed afterwards, so the two always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    length: f64,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        let line: LineString<f64> = points.iter().map(|&p| geo::Coord::from(p)).collect();
        let length = line.length::<Euclidean>();
        Self { points, length }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sum of the distances between consecutive points
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polyline returns to its first vertex
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Mean Y coordinate of the vertices, `None` for an empty contour
    pub fn mean_y(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().map(|p| p.y).sum::<f64>() / self.points.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contour(coords: &[(f64, f64)]) -> Contour {
        Contour::new(coords.iter().map(|&c| Point::from(c)).collect())
    }

    #[test]
    fn test_length_is_sum_of_segments() {
        let c = contour(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        assert_relative_eq!(c.length(), 7.0, epsilon = 1e-12);
        assert_eq!(c.len(), 3);
        assert!(!c.is_closed());
    }

    #[test]
    fn test_closed_ring() {
        let c = contour(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        assert!(c.is_closed());
        assert_relative_eq!(c.length(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_y() {
        let c = contour(&[(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]);
        assert_relative_eq!(c.mean_y().unwrap(), 4.0);
        assert!(Contour::new(Vec::new()).mean_y().is_none());
    }

    #[test]
    fn test_empty_and_single_point_have_zero_length() {
        assert_eq!(Contour::new(Vec::new()).length(), 0.0);
        assert_eq!(contour(&[(5.0, 5.0)]).length(), 0.0);
    }
}
