//! Place outlines recorded with the admin mapper.

use geo::{Area, Contains, Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GeoPoint;

/// One recorded vertex, as the mapper sends it: `{"lat": .., "lng": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error("boundary needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("boundary point {index} out of range ({lat}, {lng})")]
    OutOfRange { index: usize, lat: f64, lng: f64 },
    #[error("boundary encloses no area")]
    Degenerate,
}

/// A validated place outline.
#[derive(Debug, Clone)]
pub struct Boundary {
    polygon: Polygon<f64>,
}

impl Boundary {
    /// Build a closed polygon from recorded points.
    pub fn from_points(points: &[BoundaryPoint]) -> Result<Self, BoundaryError> {
        if points.len() < 3 {
            return Err(BoundaryError::TooFewPoints(points.len()));
        }

        for (index, p) in points.iter().enumerate() {
            let valid = p.lat.is_finite()
                && p.lng.is_finite()
                && (-90.0..=90.0).contains(&p.lat)
                && (-180.0..=180.0).contains(&p.lng);
            if !valid {
                return Err(BoundaryError::OutOfRange {
                    index,
                    lat: p.lat,
                    lng: p.lng,
                });
            }
        }

        let ring: Vec<Coord<f64>> = points.iter().map(|p| Coord { x: p.lng, y: p.lat }).collect();
        let polygon = Polygon::new(LineString::from(ring), vec![]);

        if polygon.unsigned_area() <= 0.0 {
            return Err(BoundaryError::Degenerate);
        }

        Ok(Self { polygon })
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.polygon.contains(&geo::Point::from(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<BoundaryPoint> {
        vec![
            BoundaryPoint { lat: 41.3780, lng: 60.3590 },
            BoundaryPoint { lat: 41.3780, lng: 60.3600 },
            BoundaryPoint { lat: 41.3790, lng: 60.3600 },
            BoundaryPoint { lat: 41.3790, lng: 60.3590 },
        ]
    }

    #[test]
    fn test_contains_inner_point() {
        let b = Boundary::from_points(&square()).unwrap();
        assert!(b.contains(GeoPoint::new(41.3785, 60.3595)));
        assert!(!b.contains(GeoPoint::new(41.3800, 60.3595)));
    }

    #[test]
    fn test_too_few_points() {
        let err = Boundary::from_points(&square()[..2]).unwrap_err();
        assert_eq!(err, BoundaryError::TooFewPoints(2));
    }

    #[test]
    fn test_collinear_points_rejected() {
        let line = vec![
            BoundaryPoint { lat: 1.0, lng: 1.0 },
            BoundaryPoint { lat: 2.0, lng: 2.0 },
            BoundaryPoint { lat: 3.0, lng: 3.0 },
        ];
        assert_eq!(Boundary::from_points(&line).unwrap_err(), BoundaryError::Degenerate);
    }

    #[test]
    fn test_out_of_range() {
        let mut pts = square();
        pts[1].lat = 91.0;
        assert!(matches!(
            Boundary::from_points(&pts),
            Err(BoundaryError::OutOfRange { index: 1, .. })
        ));
    }
}
