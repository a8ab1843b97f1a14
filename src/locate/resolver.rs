//! Closest-place selection under a fixed proximity threshold.

use thiserror::Error;
use tracing::debug;

use super::{haversine_meters, GeoPoint};

/// Maximum distance, in meters, at which a place counts as "here".
pub const MATCH_THRESHOLD_METERS: f64 = 300.0;

/// A candidate that cannot take part in distance matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandidateError {
    #[error("missing coordinate")]
    MissingCoordinate,
    #[error("non-finite coordinate ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },
}

/// Anything the resolver can measure a distance to.
pub trait Locatable {
    /// Name used in diagnostics.
    fn label(&self) -> &str;

    /// Both coordinates, or why they are unusable.
    fn coordinates(&self) -> Result<GeoPoint, CandidateError>;
}

/// Closest candidate seen during a failed lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestCandidate {
    pub name: String,
    pub distance_meters: f64,
}

/// No candidate lies within the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct NoMatch {
    pub nearest: Option<NearestCandidate>,
}

impl std::fmt::Display for NoMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No place found near this location.")?;
        if let Some(ref nearest) = self.nearest {
            write!(
                f,
                " Closest: '{}' at {}m.",
                nearest.name, nearest.distance_meters as i64
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for NoMatch {}

/// Stateless nearest-place matcher.
#[derive(Debug, Clone, Copy)]
pub struct NearestResolver {
    threshold_meters: f64,
}

impl Default for NearestResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NearestResolver {
    /// Resolver with the standard 300 m threshold
    pub fn new() -> Self {
        Self::with_threshold(MATCH_THRESHOLD_METERS)
    }

    pub fn with_threshold(threshold_meters: f64) -> Self {
        Self { threshold_meters }
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    /// Find the closest candidate, then accept it only within the threshold.
    ///
    /// Candidates with unusable coordinates are skipped. On equal distances the
    /// first candidate in iteration order wins.
    pub fn resolve<'a, T: Locatable>(
        &self,
        query: GeoPoint,
        candidates: &'a [T],
    ) -> Result<&'a T, NoMatch> {
        let mut closest: Option<(&'a T, f64)> = None;

        for candidate in candidates {
            let point = match candidate.coordinates() {
                Ok(p) => p,
                Err(e) => {
                    debug!("Skipping place '{}': {}", candidate.label(), e);
                    continue;
                }
            };

            let dist = haversine_meters(query, point);
            if dist.is_nan() {
                debug!("Skipping place '{}': distance is NaN", candidate.label());
                continue;
            }

            match closest {
                Some((_, best)) if dist >= best => {}
                _ => closest = Some((candidate, dist)),
            }
        }

        match closest {
            Some((place, dist)) if dist <= self.threshold_meters => {
                debug!(
                    "Matched '{}' at {:.1}m from ({}, {})",
                    place.label(),
                    dist,
                    query.lat,
                    query.lon
                );
                Ok(place)
            }
            Some((place, dist)) => Err(NoMatch {
                nearest: Some(NearestCandidate {
                    name: place.label().to_string(),
                    distance_meters: dist,
                }),
            }),
            None => Err(NoMatch { nearest: None }),
        }
    }
}

/// Look up the active place a visitor is standing at.
pub fn find_nearest<T: Locatable>(
    query_lat: f64,
    query_lng: f64,
    candidates: &[T],
) -> Result<&T, NoMatch> {
    NearestResolver::new().resolve(GeoPoint::new(query_lat, query_lng), candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Spot {
        name: &'static str,
        lat: Option<f64>,
        lon: Option<f64>,
    }

    impl Spot {
        fn at(name: &'static str, lat: f64, lon: f64) -> Self {
            Self {
                name,
                lat: Some(lat),
                lon: Some(lon),
            }
        }
    }

    impl Locatable for Spot {
        fn label(&self) -> &str {
            self.name
        }

        fn coordinates(&self) -> Result<GeoPoint, CandidateError> {
            match (self.lat, self.lon) {
                (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                    Ok(GeoPoint::new(lat, lon))
                }
                (Some(lat), Some(lon)) => Err(CandidateError::NonFinite { lat, lon }),
                _ => Err(CandidateError::MissingCoordinate),
            }
        }
    }

    const QUERY: (f64, f64) = (41.54916, 60.61947);

    /// Point due north of QUERY at the given distance
    fn north_of_query(meters: f64) -> (f64, f64) {
        let d_lat = (meters / super::super::EARTH_RADIUS_METERS).to_degrees();
        (QUERY.0 + d_lat, QUERY.1)
    }

    #[test]
    fn test_scenario_close_candidate_matched() {
        let spots = vec![Spot::at("Benim Evim", 41.54988, 60.61946)];
        let found = find_nearest(QUERY.0, QUERY.1, &spots).unwrap();
        assert_eq!(found.name, "Benim Evim");
    }

    #[test]
    fn test_scenario_far_candidate_named_as_nearest() {
        let (lat, lon) = north_of_query(1000.5);
        let spots = vec![Spot::at("Juma Mosque", lat, lon)];
        let err = find_nearest(QUERY.0, QUERY.1, &spots).unwrap_err();
        let nearest = err.nearest.clone().unwrap();
        assert_eq!(nearest.name, "Juma Mosque");
        assert!((nearest.distance_meters - 1000.5).abs() < 0.01);
        assert_eq!(
            err.to_string(),
            "No place found near this location. Closest: 'Juma Mosque' at 1000m."
        );
    }

    #[test]
    fn test_scenario_empty_candidates() {
        let spots: Vec<Spot> = vec![];
        let err = find_nearest(QUERY.0, QUERY.1, &spots).unwrap_err();
        assert!(err.nearest.is_none());
        assert_eq!(err.to_string(), "No place found near this location.");
    }

    #[test]
    fn test_scenario_missing_latitude_skipped() {
        let spots = vec![Spot {
            name: "Unmapped",
            lat: None,
            lon: Some(60.61947),
        }];
        let err = find_nearest(QUERY.0, QUERY.1, &spots).unwrap_err();
        assert!(err.nearest.is_none());
    }

    #[test]
    fn test_malformed_candidate_does_not_stop_scan() {
        let spots = vec![
            Spot::at("Broken", f64::NAN, 60.61947),
            Spot {
                name: "Half",
                lat: Some(41.54916),
                lon: None,
            },
            Spot::at("Kalta Minor", 41.54930, 60.61950),
        ];
        let found = find_nearest(QUERY.0, QUERY.1, &spots).unwrap();
        assert_eq!(found.name, "Kalta Minor");
    }

    #[test]
    fn test_picks_minimum_distance() {
        let (lat_a, lon_a) = north_of_query(250.0);
        let (lat_b, lon_b) = north_of_query(40.0);
        let (lat_c, lon_c) = north_of_query(120.0);
        let spots = vec![
            Spot::at("A", lat_a, lon_a),
            Spot::at("B", lat_b, lon_b),
            Spot::at("C", lat_c, lon_c),
        ];
        let found = find_nearest(QUERY.0, QUERY.1, &spots).unwrap();
        assert_eq!(found.name, "B");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let spots = vec![
            Spot::at("First", 41.54930, 60.61947),
            Spot::at("Second", 41.54930, 60.61947),
        ];
        for _ in 0..3 {
            let found = find_nearest(QUERY.0, QUERY.1, &spots).unwrap();
            assert_eq!(found.name, "First");
        }
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let (lat, lon) = north_of_query(150.0);
        let spots = vec![Spot::at("Edge", lat, lon)];
        let query = GeoPoint::new(QUERY.0, QUERY.1);
        let exact = haversine_meters(query, GeoPoint::new(lat, lon));

        assert!(NearestResolver::with_threshold(exact)
            .resolve(query, &spots)
            .is_ok());
        assert!(NearestResolver::with_threshold(exact - 1e-6)
            .resolve(query, &spots)
            .is_err());
    }

    #[test]
    fn test_standard_threshold_edges() {
        let (lat_in, lon_in) = north_of_query(299.99);
        let (lat_out, lon_out) = north_of_query(300.01);

        let inside = vec![Spot::at("Inside", lat_in, lon_in)];
        let outside = vec![Spot::at("Outside", lat_out, lon_out)];

        assert!(find_nearest(QUERY.0, QUERY.1, &inside).is_ok());
        let err = find_nearest(QUERY.0, QUERY.1, &outside).unwrap_err();
        assert_eq!(err.nearest.unwrap().name, "Outside");
    }

    #[test]
    fn test_standard_threshold_within_a_micrometer() {
        let query = GeoPoint::new(QUERY.0, QUERY.1);
        let at = |d_lat: f64| GeoPoint::new(QUERY.0 + d_lat, QUERY.1);
        let dist = |d_lat: f64| haversine_meters(query, at(d_lat));

        // Bracket the latitude offset that lands exactly on the threshold
        let (mut lo, mut hi) = (0.0_f64, 0.01_f64);
        for _ in 0..200 {
            if dist(hi) - dist(lo) < 1e-7 {
                break;
            }
            let mid = (lo + hi) / 2.0;
            if dist(mid) <= MATCH_THRESHOLD_METERS {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let (d_in, d_out) = (dist(lo), dist(hi));
        assert!(d_in <= MATCH_THRESHOLD_METERS && MATCH_THRESHOLD_METERS - d_in < 1e-6);
        assert!(d_out > MATCH_THRESHOLD_METERS && d_out - MATCH_THRESHOLD_METERS < 1e-6);

        let inside = vec![Spot::at("Inside", at(lo).lat, at(lo).lon)];
        let outside = vec![Spot::at("Outside", at(hi).lat, at(hi).lon)];
        assert_eq!(find_nearest(QUERY.0, QUERY.1, &inside).unwrap().name, "Inside");
        let err = find_nearest(QUERY.0, QUERY.1, &outside).unwrap_err();
        assert_eq!(err.nearest.unwrap().name, "Outside");
    }

    #[test]
    fn test_larger_threshold_keeps_previous_match() {
        let spots: Vec<Spot> = [30.0, 180.0, 420.0, 900.0, 2500.0]
            .iter()
            .rev()
            .map(|m| {
                let (lat, lon) = north_of_query(*m);
                Spot::at("spot", lat, lon)
            })
            .collect();
        let query = GeoPoint::new(QUERY.0, QUERY.1);

        let mut previous: Option<*const Spot> = None;
        for threshold in [10.0, 50.0, 300.0, 1000.0, 5000.0] {
            let result = NearestResolver::with_threshold(threshold).resolve(query, &spots);
            if let Some(prev) = previous {
                let matched = *result.as_ref().expect("match lost when threshold grew");
                assert_eq!(matched as *const Spot, prev);
            }
            previous = result.ok().map(|s| s as *const Spot);
        }
        assert!(previous.is_some());
    }

    #[test]
    fn test_result_is_minimal_among_valid_candidates() {
        let spots = vec![
            Spot::at("Tash Hauli", 41.37950, 60.36190),
            Spot::at("Islam Khoja", 41.37770, 60.36050),
            Spot::at("Kunta Ark", 41.37830, 60.35740),
            Spot {
                name: "Draft",
                lat: None,
                lon: None,
            },
        ];
        let query = GeoPoint::new(41.37800, 60.36000);
        let found = NearestResolver::new().resolve(query, &spots).unwrap();
        let found_dist = haversine_meters(query, found.coordinates().unwrap());

        assert!(found_dist <= MATCH_THRESHOLD_METERS);
        for s in &spots {
            if let Ok(p) = s.coordinates() {
                assert!(haversine_meters(query, p) >= found_dist);
            }
        }
        assert_eq!(found.name, "Islam Khoja");
    }
}
