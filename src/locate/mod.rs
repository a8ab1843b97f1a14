//! Nearest-place lookup for visitor GPS coordinates.
//!
//! A linear scan over the active places computes haversine distances and
//! accepts the closest one only when it lies within the match threshold.

mod boundary;
mod distance;
mod resolver;

pub use boundary::{Boundary, BoundaryError, BoundaryPoint};
pub use distance::{haversine_meters, GeoPoint, EARTH_RADIUS_METERS};
pub use resolver::{
    find_nearest, CandidateError, Locatable, NearestCandidate, NearestResolver, NoMatch,
    MATCH_THRESHOLD_METERS,
};
