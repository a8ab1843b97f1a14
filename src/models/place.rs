//! Place records: landmarks a visitor can stand in front of.

use serde::{Deserialize, Deserializer, Serialize};

use crate::locate::{BoundaryPoint, CandidateError, GeoPoint, Locatable};

/// Place row as stored in the `places` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    /// Full historical story
    pub story_text: Option<String>,
    /// Simplified story for kids
    pub child_text: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub audio_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// "historical", "museum", "restaurant", ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Outline drawn with the admin mapper
    pub boundary_points: Option<Vec<BoundaryPoint>>,
    /// Set for micro-locations nested inside another place
    pub parent_id: Option<i64>,
    pub is_active: bool,
}

impl Place {
    /// Text read aloud for the given narration mode ("long" or anything else
    /// for short), falling back to the place name.
    pub fn narration_text(&self, mode: &str) -> &str {
        let text = if mode == "long" {
            self.description.as_deref()
        } else {
            self.short_desc.as_deref()
        };
        match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.name,
        }
    }
}

impl Locatable for Place {
    fn label(&self) -> &str {
        &self.name
    }

    fn coordinates(&self) -> Result<GeoPoint, CandidateError> {
        let (lat, lon) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(CandidateError::MissingCoordinate),
        };
        let point = GeoPoint::new(lat, lon);
        if !point.is_finite() {
            return Err(CandidateError::NonFinite { lat, lon });
        }
        Ok(point)
    }
}

/// Public representation consumed by the visitor app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceView {
    pub id: i64,
    pub name: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub location_lat: f64,
    pub location_lng: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub photo_url: Option<String>,
    pub audio_url: Option<String>,
    pub description: Option<String>,
    pub boundary_points: Option<Vec<BoundaryPoint>>,
    pub parent_id: Option<i64>,
}

impl From<Place> for PlaceView {
    fn from(place: Place) -> Self {
        let description = place
            .description
            .filter(|d| !d.is_empty())
            .or_else(|| place.short_desc.clone());

        Self {
            id: place.id,
            name: place.name,
            short_desc: place.short_desc,
            long_desc: place.long_desc,
            location_lat: place.latitude.unwrap_or(0.0),
            location_lng: place.longitude.unwrap_or(0.0),
            kind: place.kind,
            photo_url: place.photo_url,
            audio_url: place.audio_url,
            description,
            boundary_points: place.boundary_points,
            parent_id: place.parent_id,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Admin payload for a new place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCreate {
    pub name: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub photo_url: Option<String>,
    pub boundary_points: Option<Vec<BoundaryPoint>>,
    pub parent_id: Option<i64>,
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Admin payload for a partial update.
///
/// Absent fields stay unchanged. The nullable columns take an explicit `null`
/// to clear them; `"parent_id": null` moves a micro-location to the top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub short_desc: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub boundary_points: Option<Option<Vec<BoundaryPoint>>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<i64>>,
}

impl PlaceUpdate {
    /// Apply the set fields onto an existing record
    pub fn apply(self, place: &mut Place) {
        if let Some(v) = self.name {
            place.name = v;
        }
        if let Some(v) = self.short_desc {
            place.short_desc = v;
        }
        if let Some(v) = self.long_desc {
            place.long_desc = v;
        }
        if let Some(v) = self.latitude {
            place.latitude = Some(v);
        }
        if let Some(v) = self.longitude {
            place.longitude = Some(v);
        }
        if let Some(v) = self.is_active {
            place.is_active = v;
        }
        if let Some(v) = self.kind {
            place.kind = v;
        }
        if let Some(v) = self.photo_url {
            place.photo_url = v;
        }
        if let Some(v) = self.boundary_points {
            // An empty recording means "no outline"
            place.boundary_points = v.filter(|points| !points.is_empty());
        }
        if let Some(v) = self.parent_id {
            place.parent_id = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> Place {
        Place {
            id: 7,
            name: "Juma Mosque".to_string(),
            short_desc: Some("213 carved wooden columns".to_string()),
            long_desc: None,
            story_text: None,
            child_text: None,
            description: None,
            photo_url: None,
            audio_url: None,
            latitude: Some(41.3786),
            longitude: Some(60.3594),
            kind: "historical".to_string(),
            boundary_points: None,
            parent_id: None,
            is_active: true,
        }
    }

    #[test]
    fn test_view_falls_back_to_short_desc() {
        let view = PlaceView::from(place());
        assert_eq!(view.description.as_deref(), Some("213 carved wooden columns"));
        assert_eq!(view.location_lat, 41.3786);
    }

    #[test]
    fn test_view_missing_coordinates_render_zero() {
        let mut p = place();
        p.latitude = None;
        let view = PlaceView::from(p);
        assert_eq!(view.location_lat, 0.0);
        assert_eq!(view.location_lng, 60.3594);
    }

    #[test]
    fn test_place_coordinates() {
        assert!(place().coordinates().is_ok());

        let mut p = place();
        p.longitude = None;
        assert_eq!(p.coordinates(), Err(CandidateError::MissingCoordinate));

        let mut p = place();
        p.latitude = Some(f64::INFINITY);
        assert!(matches!(p.coordinates(), Err(CandidateError::NonFinite { .. })));
    }

    #[test]
    fn test_narration_text() {
        let mut p = place();
        assert_eq!(p.narration_text("short"), "213 carved wooden columns");
        assert_eq!(p.narration_text("long"), "Juma Mosque");
        p.description = Some("A mosque with a forest of columns.".to_string());
        assert_eq!(p.narration_text("long"), "A mosque with a forest of columns.");
    }

    #[test]
    fn test_update_only_touches_set_fields() {
        let mut p = place();
        let update: PlaceUpdate =
            serde_json::from_str(r#"{"name": "Friday Mosque", "is_active": false}"#).unwrap();
        update.apply(&mut p);
        assert_eq!(p.name, "Friday Mosque");
        assert!(!p.is_active);
        assert_eq!(p.latitude, Some(41.3786));
        assert_eq!(p.kind, "historical");
    }

    #[test]
    fn test_update_explicit_null_clears() {
        let mut p = place();
        p.parent_id = Some(3);
        p.photo_url = Some("/static/juma.jpg".to_string());

        let update: PlaceUpdate =
            serde_json::from_str(r#"{"short_desc": "moved", "parent_id": null, "photo_url": null}"#)
                .unwrap();
        assert_eq!(update.parent_id, Some(None));
        update.apply(&mut p);
        assert_eq!(p.parent_id, None);
        assert_eq!(p.photo_url, None);
        assert_eq!(p.short_desc.as_deref(), Some("moved"));
    }

    #[test]
    fn test_update_absent_nullable_fields_kept() {
        let mut p = place();
        p.parent_id = Some(3);
        let update: PlaceUpdate = serde_json::from_str(r#"{"long_desc": "Rebuilt 1788"}"#).unwrap();
        assert_eq!(update.parent_id, None);
        update.apply(&mut p);
        assert_eq!(p.parent_id, Some(3));
        assert_eq!(p.short_desc.as_deref(), Some("213 carved wooden columns"));
    }

    #[test]
    fn test_update_empty_boundary_clears_outline() {
        let mut p = place();
        p.boundary_points = Some(vec![BoundaryPoint { lat: 41.0, lng: 60.0 }; 3]);
        let update: PlaceUpdate = serde_json::from_str(r#"{"boundary_points": []}"#).unwrap();
        update.apply(&mut p);
        assert!(p.boundary_points.is_none());
    }

    #[test]
    fn test_create_defaults_active() {
        let create: PlaceCreate = serde_json::from_str(
            r#"{"name": "Ata Darvaza", "latitude": 41.378, "longitude": 60.356,
                "type": "historical"}"#,
        )
        .unwrap();
        assert!(create.is_active);
        assert!(create.parent_id.is_none());
    }
}
