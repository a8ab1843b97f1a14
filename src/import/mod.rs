//! Seeding: the first admin account and the landmark catalogue CSV.
//!
//! The catalogue is a semicolon-separated export with Turkish headers:
//!
//! ```text
//! Yapılar;Kordinatlar;bilgileri
//! Kalta Minor;41.3786, 60.3589;The unfinished turquoise minaret...
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::hash_password;
use crate::db::{Database, NewUser};
use crate::models::Place;

const SHORT_DESC_CHARS: usize = 100;

/// One usable catalogue row
#[derive(Debug, Clone, PartialEq)]
pub struct CsvPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Yapılar", default)]
    name: String,
    #[serde(rename = "Kordinatlar", default)]
    coordinates: String,
    #[serde(rename = "bilgileri", default)]
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Added,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
}

/// Create the admin account unless the email is already registered.
///
/// Returns true if a user was created.
pub async fn seed_admin(db: &Database, email: &str, password: &str) -> Result<bool> {
    if db.find_user_by_email(email).await?.is_some() {
        debug!("Admin user {} already exists", email);
        return Ok(false);
    }

    db.create_user(NewUser {
        email: email.to_string(),
        hashed_password: hash_password(password),
        full_name: Some("Admin User".to_string()),
        is_active: true,
        is_premium: true,
        is_admin: true,
    })
    .await
    .context("Failed to create admin user")?;

    info!("Admin user {} created", email);
    Ok(true)
}

/// Parse "lat,lng"
pub fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let (lat, lng) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if lat.is_finite() && lng.is_finite() {
        Some((lat, lng))
    } else {
        None
    }
}

/// Read catalogue rows, skipping any without a name or valid coordinates.
pub fn read_places_csv<R: Read>(mut reader: R) -> Result<Vec<CsvPlace>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read CSV")?;
    let content = content.trim_start_matches('\u{feff}');

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut places = Vec::new();
    for (line, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping CSV row {}: {}", line + 2, e);
                continue;
            }
        };

        if row.name.is_empty() || row.coordinates.is_empty() {
            warn!(
                "Skipping row with missing name or coordinates: '{}', '{}'",
                row.name, row.coordinates
            );
            continue;
        }

        let Some((latitude, longitude)) = parse_coordinates(&row.coordinates) else {
            warn!("Skipping {}: invalid coordinates '{}'", row.name, row.coordinates);
            continue;
        };

        places.push(CsvPlace {
            name: row.name,
            latitude,
            longitude,
            description: row.description,
        });
    }

    Ok(places)
}

fn short_description(description: &str) -> String {
    if description.chars().count() > SHORT_DESC_CHARS {
        let head: String = description.chars().take(SHORT_DESC_CHARS).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// Insert a new place, or refresh description and coordinates of the place
/// with the same name.
pub async fn import_place(db: &Database, row: &CsvPlace) -> Result<ImportOutcome> {
    if let Some(mut place) = db.find_place_by_name(&row.name).await? {
        place.description = Some(row.description.clone());
        place.latitude = Some(row.latitude);
        place.longitude = Some(row.longitude);
        db.save_place(&place).await?;
        debug!("Updated place: {}", row.name);
        return Ok(ImportOutcome::Updated);
    }

    let place = Place {
        id: 0,
        name: row.name.clone(),
        short_desc: Some(short_description(&row.description)),
        long_desc: None,
        story_text: None,
        child_text: None,
        description: Some(row.description.clone()),
        photo_url: Some(String::new()),
        audio_url: Some(String::new()),
        latitude: Some(row.latitude),
        longitude: Some(row.longitude),
        kind: "historical".to_string(),
        boundary_points: None,
        parent_id: None,
        is_active: true,
    };
    let id = db.insert_place(&place).await?;
    debug!("Added place {}: {}", id, row.name);
    Ok(ImportOutcome::Added)
}

pub async fn import_places(db: &Database, rows: &[CsvPlace]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for row in rows {
        match import_place(db, row)
            .await
            .with_context(|| format!("Importing {}", row.name))?
        {
            ImportOutcome::Added => summary.added += 1,
            ImportOutcome::Updated => summary.updated += 1,
        }
    }
    info!(
        "Imported places: {} added, {} updated",
        summary.added, summary.updated
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use std::io::Write;

    const SAMPLE: &str = "\u{feff}Yapılar;Kordinatlar;bilgileri\n\
        Kalta Minor; 41.3786, 60.3589 ;Unfinished turquoise minaret.\n\
        ;41.0,60.0;no name\n\
        Juma Mosque;;no coordinates\n\
        Tash Hauli;north of the gate;bad coordinates\n\
        Islam Khoja;41.3777,60.3605;Tallest minaret in Khiva.\n";

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("41.3786, 60.3589"), Some((41.3786, 60.3589)));
        assert_eq!(parse_coordinates("41.3786"), None);
        assert_eq!(parse_coordinates("a,b"), None);
        assert_eq!(parse_coordinates("NaN,60.0"), None);
    }

    #[test]
    fn test_read_skips_bad_rows() {
        let places = read_places_csv(SAMPLE.as_bytes()).unwrap();
        let names: Vec<_> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Kalta Minor", "Islam Khoja"]);
        assert_eq!(places[0].latitude, 41.3786);
        assert_eq!(places[0].description, "Unfinished turquoise minaret.");
    }

    #[test]
    fn test_read_from_file_with_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let places = read_places_csv(std::fs::File::open(file.path()).unwrap()).unwrap();
        assert_eq!(places.len(), 2);
    }

    #[test]
    fn test_short_description() {
        assert_eq!(short_description("short"), "short");
        let long = "ş".repeat(150);
        let short = short_description(&long);
        assert_eq!(short.chars().count(), 103);
        assert!(short.ends_with("..."));
    }

    #[tokio::test]
    async fn test_import_adds_then_updates() {
        let db = Database::in_memory().await.unwrap();
        let mut rows = read_places_csv(SAMPLE.as_bytes()).unwrap();

        let first = import_places(&db, &rows).await.unwrap();
        assert_eq!(first, ImportSummary { added: 2, updated: 0 });

        let kalta = db.find_place_by_name("Kalta Minor").await.unwrap().unwrap();
        assert_eq!(kalta.kind, "historical");
        assert!(kalta.is_active);
        assert_eq!(kalta.short_desc.as_deref(), Some("Unfinished turquoise minaret."));

        rows[0].latitude = 41.5;
        rows[0].description = "Updated".to_string();
        let second = import_places(&db, &rows).await.unwrap();
        assert_eq!(second, ImportSummary { added: 0, updated: 2 });

        let kalta = db.find_place_by_name("Kalta Minor").await.unwrap().unwrap();
        assert_eq!(kalta.latitude, Some(41.5));
        assert_eq!(kalta.description.as_deref(), Some("Updated"));
        assert_eq!(kalta.short_desc.as_deref(), Some("Unfinished turquoise minaret."));
    }

    #[tokio::test]
    async fn test_seed_admin_once() {
        let db = Database::in_memory().await.unwrap();
        assert!(seed_admin(&db, "admin@ichankala.com", "admin123").await.unwrap());
        assert!(!seed_admin(&db, "admin@ichankala.com", "other").await.unwrap());

        let user = db.find_user_by_email("admin@ichankala.com").await.unwrap().unwrap();
        assert!(user.is_admin && user.is_active && user.is_premium);
        assert!(verify_password("admin123", &user.hashed_password));
    }
}
