use crate::models::{Venue, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate venue name in catalog: {0}")]
    DuplicateVenue(String),
}

/// Source of candidate venues for a search
///
/// Implementations must be deterministic and free of side effects; the
/// pipeline calls `get_catalog` once per search, possibly from several
/// threads at once.
pub trait CatalogProvider: Send + Sync {
    fn get_catalog(&self) -> Result<Vec<Venue>, CatalogError>;
}

/// The fixed Baltimore catalog compiled into the service
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogProvider for BuiltinCatalog {
    fn get_catalog(&self) -> Result<Vec<Venue>, CatalogError> {
        Ok(builtin_venues())
    }
}

/// Catalog read from a JSON array of venues on every call
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for JsonCatalog {
    fn get_catalog(&self) -> Result<Vec<Venue>, CatalogError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let venues: Vec<Venue> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;

        ensure_unique_names(&venues)?;
        tracing::trace!("Loaded {} venues from {}", venues.len(), self.path.display());
        Ok(venues)
    }
}

fn ensure_unique_names(venues: &[Venue]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for venue in venues {
        if !seen.insert(venue.name.as_str()) {
            return Err(CatalogError::DuplicateVenue(venue.name.clone()));
        }
    }
    Ok(())
}

fn slots(entries: Vec<(Weekday, Vec<&str>)>) -> BTreeMap<Weekday, BTreeSet<String>> {
    entries
        .into_iter()
        .map(|(day, times)| (day, times.into_iter().map(String::from).collect()))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn venue(
    name: &str,
    cuisine: &str,
    location: &str,
    price_range: &str,
    avg_price_per_person: f64,
    rating: f64,
    availability: BTreeMap<Weekday, BTreeSet<String>>,
    window_view: Option<Vec<&str>>,
    distance_from_center: f64,
) -> Venue {
    Venue {
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        location: location.to_string(),
        price_range: price_range.to_string(),
        avg_price_per_person,
        rating,
        availability,
        has_window_seating: window_view.is_some(),
        window_view: window_view
            .unwrap_or_default()
            .into_iter()
            .map(String::from)
            .collect(),
        distance_from_center,
    }
}

const DOWNTOWN: &str = "Downtown Baltimore, MD";

/// Venues of the built-in catalog, in catalog order
pub fn builtin_venues() -> Vec<Venue> {
    use Weekday::{Friday, Thursday};

    vec![
        venue(
            "Istanbul Grill", "Turkish", DOWNTOWN, "$$", 28.0, 4.5,
            slots(vec![
                (Thursday, vec!["6:00 pm", "6:30 pm", "7:00 pm", "7:30 pm", "8:00 pm"]),
                (Friday, vec!["6:00 pm", "7:00 pm", "8:00 pm"]),
            ]),
            Some(vec!["street"]),
            0.3,
        ),
        venue(
            "Anatolian Kitchen", "Turkish", DOWNTOWN, "$$", 32.0, 4.7,
            slots(vec![
                (Thursday, vec!["5:30 pm", "6:00 pm", "7:30 pm", "8:30 pm"]),
                (Friday, vec!["6:00 pm", "7:00 pm"]),
            ]),
            Some(vec!["garden", "street"]),
            0.5,
        ),
        venue(
            "Bosphorus Cafe", "Turkish", DOWNTOWN, "$", 22.0, 4.2,
            slots(vec![
                (Thursday, vec!["6:00 pm", "7:00 pm", "8:00 pm"]),
                (Friday, vec!["6:30 pm", "7:30 pm"]),
            ]),
            None,
            0.8,
        ),
        venue(
            "Sultan's Table", "Turkish", DOWNTOWN, "$$$", 45.0, 4.8,
            slots(vec![
                (Thursday, vec!["6:00 pm", "6:30 pm", "7:30 pm"]),
                (Friday, vec!["7:00 pm", "8:00 pm"]),
            ]),
            Some(vec!["garden"]),
            0.2,
        ),
        venue(
            "Cappadocia Kebab House", "Turkish", DOWNTOWN, "$$", 30.0, 4.0,
            slots(vec![
                (Thursday, vec!["6:00 pm", "7:00 pm", "8:30 pm"]),
                (Friday, vec!["6:30 pm", "8:00 pm"]),
            ]),
            None,
            0.6,
        ),
        venue(
            "Mediterranean Breeze", "Mediterranean", DOWNTOWN, "$$", 30.0, 4.4,
            slots(vec![
                (Thursday, vec!["7:30 pm", "8:00 pm"]),
                (Friday, vec!["6:00 pm", "7:00 pm"]),
            ]),
            Some(vec!["street"]),
            0.4,
        ),
        venue(
            "Turkish Delight", "Turkish", "Harbor East, Baltimore, MD", "$$", 26.0, 4.3,
            slots(vec![
                (Thursday, vec!["7:30 pm", "8:00 pm"]),
                (Friday, vec!["6:00 pm", "7:00 pm"]),
            ]),
            Some(vec!["harbor"]),
            1.2,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_names_unique() {
        let venues = BuiltinCatalog.get_catalog().unwrap();
        assert_eq!(venues.len(), 7);
        assert!(ensure_unique_names(&venues).is_ok());
    }

    #[test]
    fn test_builtin_catalog_is_deterministic() {
        assert_eq!(BuiltinCatalog.get_catalog().unwrap(), BuiltinCatalog.get_catalog().unwrap());
    }

    #[test]
    fn test_json_catalog_round_trips_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&builtin_venues()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let venues = JsonCatalog::new(file.path()).get_catalog().unwrap();
        assert_eq!(venues, builtin_venues());
    }

    #[test]
    fn test_json_catalog_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut venues = builtin_venues();
        venues.push(venues[0].clone());
        file.write_all(serde_json::to_string(&venues).unwrap().as_bytes()).unwrap();

        let err = JsonCatalog::new(file.path()).get_catalog().unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateVenue(name) if name == "Istanbul Grill"));
    }

    #[test]
    fn test_json_catalog_missing_file() {
        let err = JsonCatalog::new("/nonexistent/catalog.json").get_catalog().unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
