//! Normalization of raw Overpass features into a uniform point shape.

use std::collections::HashMap;

use minar_geo::Coordinate;

/// Display name used when a feature carries no name tag.
pub const FALLBACK_NAME: &str = "Unnamed Mosque";

/// A raw feature as returned by Overpass.
///
/// Points (`node`) carry coordinates directly; areas (`way` / `relation`)
/// carry a precomputed centroid in `center` when the query asks for one.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Centroid of a non-point feature.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// A normalized point-of-interest. Immutable once built.
///
/// `id` is `"{kind}/{numeric id}"` — stable across repeated queries for the
/// same underlying real-world feature, and the key used for favoriting.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub tags: HashMap<String, String>,
}

/// Collapse a raw element into a point with metadata.
///
/// Returns `None` when no usable coordinate can be derived: a node without
/// coordinates, an area feature without a centroid, or a coordinate outside
/// the valid range.
#[must_use]
pub fn normalize(element: Element) -> Option<Place> {
    let (lat, lon) = if element.kind == "node" {
        (element.lat?, element.lon?)
    } else {
        let center = element.center?;
        (center.lat, center.lon)
    };
    let coordinate = Coordinate::try_new(lat, lon).ok()?;

    let name = element
        .tags
        .get("name")
        .or_else(|| element.tags.get("name:en"))
        .cloned()
        .unwrap_or_else(|| FALLBACK_NAME.to_owned());

    Some(Place {
        id: format!("{}/{}", element.kind, element.id),
        name,
        coordinate,
        tags: element.tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(kind: &str, id: u64) -> Element {
        Element {
            kind: kind.to_owned(),
            id,
            lat: None,
            lon: None,
            center: None,
            tags: HashMap::new(),
        }
    }

    #[test]
    fn node_with_coordinates_is_accepted() {
        let mut el = element("node", 42);
        el.lat = Some(59.91);
        el.lon = Some(10.75);
        let place = normalize(el).expect("representable");
        assert_eq!(place.id, "node/42");
        assert_eq!(place.coordinate, Coordinate::new(59.91, 10.75));
    }

    #[test]
    fn node_without_coordinates_is_rejected() {
        let mut el = element("node", 1);
        el.lat = Some(1.0);
        assert!(normalize(el).is_none());
        assert!(normalize(element("node", 2)).is_none());
    }

    #[test]
    fn area_uses_its_centroid() {
        let mut el = element("way", 7);
        el.center = Some(Center { lat: 1.0, lon: 2.0 });
        let place = normalize(el).expect("representable");
        assert_eq!(place.id, "way/7");
        assert_eq!(place.coordinate, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn area_without_centroid_is_rejected() {
        assert!(normalize(element("way", 7)).is_none());
        assert!(normalize(element("relation", 8)).is_none());
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let mut el = element("node", 9);
        el.lat = Some(95.0);
        el.lon = Some(0.0);
        assert!(normalize(el).is_none());
    }

    #[test]
    fn name_prefers_the_local_name_tag() {
        let mut el = element("node", 3);
        el.lat = Some(0.0);
        el.lon = Some(0.0);
        el.tags.insert("name".to_owned(), "Sultanahmet Camii".to_owned());
        el.tags.insert("name:en".to_owned(), "Blue Mosque".to_owned());
        assert_eq!(normalize(el).expect("place").name, "Sultanahmet Camii");
    }

    #[test]
    fn name_falls_back_to_english_then_placeholder() {
        let mut el = element("node", 4);
        el.lat = Some(0.0);
        el.lon = Some(0.0);
        el.tags.insert("name:en".to_owned(), "Blue Mosque".to_owned());
        assert_eq!(normalize(el.clone()).expect("place").name, "Blue Mosque");

        el.tags.clear();
        assert_eq!(normalize(el).expect("place").name, FALLBACK_NAME);
    }
}
