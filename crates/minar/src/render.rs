//! Plain-text rendering for the terminal list.

use std::fmt::Write as _;

use minar_geo::{format_distance, Coordinate};
use minar_osm::overpass::Ranked;

use crate::favorites::Favorites;

/// Outbound directions link for a destination coordinate, opened by the
/// user in a browser. Fixed Google Maps template; no response is consumed.
#[must_use]
pub fn directions_url(destination: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.lat(),
        destination.lon()
    )
}

/// Render the ranked list with 1-based indexes and saved markers.
#[must_use]
pub fn list(results: &[Ranked], favorites: &Favorites) -> String {
    if results.is_empty() {
        return "No results. Try `search <place>`.".to_owned();
    }
    let mut out = String::new();
    for (i, ranked) in results.iter().enumerate() {
        let marker = if favorites.is_saved(&ranked.place.id) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{:>3}. {marker} {}  ({})",
            i + 1,
            ranked.place.name,
            format_distance(ranked.distance_m)
        );
    }
    out
}

#[must_use]
pub const fn help() -> &'static str {
    "Commands:\n\
     \x20 <place> or search <place>  find mosques near a place\n\
     \x20 recenter                   search around your location again\n\
     \x20 list                       reprint the current results\n\
     \x20 save <n>                   save/unsave item n\n\
     \x20 dir <n>                    print a directions link for item n\n\
     \x20 show <n>                   print the coordinate of item n\n\
     \x20 quit                       exit"
}

#[cfg(test)]
mod tests {
    use super::*;
    use minar_osm::place::Place;

    fn ranked(id: &str, name: &str, distance_m: f64) -> Ranked {
        Ranked {
            place: Place {
                id: id.to_owned(),
                name: name.to_owned(),
                coordinate: Coordinate::new(0.0, 0.0),
                tags: std::collections::HashMap::new(),
            },
            distance_m,
        }
    }

    #[test]
    fn directions_url_uses_the_fixed_template() {
        let url = directions_url(Coordinate::new(41.0082, 28.9784));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=41.0082,28.9784"
        );
    }

    #[test]
    fn list_marks_saved_items() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut favorites = Favorites::load(dir.path().join("favorites.json"));
        favorites.toggle("node/1");

        let results = vec![ranked("node/1", "Saved One", 120.0), ranked("node/2", "Other", 2500.0)];
        let text = list(&results, &favorites);

        assert!(text.contains("1. * Saved One  (120 m)"), "{text}");
        assert!(text.contains("2.   Other  (2.5 km)"), "{text}");
    }

    #[test]
    fn empty_list_prompts_for_a_search() {
        let dir = tempfile::tempdir().expect("tempdir");
        let favorites = Favorites::load(dir.path().join("favorites.json"));
        assert!(list(&[], &favorites).contains("search"));
    }
}
