//! View-model for the interactive session.

use minar_geo::Coordinate;
use minar_osm::overpass::Ranked;

/// Holds the state the UI reads: where the user is, where the current query
/// is centered, and the latest ranked results.
///
/// Each issued nearby query is tagged with a generation. A response is only
/// installed when its generation is still current, so a late reply from an
/// abandoned query cannot overwrite newer results.
pub struct Session {
    pub user_location: Option<Coordinate>,
    center: Option<Coordinate>,
    results: Vec<Ranked>,
    generation: u64,
}

impl Session {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user_location: None,
            center: None,
            results: Vec::new(),
            generation: 0,
        }
    }

    /// Start a new query against `center`, invalidating any in-flight one.
    /// Returns the generation tag for the new query.
    pub fn begin_query(&mut self, center: Coordinate) -> u64 {
        self.center = Some(center);
        self.generation += 1;
        self.generation
    }

    /// Install `results` if `generation` is still current.
    ///
    /// Returns `false` when the response was stale and dropped.
    pub fn apply_results(&mut self, generation: u64, results: Vec<Ranked>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.results = results;
        true
    }

    /// Whether `generation` tags the live query.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    #[must_use]
    pub const fn center(&self) -> Option<Coordinate> {
        self.center
    }

    #[must_use]
    pub fn results(&self) -> &[Ranked] {
        &self.results
    }

    /// Result at a 1-based list position, as shown in the rendered list.
    #[must_use]
    pub fn result(&self, index: usize) -> Option<&Ranked> {
        index.checked_sub(1).and_then(|i| self.results.get(i))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minar_osm::place::Place;

    fn ranked(id: &str, distance_m: f64) -> Ranked {
        Ranked {
            place: Place {
                id: id.to_owned(),
                name: id.to_owned(),
                coordinate: Coordinate::new(0.0, 0.0),
                tags: std::collections::HashMap::new(),
            },
            distance_m,
        }
    }

    #[test]
    fn current_generation_results_are_applied() {
        let mut session = Session::new();
        let generation = session.begin_query(Coordinate::new(0.0, 0.0));
        assert!(session.apply_results(generation, vec![ranked("node/1", 10.0)]));
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn stale_generation_results_are_dropped() {
        let mut session = Session::new();
        let old = session.begin_query(Coordinate::new(0.0, 0.0));
        let new = session.begin_query(Coordinate::new(1.0, 1.0));

        assert!(session.apply_results(new, vec![ranked("node/2", 5.0)]));
        assert!(!session.apply_results(old, vec![ranked("node/1", 10.0)]));
        assert_eq!(session.results()[0].place.id, "node/2");
        assert!(!session.is_current(old));
    }

    #[test]
    fn begin_query_moves_the_center() {
        let mut session = Session::new();
        assert!(session.center().is_none());
        session.begin_query(Coordinate::new(2.0, 3.0));
        assert_eq!(session.center(), Some(Coordinate::new(2.0, 3.0)));
    }

    #[test]
    fn result_lookup_is_one_based() {
        let mut session = Session::new();
        let generation = session.begin_query(Coordinate::new(0.0, 0.0));
        session.apply_results(generation, vec![ranked("node/1", 1.0), ranked("node/2", 2.0)]);

        assert_eq!(session.result(1).expect("first").place.id, "node/1");
        assert_eq!(session.result(2).expect("second").place.id, "node/2");
        assert!(session.result(0).is_none());
        assert!(session.result(3).is_none());
    }
}
