//! Persistent set of saved place ids.
//!
//! One JSON array of id strings in one file under the user data directory.
//! Loads leniently: absent or corrupt data becomes an empty set. Writes are
//! best-effort: a failed write keeps the in-memory state and is only logged.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use exn::ResultExt;

const FILE_NAME: &str = "favorites.json";

/// Errors from favorites persistence.
#[derive(Debug)]
pub struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Error {}

pub struct Favorites {
    path: PathBuf,
    ids: BTreeSet<String>,
}

impl Favorites {
    /// Conventional storage path under the user data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("minar").join(FILE_NAME))
    }

    /// Load the saved set from `path`.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let ids = match read_ids(&path) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(?e, path = %path.display(), "could not load favorites, starting empty");
                BTreeSet::new()
            }
        };
        Self { path, ids }
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of `id` and persist. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_saved = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_owned());
            true
        };
        if let Err(e) = self.persist() {
            tracing::warn!(?e, "could not persist favorites");
        }
        now_saved
    }

    fn persist(&self) -> exn::Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .or_raise(|| Error(format!("create data dir {}", parent.display())))?;
        }
        let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        let json = serde_json::to_string(&ids).or_raise(|| Error("serialize favorites".into()))?;
        fs::write(&self.path, json)
            .or_raise(|| Error(format!("write {}", self.path.display())))?;
        Ok(())
    }
}

fn read_ids(path: &Path) -> exn::Result<BTreeSet<String>, Error> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let raw =
        fs::read_to_string(path).or_raise(|| Error(format!("read {}", path.display())))?;
    let ids: Vec<String> =
        serde_json::from_str(&raw).or_raise(|| Error("parse favorites file".into()))?;
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> Favorites {
        Favorites::load(dir.join(FILE_NAME))
    }

    #[test]
    fn toggle_flips_membership() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut favorites = store_in(dir.path());

        assert!(!favorites.is_saved("node/42"));
        assert!(favorites.toggle("node/42"));
        assert!(favorites.is_saved("node/42"));
        assert!(!favorites.toggle("node/42"));
        assert!(!favorites.is_saved("node/42"));
    }

    #[test]
    fn round_trips_through_a_fresh_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut favorites = store_in(dir.path());
        favorites.toggle("node/42");
        favorites.toggle("way/7");

        let reloaded = store_in(dir.path());
        assert!(reloaded.is_saved("node/42"));
        assert!(reloaded.is_saved("way/7"));
        assert!(!reloaded.is_saved("relation/9"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!store_in(dir.path()).is_saved("node/1"));
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(FILE_NAME), "not json at all").expect("write");
        let favorites = store_in(dir.path());
        assert!(!favorites.is_saved("node/1"));
    }

    #[test]
    fn toggle_after_corrupt_load_recovers_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(FILE_NAME), "[42]").expect("write");
        let mut favorites = store_in(dir.path());
        favorites.toggle("node/42");

        let reloaded = store_in(dir.path());
        assert!(reloaded.is_saved("node/42"));
    }
}
