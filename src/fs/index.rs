use std::collections::HashMap;

use lfs_lib::path;

use crate::fs::entity::{AlbumData, Entity};

/// flat mapping of normalized absolute path to the entity living there.
///
/// built once by the crawl and only read afterwards.
#[derive(Debug)]
pub struct PathIndex {
    root: String,
    entries: HashMap<String, Entity>,
}

impl PathIndex {
    pub(crate) fn new<R>(root: R) -> Self
    where
        R: AsRef<str>
    {
        PathIndex {
            root: path::normalize(root),
            entries: HashMap::new(),
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root
    }

    pub fn root(&self) -> Option<&AlbumData> {
        self.entries.get(&self.root).and_then(Entity::as_album)
    }

    /// registers an entity, replacing anything already at the path
    pub(crate) fn insert(&mut self, path: String, entity: Entity) -> Option<Entity> {
        self.entries.insert(path, entity)
    }

    /// drops the entry at the path along with everything below it. returns
    /// the number of entries removed
    pub(crate) fn remove_tree(&mut self, parent: &str) -> usize {
        let before = self.entries.len();
        let prefix = if parent.ends_with(path::SEPARATOR) {
            parent.to_owned()
        } else {
            format!("{parent}{}", path::SEPARATOR)
        };

        self.entries.remove(parent);
        self.entries.retain(|key, _| !key.starts_with(&prefix));

        before - self.entries.len()
    }

    pub fn get<P>(&self, path: P) -> Option<&Entity>
    where
        P: AsRef<str>
    {
        let given = path.as_ref();

        // most lookups come in already normalized
        if let Some(found) = self.entries.get(given) {
            return Some(found);
        }

        self.entries.get(&path::normalize(given))
    }

    #[cfg(test)]
    pub fn contains<P>(&self, path: P) -> bool
    where
        P: AsRef<str>
    {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;
    use crate::fs::entity::Common;

    fn album(id: i64, title: &str) -> Entity {
        let now = Utc::now();

        Entity::from(AlbumData::new(id, title, now, now))
    }

    #[test]
    fn lookups_are_normalized() {
        let mut index = PathIndex::new("/");
        index.insert(String::from("/Vacation"), album(1, "Vacation"));

        assert!(index.contains("/Vacation"));
        assert!(index.contains("/Vacation/"));
        assert!(index.contains("//Vacation"));
        assert!(index.contains("/Family/../Vacation"));
        assert!(!index.contains("/Family"));
    }

    #[test]
    fn last_write_wins() {
        let mut index = PathIndex::new("/");

        assert!(index.insert(String::from("/Dup"), album(1, "Dup")).is_none());
        assert!(index.insert(String::from("/Dup"), album(2, "Dup")).is_some());

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("/Dup").unwrap().id(), 2);
    }

    #[test]
    fn remove_tree_only_drops_descendants() {
        let mut index = PathIndex::new("/");
        index.insert(String::from("/Dup/inner/deep"), album(5, "deep"));
        index.insert(String::from("/Dup/inner"), album(3, "inner"));
        index.insert(String::from("/Dup"), album(1, "Dup"));
        index.insert(String::from("/Dupe"), album(4, "Dupe"));

        assert_eq!(index.remove_tree("/Dup"), 3);

        assert!(!index.contains("/Dup"));
        assert!(!index.contains("/Dup/inner"));
        assert!(index.contains("/Dupe"));
        assert_eq!(index.remove_tree("/Missing"), 0);
    }
}
