//! Entity store - the currently rendered entity set.

use std::collections::HashMap;

use crate::entity::Entity;

/// Current entities in snapshot order, keyed by id.
///
/// Replaced wholesale on each committed snapshot: an id missing from the new
/// snapshot disappears from the store.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set.
    ///
    /// Ids are expected to be unique; if not, lookups resolve to the first
    /// occurrence.
    pub fn replace(&mut self, entities: Vec<Entity>) {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            index.entry(entity.id.clone()).or_insert(position);
        }
        self.entities = entities;
        self.index = index;
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entities in snapshot (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GeoPoint, Kinematics};

    fn entity(id: &str) -> Entity {
        Entity::at_now(id, GeoPoint::new(0.0, 0.0), Kinematics::stationary())
    }

    #[test]
    fn test_replace_is_hard_replace() {
        let mut store = EntityStore::new();
        store.replace(vec![entity("a"), entity("b")]);
        assert_eq!(store.len(), 2);

        store.replace(vec![entity("b"), entity("c")]);
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(store.contains("c"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut store = EntityStore::new();
        store.replace(vec![entity("z"), entity("a"), entity("m")]);

        let ids: Vec<&str> = store.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
        assert_eq!(store.get("m").map(|e| e.id.as_str()), Some("m"));
    }

    #[test]
    fn test_empty_store() {
        let store = EntityStore::new();
        assert!(store.is_empty());
        assert!(store.get("a").is_none());
        assert!(store.as_slice().is_empty());
    }
}
