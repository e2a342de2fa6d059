//! Document-wide identifier registry

use std::collections::HashMap;

use super::tree::NodeId;

/// Maps element names to nodes. The first registration of a name wins.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    ids: HashMap<String, NodeId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `node`.
    ///
    /// Returns the existing binding if the name is already taken; the
    /// registry is left unchanged in that case.
    pub fn register(&mut self, name: &str, node: NodeId) -> Option<NodeId> {
        if let Some(existing) = self.ids.get(name) {
            return Some(*existing);
        }
        self.ids.insert(name.to_string(), node);
        None
    }

    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// All registered names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    #[test]
    fn test_first_registration_wins() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let a = scene.insert_group(root).unwrap();
        let b = scene.insert_group(root).unwrap();

        let mut registry = Registry::new();
        assert_eq!(registry.register("box", a), None);
        assert_eq!(registry.register("box", b), Some(a));
        assert_eq!(registry.resolve("box"), Some(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve("nothing"), None);
        assert!(!registry.contains("nothing"));
    }
}
