//! The scene tree: an arena of nodes linked by parent indices.
//!
//! Nodes are created once, in construction order, and only dropped with
//! the whole scene. A node's parent is always created before the node, so
//! walking parent links from any node terminates at the document root.

use std::fmt;

use glam::DMat3;

use crate::attributes::{EventSet, PropertyOutcome, StyleProperty, StyleSet};

use super::constructors::{self, ShapeArg};
use super::diagnostics::{Diagnostics, Warning, WarningCategory};
use super::error::SceneError;
use super::registry::Registry;
use super::shapes::{Shape, ShapeKind};
use super::transform::{Transform, TransformStack};

/// Marker reference set on every arrow
pub const ARROWHEAD_MARKER: &str = "url(#marker-arrowhead)";

/// Index of a node in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document root
    Document,
    Group,
    /// Hyperlink container, `<a>` in markup
    Link { href: String },
    /// Definitions container, never rendered directly
    Defs,
    /// A group of a circle and its label; anchors are the circle's
    LabeledCircle,
    Shape(Shape),
}

impl NodeKind {
    /// Whether nodes of this kind may have children
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::Shape(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Group => "group",
            NodeKind::Link { .. } => "link",
            NodeKind::Defs => "defs",
            NodeKind::LabeledCircle => "labeled_circle",
            NodeKind::Shape(shape) => shape.kind().keyword(),
        }
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            NodeKind::Shape(shape) => Some(shape.kind()),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One element of the scene
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub name: Option<String>,
    pub transforms: TransformStack,
    pub children: Vec<NodeId>,
    pub style: StyleSet,
    pub events: EventSet,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            name: None,
            transforms: TransformStack::new(),
            children: Vec::new(),
            style: StyleSet::new(),
            events: EventSet::new(),
        }
    }
}

/// A document: the node arena, its identifier registry and the warnings
/// raised while building it
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    nodes: Vec<Node>,
    registry: Registry,
    diagnostics: Diagnostics,
}

impl Scene {
    /// Create an empty document of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            nodes: vec![Node::new(NodeKind::Document, None)],
            registry: Registry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Ids of all nodes in creation order, root first
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// The chain from the root down to `id`, both included
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Human-readable reference to a node for messages
    pub fn describe(&self, id: NodeId) -> String {
        let node = self.node(id);
        match &node.name {
            Some(name) => name.clone(),
            None => format!("<{} #{}>", node.kind, id.0),
        }
    }

    /// The node's own cumulative transform
    pub fn ctm(&self, id: NodeId) -> DMat3 {
        self.node(id).transforms.ctm()
    }

    /// Product of the CTMs along the root-to-node chain, root leftmost
    pub fn global_transform(&self, id: NodeId) -> DMat3 {
        self.ancestry(id)
            .into_iter()
            .fold(DMat3::IDENTITY, |memo, node| memo * self.ctm(node))
    }

    /// Append a transform to a node's stack.
    ///
    /// The document root carries no transforms, so that its global
    /// transform stays the identity.
    pub fn push_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        if id == self.root() {
            return Err(SceneError::invalid_arguments(
                transform.kind().markup_name(),
                "the document root cannot be transformed",
            ));
        }
        self.node_mut(id).transforms.push(transform);
        Ok(())
    }

    /// Append a child node under a container
    pub fn insert(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, SceneError> {
        self.ensure_container(parent)?;
        let id = NodeId(self.nodes.len());
        log::debug!("created {} #{} under {}", kind, id.0, self.describe(parent));
        self.nodes.push(Node::new(kind, Some(parent)));
        self.node_mut(parent).children.push(id);
        Ok(id)
    }

    pub fn insert_group(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.insert(parent, NodeKind::Group)
    }

    /// Construct a primitive shape from positional arguments and append it.
    ///
    /// Point arguments are localized into the new node's frame, which at
    /// creation coincides with the parent's.
    pub fn insert_shape(
        &mut self,
        parent: NodeId,
        kind: ShapeKind,
        args: Vec<ShapeArg>,
    ) -> Result<NodeId, SceneError> {
        self.ensure_container(parent)?;
        let mut diagnostics = Diagnostics::new();
        let shape = constructors::construct(self, parent, kind, args, &mut diagnostics)?;
        self.diagnostics.extend(diagnostics);

        let id = self.insert(parent, NodeKind::Shape(shape))?;
        if kind == ShapeKind::Arrow {
            self.node_mut(id)
                .style
                .set(StyleProperty::MarkerEnd, ARROWHEAD_MARKER);
        }
        Ok(id)
    }

    fn ensure_container(&self, parent: NodeId) -> Result<(), SceneError> {
        let kind = &self.node(parent).kind;
        if kind.is_container() {
            Ok(())
        } else {
            Err(SceneError::NotAContainer {
                kind: kind.to_string(),
            })
        }
    }

    /// Give a node its name and register it.
    ///
    /// A name that is already bound keeps its first binding and raises a
    /// `DuplicateIdentifier` warning.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        let name = name.into();
        if let Some(existing) = self.registry.register(&name, id) {
            self.diagnostics.warn(
                WarningCategory::DuplicateIdentifier,
                format!(
                    "repeated use of id '{}', it stays bound to {} #{}",
                    name,
                    self.node(existing).kind,
                    existing.0
                ),
            );
        }
        self.node_mut(id).name = Some(name);
    }

    /// Look up a node by name
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.registry.resolve(name)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Set a style property by key, warning on unknown keys
    pub fn set_style(&mut self, id: NodeId, key: &str, value: impl Into<String>) -> PropertyOutcome {
        let outcome = self.node_mut(id).style.set_key(key, value);
        if outcome == PropertyOutcome::Ignored {
            self.diagnostics.warn(
                WarningCategory::UnknownProperty,
                format!("unknown style property '{}' on {}, ignored", key, self.describe(id)),
            );
        }
        outcome
    }

    /// Set an event handler by key, warning on unknown keys
    pub fn set_event(&mut self, id: NodeId, key: &str, value: impl Into<String>) -> PropertyOutcome {
        let outcome = self.node_mut(id).events.set_key(key, value);
        if outcome == PropertyOutcome::Ignored {
            self.diagnostics.warn(
                WarningCategory::UnknownProperty,
                format!("unknown event property '{}' on {}, ignored", key, self.describe(id)),
            );
        }
        outcome
    }

    /// Whether any arrow needs the arrowhead marker definition
    pub fn contains_arrows(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node.kind, NodeKind::Shape(Shape::Arrow(_))))
    }

    pub fn warnings(&self) -> &[Warning] {
        self.diagnostics.warnings()
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// End-of-build checks.
    ///
    /// Warns about `use` targets that name no element, then, in strict
    /// mode, turns any recorded warning into an error.
    pub fn finish(&mut self, strict: bool) -> Result<(), SceneError> {
        let unresolved: Vec<(NodeId, String)> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match &node.kind {
                NodeKind::Shape(Shape::Use(reference))
                    if !self.registry.contains(&reference.target) =>
                {
                    Some((NodeId(index), reference.target.clone()))
                }
                _ => None,
            })
            .collect();
        for (id, target) in unresolved {
            let message = format!("{} refers to unknown id '{}'", self.describe(id), target);
            self.diagnostics
                .warn(WarningCategory::UnresolvedReference, message);
        }

        if strict {
            if let Some(err) = self.diagnostics.denied() {
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::point::Point;
    use glam::DVec3;

    const EPSILON: f64 = 1e-9;

    fn apply(m: DMat3, x: f64, y: f64) -> (f64, f64) {
        let v = m * DVec3::new(x, y, 1.0);
        (v.x, v.y)
    }

    #[test]
    fn test_new_scene_has_only_root() {
        let scene = Scene::new(200.0, 100.0);
        assert!(scene.is_empty());
        assert_eq!(scene.node(scene.root()).kind, NodeKind::Document);
        assert_eq!(scene.parent(scene.root()), None);
        assert_eq!(scene.global_transform(scene.root()), DMat3::IDENTITY);
    }

    #[test]
    fn test_root_rejects_transforms() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let err = scene
            .push_transform(root, Transform::translate(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidArguments { .. }));
    }

    #[test]
    fn test_children_keep_creation_order() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let a = scene.insert_group(root).unwrap();
        let b = scene.insert(root, NodeKind::Defs).unwrap();
        let c = scene.insert_group(a).unwrap();
        assert_eq!(scene.children(root), &[a, b]);
        assert_eq!(scene.children(a), &[c]);
        assert_eq!(scene.ancestry(c), vec![root, a, c]);
    }

    #[test]
    fn test_leaf_cannot_have_children() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let circle = scene
            .insert_shape(root, ShapeKind::Circle, vec![5.0.into()])
            .unwrap();
        let err = scene.insert_group(circle).unwrap_err();
        assert!(matches!(err, SceneError::NotAContainer { .. }));
    }

    #[test]
    fn test_global_transform_root_leftmost() {
        let mut scene = Scene::new(100.0, 100.0);
        let root = scene.root();
        let outer = scene.insert_group(root).unwrap();
        let inner = scene.insert_group(outer).unwrap();
        scene
            .push_transform(outer, Transform::uniform_scale(2.0))
            .unwrap();
        scene
            .push_transform(inner, Transform::translate(5.0, 0.0))
            .unwrap();

        // scale(2) · translate(5): (1, 1) → (6, 1) → (12, 2)
        let (x, y) = apply(scene.global_transform(inner), 1.0, 1.0);
        assert!((x - 12.0).abs() < EPSILON);
        assert!((y - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_duplicate_name_keeps_first_and_warns() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let first = scene.insert_group(root).unwrap();
        let second = scene.insert_group(root).unwrap();
        scene.set_name(first, "box");
        scene.set_name(second, "box");

        assert_eq!(scene.resolve("box"), Some(first));
        assert_eq!(scene.warnings().len(), 1);
        assert_eq!(
            scene.warnings()[0].category,
            WarningCategory::DuplicateIdentifier
        );
    }

    #[test]
    fn test_unknown_style_key_warns() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let group = scene.insert_group(root).unwrap();
        assert_eq!(scene.set_style(group, "fill", "red"), PropertyOutcome::Applied);
        assert_eq!(scene.set_style(group, "glow", "1"), PropertyOutcome::Ignored);
        assert_eq!(scene.warnings().len(), 1);
        assert_eq!(
            scene.warnings()[0].category,
            WarningCategory::UnknownProperty
        );
    }

    #[test]
    fn test_arrow_gets_marker() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        assert!(!scene.contains_arrows());
        let arrow = scene
            .insert_shape(
                root,
                ShapeKind::Arrow,
                vec![Point::at(root, 0.0, 0.0).into(), Point::at(root, 5.0, 5.0).into()],
            )
            .unwrap();
        assert!(scene.contains_arrows());
        assert_eq!(
            scene.node(arrow).style.get(StyleProperty::MarkerEnd),
            Some(ARROWHEAD_MARKER)
        );
    }

    #[test]
    fn test_finish_reports_unresolved_use() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        scene
            .insert_shape(root, ShapeKind::Use, vec!["missing".into()])
            .unwrap();
        scene.finish(false).unwrap();
        assert_eq!(
            scene.warnings()[0].category,
            WarningCategory::UnresolvedReference
        );
    }

    #[test]
    fn test_finish_strict_denies_warnings() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let group = scene.insert_group(root).unwrap();
        scene.set_style(group, "glow", "1");
        let err = scene.finish(true).unwrap_err();
        assert!(matches!(err, SceneError::WarningsDenied { count: 1, .. }));
    }

    #[test]
    fn test_finish_strict_passes_clean_scene() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let target = scene.insert(root, NodeKind::Defs).unwrap();
        scene.set_name(target, "defs");
        scene
            .insert_shape(root, ShapeKind::Use, vec!["defs".into()])
            .unwrap();
        assert!(scene.finish(true).is_ok());
    }
}
