//! Builder contexts for assembling a scene in code.
//!
//! Each context has one job:
//!
//! - [`Builder`] appends children to a container
//! - [`NodeBuilder`] configures the node just created: name, transforms,
//!   attributes, and its own children for containers
//! - [`StyleBuilder`] and [`EventBuilder`] fill a node's attribute tables
//!
//! ```
//! use svg_scene::scene::{Scene, SceneError};
//!
//! let mut scene = Scene::new(200.0, 100.0);
//! let mut b = scene.builder();
//! let corner = b.pt(10.0, 10.0);
//! let bx = b.rect(corner, 80.0, 40.0)?
//!     .id("box")
//!     .style(|s| {
//!         s.fill("#eee").stroke("black");
//!     })
//!     .node();
//! let start = b.scene().anchor(bx, "br")?;
//! let goal = b.pt(150.0, 90.0);
//! b.arrow(start, goal)?;
//! assert_eq!(scene.resolve("box"), Some(bx));
//! # Ok::<(), SceneError>(())
//! ```

use crate::attributes::{EventProperty, PropertyOutcome, StyleProperty};

use super::constructors::ShapeArg;
use super::error::SceneError;
use super::point::Point;
use super::shapes::{Shape, ShapeKind};
use super::transform::Transform;
use super::tree::{NodeId, NodeKind, Scene};

/// Appends children to one container node
pub struct Builder<'s> {
    scene: &'s mut Scene,
    parent: NodeId,
}

impl<'s> Builder<'s> {
    pub fn new(scene: &'s mut Scene, parent: NodeId) -> Self {
        Self { scene, parent }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// The container receiving the children
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// A point in the container's frame
    pub fn pt(&self, x: f64, y: f64) -> Point {
        Point::at(self.parent, x, y)
    }

    fn node(&mut self, id: NodeId) -> NodeBuilder<'_> {
        NodeBuilder {
            scene: &mut *self.scene,
            id,
        }
    }

    /// Create a shape through the constructor table
    pub fn shape(&mut self, kind: ShapeKind, args: Vec<ShapeArg>) -> Result<NodeBuilder<'_>, SceneError> {
        let id = self.scene.insert_shape(self.parent, kind, args)?;
        Ok(self.node(id))
    }

    pub fn rect(&mut self, corner: Point, width: f64, height: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Rect, vec![corner.into(), width.into(), height.into()])
    }

    pub fn circle(&mut self, center: Point, r: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Circle, vec![center.into(), r.into()])
    }

    pub fn ellipse(&mut self, center: Point, rx: f64, ry: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Ellipse, vec![center.into(), rx.into(), ry.into()])
    }

    pub fn line(&mut self, start: Point, goal: Point) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Line, vec![start.into(), goal.into()])
    }

    pub fn arrow(&mut self, start: Point, goal: Point) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Arrow, vec![start.into(), goal.into()])
    }

    pub fn polyline(&mut self, points: &[Point]) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Polyline, points.iter().map(|&p| p.into()).collect())
    }

    pub fn polygon(&mut self, points: &[Point]) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Polygon, points.iter().map(|&p| p.into()).collect())
    }

    /// Path from commands (text) and points
    pub fn path(&mut self, data: Vec<ShapeArg>) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Path, data)
    }

    pub fn text(&mut self, content: &str, position: Point) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Text, vec![content.into(), position.into()])
    }

    pub fn image(
        &mut self,
        corner: Point,
        width: f64,
        height: f64,
        href: &str,
    ) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(
            ShapeKind::Image,
            vec![corner.into(), width.into(), height.into(), href.into()],
        )
    }

    /// Reference to the element named `target`
    pub fn use_ref(&mut self, target: &str) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Use, vec![target.into()])
    }

    pub fn star(&mut self, n: usize, center: Point, r: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Star, vec![(n as f64).into(), center.into(), r.into()])
    }

    pub fn regular_polygon(&mut self, n: usize, center: Point, r: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(
            ShapeKind::RegularPolygon,
            vec![(n as f64).into(), center.into(), r.into()],
        )
    }

    pub fn balloon(&mut self, start: Point, goal: Point, rx: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Balloon, vec![start.into(), goal.into(), rx.into()])
    }

    pub fn bezier(&mut self, start: Point, points: &[Point]) -> Result<NodeBuilder<'_>, SceneError> {
        let args = std::iter::once(start)
            .chain(points.iter().copied())
            .map(ShapeArg::from)
            .collect();
        self.shape(ShapeKind::Bezier, args)
    }

    pub fn bent_line(
        &mut self,
        start: Point,
        goal: Point,
        offset: f64,
        spread: f64,
    ) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(
            ShapeKind::BentLine,
            vec![start.into(), goal.into(), offset.into(), spread.into()],
        )
    }

    pub fn grid(&mut self, distance: f64) -> Result<NodeBuilder<'_>, SceneError> {
        self.shape(ShapeKind::Grid, vec![distance.into()])
    }

    pub fn group(&mut self) -> Result<NodeBuilder<'_>, SceneError> {
        let id = self.scene.insert(self.parent, NodeKind::Group)?;
        Ok(self.node(id))
    }

    /// Hyperlink container
    pub fn link(&mut self, href: &str) -> Result<NodeBuilder<'_>, SceneError> {
        let id = self.scene.insert(
            self.parent,
            NodeKind::Link {
                href: href.to_string(),
            },
        )?;
        Ok(self.node(id))
    }

    pub fn defs(&mut self) -> Result<NodeBuilder<'_>, SceneError> {
        let id = self.scene.insert(self.parent, NodeKind::Defs)?;
        Ok(self.node(id))
    }

    /// A circle with a text label inside it.
    ///
    /// The label sits at `(cx - r/2, cy + r/2)` with a font size of
    /// `trunc(1.4 r)`. The group's anchors are the circle's.
    pub fn labeled_circle(&mut self, center: Point, r: f64, label: &str) -> Result<NodeBuilder<'_>, SceneError> {
        let group = self.scene.insert(self.parent, NodeKind::LabeledCircle)?;
        let [cx, cy] = center.localize(self.scene, Some(group))?.to_array();

        self.scene.insert_shape(
            group,
            ShapeKind::Circle,
            vec![Point::at(group, cx, cy).into(), r.into()],
        )?;
        let text = self.scene.insert_shape(
            group,
            ShapeKind::Text,
            vec![label.into(), Point::at(group, cx - r / 2.0, cy + r / 2.0).into()],
        )?;
        let style = &mut self.scene.node_mut(text).style;
        style.set(StyleProperty::FontSize, ((r * 1.4).trunc() as i64).to_string());
        style.set(StyleProperty::Fill, "black");
        style.set(StyleProperty::StrokeWidth, "0");

        Ok(self.node(group))
    }

    /// Text rotated by `angle` degrees around its own position
    pub fn rotated_text(&mut self, content: &str, position: Point, angle: f64) -> Result<NodeBuilder<'_>, SceneError> {
        let id = self
            .scene
            .insert_shape(self.parent, ShapeKind::Text, vec![content.into(), position.into()])?;
        if let NodeKind::Shape(Shape::Text(text)) = &self.scene.node(id).kind {
            let rotation = Transform::rotate_about(angle, text.x, text.y);
            self.scene.push_transform(id, rotation)?;
        }
        Ok(self.node(id))
    }

    /// A group of `count` references to `target`, the i-th one translated
    /// by `i · step`
    pub fn repeat(&mut self, target: &str, count: usize, step: (f64, f64)) -> Result<NodeBuilder<'_>, SceneError> {
        let group = self.scene.insert(self.parent, NodeKind::Group)?;
        for i in 0..count {
            let copy = self
                .scene
                .insert_shape(group, ShapeKind::Use, vec![target.into()])?;
            let offset = i as f64;
            self.scene
                .push_transform(copy, Transform::translate(step.0 * offset, step.1 * offset))?;
        }
        Ok(self.node(group))
    }
}

/// Configures one freshly created node
pub struct NodeBuilder<'b> {
    scene: &'b mut Scene,
    id: NodeId,
}

impl<'b> NodeBuilder<'b> {
    /// The node being configured
    pub fn node(&self) -> NodeId {
        self.id
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Name the node and register it
    pub fn id(mut self, name: &str) -> Self {
        self.scene.set_name(self.id, name);
        self
    }

    /// Append any transform
    pub fn transform(mut self, transform: Transform) -> Self {
        // builder nodes are never the root, so the push cannot be rejected
        self.scene.node_mut(self.id).transforms.push(transform);
        self
    }

    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.transform(Transform::translate(tx, ty))
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.transform(Transform::scale(sx, sy))
    }

    pub fn uniform_scale(self, s: f64) -> Self {
        self.transform(Transform::uniform_scale(s))
    }

    pub fn rotate(self, angle: f64) -> Self {
        self.transform(Transform::rotate(angle))
    }

    pub fn rotate_about(self, angle: f64, cx: f64, cy: f64) -> Self {
        self.transform(Transform::rotate_about(angle, cx, cy))
    }

    pub fn skew_x(self, angle: f64) -> Self {
        self.transform(Transform::skew_x(angle))
    }

    pub fn skew_y(self, angle: f64) -> Self {
        self.transform(Transform::skew_y(angle))
    }

    pub fn matrix(self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        self.transform(Transform::matrix(a, b, c, d, e, f))
    }

    /// Fill the node's style table
    pub fn style(mut self, f: impl FnOnce(&mut StyleBuilder<'_>)) -> Self {
        let mut style = StyleBuilder {
            scene: &mut *self.scene,
            id: self.id,
        };
        f(&mut style);
        self
    }

    /// Set a single style property by key
    pub fn set_style(mut self, key: &str, value: impl Into<String>) -> Self {
        self.scene.set_style(self.id, key, value);
        self
    }

    /// Fill the node's event table
    pub fn event(mut self, f: impl FnOnce(&mut EventBuilder<'_>)) -> Self {
        let mut events = EventBuilder {
            scene: &mut *self.scene,
            id: self.id,
        };
        f(&mut events);
        self
    }

    /// Build the children of a container node
    pub fn children(
        mut self,
        f: impl FnOnce(&mut Builder<'_>) -> Result<(), SceneError>,
    ) -> Result<Self, SceneError> {
        let kind = &self.scene.node(self.id).kind;
        if !kind.is_container() {
            return Err(SceneError::NotAContainer {
                kind: kind.to_string(),
            });
        }
        let mut builder = Builder::new(&mut *self.scene, self.id);
        f(&mut builder)?;
        Ok(self)
    }
}

/// Sets style properties on one node
pub struct StyleBuilder<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl StyleBuilder<'_> {
    /// Set a property by key; unknown keys are ignored with a warning
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> PropertyOutcome {
        self.scene.set_style(self.id, key, value)
    }

    pub fn property(&mut self, property: StyleProperty, value: impl Into<String>) -> &mut Self {
        self.scene.node_mut(self.id).style.set(property, value);
        self
    }

    pub fn fill(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::Fill, value)
    }

    pub fn stroke(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::Stroke, value)
    }

    pub fn stroke_width(&mut self, value: impl ToString) -> &mut Self {
        self.property(StyleProperty::StrokeWidth, value.to_string())
    }

    pub fn opacity(&mut self, value: impl ToString) -> &mut Self {
        self.property(StyleProperty::Opacity, value.to_string())
    }

    pub fn font_size(&mut self, value: impl ToString) -> &mut Self {
        self.property(StyleProperty::FontSize, value.to_string())
    }

    pub fn font_weight(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::FontWeight, value)
    }

    pub fn font_family(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::FontFamily, value)
    }

    pub fn marker_end(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::MarkerEnd, value)
    }

    pub fn text_anchor(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::TextAnchor, value)
    }

    pub fn class(&mut self, value: impl Into<String>) -> &mut Self {
        self.property(StyleProperty::Class, value)
    }
}

/// Sets event handlers on one node
pub struct EventBuilder<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl EventBuilder<'_> {
    /// Set a handler by key; unknown keys are ignored with a warning
    pub fn set(&mut self, key: &str, handler: impl Into<String>) -> PropertyOutcome {
        self.scene.set_event(self.id, key, handler)
    }

    pub fn property(&mut self, property: EventProperty, handler: impl Into<String>) -> &mut Self {
        self.scene.node_mut(self.id).events.set(property, handler);
        self
    }

    pub fn onclick(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnClick, handler)
    }

    pub fn onmousedown(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnMouseDown, handler)
    }

    pub fn onmouseup(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnMouseUp, handler)
    }

    pub fn onmouseover(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnMouseOver, handler)
    }

    pub fn onmouseout(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnMouseOut, handler)
    }

    pub fn onload(&mut self, handler: impl Into<String>) -> &mut Self {
        self.property(EventProperty::OnLoad, handler)
    }
}

impl Scene {
    /// Builder appending to the document root
    pub fn builder(&mut self) -> Builder<'_> {
        let root = self.root();
        Builder::new(self, root)
    }

    /// Create a document and fill it in one go
    pub fn build(
        width: f64,
        height: f64,
        f: impl FnOnce(&mut Builder<'_>) -> Result<(), SceneError>,
    ) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(width, height);
        f(&mut scene.builder())?;
        Ok(scene)
    }
}
