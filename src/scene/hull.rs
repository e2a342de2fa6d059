//! Hull points, bounding boxes and attachment points.
//!
//! A node's hull is a finite set of points in its own frame whose extent
//! approximates the node's geometry. Circles and ellipses use a six-point
//! approximation, so their boxes are slightly larger than the exact ones.

use super::error::SceneError;
use super::point::Point;
use super::shapes::Shape;
use super::tree::{NodeId, NodeKind, Scene};
use crate::parser::ast::Span;

/// Axis-aligned box, `[x, y, width, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, `None` for no points
    pub fn enclosing(points: impl IntoIterator<Item = [f64; 2]>) -> Option<Self> {
        let mut points = points.into_iter();
        let [x0, y0] = points.next()?;
        let (min_x, min_y, max_x, max_y) = points.fold(
            (x0, y0, x0, y0),
            |(min_x, min_y, max_x, max_y), [x, y]| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        );
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

const RECT_ANCHORS: &[&str] = &["tl", "tr", "tc", "bl", "br", "bc", "ml", "mr", "mc"];
const SEGMENT_ANCHORS: &[&str] = &["start", "goal"];
const CENTER_ANCHORS: &[&str] = &["mc"];

impl Scene {
    /// Hull points of a node, in the node's own frame
    pub fn hull_points(&self, id: NodeId) -> Result<Vec<Point>, SceneError> {
        let node = self.node(id);
        let raw: Vec<[f64; 2]> = match &node.kind {
            NodeKind::Defs => Vec::new(),
            NodeKind::Document | NodeKind::Group | NodeKind::Link { .. } | NodeKind::LabeledCircle => {
                let mut points = Vec::new();
                for &child in &node.children {
                    let ctm = self.ctm(child);
                    for p in self.hull_points(child)? {
                        let v = ctm * p.to_matrix_column();
                        points.push([v.x / v.z, v.y / v.z]);
                    }
                }
                points
            }
            NodeKind::Shape(shape) => shape_hull(shape),
        };
        Ok(raw.into_iter().map(|[x, y]| Point::at(id, x, y)).collect())
    }

    /// Bounding box of a node in its parent's frame.
    ///
    /// Hull points are mapped through the node's own transforms, so a
    /// translated or scaled node reports where it is drawn.
    pub fn bounding_box(&self, id: NodeId) -> Result<BoundingBox, SceneError> {
        let ctm = self.ctm(id);
        let points = self.hull_points(id)?.into_iter().map(|p| {
            let v = ctm * p.to_matrix_column();
            [v.x / v.z, v.y / v.z]
        });
        BoundingBox::enclosing(points).ok_or_else(|| self.empty_hull(id))
    }

    /// Bounding box of a node's hull localized into `frame`
    /// (`None` for the document frame)
    pub fn bounding_box_in(&self, id: NodeId, frame: Option<NodeId>) -> Result<BoundingBox, SceneError> {
        let points = self
            .hull_points(id)?
            .into_iter()
            .map(|p| p.localize(self, frame).map(|l| l.to_array()))
            .collect::<Result<Vec<_>, _>>()?;
        BoundingBox::enclosing(points).ok_or_else(|| self.empty_hull(id))
    }

    fn empty_hull(&self, id: NodeId) -> SceneError {
        SceneError::EmptyHull {
            kind: format!("{} '{}'", self.node(id).kind, self.describe(id)),
        }
    }

    /// Names of the attachment points a node offers
    pub fn anchor_names(&self, id: NodeId) -> &'static [&'static str] {
        match &self.node(id).kind {
            NodeKind::LabeledCircle => RECT_ANCHORS,
            NodeKind::Shape(shape) => match shape {
                Shape::Rect(_) | Shape::Image(_) | Shape::Circle(_) | Shape::Ellipse(_) => {
                    RECT_ANCHORS
                }
                Shape::Line(_) | Shape::Arrow(_) | Shape::BentLine(_) => SEGMENT_ANCHORS,
                Shape::Star(_) | Shape::RegularPolygon(_) => CENTER_ANCHORS,
                _ => &[],
            },
            _ => &[],
        }
    }

    /// Attachment point `name` of node `id`, in the node's own frame
    pub fn anchor(&self, id: NodeId, name: &str) -> Result<Point, SceneError> {
        self.anchor_at(id, name, 0..0)
    }

    /// Like [`Scene::anchor`], reporting `span` on failure
    pub fn anchor_at(&self, id: NodeId, name: &str, span: Span) -> Result<Point, SceneError> {
        let node = self.node(id);
        let found = match &node.kind {
            NodeKind::LabeledCircle => match node.children.first() {
                Some(&circle) if self.anchor_names(circle).contains(&name) => {
                    let p = self.anchor_at(circle, name, span.clone())?;
                    // the circle's frame includes its own transforms
                    let ctm = self.ctm(circle);
                    let v = ctm * p.to_matrix_column();
                    Some([v.x / v.z, v.y / v.z])
                }
                _ => None,
            },
            NodeKind::Shape(shape) => shape_anchor(shape, name),
            _ => None,
        };
        match found {
            Some([x, y]) => Ok(Point::at(id, x, y)),
            None => Err(SceneError::invalid_anchor(
                self.describe(id),
                name,
                self.anchor_names(id),
                span,
            )),
        }
    }
}

fn shape_hull(shape: &Shape) -> Vec<[f64; 2]> {
    match shape {
        Shape::Rect(r) => vec![
            [r.x, r.y],
            [r.x + r.width, r.y],
            [r.x, r.y + r.height],
            [r.x + r.width, r.y + r.height],
        ],
        Shape::Circle(c) => round_hull(c.cx, c.cy, c.r, 1.0),
        Shape::Ellipse(e) => round_hull(e.cx, e.cy, e.rx, e.ry / e.rx),
        Shape::Line(l) | Shape::Arrow(l) => vec![[l.x1, l.y1], [l.x2, l.y2]],
        Shape::Polyline(points) | Shape::Polygon(points) => points.clone(),
        Shape::Star(p) | Shape::RegularPolygon(p) => p.points.clone(),
        Shape::BentLine(b) => vec![b.start, b.goal, b.control1, b.control2],
        Shape::Path(_)
        | Shape::Text(_)
        | Shape::Image(_)
        | Shape::Use(_)
        | Shape::Balloon(_)
        | Shape::Bezier(_)
        | Shape::Grid(_) => Vec::new(),
    }
}

/// Six-point hull of a circle of radius `r`, vertical offsets scaled by
/// `y_ratio` for ellipses: top and bottom at `2r/√3`, the four side
/// points at `r/√3` above and below the center.
fn round_hull(cx: f64, cy: f64, r: f64, y_ratio: f64) -> Vec<[f64; 2]> {
    let sqrt3 = 3f64.sqrt();
    let far = r * 2.0 * sqrt3 / 3.0 * y_ratio;
    let near = r * sqrt3 / 3.0 * y_ratio;
    let (left, right) = (cx - r.abs(), cx + r.abs());
    vec![
        [cx, cy - far],
        [cx, cy + far],
        [left, cy - near],
        [right, cy - near],
        [left, cy + near],
        [right, cy + near],
    ]
}

fn shape_anchor(shape: &Shape, name: &str) -> Option<[f64; 2]> {
    match shape {
        Shape::Rect(r) => box_anchor(r.x, r.y, r.width, r.height, name),
        Shape::Image(i) => box_anchor(i.x, i.y, i.width, i.height, name),
        Shape::Circle(c) => round_anchor(c.cx, c.cy, c.r, c.r, name),
        Shape::Ellipse(e) => round_anchor(e.cx, e.cy, e.rx, e.ry, name),
        Shape::Line(l) | Shape::Arrow(l) => match name {
            "start" => Some([l.x1, l.y1]),
            "goal" => Some([l.x2, l.y2]),
            _ => None,
        },
        Shape::BentLine(b) => match name {
            "start" => Some(b.start),
            "goal" => Some(b.goal),
            _ => None,
        },
        Shape::Star(p) | Shape::RegularPolygon(p) => (name == "mc").then_some([p.cx, p.cy]),
        _ => None,
    }
}

fn box_anchor(x: f64, y: f64, width: f64, height: f64, name: &str) -> Option<[f64; 2]> {
    let (l, r, cx) = (x, x + width, x + width / 2.0);
    let (t, b, cy) = (y, y + height, y + height / 2.0);
    let point = match name {
        "tl" => [l, t],
        "tr" => [r, t],
        "tc" => [cx, t],
        "bl" => [l, b],
        "br" => [r, b],
        "bc" => [cx, b],
        "ml" => [l, cy],
        "mr" => [r, cy],
        "mc" => [cx, cy],
        _ => return None,
    };
    Some(point)
}

/// Axis anchors on the curve, diagonal anchors at 45° on the x radius,
/// vertical offsets scaled by `ry/rx`
fn round_anchor(cx: f64, cy: f64, rx: f64, ry: f64, name: &str) -> Option<[f64; 2]> {
    let dx = rx * std::f64::consts::SQRT_2 / 2.0;
    let dy = dx * ry / rx;
    let (t, b) = (cy - ry.abs(), cy + ry.abs());
    let (l, r) = (cx - rx.abs(), cx + rx.abs());
    let point = match name {
        "tl" => [cx - dx, cy - dy],
        "tr" => [cx + dx, cy - dy],
        "tc" => [cx, t],
        "bl" => [cx - dx, cy + dy],
        "br" => [cx + dx, cy + dy],
        "bc" => [cx, b],
        "ml" => [l, cy],
        "mr" => [r, cy],
        "mc" => [cx, cy],
        _ => return None,
    };
    Some(point)
}
