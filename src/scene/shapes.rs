//! Geometry of the primitive shape kinds
//!
//! Every shape stores its coordinates in its own frame, already localized
//! when the node was created. Derived geometry (star vertices, balloon
//! tips, bent-line control points) is computed once at construction.

use std::f64::consts::PI;
use std::fmt;

use super::error::SceneError;
use super::point::Point;

/// Keys of the constructor table, one per primitive shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Arrow,
    Polyline,
    Polygon,
    Path,
    Text,
    Image,
    Use,
    Star,
    RegularPolygon,
    Balloon,
    Bezier,
    BentLine,
    Grid,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 17] = [
        ShapeKind::Rect,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Polyline,
        ShapeKind::Polygon,
        ShapeKind::Path,
        ShapeKind::Text,
        ShapeKind::Image,
        ShapeKind::Use,
        ShapeKind::Star,
        ShapeKind::RegularPolygon,
        ShapeKind::Balloon,
        ShapeKind::Bezier,
        ShapeKind::BentLine,
        ShapeKind::Grid,
    ];

    /// Script keyword for this kind
    pub fn keyword(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Path => "path",
            ShapeKind::Text => "text",
            ShapeKind::Image => "image",
            ShapeKind::Use => "use",
            ShapeKind::Star => "star",
            ShapeKind::RegularPolygon => "regular_polygon",
            ShapeKind::Balloon => "balloon",
            ShapeKind::Bezier => "bezier",
            ShapeKind::BentLine => "bent_line",
            ShapeKind::Grid => "grid",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

/// Straight segment, shared by lines and arrows
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub href: String,
}

/// Reference to another element by id
#[derive(Debug, Clone, PartialEq)]
pub struct Use {
    pub target: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Stars and regular polygons
#[derive(Debug, Clone, PartialEq)]
pub struct Polygonal {
    pub n: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    /// Rotation offset in degrees
    pub offset: f64,
    pub points: Vec<[f64; 2]>,
}

/// Speech balloon: an elliptic arc whose two ends meet at a tip
#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub start: [f64; 2],
    pub tip_in: [f64; 2],
    pub tip_out: [f64; 2],
    pub rx: f64,
    pub ry: f64,
}

/// Cubic Bézier path through a start point and a list of control/end points
#[derive(Debug, Clone, PartialEq)]
pub struct Bezier {
    pub start: [f64; 2],
    pub points: Vec<[f64; 2]>,
}

/// Cubic curve bent sideways from the straight start-goal segment
#[derive(Debug, Clone, PartialEq)]
pub struct BentLine {
    pub start: [f64; 2],
    pub goal: [f64; 2],
    pub control1: [f64; 2],
    pub control2: [f64; 2],
}

/// Reference grid across the whole document
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub distance: f64,
    pub scale: f64,
}

/// Kind-specific geometry of a leaf node
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Arrow(Line),
    Polyline(Vec<[f64; 2]>),
    Polygon(Vec<[f64; 2]>),
    /// Path data, already joined
    Path(String),
    Text(Text),
    Image(Image),
    Use(Use),
    Star(Polygonal),
    RegularPolygon(Polygonal),
    Balloon(Balloon),
    Bezier(Bezier),
    BentLine(BentLine),
    Grid(Grid),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Path(_) => ShapeKind::Path,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Image(_) => ShapeKind::Image,
            Shape::Use(_) => ShapeKind::Use,
            Shape::Star(_) => ShapeKind::Star,
            Shape::RegularPolygon(_) => ShapeKind::RegularPolygon,
            Shape::Balloon(_) => ShapeKind::Balloon,
            Shape::Bezier(_) => ShapeKind::Bezier,
            Shape::BentLine(_) => ShapeKind::BentLine,
            Shape::Grid(_) => ShapeKind::Grid,
        }
    }
}

/// Normalize an interval with a negative length.
///
/// `(10, -4)` becomes `(6, 4)`. The caller reports the negative extent.
pub fn regularize_interval(start: f64, length: f64) -> (f64, f64) {
    if length < 0.0 {
        (start + length, -length)
    } else {
        (start, length)
    }
}

impl Polygonal {
    /// Star with `n` outer vertices interleaved with `n` inner ones
    pub fn star(n: usize, center: [f64; 2], r: f64, offset: f64) -> Self {
        let (outer, inner) = star_vertices(n, center, r, offset);
        let points = outer
            .into_iter()
            .zip(inner)
            .flat_map(|(o, i)| [o, i])
            .collect();
        Self {
            n,
            cx: center[0],
            cy: center[1],
            r,
            offset,
            points,
        }
    }

    /// Regular polygon: the outer vertices of the star of the same size
    pub fn regular(n: usize, center: [f64; 2], r: f64, offset: f64) -> Self {
        let (outer, _) = star_vertices(n, center, r, offset);
        Self {
            n,
            cx: center[0],
            cy: center[1],
            r,
            offset,
            points: outer,
        }
    }
}

fn star_vertices(
    n: usize,
    center: [f64; 2],
    r: f64,
    offset_degrees: f64,
) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
    let [cx, cy] = center;
    let angle = 2.0 * PI / n as f64;
    let offset = offset_degrees.to_radians();
    let inner_r = r * angle.cos() / (angle / 2.0).cos();

    let outer = (0..n)
        .map(|i| {
            let a = i as f64 * angle - offset;
            [cx + r * a.cos(), cy + r * a.sin()]
        })
        .collect();
    let inner = (0..n)
        .map(|i| {
            let a = i as f64 * angle + angle / 2.0 - offset;
            [cx + inner_r * a.cos(), cy + inner_r * a.sin()]
        })
        .collect();
    (outer, inner)
}

impl Balloon {
    /// `ry` defaults to three quarters of `rx`
    pub fn new(start: [f64; 2], goal: [f64; 2], rx: f64, ry: Option<f64>) -> Self {
        let ry = ry.unwrap_or(rx * 0.75);
        let d = (rx * rx + ry * ry).sqrt() / 10.0;
        let [xs, ys] = start;
        let [xg, yg] = goal;

        // the tip opens toward the start point
        let (yg1, yg2) = if xg > xs { (yg - d, yg + d) } else { (yg + d, yg - d) };
        let (xg1, xg2) = if yg < ys { (xg - d, xg + d) } else { (xg + d, xg - d) };

        Self {
            start,
            tip_in: [xg1, yg1],
            tip_out: [xg2, yg2],
            rx,
            ry,
        }
    }

    pub fn path_data(&self) -> String {
        format!(
            "M {} {} L {} {} A {} {} 0 1 1 {} {} Z",
            self.start[0],
            self.start[1],
            self.tip_in[0],
            self.tip_in[1],
            self.rx,
            self.ry,
            self.tip_out[0],
            self.tip_out[1]
        )
    }
}

impl Bezier {
    pub fn path_data(&self) -> String {
        let points = self
            .points
            .iter()
            .map(|[x, y]| format!("{} {}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        format!("M {} {} C {}", self.start[0], self.start[1], points)
    }
}

impl BentLine {
    /// Control points sit `spread` apart on a parallel to the start-goal
    /// segment, shifted sideways by `offset` from its midpoint.
    pub fn new(start: [f64; 2], goal: [f64; 2], offset: f64, spread: f64) -> Result<Self, SceneError> {
        let s = Point::vector(start[0], start[1]);
        let g = Point::vector(goal[0], goal[1]);
        let norm = s.normalize(&g)?;
        let mid = s.midpoint(&g);
        let side = norm.rotate(90.0) * offset;
        let bend = [mid.x + side.x, mid.y + side.y];
        let along = norm * spread;

        Ok(Self {
            start,
            goal,
            control1: [bend[0] - along.x, bend[1] - along.y],
            control2: [bend[0] + along.x, bend[1] + along.y],
        })
    }

    pub fn path_data(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start[0],
            self.start[1],
            self.control1[0],
            self.control1[1],
            self.control2[0],
            self.control2[1],
            self.goal[0],
            self.goal[1]
        )
    }
}
