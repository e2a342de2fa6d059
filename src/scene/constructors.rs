//! Constructor table: one positional-argument constructor per shape kind.
//!
//! | kind | arguments |
//! |---|---|
//! | rect | point, width, height, [rx, [ry]] |
//! | circle | [point], r |
//! | ellipse | [point], rx, ry |
//! | line, arrow | point, point |
//! | polyline, polygon | point+ |
//! | path | (text \| point)+ |
//! | text | text, point |
//! | image | point, width, height, href |
//! | use | target id, [point, [width, height]] |
//! | star, regular_polygon | n ≥ 3, center, r, [offset°] |
//! | balloon | start, goal, rx, [ry] |
//! | bezier | start, point+ |
//! | bent_line | start, goal, offset, spread |
//! | grid | distance, [scale] |
//!
//! A point may be passed as a [`Point`] or as two consecutive numbers.

use std::collections::VecDeque;

use super::diagnostics::{Diagnostics, WarningCategory};
use super::error::SceneError;
use super::point::Point;
use super::shapes::*;
use super::tree::{NodeId, Scene};

/// Most vertices a star or regular polygon may have
pub const MAX_VERTICES: usize = 10_000;

/// Most lines a grid may draw along either axis
pub const MAX_GRID_LINES: usize = 10_000;

/// One positional constructor argument
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeArg {
    Number(f64),
    Text(String),
    Point(Point),
}

impl From<f64> for ShapeArg {
    fn from(n: f64) -> Self {
        ShapeArg::Number(n)
    }
}

impl From<Point> for ShapeArg {
    fn from(p: Point) -> Self {
        ShapeArg::Point(p)
    }
}

impl From<&str> for ShapeArg {
    fn from(s: &str) -> Self {
        ShapeArg::Text(s.to_string())
    }
}

impl From<String> for ShapeArg {
    fn from(s: String) -> Self {
        ShapeArg::Text(s)
    }
}

type Constructor = fn(&mut Args<'_>) -> Result<Shape, SceneError>;

static CONSTRUCTORS: [(ShapeKind, Constructor); 17] = [
    (ShapeKind::Rect, rect as Constructor),
    (ShapeKind::Circle, circle as Constructor),
    (ShapeKind::Ellipse, ellipse as Constructor),
    (ShapeKind::Line, line as Constructor),
    (ShapeKind::Arrow, arrow as Constructor),
    (ShapeKind::Polyline, polyline as Constructor),
    (ShapeKind::Polygon, polygon as Constructor),
    (ShapeKind::Path, path as Constructor),
    (ShapeKind::Text, text as Constructor),
    (ShapeKind::Image, image as Constructor),
    (ShapeKind::Use, use_ref as Constructor),
    (ShapeKind::Star, star as Constructor),
    (ShapeKind::RegularPolygon, regular_polygon as Constructor),
    (ShapeKind::Balloon, balloon as Constructor),
    (ShapeKind::Bezier, bezier as Constructor),
    (ShapeKind::BentLine, bent_line as Constructor),
    (ShapeKind::Grid, grid as Constructor),
];

/// Build the geometry of a `kind` shape created under `parent`
pub fn construct(
    scene: &Scene,
    parent: NodeId,
    kind: ShapeKind,
    args: Vec<ShapeArg>,
    diagnostics: &mut Diagnostics,
) -> Result<Shape, SceneError> {
    let constructor = CONSTRUCTORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, c)| *c)
        .ok_or_else(|| SceneError::invalid_arguments(kind.keyword(), "no constructor"))?;

    let mut args = Args {
        kind,
        args: args.into(),
        scene,
        frame: parent,
        diagnostics,
    };
    let shape = constructor(&mut args)?;
    args.finish()?;
    Ok(shape)
}

/// Cursor over the remaining arguments of one constructor call
pub struct Args<'a> {
    kind: ShapeKind,
    args: VecDeque<ShapeArg>,
    scene: &'a Scene,
    frame: NodeId,
    diagnostics: &'a mut Diagnostics,
}

impl Args<'_> {
    fn error(&self, reason: impl Into<String>) -> SceneError {
        SceneError::invalid_arguments(self.kind.keyword(), reason)
    }

    fn remaining(&self) -> usize {
        self.args.len()
    }

    fn next_is_point(&self) -> bool {
        matches!(self.args.front(), Some(ShapeArg::Point(_)))
    }

    fn next_is_text(&self) -> bool {
        matches!(self.args.front(), Some(ShapeArg::Text(_)))
    }

    fn take_number(&mut self, what: &str) -> Result<f64, SceneError> {
        match self.args.pop_front() {
            Some(ShapeArg::Number(n)) => Ok(n),
            Some(other) => Err(self.error(format!("expected {}, found {}", what, describe(&other)))),
            None => Err(self.error(format!("missing {}", what))),
        }
    }

    fn take_optional_number(&mut self) -> Option<f64> {
        match self.args.front() {
            Some(ShapeArg::Number(n)) => {
                let n = *n;
                self.args.pop_front();
                Some(n)
            }
            _ => None,
        }
    }

    fn take_text(&mut self, what: &str) -> Result<String, SceneError> {
        match self.args.pop_front() {
            Some(ShapeArg::Text(s)) => Ok(s),
            Some(other) => Err(self.error(format!("expected {}, found {}", what, describe(&other)))),
            None => Err(self.error(format!("missing {}", what))),
        }
    }

    /// A point localized into the new node's frame, or two numbers
    fn take_point(&mut self, what: &str) -> Result<[f64; 2], SceneError> {
        match self.args.front() {
            Some(ShapeArg::Point(p)) => {
                let local = p.localize(self.scene, Some(self.frame))?;
                self.args.pop_front();
                Ok(local.to_array())
            }
            Some(ShapeArg::Number(_)) => {
                let x = self.take_number(what)?;
                let y = self.take_number(&format!("y coordinate of {}", what))?;
                Ok([x, y])
            }
            Some(other) => Err(self.error(format!("expected {}, found {}", what, describe(other)))),
            None => Err(self.error(format!("missing {}", what))),
        }
    }

    fn take_points(&mut self, what: &str, min: usize) -> Result<Vec<[f64; 2]>, SceneError> {
        let mut points = Vec::new();
        while self.remaining() > 0 {
            points.push(self.take_point(what)?);
        }
        if points.len() < min {
            return Err(self.error(format!("expected at least {} {}(s)", min, what)));
        }
        Ok(points)
    }

    fn take_count(&mut self, what: &str, min: usize, max: usize) -> Result<usize, SceneError> {
        let n = self.take_number(what)?;
        if n.fract() != 0.0 || n < min as f64 {
            return Err(self.error(format!("{} must be an integer of at least {}, got {}", what, min, n)));
        }
        if n > max as f64 {
            return Err(self.error(format!("{} must be at most {}, got {}", what, max, n)));
        }
        Ok(n as usize)
    }

    /// Normalize a negative extent, with a warning
    fn regularize(&mut self, start: f64, length: f64, what: &str) -> (f64, f64) {
        if length < 0.0 {
            self.diagnostics.warn(
                WarningCategory::NegativeExtent,
                format!("negative {} {} on {}, normalized", what, length, self.kind),
            );
        }
        regularize_interval(start, length)
    }

    fn finish(&self) -> Result<(), SceneError> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(self.error(format!("{} unexpected extra argument(s)", self.args.len())))
        }
    }
}

fn describe(arg: &ShapeArg) -> String {
    match arg {
        ShapeArg::Number(n) => format!("number {}", n),
        ShapeArg::Text(s) => format!("text \"{}\"", s),
        ShapeArg::Point(p) => format!("point ({}, {})", p.x, p.y),
    }
}

fn rect(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let [x, y] = args.take_point("corner")?;
    let width = args.take_number("width")?;
    let height = args.take_number("height")?;
    let rx = args.take_optional_number().map(f64::abs);
    let ry = args.take_optional_number().map(f64::abs).or(rx);
    let (x, width) = args.regularize(x, width, "width");
    let (y, height) = args.regularize(y, height, "height");
    Ok(Shape::Rect(Rect {
        x,
        y,
        width,
        height,
        rx,
        ry,
    }))
}

fn circle(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let [cx, cy] = if args.next_is_point() || args.remaining() >= 3 {
        args.take_point("center")?
    } else {
        [0.0, 0.0]
    };
    let r = args.take_number("radius")?;
    Ok(Shape::Circle(Circle { cx, cy, r }))
}

fn ellipse(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let [cx, cy] = if args.next_is_point() || args.remaining() >= 4 {
        args.take_point("center")?
    } else {
        [0.0, 0.0]
    };
    let rx = args.take_number("x radius")?;
    let ry = args.take_number("y radius")?;
    Ok(Shape::Ellipse(Ellipse { cx, cy, rx, ry }))
}

fn segment(args: &mut Args<'_>) -> Result<Line, SceneError> {
    let [x1, y1] = args.take_point("start")?;
    let [x2, y2] = args.take_point("goal")?;
    Ok(Line { x1, y1, x2, y2 })
}

fn line(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    segment(args).map(Shape::Line)
}

fn arrow(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    segment(args).map(Shape::Arrow)
}

fn polyline(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    args.take_points("point", 1).map(Shape::Polyline)
}

fn polygon(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    args.take_points("point", 1).map(Shape::Polygon)
}

fn path(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let mut data = Vec::new();
    while args.remaining() > 0 {
        if args.next_is_text() {
            data.push(args.take_text("path command")?);
        } else {
            let [x, y] = args.take_point("path point")?;
            data.push(format!("{} {}", x, y));
        }
    }
    if data.is_empty() {
        return Err(args.error("path data is empty"));
    }
    Ok(Shape::Path(data.join(" ")))
}

fn text(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let content = args.take_text("text content")?;
    let [x, y] = args.take_point("position")?;
    Ok(Shape::Text(Text { content, x, y }))
}

fn image(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let [x, y] = args.take_point("corner")?;
    let width = args.take_number("width")?;
    let height = args.take_number("height")?;
    let href = args.take_text("image href")?;
    let (x, width) = args.regularize(x, width, "width");
    let (y, height) = args.regularize(y, height, "height");
    Ok(Shape::Image(Image {
        x,
        y,
        width,
        height,
        href,
    }))
}

fn use_ref(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let target = args.take_text("target id")?;
    let (x, y) = if args.remaining() > 0 {
        let [x, y] = args.take_point("position")?;
        (Some(x), Some(y))
    } else {
        (None, None)
    };
    let width = args.take_optional_number();
    let height = match width {
        Some(_) => Some(args.take_number("height")?),
        None => None,
    };
    Ok(Shape::Use(Use {
        target,
        x,
        y,
        width,
        height,
    }))
}

fn polygonal_args(args: &mut Args<'_>) -> Result<(usize, [f64; 2], f64, f64), SceneError> {
    let n = args.take_count("vertex count", 3, MAX_VERTICES)?;
    let center = args.take_point("center")?;
    let r = args.take_number("radius")?;
    let offset = args.take_optional_number().unwrap_or(0.0);
    Ok((n, center, r, offset))
}

fn star(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let (n, center, r, offset) = polygonal_args(args)?;
    Ok(Shape::Star(Polygonal::star(n, center, r, offset)))
}

fn regular_polygon(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let (n, center, r, offset) = polygonal_args(args)?;
    Ok(Shape::RegularPolygon(Polygonal::regular(n, center, r, offset)))
}

fn balloon(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let start = args.take_point("start")?;
    let goal = args.take_point("goal")?;
    let rx = args.take_number("x radius")?;
    let ry = args.take_optional_number();
    Ok(Shape::Balloon(Balloon::new(start, goal, rx, ry)))
}

fn bezier(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let start = args.take_point("start")?;
    let points = args.take_points("control point", 1)?;
    Ok(Shape::Bezier(Bezier { start, points }))
}

fn bent_line(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let start = args.take_point("start")?;
    let goal = args.take_point("goal")?;
    let offset = args.take_number("offset")?;
    let spread = args.take_number("spread")?;
    BentLine::new(start, goal, offset, spread).map(Shape::BentLine)
}

fn grid(args: &mut Args<'_>) -> Result<Shape, SceneError> {
    let distance = args.take_number("distance")?;
    if distance <= 0.0 || !distance.is_finite() {
        return Err(args.error(format!("distance must be positive, got {}", distance)));
    }
    let extent = args.scene.width().max(args.scene.height());
    if extent / distance > MAX_GRID_LINES as f64 {
        return Err(args.error(format!(
            "distance {} draws more than {} lines across {}",
            distance, MAX_GRID_LINES, extent
        )));
    }
    let scale = args.take_optional_number().unwrap_or(1.0);
    Ok(Shape::Grid(Grid { distance, scale }))
}
