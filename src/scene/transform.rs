//! Affine transforms and per-node transform stacks.
//!
//! Every transform is represented as a 3×3 homogeneous matrix acting on
//! column vectors `[x, y, 1]ᵗ`. A node's stack composes left to right,
//! `T1 · T2 · … · Tn`, so the first appended transform is the one applied
//! closest to the point. This is the SVG `transform="t1 t2 …"` convention.
//!
//! ## Rotation Convention
//!
//! Angles are in degrees and follow SVG: with the Y axis pointing down,
//! positive angles rotate clockwise on screen.

use std::cell::Cell;
use std::fmt;

use glam::{DMat3, DVec3};

use super::error::SceneError;

/// The transform functions of the SVG `transform` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Translate,
    Scale,
    Rotate,
    SkewX,
    SkewY,
    Matrix,
}

impl TransformKind {
    /// Name of the function as written in markup
    pub fn markup_name(self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::Scale => "scale",
            TransformKind::Rotate => "rotate",
            TransformKind::SkewX => "skewX",
            TransformKind::SkewY => "skewY",
            TransformKind::Matrix => "matrix",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.markup_name())
    }
}

/// One affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { tx: f64, ty: Option<f64> },
    Scale { sx: f64, sy: Option<f64> },
    /// Rotation in degrees around `(cx, cy)`
    Rotate { angle: f64, cx: f64, cy: f64 },
    SkewX { angle: f64 },
    SkewY { angle: f64 },
    /// Raw SVG matrix `(a b c d e f)`
    Matrix {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
}

impl Transform {
    pub fn translate(tx: f64, ty: f64) -> Self {
        Transform::Translate { tx, ty: Some(ty) }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Transform::Scale { sx, sy: Some(sy) }
    }

    pub fn uniform_scale(s: f64) -> Self {
        Transform::Scale { sx: s, sy: None }
    }

    /// Rotation around the origin
    pub fn rotate(angle: f64) -> Self {
        Transform::Rotate {
            angle,
            cx: 0.0,
            cy: 0.0,
        }
    }

    /// Rotation around an arbitrary center
    pub fn rotate_about(angle: f64, cx: f64, cy: f64) -> Self {
        Transform::Rotate { angle, cx, cy }
    }

    pub fn skew_x(angle: f64) -> Self {
        Transform::SkewX { angle }
    }

    pub fn skew_y(angle: f64) -> Self {
        Transform::SkewY { angle }
    }

    pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform::Matrix { a, b, c, d, e, f }
    }

    /// Build a transform from a positional argument list.
    ///
    /// Accepted counts: translate 1–2, scale 1–2, rotate 1 or 3,
    /// skewX/skewY 1, matrix 6.
    pub fn from_args(kind: TransformKind, args: &[f64]) -> Result<Self, SceneError> {
        let transform = match (kind, args) {
            (TransformKind::Translate, [tx]) => Transform::Translate { tx: *tx, ty: None },
            (TransformKind::Translate, [tx, ty]) => Transform::translate(*tx, *ty),
            (TransformKind::Scale, [s]) => Transform::uniform_scale(*s),
            (TransformKind::Scale, [sx, sy]) => Transform::scale(*sx, *sy),
            (TransformKind::Rotate, [angle]) => Transform::rotate(*angle),
            (TransformKind::Rotate, [angle, cx, cy]) => Transform::rotate_about(*angle, *cx, *cy),
            (TransformKind::SkewX, [angle]) => Transform::skew_x(*angle),
            (TransformKind::SkewY, [angle]) => Transform::skew_y(*angle),
            (TransformKind::Matrix, [a, b, c, d, e, f]) => {
                Transform::matrix(*a, *b, *c, *d, *e, *f)
            }
            _ => {
                let expected = match kind {
                    TransformKind::Translate | TransformKind::Scale => "1 or 2",
                    TransformKind::Rotate => "1 or 3",
                    TransformKind::SkewX | TransformKind::SkewY => "1",
                    TransformKind::Matrix => "6",
                };
                return Err(SceneError::invalid_arguments(
                    kind.markup_name(),
                    format!("expected {} arguments, got {}", expected, args.len()),
                ));
            }
        };
        Ok(transform)
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Translate { .. } => TransformKind::Translate,
            Transform::Scale { .. } => TransformKind::Scale,
            Transform::Rotate { .. } => TransformKind::Rotate,
            Transform::SkewX { .. } => TransformKind::SkewX,
            Transform::SkewY { .. } => TransformKind::SkewY,
            Transform::Matrix { .. } => TransformKind::Matrix,
        }
    }

    /// Homogeneous 3×3 matrix of this transform
    pub fn to_matrix(&self) -> DMat3 {
        match *self {
            Transform::Translate { tx, ty } => svg_matrix(1.0, 0.0, 0.0, 1.0, tx, ty.unwrap_or(0.0)),
            Transform::Scale { sx, sy } => svg_matrix(sx, 0.0, 0.0, sy.unwrap_or(sx), 0.0, 0.0),
            Transform::Rotate { angle, cx, cy } => {
                // translate(cx, cy) · rotate(θ) · translate(-cx, -cy)
                let radians = angle.to_radians();
                let (sin_a, cos_a) = radians.sin_cos();
                svg_matrix(
                    cos_a,
                    sin_a,
                    -sin_a,
                    cos_a,
                    -cos_a * cx + sin_a * cy + cx,
                    -sin_a * cx - cos_a * cy + cy,
                )
            }
            Transform::SkewX { angle } => svg_matrix(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0),
            Transform::SkewY { angle } => svg_matrix(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
            Transform::Matrix { a, b, c, d, e, f } => svg_matrix(a, b, c, d, e, f),
        }
    }

    /// Canonical transform-function text, without redundant parameters
    pub fn to_markup(&self) -> String {
        match *self {
            Transform::Translate { tx, ty: Some(ty) } if ty != 0.0 => {
                format!("translate({} {})", tx, ty)
            }
            Transform::Translate { tx, .. } => format!("translate({})", tx),
            Transform::Scale { sx, sy: Some(sy) } if sy != sx => format!("scale({} {})", sx, sy),
            Transform::Scale { sx, .. } => format!("scale({})", sx),
            Transform::Rotate { angle, cx, cy } if cx == 0.0 && cy == 0.0 => {
                format!("rotate({})", angle)
            }
            Transform::Rotate { angle, cx, cy } => format!("rotate({} {} {})", angle, cx, cy),
            Transform::SkewX { angle } => format!("skewX({})", angle),
            Transform::SkewY { angle } => format!("skewY({})", angle),
            Transform::Matrix { a, b, c, d, e, f } => {
                format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
            }
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

/// Matrix for the SVG coefficients `(a b c d e f)`:
/// ```text
/// [a c e]
/// [b d f]
/// [0 0 1]
/// ```
fn svg_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(a, b, 0.0),
        DVec3::new(c, d, 0.0),
        DVec3::new(e, f, 1.0),
    )
}

/// Ordered, append-only list of transforms with a memoized cumulative matrix
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    transforms: Vec<Transform>,
    ctm: Cell<Option<DMat3>>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform and invalidate the cached matrix
    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
        self.ctm.set(None);
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Cumulative transform matrix `T1 · T2 · … · Tn`, computed on first use
    pub fn ctm(&self) -> DMat3 {
        if let Some(ctm) = self.ctm.get() {
            return ctm;
        }
        let ctm = self
            .transforms
            .iter()
            .fold(DMat3::IDENTITY, |memo, transform| memo * transform.to_matrix());
        log::debug!("recomputed CTM over {} transform(s)", self.transforms.len());
        self.ctm.set(Some(ctm));
        ctm
    }

    /// Whether a cumulative matrix is currently cached
    pub fn is_cached(&self) -> bool {
        self.ctm.get().is_some()
    }

    /// Value of the `transform` attribute, `None` for an empty stack
    pub fn to_markup(&self) -> Option<String> {
        if self.transforms.is_empty() {
            return None;
        }
        Some(
            self.transforms
                .iter()
                .map(Transform::to_markup)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
