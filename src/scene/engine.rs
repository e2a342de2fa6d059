//! Script interpreter: walks a parsed [`Document`] and builds the scene
//! through the same builders and constructor table as the Rust API.
//!
//! Statements are evaluated in source order, so a name can only be
//! referenced after the statement that declares it.

use crate::attributes::EventProperty;
use crate::parser::ast::*;

use super::builder::Builder;
use super::config::BuildConfig;
use super::constructors::ShapeArg;
use super::error::SceneError;
use super::find_similar;
use super::point::Point;
use super::shapes::ShapeKind;
use super::transform::Transform;
use super::tree::{NodeId, Scene};

/// Build a scene from a parsed script
pub fn build(doc: &Document, config: &BuildConfig) -> Result<Scene, SceneError> {
    let (width, height) = match &doc.header {
        Some(header) => (header.width.node, header.height.node),
        None => (config.default_width, config.default_height),
    };
    let mut scene = Scene::new(width, height);
    let root = scene.root();

    for stmt in &doc.statements {
        build_statement(&mut scene, root, stmt, config)?;
    }

    scene.finish(config.strict)?;
    log::debug!(
        "built {}x{} scene with {} node(s), {} warning(s)",
        width,
        height,
        scene.len(),
        scene.warnings().len()
    );
    Ok(scene)
}

fn build_statement(
    scene: &mut Scene,
    parent: NodeId,
    stmt: &Spanned<Statement>,
    config: &BuildConfig,
) -> Result<NodeId, SceneError> {
    let result = match &stmt.node {
        Statement::Shape(decl) => build_shape(scene, parent, decl, config),
        Statement::Container(decl) => build_container(scene, parent, decl, config),
    };
    result.map_err(|e| e.at(stmt.span.clone()))
}

fn build_shape(
    scene: &mut Scene,
    parent: NodeId,
    decl: &ShapeDecl,
    config: &BuildConfig,
) -> Result<NodeId, SceneError> {
    let args = decl
        .args
        .iter()
        .map(|arg| eval_arg(scene, parent, arg))
        .collect::<Result<Vec<_>, _>>()?;

    let keyword = decl.keyword.node;
    if let ShapeKeyword::Primitive(ShapeKind::Star | ShapeKind::RegularPolygon) = keyword {
        if let Some(ShapeArg::Number(n)) = args.first() {
            if *n > config.max_vertices as f64 {
                return Err(SceneError::invalid_arguments(
                    keyword.keyword(),
                    format!("vertex count must be at most {}, got {}", config.max_vertices, n),
                ));
            }
        }
    }
    let mut builder = Builder::new(scene, parent);
    let id = match keyword {
        ShapeKeyword::Primitive(kind) => builder.shape(kind, args)?.node(),
        ShapeKeyword::LabeledCircle => match args.as_slice() {
            [ShapeArg::Point(center), ShapeArg::Number(r), ShapeArg::Text(label)] => {
                builder.labeled_circle(*center, *r, label)?.node()
            }
            _ => return Err(usage(keyword, "center point, radius, label text")),
        },
        ShapeKeyword::RotatedText => match args.as_slice() {
            [ShapeArg::Text(content), ShapeArg::Point(position), ShapeArg::Number(angle)] => {
                builder.rotated_text(content, *position, *angle)?.node()
            }
            _ => return Err(usage(keyword, "text, position point, angle")),
        },
        ShapeKeyword::Repeat => match args.as_slice() {
            [ShapeArg::Text(target), ShapeArg::Number(count), ShapeArg::Point(step)] => {
                if *count < 0.0 || count.fract() != 0.0 {
                    return Err(SceneError::invalid_arguments(
                        keyword.keyword(),
                        format!("count must be a non-negative integer, got {}", count),
                    ));
                }
                if *count > config.max_repeat as f64 {
                    return Err(SceneError::invalid_arguments(
                        keyword.keyword(),
                        format!("count must be at most {}, got {}", config.max_repeat, count),
                    ));
                }
                builder
                    .repeat(target, *count as usize, (step.x, step.y))?
                    .node()
            }
            _ => return Err(usage(keyword, "target id, count, step point")),
        },
    };

    decorate(scene, parent, id, &decl.name, &decl.modifiers, &decl.transforms)?;
    Ok(id)
}

fn usage(keyword: ShapeKeyword, expected: &str) -> SceneError {
    SceneError::invalid_arguments(keyword.keyword(), format!("expected {}", expected))
}

fn build_container(
    scene: &mut Scene,
    parent: NodeId,
    decl: &ContainerDecl,
    config: &BuildConfig,
) -> Result<NodeId, SceneError> {
    let mut builder = Builder::new(scene, parent);
    let id = match &decl.kind.node {
        ContainerKind::Group => builder.group()?.node(),
        ContainerKind::Link(href) => builder.link(href)?.node(),
        ContainerKind::Defs => builder.defs()?.node(),
    };

    decorate(scene, parent, id, &decl.name, &decl.modifiers, &decl.transforms)?;
    for child in &decl.children {
        build_statement(scene, id, child, config)?;
    }
    Ok(id)
}

/// Name, attributes and transforms shared by every statement kind
fn decorate(
    scene: &mut Scene,
    parent: NodeId,
    id: NodeId,
    name: &Option<Spanned<Identifier>>,
    modifiers: &[Spanned<Modifier>],
    transforms: &[Spanned<TransformCall>],
) -> Result<(), SceneError> {
    if let Some(name) = name {
        scene.set_name(id, name.node.as_str());
    }

    for modifier in modifiers {
        let key = modifier.node.key.node.as_str();
        let value = modifier.node.value.node.to_attribute_value();
        if EventProperty::from_key(key).is_some() {
            scene.set_event(id, key, value);
        } else {
            scene.set_style(id, key, value);
        }
    }

    for call in transforms {
        let transform = eval_transform(scene, parent, &call.node).map_err(|e| e.at(call.span.clone()))?;
        scene.push_transform(id, transform)?;
    }
    Ok(())
}

fn eval_arg(scene: &Scene, parent: NodeId, arg: &Spanned<Arg>) -> Result<ShapeArg, SceneError> {
    Ok(match &arg.node {
        Arg::Number(n) => ShapeArg::Number(*n),
        Arg::Text(s) => ShapeArg::Text(s.clone()),
        Arg::Point(expr) => ShapeArg::Point(eval_point(scene, parent, expr)?),
    })
}

/// Transform arguments are expressed in the parent's frame; a point
/// contributes its two coordinates
fn eval_transform(scene: &Scene, parent: NodeId, call: &TransformCall) -> Result<Transform, SceneError> {
    let mut numbers = Vec::with_capacity(call.args.len() * 2);
    for arg in &call.args {
        match &arg.node {
            TransformArg::Number(n) => numbers.push(*n),
            TransformArg::Point(expr) => {
                let p = eval_point(scene, parent, expr)?.localize(scene, Some(parent))?;
                numbers.extend(p.to_array());
            }
        }
    }
    Transform::from_args(call.kind, &numbers)
}

/// Evaluate `term (+|- term)*` left to right.
///
/// The first literal is a position in the parent's frame; later literals
/// are free vectors. Anchor terms are positions in their element's frame
/// and are localized before the arithmetic.
fn eval_point(scene: &Scene, parent: NodeId, expr: &PointExpr) -> Result<Point, SceneError> {
    let mut point = eval_term(scene, &expr.first, Some(parent))?;
    for (op, term) in &expr.rest {
        let other = eval_term(scene, term, None)?;
        point = match op {
            PointOp::Add => point.add(&other, scene)?,
            PointOp::Subtract => point.subtract(&other, scene)?,
        };
    }
    Ok(point)
}

fn eval_term(scene: &Scene, term: &Spanned<PointTerm>, frame: Option<NodeId>) -> Result<Point, SceneError> {
    match &term.node {
        PointTerm::Literal { x, y } => Ok(Point::new(*x, *y, frame)),
        PointTerm::Anchor { element, anchor } => {
            let name = element.as_str();
            let id = scene.resolve(name).ok_or_else(|| {
                SceneError::undefined(
                    name,
                    term.span.clone(),
                    find_similar(scene.registry().names(), name, 2),
                )
            })?;
            scene.anchor_at(id, anchor.as_str(), term.span.clone())
        }
    }
}
