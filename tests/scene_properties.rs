//! Geometric properties of scenes built through the public API

use glam::{DMat3, DVec3};
use svg_scene::scene::{
    Builder, Point, Scene, SceneError, Shape, ShapeKind, Transform, TransformKind, WarningCategory,
};
use svg_scene::scene::NodeKind;

const EPSILON: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn assert_point(p: Point, x: f64, y: f64) {
    assert_close(p.x, x);
    assert_close(p.y, y);
}

/// Three nested frames with mixed transforms:
/// root > a (translate, rotate) > b (scale, skew) and root > c (rotate about)
fn nested_scene() -> Result<(Scene, [svg_scene::scene::NodeId; 3]), SceneError> {
    let mut scene = Scene::new(200.0, 200.0);
    let root = scene.root();
    let a = scene.insert_group(root)?;
    scene.push_transform(a, Transform::translate(20.0, 10.0))?;
    scene.push_transform(a, Transform::rotate(30.0))?;
    let b = scene.insert_group(a)?;
    scene.push_transform(b, Transform::scale(2.0, 0.5))?;
    scene.push_transform(b, Transform::skew_x(15.0))?;
    let c = scene.insert_group(root)?;
    scene.push_transform(c, Transform::rotate_about(-45.0, 100.0, 50.0))?;
    Ok((scene, [a, b, c]))
}

#[test]
fn test_localize_round_trip() -> Result<(), SceneError> {
    let (scene, [a, b, c]) = nested_scene()?;
    for (from, to) in [(a, b), (b, c), (c, a), (b, scene.root())] {
        let p = Point::at(from, 12.5, -7.0);
        let back = p.localize(&scene, Some(to))?.localize(&scene, Some(from))?;
        assert_eq!(back.frame, Some(from));
        assert_point(back, 12.5, -7.0);
    }
    Ok(())
}

#[test]
fn test_localize_is_associative() -> Result<(), SceneError> {
    let (scene, [a, b, c]) = nested_scene()?;
    let p = Point::at(a, 3.0, 4.0);
    let via_b = p.localize(&scene, Some(b))?.localize(&scene, Some(c))?;
    let direct = p.localize(&scene, Some(c))?;
    assert_point(via_b, direct.x, direct.y);
    Ok(())
}

#[test]
fn test_transform_inverse_law() -> Result<(), SceneError> {
    let transforms = [
        Transform::from_args(TransformKind::Translate, &[3.0, -2.0])?,
        Transform::from_args(TransformKind::Scale, &[2.0])?,
        Transform::from_args(TransformKind::Rotate, &[33.0, 5.0, 6.0])?,
        Transform::from_args(TransformKind::SkewX, &[20.0])?,
        Transform::from_args(TransformKind::SkewY, &[-10.0])?,
        Transform::from_args(TransformKind::Matrix, &[1.0, 0.5, -0.5, 2.0, 7.0, 8.0])?,
    ];
    for transform in transforms {
        let m = transform.to_matrix();
        let product = m * m.inverse();
        for (col, identity) in [
            (product.x_axis, DMat3::IDENTITY.x_axis),
            (product.y_axis, DMat3::IDENTITY.y_axis),
            (product.z_axis, DMat3::IDENTITY.z_axis),
        ] {
            assert!((col - identity).abs().max_element() < EPSILON, "{}", transform);
        }
    }
    Ok(())
}

#[test]
fn test_scale_is_monotonic() -> Result<(), SceneError> {
    let mut previous = 0.0;
    for factor in [0.5, 1.0, 1.5, 3.0] {
        let scene = Scene::build(100.0, 100.0, |b| {
            let corner = b.pt(0.0, 0.0);
            b.rect(corner, 10.0, 4.0)?.id("r").uniform_scale(factor);
            Ok(())
        })?;
        let id = scene.resolve("r").ok_or(SceneError::DegenerateVector)?;
        let bbox = scene.bounding_box(id)?;
        assert!(bbox.width > previous);
        assert_close(bbox.width, 10.0 * factor);
        previous = bbox.width;
    }
    Ok(())
}

#[test]
fn test_translated_rect_bounding_box() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let mut b = scene.builder();
    let corner = b.pt(0.0, 0.0);
    let id = b.rect(corner, 10.0, 10.0)?.translate(5.0, 5.0).node();

    let bbox = scene.bounding_box(id)?;
    assert_close(bbox.x, 5.0);
    assert_close(bbox.y, 5.0);
    assert_close(bbox.width, 10.0);
    assert_close(bbox.height, 10.0);
    Ok(())
}

#[test]
fn test_circle_bounding_box_uses_hexagonal_hull() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let mut b = scene.builder();
    let center = b.pt(50.0, 50.0);
    let id = b.circle(center, 10.0)?.node();

    let bbox = scene.bounding_box(id)?;
    assert_close(bbox.width, 20.0);
    assert_close(bbox.height, 2.0 * 10.0 * 2.0 * 3f64.sqrt() / 3.0);
    Ok(())
}

#[test]
fn test_sibling_rotated_groups_match_manual_composition() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let root = scene.root();
    let left = scene.insert_group(root)?;
    scene.push_transform(left, Transform::rotate(30.0))?;
    let right = scene.insert_group(root)?;
    scene.push_transform(right, Transform::translate(40.0, 0.0))?;
    scene.push_transform(right, Transform::rotate(-60.0))?;

    let p = Point::at(left, 10.0, 5.0);
    let localized = p.localize(&scene, Some(right))?;

    let manual = Transform::rotate(-60.0).to_matrix().inverse()
        * Transform::translate(40.0, 0.0).to_matrix().inverse()
        * Transform::rotate(30.0).to_matrix()
        * DVec3::new(10.0, 5.0, 1.0);
    assert_point(localized, manual.x, manual.y);
    Ok(())
}

#[test]
fn test_point_in_child_frame_reaches_document_frame() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let root = scene.root();
    let group = scene.insert_group(root)?;
    scene.push_transform(group, Transform::translate(10.0, 20.0))?;
    scene.push_transform(group, Transform::uniform_scale(2.0))?;

    let mut b = Builder::new(&mut scene, group);
    let corner = b.pt(1.0, 1.0);
    let rect = b.rect(corner, 4.0, 4.0)?.node();
    let corner = scene.anchor(rect, "br")?.localize(&scene, None)?;
    assert_point(corner, 20.0, 30.0);
    Ok(())
}

#[test]
fn test_negative_width_is_regularized_with_warning() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let root = scene.root();
    let id = scene.insert_shape(
        root,
        ShapeKind::Rect,
        vec![Point::at(root, 10.0, 0.0).into(), (-4.0).into(), 2.0.into()],
    )?;

    match &scene.node(id).kind {
        NodeKind::Shape(Shape::Rect(rect)) => {
            assert_close(rect.x, 6.0);
            assert_close(rect.width, 4.0);
        }
        other => panic!("expected a rect, got {}", other),
    }
    let categories: Vec<_> = scene.warnings().iter().map(|w| w.category).collect();
    assert_eq!(categories, vec![WarningCategory::NegativeExtent]);
    Ok(())
}

#[test]
fn test_normalizing_zero_length_vector_fails() {
    let p = Point::vector(3.0, 3.0);
    assert!(matches!(p.normalize(&p), Err(SceneError::DegenerateVector)));
}

#[test]
fn test_singular_target_frame_is_rejected() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let root = scene.root();
    let flat = scene.insert_group(root)?;
    scene.push_transform(flat, Transform::scale(1.0, 0.0))?;

    let err = Point::at(root, 1.0, 1.0).localize(&scene, Some(flat)).unwrap_err();
    assert!(matches!(err, SceneError::SingularTransform { .. }));
    Ok(())
}

#[test]
fn test_tiny_invertible_frame_is_accepted() -> Result<(), SceneError> {
    let mut scene = Scene::new(100.0, 100.0);
    let root = scene.root();
    let tiny = scene.insert_group(root)?;
    scene.push_transform(tiny, Transform::uniform_scale(1e-8))?;

    let p = Point::at(root, 1.0, 1.0).localize(&scene, Some(tiny))?;
    assert_eq!(p.frame, Some(tiny));
    assert!((p.x / 1e8 - 1.0).abs() < EPSILON);
    assert!((p.y / 1e8 - 1.0).abs() < EPSILON);

    let back = p.localize(&scene, Some(root))?;
    assert_point(back, 1.0, 1.0);
    Ok(())
}
