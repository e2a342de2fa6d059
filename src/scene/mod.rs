//! The scene engine: a tree of shapes, groups and transforms, and the
//! geometry that lets points move between the frames of its nodes.
//!
//! A scene is built either directly through [`Builder`] or by running a
//! parsed script through [`build`].

pub mod builder;
pub mod config;
pub mod constructors;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod hull;
pub mod point;
pub mod registry;
pub mod shapes;
pub mod transform;
pub mod tree;

pub use builder::{Builder, EventBuilder, NodeBuilder, StyleBuilder};
pub use config::BuildConfig;
pub use constructors::{ShapeArg, MAX_GRID_LINES, MAX_VERTICES};
pub use diagnostics::{Diagnostics, Warning, WarningCategory};
pub use engine::build;
pub use error::SceneError;
pub use hull::BoundingBox;
pub use point::Point;
pub use registry::Registry;
pub use shapes::{Shape, ShapeKind};
pub use transform::{Transform, TransformKind, TransformStack};
pub use tree::{Node, NodeId, NodeKind, Scene, ARROWHEAD_MARKER};

/// Edit distance between two names
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(b_chars.len() + 1);
        current.push(i + 1);
        for (j, &cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current.push(substitution.min(insertion).min(deletion));
        }
        previous = current;
    }

    previous[b_chars.len()]
}

/// Up to three registered names close to `target`, nearest first
pub(crate) fn find_similar<'a>(
    defined: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = defined
        .into_iter()
        .filter_map(|name| {
            let distance = levenshtein_distance(name, target);
            (distance > 0 && distance <= max_distance).then_some((distance, name))
        })
        .collect();

    candidates.sort();
    candidates
        .into_iter()
        .take(3)
        .map(|(_, name)| name.to_string())
        .collect()
}
