//! Grouping keys for candidate duplicate meshes.
//!
//! A fingerprint is `<suffix>-<vertex count>`. The suffix is the node's own
//! material name, except for composite nodes (nodes with meshes below them)
//! that are nested under something other than the scan root: those take the
//! `-`-joined material names of every mesh below their parent (depth-first,
//! the node itself included), with a mesh's index standing in when it has no
//! material.
//!
//! Two meshes with equal fingerprints are assumed interchangeable up to a
//! rigid transform. Vertex positions and indices are never compared, so
//! different geometry with the same material and vertex count will collide.

use std::borrow::Borrow;
use std::fmt;

use crate::context::SceneContext;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(suffix: &str, vertex_count: usize) -> Self {
        Self(format!("{suffix}-{vertex_count}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn fingerprint<C: SceneContext>(scene: &C, node: C::Node, scan_root: C::Node) -> Fingerprint {
    let suffix = match scene.parent(node) {
        Some(parent) if parent != scan_root && is_composite(scene, node) => {
            sibling_suffix(scene, parent)
        }
        _ => scene.node_material_name(node).unwrap_or_default().to_string(),
    };

    Fingerprint::new(&suffix, scene.vertex_count(node))
}

fn is_composite<C: SceneContext>(scene: &C, node: C::Node) -> bool {
    !scene.descendant_meshes(node).is_empty()
}

// every mesh below the parent, depth-first, so nested parts split the key too
fn sibling_suffix<C: SceneContext>(scene: &C, parent: C::Node) -> String {
    scene
        .descendant_meshes(parent)
        .into_iter()
        .enumerate()
        .map(|(index, sibling)| match scene.node_material_name(sibling) {
            Some(name) => name.to_string(),
            None => index.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}
