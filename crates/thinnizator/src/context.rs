//! The capability object every pass runs against.
//!
//! The core never owns scene state: it reads, re-parents, renames and
//! destroys nodes through this trait, and the host decides what a node,
//! a material and a failure are.

use std::fmt::Debug;
use std::hash::Hash;

use glam::{Mat4, Quat, Vec3};

#[cfg(feature = "host-scene")]
mod host_scene;

pub trait SceneContext {
    type Node: Copy + Eq + Hash + Debug;
    type Material: Copy + Eq + Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    fn find_node_by_name(&self, name: &str) -> Option<Self::Node>;

    /// Immediate children in child order, meshes or not.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn is_mesh(&self, node: Self::Node) -> bool;

    /// Every mesh node in the scene, in a stable order.
    fn meshes(&self) -> Vec<Self::Node>;

    fn name(&self, node: Self::Node) -> Option<&str>;

    /// `None` when the node sits directly under the scene root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn material(&self, node: Self::Node) -> Option<Self::Material>;

    fn material_name(&self, material: Self::Material) -> Option<&str>;

    fn vertex_count(&self, node: Self::Node) -> usize;

    fn world_matrix(&self, node: Self::Node) -> Option<Mat4>;

    fn local_scale(&self, node: Self::Node) -> Option<Vec3>;

    fn local_rotation(&self, node: Self::Node) -> Option<Quat>;

    fn supports_instancing(&self, node: Self::Node) -> bool;

    fn create_node(
        &mut self,
        name: &str,
        parent: Option<Self::Node>,
    ) -> Result<Self::Node, Self::Error>;

    fn set_parent(
        &mut self,
        node: Self::Node,
        parent: Option<Self::Node>,
    ) -> Result<(), Self::Error>;

    fn rename(&mut self, node: Self::Node, name: &str) -> Result<(), Self::Error>;

    fn set_absolute_position(&mut self, node: Self::Node, position: Vec3) -> Result<(), Self::Error>;

    fn set_local_rotation(&mut self, node: Self::Node, rotation: Quat) -> Result<(), Self::Error>;

    fn set_local_scale(&mut self, node: Self::Node, scale: Vec3) -> Result<(), Self::Error>;

    fn clone_material(
        &mut self,
        material: Self::Material,
        name: &str,
    ) -> Result<Self::Material, Self::Error>;

    fn set_material(&mut self, node: Self::Node, material: Self::Material) -> Result<(), Self::Error>;

    fn set_instance_buffer(
        &mut self,
        node: Self::Node,
        data: Vec<f32>,
        stride: usize,
        normalized: bool,
    ) -> Result<(), Self::Error>;

    /// Destroys the node together with its subtree.
    fn destroy(&mut self, node: Self::Node) -> Result<(), Self::Error>;

    fn child_meshes(&self, node: Self::Node) -> Vec<Self::Node> {
        self.children(node)
            .into_iter()
            .filter(|child| self.is_mesh(*child))
            .collect()
    }

    /// Every mesh below `node`, depth-first in child order.
    fn descendant_meshes(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            if self.is_mesh(current) {
                out.push(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    fn absolute_position(&self, node: Self::Node) -> Option<Vec3> {
        self.world_matrix(node).map(|matrix| matrix.w_axis.truncate())
    }

    fn node_material_name(&self, node: Self::Node) -> Option<&str> {
        self.material(node)
            .and_then(|material| self.material_name(material))
    }
}
