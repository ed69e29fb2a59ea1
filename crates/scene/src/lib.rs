//! In-memory scene graph: a transform hierarchy with meshes, materials and
//! per-mesh instance matrix buffers.

use glam::{Mat4, Quat, Vec3};

use instances::{InstanceError, Instances};
use materials::{Material, MaterialKey, Materials};
use meshes::{Mesh, Meshes};
use transforms::{Transform, TransformKey, Transforms};

pub mod error;
pub mod instances;
pub mod materials;
pub mod meshes;
pub mod transforms;


#[derive(Default)]
pub struct Scene {
    pub transforms: Transforms,
    pub meshes: Meshes,
    pub materials: Materials,
    pub instances: Instances,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> TransformKey {
        self.transforms.root()
    }

    /// Adds a plain transform node (no geometry).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<TransformKey>,
    ) -> error::Result<TransformKey> {
        let key = self.transforms.insert(name, transform, parent)?;
        self.transforms.update_world();
        Ok(key)
    }

    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<TransformKey>,
        material_key: Option<MaterialKey>,
        vertex_count: usize,
    ) -> error::Result<TransformKey> {
        let key = self.add_node(name, transform, parent)?;
        let mut mesh = Mesh::new(key, vertex_count);
        mesh.material_key = material_key;
        self.meshes.insert(mesh)?;
        Ok(key)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    pub fn name(&self, key: TransformKey) -> Option<&str> {
        self.transforms.name(key)
    }

    pub fn find_by_name(&self, name: &str) -> Option<TransformKey> {
        self.transforms.find_by_name(name)
    }

    pub fn world_matrix(&self, key: TransformKey) -> error::Result<Mat4> {
        Ok(*self.transforms.get_world(key)?)
    }

    pub fn absolute_position(&self, key: TransformKey) -> error::Result<Vec3> {
        Ok(self.world_matrix(key)?.w_axis.truncate())
    }

    pub fn set_local(&mut self, key: TransformKey, transform: Transform) -> error::Result<()> {
        self.transforms.set_local(key, transform)?;
        self.transforms.update_world();
        Ok(())
    }

    pub fn set_parent(
        &mut self,
        key: TransformKey,
        parent: Option<TransformKey>,
    ) -> error::Result<()> {
        self.transforms.set_parent(key, parent)?;
        self.transforms.update_world();
        Ok(())
    }

    /// Moves the node so its world-space origin lands on `position`.
    pub fn set_absolute_position(&mut self, key: TransformKey, position: Vec3) -> error::Result<()> {
        self.transforms.update_world();
        let parent_world = match self.transforms.parent(key) {
            Some(parent) => *self.transforms.get_world(parent)?,
            None => Mat4::IDENTITY,
        };
        let local = parent_world.inverse().transform_point3(position);
        self.transforms
            .update_local(key, |transform| transform.translation = local)?;
        self.transforms.update_world();
        Ok(())
    }

    pub fn set_local_rotation(&mut self, key: TransformKey, rotation: Quat) -> error::Result<()> {
        self.transforms
            .update_local(key, |transform| transform.rotation = rotation)?;
        self.transforms.update_world();
        Ok(())
    }

    pub fn set_local_scale(&mut self, key: TransformKey, scale: Vec3) -> error::Result<()> {
        self.transforms
            .update_local(key, |transform| transform.scale = scale)?;
        self.transforms.update_world();
        Ok(())
    }

    pub fn set_material(&mut self, key: TransformKey, material_key: MaterialKey) -> error::Result<()> {
        self.materials.get(material_key)?;
        self.meshes.get_by_transform_mut(key)?.material_key = Some(material_key);
        Ok(())
    }

    pub fn set_instance_buffer(
        &mut self,
        key: TransformKey,
        data: Vec<f32>,
        stride: usize,
        normalized: bool,
    ) -> error::Result<()> {
        let mesh = self.meshes.get_by_transform(key)?;
        if !mesh.instanceable {
            return Err(InstanceError::NotInstanceable(key).into());
        }
        self.instances.insert(key, data, stride, normalized)?;
        Ok(())
    }

    /// Removes the node, its subtree, and any meshes or instance buffers they carried.
    pub fn destroy(&mut self, key: TransformKey) -> error::Result<Vec<TransformKey>> {
        let removed = self.transforms.remove(key)?;
        for removed_key in &removed {
            self.meshes.remove_by_transform(*removed_key);
            self.instances.remove(*removed_key);
        }
        tracing::trace!("[scene] destroyed {} node(s)", removed.len());
        Ok(removed)
    }

    pub fn contains(&self, key: TransformKey) -> bool {
        self.transforms.contains(key)
    }
}
