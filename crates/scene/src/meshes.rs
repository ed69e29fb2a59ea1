//! Mesh records attached to transform nodes.

use indexmap::IndexSet;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use thiserror::Error;

use crate::materials::MaterialKey;
use crate::transforms::TransformKey;

#[derive(Clone, Debug)]
pub struct Mesh {
    pub transform_key: TransformKey,
    pub material_key: Option<MaterialKey>,
    pub vertex_count: usize,
    // placeholder meshes (e.g. bounding proxies) can't take an instance buffer
    pub instanceable: bool,
}

impl Mesh {
    pub fn new(transform_key: TransformKey, vertex_count: usize) -> Self {
        Self {
            transform_key,
            material_key: None,
            vertex_count,
            instanceable: true,
        }
    }

    pub fn with_material(mut self, material_key: MaterialKey) -> Self {
        self.material_key = Some(material_key);
        self
    }

    pub fn with_instanceable(mut self, instanceable: bool) -> Self {
        self.instanceable = instanceable;
        self
    }
}

#[derive(Default)]
pub struct Meshes {
    list: SlotMap<MeshKey, Mesh>,
    // insertion order, so enumeration stays stable across removals
    order: IndexSet<MeshKey>,
    by_transform: SecondaryMap<TransformKey, MeshKey>,
}

impl Meshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh: Mesh) -> Result<MeshKey> {
        if self.by_transform.contains_key(mesh.transform_key) {
            return Err(MeshError::TransformAlreadyHasMesh(mesh.transform_key));
        }
        let transform_key = mesh.transform_key;
        let key = self.list.insert(mesh);
        self.order.insert(key);
        self.by_transform.insert(transform_key, key);
        Ok(key)
    }

    pub fn get(&self, mesh_key: MeshKey) -> Result<&Mesh> {
        self.list
            .get(mesh_key)
            .ok_or(MeshError::MeshNotFound(mesh_key))
    }

    pub fn get_mut(&mut self, mesh_key: MeshKey) -> Result<&mut Mesh> {
        self.list
            .get_mut(mesh_key)
            .ok_or(MeshError::MeshNotFound(mesh_key))
    }

    pub fn key_for_transform(&self, transform_key: TransformKey) -> Option<MeshKey> {
        self.by_transform.get(transform_key).copied()
    }

    pub fn get_by_transform(&self, transform_key: TransformKey) -> Result<&Mesh> {
        let key = self
            .key_for_transform(transform_key)
            .ok_or(MeshError::NoMeshOnTransform(transform_key))?;
        self.get(key)
    }

    pub fn get_by_transform_mut(&mut self, transform_key: TransformKey) -> Result<&mut Mesh> {
        let key = self
            .key_for_transform(transform_key)
            .ok_or(MeshError::NoMeshOnTransform(transform_key))?;
        self.get_mut(key)
    }

    pub fn has_mesh(&self, transform_key: TransformKey) -> bool {
        self.by_transform.contains_key(transform_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshKey, &Mesh)> {
        self.order
            .iter()
            .filter_map(|key| self.list.get(*key).map(|mesh| (*key, mesh)))
    }

    pub fn remove(&mut self, mesh_key: MeshKey) -> Option<Mesh> {
        let mesh = self.list.remove(mesh_key)?;
        self.order.shift_remove(&mesh_key);
        self.by_transform.remove(mesh.transform_key);
        Some(mesh)
    }

    pub fn remove_by_transform(&mut self, transform_key: TransformKey) -> Option<Mesh> {
        let key = self.key_for_transform(transform_key)?;
        self.remove(key)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

new_key_type! {
    pub struct MeshKey;
}

pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("[mesh] mesh not found: {0:?}")]
    MeshNotFound(MeshKey),

    #[error("[mesh] no mesh on transform {0:?}")]
    NoMeshOnTransform(TransformKey),

    #[error("[mesh] transform {0:?} already carries a mesh")]
    TransformAlreadyHasMesh(TransformKey),
}
