use glam::{Mat4, Quat, Vec3};
use thinnizator_scene::{
    error::SceneError, materials::MaterialKey, transforms::Transform, transforms::TransformKey,
    Scene,
};

use super::SceneContext;

impl SceneContext for Scene {
    type Node = TransformKey;
    type Material = MaterialKey;
    type Error = SceneError;

    fn find_node_by_name(&self, name: &str) -> Option<TransformKey> {
        self.find_by_name(name)
    }

    fn children(&self, node: TransformKey) -> Vec<TransformKey> {
        self.transforms
            .children(node)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn is_mesh(&self, node: TransformKey) -> bool {
        self.meshes.has_mesh(node)
    }

    fn meshes(&self) -> Vec<TransformKey> {
        self.meshes
            .iter()
            .map(|(_, mesh)| mesh.transform_key)
            .collect()
    }

    fn name(&self, node: TransformKey) -> Option<&str> {
        Scene::name(self, node)
    }

    fn parent(&self, node: TransformKey) -> Option<TransformKey> {
        self.transforms.parent(node)
    }

    fn material(&self, node: TransformKey) -> Option<MaterialKey> {
        self.meshes
            .get_by_transform(node)
            .ok()
            .and_then(|mesh| mesh.material_key)
    }

    fn material_name(&self, material: MaterialKey) -> Option<&str> {
        self.materials
            .get(material)
            .ok()
            .map(|material| material.name.as_str())
    }

    fn vertex_count(&self, node: TransformKey) -> usize {
        self.meshes
            .get_by_transform(node)
            .map(|mesh| mesh.vertex_count)
            .unwrap_or(0)
    }

    fn world_matrix(&self, node: TransformKey) -> Option<Mat4> {
        Scene::world_matrix(self, node).ok()
    }

    fn local_scale(&self, node: TransformKey) -> Option<Vec3> {
        self.transforms
            .get_local(node)
            .ok()
            .map(|transform| transform.scale)
    }

    fn local_rotation(&self, node: TransformKey) -> Option<Quat> {
        self.transforms
            .get_local(node)
            .ok()
            .map(|transform| transform.rotation)
    }

    fn supports_instancing(&self, node: TransformKey) -> bool {
        self.meshes
            .get_by_transform(node)
            .map(|mesh| mesh.instanceable)
            .unwrap_or(false)
    }

    fn create_node(
        &mut self,
        name: &str,
        parent: Option<TransformKey>,
    ) -> Result<TransformKey, SceneError> {
        self.add_node(name, Transform::IDENTITY, parent)
    }

    fn set_parent(
        &mut self,
        node: TransformKey,
        parent: Option<TransformKey>,
    ) -> Result<(), SceneError> {
        Scene::set_parent(self, node, parent)
    }

    fn rename(&mut self, node: TransformKey, name: &str) -> Result<(), SceneError> {
        Ok(self.transforms.rename(node, name)?)
    }

    fn set_absolute_position(&mut self, node: TransformKey, position: Vec3) -> Result<(), SceneError> {
        Scene::set_absolute_position(self, node, position)
    }

    fn set_local_rotation(&mut self, node: TransformKey, rotation: Quat) -> Result<(), SceneError> {
        Scene::set_local_rotation(self, node, rotation)
    }

    fn set_local_scale(&mut self, node: TransformKey, scale: Vec3) -> Result<(), SceneError> {
        Scene::set_local_scale(self, node, scale)
    }

    fn clone_material(
        &mut self,
        material: MaterialKey,
        name: &str,
    ) -> Result<MaterialKey, SceneError> {
        Ok(self.materials.clone_material(material, name)?)
    }

    fn set_material(&mut self, node: TransformKey, material: MaterialKey) -> Result<(), SceneError> {
        Scene::set_material(self, node, material)
    }

    fn set_instance_buffer(
        &mut self,
        node: TransformKey,
        data: Vec<f32>,
        stride: usize,
        normalized: bool,
    ) -> Result<(), SceneError> {
        Scene::set_instance_buffer(self, node, data, stride, normalized)
    }

    fn destroy(&mut self, node: TransformKey) -> Result<(), SceneError> {
        Scene::destroy(self, node).map(|_| ())
    }
}
