use glam::{EulerRot, Quat, Vec3};
use thinnizator_scene::{
    error::Result,
    materials::Material,
    transforms::{Transform, TransformKey},
    Scene,
};

pub const ROOT: &str = "Furniture";
pub const OUTPUT: &str = "Prefabs";

/// A room of boxes, wrapped chairs and one lamp under `Furniture`.
///
/// Each chair is a `Chair.N` wrapper holding a seat and a backrest; the wrapper
/// carries the authored scale and a bit of roll that instancing drops.
pub fn furnished_room() -> Result<Scene> {
    let mut scene = Scene::new();
    let wood = scene.add_material(Material::new("Wood").with_base_color([0.6, 0.4, 0.2, 1.0]));
    let fabric = scene.add_material(Material::new("Fabric").with_base_color([0.2, 0.3, 0.7, 1.0]));
    let brass = scene.add_material(Material::new("Brass").with_base_color([0.8, 0.7, 0.3, 1.0]));

    let root = scene.add_node(ROOT, Transform::IDENTITY, None)?;

    for (index, x) in [0.0, 5.0, 10.0, 15.0].into_iter().enumerate() {
        scene.add_mesh(
            format!("Box.{}", index + 1),
            Transform::IDENTITY.with_translation(Vec3::new(x, 0.0, 0.0)),
            Some(root),
            Some(wood),
            24,
        )?;
    }

    for index in 0..3 {
        let z = 4.0 + index as f32 * 2.0;
        let wrapper = chair(&mut scene, root, index + 1, Vec3::new(2.0, 0.0, z))?;
        scene.add_mesh(
            format!("Chair.{}_seat", index + 1),
            Transform::IDENTITY,
            Some(wrapper),
            Some(fabric),
            120,
        )?;
        scene.add_mesh(
            format!("Chair.{}_back", index + 1),
            Transform::IDENTITY.with_translation(Vec3::new(0.0, 0.5, -0.4)),
            Some(wrapper),
            Some(wood),
            48,
        )?;
    }

    scene.add_mesh(
        "Lamp",
        Transform::IDENTITY.with_translation(Vec3::new(-3.0, 2.0, 0.0)),
        Some(root),
        Some(brass),
        300,
    )?;

    scene.add_node(OUTPUT, Transform::IDENTITY, None)?;

    Ok(scene)
}

fn chair(scene: &mut Scene, root: TransformKey, number: usize, position: Vec3) -> Result<TransformKey> {
    let yaw = number as f32 * 0.4;
    scene.add_node(
        format!("Chair.{number}"),
        Transform::IDENTITY
            .with_translation(position)
            .with_rotation(Quat::from_euler(EulerRot::YXZ, yaw, 0.0, 0.05))
            .with_scale(Vec3::splat(1.2)),
        Some(root),
    )
}
