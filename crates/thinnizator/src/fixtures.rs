use glam::{Quat, Vec3};
use thinnizator_scene::{
    materials::{Material, MaterialKey},
    transforms::{Transform, TransformKey},
    Scene,
};

pub(crate) struct Boxes {
    pub scene: Scene,
    pub root: TransformKey,
    pub output: TransformKey,
    pub boxes: Vec<TransformKey>,
    pub wood: MaterialKey,
}

/// Three 24-vertex "Wood" boxes at x = 0, 5, 10 under root `R`, plus an empty `Prefabs` node.
pub(crate) fn boxes() -> Boxes {
    let mut scene = Scene::new();
    let wood = scene.add_material(Material::new("Wood"));
    let root = scene.add_node("R", Transform::IDENTITY, None).unwrap();
    let output = scene.add_node("Prefabs", Transform::IDENTITY, None).unwrap();

    let boxes = [0.0, 5.0, 10.0]
        .into_iter()
        .enumerate()
        .map(|(index, x)| {
            scene
                .add_mesh(
                    format!("Box.{}", index + 1),
                    Transform::IDENTITY.with_translation(Vec3::new(x, 0.0, 0.0)),
                    Some(root),
                    Some(wood),
                    24,
                )
                .unwrap()
        })
        .collect();

    Boxes {
        scene,
        root,
        output,
        boxes,
        wood,
    }
}

pub(crate) fn rotated(yaw: f32, pitch: f32, roll: f32) -> Quat {
    Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, roll)
}
