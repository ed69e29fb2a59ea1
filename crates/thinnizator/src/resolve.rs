//! Per-member instance matrices.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::context::SceneContext;
use crate::error::{Result, ThinnizatorError};

/// Floats per instance matrix.
pub const MATRIX_STRIDE: usize = 16;

/// Scale, roll-free rotation and world position of one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstancePlacement {
    pub scale: Vec3,
    pub rotation: Quat,
    pub position: Vec3,
}

impl InstancePlacement {
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Rotation part of a world matrix, scale and translation are dropped.
pub fn absolute_rotation(world: &Mat4) -> Quat {
    let (_, rotation, _) = world.to_scale_rotation_translation();
    rotation
}

/// Keeps yaw (Y) and pitch (X), zeroes roll (Z).
pub fn strip_roll(rotation: Quat) -> Quat {
    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Scale authored on the wrapping node wins over the mesh's own.
pub fn inherited_scale<C: SceneContext>(scene: &C, member: C::Node) -> Vec3 {
    match scene.parent(member) {
        Some(parent) => scene.local_scale(parent).unwrap_or(Vec3::ONE),
        None => scene.local_scale(member).unwrap_or(Vec3::ONE),
    }
}

pub fn resolve_placement<C: SceneContext>(scene: &C, member: C::Node) -> Result<InstancePlacement> {
    let world = scene.world_matrix(member).ok_or_else(|| {
        ThinnizatorError::MissingWorldMatrix(node_label(scene, member))
    })?;

    Ok(InstancePlacement {
        scale: inherited_scale(scene, member),
        rotation: strip_roll(absolute_rotation(&world)),
        position: world.w_axis.truncate(),
    })
}

pub fn resolve_instance_matrix<C: SceneContext>(scene: &C, member: C::Node) -> Result<Mat4> {
    resolve_placement(scene, member).map(|placement| placement.to_matrix())
}

/// Column-major matrices for every member, member `i` at floats `i*16..i*16+16`.
pub fn matrix_buffer<C: SceneContext>(scene: &C, members: &[C::Node]) -> Result<Vec<f32>> {
    Ok(pack(&placements(scene, members)?))
}

pub fn placements<C: SceneContext>(
    scene: &C,
    members: &[C::Node],
) -> Result<Vec<InstancePlacement>> {
    members
        .iter()
        .map(|member| resolve_placement(scene, *member))
        .collect()
}

pub fn pack(placements: &[InstancePlacement]) -> Vec<f32> {
    let mut buffer = vec![0.0; MATRIX_STRIDE * placements.len()];
    for (index, placement) in placements.iter().enumerate() {
        let offset = index * MATRIX_STRIDE;
        placement
            .to_matrix()
            .write_cols_to_slice(&mut buffer[offset..offset + MATRIX_STRIDE]);
    }
    buffer
}

pub(crate) fn node_label<C: SceneContext>(scene: &C, node: C::Node) -> String {
    match scene.name(node) {
        Some(name) => name.to_string(),
        None => format!("{node:?}"),
    }
}
