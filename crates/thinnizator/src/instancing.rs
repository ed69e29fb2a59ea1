//! Turns a group's first member into the shared, instanced prefab.

use glam::{Quat, Vec3};

use crate::collect::Group;
use crate::context::SceneContext;
use crate::error::{Result, ThinnizatorError};
use crate::resolve::{node_label, MATRIX_STRIDE};

pub const PREFAB_NAME_PREFIX: &str = "prefab-";
pub const PREFAB_MATERIAL_PREFIX: &str = "prefabMat-";

/// Prefab after a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltPrefab<N> {
    pub node: N,
    pub name: String,
    pub instance_count: usize,
}

/// Re-parents the prefab under `output`, gives it a private material copy and a
/// `prefab-` name, neutralizes its transform and uploads `matrices`.
///
/// Callers check [`SceneContext::supports_instancing`] first. If the host
/// rejects any edit, the prefab's name, parent, material and transform are put
/// back before the error is returned.
pub fn build_instances<C: SceneContext>(
    scene: &mut C,
    group: &Group<C::Node>,
    matrices: Vec<f32>,
    output: C::Node,
) -> Result<BuiltPrefab<C::Node>> {
    let expected = MATRIX_STRIDE * group.members.len();
    if matrices.len() != expected {
        return Err(ThinnizatorError::BufferLength {
            len: matrices.len(),
            expected,
        });
    }

    let snapshot = PrefabSnapshot::capture(scene, group.prefab);

    match convert(scene, group.prefab, &snapshot.name, matrices, output) {
        Ok(name) => Ok(BuiltPrefab {
            node: group.prefab,
            name,
            instance_count: group.members.len(),
        }),
        Err(err) => {
            snapshot.restore(scene, group.prefab);
            Err(err)
        }
    }
}

fn convert<C: SceneContext>(
    scene: &mut C,
    prefab: C::Node,
    original_name: &str,
    matrices: Vec<f32>,
    output: C::Node,
) -> Result<String> {
    scene
        .set_parent(prefab, Some(output))
        .map_err(ThinnizatorError::scene("set_parent", original_name))?;

    if let Some(material) = scene.material(prefab) {
        let material_name = format!(
            "{PREFAB_MATERIAL_PREFIX}{}",
            scene.material_name(material).unwrap_or_default()
        );
        let private = scene
            .clone_material(material, &material_name)
            .map_err(ThinnizatorError::scene("clone_material", original_name))?;
        scene
            .set_material(prefab, private)
            .map_err(ThinnizatorError::scene("set_material", original_name))?;
    }

    let name = format!("{PREFAB_NAME_PREFIX}{original_name}");
    scene
        .rename(prefab, &name)
        .map_err(ThinnizatorError::scene("rename", original_name))?;

    scene
        .set_absolute_position(prefab, Vec3::ZERO)
        .map_err(ThinnizatorError::scene("set_absolute_position", &name))?;
    scene
        .set_local_rotation(prefab, Quat::IDENTITY)
        .map_err(ThinnizatorError::scene("set_local_rotation", &name))?;
    scene
        .set_local_scale(prefab, Vec3::ONE)
        .map_err(ThinnizatorError::scene("set_local_scale", &name))?;

    scene
        .set_instance_buffer(prefab, matrices, MATRIX_STRIDE, false)
        .map_err(ThinnizatorError::scene("set_instance_buffer", &name))?;

    Ok(name)
}

/// What the prefab looked like before the build started.
struct PrefabSnapshot<N, M> {
    name: String,
    parent: Option<N>,
    material: Option<M>,
    position: Option<Vec3>,
    rotation: Option<Quat>,
    scale: Option<Vec3>,
}

impl<N: Copy, M: Copy> PrefabSnapshot<N, M> {
    fn capture<C>(scene: &C, prefab: N) -> Self
    where
        C: SceneContext<Node = N, Material = M>,
    {
        Self {
            name: node_label(scene, prefab),
            parent: scene.parent(prefab),
            material: scene.material(prefab),
            position: scene.absolute_position(prefab),
            rotation: scene.local_rotation(prefab),
            scale: scene.local_scale(prefab),
        }
    }

    // best effort, each step is attempted even if an earlier one fails
    fn restore<C>(&self, scene: &mut C, prefab: N)
    where
        C: SceneContext<Node = N, Material = M>,
    {
        let mut failures = Vec::new();

        if let Err(err) = scene.set_parent(prefab, self.parent) {
            failures.push(format!("set_parent: {err}"));
        }
        if let Some(material) = self.material {
            if let Err(err) = scene.set_material(prefab, material) {
                failures.push(format!("set_material: {err}"));
            }
        }
        if let Err(err) = scene.rename(prefab, &self.name) {
            failures.push(format!("rename: {err}"));
        }
        if let Some(position) = self.position {
            if let Err(err) = scene.set_absolute_position(prefab, position) {
                failures.push(format!("set_absolute_position: {err}"));
            }
        }
        if let Some(rotation) = self.rotation {
            if let Err(err) = scene.set_local_rotation(prefab, rotation) {
                failures.push(format!("set_local_rotation: {err}"));
            }
        }
        if let Some(scale) = self.scale {
            if let Err(err) = scene.set_local_scale(prefab, scale) {
                failures.push(format!("set_local_scale: {err}"));
            }
        }

        if failures.is_empty() {
            tracing::debug!("restored {} after failed prefab build", self.name);
        } else {
            tracing::warn!(
                "could not fully restore {}: {}",
                self.name,
                failures.join(", ")
            );
        }
    }
}

#[cfg(all(test, feature = "host-scene"))]
mod tests;
