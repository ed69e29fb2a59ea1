use glam::{Quat, Vec3};
use thinnizator_scene::{
    meshes::Mesh,
    transforms::{Transform, TransformKey},
};

use super::build_instances;
use crate::collect::Group;
use crate::context::SceneContext;
use crate::error::ThinnizatorError;
use crate::fingerprint::Fingerprint;
use crate::fixtures;

fn group_of(members: &[TransformKey]) -> Group<TransformKey> {
    Group {
        fingerprint: Fingerprint::new("Wood", 24),
        prefab: members[0],
        members: members.to_vec(),
    }
}

#[test]
fn prefab_is_renamed_reparented_and_reset() {
    let mut fixture = fixtures::boxes();
    let prefab = fixture.boxes[1];
    fixture
        .scene
        .set_local(
            prefab,
            Transform::IDENTITY
                .with_translation(Vec3::new(5.0, 1.0, 0.0))
                .with_rotation(Quat::from_rotation_y(1.0))
                .with_scale(Vec3::splat(3.0)),
        )
        .unwrap();

    let group = group_of(&[prefab, fixture.boxes[2]]);
    let built = build_instances(&mut fixture.scene, &group, vec![0.0; 32], fixture.output).unwrap();

    assert_eq!(built.node, prefab);
    assert_eq!(built.name, "prefab-Box.2");
    assert_eq!(built.instance_count, 2);
    assert_eq!(fixture.scene.name(prefab), Some("prefab-Box.2"));
    assert_eq!(SceneContext::parent(&fixture.scene, prefab), Some(fixture.output));

    let local = fixture.scene.transforms.get_local(prefab).unwrap();
    assert!(local.translation.abs_diff_eq(Vec3::ZERO, 1e-6));
    assert!(local.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    assert!(local.scale.abs_diff_eq(Vec3::ONE, 1e-6));

    let buffer = fixture.scene.instances.get(prefab).unwrap();
    assert_eq!(buffer.instance_count(), 2);
    assert!(!buffer.normalized);
}

#[test]
fn prefab_gets_private_material_copy() {
    let mut fixture = fixtures::boxes();
    let group = group_of(&fixture.boxes);

    build_instances(&mut fixture.scene, &group, vec![0.0; 48], fixture.output).unwrap();

    let prefab_material = SceneContext::material(&fixture.scene, fixture.boxes[0]).unwrap();
    assert_ne!(prefab_material, fixture.wood);
    assert_eq!(fixture.scene.material_name(prefab_material), Some("prefabMat-Wood"));
    assert_eq!(fixture.scene.material_name(fixture.wood), Some("Wood"));
    assert_eq!(
        SceneContext::material(&fixture.scene, fixture.boxes[1]),
        Some(fixture.wood)
    );
}

#[test]
fn wrong_buffer_length_leaves_scene_untouched() {
    let mut fixture = fixtures::boxes();
    let group = group_of(&fixture.boxes);

    let err = build_instances(&mut fixture.scene, &group, vec![0.0; 16], fixture.output).unwrap_err();

    assert!(matches!(
        err,
        ThinnizatorError::BufferLength {
            len: 16,
            expected: 48
        }
    ));
    assert_eq!(fixture.scene.name(fixture.boxes[0]), Some("Box.1"));
    assert_eq!(SceneContext::parent(&fixture.scene, fixture.boxes[0]), Some(fixture.root));
}

#[test]
fn rejected_buffer_restores_the_prefab() {
    let mut fixture = fixtures::boxes();
    let spin = Quat::from_rotation_y(0.8);
    let proxy = fixture
        .scene
        .add_node(
            "Proxy",
            Transform::IDENTITY
                .with_translation(Vec3::new(7.0, 1.0, -2.0))
                .with_rotation(spin)
                .with_scale(Vec3::splat(1.5)),
            Some(fixture.root),
        )
        .unwrap();
    fixture
        .scene
        .meshes
        .insert(Mesh::new(proxy, 24).with_material(fixture.wood).with_instanceable(false))
        .unwrap();
    let materials_before = fixture.scene.materials.len();
    let group = group_of(&[proxy, fixture.boxes[0]]);

    let err = build_instances(&mut fixture.scene, &group, vec![0.0; 32], fixture.output).unwrap_err();

    assert!(matches!(
        err,
        ThinnizatorError::Scene {
            operation: "set_instance_buffer",
            ..
        }
    ));
    assert!(!fixture.scene.instances.contains(proxy));

    assert_eq!(fixture.scene.name(proxy), Some("Proxy"));
    assert!(fixture.scene.find_by_name("prefab-Proxy").is_none());
    assert_eq!(SceneContext::parent(&fixture.scene, proxy), Some(fixture.root));
    assert_eq!(SceneContext::material(&fixture.scene, proxy), Some(fixture.wood));

    let local = fixture.scene.transforms.get_local(proxy).unwrap();
    assert!(local.translation.abs_diff_eq(Vec3::new(7.0, 1.0, -2.0), 1e-5));
    assert!(local.rotation.abs_diff_eq(spin, 1e-6));
    assert!(local.scale.abs_diff_eq(Vec3::splat(1.5), 1e-6));

    // the private copy stays in the table, unused
    assert_eq!(fixture.scene.materials.len(), materials_before + 1);
}
