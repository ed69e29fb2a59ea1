use glam::{Quat, Vec3};
use thinnizator::scene::{
    materials::Material,
    meshes::Mesh,
    transforms::{Transform, TransformKey},
    Scene,
};
use thinnizator::{GroupStatus, SceneContext, Thinnizator, ThinnizatorConfig};

struct Room {
    scene: Scene,
    root: TransformKey,
    output: TransformKey,
    boxes: Vec<TransformKey>,
}

fn room() -> Room {
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

    Room {
        scene,
        root,
        output,
        boxes,
    }
}

#[test]
fn three_boxes_become_one_prefab() {
    let mut room = room();
    let mut thinnizator = Thinnizator::default();

    let preview = thinnizator.collect(room.root, None, &room.scene);
    let group = preview.get("Wood-24").unwrap();
    assert_eq!(group.prefab, room.boxes[0]);
    assert_eq!(group.members.len(), 3);

    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    let prefab = room.scene.find_by_name("prefab-Box.1").unwrap();
    assert_eq!(prefab, room.boxes[0]);
    assert_eq!(SceneContext::parent(&room.scene, prefab), Some(room.output));
    assert!(room.scene.find_by_name("Box.2").is_none());
    assert!(room.scene.find_by_name("Box.3").is_none());
    assert!(!room.scene.contains(room.boxes[1]));
    assert!(!room.scene.contains(room.boxes[2]));

    let buffer = room.scene.instances.get(prefab).unwrap();
    assert_eq!(buffer.data.len(), 48);
    assert_eq!(buffer.stride, 16);
    for (index, x) in [0.0, 5.0, 10.0].into_iter().enumerate() {
        let offset = index * 16;
        assert_eq!(&buffer.data[offset + 12..offset + 15], &[x, 0.0, 0.0]);
    }

    assert_eq!(report.instanced_count(), 1);
    assert_eq!(report.instance_count(), 3);
    assert_eq!(report.disposed, vec!["Box.2", "Box.3"]);
    let outcome = report.group("Wood-24").unwrap();
    assert_eq!(outcome.status, GroupStatus::Instanced);
    assert_eq!(outcome.prefab_name, "prefab-Box.1");
}

#[test]
fn prefab_is_neutral_and_owns_its_material() {
    let mut room = room();
    room.scene
        .set_local_rotation(room.boxes[0], Quat::from_rotation_y(0.5))
        .unwrap();
    let mut thinnizator = Thinnizator::default();

    thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    let prefab = room.boxes[0];
    let local = room.scene.transforms.get_local(prefab).unwrap();
    assert!(local.translation.abs_diff_eq(Vec3::ZERO, 1e-6));
    assert!(local.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    assert!(local.scale.abs_diff_eq(Vec3::ONE, 1e-6));

    assert_eq!(room.scene.node_material_name(prefab), Some("prefabMat-Wood"));
    assert!(room.scene.materials.find_by_name("Wood").is_some());

    // the first instance keeps the rotation the prefab had before the reset
    let buffer = room.scene.instances.get(prefab).unwrap();
    let (_, rotation, _) = buffer.matrix(0).unwrap().to_scale_rotation_translation();
    assert!(rotation.abs_diff_eq(Quat::from_rotation_y(0.5), 1e-5));
}

#[test]
fn only_the_prefab_survives_per_group() {
    let mut room = room();
    let metal = room.scene.add_material(Material::new("Metal"));
    for x in [20.0, 25.0] {
        room.scene
            .add_mesh(
                "Chair",
                Transform::IDENTITY.with_translation(Vec3::new(x, 0.0, 0.0)),
                Some(room.root),
                Some(metal),
                60,
            )
            .unwrap();
    }
    let meshes_before = room.scene.meshes.len();
    let mut thinnizator = Thinnizator::default();

    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    assert_eq!(report.instanced_count(), 2);
    assert_eq!(report.instance_count(), 5);
    assert_eq!(room.scene.meshes.len(), meshes_before - 3);
    let chair = report.group("Metal-60").unwrap();
    assert_eq!(chair.prefab_name, "prefab-Chair");
    assert_eq!(room.scene.instances.instance_count(chair.prefab), Some(2));
}

#[test]
fn non_instanceable_prefab_keeps_its_group() {
    let mut room = room();
    let stone = room.scene.add_material(Material::new("Stone"));
    let mut proxies = Vec::new();
    for name in ["Proxy.1", "Proxy.2"] {
        let node = room
            .scene
            .add_node(name, Transform::IDENTITY, Some(room.root))
            .unwrap();
        room.scene
            .meshes
            .insert(Mesh::new(node, 8).with_material(stone).with_instanceable(false))
            .unwrap();
        proxies.push(node);
    }
    let mut thinnizator = Thinnizator::default();

    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    let skipped = report.group("Stone-8").unwrap();
    assert_eq!(skipped.status, GroupStatus::SkippedBufferUnsupported);
    assert_eq!(skipped.prefab_name, "Proxy.1");
    assert!(proxies.iter().all(|proxy| room.scene.contains(*proxy)));
    assert_eq!(room.scene.name(proxies[0]), Some("Proxy.1"));

    assert_eq!(report.group("Wood-24").unwrap().status, GroupStatus::Instanced);
    assert!(room.scene.find_by_name("prefab-Box.1").is_some());

    let lines = report.log.lines();
    assert!(!lines.iter().any(|line| line.contains("using prefab Proxy.1")));
    assert!(!lines.iter().any(|line| line.starts_with("THINNING prefab Proxy.1")));
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.contains(" using prefab "))
            .count(),
        3
    );
}

#[test]
fn below_threshold_changes_nothing() {
    let mut room = room();
    let mut thinnizator = Thinnizator::new(ThinnizatorConfig::default().with_threshold(4));

    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    assert!(report.groups.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].status(), GroupStatus::SkippedBelowThreshold);
    assert!(room.boxes.iter().all(|node| room.scene.contains(*node)));
    assert!(room.scene.instances.get(room.boxes[0]).is_err());
}

#[test]
fn log_has_one_line_per_member_and_a_summary() {
    let mut room = room();
    let mut thinnizator = Thinnizator::default();

    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);
    let lines = report.log.lines();

    let spawned: Vec<&String> = lines
        .iter()
        .filter(|line| line.contains("using prefab Box.1"))
        .collect();
    assert_eq!(spawned.len(), 3);
    assert!(spawned[1].starts_with("Box.2 using prefab Box.1 material Wood"));
    assert!(spawned[1].ends_with("spawning at 5, 0, 0"));
    assert!(lines.contains(&"THINNING prefab Box.1 3 times".to_string()));
    assert!(lines.contains(&"Disposing Box.3".to_string()));
    assert_eq!(
        lines.last().unwrap(),
        "Thinnized 1 group(s) into 3 instance(s), disposed 2 mesh(es)"
    );
}

#[test]
fn named_pass_creates_output_and_filters_by_prefix() {
    let mut room = room();
    let wood = room.scene.materials.find_by_name("Wood").unwrap();
    room.scene
        .add_mesh("Crate", Transform::IDENTITY, Some(room.root), Some(wood), 24)
        .unwrap();
    let mut thinnizator =
        Thinnizator::new(ThinnizatorConfig::default().with_name_prefixes(["Box"]));

    let report = thinnizator
        .thinnize_named("R", "Instanced", &mut room.scene)
        .unwrap();

    let output = room.scene.find_by_name("Instanced").unwrap();
    let prefab = room.scene.find_by_name("prefab-Box.1").unwrap();
    assert_eq!(SceneContext::parent(&room.scene, prefab), Some(output));
    assert_eq!(report.instance_count(), 3);
    assert!(room.scene.find_by_name("Crate").is_some());
}

#[test]
fn named_pass_on_missing_root_is_a_no_op() {
    let mut room = room();
    let mut thinnizator = Thinnizator::default();

    let report = thinnizator
        .thinnize_named("Nowhere", "Prefabs", &mut room.scene)
        .unwrap();

    assert!(report.is_empty());
    assert!(room.boxes.iter().all(|node| room.scene.contains(*node)));
}

#[test]
fn second_pass_finds_nothing_new() {
    let mut room = room();
    let mut thinnizator = Thinnizator::default();

    thinnizator.thinnize(room.root, None, room.output, &mut room.scene);
    let report = thinnizator.thinnize(room.root, None, room.output, &mut room.scene);

    assert_eq!(report.instanced_count(), 0);
    assert!(room.scene.instances.get(room.boxes[0]).is_ok());
}
