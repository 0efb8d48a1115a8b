//! End-to-end placement scenarios plus seeded property checks.

use cgmath::{Deg, InnerSpace, Quaternion, Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use haggis_placement::geometry::{Aabb, OrientedBox, Transform};
use haggis_placement::placement::{
    anchor_points, best_anchor_match, check_overlap, compute_snapped_position, compute_volume, find_neighbors,
    snap_to_grid, ConfirmOutcome, GridIncrement, PlacementConfig, PlacementController, PlacementInput,
    TickOutcome, DEFAULT_SHRINK_FACTOR,
};
use haggis_placement::scene::{ExactOverlapQuery, NodeId, Prefab, PrefabId, PrefabNode, Scene};

const RANGE: f32 = 3.0;

fn unit_block(id: u64) -> Prefab {
    Prefab::single_box(
        PrefabId(id),
        "Block",
        "Blocks",
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(2.0, 2.0, 2.0),
    )
}

fn place(scene: &mut Scene, prefab: &Prefab, position: Vector3<f32>) -> NodeId {
    let id = scene.instantiate(prefab, None).unwrap();
    scene.get_mut(id).unwrap().transform.translation = position;
    id
}

fn updated(outcome: TickOutcome) -> haggis_placement::placement::PlacementState {
    match outcome {
        TickOutcome::Updated(state) => state,
        other => panic!("expected an updated state, got {:?}", other),
    }
}

fn assert_close(a: Vector3<f32>, b: Vector3<f32>, tolerance: f32) {
    assert!((a - b).magnitude() <= tolerance, "{:?} != {:?}", a, b);
}

fn random_vector(rng: &mut StdRng, low: f32, high: f32) -> Vector3<f32> {
    Vector3::new(
        rng.random_range(low..high),
        rng.random_range(low..high),
        rng.random_range(low..high),
    )
}

/// Prefab with a random number of box leaves at random offsets and yaw
fn random_composite(rng: &mut StdRng, id: u64) -> Prefab {
    let mut root = PrefabNode::new("composite", Transform::identity());
    for i in 0..rng.random_range(1..5) {
        let offset = random_vector(rng, -2.0, 2.0);
        let yaw = Quaternion::from_angle_y(Deg(rng.random_range(0.0..360.0)));
        let size = random_vector(rng, 0.2, 2.0);
        let leaf = PrefabNode::new(format!("part{}", i), Transform::from_translation(offset).with_rotation(yaw))
            .with_geometry(Aabb::from_center_size(Vector3::new(0.0, 0.0, 0.0), size));
        root = root.with_child(leaf);
    }
    Prefab::new(PrefabId(id), "Composite", "Props", root)
}

#[test]
fn test_scenario_a_snaps_to_adjacent_block() {
    let mut scene = Scene::new();
    let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
    let block = unit_block(1);
    place(&mut scene, &block, Vector3::new(3.0, 0.0, 0.0));

    controller.select(&mut scene, &block).unwrap();
    let state = updated(
        controller
            .update(&mut scene, &PlacementInput::at(Vector3::new(0.0, 0.0, 0.0)))
            .unwrap(),
    );

    assert_close(state.position, Vector3::new(1.0, 0.0, 0.0), 1e-5);
    assert!(state.is_valid);
}

#[test]
fn test_scenario_b_neighbor_out_of_range() {
    let mut scene = Scene::new();
    let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
    let block = unit_block(1);
    place(&mut scene, &block, Vector3::new(3.0, 0.0, 5.0));

    controller.select(&mut scene, &block).unwrap();
    let state = updated(
        controller
            .update(&mut scene, &PlacementInput::at(Vector3::new(0.0, 0.0, 0.0)))
            .unwrap(),
    );

    assert_eq!(state.position, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn test_scenario_c_overlap_blocks_confirm() {
    let mut scene = Scene::new();
    let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
    let block = unit_block(1);
    let existing = place(&mut scene, &block, Vector3::new(1.5, 0.0, 0.0));

    controller.select(&mut scene, &block).unwrap();
    let input = PlacementInput::at(Vector3::new(0.0, 0.0, 0.0)).with_smart_snap(false);
    let state = updated(controller.update(&mut scene, &input).unwrap());
    assert!(!state.is_valid);

    let nodes_before = scene.len();
    let outcome = controller.confirm(&mut scene, input.collision_override).unwrap();
    assert_eq!(
        outcome,
        ConfirmOutcome::Rejected {
            blockers: vec![existing]
        }
    );
    assert_eq!(scene.len(), nodes_before);
}

#[test]
fn test_scenario_d_grid_snap() {
    let increment = GridIncrement::new(Vector3::new(1.0, 1.0, 1.0)).unwrap();
    assert_eq!(
        snap_to_grid(Vector3::new(1.46, 0.2, 2.51), &increment),
        Vector3::new(1.0, 0.0, 3.0)
    );

    let mut scene = Scene::new();
    let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
    controller.select(&mut scene, &unit_block(1)).unwrap();
    let input = PlacementInput::at(Vector3::new(1.46, 0.2, 2.51))
        .with_smart_snap(false)
        .with_grid(increment);
    let state = updated(controller.update(&mut scene, &input).unwrap());
    assert_eq!(state.position, Vector3::new(1.0, 0.0, 3.0));
}

#[test]
fn test_place_row_of_blocks() {
    let mut scene = Scene::new();
    let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
    controller.select(&mut scene, &unit_block(1)).unwrap();

    // Each drop lands a little off; smart snap closes the gap to the previous block
    let mut placed = Vec::new();
    for i in 0..4 {
        let target = Vector3::new(i as f32 * 2.3, 0.0, 0.1);
        let state = updated(controller.update(&mut scene, &PlacementInput::at(target)).unwrap());
        assert!(state.is_valid, "drop {} blocked", i);
        match controller.confirm(&mut scene, false).unwrap() {
            ConfirmOutcome::Placed(node) => placed.push(node),
            other => panic!("drop {} not placed: {:?}", i, other),
        }
    }

    for (i, node) in placed.iter().enumerate() {
        let position = scene.world_position(*node).unwrap();
        assert_close(position, Vector3::new(i as f32 * 2.0, 0.0, 0.1), 1e-3);
    }
}

#[test]
fn test_grid_snap_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let increment = GridIncrement::new(random_vector(&mut rng, 0.1, 3.0)).unwrap();
        let position = random_vector(&mut rng, -50.0, 50.0);

        let once = snap_to_grid(position, &increment);
        assert_eq!(snap_to_grid(once, &increment), once);
    }
}

#[test]
fn test_volume_contains_every_leaf_corner() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in 0..100 {
        let prefab = random_composite(&mut rng, n);
        let mut scene = Scene::new();
        let object = scene.instantiate(&prefab, None).unwrap();
        {
            let root = scene.get_mut(object).unwrap();
            root.transform.translation = random_vector(&mut rng, -10.0, 10.0);
            root.transform.rotation = Quaternion::from_angle_y(Deg(rng.random_range(0.0..360.0)));
            let scale = rng.random_range(0.5..2.0);
            root.transform.scale = Vector3::new(scale, scale, scale);
        }

        let volume = compute_volume(&scene, object, DEFAULT_SHRINK_FACTOR).unwrap();
        let grown = OrientedBox::new(volume.center, volume.half_extents() / DEFAULT_SHRINK_FACTOR, volume.rotation);

        for id in scene.subtree(object) {
            let Some(geometry) = scene.node(id).unwrap().geometry else {
                continue;
            };
            let world = scene.world_matrix(id).unwrap();
            for corner in geometry.corners() {
                let point = (world * corner.extend(1.0)).truncate();
                assert!(grown.contains_point(point, 1e-3), "corner {:?} escapes volume", point);
            }
        }
    }
}

#[test]
fn test_overlap_ignores_candidate_subtree() {
    let mut rng = StdRng::seed_from_u64(23);
    for n in 0..50 {
        let mut scene = Scene::new();
        let candidate = scene.instantiate(&random_composite(&mut rng, n), None).unwrap();
        assert!(check_overlap(&scene, &ExactOverlapQuery, candidate, DEFAULT_SHRINK_FACTOR).is_valid());

        let intruder = place(&mut scene, &unit_block(1000 + n), Vector3::new(0.0, 0.0, 0.0));
        let volume = compute_volume(&scene, candidate, DEFAULT_SHRINK_FACTOR).unwrap();
        scene.get_mut(intruder).unwrap().transform.translation = volume.center;

        let report = check_overlap(&scene, &ExactOverlapQuery, candidate, DEFAULT_SHRINK_FACTOR);
        assert_eq!(report.blockers, vec![intruder]);
    }
}

#[test]
fn test_anchor_match_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..50 {
        let mut scene = Scene::new();
        let block = unit_block(1);
        let candidate = place(&mut scene, &block, Vector3::new(0.0, 0.0, 0.0));
        for _ in 0..rng.random_range(1..6) {
            let offset = Vector3::new(rng.random_range(-4.0..4.0), 0.0, rng.random_range(-4.0..4.0));
            place(&mut scene, &block, offset);
        }

        let neighbors = find_neighbors(&scene, &ExactOverlapQuery, candidate, RANGE, DEFAULT_SHRINK_FACTOR);
        let first = best_anchor_match(&scene, candidate, &neighbors).unwrap();
        let second = best_anchor_match(&scene, candidate, &neighbors).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            find_neighbors(&scene, &ExactOverlapQuery, candidate, RANGE, DEFAULT_SHRINK_FACTOR),
            neighbors
        );
    }
}

#[test]
fn test_smart_snap_reaches_fixed_point() {
    let mut rng = StdRng::seed_from_u64(47);
    for _ in 0..100 {
        let mut scene = Scene::new();
        let candidate = place(&mut scene, &unit_block(1), Vector3::new(0.0, 0.0, 0.0));

        let neighbor_block = Prefab::single_box(
            PrefabId(2),
            "Slab",
            "Blocks",
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(rng.random_range(0.5..3.0), 1.0, rng.random_range(0.5..3.0)),
        );
        let neighbor = place(
            &mut scene,
            &neighbor_block,
            Vector3::new(rng.random_range(-3.0..3.0), 0.0, rng.random_range(-3.0..3.0)),
        );
        scene.get_mut(neighbor).unwrap().transform.rotation =
            Quaternion::from_angle_y(Deg(rng.random_range(0.0..360.0)));

        let first = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, RANGE, DEFAULT_SHRINK_FACTOR)
            .unwrap();
        scene.get_mut(candidate).unwrap().transform.translation = first;
        let second = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, RANGE, DEFAULT_SHRINK_FACTOR)
            .unwrap();

        assert_close(second, first, 1e-4);
        assert_eq!(first.y, 0.0);
    }
}

#[test]
fn test_lonely_candidate_does_not_move() {
    let mut rng = StdRng::seed_from_u64(53);
    for _ in 0..50 {
        let mut scene = Scene::new();
        let position = random_vector(&mut rng, -20.0, 20.0);
        let candidate = place(&mut scene, &unit_block(1), position);

        let snapped =
            compute_snapped_position(&scene, &ExactOverlapQuery, candidate, RANGE, DEFAULT_SHRINK_FACTOR).unwrap();
        assert_eq!(snapped, position);

        let anchors = anchor_points(&scene, candidate).unwrap();
        assert_close(anchors[1], position, 1e-5);
    }
}
