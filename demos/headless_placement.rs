//! # Headless Placement Walkthrough
//!
//! Drives the placement controller through a short scripted editing session
//! without opening a window.
//!
//! ## What this demo shows:
//! - Turning cursor positions into build-surface targets
//! - Smart snapping a wall segment onto an existing one
//! - Grid snapping when smart snap is switched off
//! - A blocked placement, then the same placement with the override held
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=debug cargo run --example headless_placement
//! ```

use cgmath::{perspective, Matrix4, Point3};
use haggis_placement::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PlacementConfig::default();
    let mut scene = Scene::new();
    let mut controller = PlacementController::new(config)?;

    let wall = Prefab::single_box(
        PrefabId(1),
        "Wall Segment",
        "Walls",
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(2.0, 2.0, 0.2),
    );
    let crate_prefab = Prefab::single_box(
        PrefabId(2),
        "Crate",
        "Props",
        Vector3::new(0.0, 0.5, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
    );

    // Camera looking down at the build surface
    let view = Matrix4::look_at_rh(
        Point3::new(0.0, 12.0, 8.0),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    );
    let projection = perspective(Deg(60.0), 16.0 / 9.0, 0.1, 100.0);
    let view_proj = projection * view;
    let screen = (1280.0, 720.0);
    let surface = PlacementSurface::new(config.surface_height);

    let cursor_target =
        |pixel: (f32, f32)| Ray::from_screen(pixel, screen, &view_proj).and_then(|ray| surface.project(&ray));

    // First wall straight under the screen center
    controller.select(&mut scene, &wall)?;
    let first_target = cursor_target((640.0, 360.0));
    report(controller.update(&mut scene, &PlacementInput { target: first_target, ..Default::default() })?);
    report_confirm(controller.confirm(&mut scene, false)?, &scene);

    // Second wall dragged slightly right of the first; smart snap lines it up
    let nudged = first_target.map(|t| t + Vector3::new(2.4, 0.0, 0.15));
    report(controller.update(&mut scene, &PlacementInput { target: nudged, ..Default::default() })?);
    report_confirm(controller.confirm(&mut scene, false)?, &scene);

    // Crates on a half-unit grid, turned a little
    controller.select(&mut scene, &crate_prefab)?;
    controller.rotate(&mut scene, RotationDirection::Clockwise)?;
    let grid_input = PlacementInput::at(Vector3::new(-3.37, 0.0, 2.81))
        .with_smart_snap(false)
        .with_grid(GridIncrement::uniform(0.5)?);
    report(controller.update(&mut scene, &grid_input)?);
    report_confirm(controller.confirm(&mut scene, false)?, &scene);

    // Same spot again: blocked by the crate just placed
    report(controller.update(&mut scene, &grid_input)?);
    report_confirm(controller.confirm(&mut scene, false)?, &scene);

    // Holding the override modifier during the tick forces it through
    let forced = grid_input.with_collision_override(true);
    report(controller.update(&mut scene, &forced)?);
    report_confirm(controller.confirm(&mut scene, false)?, &scene);

    // Cursor off the surface
    report(controller.update(&mut scene, &PlacementInput::default())?);

    controller.clear_selection(&mut scene)?;
    for event in controller.drain_events() {
        println!("event: {:?}", event);
    }

    println!("\nScene contents:");
    for (id, node) in scene.iter() {
        if node.prefab().is_some() {
            let position = scene.world_position(id)?;
            println!(
                "  {} {:<14} at ({:>6.2}, {:>5.2}, {:>6.2})",
                id, node.name, position.x, position.y, position.z
            );
        }
    }

    Ok(())
}

fn report(outcome: TickOutcome) {
    match outcome {
        TickOutcome::Idle => println!("tick: nothing selected"),
        TickOutcome::Held => println!("tick: no target, holding position"),
        TickOutcome::Updated(state) => println!(
            "tick: preview at ({:.2}, {:.2}, {:.2}) {}",
            state.position.x,
            state.position.y,
            state.position.z,
            if state.is_valid { "valid" } else { "BLOCKED" }
        ),
    }
}

fn report_confirm(outcome: ConfirmOutcome, scene: &Scene) {
    match outcome {
        ConfirmOutcome::NoSelection => println!("confirm: nothing selected"),
        ConfirmOutcome::Unpositioned => println!("confirm: candidate not positioned yet"),
        ConfirmOutcome::Placed(node) => {
            let name = scene.node(node).map(|n| n.name.as_str()).unwrap_or("?");
            println!("confirm: placed {} as {}", name, node);
        }
        ConfirmOutcome::Rejected { blockers } => println!("confirm: rejected, {} blocker(s)", blockers.len()),
    }
}
