use bevy::prelude::*;

pub mod body;
pub mod error;
pub mod render;
pub mod systems;
pub mod vector;
pub mod world;

pub use body::Body;
pub use error::PhysicsError;
pub use world::{BodyId, BoundaryMode, Bounds, PhysicsParams, PhysicsWorld};

use render::{BodyVisuals, draw_aim_indicator, spawn_camera, sync_body_visuals};
use systems::{
    CursorScreen, DragState, exit_on_esc_or_q_if_native, handle_drag, physics_step,
    populate_world, reset_on_key, update_bounds, update_cursor_screen, warn_non_finite_bodies,
};

/// Plug this into your App with `.add_plugins(GravityPlugin)`.
pub struct GravityPlugin;

impl Plugin for GravityPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(PhysicsWorld::new(crate::config::load_params()))
            // Track window extents (physics uses window pixels, origin top-left)
            .init_resource::<Bounds>()
            .init_resource::<CursorScreen>()
            .init_resource::<DragState>()
            .init_resource::<BodyVisuals>()
            .add_systems(Startup, (spawn_camera, populate_world))
            // Input runs between fixed ticks, never inside one
            .add_systems(
                Update,
                (
                    update_bounds,
                    update_cursor_screen,
                    handle_drag,
                    reset_on_key,
                    exit_on_esc_or_q_if_native,
                )
                    .chain(),
            )
            // One world step per fixed tick (rate set in main via Time::<Fixed>)
            .add_systems(FixedUpdate, physics_step)
            .add_systems(
                Update,
                (sync_body_visuals, draw_aim_indicator, warn_non_finite_bodies)
                    .after(reset_on_key),
            );
    }
}
