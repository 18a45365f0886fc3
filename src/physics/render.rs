use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::INDICATOR_RADIUS;
use crate::physics::systems::DragState;
use crate::physics::body::Body;
use crate::physics::world::{BodyId, Bounds, PhysicsWorld};

const INDICATOR_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);

/// Marker tying a circle entity to the body it draws.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyVisual(pub BodyId);

/// Resource: renderer-side map from body id to the entity drawing it.
/// The physics world never sees entities.
#[derive(Resource, Default, Debug)]
pub struct BodyVisuals(pub HashMap<BodyId, Entity>);

/// Physics frame (origin top-left, +Y down) to Bevy 2D world space
/// (origin at window center, +Y up).
#[inline]
pub fn screen_to_world(p: Vec2, bounds: Bounds) -> Vec2 {
    Vec2::new(p.x - 0.5 * bounds.width, 0.5 * bounds.height - p.y)
}

/// True when any part of the body's bounding box lies inside `bounds`.
/// Only `BoundaryMode::Open` lets a body leave the screen entirely.
pub fn is_on_screen(body: &Body, bounds: Bounds) -> bool {
    let (min, max) = body.bbox();
    max.x >= 0.0 && max.y >= 0.0 && min.x <= bounds.width && min.y <= bounds.height
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Spawn circles for new bodies, move existing ones (hiding those off screen),
/// despawn circles whose body is gone.
pub fn sync_body_visuals(
    mut commands: Commands,
    world: Res<PhysicsWorld>,
    bounds: Res<Bounds>,
    mut visuals: ResMut<BodyVisuals>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut q_visual: Query<(&mut Transform, &mut Visibility), With<BodyVisual>>,
) {
    visuals.0.retain(|id, entity| {
        let alive = world.contains(*id);
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    for (id, body) in world.iter() {
        let pos = screen_to_world(body.position, *bounds);
        let visibility = if is_on_screen(body, *bounds) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if let Some(&entity) = visuals.0.get(&id) {
            if let Ok((mut tf, mut vis)) = q_visual.get_mut(entity) {
                tf.translation.x = pos.x;
                tf.translation.y = pos.y;
                vis.set_if_neq(visibility);
            }
            continue;
        }

        let color = Color::srgb_u8(rand::random(), rand::random(), rand::random());
        let entity = commands
            .spawn((
                Mesh2d(meshes.add(Circle::new(body.radius()))),
                MeshMaterial2d(materials.add(color)),
                Transform::from_xyz(pos.x, pos.y, 0.0),
                visibility,
                BodyVisual(id),
            ))
            .id();
        visuals.0.insert(id, entity);
    }
}

/// Grey line from the drag origin to the cursor plus a small circle at the origin.
pub fn draw_aim_indicator(mut gizmos: Gizmos, drag: Res<DragState>, bounds: Res<Bounds>) {
    let Some(origin) = drag.origin else {
        return;
    };
    let start = screen_to_world(origin, *bounds);
    let end = screen_to_world(drag.current, *bounds);
    gizmos.line_2d(start, end, INDICATOR_COLOR);
    gizmos.circle_2d(start, INDICATOR_RADIUS, INDICATOR_COLOR);
}
