use std::collections::HashSet;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tracing::{debug, info, warn};

use crate::physics::world::{BodyId, Bounds, PhysicsWorld};

/// Cursor position in physics coordinates (window pixels, origin top-left),
/// `None` while the cursor is outside the window.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorScreen(pub Option<Vec2>);

/// Left-button drag in progress: where it started and where the cursor is now.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct DragState {
    pub origin: Option<Vec2>,
    pub current: Vec2,
}

impl DragState {
    /// Launch velocity the body would get if released now.
    pub fn launch_velocity(&self) -> Option<Vec2> {
        self.origin.map(|origin| self.current - origin)
    }
}

/// Keep `Bounds` equal to the window's logical size (resizes / DPI changes).
pub fn update_bounds(windows: Query<&Window, With<PrimaryWindow>>, mut bounds: ResMut<Bounds>) {
    let Ok(w) = windows.single() else {
        return;
    };
    let size = Bounds::new(w.width(), w.height());
    if *bounds != size {
        debug!(width = size.width, height = size.height, "bounds changed");
        *bounds = size;
    }
}

/// Startup: size the bounds from the window and fill the world with the
/// default random population.
pub fn populate_world(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut bounds: ResMut<Bounds>,
    mut world: ResMut<PhysicsWorld>,
) {
    if let Ok(w) = windows.single() {
        *bounds = Bounds::new(w.width(), w.height());
    }
    world.reset(*bounds);
    info!(bodies = world.len(), ?bounds, "world populated");
}

/// Native-only quit: press Esc or Q to exit the app.
/// (No-op on wasm32.)
pub fn exit_on_esc_or_q_if_native(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<AppExit>,
) {
    if cfg!(not(target_arch = "wasm32")) && keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyQ]) {
        exit.write(AppExit::Success);
    }
}

/// Track the cursor in window coordinates, which is the physics frame.
pub fn update_cursor_screen(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cursor: ResMut<CursorScreen>,
) {
    if let Ok(window) = windows.single() {
        cursor.0 = window.cursor_position();
    }
}

/// Press starts a drag, moving updates it, release spawns a body at the
/// press point with velocity `release - press`.
pub fn handle_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorScreen>,
    mut drag: ResMut<DragState>,
    mut world: ResMut<PhysicsWorld>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        if let Some(p) = cursor.0 {
            drag.origin = Some(p);
            drag.current = p;
        }
    }

    if buttons.pressed(MouseButton::Left) {
        if let Some(p) = cursor.0 {
            drag.current = p;
        }
    }

    if buttons.just_released(MouseButton::Left) {
        // Released outside the window: use the last point we saw.
        if let Some(p) = cursor.0 {
            drag.current = p;
        }
        let Some(velocity) = drag.launch_velocity() else {
            return;
        };
        let Some(origin) = drag.origin.take() else {
            return;
        };
        match world.add_body(origin, velocity) {
            Ok(id) => info!(?id, ?origin, ?velocity, "spawned body"),
            Err(err) => warn!(%err, "rejected body spawn"),
        }
    }
}

/// `R` throws away every body and starts over with a random population.
pub fn reset_on_key(keys: Res<ButtonInput<KeyCode>>, bounds: Res<Bounds>, mut world: ResMut<PhysicsWorld>) {
    if keys.just_pressed(KeyCode::KeyR) {
        let removed = world.reset(*bounds);
        info!(removed = removed.len(), bodies = world.len(), "reset");
    }
}

/// One physics tick per FixedUpdate run.
pub fn physics_step(bounds: Res<Bounds>, mut world: ResMut<PhysicsWorld>) {
    // Minimised window: nothing sensible to bounce against.
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    world.step(*bounds);
}

/// Report each body once when its state turns NaN / infinite.
pub fn warn_non_finite_bodies(world: Res<PhysicsWorld>, mut reported: Local<HashSet<BodyId>>) {
    reported.retain(|id| world.contains(*id));
    for id in world.non_finite_bodies() {
        if reported.insert(id) {
            warn!(?id, tick = world.tick(), "body state is no longer finite");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::world::PhysicsParams;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(PhysicsWorld::with_seed(PhysicsParams::default(), 5))
            .insert_resource(Bounds::new(800.0, 600.0))
            .init_resource::<CursorScreen>()
            .init_resource::<DragState>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, (handle_drag, reset_on_key));
        app
    }

    #[test]
    fn launch_velocity_follows_drag() {
        let drag = DragState {
            origin: Some(Vec2::new(10.0, 10.0)),
            current: Vec2::new(25.0, 5.0),
        };
        assert_eq!(drag.launch_velocity(), Some(Vec2::new(15.0, -5.0)));
        assert_eq!(DragState::default().launch_velocity(), None);
    }

    #[test]
    fn drag_release_spawns_body() {
        let mut app = test_app();

        app.world_mut().resource_mut::<CursorScreen>().0 = Some(Vec2::new(100.0, 200.0));
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert_eq!(
            app.world().resource::<DragState>().origin,
            Some(Vec2::new(100.0, 200.0))
        );

        app.world_mut().resource_mut::<CursorScreen>().0 = Some(Vec2::new(130.0, 180.0));
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            buttons.release(MouseButton::Left);
        }
        app.update();

        let world = app.world().resource::<PhysicsWorld>();
        assert_eq!(world.len(), 1);
        let body = world.bodies()[0];
        assert_eq!(body.position, Vec2::new(100.0, 200.0));
        assert_eq!(body.velocity, Vec2::new(30.0, -20.0));
        assert_eq!(body.mass(), crate::config::MIN_MASS);
        assert_eq!(app.world().resource::<DragState>().origin, None);
    }

    #[test]
    fn r_key_resets_world() {
        let mut app = test_app();
        for k in 0..5 {
            app.world_mut()
                .resource_mut::<PhysicsWorld>()
                .add_body(Vec2::splat(10.0 * k as f32 + 10.0), Vec2::ZERO)
                .unwrap();
        }
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();

        let world = app.world().resource::<PhysicsWorld>();
        assert_eq!(world.len(), crate::config::DEFAULT_BODY_COUNT);
        assert!(world.ids().iter().all(|id| id.0 >= 5));
    }
}
