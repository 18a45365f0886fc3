use bevy::prelude::*;

use gravity_toy::config::PHYSICS_HZ;
use gravity_toy::physics::GravityPlugin;

fn main() {
    App::new()
        // Bodies are drawn on black
        .insert_resource(ClearColor(Color::BLACK))
        // One physics step per 1/60 s tick
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        // Window titled after the simulator
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Gravity Simulator".into(),
                ..default()
            }),
            ..default()
        }))
        // World, drag/reset input and body visuals
        .add_plugins(GravityPlugin)
        .run();
}
