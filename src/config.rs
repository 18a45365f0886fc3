/// Physics timing
pub const PHYSICS_HZ: f64 = 60.0;

/// Gravity law (G = 1, visually tuned, not SI)
pub const GRAVITATIONAL_CONSTANT: f32 = 1.0;

/// Per-component velocity limit applied after integration.
pub const MAX_VELOCITY: f32 = 50.0;

/// Fraction of velocity kept (after the sign flip) when bouncing off a wall.
pub const ELASTICITY: f32 = 0.75;

/// Body defaults
pub const MIN_MASS: f32 = 5000.0;
/// Randomly populated bodies are this many times heavier than `MIN_MASS`.
pub const RANDOM_MASS_FACTOR: f32 = 5.0;
/// radius = mass / MASS_PER_RADIUS
pub const MASS_PER_RADIUS: f32 = 1000.0;

/// World population after a reset
pub const DEFAULT_BODY_COUNT: usize = 2;
/// Random bodies get integer velocity components in `-RANDOM_VELOCITY..=RANDOM_VELOCITY`.
pub const RANDOM_VELOCITY: i32 = 10;

/// Drag aim indicator
pub const INDICATOR_RADIUS: f32 = 5.0;

/// Environment variable naming a JSON file with `PhysicsParams` overrides.
#[cfg(feature = "serde")]
pub const CONFIG_ENV_VAR: &str = "GRAVITY_TOY_CONFIG";

/// Load physics parameters, honouring a JSON override file when one is configured.
///
/// Any problem reading or parsing the file is logged and the defaults are used.
#[cfg(feature = "serde")]
pub fn load_params() -> crate::physics::PhysicsParams {
    use crate::physics::PhysicsParams;

    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return PhysicsParams::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<PhysicsParams>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(params) => {
            tracing::info!(%path, ?params, "loaded physics parameters");
            params
        }
        Err(err) => {
            tracing::warn!(%path, %err, "ignoring physics config, using defaults");
            PhysicsParams::default()
        }
    }
}

#[cfg(not(feature = "serde"))]
pub fn load_params() -> crate::physics::PhysicsParams {
    crate::physics::PhysicsParams::default()
}
