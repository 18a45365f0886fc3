use bevy::math::Vec2;
use rand::prelude::*;

use super::error::PhysicsError;
use super::world::Bounds;
use crate::config::{MASS_PER_RADIUS, MIN_MASS, RANDOM_MASS_FACTOR, RANDOM_VELOCITY};

/// A point mass with a circular extent.
///
/// Mass (and therefore radius) is fixed at construction. Position, velocity
/// and the per-tick acceleration are mutated by the owning `World`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    mass: f32,
    radius: f32,

    pub position: Vec2,
    pub velocity: Vec2,
    /// Accumulated acceleration for the current tick (sum of applied forces).
    pub acceleration: Vec2,
}

impl Body {
    /// Create a body at rest acceleration-wise. Rejects non-positive or
    /// non-finite mass and non-finite kinematic state.
    pub fn new(mass: f32, position: Vec2, velocity: Vec2) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if !position.is_finite() {
            return Err(PhysicsError::NonFiniteState { field: "position" });
        }
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFiniteState { field: "velocity" });
        }
        Ok(Self {
            mass,
            radius: mass / MASS_PER_RADIUS,
            position,
            velocity,
            acceleration: Vec2::ZERO,
        })
    }

    /// A heavy body somewhere inside `bounds`, drifting in a random direction.
    /// Coordinates and velocity components are whole numbers.
    pub fn random(rng: &mut StdRng, bounds: Bounds) -> Self {
        let max_x = bounds.width.max(0.0) as i32;
        let max_y = bounds.height.max(0.0) as i32;
        let position = Vec2::new(
            rng.random_range(0..=max_x) as f32,
            rng.random_range(0..=max_y) as f32,
        );
        let velocity = Vec2::new(
            rng.random_range(-RANDOM_VELOCITY..=RANDOM_VELOCITY) as f32,
            rng.random_range(-RANDOM_VELOCITY..=RANDOM_VELOCITY) as f32,
        );
        let mass = RANDOM_MASS_FACTOR * MIN_MASS;
        Self {
            mass,
            radius: mass / MASS_PER_RADIUS,
            position,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    // --------------------- Forces ---------------------

    pub fn reset_acceleration(&mut self) {
        self.acceleration = Vec2::ZERO;
    }

    /// Accumulate `force` into this tick's acceleration. Callers pass the
    /// force already divided by this body's mass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // --------------------- Integration ---------------------

    /// One explicit Euler tick with unit timestep. Velocity is updated first
    /// and the new velocity moves the body.
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }

    /// Corners (min, max) of the square enclosing the body's circle.
    pub fn bbox(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.radius);
        (self.position - r, self.position + r)
    }
}
