use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::prelude::*;
use tracing::{debug, trace};

use super::body::Body;
use super::error::PhysicsError;
use super::vector::{clamp_components, direction, wrap_coordinate};
use crate::config::{DEFAULT_BODY_COUNT, ELASTICITY, GRAVITATIONAL_CONSTANT, MAX_VELOCITY, MIN_MASS};

/// Stable handle for a body. Ids are never reused, not even across resets,
/// so a renderer can tell a fresh body from a stale one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Resource: the visible area in physics coordinates, origin top-left.
/// Bodies live in `[0, width] x [0, height]`.
#[derive(Resource, Default, Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What happens when a body reaches the edge of the bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryMode {
    /// Reflect off the walls, losing energy according to `elasticity`.
    #[default]
    Bounce,
    /// Leave through one edge, re-enter through the opposite one.
    Wrap,
    /// No walls at all.
    Open,
}

/// Tunables for the step pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsParams {
    pub gravitational_constant: f32,
    /// Per-component velocity limit.
    pub max_velocity: f32,
    /// Velocity fraction kept after a wall bounce (0..=1).
    pub elasticity: f32,
    /// Number of random bodies created by `reset`.
    pub default_body_count: usize,
    pub boundary: BoundaryMode,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            max_velocity: MAX_VELOCITY,
            elasticity: ELASTICITY,
            default_body_count: DEFAULT_BODY_COUNT,
            boundary: BoundaryMode::Bounce,
        }
    }
}

/// Resource: sole owner of every body.
///
/// Bodies are stored densely; `ids[k]` names `bodies[k]`. Nothing is inserted
/// or removed while `step` runs (it holds `&mut self` for its whole duration).
#[derive(Resource, Debug)]
pub struct PhysicsWorld {
    pub params: PhysicsParams,
    bodies: Vec<Body>,
    ids: Vec<BodyId>,
    next_id: u64,
    tick: u64,
    rng: StdRng,
}

impl PhysicsWorld {
    pub fn new(params: PhysicsParams) -> Self {
        Self::with_seed(params, rand::random())
    }

    /// Same as `new`, but `reset` draws from a deterministic sequence.
    pub fn with_seed(params: PhysicsParams, seed: u64) -> Self {
        Self {
            params,
            bodies: Vec::new(),
            ids: Vec::new(),
            next_id: 0,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // --------------------- Population ---------------------

    /// Add a body of the minimum mass (what a mouse drag spawns).
    pub fn add_body(&mut self, position: Vec2, velocity: Vec2) -> Result<BodyId, PhysicsError> {
        self.add_body_with_mass(position, velocity, MIN_MASS)
    }

    pub fn add_body_with_mass(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
    ) -> Result<BodyId, PhysicsError> {
        let body = Body::new(mass, position, velocity)?;
        let id = self.insert(body);
        debug!(?id, ?position, ?velocity, mass, "added body");
        Ok(id)
    }

    fn insert(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(body);
        self.ids.push(id);
        id
    }

    /// Remove every body. Returns the ids that were removed.
    pub fn clear(&mut self) -> Vec<BodyId> {
        self.bodies.clear();
        std::mem::take(&mut self.ids)
    }

    /// Drop all bodies and repopulate with `default_body_count` random ones
    /// inside `bounds`. Returns the ids that were removed.
    pub fn reset(&mut self, bounds: Bounds) -> Vec<BodyId> {
        let removed = self.clear();
        for _ in 0..self.params.default_body_count {
            let body = Body::random(&mut self.rng, bounds);
            self.insert(body);
        }
        debug!(
            removed = removed.len(),
            added = self.bodies.len(),
            "world reset"
        );
        removed
    }

    // --------------------- Queries ---------------------

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.ids.iter().copied().zip(self.bodies.iter())
    }

    pub fn get(&self, id: BodyId) -> Result<&Body, PhysicsError> {
        self.ids
            .iter()
            .position(|&i| i == id)
            .map(|k| &self.bodies[k])
            .ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.ids.contains(&id)
    }

    /// Total linear momentum, sum of m * v.
    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Ids of bodies whose state contains NaN or infinity.
    pub fn non_finite_bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.iter().filter(|(_, b)| !b.is_finite()).map(|(id, _)| id)
    }

    // --------------------- Step pipeline ---------------------

    /// Advance one tick: reset accelerations, accumulate gravity, integrate,
    /// clip velocities, then handle the boundaries of `bounds`.
    pub fn step(&mut self, bounds: Bounds) {
        self.reset_accelerations();

        let n = self.bodies.len();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    self.apply_gravity(i, j);
                }
            }
        }

        self.integrate();
        self.clip_velocities();
        self.resolve_boundaries(bounds);

        self.tick += 1;
        trace!(tick = self.tick, bodies = n, "step");
    }

    pub fn reset_accelerations(&mut self) {
        for body in &mut self.bodies {
            body.reset_acceleration();
        }
    }

    /// Gravity between bodies `i` and `j` as an action/reaction pair:
    /// `i` is pulled towards `j` by F / m_i and `j` towards `i` by F / m_j.
    ///
    /// Coincident bodies have no defined direction and exert no force.
    pub fn apply_gravity(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let a = self.bodies[i];
        let b = self.bodies[j];

        let Some(dir) = direction(a.position, b.position) else {
            return;
        };
        let distance_sq = (b.position - a.position).length_squared();
        let magnitude = self.params.gravitational_constant * a.mass() * b.mass() / distance_sq;
        if !magnitude.is_finite() {
            return;
        }
        let force = dir * magnitude;

        self.bodies[i].apply_force(force * (1.0 / a.mass()));
        self.bodies[j].apply_force(force * (1.0 / b.mass()) * -1.0);
    }

    pub fn integrate(&mut self) {
        for body in &mut self.bodies {
            body.integrate();
        }
    }

    pub fn clip_velocities(&mut self) {
        let max = self.params.max_velocity;
        for body in &mut self.bodies {
            body.velocity = clamp_components(body.velocity, max);
        }
    }

    pub fn resolve_boundaries(&mut self, bounds: Bounds) {
        match self.params.boundary {
            BoundaryMode::Bounce => self.bounce_off_walls(bounds),
            BoundaryMode::Wrap => self.wrap_around(bounds),
            BoundaryMode::Open => {}
        }
    }

    /// Reflect against the four walls. Each wall is checked independently, so
    /// a body in a corner bounces on both axes. The body is placed tangent to
    /// the wall it crossed.
    fn bounce_off_walls(&mut self, bounds: Bounds) {
        let e = self.params.elasticity;
        for body in &mut self.bodies {
            let r = body.radius();

            if body.position.x + r > bounds.width {
                body.velocity.x *= -e;
                body.position.x = bounds.width - r;
            }
            if body.position.x - r < 0.0 {
                body.velocity.x *= -e;
                body.position.x = r;
            }
            if body.position.y + r > bounds.height {
                body.velocity.y *= -e;
                body.position.y = bounds.height - r;
            }
            if body.position.y - r < 0.0 {
                body.velocity.y *= -e;
                body.position.y = r;
            }
        }
    }

    fn wrap_around(&mut self, bounds: Bounds) {
        for body in &mut self.bodies {
            body.position.x = wrap_coordinate(body.position.x, bounds.width);
            body.position.y = wrap_coordinate(body.position.y, bounds.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world() -> PhysicsWorld {
        PhysicsWorld::with_seed(
            PhysicsParams {
                boundary: BoundaryMode::Open,
                ..Default::default()
            },
            1,
        )
    }

    #[test]
    fn ids_are_never_reused() {
        let mut world = PhysicsWorld::with_seed(PhysicsParams::default(), 3);
        let bounds = Bounds::new(400.0, 300.0);
        let a = world.add_body(Vec2::new(10.0, 10.0), Vec2::ZERO).unwrap();
        let removed = world.reset(bounds);
        assert_eq!(removed, vec![a]);
        assert!(!world.contains(a));
        assert!(world.ids().iter().all(|id| id.0 > a.0));
        assert_eq!(world.get(a), Err(PhysicsError::UnknownBody(a)));
    }

    #[test]
    fn add_body_rejects_invalid_input_without_touching_world() {
        let mut world = open_world();
        assert!(world
            .add_body_with_mass(Vec2::ZERO, Vec2::ZERO, -5.0)
            .is_err());
        assert!(world
            .add_body(Vec2::new(f32::NAN, 0.0), Vec2::ZERO)
            .is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn gravity_pulls_bodies_together() {
        let mut world = open_world();
        world.add_body_with_mass(Vec2::new(0.0, 0.0), Vec2::ZERO, 1000.0).unwrap();
        world.add_body_with_mass(Vec2::new(10.0, 0.0), Vec2::ZERO, 2000.0).unwrap();

        world.apply_gravity(0, 1);

        // F = 1 * 1000 * 2000 / 100 = 20000
        let bodies = world.bodies();
        assert!((bodies[0].acceleration.x - 20.0).abs() < 1e-4);
        assert!((bodies[1].acceleration.x + 10.0).abs() < 1e-4);
        assert_eq!(bodies[0].acceleration.y, 0.0);
    }

    #[test]
    fn gravity_is_symmetric_in_call_order() {
        let mut ab = open_world();
        ab.add_body_with_mass(Vec2::new(3.0, 7.0), Vec2::ZERO, 1200.0).unwrap();
        ab.add_body_with_mass(Vec2::new(40.0, -11.0), Vec2::ZERO, 3400.0).unwrap();
        let mut ba = PhysicsWorld::with_seed(ab.params, 1);
        ba.add_body_with_mass(Vec2::new(3.0, 7.0), Vec2::ZERO, 1200.0).unwrap();
        ba.add_body_with_mass(Vec2::new(40.0, -11.0), Vec2::ZERO, 3400.0).unwrap();

        ab.apply_gravity(0, 1);
        ab.apply_gravity(1, 0);
        ba.apply_gravity(1, 0);
        ba.apply_gravity(0, 1);

        for k in 0..2 {
            assert_eq!(ab.bodies()[k].acceleration, ba.bodies()[k].acceleration);
        }
    }

    #[test]
    fn coincident_bodies_exert_no_force() {
        let mut world = open_world();
        world.add_body(Vec2::new(50.0, 50.0), Vec2::ZERO).unwrap();
        world.add_body(Vec2::new(50.0, 50.0), Vec2::ZERO).unwrap();

        world.step(Bounds::new(100.0, 100.0));

        for body in world.bodies() {
            assert!(body.is_finite());
            assert_eq!(body.acceleration, Vec2::ZERO);
            assert_eq!(body.position, Vec2::new(50.0, 50.0));
        }
        assert_eq!(world.non_finite_bodies().count(), 0);
    }

    #[test]
    fn step_processes_each_pair_in_both_orders() {
        let mut world = open_world();
        world.add_body_with_mass(Vec2::new(0.0, 0.0), Vec2::ZERO, 1000.0).unwrap();
        world.add_body_with_mass(Vec2::new(100.0, 0.0), Vec2::ZERO, 1000.0).unwrap();

        world.step(Bounds::new(1000.0, 1000.0));

        // F = 1000 * 1000 / 10000 = 100 per visit, visited twice -> a = 0.2
        let a = world.bodies()[0].acceleration.x;
        assert!((a - 0.2).abs() < 1e-6, "{a}");
        assert_eq!(world.tick(), 1);
    }

    #[test]
    fn clip_limits_each_component() {
        let mut world = open_world();
        world.add_body(Vec2::ZERO, Vec2::new(120.0, -75.5)).unwrap();
        world.add_body(Vec2::new(500.0, 0.0), Vec2::new(3.0, 49.0)).unwrap();

        world.clip_velocities();

        assert_eq!(world.bodies()[0].velocity, Vec2::new(50.0, -50.0));
        assert_eq!(world.bodies()[1].velocity, Vec2::new(3.0, 49.0));
    }

    #[test]
    fn corner_bounce_hits_both_axes() {
        let mut world = PhysicsWorld::with_seed(PhysicsParams::default(), 1);
        world.add_body(Vec2::new(-2.0, 103.0), Vec2::new(-4.0, 8.0)).unwrap();

        world.resolve_boundaries(Bounds::new(100.0, 100.0));

        let b = world.bodies()[0];
        assert_eq!(b.velocity, Vec2::new(3.0, -6.0));
        assert_eq!(b.position, Vec2::new(5.0, 95.0));
    }

    #[test]
    fn wrap_mode_re_enters_from_opposite_edge() {
        let mut world = PhysicsWorld::with_seed(
            PhysicsParams {
                boundary: BoundaryMode::Wrap,
                ..Default::default()
            },
            1,
        );
        world.add_body(Vec2::new(95.0, 5.0), Vec2::new(10.0, -10.0)).unwrap();

        world.step(Bounds::new(100.0, 100.0));

        let b = world.bodies()[0];
        assert_eq!(b.position, Vec2::new(5.0, 95.0));
        assert_eq!(b.velocity, Vec2::new(10.0, -10.0));
    }

    #[test]
    fn seeded_resets_are_reproducible() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut a = PhysicsWorld::with_seed(PhysicsParams::default(), 99);
        let mut b = PhysicsWorld::with_seed(PhysicsParams::default(), 99);
        a.reset(bounds);
        b.reset(bounds);
        assert_eq!(a.bodies(), b.bodies());
    }
}
