//! Interactive 2D gravity toy.
//!
//! `physics` holds the headless core (`PhysicsWorld`, `Body`, vector helpers)
//! plus the Bevy plugin that drives it from a window. The core can be stepped
//! without any rendering context.

pub mod config;
pub mod physics;
