//! Small vector helpers on top of `Vec2`.
//!
//! `Vec2` already covers add / subtract / scale / length. What it does not
//! give us for free is a normalisation that refuses zero-length input in a way
//! the gravity code has to acknowledge, so that lives here.

use bevy::math::Vec2;

/// Unit vector pointing from `from` to `to`, or `None` when the points
/// coincide (or the difference is not finite).
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Clamp each component independently to `[-max, max]`.
#[inline]
pub fn clamp_components(v: Vec2, max: f32) -> Vec2 {
    Vec2::new(v.x.clamp(-max, max), v.y.clamp(-max, max))
}

/// Move a coordinate that left `[0, extent]` back in from the opposite side.
/// Values inside the range are returned unchanged.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    if value > extent {
        value - extent
    } else if value < 0.0 {
        extent + value
    } else {
        value
    }
}
