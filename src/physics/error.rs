use thiserror::Error;

use super::world::BodyId;

/// Errors raised by the physics core. The step itself never fails; these come
/// from building bodies or addressing them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("body mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("body {field} is not finite")]
    NonFiniteState { field: &'static str },

    #[error("no body with id {0:?}")]
    UnknownBody(BodyId),
}
