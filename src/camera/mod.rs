//! Camera system for 3D scene viewing.
//!
//! Provides a yaw/pitch free-fly camera with keyboard movement, mouse aim,
//! scroll zoom and an optional position constraint box.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Movement intent flags and key-to-direction mapping.
pub mod movement;

pub use self::core::{Camera, CameraUniform};
pub use movement::{MoveDirection, MovementIntent};
