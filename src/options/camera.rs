use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera orientation, projection, control and constraint parameters.
pub struct CameraOptions {
    /// Nominal vertical field of view in degrees, used for the projection.
    pub fov: f32,
    /// Initial yaw in degrees (-90 looks down -Z).
    pub yaw: f32,
    /// Initial pitch in degrees.
    pub pitch: f32,
    /// Initial zoom angle in degrees, driven by the scroll wheel.
    pub zoom: f32,
    /// Lowest allowed pitch.
    pub min_pitch: f32,
    /// Highest allowed pitch.
    pub max_pitch: f32,
    /// Lowest allowed zoom.
    pub min_zoom: f32,
    /// Highest allowed zoom.
    pub max_zoom: f32,
    /// World units per second along each held direction.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion while aiming.
    pub aim_speed: f32,
    /// Zoom degrees per scroll line.
    pub zoom_speed: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Clamp the position into `[bounds_min, bounds_max]` after moving.
    pub constrain_movement: bool,
    /// Lower corner of the constraint box.
    pub bounds_min: [f32; 3],
    /// Upper corner of the constraint box.
    pub bounds_max: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 45.0,
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            min_pitch: -89.0,
            max_pitch: 89.0,
            min_zoom: 1.0,
            max_zoom: 45.0,
            movement_speed: 5.0,
            aim_speed: 1.0,
            zoom_speed: 0.1,
            znear: 0.1,
            zfar: 1000.0,
            constrain_movement: false,
            bounds_min: [-100.0; 3],
            bounds_max: [100.0; 3],
        }
    }
}
