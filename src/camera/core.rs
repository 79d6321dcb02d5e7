use glam::{Mat4, Vec2, Vec3};

use super::movement::{MoveDirection, MovementIntent};
use crate::input::{InputEvent, MouseButton};
use crate::options::CameraOptions;

/// Free-fly perspective camera oriented by yaw and pitch.
///
/// Yaw and pitch (degrees) are the source of truth for orientation; the
/// `front`, `right` and `up` basis vectors are recomputed from them after
/// every orientation change and are never written independently.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    world_up: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,

    yaw: f32,
    pitch: f32,
    zoom: f32,
    fov: f32,
    min_pitch: f32,
    max_pitch: f32,
    min_zoom: f32,
    max_zoom: f32,
    movement_speed: f32,
    aim_speed: f32,
    zoom_speed: f32,
    znear: f32,
    zfar: f32,

    constrain_movement: bool,
    bounds_min: Vec3,
    bounds_max: Vec3,

    intent: MovementIntent,
    aiming: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position (used as `viewPos` for lighting).
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Camera forward direction.
    pub forward: [f32; 3],
    /// Scroll-controlled zoom angle in degrees.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, &CameraOptions::default())
    }
}

/// `v` limited to `[lo, hi]`; never panics on an inverted range.
fn clamp_range(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

impl Camera {
    /// Create a camera at `position` configured from `options`.
    #[must_use]
    pub fn new(position: Vec3, options: &CameraOptions) -> Self {
        let mut camera = Self {
            position,
            world_up: Vec3::Y,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            yaw: options.yaw,
            pitch: clamp_range(options.pitch, options.min_pitch, options.max_pitch),
            zoom: clamp_range(options.zoom, options.min_zoom, options.max_zoom),
            fov: options.fov,
            min_pitch: options.min_pitch,
            max_pitch: options.max_pitch,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            movement_speed: options.movement_speed,
            aim_speed: options.aim_speed,
            zoom_speed: options.zoom_speed,
            znear: options.znear,
            zfar: options.zfar,
            constrain_movement: options.constrain_movement,
            bounds_min: Vec3::from_array(options.bounds_min),
            bounds_max: Vec3::from_array(options.bounds_max),
            intent: MovementIntent::default(),
            aiming: false,
        };
        camera.update_vectors();
        camera
    }

    /// Recompute `front`, `right` and `up` from yaw and pitch.
    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();

        self.front =
            Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
                .normalize();
        // Looking straight along world_up leaves the cross product
        // degenerate; the yaw-only right vector is its limit.
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or_else(|| Vec3::new(-sin_yaw, 0.0, cos_yaw));
        self.up = self.right.cross(self.front).normalize();
    }

    /// Apply one input event. `mouse_delta` is only read for cursor moves.
    ///
    /// Key press/release toggles the movement flag of W/S/A/D/Q/Z, the right
    /// mouse button toggles aim mode, scroll zooms, and cursor motion aims
    /// while aim mode is on. Anything else is ignored.
    pub fn handle_input(&mut self, event: &InputEvent, mouse_delta: Vec2) {
        match *event {
            InputEvent::KeyDown { key } => {
                if let Some(direction) = MoveDirection::from_key(key) {
                    self.intent.set(direction, true);
                }
            }
            InputEvent::KeyUp { key } => {
                if let Some(direction) = MoveDirection::from_key(key) {
                    self.intent.set(direction, false);
                }
            }
            InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed,
            } => self.aiming = pressed,
            InputEvent::MouseButton { .. } => {}
            InputEvent::Scroll { delta } => self.zoom(delta),
            InputEvent::CursorMoved { .. } => {
                if self.aiming {
                    self.aim(mouse_delta);
                }
            }
        }
    }

    /// Rotate by a mouse offset. Pitch is clamped after accumulation, so an
    /// oversized offset lands on the limit instead of being rejected.
    pub fn aim(&mut self, offset: Vec2) {
        self.yaw += offset.x * self.aim_speed;
        self.pitch += offset.y * self.aim_speed;
        self.pitch = clamp_range(self.pitch, self.min_pitch, self.max_pitch);
        self.update_vectors();
    }

    /// Positive scroll decreases the zoom angle (zooms in).
    pub fn zoom(&mut self, delta: f32) {
        self.zoom -= delta * self.zoom_speed;
        self.zoom = clamp_range(self.zoom, self.min_zoom, self.max_zoom);
    }

    /// Integrate movement for `delta_time` seconds.
    ///
    /// Held directions add up without normalization, so diagonal movement
    /// is faster than movement along a single axis.
    pub fn update(&mut self, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        for direction in MoveDirection::ALL {
            if self.intent.is_active(direction) {
                let step = self.axis(direction) * velocity;
                self.position += step;
            }
        }

        if self.constrain_movement {
            self.position =
                self.position.max(self.bounds_min).min(self.bounds_max);
        }
    }

    /// Unit vector `direction` moves along.
    fn axis(&self, direction: MoveDirection) -> Vec3 {
        match direction {
            MoveDirection::Forward => self.front,
            MoveDirection::Backward => -self.front,
            MoveDirection::Left => -self.right,
            MoveDirection::Right => self.right,
            MoveDirection::Up => self.up,
            MoveDirection::Down => -self.up,
        }
    }

    /// Right-handed look-at from the position toward `position + front`.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective projection from `fov` with [0,1] depth
    /// (wgpu/Vulkan convention).
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.znear, self.zfar)
    }

    /// Move the camera, honoring the constraint box when enabled.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = if self.constrain_movement {
            position.max(self.bounds_min).min(self.bounds_max)
        } else {
            position
        };
    }

    /// Set absolute yaw and pitch (degrees); pitch is clamped.
    pub fn look_at_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = clamp_range(pitch, self.min_pitch, self.max_pitch);
        self.update_vectors();
    }

    /// Clear all movement flags and leave aim mode (e.g. on focus loss).
    pub fn release_all(&mut self) {
        self.intent = MovementIntent::default();
        self.aiming = false;
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View direction (`front`).
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.front
    }

    /// Camera right vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Camera up vector.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Nominal field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Scroll-controlled zoom angle in degrees.
    #[must_use]
    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Whether mouse motion currently rotates the camera.
    #[must_use]
    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    /// Currently held movement directions.
    #[must_use]
    pub fn intent(&self) -> MovementIntent {
        self.intent
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            fov: 45.0,
            forward: [0.0, 0.0, -1.0],
            zoom: 45.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera, aspect: f32) {
        let view_proj = camera.projection_matrix(aspect) * camera.view_matrix();
        self.view_proj = view_proj.to_cols_array_2d();
        self.position = camera.position().to_array();
        self.fov = camera.fov();
        self.forward = camera.direction().to_array();
        self.zoom = camera.zoom_level();
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::input::KeyCode;

    const EPS: f32 = 1e-4;

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.direction(), camera.right(), camera.up());
        assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f}");
        assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r}");
        assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    fn press(camera: &mut Camera, key: KeyCode) {
        camera.handle_input(&InputEvent::KeyDown { key }, Vec2::ZERO);
    }

    fn release(camera: &mut Camera, key: KeyCode) {
        camera.handle_input(&InputEvent::KeyUp { key }, Vec2::ZERO);
    }

    #[test]
    fn defaults_look_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.fov(), 45.0);
        assert_eq!(camera.zoom_level(), 45.0);
        assert!(!camera.is_aiming());
        assert!(camera.intent().is_idle());
        assert!(camera.direction().distance(Vec3::NEG_Z) < EPS);
        assert!(camera.right().distance(Vec3::X) < EPS);
        assert!(camera.up().distance(Vec3::Y) < EPS);
    }

    #[test]
    fn key_events_track_last_state_per_key() {
        let mut camera = Camera::default();
        let keys = [
            KeyCode::KeyW,
            KeyCode::KeyS,
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyZ,
        ];
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut expected = [false; 6];

        for _ in 0..500 {
            let i = rng.random_range(0..keys.len());
            let down = rng.random_bool(0.5);
            if down {
                press(&mut camera, keys[i]);
            } else {
                release(&mut camera, keys[i]);
            }
            expected[i] = down;

            let intent = camera.intent();
            let actual = [
                intent.forward,
                intent.backward,
                intent.left,
                intent.right,
                intent.up,
                intent.down,
            ];
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn unbound_keys_and_buttons_are_ignored() {
        let mut camera = Camera::default();
        press(&mut camera, KeyCode::KeyX);
        press(&mut camera, KeyCode::Escape);
        camera.handle_input(
            &InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
            Vec2::ZERO,
        );
        assert!(camera.intent().is_idle());
        assert!(!camera.is_aiming());
    }

    #[test]
    fn cursor_motion_only_aims_while_right_button_held() {
        let mut camera = Camera::default();
        let moved = InputEvent::CursorMoved { x: 0.0, y: 0.0 };

        camera.handle_input(&moved, Vec2::new(10.0, 5.0));
        assert_eq!(camera.yaw(), -90.0);

        camera.handle_input(
            &InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            },
            Vec2::ZERO,
        );
        camera.handle_input(&moved, Vec2::new(10.0, 5.0));
        assert_eq!(camera.yaw(), -80.0);
        assert_eq!(camera.pitch(), 5.0);

        camera.handle_input(
            &InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: false,
            },
            Vec2::ZERO,
        );
        camera.handle_input(&moved, Vec2::new(10.0, 5.0));
        assert_eq!(camera.yaw(), -80.0);
    }

    #[test]
    fn large_aim_offset_clamps_pitch() {
        let mut camera = Camera::default();
        camera.aim(Vec2::new(0.0, 1000.0));
        assert_eq!(camera.pitch(), 89.0);
        camera.aim(Vec2::new(0.0, -5000.0));
        assert_eq!(camera.pitch(), -89.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn random_aim_keeps_pitch_in_range_and_basis_orthonormal() {
        let mut camera = Camera::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let offset = Vec2::new(
                rng.random_range(-400.0..400.0),
                rng.random_range(-400.0..400.0),
            );
            camera.aim(offset);
            assert!((-89.0..=89.0).contains(&camera.pitch()));
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn vertical_pitch_limit_keeps_a_valid_basis() {
        let options = CameraOptions {
            min_pitch: -90.0,
            max_pitch: 90.0,
            ..CameraOptions::default()
        };
        let mut camera = Camera::new(Vec3::ZERO, &options);
        camera.aim(Vec2::new(0.0, 200.0));
        assert_eq!(camera.pitch(), 90.0);
        assert!(camera.right().is_finite());
        assert!(camera.up().is_finite());
        assert!((camera.right().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn update_without_intent_keeps_position() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.5, 6.0), &CameraOptions::default());
        for dt in [0.0, 0.016, 1.0, 250.0] {
            camera.update(dt);
            assert_eq!(camera.position(), Vec3::new(0.0, 2.5, 6.0));
        }
    }

    #[test]
    fn forward_moves_speed_times_dt_along_front() {
        let mut camera = Camera::default();
        camera.aim(Vec2::new(30.0, 20.0));
        let front = camera.direction();
        press(&mut camera, KeyCode::KeyW);
        camera.update(0.5);
        assert!(camera.position().distance(front * 2.5) < EPS);
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut camera = Camera::default();
        press(&mut camera, KeyCode::KeyQ);
        press(&mut camera, KeyCode::KeyZ);
        camera.update(1.0);
        assert!(camera.position().length() < EPS);
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let mut straight = Camera::default();
        press(&mut straight, KeyCode::KeyW);
        straight.update(1.0);

        let mut diagonal = Camera::default();
        press(&mut diagonal, KeyCode::KeyW);
        press(&mut diagonal, KeyCode::KeyD);
        diagonal.update(1.0);

        let axis = straight.position().length();
        let diag = diagonal.position().length();
        assert!(diag > axis);
        assert!((diag - axis * std::f32::consts::SQRT_2).abs() < EPS);
    }

    #[test]
    fn constraint_box_clamps_after_integration() {
        let options = CameraOptions {
            constrain_movement: true,
            bounds_min: [-3.5, 1.01, -7.5],
            bounds_max: [7.5, 5.0, 3.5],
            ..CameraOptions::default()
        };
        let mut camera = Camera::new(Vec3::new(0.0, 2.5, 0.0), &options);
        press(&mut camera, KeyCode::KeyW);
        press(&mut camera, KeyCode::KeyZ);
        camera.update(100.0);
        assert!(camera.position().distance(Vec3::new(0.0, 1.01, -7.5)) < 1e-3);
    }

    #[test]
    fn set_position_respects_constraint_box() {
        let mut free = Camera::default();
        free.set_position(Vec3::new(500.0, -500.0, 0.0));
        assert_eq!(free.position(), Vec3::new(500.0, -500.0, 0.0));

        let options = CameraOptions {
            constrain_movement: true,
            bounds_min: [-3.5, 1.01, -7.5],
            bounds_max: [7.5, 5.0, 3.5],
            ..CameraOptions::default()
        };
        let mut boxed = Camera::new(Vec3::new(0.0, 2.5, 0.0), &options);
        boxed.set_position(Vec3::new(20.0, 0.0, 1.0));
        assert_eq!(boxed.position(), Vec3::new(7.5, 1.01, 1.0));
    }

    #[test]
    fn look_at_angles_clamps_pitch_and_rebuilds_basis() {
        let mut camera = Camera::default();
        camera.look_at_angles(0.0, 120.0);
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), 89.0);
        assert_orthonormal(&camera);

        camera.look_at_angles(0.0, 0.0);
        assert!(camera.direction().distance(Vec3::X) < EPS);
    }

    #[test]
    fn release_all_stops_movement_and_aim() {
        let mut camera = Camera::default();
        press(&mut camera, KeyCode::KeyW);
        press(&mut camera, KeyCode::KeyQ);
        camera.handle_input(
            &InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            },
            Vec2::ZERO,
        );
        camera.release_all();
        assert!(camera.intent().is_idle());
        assert!(!camera.is_aiming());

        camera.update(1.0);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn scroll_zooms_in_until_minimum() {
        let mut camera = Camera::default();
        let mut previous = camera.zoom_level();
        for _ in 0..1000 {
            camera.handle_input(&InputEvent::Scroll { delta: 1.0 }, Vec2::ZERO);
            let zoom = camera.zoom_level();
            if previous > 1.0 {
                assert!(zoom < previous);
            } else {
                assert_eq!(zoom, 1.0);
            }
            previous = zoom;
        }
        assert_eq!(camera.zoom_level(), 1.0);

        camera.zoom(-10_000.0);
        assert_eq!(camera.zoom_level(), 45.0);
    }

    #[test]
    fn zoom_does_not_change_fov() {
        let mut camera = Camera::default();
        camera.zoom(100.0);
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn view_matrix_maps_front_point_to_negative_z() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), &CameraOptions::default());
        camera.aim(Vec2::new(37.0, -12.0));
        let ahead = camera.position() + camera.direction() * 4.0;
        let view_space = camera.view_matrix().transform_point3(ahead);
        assert!(view_space.distance(Vec3::new(0.0, 0.0, -4.0)) < 1e-3);
    }

    #[test]
    fn uniform_mirrors_camera_state() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.5, 6.0), &CameraOptions::default());
        camera.zoom(50.0);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, 1280.0 / 768.0);
        assert_eq!(uniform.position, [0.0, 2.5, 6.0]);
        assert_eq!(uniform.fov, 45.0);
        assert_eq!(uniform.zoom, camera.zoom_level());
        assert_eq!(uniform.forward, camera.direction().to_array());
    }
}
