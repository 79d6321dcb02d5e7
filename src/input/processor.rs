//! Routes raw platform events to the camera and the host.
//!
//! The `InputProcessor` owns all transient input state (mouse tracking and
//! the key-binding map). It is the only thing that sits between raw window
//! events and [`Camera::handle_input`](crate::camera::Camera::handle_input).

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyAction;
use super::mouse::MouseTracker;
use crate::camera::Camera;
use crate::options::KeybindingOptions;

/// Converts raw window events into camera mutations and [`KeyAction`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(action) = input.handle_event(event, &mut camera) {
///     app.apply(action);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Absolute cursor positions to deltas.
    mouse: MouseTracker,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeybindingOptions {
        &mut self.key_bindings
    }

    /// Forget the cursor position, e.g. after the window regains focus.
    pub fn reset_mouse(&mut self) {
        self.mouse.reset();
    }

    /// Feed one event through the camera and return the bound action, if
    /// the event triggers one.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        camera: &mut Camera,
    ) -> Option<KeyAction> {
        let mut mouse_delta = Vec2::ZERO;
        let mut action = None;

        match event {
            InputEvent::CursorMoved { x, y } => {
                mouse_delta = self.mouse.track(x, y);
            }
            InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            } if !camera.is_aiming() => self.mouse.reset(),
            InputEvent::KeyDown { key } => {
                action = self
                    .key_bindings
                    .lookup(key.name())
                    .filter(|a| a.fires_on_press());
            }
            InputEvent::KeyUp { key } => {
                action = self
                    .key_bindings
                    .lookup(key.name())
                    .filter(|a| !a.fires_on_press());
            }
            _ => {}
        }

        camera.handle_input(&event, mouse_delta);
        action
    }
}
