//! Input handling: event types, key bindings, mouse tracking, and the input
//! processor that routes raw window events to the camera.

/// Platform-agnostic input events.
pub mod event;
/// Key codes and bindable application actions.
pub mod keyboard;
/// Cursor position tracking and delta computation.
pub mod mouse;
/// Routes raw events to the camera and returns bound actions.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::{KeyAction, KeyCode};
pub use mouse::MouseTracker;
pub use processor::InputProcessor;
