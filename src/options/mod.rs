//! Centralized sandbox options with TOML preset support.
//!
//! Camera behavior, loader sizing and keybindings are consolidated here.
//! Options serialize to/from TOML so a host can ship presets next to its
//! assets.

mod camera;
mod keybindings;
mod loader;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use loader::LoaderOptions;
use serde::{Deserialize, Serialize};

use crate::error::VistaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera orientation, projection and control parameters.
    pub camera: CameraOptions,
    /// Fetch pool and texture buffer sizing.
    pub loader: LoaderOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::OptionsParse`] for malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, VistaError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Io`] if the file cannot be read, or
    /// [`VistaError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VistaError> {
        let content = std::fs::read_to_string(path).map_err(VistaError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Io`] on write failure, or
    /// [`VistaError::OptionsParse`] if serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), VistaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VistaError::Io)?;
        }
        std::fs::write(path, content).map_err(VistaError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
movement_speed = 25.0
constrain_movement = true
bounds_min = [-3.5, 1.01, -7.5]
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.movement_speed, 25.0);
        assert!(opts.camera.constrain_movement);
        assert_eq!(opts.camera.bounds_min, [-3.5, 1.01, -7.5]);
        // Everything else should be default
        assert_eq!(opts.camera.bounds_max, [100.0; 3]);
        assert_eq!(opts.camera.yaw, -90.0);
        assert_eq!(opts.loader, LoaderOptions::default());
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyR"), Some(KeyAction::NextSkybox));
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn loaded_keybindings_rebuild_reverse_map() {
        let toml_str = r#"
[keybindings.bindings]
quit = "KeyX"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("KeyX"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("Escape"), None);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera]\nfov = \"wide\"").unwrap_err();
        assert!(matches!(err, VistaError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = std::env::temp_dir().join(format!("vista-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.camera.fov = 60.0;
        opts.loader.worker_threads = 2;
        opts.save(&path).unwrap();

        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
