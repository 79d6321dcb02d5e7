use serde::{Deserialize, Serialize};

/// Platform-agnostic physical key identifier.
///
/// Only the keys the sandbox can bind are named; everything else arrives as
/// [`KeyCode::Unidentified`]. String names follow the
/// `winit::keyboard::KeyCode` debug format (`"KeyW"`, `"Escape"`), which is
/// also the format used in TOML keybinding presets.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    Space,
    Tab,
    Enter,
    Escape,
    /// Any key without a dedicated variant.
    Unidentified,
}

const NAMED_KEYS: [(KeyCode, &str); 30] = [
    (KeyCode::KeyA, "KeyA"),
    (KeyCode::KeyB, "KeyB"),
    (KeyCode::KeyC, "KeyC"),
    (KeyCode::KeyD, "KeyD"),
    (KeyCode::KeyE, "KeyE"),
    (KeyCode::KeyF, "KeyF"),
    (KeyCode::KeyG, "KeyG"),
    (KeyCode::KeyH, "KeyH"),
    (KeyCode::KeyI, "KeyI"),
    (KeyCode::KeyJ, "KeyJ"),
    (KeyCode::KeyK, "KeyK"),
    (KeyCode::KeyL, "KeyL"),
    (KeyCode::KeyM, "KeyM"),
    (KeyCode::KeyN, "KeyN"),
    (KeyCode::KeyO, "KeyO"),
    (KeyCode::KeyP, "KeyP"),
    (KeyCode::KeyQ, "KeyQ"),
    (KeyCode::KeyR, "KeyR"),
    (KeyCode::KeyS, "KeyS"),
    (KeyCode::KeyT, "KeyT"),
    (KeyCode::KeyU, "KeyU"),
    (KeyCode::KeyV, "KeyV"),
    (KeyCode::KeyW, "KeyW"),
    (KeyCode::KeyX, "KeyX"),
    (KeyCode::KeyY, "KeyY"),
    (KeyCode::KeyZ, "KeyZ"),
    (KeyCode::Space, "Space"),
    (KeyCode::Tab, "Tab"),
    (KeyCode::Enter, "Enter"),
    (KeyCode::Escape, "Escape"),
];

impl KeyCode {
    /// Key string in `winit` debug format, e.g. `"KeyW"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        NAMED_KEYS
            .iter()
            .find(|(code, _)| *code == self)
            .map_or("Unidentified", |(_, name)| name)
    }

    /// Parse a key string produced by [`KeyCode::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_KEYS
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(code, _)| *code)
    }
}

#[cfg(feature = "viewer")]
impl From<winit::keyboard::KeyCode> for KeyCode {
    fn from(code: winit::keyboard::KeyCode) -> Self {
        // winit's debug names are exactly our key strings
        Self::from_name(&format!("{code:?}")).unwrap_or(Self::Unidentified)
    }
}

/// Application-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// next_skybox = "KeyR"
/// quit = "Escape"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Request the host to exit.
    Quit,
    /// Show or hide the frame-statistics overlay.
    ToggleDebugOverlay,
    /// Show or hide the memory overlay.
    ToggleMemoryOverlay,
    /// Select the next loaded skybox.
    NextSkybox,
    /// Select the previous loaded skybox.
    PreviousSkybox,
}

impl KeyAction {
    /// Whether the action fires on key press rather than on release.
    #[must_use]
    pub fn fires_on_press(self) -> bool {
        matches!(self, Self::Quit)
    }
}
