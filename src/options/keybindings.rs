use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `MoveForward` → `"KeyW"`).
    ///
    /// Entries read from a preset are laid over the defaults, so a preset
    /// only needs to list the keys it changes.
    #[serde(deserialize_with = "overlay_defaults")]
    pub bindings: HashMap<KeyAction, String>,
}

fn overlay_defaults<'de, D>(
    deserializer: D,
) -> Result<HashMap<KeyAction, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<KeyAction, String>::deserialize(deserializer)?;
    let mut bindings = KeybindingOptions::default().bindings;
    bindings.extend(overrides);
    Ok(bindings)
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::MoveForward, "KeyW".into()),
            (KeyAction::MoveBack, "KeyS".into()),
            (KeyAction::StrafeLeft, "KeyA".into()),
            (KeyAction::StrafeRight, "KeyD".into()),
            (KeyAction::MoveUp, "Space".into()),
            (KeyAction::MoveDown, "ShiftLeft".into()),
            (KeyAction::OpenImage, "KeyO".into()),
            (KeyAction::ToggleView, "Tab".into()),
            (KeyAction::ResetCamera, "KeyR".into()),
            (KeyAction::RaiseRelief, "BracketRight".into()),
            (KeyAction::LowerRelief, "BracketLeft".into()),
        ]);
        Self { bindings }
    }
}

impl KeybindingOptions {
    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|(_, bound)| bound.as_str() == key)
            .map(|(action, _)| *action)
    }

    /// Key string bound to `action`, if any.
    #[must_use]
    pub fn key_for(&self, action: KeyAction) -> Option<&str> {
        self.bindings.get(&action).map(String::as_str)
    }
}
